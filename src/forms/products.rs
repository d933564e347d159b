use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, Product};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while turning a draft into a directory payload.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The price field does not parse as a finite number.
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
}

/// Draft state of the create/edit form.
///
/// Every field stays plain text while the form is open. Nothing is parsed or
/// checked until the user submits.
#[derive(Debug, Default, Clone, PartialEq, Validate)]
pub struct ProductForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Longer description; may stay empty.
    pub description: String,
    /// Price exactly as typed.
    #[validate(length(min = 1))]
    pub price: String,
}

impl ProductForm {
    /// Copy an existing product's fields into a fresh draft when an edit
    /// starts.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
        }
    }

    /// Validates and sanitizes the draft into a directory `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price = match self.price.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                return Err(ProductFormError::InvalidPrice { value: self.price });
            }
        };

        let sanitized_description = sanitize_inline_text(&self.description);

        Ok(NewProduct::new(sanitized_name, sanitized_description, price))
    }
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}
