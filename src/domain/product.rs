use serde::{Deserialize, Serialize};

/// Domain representation of a product as the directory service reports it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier assigned by the directory service.
    pub id: i64,
    /// Human-readable name of the product.
    pub name: String,
    /// Longer description shown to visitors; may be empty.
    pub description: String,
    /// Unit price of the product.
    pub price: f64,
}

/// Payload sent to the directory when creating a product or replacing an
/// existing one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewProduct {
    /// Human-readable name of the product.
    pub name: String,
    /// Longer description shown to visitors; may be empty.
    pub description: String,
    /// Unit price of the product.
    pub price: f64,
}

impl NewProduct {
    /// Build a product payload with the supplied details.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}
