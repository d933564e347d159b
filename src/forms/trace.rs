use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use validator::Validate;

use crate::domain::trace::TraceRequest;

lazy_static! {
    // Accepts localpart@domain.tld; whitespace and a missing dot both fail.
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should compile");
}

/// Errors produced when validating a trace submission.
#[derive(Debug, Error, PartialEq)]
pub enum TraceFormError {
    /// No email was entered at all.
    #[error("email address is required")]
    EmptyEmail,
    /// The entered email does not match the accepted shape.
    #[error("invalid email address `{value}`")]
    InvalidEmail { value: String },
}

/// Draft state of a trace submission.
#[derive(Debug, Default, Clone, PartialEq, Validate)]
pub struct TraceForm {
    /// Email address exactly as the visitor typed it.
    #[validate(regex(path = *EMAIL_RE))]
    pub email: String,
}

impl TraceForm {
    /// Wrap an email buffer in a form ready for validation.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// Validates the email and binds it to `product_id`.
    ///
    /// An empty field and a malformed address are distinct failures so each
    /// screen can keep its own message for them.
    pub fn into_trace_request(self, product_id: i64) -> Result<TraceRequest, TraceFormError> {
        if self.email.is_empty() {
            return Err(TraceFormError::EmptyEmail);
        }

        if self.validate().is_err() {
            return Err(TraceFormError::InvalidEmail { value: self.email });
        }

        Ok(TraceRequest::new(product_id, self.email))
    }
}
