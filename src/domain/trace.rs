use serde::{Deserialize, Serialize};

/// Interest event linking a product to the visitor who asked about it.
///
/// Nothing is kept on this side once the event has been posted; the directory
/// service owns the history.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TraceRequest {
    /// Identifier of the product being traced.
    pub product_id: i64,
    /// Email address submitted by the visitor.
    pub client_email: String,
}

impl TraceRequest {
    /// Build a trace event for `product_id` from the visitor's email.
    pub fn new(product_id: i64, client_email: impl Into<String>) -> Self {
        Self {
            product_id,
            client_email: client_email.into(),
        }
    }
}
