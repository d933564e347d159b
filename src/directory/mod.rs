use reqwest::blocking::{Client, Response};
use thiserror::Error;

use crate::domain::product::{NewProduct, Product};
use crate::domain::trace::TraceRequest;

pub mod products;
pub mod trace;

#[cfg(test)]
pub mod mock;

/// Result type returned by every directory operation.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Failures reported by the product directory client.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The service answered with a non-success status code.
    #[error("directory responded with status {status}")]
    Status { status: reqwest::StatusCode },
    /// The request never completed or the response body could not be decoded.
    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
/// HTTP-backed client for the product directory service.
pub struct HttpDirectory {
    client: Client, // reqwest's blocking client is an Arc internally, cheap to clone
    base_url: String,
}

impl HttpDirectory {
    /// Create a client for the directory reachable at `base_url`.
    ///
    /// A trailing slash on `base_url` is tolerated; nothing is retried or
    /// cached on this side.
    pub fn new(base_url: impl Into<String>) -> DirectoryResult<Self> {
        let client = Client::builder().build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn expect_success(response: Response) -> DirectoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(DirectoryError::Status { status })
    }
}

/// Read-only operations over the product collection.
pub trait ProductReader {
    fn list_products(&self) -> DirectoryResult<Vec<Product>>;
}

/// Write operations over the product collection.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> DirectoryResult<Product>;
    fn update_product(&self, product_id: i64, updates: &NewProduct) -> DirectoryResult<Product>;
    fn delete_product(&self, product_id: i64) -> DirectoryResult<()>;
}

/// Recording of product trace events.
pub trait TraceRecorder {
    fn record_trace(&self, trace: &TraceRequest) -> DirectoryResult<()>;
}
