pub mod directory;
pub mod domain;
pub mod forms;
pub mod services;
pub mod tui;

/// Base address of the product directory service when `DIRECTORY_URL` is not
/// set.
pub const DEFAULT_DIRECTORY_URL: &str = "http://localhost:5000/api";
