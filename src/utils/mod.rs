//! Utility modules for common functionality.
//!
//! - http: HTTP client utilities (retry configuration and retryable clients)
//! - logging: Logging setup and error context utilities
//! - tests: Test utilities

pub mod http;
pub mod logging;
pub mod tests;

pub use http::*;
