//! Centralized error handling module
//!
//! The library returns [`AppError`]; the binary wraps it in `anyhow` at the
//! command boundary.

pub mod types;

pub use types::{AppError, AppResult, DeliveryFailure, TransportError};

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Other {
            message: err.to_string(),
            source: None,
        }
    }
}
