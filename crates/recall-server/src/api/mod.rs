//! HTTP API contract
//!
//! Request/response types for the scheduling facade plus the error taxonomy
//! mapped onto HTTP status codes.

pub mod error;
pub mod types;

pub use error::ApiError;
