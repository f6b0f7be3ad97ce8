//! Domain-specific error types and error handling.

mod types;

pub use types::{OtpError, SmsError};

use thiserror::Error;

/// Core domain errors (general purpose)
///
/// Expected outcomes ("wrong code", "rate limited") are explicit variants
/// so that callers have to handle every failure kind; only genuinely
/// unexpected failures end up in `Internal`.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Rate limit exceeded, retry in {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: i64 },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Sms(#[from] SmsError),
}

pub type DomainResult<T> = Result<T, DomainError>;
