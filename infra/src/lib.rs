//! Infrastructure layer for the GoalPoll backend.
//!
//! Concrete implementations of the contracts defined in `gp_core`:
//! - `cache` - Redis client implementing `CacheStore`
//! - `database` - MySQL connection pool and repositories (SQLx)
//! - `sms` - SMS gateway HTTP client

pub mod cache;
pub mod database;
pub mod sms;

use thiserror::Error;

/// Infrastructure-level errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<InfrastructureError> for gp_core::DomainError {
    fn from(err: InfrastructureError) -> Self {
        gp_core::DomainError::Internal {
            message: err.to_string(),
        }
    }
}
