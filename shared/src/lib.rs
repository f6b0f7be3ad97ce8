//! Shared types, configuration and utilities for the GoalPoll backend.
//!
//! This crate holds everything that is useful to more than one layer:
//! configuration structs, API response wrappers and phone number helpers.

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used types at the crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, Environment, OtpConfig, ServerConfig, SessionConfig,
    SmsConfig,
};
pub use types::response::ApiResponse;
