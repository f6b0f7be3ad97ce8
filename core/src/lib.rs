//! Core business logic for the GoalPoll backend.
//!
//! This crate contains the domain entities, the error taxonomy, the
//! repository traits (with in-memory mocks for testing) and the services
//! implementing OTP authentication and session management. It depends on
//! abstractions only; concrete Redis, MySQL and SMS implementations live
//! in the `gp_infra` crate.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export the most frequently used types
pub use errors::{DomainError, DomainResult, OtpError, SmsError};
pub use repositories::{SessionRepository, UserRepository};
pub use services::cache::CacheStore;
pub use services::sms::{SmsGateway, SmsSendResponse, SmsStatus};
