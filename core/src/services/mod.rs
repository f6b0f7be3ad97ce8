//! Core services
//!
//! - `cache` - ephemeral key-value store contract (Redis in production)
//! - `rate_limit` - generic fixed-window rate limiter
//! - `otp` - OTP challenge issuance and verification
//! - `session` - opaque session tokens, validation and cleanup
//! - `sms` - SMS gateway contract
//! - `auth` - orchestration of the above into the authentication flows

pub mod auth;
pub mod cache;
pub mod otp;
pub mod rate_limit;
pub mod session;
pub mod sms;
