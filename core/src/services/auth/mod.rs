//! Authentication orchestration

mod service;

pub use service::{AuthService, AuthServiceConfig, SendOtpOutcome, VerifyOtpOutcome};

#[cfg(test)]
mod tests;
