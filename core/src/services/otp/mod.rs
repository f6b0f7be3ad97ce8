//! OTP challenge issuance and verification

mod service;

pub use service::{OtpChallenge, OtpService};

#[cfg(test)]
mod tests;
