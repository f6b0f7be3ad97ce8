//! Error types for OTP verification and SMS delivery
//!
//! Every expected authentication outcome is a dedicated variant so the
//! presentation layer can translate each one into a stable machine-readable
//! code without inspecting message strings.

use thiserror::Error;

use crate::services::sms::SmsStatus;

/// OTP issuance and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("A code was requested too recently, retry in {retry_after_seconds}s")]
    SendCooldownActive { retry_after_seconds: i64 },

    #[error("No verification code found, request one first")]
    ChallengeNotFound,

    #[error("Verification code expired, request a new one")]
    ChallengeExpired,

    #[error("Invalid verification code, {remaining_attempts} attempts remaining")]
    CodeMismatch { remaining_attempts: u32 },

    #[error("Too many verification attempts, request a new code")]
    AttemptsExhausted,
}

/// SMS gateway errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmsError {
    #[error("SMS gateway rejected the message with status {status:?}")]
    SendRejected { status: SmsStatus },

    #[error("SMS gateway unreachable: {message}")]
    GatewayUnreachable { message: String },
}
