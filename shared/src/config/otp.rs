//! OTP issuance and verification configuration

use serde::{Deserialize, Serialize};

/// Configuration for OTP challenges
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of digits in a generated code
    pub code_length: usize,

    /// Challenge time-to-live in seconds
    pub otp_ttl_seconds: u64,

    /// Minimum interval between two issuances for the same phone, in seconds
    pub send_cooldown_seconds: u64,

    /// Maximum verification attempts per challenge
    pub max_verify_attempts: u32,

    /// Time-to-live of the failed-attempt counter in seconds
    ///
    /// This window is independent of the challenge TTL.
    pub attempt_window_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            otp_ttl_seconds: 120,
            send_cooldown_seconds: 120,
            max_verify_attempts: 5,
            attempt_window_seconds: 60,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_length: env_parse("OTP_CODE_LENGTH", defaults.code_length),
            otp_ttl_seconds: env_parse("OTP_TTL_SECONDS", defaults.otp_ttl_seconds),
            send_cooldown_seconds: env_parse(
                "OTP_SEND_COOLDOWN_SECONDS",
                defaults.send_cooldown_seconds,
            ),
            max_verify_attempts: env_parse("OTP_MAX_VERIFY_ATTEMPTS", defaults.max_verify_attempts),
            attempt_window_seconds: env_parse(
                "OTP_ATTEMPT_WINDOW_SECONDS",
                defaults.attempt_window_seconds,
            ),
        }
    }

    /// Set the challenge TTL in seconds
    pub fn with_ttl_seconds(mut self, seconds: u64) -> Self {
        self.otp_ttl_seconds = seconds;
        self
    }

    /// Set the maximum verification attempts
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_verify_attempts = attempts;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
