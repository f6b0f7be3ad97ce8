//! OTP service implementation
//!
//! Challenge lifecycle per phone: NONE -> ISSUED -> {VERIFIED, EXPIRED,
//! LOCKED} -> NONE. At most one challenge is live per phone; issuing a new
//! one overwrites the previous state. Re-issuance while a challenge is live
//! is blocked by the send cooldown, not by the state machine itself.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use gp_shared::config::OtpConfig;
use gp_shared::utils::phone::mask_phone_number;

use crate::errors::{DomainError, DomainResult, OtpError};
use crate::services::cache::CacheStore;

const OTP_KEY_PREFIX: &str = "otp:phone";
const COOLDOWN_KEY_PREFIX: &str = "otp:send:limit";
const ATTEMPTS_KEY_PREFIX: &str = "otp:verify:attempts";

/// A live OTP challenge stored in the ephemeral store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// The code the client must echo back
    pub code: String,
    /// Absolute expiry instant, checked in addition to the store TTL
    pub expires_at: DateTime<Utc>,
    /// Verification attempts recorded against this challenge
    pub attempts: u32,
}

/// Service issuing and verifying OTP challenges
pub struct OtpService<C: CacheStore> {
    /// Ephemeral store holding challenges, cooldowns and attempt counters
    cache: Arc<C>,
    /// Service configuration
    config: OtpConfig,
}

impl<C: CacheStore> OtpService<C> {
    /// Create a new OTP service
    pub fn new(cache: Arc<C>, config: OtpConfig) -> Self {
        Self { cache, config }
    }

    fn otp_key(phone: &str) -> String {
        format!("{}:{}", OTP_KEY_PREFIX, phone)
    }

    fn cooldown_key(phone: &str) -> String {
        format!("{}:{}", COOLDOWN_KEY_PREFIX, phone)
    }

    fn attempts_key(phone: &str) -> String {
        format!("{}:{}", ATTEMPTS_KEY_PREFIX, phone)
    }

    /// Issue a new challenge for a phone number
    ///
    /// Fails with `SendCooldownActive` while the cooldown marker from the
    /// previous issuance is present. Otherwise the new challenge replaces
    /// any prior state: the stored challenge is overwritten and the
    /// attempt counter is reset.
    ///
    /// # Returns
    /// * `Ok(String)` - The generated code, to be handed to the SMS gateway
    /// * `Err(DomainError)` - Cooldown active or store failure
    pub async fn issue(&self, phone: &str) -> DomainResult<String> {
        let cooldown_key = Self::cooldown_key(phone);

        if self.cache.exists(&cooldown_key).await? {
            let retry_after = self
                .cache
                .ttl(&cooldown_key)
                .await?
                .unwrap_or(self.config.send_cooldown_seconds as i64);

            warn!(
                phone = %mask_phone_number(phone),
                retry_after = retry_after,
                event = "otp_send_cooldown",
                "OTP requested while cooldown is active"
            );

            return Err(OtpError::SendCooldownActive {
                retry_after_seconds: retry_after.max(1),
            }
            .into());
        }

        let code = self.generate_code();
        let challenge = OtpChallenge {
            code: code.clone(),
            expires_at: Utc::now() + Duration::seconds(self.config.otp_ttl_seconds as i64),
            attempts: 0,
        };

        let payload = serde_json::to_string(&challenge).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize OTP challenge: {}", e),
        })?;

        // A plain overwrite: the newest challenge is the only valid one
        self.cache
            .set(&Self::otp_key(phone), &payload, self.config.otp_ttl_seconds)
            .await?;

        self.cache
            .set(&cooldown_key, "1", self.config.send_cooldown_seconds)
            .await?;

        // A fresh challenge starts with a clean attempt window
        self.cache.delete(&Self::attempts_key(phone)).await?;

        info!(
            phone = %mask_phone_number(phone),
            event = "otp_issued",
            "Issued new OTP challenge"
        );

        Ok(code)
    }

    /// Verify a submitted code against the live challenge
    ///
    /// The attempt counter is consulted before the challenge itself, so a
    /// locked phone stays locked regardless of the submitted code. On a
    /// mismatch the counter is incremented (its TTL starting with the first
    /// failure); when the counter reaches the configured maximum the
    /// challenge is deleted and the phone is locked until a new challenge
    /// is issued or the attempt window lapses.
    ///
    /// On a match the challenge and the counter are deleted, making a
    /// successful verification possible at most once per challenge.
    pub async fn verify(&self, phone: &str, code: &str) -> DomainResult<()> {
        let attempts_key = Self::attempts_key(phone);

        let attempts = self
            .cache
            .get(&attempts_key)
            .await?
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);

        if attempts >= self.config.max_verify_attempts {
            warn!(
                phone = %mask_phone_number(phone),
                attempts = attempts,
                event = "otp_verify_locked",
                "Verification attempted while locked out"
            );
            return Err(OtpError::AttemptsExhausted.into());
        }

        let otp_key = Self::otp_key(phone);
        let challenge = match self.cache.get(&otp_key).await? {
            Some(payload) => {
                serde_json::from_str::<OtpChallenge>(&payload).map_err(|e| {
                    DomainError::Internal {
                        message: format!("Failed to deserialize OTP challenge: {}", e),
                    }
                })?
            }
            None => {
                warn!(
                    phone = %mask_phone_number(phone),
                    event = "otp_not_found",
                    "No live OTP challenge"
                );
                return Err(OtpError::ChallengeNotFound.into());
            }
        };

        if Utc::now() > challenge.expires_at {
            self.cache.delete(&otp_key).await?;
            warn!(
                phone = %mask_phone_number(phone),
                event = "otp_expired",
                "OTP challenge expired"
            );
            return Err(OtpError::ChallengeExpired.into());
        }

        if !Self::codes_match(&challenge.code, code) {
            let attempts = self.cache.incr(&attempts_key).await?;
            if attempts == 1 {
                self.cache
                    .expire(&attempts_key, self.config.attempt_window_seconds)
                    .await?;
            }

            // remaining counts the further mismatches still answered with
            // CodeMismatch; the next one after zero locks the phone
            let remaining = (self.config.max_verify_attempts as i64) - attempts - 1;

            if remaining < 0 {
                self.cache.delete(&otp_key).await?;
                warn!(
                    phone = %mask_phone_number(phone),
                    attempts = attempts,
                    event = "otp_attempts_exhausted",
                    "Maximum verification attempts reached, challenge deleted"
                );
                return Err(OtpError::AttemptsExhausted.into());
            }

            warn!(
                phone = %mask_phone_number(phone),
                attempts = attempts,
                remaining = remaining,
                event = "otp_mismatch",
                "Verification code mismatch"
            );

            return Err(OtpError::CodeMismatch {
                remaining_attempts: remaining as u32,
            }
            .into());
        }

        // Consume the challenge: success is possible at most once
        self.cache.delete(&otp_key).await?;
        self.cache.delete(&attempts_key).await?;

        info!(
            phone = %mask_phone_number(phone),
            event = "otp_verified",
            "OTP challenge verified"
        );

        Ok(())
    }

    /// Generate a uniformly distributed numeric code of the configured length
    ///
    /// Uses the OS CSPRNG; `gen_range` samples without modulo bias, so no
    /// code value is more likely than another and codes carry no state from
    /// prior generations.
    fn generate_code(&self) -> String {
        let space = 10u64.pow(self.config.code_length as u32);
        let value = OsRng.gen_range(0..space);
        format!("{:0width$}", value, width = self.config.code_length)
    }

    /// Compare a stored and a submitted code in constant time
    ///
    /// The length check is a fast, content-independent short-circuit; for
    /// equal lengths the comparison cost does not depend on where the
    /// codes differ.
    fn codes_match(stored: &str, submitted: &str) -> bool {
        if stored.len() != submitted.len() {
            return false;
        }
        constant_time_eq(stored.as_bytes(), submitted.as_bytes())
    }

    #[cfg(test)]
    pub(crate) fn codes_match_for_tests(stored: &str, submitted: &str) -> bool {
        Self::codes_match(stored, submitted)
    }

    #[cfg(test)]
    pub(crate) fn otp_key_for_tests(phone: &str) -> String {
        Self::otp_key(phone)
    }

    #[cfg(test)]
    pub(crate) fn generate_code_for_tests(&self) -> String {
        self.generate_code()
    }
}
