//! SMS gateway contract
//!
//! The gateway is abstracted behind a trait with a closed response status
//! taxonomy; the concrete HTTP client lives in `gp_infra`. Callers pass the
//! phone number already normalized for the provider (no leading zero, no
//! country code).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::DomainResult;

/// Closed taxonomy of gateway response statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmsStatus {
    /// Message accepted for delivery
    Success,
    /// Credentials rejected
    InvalidApiKey,
    /// Unknown message template
    InvalidTemplate,
    /// Destination number rejected
    InvalidMobile,
    /// Account balance too low
    InsufficientCredit,
    /// Provider-side failure, including transport errors
    ServerError,
}

impl SmsStatus {
    /// Map a wire status code onto the taxonomy
    ///
    /// Unknown codes collapse into `ServerError`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SmsStatus::Success,
            101 => SmsStatus::InvalidApiKey,
            103 => SmsStatus::InvalidTemplate,
            104 => SmsStatus::InvalidMobile,
            105 => SmsStatus::InsufficientCredit,
            _ => SmsStatus::ServerError,
        }
    }

    /// Wire status code of this status
    pub fn as_code(&self) -> i64 {
        match self {
            SmsStatus::Success => 1,
            SmsStatus::InvalidApiKey => 101,
            SmsStatus::InvalidTemplate => 103,
            SmsStatus::InvalidMobile => 104,
            SmsStatus::InsufficientCredit => 105,
            SmsStatus::ServerError => 500,
        }
    }
}

/// Gateway response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsSendResponse {
    /// Response status
    pub status: SmsStatus,
    /// Provider message id when the send was accepted
    pub message_id: Option<i64>,
    /// Provider message text
    pub message: String,
}

impl SmsSendResponse {
    /// Whether the message was accepted for delivery
    pub fn is_success(&self) -> bool {
        self.status == SmsStatus::Success
    }
}

/// SMS delivery abstraction
///
/// Implementations must bound the underlying network call with a timeout;
/// a timed-out call is reported as a `ServerError` response rather than
/// left pending.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Send a verification code to a normalized mobile number
    async fn send(&self, mobile: &str, code: &str) -> DomainResult<SmsSendResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(SmsStatus::from_code(1), SmsStatus::Success);
        assert_eq!(SmsStatus::from_code(101), SmsStatus::InvalidApiKey);
        assert_eq!(SmsStatus::from_code(103), SmsStatus::InvalidTemplate);
        assert_eq!(SmsStatus::from_code(104), SmsStatus::InvalidMobile);
        assert_eq!(SmsStatus::from_code(105), SmsStatus::InsufficientCredit);
        assert_eq!(SmsStatus::from_code(500), SmsStatus::ServerError);
        // Unknown codes collapse into ServerError
        assert_eq!(SmsStatus::from_code(42), SmsStatus::ServerError);
    }

    #[test]
    fn test_roundtrip_known_codes() {
        for code in [1, 101, 103, 104, 105, 500] {
            assert_eq!(SmsStatus::from_code(code).as_code(), code);
        }
    }

    #[test]
    fn test_is_success() {
        let ok = SmsSendResponse {
            status: SmsStatus::Success,
            message_id: Some(123),
            message: "ok".to_string(),
        };
        assert!(ok.is_success());

        let rejected = SmsSendResponse {
            status: SmsStatus::InsufficientCredit,
            message_id: None,
            message: "no credit".to_string(),
        };
        assert!(!rejected.is_success());
    }
}
