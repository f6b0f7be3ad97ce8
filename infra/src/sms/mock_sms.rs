//! Mock SMS gateway for local development
//!
//! Accepts every message and logs the code instead of delivering it. Wire
//! this in when no gateway credentials are configured.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::info;

use gp_core::errors::DomainResult;
use gp_core::services::sms::{SmsGateway, SmsSendResponse, SmsStatus};

/// SMS gateway that logs instead of sending
#[derive(Default)]
pub struct MockSmsGateway {
    next_message_id: AtomicI64,
}

impl MockSmsGateway {
    /// Create a new mock gateway
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SmsGateway for MockSmsGateway {
    async fn send(&self, mobile: &str, code: &str) -> DomainResult<SmsSendResponse> {
        let message_id = self.next_message_id.fetch_add(1, Ordering::Relaxed);

        info!(
            mobile = mobile,
            code = code,
            message_id = message_id,
            event = "mock_sms_send",
            "Mock SMS gateway delivering code"
        );

        Ok(SmsSendResponse {
            status: SmsStatus::Success,
            message_id: Some(message_id),
            message: "mock delivery".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway_accepts_everything() {
        let gateway = MockSmsGateway::new();

        let first = gateway.send("9123456789", "123456").await.unwrap();
        let second = gateway.send("9123456789", "654321").await.unwrap();

        assert!(first.is_success());
        assert!(second.is_success());
        assert_ne!(first.message_id, second.message_id);
    }
}
