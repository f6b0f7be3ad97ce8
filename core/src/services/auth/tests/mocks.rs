//! Mock SMS gateway for authentication service tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::errors::DomainResult;
use crate::services::sms::{SmsGateway, SmsSendResponse, SmsStatus};

/// Mock SMS gateway recording sent codes
pub struct MockSmsGateway {
    /// Status returned by every send
    status: SmsStatus,
    /// (mobile, code) pairs in send order
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockSmsGateway {
    /// Gateway that accepts every message
    pub fn accepting() -> Self {
        Self {
            status: SmsStatus::Success,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Gateway that rejects every message with the given status
    pub fn rejecting(status: SmsStatus) -> Self {
        Self {
            status,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The code last handed to the gateway for a mobile number
    pub fn last_code_for(&self, mobile: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(m, _)| m == mobile)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl SmsGateway for MockSmsGateway {
    async fn send(&self, mobile: &str, code: &str) -> DomainResult<SmsSendResponse> {
        self.sent
            .lock()
            .unwrap()
            .push((mobile.to_string(), code.to_string()));

        Ok(match self.status {
            SmsStatus::Success => SmsSendResponse {
                status: SmsStatus::Success,
                message_id: Some(4242),
                message: "mock delivery".to_string(),
            },
            status => SmsSendResponse {
                status,
                message_id: None,
                message: "mock rejection".to_string(),
            },
        })
    }
}
