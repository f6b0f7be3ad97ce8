//! SMS gateway configuration

use serde::{Deserialize, Serialize};

/// Configuration for the SMS gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Gateway endpoint URL
    pub api_url: String,

    /// API key sent with every request
    pub api_key: String,

    /// Template id for the OTP message
    pub template_id: i64,

    /// Sandbox mode: delivery failures are tolerated and the code is
    /// still returned to the caller so flows can be tested
    pub sandbox: bool,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            api_url: String::from("https://api.sms.ir/v1/send/verify"),
            api_key: String::new(),
            template_id: 0,
            sandbox: true,
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("SMS_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("SMS_API_KEY").unwrap_or_default(),
            template_id: std::env::var("SMS_TEMPLATE_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.template_id),
            sandbox: std::env::var("SMS_SANDBOX")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.sandbox),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sms_config_default_is_sandbox() {
        let config = SmsConfig::default();
        assert!(config.sandbox);
        assert!(config.api_key.is_empty());
    }
}
