//! SMS.ir gateway client
//!
//! Posts template-based verification messages to the SMS.ir API. The
//! request carries a bounded timeout; transport failures (connection
//! refused, timeout) are reported as a `ServerError` response so the
//! caller decides between sandbox tolerance and an upstream failure.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

use gp_core::errors::DomainResult;
use gp_core::services::sms::{SmsGateway, SmsSendResponse, SmsStatus};
use gp_shared::config::SmsConfig;

use crate::InfrastructureError;

/// Request timeout for gateway calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    mobile: &'a str,
    template_id: i64,
    parameters: Vec<TemplateParameter<'a>>,
}

#[derive(Debug, Serialize)]
struct TemplateParameter<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    status: i64,
    message: String,
    data: Option<SendResponseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponseData {
    message_id: i64,
    #[allow(dead_code)]
    cost: f64,
}

/// SMS.ir gateway client
pub struct SmsIrGateway {
    http: reqwest::Client,
    config: SmsConfig,
}

impl SmsIrGateway {
    /// Create a new gateway client
    pub fn new(config: SmsConfig) -> Result<Self, InfrastructureError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&config.api_key)
                .map_err(|e| InfrastructureError::Config(format!("Invalid SMS API key: {}", e)))?,
        );

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                InfrastructureError::Config(format!("Failed to build HTTP client: {}", e))
            })?;

        info!(sandbox = config.sandbox, "SMS gateway client initialized");

        Ok(Self { http, config })
    }
}

#[async_trait]
impl SmsGateway for SmsIrGateway {
    async fn send(&self, mobile: &str, code: &str) -> DomainResult<SmsSendResponse> {
        let request = SendRequest {
            mobile,
            template_id: self.config.template_id,
            parameters: vec![TemplateParameter {
                name: "Code",
                value: code,
            }],
        };

        let response = match self.http.post(&self.config.api_url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, event = "sms_transport_error", "SMS gateway unreachable");
                return Ok(SmsSendResponse {
                    status: SmsStatus::ServerError,
                    message_id: None,
                    message: format!("Gateway unreachable: {}", e),
                });
            }
        };

        let body: SendResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, event = "sms_bad_response", "Unreadable SMS gateway response");
                return Ok(SmsSendResponse {
                    status: SmsStatus::ServerError,
                    message_id: None,
                    message: format!("Unreadable gateway response: {}", e),
                });
            }
        };

        let status = SmsStatus::from_code(body.status);
        if status != SmsStatus::Success {
            warn!(
                status = ?status,
                wire_status = body.status,
                message = %body.message,
                event = "sms_rejected",
                "SMS gateway returned non-success status"
            );
        }

        Ok(SmsSendResponse {
            status,
            message_id: body.data.map(|d| d.message_id),
            message: body.message,
        })
    }
}
