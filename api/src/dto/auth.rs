//! Authentication request and response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use gp_core::domain::entities::session::Session;
use gp_core::domain::entities::user::User;
use gp_shared::utils::phone::is_valid_iran_mobile;

/// Field validator for Iranian mobile numbers
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_iran_mobile(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Iranian mobile number, e.g. "09123456789"
    #[validate(custom = "validate_phone")]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    /// Iranian mobile number, e.g. "09123456789"
    #[validate(custom = "validate_phone")]
    pub phone: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,

    /// Optional client-supplied device metadata
    pub device_info: Option<DeviceInfoDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfoDto {
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub phone: String,
    /// Provider message id when delivery was accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i64>,
    /// The issued code, exposed only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            phone: user.phone.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub user: UserDto,
    /// Opaque bearer token; shown exactly once
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDto {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl From<&Session> for SessionDto {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            platform: session.device_info.platform.clone(),
            browser: session.device_info.browser.clone(),
            ip: session.device_info.ip.clone(),
            created_at: session.created_at,
            last_used_at: session.last_used_at,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutAllResponse {
    pub sessions_closed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_otp_request_validation() {
        let valid = SendOtpRequest {
            phone: "09123456789".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = SendOtpRequest {
            phone: "12345".to_string(),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_verify_otp_request_validation() {
        let valid = VerifyOtpRequest {
            phone: "09123456789".to_string(),
            code: "482913".to_string(),
            device_info: None,
        };
        assert!(valid.validate().is_ok());

        let short_code = VerifyOtpRequest {
            phone: "09123456789".to_string(),
            code: "4829".to_string(),
            device_info: None,
        };
        assert!(short_code.validate().is_err());
    }
}
