//! Handler for POST /api/v1/auth/verify-otp

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use gp_core::domain::value_objects::device::DeviceInfo;
use gp_core::errors::DomainError;
use gp_core::repositories::{SessionRepository, UserRepository};
use gp_core::services::cache::CacheStore;
use gp_core::services::rate_limit::{FailurePolicy, RateLimitDecision};
use gp_core::services::sms::SmsGateway;
use gp_shared::types::response::ApiResponse;
use gp_shared::utils::phone::mask_phone_number;

use crate::dto::auth::{UserDto, VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::error::error_response;

use super::AppState;

/// Endpoint guard: five verification requests per phone per minute
const RATE_LIMIT_PREFIX: &str = "verify_otp";
const RATE_LIMIT_MAX: u32 = 5;
const RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

/// Verify an OTP and open a session.
///
/// Public endpoint. On success the response carries the opaque session
/// token; it is shown exactly once and cannot be retrieved again.
pub async fn verify_otp<U, R, C, S>(
    req: HttpRequest,
    state: web::Data<AppState<U, R, C, S>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    C: CacheStore + 'static,
    S: SmsGateway + 'static,
{
    if request.validate().is_err() {
        return error_response(
            &DomainError::Validation {
                message: "Invalid phone number or code format".to_string(),
            },
            state.environment,
        );
    }

    let decision = state
        .limiter
        .check_and_consume(
            RATE_LIMIT_PREFIX,
            &request.phone,
            RATE_LIMIT_MAX,
            RATE_LIMIT_WINDOW_SECONDS,
            FailurePolicy::FailOpen,
        )
        .await;

    if let RateLimitDecision::Blocked {
        retry_after_seconds,
    } = decision
    {
        return error_response(
            &DomainError::RateLimited {
                retry_after_seconds,
            },
            state.environment,
        );
    }

    let device_info = extract_device_info(&req, &request);

    match state
        .auth_service
        .verify_otp(&request.phone, &request.code, device_info)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(ApiResponse::success(VerifyOtpResponse {
            user: UserDto::from(&outcome.user),
            token: outcome.token,
            expires_at: outcome.session.expires_at,
        })),
        Err(error) => {
            log::warn!(
                "OTP verification failed for {}: {}",
                mask_phone_number(&request.phone),
                error
            );
            error_response(&error, state.environment)
        }
    }
}

/// Combine request headers with any client-supplied device metadata
///
/// Body values take precedence over headers, matching what a native app
/// reporting its own identity expects.
fn extract_device_info(req: &HttpRequest, request: &VerifyOtpRequest) -> DeviceInfo {
    let header_user_agent = req
        .headers()
        .get("User-Agent")
        .and_then(|ua| ua.to_str().ok())
        .map(|s| s.to_string());

    let peer_ip = req.connection_info().realip_remote_addr().map(|s| s.to_string());

    let (user_agent, ip) = match &request.device_info {
        Some(info) => (
            info.user_agent.clone().or(header_user_agent),
            info.ip.clone().or(peer_ip),
        ),
        None => (header_user_agent, peer_ip),
    };

    DeviceInfo::from_parts(user_agent, ip)
}
