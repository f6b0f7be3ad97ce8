//! Handler for POST /api/v1/auth/send-otp

use actix_web::{web, HttpResponse};
use validator::Validate;

use gp_core::errors::DomainError;
use gp_core::repositories::{SessionRepository, UserRepository};
use gp_core::services::cache::CacheStore;
use gp_core::services::rate_limit::{FailurePolicy, RateLimitDecision};
use gp_core::services::sms::SmsGateway;
use gp_shared::types::response::ApiResponse;
use gp_shared::utils::phone::mask_phone_number;

use crate::dto::auth::{SendOtpRequest, SendOtpResponse};
use crate::handlers::error::error_response;

use super::AppState;

/// Endpoint guard: one send per phone per cooldown window
const RATE_LIMIT_PREFIX: &str = "send_otp";
const RATE_LIMIT_MAX: u32 = 1;
const RATE_LIMIT_WINDOW_SECONDS: u64 = 120;

/// Issue an OTP and deliver it via SMS.
///
/// Public endpoint. Rate limited to one request per two minutes per phone
/// number on top of the OTP service's own cooldown; the limiter fails open
/// so a cache outage degrades enforcement, not availability.
pub async fn send_otp<U, R, C, S>(
    state: web::Data<AppState<U, R, C, S>>,
    request: web::Json<SendOtpRequest>,
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
                message: "Phone number must be a valid Iranian mobile number".to_string(),
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

    log::info!(
        "Sending OTP to {}",
        mask_phone_number(&request.phone)
    );

    match state.auth_service.send_otp(&request.phone).await {
        Ok(outcome) => HttpResponse::Ok().json(ApiResponse::success(SendOtpResponse {
            phone: outcome.phone,
            message_id: outcome.message_id,
            code: outcome.code,
        })),
        Err(error) => {
            log::warn!(
                "Failed to send OTP to {}: {}",
                mask_phone_number(&request.phone),
                error
            );
            error_response(&error, state.environment)
        }
    }
}
