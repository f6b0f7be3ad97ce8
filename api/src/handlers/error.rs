//! Mapping from domain errors to HTTP responses
//!
//! Every expected outcome carries a stable machine-readable code and a
//! status category. Internal errors are detail-suppressed outside of
//! development: the log gets the full story, the client a generic message.

use actix_web::HttpResponse;

use gp_core::errors::{DomainError, OtpError, SmsError};
use gp_shared::config::Environment;
use gp_shared::types::response::{ApiResponse, ErrorBody};

/// Translate a domain error into a structured HTTP response
pub fn error_response(err: &DomainError, environment: Environment) -> HttpResponse {
    let body = error_body(err, environment);

    let mut builder = match body.status_code {
        400 => HttpResponse::BadRequest(),
        401 => HttpResponse::Unauthorized(),
        404 => HttpResponse::NotFound(),
        429 => HttpResponse::TooManyRequests(),
        502 => HttpResponse::BadGateway(),
        _ => HttpResponse::InternalServerError(),
    };

    builder.json(ApiResponse::<()>::error(body))
}

fn error_body(err: &DomainError, environment: Environment) -> ErrorBody {
    match err {
        DomainError::Validation { message } => {
            ErrorBody::new("VALIDATION_ERROR", message.clone(), 400)
        }

        DomainError::NotFound { resource } => {
            ErrorBody::new("NOT_FOUND", format!("{} not found", resource), 404)
        }

        DomainError::Unauthorized => ErrorBody::new(
            "UNAUTHORIZED",
            "Invalid or expired authentication token",
            401,
        ),

        DomainError::RateLimited {
            retry_after_seconds,
        } => ErrorBody::new(
            "RATE_LIMIT_EXCEEDED",
            format!(
                "Too many requests. Please try again in {} seconds",
                retry_after_seconds
            ),
            429,
        )
        .with_retry_after(*retry_after_seconds),

        DomainError::Otp(otp) => otp_error_body(otp),

        DomainError::Sms(sms) => match sms {
            SmsError::SendRejected { .. } | SmsError::GatewayUnreachable { .. } => {
                ErrorBody::new("SMS_SEND_FAILED", "Failed to send SMS", 502)
            }
        },

        DomainError::Internal { message } => {
            let exposed = if environment.is_development() {
                message.clone()
            } else {
                "Internal server error".to_string()
            };
            ErrorBody::new("INTERNAL_ERROR", exposed, 500)
        }
    }
}

fn otp_error_body(err: &OtpError) -> ErrorBody {
    match err {
        OtpError::SendCooldownActive {
            retry_after_seconds,
        } => ErrorBody::new(
            "OTP_SEND_LIMIT_EXCEEDED",
            format!(
                "Please wait {} seconds before requesting a new OTP",
                retry_after_seconds
            ),
            429,
        )
        .with_retry_after(*retry_after_seconds),

        OtpError::ChallengeNotFound => ErrorBody::new(
            "OTP_NOT_FOUND",
            "No OTP found. Please request one first",
            404,
        ),

        OtpError::ChallengeExpired => ErrorBody::new(
            "OTP_EXPIRED",
            "OTP has expired. Please request a new one",
            400,
        ),

        OtpError::CodeMismatch { remaining_attempts } => {
            ErrorBody::new("OTP_INVALID", "Invalid OTP code", 400)
                .with_remaining_attempts(*remaining_attempts)
        }

        OtpError::AttemptsExhausted => ErrorBody::new(
            "OTP_VERIFY_LIMIT_EXCEEDED",
            "Too many verification attempts. Please request a new OTP",
            429,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_errors_map_to_stable_codes() {
        let cases = [
            (
                DomainError::Otp(OtpError::SendCooldownActive {
                    retry_after_seconds: 90,
                }),
                "OTP_SEND_LIMIT_EXCEEDED",
                429,
            ),
            (
                DomainError::Otp(OtpError::ChallengeNotFound),
                "OTP_NOT_FOUND",
                404,
            ),
            (
                DomainError::Otp(OtpError::ChallengeExpired),
                "OTP_EXPIRED",
                400,
            ),
            (
                DomainError::Otp(OtpError::CodeMismatch {
                    remaining_attempts: 2,
                }),
                "OTP_INVALID",
                400,
            ),
            (
                DomainError::Otp(OtpError::AttemptsExhausted),
                "OTP_VERIFY_LIMIT_EXCEEDED",
                429,
            ),
        ];

        for (err, code, status) in cases {
            let body = error_body(&err, Environment::Production);
            assert_eq!(body.code, code);
            assert_eq!(body.status_code, status);
        }
    }

    #[test]
    fn test_cooldown_carries_retry_after() {
        let err = DomainError::Otp(OtpError::SendCooldownActive {
            retry_after_seconds: 90,
        });
        let body = error_body(&err, Environment::Production);
        assert_eq!(body.retry_after, Some(90));
    }

    #[test]
    fn test_mismatch_carries_remaining_attempts() {
        let err = DomainError::Otp(OtpError::CodeMismatch {
            remaining_attempts: 3,
        });
        let body = error_body(&err, Environment::Production);
        assert_eq!(body.remaining_attempts, Some(3));
    }

    #[test]
    fn test_internal_errors_are_suppressed_in_production() {
        let err = DomainError::Internal {
            message: "connection pool exhausted".to_string(),
        };

        let prod = error_body(&err, Environment::Production);
        assert_eq!(prod.message, "Internal server error");

        let dev = error_body(&err, Environment::Development);
        assert!(dev.message.contains("connection pool exhausted"));
    }
}
