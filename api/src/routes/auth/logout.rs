//! Handlers for POST /api/v1/auth/logout and POST /api/v1/auth/logout-all

use actix_web::{web, HttpResponse};

use gp_core::repositories::{SessionRepository, UserRepository};
use gp_core::services::cache::CacheStore;
use gp_core::services::sms::SmsGateway;
use gp_shared::types::response::ApiResponse;

use crate::dto::auth::{LogoutAllResponse, LogoutResponse};
use crate::handlers::error::error_response;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Invalidate the session the request was authenticated with.
pub async fn logout<U, R, C, S>(
    state: web::Data<AppState<U, R, C, S>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    C: CacheStore + 'static,
    S: SmsGateway + 'static,
{
    match state.auth_service.logout(auth.session.id).await {
        Ok(_) => HttpResponse::Ok().json(ApiResponse::success(LogoutResponse {
            message: "Logged out successfully".to_string(),
        })),
        Err(error) => error_response(&error, state.environment),
    }
}

/// Invalidate every session of the authenticated user.
pub async fn logout_all<U, R, C, S>(
    state: web::Data<AppState<U, R, C, S>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    C: CacheStore + 'static,
    S: SmsGateway + 'static,
{
    match state.auth_service.logout_all(auth.user.id).await {
        Ok(count) => HttpResponse::Ok().json(ApiResponse::success(LogoutAllResponse {
            sessions_closed: count,
        })),
        Err(error) => error_response(&error, state.environment),
    }
}
