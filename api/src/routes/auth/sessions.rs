//! Handlers for GET /api/v1/auth/sessions and DELETE /api/v1/auth/sessions/{id}

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use gp_core::errors::DomainError;
use gp_core::repositories::{SessionRepository, UserRepository};
use gp_core::services::cache::CacheStore;
use gp_core::services::sms::SmsGateway;
use gp_shared::types::response::ApiResponse;

use crate::dto::auth::{SessionDto, SessionListResponse};
use crate::handlers::error::error_response;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// List the active sessions of the authenticated user.
pub async fn list_sessions<U, R, C, S>(
    state: web::Data<AppState<U, R, C, S>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    C: CacheStore + 'static,
    S: SmsGateway + 'static,
{
    match state.auth_service.user_sessions(auth.user.id).await {
        Ok(sessions) => {
            let sessions: Vec<SessionDto> = sessions.iter().map(SessionDto::from).collect();
            let total = sessions.len();
            HttpResponse::Ok().json(ApiResponse::success(SessionListResponse {
                sessions,
                total,
            }))
        }
        Err(error) => error_response(&error, state.environment),
    }
}

/// Delete one of the authenticated user's sessions.
///
/// Sessions owned by other users are reported as not found rather than
/// forbidden, so the endpoint does not leak which session ids exist.
pub async fn delete_session<U, R, C, S>(
    state: web::Data<AppState<U, R, C, S>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    C: CacheStore + 'static,
    S: SmsGateway + 'static,
{
    let session_id = path.into_inner();

    match state
        .auth_service
        .delete_session(auth.user.id, session_id)
        .await
    {
        Ok(true) => HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
            "message": "Session deleted successfully"
        }))),
        Ok(false) => error_response(
            &DomainError::NotFound {
                resource: "Session".to_string(),
            },
            state.environment,
        ),
        Err(error) => error_response(&error, state.environment),
    }
}
