//! Application factory
//!
//! Builds the actix application with its routes and middleware. The
//! send/verify endpoints are public; everything under the session scope is
//! wrapped by the authentication middleware.

use actix_web::{middleware::Logger, web, App, HttpResponse};
use std::sync::Arc;

use gp_core::repositories::{SessionRepository, UserRepository};
use gp_core::services::cache::CacheStore;
use gp_core::services::sms::SmsGateway;
use gp_shared::types::response::{ApiResponse, ErrorBody};

use crate::middleware::auth::{SessionAuth, SessionValidator};
use crate::middleware::cors::create_cors;
use crate::routes::auth::{
    delete_session, list_sessions, logout, logout_all, send_otp, verify_otp, AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app<U, R, C, S>(
    app_state: web::Data<AppState<U, R, C, S>>,
    validator: Arc<dyn SessionValidator>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    R: SessionRepository + 'static,
    C: CacheStore + 'static,
    S: SmsGateway + 'static,
{
    let environment = app_state.environment;

    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .wrap(create_cors(environment))
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1/auth")
                // Public endpoints
                .route("/send-otp", web::post().to(send_otp::<U, R, C, S>))
                .route("/verify-otp", web::post().to(verify_otp::<U, R, C, S>))
                // Bearer-protected endpoints
                .service(
                    web::scope("")
                        .wrap(SessionAuth::new(validator))
                        .route("/sessions", web::get().to(list_sessions::<U, R, C, S>))
                        .route(
                            "/sessions/{id}",
                            web::delete().to(delete_session::<U, R, C, S>),
                        )
                        .route("/logout", web::post().to(logout::<U, R, C, S>))
                        .route("/logout-all", web::post().to(logout_all::<U, R, C, S>)),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "goalpoll-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(ErrorBody::new(
        "NOT_FOUND",
        "The requested resource does not exist",
        404,
    )))
}
