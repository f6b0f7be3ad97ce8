//! GoalPoll API server entry point
//!
//! Composition root: every client (database pool, Redis, SMS gateway) and
//! every service is constructed here and passed down by reference; no
//! module-level singletons.

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use gp_core::services::auth::{AuthService, AuthServiceConfig};
use gp_core::services::otp::OtpService;
use gp_core::services::rate_limit::FixedWindowLimiter;
use gp_core::services::session::{SessionCleanupService, SessionService};
use gp_infra::cache::RedisClient;
use gp_infra::database::mysql::{MySqlSessionRepository, MySqlUserRepository};
use gp_infra::database::DatabasePool;
use gp_infra::sms::SmsIrGateway;
use gp_shared::config::AppConfig;

use gp_api::app::create_app;
use gp_api::middleware::auth::SessionValidator;
use gp_api::routes::auth::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!(
        "Starting GoalPoll API server ({} environment)",
        config.environment
    );

    // External clients
    let db = DatabasePool::new(config.database.clone())
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let cache = Arc::new(
        RedisClient::new(config.cache.clone())
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?,
    );
    let sms = Arc::new(
        SmsIrGateway::new(config.sms.clone())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?,
    );

    // Repositories
    let users = Arc::new(MySqlUserRepository::new(db.pool().clone()));
    let sessions = Arc::new(MySqlSessionRepository::new(db.pool().clone()));

    // Services
    let otp_service = OtpService::new(cache.clone(), config.otp.clone());
    let session_service = SessionService::new(
        sessions.clone(),
        users.clone(),
        cache.clone(),
        config.session.clone(),
    );
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        otp_service,
        session_service,
        sms,
        AuthServiceConfig {
            sandbox: config.sms.sandbox,
            expose_otp_code: !config.environment.is_production(),
        },
    ));
    let limiter = Arc::new(FixedWindowLimiter::new(cache.clone()));

    // Periodic expired-session sweep
    let cleanup = Arc::new(SessionCleanupService::new(
        sessions.clone(),
        config.session.cleanup_interval_seconds,
        config.session.cleanup_enabled,
    ));
    cleanup.start_background_task();

    let app_state = web::Data::new(AppState {
        auth_service: auth_service.clone(),
        limiter,
        environment: config.environment,
    });
    let validator: Arc<dyn SessionValidator> = auth_service;

    let bind_address = config.server.bind_address();
    info!("Server listening on {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone(), validator.clone()))
        .bind(&bind_address)?
        .run()
        .await
}
