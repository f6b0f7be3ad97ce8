//! End-to-end tests of the authentication HTTP surface
//!
//! The full login flow runs against in-memory repositories and cache with
//! the mock SMS gateway; issued codes are read back from the send-otp
//! response, which exposes them outside production.

use std::sync::Arc;

use actix_web::{test, web};
use serde_json::Value;

use gp_api::app::create_app;
use gp_api::middleware::auth::SessionValidator;
use gp_api::routes::auth::AppState;
use gp_core::repositories::{MockSessionRepository, MockUserRepository};
use gp_core::services::auth::{AuthService, AuthServiceConfig};
use gp_core::services::cache::MemoryCacheStore;
use gp_core::services::otp::OtpService;
use gp_core::services::rate_limit::FixedWindowLimiter;
use gp_core::services::session::SessionService;
use gp_infra::sms::MockSmsGateway;
use gp_shared::config::{Environment, OtpConfig, SessionConfig};

const PHONE: &str = "09123456789";

type TestState =
    AppState<MockUserRepository, MockSessionRepository, MemoryCacheStore, MockSmsGateway>;

fn test_state() -> (web::Data<TestState>, Arc<dyn SessionValidator>) {
    let users = Arc::new(MockUserRepository::new());
    let sessions = Arc::new(MockSessionRepository::new());
    let cache = Arc::new(MemoryCacheStore::new());
    let sms = Arc::new(MockSmsGateway::new());

    let otp_service = OtpService::new(cache.clone(), OtpConfig::default());
    let session_service = SessionService::new(
        sessions,
        users.clone(),
        cache.clone(),
        SessionConfig::default(),
    );
    let auth_service = Arc::new(AuthService::new(
        users,
        otp_service,
        session_service,
        sms,
        AuthServiceConfig {
            sandbox: true,
            expose_otp_code: true,
        },
    ));

    let state = web::Data::new(AppState {
        auth_service: auth_service.clone(),
        limiter: Arc::new(FixedWindowLimiter::new(cache)),
        environment: Environment::Development,
    });

    (state, auth_service)
}

#[actix_rt::test]
async fn test_full_login_flow() {
    let (state, validator) = test_state();
    let app = test::init_service(create_app(state, validator)).await;

    // Request a code
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/send-otp")
        .set_json(serde_json::json!({ "phone": PHONE }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    let code = body["data"]["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);

    // Exchange it for a token
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-otp")
        .insert_header(("User-Agent", "Mozilla/5.0 (Windows NT 10.0) Chrome/119.0"))
        .set_json(serde_json::json!({ "phone": PHONE, "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["phone"], PHONE);

    // The token authenticates
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/sessions")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["sessions"][0]["platform"], "Windows");

    // Logout invalidates it
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/sessions")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_rt::test]
async fn test_verify_twice_reports_not_found() {
    let (state, validator) = test_state();
    let app = test::init_service(create_app(state, validator)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/send-otp")
        .set_json(serde_json::json!({ "phone": PHONE }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let code = body["data"]["code"].as_str().unwrap().to_string();

    let verify = serde_json::json!({ "phone": PHONE, "code": code });

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-otp")
        .set_json(verify.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // The challenge was consumed, repeating the same code fails
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/verify-otp")
        .set_json(verify)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "OTP_NOT_FOUND");
}

#[actix_rt::test]
async fn test_send_otp_rejects_invalid_phone() {
    let (state, validator) = test_state();
    let app = test::init_service(create_app(state, validator)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/send-otp")
        .set_json(serde_json::json!({ "phone": "12345" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_send_otp_twice_hits_cooldown() {
    let (state, validator) = test_state();
    let app = test::init_service(create_app(state, validator)).await;

    let payload = serde_json::json!({ "phone": PHONE });

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/send-otp")
        .set_json(payload.clone())
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/send-otp")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 429);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]["retry_after"].as_i64().unwrap() > 0);
}

#[actix_rt::test]
async fn test_protected_routes_require_bearer_token() {
    let (state, validator) = test_state();
    let app = test::init_service(create_app(state, validator)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/sessions")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(("Authorization", "Bearer bogus-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_rt::test]
async fn test_health_check_is_public() {
    let (state, validator) = test_state();
    let app = test::init_service(create_app(state, validator)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}
