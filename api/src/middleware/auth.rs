//! Session authentication middleware for protecting API endpoints.
//!
//! Routes wrapped by this middleware require an `Authorization: Bearer
//! <token>` header. The token is resolved through the session service;
//! the resolved user and session are injected into request extensions
//! for handlers to extract. Routes that are not wrapped are public and
//! never touch token resolution.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use gp_core::domain::entities::session::Session;
use gp_core::domain::entities::user::User;
use gp_core::errors::DomainResult;
use gp_core::repositories::{SessionRepository, UserRepository};
use gp_core::services::auth::AuthService;
use gp_core::services::cache::CacheStore;
use gp_core::services::sms::SmsGateway;
use gp_shared::types::response::{ApiResponse, ErrorBody};

/// Authenticated request context injected by the middleware
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user
    pub user: User,
    /// The session the presented token resolved to
    pub session: Session,
}

/// Object-safe view of token validation for the middleware
///
/// Keeps the middleware free of the service's generic parameters.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Resolve a bearer token to its user and session
    async fn resolve(&self, token: &str) -> DomainResult<AuthContext>;
}

#[async_trait]
impl<U, R, C, S> SessionValidator for AuthService<U, R, C, S>
where
    U: UserRepository,
    R: SessionRepository,
    C: CacheStore,
    S: SmsGateway,
{
    async fn resolve(&self, token: &str) -> DomainResult<AuthContext> {
        let (user, session) = self.validate_token(token).await?;
        Ok(AuthContext { user, session })
    }
}

/// Session authentication middleware factory
pub struct SessionAuth {
    validator: Arc<dyn SessionValidator>,
}

impl SessionAuth {
    /// Create the middleware around a token validator
    pub fn new(validator: Arc<dyn SessionValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            validator: self.validator.clone(),
        }))
    }
}

/// Session authentication middleware service
pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    validator: Arc<dyn SessionValidator>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let validator = Arc::clone(&self.validator);

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Ok(unauthorized_response(
                        req,
                        "UNAUTHORIZED",
                        "Authentication token is required",
                    ));
                }
            };

            match validator.resolve(&token).await {
                Ok(context) => {
                    req.extensions_mut().insert(context);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(e) => {
                    log::warn!("Token validation failed: {}", e);
                    Ok(unauthorized_response(
                        req,
                        "INVALID_TOKEN",
                        "Invalid or expired authentication token",
                    ))
                }
            }
        })
    }
}

/// Extracts the Bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Build a 401 response without invoking the wrapped service
fn unauthorized_response<B>(
    req: ServiceRequest,
    code: &str,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let body = ApiResponse::<()>::error(ErrorBody::new(code, message, 401));
    req.into_response(HttpResponse::Unauthorized().json(body))
        .map_into_right_body()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            let body = ApiResponse::<()>::error(ErrorBody::new(
                "UNAUTHORIZED",
                "Authentication required",
                401,
            ));
            InternalError::from_response(
                "Authentication required",
                HttpResponse::Unauthorized().json(body),
            )
            .into()
        });

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(
            extract_bearer_token(&req),
            Some("test_token_123".to_string())
        );

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }
}
