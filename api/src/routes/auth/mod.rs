//! Authentication routes

mod logout;
mod send_otp;
mod sessions;
mod verify_otp;

pub use logout::{logout, logout_all};
pub use send_otp::send_otp;
pub use sessions::{delete_session, list_sessions};
pub use verify_otp::verify_otp;

use std::sync::Arc;

use gp_core::repositories::{SessionRepository, UserRepository};
use gp_core::services::auth::AuthService;
use gp_core::services::cache::CacheStore;
use gp_core::services::rate_limit::FixedWindowLimiter;
use gp_core::services::sms::SmsGateway;
use gp_shared::config::Environment;

/// Application state shared by the handlers
pub struct AppState<U, R, C, S>
where
    U: UserRepository,
    R: SessionRepository,
    C: CacheStore,
    S: SmsGateway,
{
    /// Authentication service
    pub auth_service: Arc<AuthService<U, R, C, S>>,
    /// Generic endpoint rate limiter
    pub limiter: Arc<FixedWindowLimiter<C>>,
    /// Runtime environment, controls error detail exposure
    pub environment: Environment,
}
