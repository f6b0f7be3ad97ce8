//! Authentication service implementation
//!
//! Orchestrates the OTP service, the SMS gateway and the session service
//! into the two authentication flows: requesting a code and exchanging a
//! verified code for a session token. Users are created lazily on their
//! first successful verification.

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use gp_shared::utils::phone::{is_valid_iran_mobile, mask_phone_number, normalize_for_gateway};

use crate::domain::entities::session::Session;
use crate::domain::entities::user::User;
use crate::domain::value_objects::device::DeviceInfo;
use crate::errors::{DomainError, DomainResult, SmsError};
use crate::repositories::{SessionRepository, UserRepository};
use crate::services::cache::CacheStore;
use crate::services::otp::OtpService;
use crate::services::session::SessionService;
use crate::services::sms::SmsGateway;

/// Behavior switches derived from the runtime environment
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Tolerate gateway failures and keep returning the code (sandbox)
    pub sandbox: bool,
    /// Include the issued code in the send outcome (non-production only)
    pub expose_otp_code: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            sandbox: true,
            expose_otp_code: true,
        }
    }
}

/// Outcome of a send-otp request
#[derive(Debug, Clone)]
pub struct SendOtpOutcome {
    /// Phone the code was issued for
    pub phone: String,
    /// Provider message id when delivery was accepted
    pub message_id: Option<i64>,
    /// The issued code, present only outside production or in sandbox mode
    pub code: Option<String>,
}

/// Outcome of a successful verify-otp request
#[derive(Debug, Clone)]
pub struct VerifyOtpOutcome {
    /// The (possibly newly created) user
    pub user: User,
    /// Plaintext session token, returned exactly once
    pub token: String,
    /// The created session
    pub session: Session,
}

/// Service orchestrating the authentication flows
pub struct AuthService<U, R, C, S>
where
    U: UserRepository,
    R: SessionRepository,
    C: CacheStore,
    S: SmsGateway,
{
    users: Arc<U>,
    otp: OtpService<C>,
    sessions: SessionService<R, U, C>,
    sms: Arc<S>,
    config: AuthServiceConfig,
}

impl<U, R, C, S> AuthService<U, R, C, S>
where
    U: UserRepository,
    R: SessionRepository,
    C: CacheStore,
    S: SmsGateway,
{
    /// Create a new authentication service
    pub fn new(
        users: Arc<U>,
        otp: OtpService<C>,
        sessions: SessionService<R, U, C>,
        sms: Arc<S>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            otp,
            sessions,
            sms,
            config,
        }
    }

    /// Issue an OTP and hand it to the SMS gateway
    ///
    /// Gateway rejections are tolerated only in sandbox mode, where the
    /// code is still returned so flows can be tested without delivery; in
    /// production they surface as an upstream failure.
    pub async fn send_otp(&self, phone: &str) -> DomainResult<SendOtpOutcome> {
        if !is_valid_iran_mobile(phone) {
            return Err(DomainError::Validation {
                message: format!("Invalid phone number: {}", mask_phone_number(phone)),
            });
        }

        let code = self.otp.issue(phone).await?;

        let mobile = normalize_for_gateway(phone);
        let response = self.sms.send(&mobile, &code).await?;

        if !response.is_success() {
            if self.config.sandbox {
                warn!(
                    phone = %mask_phone_number(phone),
                    status = ?response.status,
                    event = "sms_failed_sandbox",
                    "SMS delivery failed, tolerated in sandbox mode"
                );
                return Ok(SendOtpOutcome {
                    phone: phone.to_string(),
                    message_id: None,
                    code: Some(code),
                });
            }

            error!(
                phone = %mask_phone_number(phone),
                status = ?response.status,
                message = %response.message,
                event = "sms_failed",
                "SMS delivery failed"
            );
            return Err(SmsError::SendRejected {
                status: response.status,
            }
            .into());
        }

        info!(
            phone = %mask_phone_number(phone),
            message_id = ?response.message_id,
            event = "otp_sent",
            "OTP sent"
        );

        Ok(SendOtpOutcome {
            phone: phone.to_string(),
            message_id: response.message_id,
            code: self.config.expose_otp_code.then_some(code),
        })
    }

    /// Verify an OTP and open a session
    ///
    /// A first-time phone creates its user on the spot; a deactivated user
    /// cannot log in even with a correct code.
    pub async fn verify_otp(
        &self,
        phone: &str,
        code: &str,
        device_info: DeviceInfo,
    ) -> DomainResult<VerifyOtpOutcome> {
        if !is_valid_iran_mobile(phone) {
            return Err(DomainError::Validation {
                message: format!("Invalid phone number: {}", mask_phone_number(phone)),
            });
        }
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::Validation {
                message: "Code must be numeric".to_string(),
            });
        }

        self.otp.verify(phone, code).await?;

        let user = match self.users.find_by_phone(phone).await? {
            Some(user) => user,
            None => {
                let user = self.users.create(User::new(phone)).await?;
                info!(
                    user_id = %user.id,
                    phone = %mask_phone_number(phone),
                    event = "user_created",
                    "New user registered"
                );
                user
            }
        };

        if !user.is_active {
            warn!(
                user_id = %user.id,
                event = "login_blocked_inactive",
                "Login attempt by deactivated user"
            );
            return Err(DomainError::Unauthorized);
        }

        let (token, session) = self.sessions.create_session(&user, device_info).await?;

        Ok(VerifyOtpOutcome {
            user,
            token,
            session,
        })
    }

    /// Resolve a bearer token to its user and session
    pub async fn validate_token(&self, token: &str) -> DomainResult<(User, Session)> {
        self.sessions.validate_token(token).await
    }

    /// List the active sessions of a user
    pub async fn user_sessions(&self, user_id: Uuid) -> DomainResult<Vec<Session>> {
        self.sessions.list_sessions(user_id).await
    }

    /// Delete a session on behalf of its owner
    ///
    /// # Returns
    /// * `Ok(true)` - Session belonged to the user and was invalidated
    /// * `Ok(false)` - No such session, or owned by someone else
    pub async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> DomainResult<bool> {
        if !self.sessions.is_session_owner(user_id, session_id).await? {
            return Ok(false);
        }
        self.sessions.invalidate_session(session_id).await
    }

    /// Log out of the current session
    pub async fn logout(&self, session_id: Uuid) -> DomainResult<bool> {
        self.sessions.invalidate_session(session_id).await
    }

    /// Log out of every session of a user
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<u64> {
        self.sessions.invalidate_all_for_user(user_id).await
    }
}
