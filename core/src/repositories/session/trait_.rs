//! Session repository trait defining the interface for session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::session::Session;
use crate::errors::DomainError;

/// Repository trait for Session entity persistence operations
///
/// This trait defines the contract for the durable session store, which is
/// the source of truth for session state. The Redis cache entry is only a
/// performance hint on top of it.
///
/// # Security Considerations
/// - Only the token hash is ever persisted; lookups take the hash
/// - Expired sessions should be periodically deleted via `delete_expired`
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session
    ///
    /// # Returns
    /// * `Ok(Session)` - The saved session
    /// * `Err(DomainError)` - Save failed (e.g., duplicate token hash)
    async fn create(&self, session: Session) -> Result<Session, DomainError>;

    /// Find a session by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError>;

    /// Find a session by the SHA-256 hash of its token
    async fn find_by_token_hash(&self, token_hash: &str)
        -> Result<Option<Session>, DomainError>;

    /// Find all active sessions for a user, newest first
    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError>;

    /// Clear the active flag of a session
    ///
    /// # Returns
    /// * `Ok(true)` - Session was found and deactivated
    /// * `Ok(false)` - No session with that id
    async fn set_inactive(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Clear the active flag of every active session of a user
    ///
    /// # Returns
    /// * `Ok(count)` - Number of sessions deactivated
    async fn set_all_inactive_for_user(&self, user_id: Uuid) -> Result<u64, DomainError>;

    /// Record a successful validation timestamp
    async fn update_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Delete every session whose expiry lies before `now`
    ///
    /// Idempotent; safe to run concurrently with itself and with live
    /// validations, since expired sessions are already rejected on the
    /// validation path.
    ///
    /// # Returns
    /// * `Ok(count)` - Number of sessions deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
