//! Session service implementation
//!
//! Sessions are identified by high-entropy opaque tokens. The durable store
//! keeps only the SHA-256 hash of a token; every lookup hashes the presented
//! token first, so a leaked database dump yields no usable credentials. A
//! Redis entry keyed by the hash serves as a read-through cache, but the
//! durable row stays authoritative for the active flag and the expiry.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use gp_shared::config::SessionConfig;

use crate::domain::entities::session::Session;
use crate::domain::entities::user::User;
use crate::domain::value_objects::device::DeviceInfo;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{SessionRepository, UserRepository};
use crate::services::cache::CacheStore;

const SESSION_CACHE_PREFIX: &str = "session:token";

/// Hash an opaque token for storage and lookup
///
/// SHA-256 hex digest; deterministic so the hash can serve as the lookup
/// key, unlike a salted password hash.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Cached projection of a session, keyed by token hash
///
/// A performance hint only: a hit still re-fetches the authoritative row
/// by id, a stale or missing entry falls back to the durable store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionCacheEntry {
    session_id: Uuid,
    user_id: Uuid,
    expires_at: chrono::DateTime<Utc>,
}

/// Service managing opaque session tokens
pub struct SessionService<R: SessionRepository, U: UserRepository, C: CacheStore> {
    /// Durable session store (source of truth)
    sessions: Arc<R>,
    /// Durable user store
    users: Arc<U>,
    /// Ephemeral session cache
    cache: Arc<C>,
    /// Service configuration
    config: SessionConfig,
}

impl<R: SessionRepository, U: UserRepository, C: CacheStore> SessionService<R, U, C> {
    /// Create a new session service
    pub fn new(sessions: Arc<R>, users: Arc<U>, cache: Arc<C>, config: SessionConfig) -> Self {
        Self {
            sessions,
            users,
            cache,
            config,
        }
    }

    fn cache_key(token_hash: &str) -> String {
        format!("{}:{}", SESSION_CACHE_PREFIX, token_hash)
    }

    /// Generate a high-entropy opaque token
    ///
    /// The token is not derived from any user-controllable input.
    fn generate_token(&self) -> String {
        let mut bytes = vec![0u8; self.config.token_bytes];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Create a new session for a user
    ///
    /// Persists the session (hash only), writes the cache entry and returns
    /// the plaintext token together with the stored session. The token is
    /// returned exactly once; it cannot be retrieved again.
    ///
    /// Store errors propagate to the caller: authentication must not
    /// partially succeed in silence.
    pub async fn create_session(
        &self,
        user: &User,
        device_info: DeviceInfo,
    ) -> DomainResult<(String, Session)> {
        let token = self.generate_token();
        let token_hash = hash_token(&token);

        let session = Session::new(
            user.id,
            token_hash,
            device_info,
            self.config.token_expiry_days,
        );
        let session = self.sessions.create(session).await?;

        self.write_cache_entry(&session).await;

        info!(
            user_id = %user.id,
            session_id = %session.id,
            event = "session_created",
            "Session created"
        );

        Ok((token, session))
    }

    /// Resolve a presented token to its session and owning user
    ///
    /// Cache-first, store-fallback: a cache hit is re-fetched by id from
    /// the durable store so that the cache can never override the stored
    /// active flag or expiry; a cache miss queries by token hash and
    /// re-populates the cache.
    ///
    /// Every invalid outcome, including unexpected store errors, maps to
    /// `Unauthorized` (fail closed on the read path); the reasons are
    /// logged, not exposed.
    pub async fn validate_token(&self, token: &str) -> DomainResult<(User, Session)> {
        let token_hash = hash_token(token);
        let cache_key = Self::cache_key(&token_hash);

        let mut from_cache = false;
        let session = match self.lookup_cached(&cache_key).await {
            Some(entry) => {
                from_cache = true;
                // Re-fetch the authoritative record by id
                match self.sessions.find_by_id(entry.session_id).await {
                    Ok(found) => found,
                    Err(e) => {
                        error!(error = %e, event = "session_lookup_failed", "Session lookup failed");
                        return Err(DomainError::Unauthorized);
                    }
                }
            }
            None => match self.sessions.find_by_token_hash(&token_hash).await {
                Ok(found) => found,
                Err(e) => {
                    error!(error = %e, event = "session_lookup_failed", "Session lookup failed");
                    return Err(DomainError::Unauthorized);
                }
            },
        };

        let session = match session {
            Some(s) if s.is_active => s,
            Some(_) | None => {
                // Stale cache entries lose to the durable store
                let _ = self.cache.delete(&cache_key).await;
                return Err(DomainError::Unauthorized);
            }
        };

        if session.is_expired() {
            // Expiry observed during validation triggers invalidation
            let _ = self.invalidate_session(session.id).await;
            warn!(
                session_id = %session.id,
                event = "session_expired",
                "Presented token belongs to an expired session"
            );
            return Err(DomainError::Unauthorized);
        }

        let user = match self.users.find_by_id(session.user_id).await {
            Ok(Some(user)) if user.is_active => user,
            Ok(_) => return Err(DomainError::Unauthorized),
            Err(e) => {
                error!(error = %e, event = "session_user_lookup_failed", "User lookup failed");
                return Err(DomainError::Unauthorized);
            }
        };

        // Best effort: a failed last-used update must not fail validation
        if let Err(e) = self.sessions.update_last_used(session.id, Utc::now()).await {
            warn!(
                session_id = %session.id,
                error = %e,
                event = "session_last_used_update_failed",
                "Failed to update last-used timestamp"
            );
        }

        if !from_cache {
            self.write_cache_entry(&session).await;
        }

        Ok((user, session))
    }

    /// Invalidate a session
    ///
    /// Clears the active flag in the durable store and deletes the cache
    /// entry. Idempotent: invalidating an unknown or already-inactive
    /// session reports `false`/`true` without error.
    pub async fn invalidate_session(&self, session_id: Uuid) -> DomainResult<bool> {
        let session = match self.sessions.find_by_id(session_id).await? {
            Some(session) => session,
            None => return Ok(false),
        };

        self.sessions.set_inactive(session_id).await?;
        let _ = self
            .cache
            .delete(&Self::cache_key(&session.token_hash))
            .await;

        info!(
            session_id = %session_id,
            event = "session_invalidated",
            "Session invalidated"
        );

        Ok(true)
    }

    /// Invalidate every active session of a user
    ///
    /// # Returns
    /// * `Ok(count)` - Number of sessions invalidated
    pub async fn invalidate_all_for_user(&self, user_id: Uuid) -> DomainResult<u64> {
        let sessions = self.sessions.find_active_by_user(user_id).await?;
        let count = self.sessions.set_all_inactive_for_user(user_id).await?;

        for session in &sessions {
            let _ = self
                .cache
                .delete(&Self::cache_key(&session.token_hash))
                .await;
        }

        info!(
            user_id = %user_id,
            count = count,
            event = "sessions_invalidated_all",
            "All sessions invalidated for user"
        );

        Ok(count)
    }

    /// List the active sessions of a user, newest first
    pub async fn list_sessions(&self, user_id: Uuid) -> DomainResult<Vec<Session>> {
        self.sessions.find_active_by_user(user_id).await
    }

    /// Whether a session exists and belongs to the given user
    pub async fn is_session_owner(&self, user_id: Uuid, session_id: Uuid) -> DomainResult<bool> {
        Ok(self
            .sessions
            .find_by_id(session_id)
            .await?
            .map(|s| s.user_id == user_id)
            .unwrap_or(false))
    }

    /// Delete all sessions past their expiry
    ///
    /// Idempotent batch delete; safe to run concurrently with itself and
    /// with live validations, since `validate_token` already treats expired
    /// sessions as invalid.
    pub async fn cleanup_expired(&self) -> DomainResult<u64> {
        let deleted = self.sessions.delete_expired(Utc::now()).await?;
        if deleted > 0 {
            info!(
                deleted = deleted,
                event = "sessions_cleaned_up",
                "Deleted expired sessions"
            );
        }
        Ok(deleted)
    }

    async fn lookup_cached(&self, cache_key: &str) -> Option<SessionCacheEntry> {
        match self.cache.get(cache_key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(
                        error = %e,
                        event = "session_cache_corrupt",
                        "Discarding unreadable session cache entry"
                    );
                    let _ = self.cache.delete(cache_key).await;
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                // A cache outage degrades to store lookups
                warn!(
                    error = %e,
                    event = "session_cache_unavailable",
                    "Session cache read failed, falling back to store"
                );
                None
            }
        }
    }

    /// Write the cache entry for a session (idempotent full overwrite)
    async fn write_cache_entry(&self, session: &Session) {
        let entry = SessionCacheEntry {
            session_id: session.id,
            user_id: session.user_id,
            expires_at: session.expires_at,
        };

        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to serialize session cache entry");
                return;
            }
        };

        if let Err(e) = self
            .cache
            .set(
                &Self::cache_key(&session.token_hash),
                &payload,
                self.config.cache_ttl_seconds,
            )
            .await
        {
            warn!(
                session_id = %session.id,
                error = %e,
                event = "session_cache_write_failed",
                "Failed to write session cache entry"
            );
        }
    }
}
