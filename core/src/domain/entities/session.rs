//! Session entity

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::device::DeviceInfo;

/// An authenticated session backed by an opaque bearer token
///
/// Only the SHA-256 hash of the token is stored; the plaintext token is
/// returned to the client exactly once at creation and cannot be recovered
/// from this entity. Lookups hash the presented token first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// SHA-256 hex digest of the opaque token, unique per session
    pub token_hash: String,
    /// Coarse device metadata captured at login
    pub device_info: DeviceInfo,
    /// Whether the session is active (cleared on logout/invalidation)
    pub is_active: bool,
    /// Absolute expiry instant
    pub expires_at: DateTime<Utc>,
    /// Last successful validation, if any
    pub last_used_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new active session expiring `expiry_days` from now
    pub fn new(
        user_id: Uuid,
        token_hash: impl Into<String>,
        device_info: DeviceInfo,
        expiry_days: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash: token_hash.into(),
            device_info,
            is_active: true,
            expires_at: now + Duration::days(expiry_days),
            last_used_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session's absolute expiry has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
