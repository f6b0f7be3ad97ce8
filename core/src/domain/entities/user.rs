//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user identified by a verified phone number
///
/// Users are created on first successful OTP verification and are never
/// deleted by the authentication subsystem. Deactivating a user
/// (`is_active = false`) invalidates all of their future token validations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Phone number, unique per user
    pub phone: String,
    /// Whether the account is active
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user for a phone number
    pub fn new(phone: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phone: phone.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_active() {
        let user = User::new("09123456789");
        assert!(user.is_active);
        assert_eq!(user.phone, "09123456789");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_new_users_get_distinct_ids() {
        let a = User::new("09123456789");
        let b = User::new("09123456789");
        assert_ne!(a.id, b.id);
    }
}
