//! MySQL implementation of the SessionRepository trait.
//!
//! Sessions are stored with their token hash only; the plaintext token
//! never reaches the database. Device metadata is serialized as JSON.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use gp_core::domain::entities::session::Session;
use gp_core::domain::value_objects::device::DeviceInfo;
use gp_core::errors::DomainError;
use gp_core::repositories::SessionRepository;

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    /// Create a new MySQL session repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a Session entity
    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> Result<Session, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;

        let device_info: DeviceInfo = row
            .try_get::<Option<String>, _>("device_info")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get device_info: {}", e),
            })?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| DomainError::Internal {
                message: format!("Invalid device_info JSON: {}", e),
            })?
            .unwrap_or_default();

        Ok(Session {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid session UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get token_hash: {}", e),
                })?,
            device_info,
            is_active: row
                .try_get("is_active")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get is_active: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            last_used_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_used_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get last_used_at: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }

    const SELECT_COLUMNS: &'static str = "id, user_id, token_hash, device_info, is_active, \
        expires_at, last_used_at, created_at, updated_at";
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, DomainError> {
        let device_info =
            serde_json::to_string(&session.device_info).map_err(|e| DomainError::Internal {
                message: format!("Failed to serialize device_info: {}", e),
            })?;

        let query = r#"
            INSERT INTO sessions (
                id, user_id, token_hash, device_info, is_active,
                expires_at, last_used_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(session.id.to_string())
            .bind(session.user_id.to_string())
            .bind(&session.token_hash)
            .bind(device_info)
            .bind(session.is_active)
            .bind(session.expires_at)
            .bind(session.last_used_at)
            .bind(session.created_at)
            .bind(session.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create session: {}", e),
            })?;

        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        let query = format!(
            "SELECT {} FROM sessions WHERE id = ? LIMIT 1",
            Self::SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find session by id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, DomainError> {
        let query = format!(
            "SELECT {} FROM sessions WHERE token_hash = ? LIMIT 1",
            Self::SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find session by token hash: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, DomainError> {
        let query = format!(
            "SELECT {} FROM sessions WHERE user_id = ? AND is_active = TRUE \
             ORDER BY created_at DESC",
            Self::SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find sessions for user: {}", e),
            })?;

        rows.iter().map(Self::row_to_session).collect()
    }

    async fn set_inactive(&self, id: Uuid) -> Result<bool, DomainError> {
        let query = "UPDATE sessions SET is_active = FALSE, updated_at = ? WHERE id = ?";

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to deactivate session: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_all_inactive_for_user(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let query = "UPDATE sessions SET is_active = FALSE, updated_at = ? \
                     WHERE user_id = ? AND is_active = TRUE";

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to deactivate sessions for user: {}", e),
            })?;

        Ok(result.rows_affected())
    }

    async fn update_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        let query = "UPDATE sessions SET last_used_at = ?, updated_at = ? WHERE id = ?";

        sqlx::query(query)
            .bind(at)
            .bind(at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update last_used_at: {}", e),
            })?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = "DELETE FROM sessions WHERE expires_at < ?";

        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete expired sessions: {}", e),
            })?;

        Ok(result.rows_affected())
    }
}
