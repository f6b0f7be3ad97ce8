//! Session token and cleanup configuration

use serde::{Deserialize, Serialize};

/// Configuration for opaque session tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Number of random bytes in a session token (hex-encoded on the wire)
    pub token_bytes: usize,

    /// Session lifetime in days
    pub token_expiry_days: i64,

    /// Time-to-live of the session cache entry in seconds
    pub cache_ttl_seconds: u64,

    /// How often the expired-session sweep runs, in seconds
    pub cleanup_interval_seconds: u64,

    /// Whether the background cleanup sweep is enabled
    pub cleanup_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_bytes: 32,
            token_expiry_days: 30,
            cache_ttl_seconds: 3600,
            cleanup_interval_seconds: 3600,
            cleanup_enabled: true,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_bytes: env_parse("SESSION_TOKEN_BYTES", defaults.token_bytes),
            token_expiry_days: env_parse("SESSION_TOKEN_EXPIRY_DAYS", defaults.token_expiry_days),
            cache_ttl_seconds: env_parse("SESSION_CACHE_TTL_SECONDS", defaults.cache_ttl_seconds),
            cleanup_interval_seconds: env_parse(
                "SESSION_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            ),
            cleanup_enabled: env_parse("SESSION_CLEANUP_ENABLED", defaults.cleanup_enabled),
        }
    }

    /// Set session lifetime in days
    pub fn with_expiry_days(mut self, days: i64) -> Self {
        self.token_expiry_days = days;
        self
    }

    /// Set the cache entry TTL in seconds
    pub fn with_cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
