//! Ephemeral key-value store contract
//!
//! Everything that needs cross-request coordination (challenges, cooldowns,
//! attempt counters, rate limit buckets, the session cache) goes through
//! this trait. The production implementation is the Redis client in
//! `gp_infra`; `MemoryCacheStore` is a single-process implementation for
//! development and tests.
//!
//! Keys are namespaced by concern, e.g. `otp:phone:{phone}` or
//! `session:token:{hash}`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::DomainResult;

/// Ephemeral store with per-key TTL and atomic increment
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the value of a key, `None` if absent or expired
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Set a key with a TTL, overwriting any previous value
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<()>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> DomainResult<bool>;

    /// Atomically increment a counter, treating an absent key as zero
    ///
    /// Returns the value after the increment. The atomicity of this
    /// operation is what keeps attempt counters and rate limit buckets
    /// correct under concurrent callers; a read-then-write would race.
    async fn incr(&self, key: &str) -> DomainResult<i64>;

    /// Set the TTL of an existing key, returning whether it existed
    async fn expire(&self, key: &str, ttl_seconds: u64) -> DomainResult<bool>;

    /// Remaining TTL of a key in seconds, `None` if absent or persistent
    async fn ttl(&self, key: &str) -> DomainResult<Option<i64>>;

    /// Whether a key exists
    async fn exists(&self, key: &str) -> DomainResult<bool>;

    /// Set a key with a TTL only if it does not exist yet
    ///
    /// Returns `true` when the value was set.
    async fn set_if_not_exists(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> DomainResult<bool>;
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.map(|at| Instant::now() >= at).unwrap_or(false)
    }
}

/// In-memory cache store for development and tests
///
/// TTLs are enforced lazily on access using `tokio::time::Instant`, so
/// tests running under a paused clock can advance time deterministically.
#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryCacheStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn live_entry<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
    ) -> Option<&'a mut Entry> {
        if entries.get(key).map(|e| e.is_expired()).unwrap_or(false) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let mut entries = self.entries.lock().await;
        Ok(Self::live_entry(&mut entries, key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> DomainResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> DomainResult<bool> {
        let mut entries = self.entries.lock().await;
        let existed = Self::live_entry(&mut entries, key).is_some();
        entries.remove(key);
        Ok(existed)
    }

    async fn incr(&self, key: &str) -> DomainResult<i64> {
        let mut entries = self.entries.lock().await;
        match Self::live_entry(&mut entries, key) {
            Some(entry) => {
                let count = entry.value.parse::<i64>().unwrap_or(0) + 1;
                entry.value = count.to_string();
                Ok(count)
            }
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: "1".to_string(),
                        expires_at: None,
                    },
                );
                Ok(1)
            }
        }
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> DomainResult<bool> {
        let mut entries = self.entries.lock().await;
        match Self::live_entry(&mut entries, key) {
            Some(entry) => {
                entry.expires_at = Some(Instant::now() + Duration::from_secs(ttl_seconds));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> DomainResult<Option<i64>> {
        let mut entries = self.entries.lock().await;
        Ok(Self::live_entry(&mut entries, key)
            .and_then(|e| e.expires_at)
            .map(|at| {
                let now = Instant::now();
                if at > now {
                    at.duration_since(now).as_secs() as i64
                } else {
                    0
                }
            }))
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        let mut entries = self.entries.lock().await;
        Ok(Self::live_entry(&mut entries, key).is_some())
    }

    async fn set_if_not_exists(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> DomainResult<bool> {
        let mut entries = self.entries.lock().await;
        if Self::live_entry(&mut entries, key).is_some() {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCacheStore::new();

        cache.set("k", "v", 60).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.exists("k").await.unwrap());

        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_incr_starts_at_one() {
        let cache = MemoryCacheStore::new();
        assert_eq!(cache.incr("counter").await.unwrap(), 1);
        assert_eq!(cache.incr("counter").await.unwrap(), 2);
        assert_eq!(cache.incr("counter").await.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let cache = MemoryCacheStore::new();
        cache.set("k", "v", 10).await.unwrap();
        assert_eq!(cache.ttl("k").await.unwrap(), Some(10));

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(!cache.exists("k").await.unwrap());
        assert_eq!(cache.ttl("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_on_counter() {
        let cache = MemoryCacheStore::new();
        cache.incr("counter").await.unwrap();
        assert!(cache.expire("counter", 5).await.unwrap());

        tokio::time::advance(Duration::from_secs(6)).await;
        // Counter evicted, next increment starts over
        assert_eq!(cache.incr("counter").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_if_not_exists() {
        let cache = MemoryCacheStore::new();
        assert!(cache.set_if_not_exists("k", "a", 60).await.unwrap());
        assert!(!cache.set_if_not_exists("k", "b", 60).await.unwrap());
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("a"));
    }
}
