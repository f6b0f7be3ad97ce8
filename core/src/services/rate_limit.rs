//! Generic fixed-window rate limiter
//!
//! A single atomic increment against the ephemeral store counts events in a
//! TTL-bounded bucket. The TTL is set only on the first increment of a
//! window (count 0 -> 1), so concurrent callers agree on the window start.

use std::sync::Arc;
use tracing::warn;

use crate::services::cache::CacheStore;

/// Behavior when the ephemeral store is unavailable
///
/// Fail-open trades enforcement for availability: a Redis outage does not
/// take authentication down with it. Sensitive limiters can opt into
/// fail-closed per call site instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Allow the request when the store cannot be consulted
    FailOpen,
    /// Deny the request when the store cannot be consulted
    FailClosed,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request is within limits
    Allowed,
    /// Limit exceeded, retry after the given number of seconds
    Blocked { retry_after_seconds: i64 },
}

impl RateLimitDecision {
    /// Whether the request may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

/// Fixed-window counter rate limiter backed by the ephemeral store
pub struct FixedWindowLimiter<C: CacheStore> {
    cache: Arc<C>,
}

impl<C: CacheStore> FixedWindowLimiter<C> {
    /// Create a new limiter on top of a cache store
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Count one event against `{prefix}:{identifier}` and decide
    ///
    /// At most `limit` events are allowed per `window_seconds` window. An
    /// absent counter counts as zero. Store failures are resolved by the
    /// given `policy` rather than surfaced to the caller.
    pub async fn check_and_consume(
        &self,
        prefix: &str,
        identifier: &str,
        limit: u32,
        window_seconds: u64,
        policy: FailurePolicy,
    ) -> RateLimitDecision {
        let key = format!("rate_limit:{}:{}", prefix, identifier);

        let count = match self.cache.incr(&key).await {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    key = %key,
                    error = %e,
                    policy = ?policy,
                    event = "rate_limit_store_error",
                    "Rate limit store unavailable"
                );
                return match policy {
                    FailurePolicy::FailOpen => RateLimitDecision::Allowed,
                    FailurePolicy::FailClosed => RateLimitDecision::Blocked {
                        retry_after_seconds: window_seconds as i64,
                    },
                };
            }
        };

        // First event of a window starts its TTL
        if count == 1 {
            if let Err(e) = self.cache.expire(&key, window_seconds).await {
                warn!(
                    key = %key,
                    error = %e,
                    event = "rate_limit_expire_failed",
                    "Failed to set rate limit window TTL"
                );
            }
        }

        if count > limit as i64 {
            let retry_after = self
                .cache
                .ttl(&key)
                .await
                .ok()
                .flatten()
                .unwrap_or(window_seconds as i64);

            warn!(
                key = %key,
                count = count,
                limit = limit,
                event = "rate_limit_exceeded",
                "Rate limit exceeded"
            );

            RateLimitDecision::Blocked {
                retry_after_seconds: retry_after.max(1),
            }
        } else {
            RateLimitDecision::Allowed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DomainError, DomainResult};
    use crate::services::cache::MemoryCacheStore;
    use async_trait::async_trait;

    /// Cache store that fails every operation
    struct FailingCacheStore;

    #[async_trait]
    impl CacheStore for FailingCacheStore {
        async fn get(&self, _key: &str) -> DomainResult<Option<String>> {
            Err(unavailable())
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: u64) -> DomainResult<()> {
            Err(unavailable())
        }
        async fn delete(&self, _key: &str) -> DomainResult<bool> {
            Err(unavailable())
        }
        async fn incr(&self, _key: &str) -> DomainResult<i64> {
            Err(unavailable())
        }
        async fn expire(&self, _key: &str, _ttl: u64) -> DomainResult<bool> {
            Err(unavailable())
        }
        async fn ttl(&self, _key: &str) -> DomainResult<Option<i64>> {
            Err(unavailable())
        }
        async fn exists(&self, _key: &str) -> DomainResult<bool> {
            Err(unavailable())
        }
        async fn set_if_not_exists(
            &self,
            _key: &str,
            _value: &str,
            _ttl: u64,
        ) -> DomainResult<bool> {
            Err(unavailable())
        }
    }

    fn unavailable() -> DomainError {
        DomainError::Internal {
            message: "store unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_allows_up_to_limit_then_blocks() {
        let limiter = FixedWindowLimiter::new(Arc::new(MemoryCacheStore::new()));

        for _ in 0..3 {
            let decision = limiter
                .check_and_consume("test", "09123456789", 3, 60, FailurePolicy::FailOpen)
                .await;
            assert!(decision.is_allowed());
        }

        let decision = limiter
            .check_and_consume("test", "09123456789", 3, 60, FailurePolicy::FailOpen)
            .await;
        match decision {
            RateLimitDecision::Blocked {
                retry_after_seconds,
            } => assert!(retry_after_seconds > 0),
            RateLimitDecision::Allowed => panic!("expected the fourth request to be blocked"),
        }
    }

    #[tokio::test]
    async fn test_keys_are_isolated_per_identifier() {
        let limiter = FixedWindowLimiter::new(Arc::new(MemoryCacheStore::new()));

        let first = limiter
            .check_and_consume("send_otp", "09123456789", 1, 120, FailurePolicy::FailOpen)
            .await;
        let second = limiter
            .check_and_consume("send_otp", "09987654321", 1, 120, FailurePolicy::FailOpen)
            .await;

        // Two different phones within the same window both pass
        assert!(first.is_allowed());
        assert!(second.is_allowed());
    }

    #[tokio::test]
    async fn test_prefixes_are_isolated() {
        let limiter = FixedWindowLimiter::new(Arc::new(MemoryCacheStore::new()));

        limiter
            .check_and_consume("send_otp", "09123456789", 1, 120, FailurePolicy::FailOpen)
            .await;
        let other_prefix = limiter
            .check_and_consume("verify_otp", "09123456789", 1, 60, FailurePolicy::FailOpen)
            .await;

        assert!(other_prefix.is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_after_ttl() {
        let limiter = FixedWindowLimiter::new(Arc::new(MemoryCacheStore::new()));

        limiter
            .check_and_consume("test", "id", 1, 30, FailurePolicy::FailOpen)
            .await;
        let blocked = limiter
            .check_and_consume("test", "id", 1, 30, FailurePolicy::FailOpen)
            .await;
        assert!(!blocked.is_allowed());

        tokio::time::advance(std::time::Duration::from_secs(31)).await;

        let after_window = limiter
            .check_and_consume("test", "id", 1, 30, FailurePolicy::FailOpen)
            .await;
        assert!(after_window.is_allowed());
    }

    #[tokio::test]
    async fn test_fail_open_allows_on_store_error() {
        let limiter = FixedWindowLimiter::new(Arc::new(FailingCacheStore));

        let decision = limiter
            .check_and_consume("test", "id", 1, 60, FailurePolicy::FailOpen)
            .await;
        assert!(decision.is_allowed());
    }

    #[tokio::test]
    async fn test_fail_closed_blocks_on_store_error() {
        let limiter = FixedWindowLimiter::new(Arc::new(FailingCacheStore));

        let decision = limiter
            .check_and_consume("test", "id", 1, 60, FailurePolicy::FailClosed)
            .await;
        assert_eq!(
            decision,
            RateLimitDecision::Blocked {
                retry_after_seconds: 60
            }
        );
    }
}
