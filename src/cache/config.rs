//! Cache configuration for expiring caches.

use std::time::Duration;

/// Configuration for a [`TypedCache`](super::TypedCache) instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    /// After this duration, entries are automatically evicted.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    /// Entries are evicted if not accessed within this duration.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle for cache entries.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Disable TTL (entries never expire based on time).
    #[must_use]
    pub fn no_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }

    /// Config for rate-limit buckets.
    ///
    /// A bucket that has been idle for its longest window has nothing left
    /// to enforce, so it is dropped after exactly that long.
    pub fn rate_limit_buckets(longest_window: Duration) -> Self {
        Self::with_capacity(100_000).no_ttl().tti(longest_window)
    }

    /// Config for per-chat admin lookups.
    pub fn admin_lookups() -> Self {
        Self::with_capacity(10_000)
            .ttl(Duration::from_secs(300)) // 5 minutes
            .tti(Duration::from_secs(120)) // 2 minutes idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_buckets_expire_on_idle_only() {
        let config = CacheConfig::rate_limit_buckets(Duration::from_secs(60));

        assert_eq!(config.ttl, None);
        assert_eq!(config.tti, Some(Duration::from_secs(60)));
    }
}
