//! Rate limiter check attached to every command.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{Bucket, Cooldown, RateLimitPolicy, Tier};
use crate::cache::{CacheConfig, TypedCache};
use crate::commands::{Check, CheckFailure, CommandContext};

/// Per-command limiter keyed by invoking user and tier.
///
/// Buckets are created on a user's first call and dropped by the cache
/// once idle for the policy's longest window. Each bucket has its own
/// lock, so users never contend with each other.
pub struct RateLimiter {
    policy: RateLimitPolicy,
    buckets: TypedCache<(u64, Tier), Arc<Mutex<Bucket>>>,
}

impl RateLimiter {
    pub fn new(command_name: &str, policy: RateLimitPolicy) -> Self {
        let buckets = TypedCache::new(
            format!("ratelimit:{command_name}"),
            CacheConfig::rate_limit_buckets(policy.longest_window()),
        );

        Self { policy, buckets }
    }

    #[cfg(test)]
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Admit a call by `user_id` at `now`, or return the cooldown.
    pub fn acquire(&self, user_id: u64, tier: Tier, now: Instant) -> Result<(), Cooldown> {
        let bucket = self.buckets.get_or_insert_with((user_id, tier), || {
            Arc::new(Mutex::new(Bucket::new(self.policy.windows(tier))))
        });

        bucket.lock().try_acquire(now)
    }
}

#[async_trait]
impl Check for RateLimiter {
    async fn check(&self, ctx: &CommandContext) -> Result<(), CheckFailure> {
        let tier = if ctx.state.settings.is_premium(ctx.message().author_snowflake()) {
            Tier::Premium
        } else {
            Tier::Standard
        };

        self.acquire(ctx.author_id(), tier, Instant::now())
            .map_err(|cooldown| {
                debug!(
                    "User {} rate limited on {} for {:?}",
                    ctx.author_id(),
                    self.buckets.name(),
                    cooldown.retry_after
                );
                CheckFailure::RateLimited {
                    retry_after: cooldown.retry_after,
                    notify: cooldown.first,
                }
            })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
