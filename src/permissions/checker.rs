//! Permission checker with caching.

use std::sync::Arc;

use tracing::debug;

use crate::bot::platform::Platform;
use crate::cache::{CacheConfig, TypedCache};

/// Cache key for admin lookups.
type AdminCacheKey = (i64, u64); // (guild_id, user_id)

/// Permission checker with caching support.
///
/// Bot owners (from OWNER_IDS env) automatically pass every check.
#[derive(Clone)]
pub struct Permissions {
    platform: Arc<dyn Platform>,
    cache: TypedCache<AdminCacheKey, bool>,
    /// Bot owner IDs - these users have all permissions in all chats.
    owner_ids: Arc<[u64]>,
}

impl Permissions {
    /// Create a new permission checker with bot owner IDs.
    pub fn with_owners(platform: Arc<dyn Platform>, owner_ids: &[u64]) -> Self {
        Self {
            platform,
            cache: TypedCache::new("admin_permissions", CacheConfig::admin_lookups()),
            owner_ids: owner_ids.into(),
        }
    }

    /// Check if a user is a bot owner.
    #[inline]
    pub fn is_bot_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }

    /// Check if a user administers a group chat.
    /// Bot owners always return true.
    pub async fn is_admin(&self, guild_id: i64, user_id: u64) -> anyhow::Result<bool> {
        if self.is_bot_owner(user_id) {
            debug!("User {} is bot owner, granting admin", user_id);
            return Ok(true);
        }

        let cache_key = (guild_id, user_id);

        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Admin cache hit for user {} in chat {}", user_id, guild_id);
            return Ok(cached);
        }

        debug!("Admin cache miss for user {} in chat {}", user_id, guild_id);

        let is_admin = self.platform.is_admin(guild_id, user_id).await?;

        // Cache the result (including false for non-admins)
        self.cache.insert(cache_key, is_admin);

        Ok(is_admin)
    }
}
