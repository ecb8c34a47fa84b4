//! Settings repository.
//!
//! Every write to a cache-backed table goes through here: the store is
//! written first, and the matching namespace is updated only once the
//! write succeeded. Handlers that skip this repository break the
//! cache/store invariant the dispatch gate relies on.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use super::store::{BotStore, Flag};
use crate::cache::namespaces::{
    IdSet, BLACKLISTED, DISABLED_COMMANDS, PREFIXES, PREMIUM, TIPS_ENABLED,
};
use crate::cache::{CacheManager, Namespace};

/// Write-through access to prefixes, flags, and disabled commands.
#[derive(Clone)]
pub struct SettingsRepo {
    store: Arc<dyn BotStore>,
    cache: CacheManager,
}

impl SettingsRepo {
    pub fn new(store: Arc<dyn BotStore>, cache: CacheManager) -> Self {
        Self { store, cache }
    }

    /// Change the prefix of a scope.
    pub async fn set_prefix(&self, scope: i64, prefix: &str) -> Result<()> {
        self.store.set_prefix(scope, prefix).await?;

        self.cache
            .ensure(&PREFIXES, Default::default)
            .insert(scope, prefix.to_string());

        debug!("Prefix for {} is now {:?}", scope, prefix);
        Ok(())
    }

    pub async fn set_blacklisted(&self, snowflake: i64, blacklisted: bool) -> Result<()> {
        self.set_flag(snowflake, Flag::Blacklisted, blacklisted).await
    }

    pub async fn set_premium(&self, snowflake: i64, premium: bool) -> Result<()> {
        self.set_flag(snowflake, Flag::Premium, premium).await
    }

    pub async fn set_tips(&self, user_id: i64, enabled: bool) -> Result<()> {
        self.store.set_tips(user_id, enabled).await?;
        toggle_member(&self.cache, &TIPS_ENABLED, user_id, enabled);
        Ok(())
    }

    /// Disable a command in a scope (chat or channel).
    pub async fn disable_command(&self, command_name: &str, scope: i64) -> Result<()> {
        self.store.disable_command(command_name, scope).await?;

        let disabled = self.cache.ensure(&DISABLED_COMMANDS, Default::default);
        let mut scopes = disabled.entry(command_name.to_string()).or_default();
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }

        Ok(())
    }

    /// Re-enable a command in a scope.
    pub async fn enable_command(&self, command_name: &str, scope: i64) -> Result<()> {
        self.store.enable_command(command_name, scope).await?;

        let disabled = self.cache.ensure(&DISABLED_COMMANDS, Default::default);
        disabled.remove_if_mut(command_name, |_, scopes| {
            scopes.retain(|&s| s != scope);
            scopes.is_empty()
        });

        Ok(())
    }

    pub fn is_blacklisted(&self, snowflake: i64) -> bool {
        is_member(&self.cache, &BLACKLISTED, snowflake)
    }

    pub fn is_premium(&self, snowflake: i64) -> bool {
        is_member(&self.cache, &PREMIUM, snowflake)
    }

    pub fn tips_enabled(&self, user_id: i64) -> bool {
        is_member(&self.cache, &TIPS_ENABLED, user_id)
    }

    /// Whether a command is disabled in any of the given scopes.
    pub fn is_disabled(&self, command_name: &str, scopes: &[i64]) -> bool {
        self.cache
            .get(&DISABLED_COMMANDS)
            .and_then(|disabled| {
                disabled
                    .get(command_name)
                    .map(|listed| scopes.iter().any(|s| listed.contains(s)))
            })
            .unwrap_or(false)
    }

    async fn set_flag(&self, snowflake: i64, flag: Flag, value: bool) -> Result<()> {
        self.store.set_flag(snowflake, flag, value).await?;

        let namespace = match flag {
            Flag::Blacklisted => &BLACKLISTED,
            Flag::Premium => &PREMIUM,
        };
        toggle_member(&self.cache, namespace, snowflake, value);

        debug!("{:?}={} for {}", flag, value, snowflake);
        Ok(())
    }
}

fn toggle_member(cache: &CacheManager, namespace: &Namespace<IdSet>, id: i64, present: bool) {
    let set = cache.ensure(namespace, IdSet::default);
    if present {
        set.insert(id);
    } else {
        set.remove(&id);
    }
}

fn is_member(cache: &CacheManager, namespace: &Namespace<IdSet>, id: i64) -> bool {
    cache
        .get(namespace)
        .map(|set| set.contains(&id))
        .unwrap_or(false)
}
