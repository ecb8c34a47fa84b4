//! In-memory `BotStore` for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::models::{is_chat_id, DisabledCommand, GuildConfig, UserData};
use super::store::{BotStore, Flag};

#[derive(Default)]
pub struct MemoryStore {
    guilds: Mutex<HashMap<i64, GuildConfig>>,
    users: Mutex<HashMap<i64, UserData>>,
    disabled: Mutex<Vec<DisabledCommand>>,
    prefix_queries: AtomicUsize,
    offline: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every prefix answer, to widen race windows.
    pub fn with_latency(latency: Duration) -> Self {
        let store = Self::new();
        *store.latency.lock() = Some(latency);
        store
    }

    /// Make every call fail until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `prefix` lookups served so far.
    pub fn prefix_queries(&self) -> usize {
        self.prefix_queries.load(Ordering::SeqCst)
    }

    pub fn guild(&self, guild_id: i64) -> Option<GuildConfig> {
        self.guilds.lock().get(&guild_id).cloned()
    }

    pub fn user(&self, user_id: i64) -> Option<UserData> {
        self.users.lock().get(&user_id).cloned()
    }

    pub fn disabled_rows(&self) -> Vec<DisabledCommand> {
        self.disabled.lock().clone()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            bail!("store offline");
        }
        Ok(())
    }
}

#[async_trait]
impl BotStore for MemoryStore {
    async fn flagged_ids(&self, flag: Flag) -> Result<Vec<i64>> {
        self.ensure_online()?;

        let guilds = self.guilds.lock();
        let users = self.users.lock();
        let chats = guilds.values().filter(|g| match flag {
            Flag::Blacklisted => g.blacklisted,
            Flag::Premium => g.premium,
        });
        let people = users.values().filter(|u| match flag {
            Flag::Blacklisted => u.blacklisted,
            Flag::Premium => u.premium,
        });

        Ok(chats
            .map(|g| g.guild_id)
            .chain(people.map(|u| u.user_id))
            .collect())
    }

    async fn tips_enabled_ids(&self) -> Result<Vec<i64>> {
        self.ensure_online()?;
        Ok(self
            .users
            .lock()
            .values()
            .filter(|u| u.tips)
            .map(|u| u.user_id)
            .collect())
    }

    async fn disabled_commands(&self) -> Result<Vec<DisabledCommand>> {
        self.ensure_online()?;
        let mut rows = self.disabled.lock().clone();
        rows.sort_by(|a, b| a.command_name.cmp(&b.command_name));
        Ok(rows)
    }

    /// Reads before sleeping, so a delayed answer can be stale.
    async fn prefix(&self, scope: i64) -> Result<Option<String>> {
        self.prefix_queries.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()?;
        let prefix = self.guilds.lock().get(&scope).and_then(|g| g.prefix.clone());

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Ok(prefix)
    }

    async fn set_prefix(&self, scope: i64, prefix: &str) -> Result<()> {
        self.ensure_online()?;
        self.guilds
            .lock()
            .entry(scope)
            .or_insert_with(|| GuildConfig::new(scope))
            .prefix = Some(prefix.to_string());
        Ok(())
    }

    async fn set_flag(&self, snowflake: i64, flag: Flag, value: bool) -> Result<()> {
        self.ensure_online()?;

        if is_chat_id(snowflake) {
            let mut guilds = self.guilds.lock();
            let row = guilds
                .entry(snowflake)
                .or_insert_with(|| GuildConfig::new(snowflake));
            match flag {
                Flag::Blacklisted => row.blacklisted = value,
                Flag::Premium => row.premium = value,
            }
        } else {
            let mut users = self.users.lock();
            let row = users
                .entry(snowflake)
                .or_insert_with(|| UserData::new(snowflake));
            match flag {
                Flag::Blacklisted => row.blacklisted = value,
                Flag::Premium => row.premium = value,
            }
        }
        Ok(())
    }

    async fn set_tips(&self, user_id: i64, enabled: bool) -> Result<()> {
        self.ensure_online()?;
        self.users
            .lock()
            .entry(user_id)
            .or_insert_with(|| UserData::new(user_id))
            .tips = enabled;
        Ok(())
    }

    async fn disable_command(&self, command_name: &str, scope: i64) -> Result<()> {
        self.ensure_online()?;
        let row = DisabledCommand::new(command_name, scope);
        let mut disabled = self.disabled.lock();
        if !disabled.contains(&row) {
            disabled.push(row);
        }
        Ok(())
    }

    async fn enable_command(&self, command_name: &str, scope: i64) -> Result<()> {
        self.ensure_online()?;
        self.disabled
            .lock()
            .retain(|r| !(r.command_name == command_name && r.snowflake_id == scope));
        Ok(())
    }
}
