//! Test doubles shared across modules.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::bot::platform::Platform;
use crate::bot::AppState;
use crate::cache::CacheManager;
use crate::database::MemoryStore;
use crate::gate::{GateConfig, Inbound};

/// Platform that records what would have been sent.
#[derive(Default)]
pub struct RecordingPlatform {
    sent: Mutex<Vec<(i64, String)>>,
    typing: Mutex<Vec<i64>>,
    admins: Mutex<HashSet<(i64, u64)>>,
    admin_lookups: AtomicUsize,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_admin(&self, guild_id: i64, user_id: u64) {
        self.admins.lock().insert((guild_id, user_id));
    }

    /// Messages sent so far as `(channel, text)`.
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().clone()
    }

    /// Channels that got a typing indicator.
    pub fn typing(&self) -> Vec<i64> {
        self.typing.lock().clone()
    }

    pub fn admin_lookups(&self) -> usize {
        self.admin_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn send_message(&self, channel_id: i64, text: &str) -> Result<()> {
        self.sent.lock().push((channel_id, text.to_string()));
        Ok(())
    }

    async fn trigger_typing(&self, channel_id: i64) -> Result<()> {
        self.typing.lock().push(channel_id);
        Ok(())
    }

    async fn is_admin(&self, guild_id: i64, user_id: u64) -> Result<bool> {
        self.admin_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.admins.lock().contains(&(guild_id, user_id)))
    }
}

/// A message from `author`, in `guild` or a private chat.
pub fn message(author: u64, guild: Option<i64>, content: &str) -> Inbound {
    Inbound {
        author_id: author,
        author_is_bot: false,
        guild_id: guild,
        channel_id: guild.unwrap_or(author as i64),
        content: content.to_string(),
    }
}

/// Application state over an in-memory store and a recording platform.
pub struct Harness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub platform: Arc<RecordingPlatform>,
}

impl Harness {
    pub fn new(owner_ids: &[u64]) -> Self {
        let store = Arc::new(MemoryStore::new());
        let platform = Arc::new(RecordingPlatform::new());
        let state = AppState::new(
            store.clone(),
            CacheManager::new(),
            platform.clone(),
            GateConfig::new(owner_ids.to_vec(), false),
            "g.",
            "g.",
        );

        Self {
            state,
            store,
            platform,
        }
    }
}
