//! Groot - command bot built around a cached dispatch gate.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB store and the write-through settings repository
//! - `cache` - Named in-memory datasets plus expiring Moka caches
//! - `prefix` - Per-chat prefix resolution
//! - `gate` - Per-message authorization pipeline
//! - `commands` - Command registry and check chains
//! - `ratelimit` - Layered per-user rate limits
//! - `permissions` - Admin checking with caching
//! - `bot` - Telegram adapter (with Throttle for API rate limiting)
//! - `plugins` - Command groups
//! - `utils` - Utility functions

mod bot;
mod cache;
mod commands;
mod config;
mod database;
mod gate;
mod permissions;
mod plugins;
mod prefix;
mod ratelimit;
#[cfg(test)]
mod testing;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::{AppState, TelegramPlatform};
use cache::CacheManager;
use config::Config;
use database::Database;
use gate::{AuthorizationGate, GateConfig};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("groot=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Groot bot...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");

    info!("Connecting to MongoDB...");
    let db = Arc::new(Database::connect(&config.mongodb_uri, &config.mongodb_database).await?);
    info!("Database connected");

    // Cold load; failures leave namespaces empty and are logged
    let cache = CacheManager::new();
    cache::warm(&cache, db.as_ref()).await;

    // Throttle respects Telegram's limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    if config.owner_ids.is_empty() {
        info!("No owner IDs configured (OWNER_IDS is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }
    if config.maintenance {
        info!("Starting in maintenance mode");
    }

    let state = AppState::new(
        db,
        cache,
        Arc::new(TelegramPlatform::new(bot.clone())),
        GateConfig::new(config.owner_ids.clone(), config.maintenance),
        &config.default_prefix,
        &config.owner_prefix,
    );

    let registry = plugins::build_registry(config.rate_limit.clone())?;
    info!("Registered {} commands", registry.commands().len());

    let gate = AuthorizationGate::new(state, Arc::new(registry));
    let dispatcher = bot::build_dispatcher(bot, gate);

    bot::run(dispatcher).await;

    Ok(())
}
