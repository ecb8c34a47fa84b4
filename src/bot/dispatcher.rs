//! Message dispatcher setup.
//!
//! Every inbound message is handed to the authorization gate on its own
//! task, so a slow command never holds up update delivery.

use std::sync::Arc;
use std::time::Instant;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::debug;

use super::platform::Platform;
use crate::cache::CacheManager;
use crate::database::{BotStore, SettingsRepo};
use crate::gate::{AuthorizationGate, GateConfig, GateOutcome, Inbound};
use crate::permissions::Permissions;
use crate::prefix::PrefixResolver;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Backing store, used directly only for cold loads.
    pub store: Arc<dyn BotStore>,

    /// Named datasets read by the gate.
    pub cache: CacheManager,

    /// Write-through access to cache-backed settings.
    pub settings: SettingsRepo,

    pub prefixes: Arc<PrefixResolver>,

    /// Owners and maintenance switch.
    pub gate: Arc<GateConfig>,

    /// Permission checker with admin caching.
    pub permissions: Permissions,

    pub platform: Arc<dyn Platform>,

    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn BotStore>,
        cache: CacheManager,
        platform: Arc<dyn Platform>,
        gate: GateConfig,
        default_prefix: &str,
        owner_prefix: &str,
    ) -> Self {
        let settings = SettingsRepo::new(Arc::clone(&store), cache.clone());
        let prefixes = Arc::new(PrefixResolver::new(
            Arc::clone(&store),
            cache.clone(),
            default_prefix,
            owner_prefix,
        ));
        let permissions = Permissions::with_owners(Arc::clone(&platform), gate.owner_ids());

        Self {
            store,
            cache,
            settings,
            prefixes,
            gate: Arc::new(gate),
            permissions,
            platform,
            started_at: Instant::now(),
        }
    }
}

/// Build the dispatcher around the gate.
pub fn build_dispatcher(
    bot: ThrottledBot,
    gate: AuthorizationGate,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![gate])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry().branch(Update::filter_message().endpoint(handle_message))
}

async fn handle_message(msg: Message, gate: AuthorizationGate) -> anyhow::Result<()> {
    let Some(inbound) = Inbound::from_telegram(&msg) else {
        return Ok(());
    };

    tokio::spawn(async move {
        match gate.process(inbound).await {
            GateOutcome::IgnoredBot | GateOutcome::NotCommand => {}
            outcome => debug!("Gate outcome for message {}: {:?}", msg.id.0, outcome),
        }
    });

    Ok(())
}
