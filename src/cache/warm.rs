//! Cold load of the gate's namespaces from the store.

use anyhow::Result;
use tracing::{info, warn};

use super::namespaces::{
    DisabledCommands, IdSet, PrefixMap, BLACKLISTED, DISABLED_COMMANDS, PREFIXES, PREMIUM,
    TIPS_ENABLED,
};
use super::{CacheManager, Namespace};
use crate::database::{BotStore, DisabledCommand, Flag};

/// Sizes of the namespaces after a cold load.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WarmReport {
    pub blacklisted: usize,
    pub premium: usize,
    pub tips_enabled: usize,
    pub disabled_commands: usize,
    /// Queries that failed; their namespaces kept their previous contents.
    pub failures: usize,
}

/// Populate every namespace the dispatch gate reads.
///
/// Each namespace is built completely and then swapped in. A failing query
/// never aborts the load: the namespace keeps what it had (empty on first
/// load) and the failure is logged and counted. The prefix namespace is
/// reset and refilled lazily by the prefix resolver.
pub async fn warm(cache: &CacheManager, store: &dyn BotStore) -> WarmReport {
    let mut report = WarmReport::default();

    report.blacklisted = install_ids(
        cache,
        &BLACKLISTED,
        store.flagged_ids(Flag::Blacklisted).await,
        &mut report.failures,
    );
    report.premium = install_ids(
        cache,
        &PREMIUM,
        store.flagged_ids(Flag::Premium).await,
        &mut report.failures,
    );
    report.tips_enabled = install_ids(
        cache,
        &TIPS_ENABLED,
        store.tips_enabled_ids().await,
        &mut report.failures,
    );

    report.disabled_commands = match store.disabled_commands().await {
        Ok(rows) => cache.set(&DISABLED_COMMANDS, group_disabled(rows)).len(),
        Err(e) => {
            warn!("Cold load of {} failed: {:#}", DISABLED_COMMANDS.name(), e);
            report.failures += 1;
            cache.ensure(&DISABLED_COMMANDS, DisabledCommands::new).len()
        }
    };

    cache.set(&PREFIXES, PrefixMap::new());

    info!(
        "Cache warmed: {} blacklisted, {} premium, {} tips, {} disabled commands ({} failures)",
        report.blacklisted,
        report.premium,
        report.tips_enabled,
        report.disabled_commands,
        report.failures
    );

    report
}

fn install_ids(
    cache: &CacheManager,
    namespace: &Namespace<IdSet>,
    ids: Result<Vec<i64>>,
    failures: &mut usize,
) -> usize {
    match ids {
        Ok(ids) => cache.set(namespace, ids.into_iter().collect()).len(),
        Err(e) => {
            warn!("Cold load of {} failed: {:#}", namespace.name(), e);
            *failures += 1;
            cache.ensure(namespace, IdSet::new).len()
        }
    }
}

/// Group rows by command name, keeping row order within each command.
fn group_disabled(rows: Vec<DisabledCommand>) -> DisabledCommands {
    let grouped = DisabledCommands::new();
    for row in rows {
        grouped
            .entry(row.command_name)
            .or_default()
            .push(row.snowflake_id);
    }
    grouped
}
