//! Owner-only commands that manage the gate's cached state.

use std::sync::Arc;

use tracing::info;

use crate::cache::namespaces::{BLACKLISTED, DISABLED_COMMANDS, PREFIXES, PREMIUM, TIPS_ENABLED};
use crate::cache::warm;
use crate::commands::{Check, Command, CommandContext, CommandGroup, OwnerOnly};
use crate::ratelimit::{RateLimitPolicy, RateWindow};
use crate::utils::{format_duration, parse_snowflake, parse_switch};

pub struct Developer;

impl CommandGroup for Developer {
    fn name(&self) -> &str {
        "Developer"
    }

    fn description(&self) -> &str {
        "Bot owner tools"
    }

    fn commands(&self) -> Vec<Command> {
        vec![
            Command::new("blacklist", blacklist).description("Block a user or chat id"),
            Command::new("unblacklist", unblacklist).description("Unblock a user or chat id"),
            Command::new("premium", premium).description("Set premium for a user or chat id"),
            Command::new("maintenance", maintenance).description("Toggle maintenance mode"),
            Command::new("reloadcache", reload_cache)
                .alias("reload")
                .description("Reload cached settings from the database")
                .rate_limit(RateLimitPolicy::uniform(vec![RateWindow::per_secs(1, 30)])),
            Command::new("cachestats", cache_stats)
                .description("Show cache namespace sizes")
                .diagnostic(),
        ]
    }

    fn checks(&self) -> Vec<Arc<dyn Check>> {
        vec![Arc::new(OwnerOnly)]
    }
}

async fn blacklist(ctx: CommandContext) -> anyhow::Result<()> {
    let Some(id) = parse_snowflake(ctx.args()) else {
        return ctx.reply("Usage: blacklist &lt;user or chat id&gt;").await;
    };

    if id > 0 && ctx.state.gate.is_owner(id as u64) {
        return ctx.reply("Owners cannot be blacklisted.").await;
    }

    ctx.state.settings.set_blacklisted(id, true).await?;
    info!("{} blacklisted by {}", id, ctx.author_id());
    ctx.reply(format!("⛔ <code>{}</code> is blacklisted.", id))
        .await
}

async fn unblacklist(ctx: CommandContext) -> anyhow::Result<()> {
    let Some(id) = parse_snowflake(ctx.args()) else {
        return ctx.reply("Usage: unblacklist &lt;user or chat id&gt;").await;
    };

    ctx.state.settings.set_blacklisted(id, false).await?;
    info!("{} unblacklisted by {}", id, ctx.author_id());
    ctx.reply(format!("✅ <code>{}</code> is no longer blacklisted.", id))
        .await
}

async fn premium(ctx: CommandContext) -> anyhow::Result<()> {
    let mut args = ctx.args().split_whitespace();
    let id = args.next().and_then(parse_snowflake);
    let value = match args.next() {
        None => Some(true),
        Some(arg) => parse_switch(arg),
    };

    let (Some(id), Some(value)) = (id, value) else {
        return ctx.reply("Usage: premium &lt;id&gt; [on|off]").await;
    };

    ctx.state.settings.set_premium(id, value).await?;
    ctx.reply(format!(
        "Premium for <code>{}</code> is {}.",
        id,
        if value { "on" } else { "off" }
    ))
    .await
}

async fn maintenance(ctx: CommandContext) -> anyhow::Result<()> {
    let gate = &ctx.state.gate;
    let on = match ctx.args() {
        "" => !gate.maintenance(),
        arg => match parse_switch(arg) {
            Some(value) => value,
            None => return ctx.reply("Usage: maintenance [on|off]").await,
        },
    };

    gate.set_maintenance(on);
    info!("Maintenance set to {} by {}", on, ctx.author_id());
    ctx.reply(format!(
        "🛠 Maintenance mode is {}.",
        if on { "on" } else { "off" }
    ))
    .await
}

async fn reload_cache(ctx: CommandContext) -> anyhow::Result<()> {
    let report = warm(&ctx.state.cache, ctx.state.store.as_ref()).await;

    let mut text = format!(
        "♻️ Cache reloaded\nBlacklisted: {}\nPremium: {}\nTips: {}\nDisabled commands: {}",
        report.blacklisted, report.premium, report.tips_enabled, report.disabled_commands
    );
    if report.failures > 0 {
        text.push_str(&format!(
            "\n⚠️ {} queries failed, previous data kept",
            report.failures
        ));
    }

    ctx.reply(text).await
}

async fn cache_stats(ctx: CommandContext) -> anyhow::Result<()> {
    let cache = &ctx.state.cache;
    let size = |len: Option<usize>| len.map_or_else(|| "-".to_string(), |n| n.to_string());

    let text = format!(
        "<b>Cache</b> ({} namespaces)\n\
         {}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n\n\
         Uptime: {}",
        cache.len(),
        BLACKLISTED.name(),
        size(cache.get(&BLACKLISTED).map(|s| s.len())),
        PREMIUM.name(),
        size(cache.get(&PREMIUM).map(|s| s.len())),
        TIPS_ENABLED.name(),
        size(cache.get(&TIPS_ENABLED).map(|s| s.len())),
        DISABLED_COMMANDS.name(),
        size(cache.get(&DISABLED_COMMANDS).map(|m| m.len())),
        PREFIXES.name(),
        size(cache.get(&PREFIXES).map(|m| m.len())),
        format_duration(ctx.state.started_at.elapsed()),
    );

    ctx.reply(text).await
}
