//! Chat settings: prefix, disabled commands, tips.

use crate::commands::{AdminOnly, Command, CommandContext, CommandGroup, GuildOnly};
use crate::utils::{html_escape, parse_switch};

/// Longest prefix a chat may configure.
pub const MAX_PREFIX_LEN: usize = 10;

/// Commands that can never be disabled.
const PROTECTED: &[&str] = &["disable", "enable"];

pub struct Config;

impl CommandGroup for Config {
    fn name(&self) -> &str {
        "Config"
    }

    fn description(&self) -> &str {
        "Per-chat settings"
    }

    fn commands(&self) -> Vec<Command> {
        vec![
            Command::new("setprefix", set_prefix)
                .description("Change the prefix for this chat")
                .check(AdminOnly),
            Command::new("disable", disable)
                .description("Disable a command in this chat")
                .check(GuildOnly)
                .check(AdminOnly),
            Command::new("enable", enable)
                .description("Re-enable a disabled command")
                .check(GuildOnly)
                .check(AdminOnly),
            Command::new("tips", tips).description("Turn usage tips on or off for yourself"),
        ]
    }
}

/// Why a prefix was refused.
fn invalid_prefix(prefix: &str) -> Option<&'static str> {
    if prefix.is_empty() {
        Some("The prefix cannot be empty.")
    } else if prefix.chars().any(char::is_whitespace) {
        Some("The prefix cannot contain spaces.")
    } else if prefix.chars().count() > MAX_PREFIX_LEN {
        Some("The prefix can be at most 10 characters.")
    } else {
        None
    }
}

async fn set_prefix(ctx: CommandContext) -> anyhow::Result<()> {
    let new_prefix = ctx.args();

    if let Some(reason) = invalid_prefix(new_prefix) {
        return ctx.reply(reason).await;
    }

    let scope = ctx.message().scope_id();
    ctx.state.settings.set_prefix(scope, new_prefix).await?;

    ctx.reply(format!(
        "✅ Prefix changed to <code>{}</code>",
        html_escape(new_prefix)
    ))
    .await
}

/// Resolve the command argument to a registered command name that may be
/// toggled, replying with the reason otherwise.
async fn target_command(ctx: &CommandContext) -> anyhow::Result<Option<String>> {
    let Some(arg) = ctx.args().split_whitespace().next() else {
        ctx.reply(format!(
            "Usage: <code>{}{} &lt;command&gt;</code>",
            html_escape(ctx.prefix()),
            ctx.invocation.invoked_with.as_deref().unwrap_or_default()
        ))
        .await?;
        return Ok(None);
    };

    let Some(command) = ctx.registry.get(arg) else {
        ctx.reply(format!("No command called <code>{}</code>.", html_escape(arg)))
            .await?;
        return Ok(None);
    };

    if PROTECTED.contains(&command.name()) {
        ctx.reply(format!("<code>{}</code> cannot be toggled.", command.name()))
            .await?;
        return Ok(None);
    }

    Ok(Some(command.name().to_string()))
}

async fn disable(ctx: CommandContext) -> anyhow::Result<()> {
    let Some(name) = target_command(&ctx).await? else {
        return Ok(());
    };

    let channel = ctx.message().channel_id;
    if ctx.state.settings.is_disabled(&name, &[channel]) {
        return ctx
            .reply(format!("<code>{}</code> is already disabled here.", name))
            .await;
    }

    ctx.state.settings.disable_command(&name, channel).await?;
    ctx.reply(format!("🚫 <code>{}</code> is now disabled here.", name))
        .await
}

async fn enable(ctx: CommandContext) -> anyhow::Result<()> {
    let Some(name) = target_command(&ctx).await? else {
        return Ok(());
    };

    let channel = ctx.message().channel_id;
    if !ctx.state.settings.is_disabled(&name, &[channel]) {
        return ctx
            .reply(format!("<code>{}</code> is not disabled here.", name))
            .await;
    }

    ctx.state.settings.enable_command(&name, channel).await?;
    ctx.reply(format!("✅ <code>{}</code> is enabled again.", name))
        .await
}

async fn tips(ctx: CommandContext) -> anyhow::Result<()> {
    let user = ctx.message().author_snowflake();
    let current = ctx.state.settings.tips_enabled(user);

    let enabled = match ctx.args() {
        "" => !current,
        arg => match parse_switch(arg) {
            Some(value) => value,
            None => return ctx.reply("Usage: tips [on|off]").await,
        },
    };

    ctx.state.settings.set_tips(user, enabled).await?;
    ctx.reply(if enabled {
        "💡 Tips are on."
    } else {
        "Tips are off."
    })
    .await
}
