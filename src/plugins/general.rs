//! General commands: ping, prefix, help.

use std::time::Instant;

use crate::commands::{Command, CommandContext, CommandGroup};
use crate::utils::html_escape;

/// Categories hidden from non-owners in help.
const OWNER_CATEGORIES: &[&str] = &["Developer"];

pub struct Core;

impl CommandGroup for Core {
    fn name(&self) -> &str {
        "Core"
    }

    fn description(&self) -> &str {
        "Basic bot commands"
    }

    fn commands(&self) -> Vec<Command> {
        vec![
            Command::new("ping", ping).description("Check bot latency"),
            Command::new("prefix", prefix).description("Show the prefix for this chat"),
            Command::new("help", help)
                .alias("commands")
                .description("List commands, or describe one"),
        ]
    }
}

/// Measures a typing-indicator round trip to the Telegram API.
async fn ping(ctx: CommandContext) -> anyhow::Result<()> {
    let start = Instant::now();
    ctx.state
        .platform
        .trigger_typing(ctx.message().channel_id)
        .await?;
    let ms = start.elapsed().as_millis();

    let emoji = if ms < 100 {
        "🟢"
    } else if ms < 300 {
        "🟡"
    } else {
        "🔴"
    };

    ctx.reply(format!("{} Pong! <code>{}ms</code>", emoji, ms))
        .await
}

async fn prefix(ctx: CommandContext) -> anyhow::Result<()> {
    let prefix = ctx.state.prefixes.resolve(ctx.message().scope_id()).await;
    ctx.reply(format!(
        "Prefix here is <code>{}</code>",
        html_escape(&prefix)
    ))
    .await
}

async fn help(ctx: CommandContext) -> anyhow::Result<()> {
    let is_owner = ctx.state.gate.is_owner(ctx.author_id());
    let prefix = html_escape(ctx.prefix());

    let query = ctx.args().split_whitespace().next();
    if let Some(name) = query {
        let command = ctx
            .registry
            .get(name)
            .filter(|c| is_owner || !is_owner_only(&ctx, c.group()));

        let Some(command) = command else {
            return ctx
                .reply(format!("No command called <code>{}</code>.", html_escape(name)))
                .await;
        };

        let mut text = format!("<b>{}{}</b>", prefix, command.name());
        if !command.help().is_empty() {
            text.push_str(&format!("\n{}", html_escape(command.help())));
        }
        if !command.aliases().is_empty() {
            text.push_str(&format!("\nAliases: {}", command.aliases().join(", ")));
        }
        return ctx.reply(text).await;
    }

    let mut text = String::from("<b>Commands</b>\n");
    for category in ctx.registry.categories() {
        if !is_owner && OWNER_CATEGORIES.contains(&category.name.as_str()) {
            continue;
        }

        text.push_str(&format!("\n<b>{}</b>\n", html_escape(&category.name)));
        for group in &category.groups {
            let names: Vec<String> = group
                .commands
                .iter()
                .map(|c| format!("<code>{}{}</code>", prefix, c))
                .collect();
            text.push_str(&html_escape(&group.name));
            if !group.description.is_empty() {
                text.push_str(&format!(" <i>({})</i>", html_escape(&group.description)));
            }
            text.push_str(&format!(": {}\n", names.join(" ")));
        }
    }
    text.push_str(&format!(
        "\nUse <code>{}help &lt;command&gt;</code> for details.",
        prefix
    ));

    ctx.reply(text).await
}

/// Whether the group a command belongs to sits in an owner-only category.
fn is_owner_only(ctx: &CommandContext, group: Option<&str>) -> bool {
    let Some(group) = group else {
        return false;
    };

    ctx.registry.categories().iter().any(|category| {
        OWNER_CATEGORIES.contains(&category.name.as_str())
            && category.groups.iter().any(|g| g.name == group)
    })
}
