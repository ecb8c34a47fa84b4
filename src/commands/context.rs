//! Invocation parsing and command context.

use std::sync::Arc;

use tracing::warn;

use super::{Command, CommandRegistry};
use crate::bot::dispatcher::AppState;
use crate::gate::Inbound;
use crate::prefix::Prefixes;

/// A message parsed against the prefixes its sender may use.
///
/// Valid only when a prefix matched and the word right after it names a
/// registered command.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub message: Inbound,
    /// The prefix as typed by the sender.
    pub prefix: Option<String>,
    /// The command word as typed by the sender.
    pub invoked_with: Option<String>,
    pub command: Option<Arc<Command>>,
    pub args: String,
}

impl Invocation {
    pub fn parse(message: Inbound, prefixes: &Prefixes, registry: &CommandRegistry) -> Self {
        let Some(prefix) = prefixes.find_in(&message.content).map(str::to_string) else {
            return Self {
                message,
                prefix: None,
                invoked_with: None,
                command: None,
                args: String::new(),
            };
        };

        let rest = &message.content[prefix.len()..];
        let (word, args) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], rest[idx..].trim()),
            None => (rest, ""),
        };

        let invoked_with = (!word.is_empty()).then(|| word.to_string());
        let command = invoked_with.as_deref().and_then(|w| registry.get(w));
        let args = args.to_string();

        Self {
            message,
            prefix: Some(prefix),
            invoked_with,
            command,
            args,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.prefix.is_some() && self.command.is_some()
    }
}

/// Everything a check or command body can reach.
#[derive(Clone)]
pub struct CommandContext {
    pub state: AppState,
    pub invocation: Arc<Invocation>,
    pub registry: Arc<CommandRegistry>,
}

impl CommandContext {
    pub fn new(state: AppState, invocation: Invocation, registry: Arc<CommandRegistry>) -> Self {
        Self {
            state,
            invocation: Arc::new(invocation),
            registry,
        }
    }

    pub fn message(&self) -> &Inbound {
        &self.invocation.message
    }

    pub fn author_id(&self) -> u64 {
        self.invocation.message.author_id
    }

    /// Text after the command word, trimmed.
    pub fn args(&self) -> &str {
        &self.invocation.args
    }

    /// The prefix the sender typed.
    pub fn prefix(&self) -> &str {
        self.invocation.prefix.as_deref().unwrap_or_default()
    }

    /// Send `text` (HTML) to the conversation the message came from.
    pub async fn reply(&self, text: impl AsRef<str>) -> anyhow::Result<()> {
        self.state
            .platform
            .send_message(self.message().channel_id, text.as_ref())
            .await
    }

    /// Reply, logging instead of failing.
    pub(crate) async fn reply_quietly(&self, text: impl AsRef<str>) {
        if let Err(e) = self.reply(text).await {
            warn!(
                "Failed to reply in {}: {:#}",
                self.message().channel_id,
                e
            );
        }
    }
}
