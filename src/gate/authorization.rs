//! The per-message authorization pipeline.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{Inbound, MAINTENANCE_NOTICE};
use crate::bot::AppState;
use crate::commands::{CommandContext, CommandRegistry, Invocation, InvokeOutcome};

/// What the gate decided for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Sent by a bot account.
    IgnoredBot,
    /// No prefix, or no command after it.
    NotCommand,
    /// Maintenance notice sent instead of invoking.
    Maintenance,
    /// Author or group is blacklisted; dropped silently.
    Blacklisted,
    /// Command is disabled in this channel or group; dropped silently.
    Disabled,
    Invoked(InvokeOutcome),
}

/// Decides whether an inbound message reaches a command.
///
/// After prefix resolution every check is a read of an already-warm
/// cache namespace; nothing here waits on the store.
#[derive(Clone)]
pub struct AuthorizationGate {
    state: AppState,
    registry: Arc<CommandRegistry>,
}

impl AuthorizationGate {
    pub fn new(state: AppState, registry: Arc<CommandRegistry>) -> Self {
        Self { state, registry }
    }

    pub async fn process(&self, msg: Inbound) -> GateOutcome {
        if msg.author_is_bot {
            return GateOutcome::IgnoredBot;
        }

        let is_owner = self.state.gate.is_owner(msg.author_id);
        let prefixes = self.state.prefixes.prefixes_for(&msg, is_owner).await;
        let invocation = Invocation::parse(msg, &prefixes, &self.registry);
        let valid = invocation.is_valid();

        if is_owner {
            return if valid {
                self.invoke(invocation, false).await
            } else {
                GateOutcome::NotCommand
            };
        }

        let msg = &invocation.message;

        if valid && self.state.gate.maintenance() {
            debug!("Maintenance: refusing command from {}", msg.author_id);
            if let Err(e) = self
                .state
                .platform
                .send_message(msg.channel_id, MAINTENANCE_NOTICE)
                .await
            {
                warn!("Failed to send maintenance notice: {:#}", e);
            }
            return GateOutcome::Maintenance;
        }

        let settings = &self.state.settings;
        if settings.is_blacklisted(msg.author_snowflake())
            || msg.guild_id.is_some_and(|g| settings.is_blacklisted(g))
        {
            debug!(
                "Dropping message from blacklisted {} in {}",
                msg.author_id, msg.channel_id
            );
            return GateOutcome::Blacklisted;
        }

        let Some(command) = invocation.command.clone().filter(|_| valid) else {
            return GateOutcome::NotCommand;
        };

        let scopes: Vec<i64> = std::iter::once(msg.channel_id)
            .chain(msg.guild_id)
            .collect();
        if settings.is_disabled(command.name(), &scopes) {
            debug!("Command {} is disabled in {:?}", command.name(), scopes);
            return GateOutcome::Disabled;
        }

        let typing = !command.is_diagnostic();
        self.invoke(invocation, typing).await
    }

    /// With `typing`, the registry shows the indicator after the check chain.
    async fn invoke(&self, invocation: Invocation, typing: bool) -> GateOutcome {
        let ctx = CommandContext::new(self.state.clone(), invocation, Arc::clone(&self.registry));
        match self.registry.invoke(ctx, typing).await {
            Some(outcome) => GateOutcome::Invoked(outcome),
            None => GateOutcome::NotCommand,
        }
    }
}
