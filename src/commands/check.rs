//! Command checks.

use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::CommandContext;

/// Why a check refused an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    /// `notify` is set only on the first rejection of a cooldown, so a
    /// flooding user gets one notice rather than one per message.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration, notify: bool },

    #[error("command is restricted to bot owners")]
    NotOwner,

    #[error("command only works in group chats")]
    GuildOnly,

    #[error("missing permission: {0}")]
    MissingPermission(&'static str),
}

/// One step of a command's check chain.
#[async_trait]
pub trait Check: Send + Sync + 'static {
    async fn check(&self, ctx: &CommandContext) -> Result<(), CheckFailure>;

    /// For detecting a check's concrete type in a command's chain.
    fn as_any(&self) -> &dyn Any;
}

/// Only bot owners may run the command.
pub struct OwnerOnly;

#[async_trait]
impl Check for OwnerOnly {
    async fn check(&self, ctx: &CommandContext) -> Result<(), CheckFailure> {
        if ctx.state.gate.is_owner(ctx.author_id()) {
            Ok(())
        } else {
            Err(CheckFailure::NotOwner)
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The command must be run inside a group chat.
pub struct GuildOnly;

#[async_trait]
impl Check for GuildOnly {
    async fn check(&self, ctx: &CommandContext) -> Result<(), CheckFailure> {
        match ctx.message().guild_id {
            Some(_) => Ok(()),
            None => Err(CheckFailure::GuildOnly),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The invoker must administer the group.
///
/// Passes in private chats, where the invoker's own scope is the one
/// being configured.
pub struct AdminOnly;

#[async_trait]
impl Check for AdminOnly {
    async fn check(&self, ctx: &CommandContext) -> Result<(), CheckFailure> {
        let Some(guild_id) = ctx.message().guild_id else {
            return Ok(());
        };

        let is_admin = ctx
            .state
            .permissions
            .is_admin(guild_id, ctx.author_id())
            .await
            .unwrap_or(false);

        if is_admin {
            Ok(())
        } else {
            Err(CheckFailure::MissingPermission("group admin"))
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
