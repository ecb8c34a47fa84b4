//! Command registry, groups and categories.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use super::{Check, CheckFailure, Command, CommandContext};
use crate::ratelimit::{RateLimitPolicy, RateLimiter};
use crate::utils::format_retry_after;

/// Category for groups registered without one.
pub const UNLISTED: &str = "Unlisted";

/// A set of related commands sharing checks.
pub trait CommandGroup {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn commands(&self) -> Vec<Command>;

    /// Checks run before each command's own checks.
    fn checks(&self) -> Vec<Arc<dyn Check>> {
        Vec::new()
    }
}

/// Named list of command groups shown together in help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub groups: Vec<GroupInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub name: String,
    pub description: String,
    /// Command names in registration order.
    pub commands: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command name or alias '{0}' is already registered")]
    Duplicate(String),
}

/// What happened to a valid invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeOutcome {
    Completed,
    CheckFailed(CheckFailure),
    /// The command body returned an error.
    Failed,
}

/// All registered commands.
pub struct CommandRegistry {
    default_policy: RateLimitPolicy,
    commands: Vec<Arc<Command>>,
    /// Lowercased names and aliases.
    lookup: HashMap<String, Arc<Command>>,
    categories: Vec<Category>,
}

impl CommandRegistry {
    /// Create an empty registry. `default_policy` is attached to every
    /// command that does not bring its own limiter.
    pub fn new(default_policy: RateLimitPolicy) -> Self {
        Self {
            default_policy,
            commands: Vec::new(),
            lookup: HashMap::new(),
            categories: Vec::new(),
        }
    }

    /// Register every command of a group under `category`.
    pub fn add_group(
        &mut self,
        group: &dyn CommandGroup,
        category: Option<&str>,
    ) -> Result<(), RegistryError> {
        let group_checks = group.checks();
        let mut names = Vec::new();

        for mut command in group.commands() {
            command.set_group(group.name());
            if !group_checks.is_empty() {
                let own = std::mem::take(&mut command.checks);
                command.checks = group_checks.iter().cloned().chain(own).collect();
            }
            names.push(command.name().to_string());
            self.add_command(command)?;
        }

        let category_name = category.unwrap_or(UNLISTED);
        let info = GroupInfo {
            name: group.name().to_string(),
            description: group.description().to_string(),
            commands: names,
        };

        match self.categories.iter_mut().find(|c| c.name == category_name) {
            Some(category) => category.groups.push(info),
            None => self.categories.push(Category {
                name: category_name.to_string(),
                groups: vec![info],
            }),
        }

        info!(
            "Registered group {} in category {}",
            group.name(),
            category_name
        );
        Ok(())
    }

    /// Register a single command, attaching the default rate limiter
    /// unless the command already carries one.
    pub fn add_command(&mut self, mut command: Command) -> Result<Arc<Command>, RegistryError> {
        let keys: Vec<String> = std::iter::once(command.name().to_string())
            .chain(command.aliases().iter().cloned())
            .collect();

        if let Some(taken) = keys.iter().find(|k| self.lookup.contains_key(*k)) {
            return Err(RegistryError::Duplicate(taken.clone()));
        }

        if !command.has_check::<RateLimiter>() {
            let limiter = RateLimiter::new(command.name(), self.default_policy.clone());
            command.checks.push(Arc::new(limiter));
        }

        let command = Arc::new(command);
        for key in keys {
            self.lookup.insert(key, Arc::clone(&command));
        }
        self.commands.push(Arc::clone(&command));

        debug!("Registered command {}", command.name());
        Ok(command)
    }

    /// Look up a command by name or alias, ignoring case.
    pub fn get(&self, name: &str) -> Option<Arc<Command>> {
        self.lookup.get(&name.to_lowercase()).cloned()
    }

    /// Commands in registration order.
    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Run the check chain and then the body of a valid invocation.
    ///
    /// With `typing`, the typing indicator is shown once the checks have
    /// passed. Check failures become replies (or nothing, for owner-only
    /// commands); body errors are logged and go no further.
    pub async fn invoke(&self, ctx: CommandContext, typing: bool) -> Option<InvokeOutcome> {
        let command = ctx.invocation.command.clone()?;

        if let Err(failure) = command.run_checks(&ctx).await {
            debug!(
                "Check failed for {} by {}: {}",
                command.name(),
                ctx.author_id(),
                failure
            );
            if let Some(notice) = notice_for(&command, &ctx, &failure).await {
                ctx.reply_quietly(notice).await;
            }
            return Some(InvokeOutcome::CheckFailed(failure));
        }

        if typing {
            let channel_id = ctx.message().channel_id;
            if let Err(e) = ctx.state.platform.trigger_typing(channel_id).await {
                debug!("Typing indicator failed in {}: {:#}", channel_id, e);
            }
        }

        let author = ctx.author_id();
        match command.call(ctx).await {
            Ok(()) => Some(InvokeOutcome::Completed),
            Err(e) => {
                error!(
                    "Command {} failed for user {}: {:#}",
                    command.name(),
                    author,
                    e
                );
                Some(InvokeOutcome::Failed)
            }
        }
    }
}

/// Reply for a failed check, if any.
///
/// Refusals other than rate limits are charged to the command's
/// limiter and stay silent once it is exhausted.
async fn notice_for(
    command: &Command,
    ctx: &CommandContext,
    failure: &CheckFailure,
) -> Option<String> {
    if !matches!(failure, CheckFailure::RateLimited { .. }) {
        if let Some(limiter) = command.limiter() {
            limiter.check(ctx).await.ok()?;
        }
    }
    failure_notice(failure)
}

fn failure_notice(failure: &CheckFailure) -> Option<String> {
    match failure {
        CheckFailure::RateLimited {
            retry_after,
            notify: true,
        } => Some(format!(
            "⏳ You're on cooldown. Try again in {}.",
            format_retry_after(*retry_after)
        )),
        CheckFailure::RateLimited { notify: false, .. } => None,
        CheckFailure::GuildOnly => Some("This command only works in groups.".to_string()),
        CheckFailure::MissingPermission(what) => {
            Some(format!("You need {} rights to use this command.", what))
        }
        CheckFailure::NotOwner => None,
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}
