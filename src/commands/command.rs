//! Command definition.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::{Check, CheckFailure, CommandContext};
use crate::ratelimit::{RateLimitPolicy, RateLimiter};

type Handler = Arc<dyn Fn(CommandContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// A registered command: metadata, check chain, and body.
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    group: Option<String>,
    diagnostic: bool,
    pub(super) checks: Vec<Arc<dyn Check>>,
    handler: Handler,
}

impl Command {
    /// Create a command from an async handler.
    ///
    /// Names are matched case-insensitively and stored lowercase.
    pub fn new<F, Fut>(name: &str, handler: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            name: name.to_lowercase(),
            aliases: Vec::new(),
            description: String::new(),
            group: None,
            diagnostic: false,
            checks: Vec::new(),
            handler: Arc::new(move |ctx| handler(ctx).boxed()),
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_lowercase());
        self
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Mark as an introspection command: no typing indicator is shown.
    #[must_use]
    pub fn diagnostic(mut self) -> Self {
        self.diagnostic = true;
        self
    }

    #[must_use]
    pub fn check(mut self, check: impl Check) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Use a custom rate limit instead of the registry default.
    #[must_use]
    pub fn rate_limit(self, policy: RateLimitPolicy) -> Self {
        let limiter = RateLimiter::new(&self.name, policy);
        self.check(limiter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn help(&self) -> &str {
        &self.description
    }

    /// Name of the command group this command was registered with.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic
    }

    #[cfg(test)]
    pub fn checks(&self) -> &[Arc<dyn Check>] {
        &self.checks
    }

    /// The rate limiter in this command's check chain.
    pub fn limiter(&self) -> Option<&RateLimiter> {
        self.checks
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<RateLimiter>())
    }

    /// Whether the check chain contains a check of type `T`.
    pub fn has_check<T: Check>(&self) -> bool {
        self.checks.iter().any(|c| c.as_any().is::<T>())
    }

    pub(super) fn set_group(&mut self, group: &str) {
        self.group = Some(group.to_string());
    }

    /// Run the check chain in order, stopping at the first failure.
    pub(super) async fn run_checks(&self, ctx: &CommandContext) -> Result<(), CheckFailure> {
        for check in &self.checks {
            check.check(ctx).await?;
        }
        Ok(())
    }

    pub(super) fn call(&self, ctx: CommandContext) -> BoxFuture<'static, anyhow::Result<()>> {
        (self.handler)(ctx)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("group", &self.group)
            .field("checks", &self.checks.len())
            .finish()
    }
}
