//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory with a `CommandGroup`
//! 2. Adding `pub mod your_plugin;` below
//! 3. Registering the group in `build_registry()`

pub mod developer;
pub mod general;
pub mod settings;

use crate::commands::{CommandRegistry, RegistryError};
use crate::ratelimit::RateLimitPolicy;

/// Build the registry with every command group.
pub fn build_registry(policy: RateLimitPolicy) -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new(policy);

    registry.add_group(&general::Core, Some("General"))?;
    registry.add_group(&settings::Config, Some("General"))?;
    registry.add_group(&developer::Developer, Some("Developer"))?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::cache::namespaces::PREFIXES;
    use crate::commands::{CheckFailure, InvokeOutcome};
    use crate::database::{BotStore, Flag};
    use crate::gate::{AuthorizationGate, GateOutcome};
    use crate::ratelimit::RateWindow;
    use crate::testing::{message, Harness};

    const OWNER: u64 = 1;
    const ADMIN: u64 = 2;
    const USER: u64 = 5;
    const GROUP: i64 = -100;

    const COMPLETED: GateOutcome = GateOutcome::Invoked(InvokeOutcome::Completed);

    fn setup() -> (Harness, AuthorizationGate) {
        let harness = Harness::new(&[OWNER]);
        harness.platform.add_admin(GROUP, ADMIN);

        let policy = RateLimitPolicy::uniform(vec![RateWindow::per_secs(1_000, 1)]);
        let registry = build_registry(policy).unwrap();
        let gate = AuthorizationGate::new(harness.state.clone(), Arc::new(registry));
        (harness, gate)
    }

    fn last_reply(harness: &Harness) -> String {
        harness
            .platform
            .sent()
            .last()
            .map(|(_, text)| text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_every_command_has_one_limiter() {
        let registry = build_registry(RateLimitPolicy::default()).unwrap();

        for command in registry.commands() {
            let limiters = command
                .checks()
                .iter()
                .filter(|c| c.as_any().is::<crate::ratelimit::RateLimiter>())
                .count();
            assert_eq!(limiters, 1, "{}", command.name());
        }
    }

    #[tokio::test]
    async fn test_setprefix_by_admin() {
        let (harness, gate) = setup();

        assert_eq!(gate.process(message(ADMIN, Some(GROUP), "g.setprefix !")).await, COMPLETED);
        assert!(last_reply(&harness).contains("<code>!</code>"));
        assert_eq!(harness.store.guild(GROUP).unwrap().prefix.as_deref(), Some("!"));
        assert_eq!(
            harness.state.cache.get(&PREFIXES).unwrap().get(&GROUP).unwrap().as_str(),
            "!"
        );

        assert_eq!(gate.process(message(USER, Some(GROUP), "!prefix")).await, COMPLETED);
        assert!(last_reply(&harness).contains("<code>!</code>"));
    }

    #[tokio::test]
    async fn test_setprefix_requires_admin_and_valid_prefix() {
        let (harness, gate) = setup();

        let outcome = gate.process(message(USER, Some(GROUP), "g.setprefix !")).await;
        assert_eq!(
            outcome,
            GateOutcome::Invoked(InvokeOutcome::CheckFailed(CheckFailure::MissingPermission(
                "group admin"
            )))
        );

        gate.process(message(ADMIN, Some(GROUP), "g.setprefix way-too-long!")).await;
        assert!(last_reply(&harness).contains("at most 10"));
        assert!(harness.store.guild(GROUP).is_none());
    }

    #[tokio::test]
    async fn test_disable_and_enable() {
        let (harness, gate) = setup();

        gate.process(message(ADMIN, Some(GROUP), "g.disable PING")).await;
        assert!(harness.state.settings.is_disabled("ping", &[GROUP]));

        assert_eq!(
            gate.process(message(USER, Some(GROUP), "g.ping")).await,
            GateOutcome::Disabled
        );

        gate.process(message(ADMIN, Some(GROUP), "g.enable ping")).await;
        assert!(!harness.state.settings.is_disabled("ping", &[GROUP]));
        assert_eq!(gate.process(message(USER, Some(GROUP), "g.ping")).await, COMPLETED);
    }

    #[tokio::test]
    async fn test_disable_refuses_itself_and_unknown_commands() {
        let (harness, gate) = setup();

        gate.process(message(ADMIN, Some(GROUP), "g.disable disable")).await;
        assert!(last_reply(&harness).contains("cannot be toggled"));

        gate.process(message(ADMIN, Some(GROUP), "g.disable nothing")).await;
        assert!(last_reply(&harness).contains("No command"));

        assert!(harness.store.disabled_rows().is_empty());
    }

    #[tokio::test]
    async fn test_disable_only_works_in_groups() {
        let (harness, gate) = setup();

        assert_eq!(
            gate.process(message(USER, None, "g.disable ping")).await,
            GateOutcome::Invoked(InvokeOutcome::CheckFailed(CheckFailure::GuildOnly))
        );
        assert!(last_reply(&harness).contains("only works in groups"));
        assert!(harness.store.disabled_rows().is_empty());
    }

    #[tokio::test]
    async fn test_tips_toggle() {
        let (harness, gate) = setup();

        gate.process(message(USER, None, "g.tips")).await;
        assert!(harness.state.settings.tips_enabled(USER as i64));

        gate.process(message(USER, None, "g.tips off")).await;
        assert!(!harness.state.settings.tips_enabled(USER as i64));
        assert!(!harness.store.user(USER as i64).unwrap().tips);
    }

    #[tokio::test]
    async fn test_blacklist_takes_effect_immediately() {
        let (harness, gate) = setup();

        assert_eq!(gate.process(message(OWNER, None, "blacklist 5")).await, COMPLETED);
        assert!(harness.store.user(USER as i64).unwrap().blacklisted);

        assert_eq!(
            gate.process(message(USER, Some(GROUP), "g.ping")).await,
            GateOutcome::Blacklisted
        );

        gate.process(message(OWNER, None, "g.unblacklist 5")).await;
        assert_eq!(gate.process(message(USER, Some(GROUP), "g.ping")).await, COMPLETED);
    }

    #[tokio::test]
    async fn test_owners_cannot_be_blacklisted() {
        let (harness, gate) = setup();

        gate.process(message(OWNER, None, "g.blacklist 1")).await;
        assert!(!harness.state.settings.is_blacklisted(OWNER as i64));
    }

    #[tokio::test]
    async fn test_developer_commands_are_silent_for_others() {
        let (harness, gate) = setup();

        let outcome = gate.process(message(USER, Some(GROUP), "g.maintenance on")).await;

        assert_eq!(
            outcome,
            GateOutcome::Invoked(InvokeOutcome::CheckFailed(CheckFailure::NotOwner))
        );
        assert!(!harness.state.gate.maintenance());
        assert!(harness.platform.sent().is_empty());
    }

    #[tokio::test]
    async fn test_maintenance_command() {
        let (harness, gate) = setup();

        gate.process(message(OWNER, None, "g.maintenance")).await;
        assert!(harness.state.gate.maintenance());

        gate.process(message(OWNER, None, "g.maintenance off")).await;
        assert!(!harness.state.gate.maintenance());
    }

    #[tokio::test]
    async fn test_premium_command() {
        let (harness, gate) = setup();

        gate.process(message(OWNER, None, "g.premium -100")).await;
        assert!(harness.state.settings.is_premium(GROUP));
        assert!(harness.store.guild(GROUP).unwrap().premium);

        gate.process(message(OWNER, None, "g.premium -100 off")).await;
        assert!(!harness.state.settings.is_premium(GROUP));
    }

    #[tokio::test]
    async fn test_reloadcache_picks_up_external_writes() {
        let (harness, gate) = setup();
        harness.store.set_flag(9, Flag::Blacklisted, true).await.unwrap();
        assert!(!harness.state.settings.is_blacklisted(9));

        gate.process(message(OWNER, None, "g.reload")).await;

        assert!(harness.state.settings.is_blacklisted(9));
        assert!(last_reply(&harness).contains("Blacklisted: 1"));
    }

    #[tokio::test]
    async fn test_reloadcache_has_its_own_cooldown() {
        let (harness, gate) = setup();

        assert_eq!(gate.process(message(OWNER, None, "g.reloadcache")).await, COMPLETED);
        let second = gate.process(message(OWNER, None, "g.reload")).await;

        assert!(matches!(
            second,
            GateOutcome::Invoked(InvokeOutcome::CheckFailed(CheckFailure::RateLimited { .. }))
        ));
        assert!(last_reply(&harness).contains("cooldown"));
        // Other commands still run under the default policy.
        assert_eq!(gate.process(message(OWNER, None, "g.ping")).await, COMPLETED);
    }

    #[tokio::test]
    async fn test_cachestats_skips_typing() {
        let (harness, gate) = setup();
        harness.state.settings.set_blacklisted(9, true).await.unwrap();

        gate.process(message(USER, Some(GROUP), "hi")).await;
        assert_eq!(gate.process(message(OWNER, Some(GROUP), "g.cachestats")).await, COMPLETED);

        assert!(harness.platform.typing().is_empty());
        assert!(last_reply(&harness).contains("blacklisted_users: 1"));
    }

    #[tokio::test]
    async fn test_help_hides_developer_commands() {
        let (harness, gate) = setup();

        gate.process(message(USER, None, "g.help")).await;
        let text = last_reply(&harness);
        assert!(text.contains("g.setprefix"));
        assert!(text.contains("<i>(Per-chat settings)</i>"));
        assert!(!text.contains("g.blacklist"));

        gate.process(message(USER, None, "g.help blacklist")).await;
        assert!(last_reply(&harness).contains("No command"));

        gate.process(message(OWNER, None, "g.help")).await;
        assert!(last_reply(&harness).contains("g.blacklist"));
    }
}
