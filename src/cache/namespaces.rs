//! Namespaces the dispatch gate reads on every message.

use dashmap::{DashMap, DashSet};

use super::Namespace;

/// Set of snowflake ids (users or chats).
pub type IdSet = DashSet<i64>;

/// Scope id -> configured prefix.
pub type PrefixMap = DashMap<i64, String>;

/// Command name -> scope ids where it is disabled, in store order.
pub type DisabledCommands = DashMap<String, Vec<i64>>;

pub const BLACKLISTED: Namespace<IdSet> = Namespace::new("blacklisted_users");
pub const PREMIUM: Namespace<IdSet> = Namespace::new("premium_users");
pub const TIPS_ENABLED: Namespace<IdSet> = Namespace::new("tips_are_on");
pub const DISABLED_COMMANDS: Namespace<DisabledCommands> = Namespace::new("disabled_commands");
pub const PREFIXES: Namespace<PrefixMap> = Namespace::new("prefix");
