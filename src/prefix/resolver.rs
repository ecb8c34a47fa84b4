//! Prefix resolver with read-through caching.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use super::matching::{match_prefix, Prefixes};
use crate::cache::namespaces::{PrefixMap, PREFIXES};
use crate::cache::CacheManager;
use crate::database::BotStore;
use crate::gate::Inbound;

/// A store lookup shared by every caller missing the same scope.
/// `None` means the store failed.
type Lookup = Shared<BoxFuture<'static, Option<String>>>;

/// A pending lookup and the namespace container its answer belongs in.
///
/// A cache reload swaps the container, which orphans lookups started
/// against the old one: their answers may predate the reload.
struct InFlight {
    target: Arc<PrefixMap>,
    lookup: Lookup,
}

/// Resolves the command prefix for a conversation.
///
/// The `prefix` namespace is filled lazily: a miss queries the store once
/// (concurrent misses for the same scope share that query), writes the
/// result into the namespace, and returns it. Scopes with no configured
/// prefix get the default, which is cached like any other value.
pub struct PrefixResolver {
    store: Arc<dyn BotStore>,
    cache: CacheManager,
    default_prefix: String,
    owner_prefix: String,
    in_flight: DashMap<i64, InFlight>,
}

impl PrefixResolver {
    pub fn new(
        store: Arc<dyn BotStore>,
        cache: CacheManager,
        default_prefix: impl Into<String>,
        owner_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache,
            default_prefix: default_prefix.into(),
            owner_prefix: owner_prefix.into(),
            in_flight: DashMap::new(),
        }
    }

    /// The configured prefix of a scope.
    ///
    /// Never fails: if the store is unreachable the default is returned
    /// (and not cached, so the next message retries).
    pub async fn resolve(&self, scope: i64) -> String {
        let prefixes = self.cache.ensure(&PREFIXES, PrefixMap::new);
        if let Some(prefix) = prefixes.get(&scope) {
            return prefix.clone();
        }

        let lookup = {
            let mut entry = self.in_flight.entry(scope).or_insert_with(|| InFlight {
                target: Arc::clone(&prefixes),
                lookup: self.lookup(scope),
            });
            if !Arc::ptr_eq(&entry.target, &prefixes) {
                debug!("Dropping prefix lookup for {} started before a reload", scope);
                *entry = InFlight {
                    target: Arc::clone(&prefixes),
                    lookup: self.lookup(scope),
                };
            }
            entry.lookup.clone()
        };

        let prefix = match lookup.await {
            Some(prefix) => prefixes
                .entry(scope)
                // A handler may have set the prefix while we were waiting.
                .or_insert(prefix)
                .clone(),
            None => self.default_prefix.clone(),
        };

        self.in_flight
            .remove_if(&scope, |_, pending| Arc::ptr_eq(&pending.target, &prefixes));
        prefix
    }

    /// The prefix to strip from `text`.
    ///
    /// If `text` starts with the scope's prefix in any casing, the matched
    /// slice is returned as typed; otherwise the configured prefix.
    pub async fn effective_prefix(&self, scope: i64, text: &str) -> String {
        let prefix = self.resolve(scope).await;
        match match_prefix(&prefix, text) {
            Some(matched) => matched.to_string(),
            None => prefix,
        }
    }

    /// Prefixes a message may use.
    ///
    /// Owners additionally get the owner literal and the empty prefix,
    /// so any of their messages can be a command.
    pub async fn prefixes_for(&self, msg: &Inbound, is_owner: bool) -> Prefixes {
        let scope = msg.scope_id();

        if is_owner {
            let configured = self.resolve(scope).await;
            return Prefixes::Many(vec![configured, self.owner_prefix.clone(), String::new()]);
        }

        Prefixes::Single(self.effective_prefix(scope, &msg.content).await)
    }

    fn lookup(&self, scope: i64) -> Lookup {
        let store = Arc::clone(&self.store);
        let default = self.default_prefix.clone();

        async move {
            match store.prefix(scope).await {
                Ok(Some(prefix)) => Some(prefix),
                Ok(None) => {
                    debug!("No prefix row for {}, using default", scope);
                    Some(default)
                }
                Err(e) => {
                    warn!("Prefix lookup for {} failed, using default: {:#}", scope, e);
                    None
                }
            }
        }
        .boxed()
        .shared()
    }
}
