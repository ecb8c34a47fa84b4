//! Cache module - in-memory state for the dispatch gate.
//!
//! ## Architecture
//!
//! - `CacheManager` - named, never-evicted datasets (blacklist, premium,
//!   tips, disabled commands, prefixes), cold-loaded by [`warm`] and kept
//!   current by `SettingsRepo`
//! - `TypedCache` - expiring Moka cache for state that may vanish on its
//!   own (rate-limit buckets, admin lookups)
//!
//! ## Usage
//!
//! ```rust
//! let cache = CacheManager::new();
//! warm(&cache, store.as_ref()).await;
//!
//! let blacklisted = cache.ensure(&namespaces::BLACKLISTED, Default::default);
//! if blacklisted.contains(&user_id) {
//!     return;
//! }
//! ```

mod config;
mod manager;
pub mod namespaces;
mod typed;
mod warm;

pub use config::CacheConfig;
pub use manager::{CacheManager, Namespace};
pub use typed::TypedCache;
pub use warm::warm;
