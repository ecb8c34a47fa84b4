//! Database module exports.

#[cfg(test)]
mod memory;
mod models;
mod mongo;
mod repository;
mod store;

#[cfg(test)]
pub use memory::MemoryStore;
pub use models::*;
pub use mongo::Database;
pub use repository::SettingsRepo;
pub use store::{BotStore, Flag};
