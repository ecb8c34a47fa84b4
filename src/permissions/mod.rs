//! Permission system for checking user roles.
//!
//! ## Usage
//!
//! ```rust
//! let perms = Permissions::with_owners(platform.clone(), &config.owner_ids);
//!
//! if perms.is_admin(guild_id, user_id).await? {
//!     // ...
//! }
//! ```

mod checker;

pub use checker::Permissions;
