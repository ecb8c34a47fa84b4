//! Command prefix resolution.
//!
//! Each scope (group chat, or user in private chats) has one prefix,
//! matched case-insensitively. Bot owners may also use the owner literal
//! or no prefix at all.

mod matching;
mod resolver;

pub use matching::Prefixes;
pub use resolver::PrefixResolver;
