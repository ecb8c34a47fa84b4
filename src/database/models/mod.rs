//! Database model exports.

pub mod disabled_command;
pub mod guild_config;
pub mod user_data;

pub use disabled_command::DisabledCommand;
pub use guild_config::GuildConfig;
pub use user_data::UserData;

/// Whether a snowflake names a group chat rather than a user.
///
/// Telegram group and channel ids are negative, user ids are positive.
pub fn is_chat_id(snowflake: i64) -> bool {
    snowflake < 0
}
