//! Guild (group chat) configuration model.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One row per group chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildConfig {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Telegram chat ID (negative for groups)
    pub guild_id: i64,

    /// Custom command prefix, `None` means the default prefix
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub blacklisted: bool,

    #[serde(default)]
    pub premium: bool,
}

#[cfg(test)]
impl GuildConfig {
    /// Create a config row with defaults.
    pub fn new(guild_id: i64) -> Self {
        Self {
            id: None,
            guild_id,
            prefix: None,
            blacklisted: false,
            premium: false,
        }
    }
}
