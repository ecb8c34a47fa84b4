//! Per-user flags model.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One row per user the bot has stored flags for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Telegram user ID
    pub user_id: i64,

    #[serde(default)]
    pub blacklisted: bool,

    #[serde(default)]
    pub premium: bool,

    /// Whether the user opted into usage tips
    #[serde(default)]
    pub tips: bool,
}

#[cfg(test)]
impl UserData {
    /// Create a user row with every flag off.
    pub fn new(user_id: i64) -> Self {
        Self {
            id: None,
            user_id,
            blacklisted: false,
            premium: false,
            tips: false,
        }
    }
}
