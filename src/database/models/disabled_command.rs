//! Disabled command model.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A command disabled in one scope (chat or channel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabledCommand {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub command_name: String,

    pub snowflake_id: i64,
}

#[cfg(test)]
impl DisabledCommand {
    pub fn new(command_name: impl Into<String>, snowflake_id: i64) -> Self {
        Self {
            id: None,
            command_name: command_name.into(),
            snowflake_id,
        }
    }
}
