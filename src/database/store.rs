//! Persistent store interface and its MongoDB implementation.
//!
//! The dispatch gate only reads through this trait (cold load and prefix
//! misses). Writes come from command handlers via `SettingsRepo`.

use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use tracing::debug;

use super::models::{is_chat_id, DisabledCommand, GuildConfig, UserData};
use super::Database;

/// Flags shared by `guild_config` and `users_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Blacklisted,
    Premium,
}

impl Flag {
    fn field(self) -> &'static str {
        match self {
            Flag::Blacklisted => "blacklisted",
            Flag::Premium => "premium",
        }
    }
}

/// Backing store for cache-resident settings.
#[async_trait]
pub trait BotStore: Send + Sync {
    /// Chat and user ids with `flag` set, across both tables.
    async fn flagged_ids(&self, flag: Flag) -> Result<Vec<i64>>;

    /// User ids that have tips enabled.
    async fn tips_enabled_ids(&self) -> Result<Vec<i64>>;

    /// Every disabled-command row, ordered by command name.
    async fn disabled_commands(&self) -> Result<Vec<DisabledCommand>>;

    /// The configured prefix for a scope, if any.
    async fn prefix(&self, scope: i64) -> Result<Option<String>>;

    async fn set_prefix(&self, scope: i64, prefix: &str) -> Result<()>;

    /// Set a flag on a chat or user row, creating the row if needed.
    async fn set_flag(&self, snowflake: i64, flag: Flag, value: bool) -> Result<()>;

    async fn set_tips(&self, user_id: i64, enabled: bool) -> Result<()>;

    async fn disable_command(&self, command_name: &str, scope: i64) -> Result<()>;

    async fn enable_command(&self, command_name: &str, scope: i64) -> Result<()>;
}

#[async_trait]
impl BotStore for Database {
    async fn flagged_ids(&self, flag: Flag) -> Result<Vec<i64>> {
        let field = flag.field();
        let filter = doc! { field: true };

        let guilds: Vec<GuildConfig> = self
            .guild_config()
            .find(filter.clone())
            .await?
            .try_collect()
            .await?;
        let users: Vec<UserData> = self.users_data().find(filter).await?.try_collect().await?;

        debug!(
            "DB {} ids: {} chats, {} users",
            field,
            guilds.len(),
            users.len()
        );

        Ok(guilds
            .into_iter()
            .map(|g| g.guild_id)
            .chain(users.into_iter().map(|u| u.user_id))
            .collect())
    }

    async fn tips_enabled_ids(&self) -> Result<Vec<i64>> {
        let users: Vec<UserData> = self
            .users_data()
            .find(doc! { "tips": true })
            .await?
            .try_collect()
            .await?;

        Ok(users.into_iter().map(|u| u.user_id).collect())
    }

    async fn disabled_commands(&self) -> Result<Vec<DisabledCommand>> {
        let rows = self
            .disabled_command_rows()
            .find(doc! {})
            .sort(doc! { "command_name": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(rows)
    }

    async fn prefix(&self, scope: i64) -> Result<Option<String>> {
        let row = self
            .guild_config()
            .find_one(doc! { "guild_id": scope })
            .await?;

        debug!("DB get prefix for {}: {:?}", scope, row.is_some());
        Ok(row.and_then(|r| r.prefix))
    }

    async fn set_prefix(&self, scope: i64, prefix: &str) -> Result<()> {
        self.guild_config()
            .update_one(
                doc! { "guild_id": scope },
                doc! { "$set": { "prefix": prefix } },
            )
            .upsert(true)
            .await?;

        debug!("Saved prefix for {}", scope);
        Ok(())
    }

    async fn set_flag(&self, snowflake: i64, flag: Flag, value: bool) -> Result<()> {
        let field = flag.field();
        let update = doc! { "$set": { field: value } };

        if is_chat_id(snowflake) {
            self.guild_config()
                .update_one(doc! { "guild_id": snowflake }, update)
                .upsert(true)
                .await?;
        } else {
            self.users_data()
                .update_one(doc! { "user_id": snowflake }, update)
                .upsert(true)
                .await?;
        }

        debug!("Set {}={} for {}", field, value, snowflake);
        Ok(())
    }

    async fn set_tips(&self, user_id: i64, enabled: bool) -> Result<()> {
        self.users_data()
            .update_one(
                doc! { "user_id": user_id },
                doc! { "$set": { "tips": enabled } },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn disable_command(&self, command_name: &str, scope: i64) -> Result<()> {
        let row = doc! { "command_name": command_name, "snowflake_id": scope };

        // Upsert keeps repeated disables to a single row.
        self.disabled_command_rows()
            .update_one(row.clone(), doc! { "$set": row })
            .upsert(true)
            .await?;

        debug!("Disabled {} in {}", command_name, scope);
        Ok(())
    }

    async fn enable_command(&self, command_name: &str, scope: i64) -> Result<()> {
        let result = self
            .disabled_command_rows()
            .delete_many(doc! { "command_name": command_name, "snowflake_id": scope })
            .await?;

        debug!(
            "Enabled {} in {}: {} rows removed",
            command_name, scope, result.deleted_count
        );
        Ok(())
    }
}
