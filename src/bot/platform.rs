//! Chat platform primitives used by the gate and by commands.

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatMemberKind, ParseMode};

use super::dispatcher::ThrottledBot;

/// Outbound side of the chat platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Send an HTML-formatted message to a conversation.
    async fn send_message(&self, channel_id: i64, text: &str) -> Result<()>;

    /// Show the "typing" indicator in a conversation.
    async fn trigger_typing(&self, channel_id: i64) -> Result<()>;

    /// Whether a user administers a group chat.
    async fn is_admin(&self, guild_id: i64, user_id: u64) -> Result<bool>;
}

/// [`Platform`] over the throttled Telegram bot.
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: ThrottledBot,
}

impl TelegramPlatform {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Platform for TelegramPlatform {
    async fn send_message(&self, channel_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(channel_id), text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn trigger_typing(&self, channel_id: i64) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(channel_id), ChatAction::Typing)
            .await?;
        Ok(())
    }

    async fn is_admin(&self, guild_id: i64, user_id: u64) -> Result<bool> {
        let member = self
            .bot
            .get_chat_member(ChatId(guild_id), UserId(user_id))
            .await?;

        Ok(matches!(
            member.kind,
            ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_)
        ))
    }
}
