//! Platform-neutral view of an inbound message.

use teloxide::types::Message;

/// What the dispatch gate needs to know about a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub author_id: u64,
    pub author_is_bot: bool,
    /// Group chat the message was sent in; `None` for private chats.
    pub guild_id: Option<i64>,
    /// Conversation to reply in.
    pub channel_id: i64,
    pub content: String,
}

impl Inbound {
    /// Build from a Telegram message.
    ///
    /// Returns `None` for messages without a sender (channel posts) or
    /// without any text.
    pub fn from_telegram(msg: &Message) -> Option<Self> {
        let author = msg.from.as_ref()?;
        let content = msg.text().or_else(|| msg.caption())?;

        let guild_id = (msg.chat.is_group() || msg.chat.is_supergroup()).then_some(msg.chat.id.0);

        Some(Self {
            author_id: author.id.0,
            author_is_bot: author.is_bot,
            guild_id,
            channel_id: msg.chat.id.0,
            content: content.to_string(),
        })
    }

    /// Scope the prefix is configured for: the group, or the author in
    /// private chats.
    pub fn scope_id(&self) -> i64 {
        self.guild_id.unwrap_or(self.author_id as i64)
    }

    /// Author id as a snowflake.
    pub fn author_snowflake(&self) -> i64 {
        self.author_id as i64
    }
}
