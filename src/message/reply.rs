use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, MessageId},
};

use crate::{
    bot::{Bot, BotExt, InternalError},
    text::{Markdown, Text},
};

/// One outbound chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Text(Markdown),
    Image(String),
}

/// Where command handlers put their replies; the production sink sends each one immediately
#[async_trait]
pub trait ReplySink: Send {
    async fn reply(&mut self, reply: ChatReply) -> Result<(), InternalError>;
}

#[async_trait]
impl ReplySink for Vec<ChatReply> {
    async fn reply(&mut self, reply: ChatReply) -> Result<(), InternalError> {
        self.push(reply);
        Ok(())
    }
}

/// Replies to a telegram message
pub struct TelegramReplySink {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
}

impl TelegramReplySink {
    #[must_use]
    pub fn new(bot: Bot, msg: &Message) -> Self {
        Self {
            bot,
            chat_id: msg.chat.id,
            message_id: msg.id,
        }
    }
}

#[async_trait]
impl ReplySink for TelegramReplySink {
    async fn reply(&mut self, reply: ChatReply) -> Result<(), InternalError> {
        let text = match reply {
            ChatReply::Text(text) => text,
            ChatReply::Image(url) => Text::image_result(&url),
        };
        self.bot
            .send_markdown(self.chat_id, text)
            .reply_to_message_id(self.message_id)
            .allow_sending_without_reply(true)
            .await?;
        Ok(())
    }
}
