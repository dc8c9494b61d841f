use itertools::Itertools;
use teloxide::{types::BotCommand, utils::command::BotCommands};

use crate::{
    bot::{BotError, RequestContext, UserError},
    text::Text,
};

use super::{ChatReply, ReplySink};

#[derive(BotCommands, Debug, Clone, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands")]
pub enum Command {
    #[command(description = "show what this bot does")]
    Start,

    #[command(description = "display help text")]
    Help,

    #[command(description = "find images matching a text prompt")]
    Query { prompt: String },
}

/// All words after the command keyword, joined by single spaces
#[must_use]
pub fn extract_query(prompt: &str) -> Option<String> {
    let query = prompt.split_whitespace().join(" ");
    (!query.is_empty()).then_some(query)
}

impl Command {
    #[must_use]
    pub fn list_visible() -> Vec<BotCommand> {
        Self::bot_commands()
    }

    #[tracing::instrument(skip(self, request_context, replies))]
    pub async fn execute(
        self,
        request_context: &RequestContext,
        replies: &mut dyn ReplySink,
    ) -> Result<(), BotError> {
        match self {
            Self::Start | Self::Help => {
                replies.reply(ChatReply::Text(Text::get_help_text())).await?;
            }
            Self::Query { prompt } => {
                let query = extract_query(&prompt).ok_or(UserError::EmptyQuery)?;
                replies.reply(ChatReply::Text(Text::search_started())).await?;
                let urls = request_context.search.search(&query).await?;
                tracing::info!(results = urls.len(), "search finished");
                for url in urls {
                    replies.reply(ChatReply::Image(url)).await?;
                }
            }
        }
        Ok(())
    }
}
