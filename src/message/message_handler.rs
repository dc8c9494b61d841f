use teloxide::{types::Message, utils::command::BotCommands, utils::command::ParseError};
use tracing::Instrument;

use crate::{
    bot::{
        report_bot_error, report_internal_error_result, Bot, BotError, InternalError,
        RequestContext, UserError,
    },
    text::Markdown,
};

use super::{ChatReply, Command, ReplySink, TelegramReplySink};

#[tracing::instrument(skip(bot, request_context, msg), fields(chat_id = ?msg.chat.id))]
pub async fn message_handler_wrapper(
    bot: Bot,
    msg: Message,
    request_context: RequestContext,
) -> Result<(), ()> {
    let mut replies = TelegramReplySink::new(bot, &msg);
    report_internal_error_result(message_handler(&msg, &request_context, &mut replies).await);
    Ok(())
}

pub async fn message_handler(
    msg: &Message,
    request_context: &RequestContext,
    replies: &mut dyn ReplySink,
) -> Result<(), InternalError> {
    let is_private_chat = msg.chat.is_private();
    match msg.text() {
        Some(text) => handle_text_message(text, is_private_chat, request_context, replies).await,
        None if is_private_chat => show_error(UserError::UnhandledMessageType.into(), replies).await,
        None => Ok(()),
    }
}

/// Parses and runs a command; every failure ends up as exactly one reply
#[tracing::instrument(skip(request_context, replies))]
pub async fn handle_text_message(
    text: &str,
    is_private_chat: bool,
    request_context: &RequestContext,
    replies: &mut dyn ReplySink,
) -> Result<(), InternalError> {
    match Command::parse(text, &request_context.config.telegram_bot_username) {
        Ok(command) => {
            let span = tracing::info_span!("command", ?command);
            match command.execute(request_context, replies).instrument(span).await {
                Ok(()) => Ok(()),
                Err(error) => show_error(error, replies).await,
            }
        }
        // addressed to another bot in the same group
        Err(ParseError::WrongBotName(_)) => Ok(()),
        Err(err) if is_private_chat => show_error(UserError::CommandError(err).into(), replies).await,
        Err(_) => Ok(()),
    }
}

pub async fn show_error(error: BotError, replies: &mut dyn ReplySink) -> Result<(), InternalError> {
    report_bot_error(&error);
    if let BotError::InternalError(internal) = &error {
        if internal.is_delivery_error() {
            return Ok(());
        }
    }
    replies
        .reply(ChatReply::Text(Markdown::escaped(error.end_user_error())))
        .await
}
