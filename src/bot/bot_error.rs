use teloxide::utils::command::ParseError;
use thiserror::Error;

use crate::services::RemoteSearchError;

// BotError includes internal (like upstream failures) and user-facing errors (like an empty query); InternalError only has internal errors

#[derive(Error, Debug)]
pub enum InternalError {
    #[error("teloxide error: {}", .0)]
    Teloxide(#[from] teloxide::RequestError),

    #[error("reqwest error: {}", .0)]
    Reqwest(#[from] reqwest::Error),

    #[error("remote search error: {}", .0)]
    RemoteSearch(#[from] RemoteSearchError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InternalError {
    pub fn is_timeout_error(&self) -> bool {
        match self {
            Self::Reqwest(reqwest_error) => reqwest_error.is_timeout(),
            Self::Teloxide(teloxide::RequestError::Network(network_error)) => {
                network_error.is_timeout()
            }
            Self::RemoteSearch(remote_error) => remote_error.is_timeout(),
            _ => false,
        }
    }

    /// failures of a service this process talks to, as opposed to its own faults
    pub const fn is_upstream_error(&self) -> bool {
        matches!(self, Self::RemoteSearch(_))
    }

    /// telegram refused or lost a message, so another reply is unlikely to arrive either
    pub const fn is_delivery_error(&self) -> bool {
        matches!(self, Self::Teloxide(_))
    }

    pub fn end_user_error(&self) -> String {
        if self.is_timeout_error() {
            "The search took too long, please try again in a moment.".to_string()
        } else {
            "Sorry, the image search is not available right now. Please try again later."
                .to_string()
        }
    }
}

#[derive(Error, Debug)]
pub enum UserError {
    #[error("user sent an empty query")]
    EmptyQuery,

    #[error("request is missing the {} parameter", .0)]
    MissingQueryParameter(String),

    #[error("command parse error")]
    CommandError(ParseError),

    #[error("user sent something other than a text message")]
    UnhandledMessageType,
}

impl UserError {
    pub fn end_user_error(&self) -> String {
        match self {
            Self::EmptyQuery => "The query cannot be empty!".to_string(),
            Self::MissingQueryParameter(key) => format!("Missing query parameter \"{key}\""),
            Self::CommandError(ParseError::UnknownCommand(input)) => {
                format!("I don't know what \"{input}\" means. Try /help")
            }
            Self::CommandError(_) => "Invalid arguments! Try /help".to_string(),
            Self::UnhandledMessageType => {
                "I can only read text. Send /query followed by what you are looking for."
                    .to_string()
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum BotError {
    #[error("internal error")]
    InternalError(#[from] InternalError),

    #[error("user error")]
    UserError(#[from] UserError),
}

impl BotError {
    pub fn end_user_error(&self) -> String {
        match self {
            Self::InternalError(err) => err.end_user_error(),
            Self::UserError(err) => err.end_user_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn empty_query_message() {
        let error: BotError = UserError::EmptyQuery.into();
        assert_eq!(error.end_user_error(), "The query cannot be empty!");
    }

    #[test]
    fn unknown_command_message_names_the_command() {
        let error = UserError::CommandError(ParseError::UnknownCommand("/qeury".to_string()));
        assert!(error.end_user_error().contains("/qeury"));
    }

    #[test]
    fn remote_failures_are_upstream_errors() {
        let error: InternalError = RemoteSearchError::Status(StatusCode::BAD_GATEWAY).into();
        assert!(error.is_upstream_error());
        assert!(!error.is_timeout_error());
        let error = InternalError::Other(anyhow::anyhow!("boom"));
        assert!(!error.is_upstream_error());
    }

    #[test]
    fn remote_failures_become_internal_bot_errors() {
        let error: BotError =
            InternalError::from(RemoteSearchError::Failed("space is sleeping".to_string())).into();
        assert!(matches!(
            error,
            BotError::InternalError(InternalError::RemoteSearch(RemoteSearchError::Failed(_)))
        ));
    }

    #[test]
    fn only_telegram_failures_are_delivery_errors() {
        let error = InternalError::Teloxide(teloxide::RequestError::Api(
            teloxide::ApiError::BotBlocked,
        ));
        assert!(error.is_delivery_error());
        assert!(!error.is_upstream_error());
        let error: InternalError = RemoteSearchError::Status(StatusCode::BAD_GATEWAY).into();
        assert!(!error.is_delivery_error());
    }
}
