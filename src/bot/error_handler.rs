use std::sync::Arc;

use futures::future::BoxFuture;

use super::{BotError, InternalError};

#[derive(Debug)]
pub struct ErrorHandler;

impl ErrorHandler {
    #[must_use]
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {})
    }
}

impl teloxide::error_handlers::ErrorHandler<()> for ErrorHandler {
    /// noop - errors are reported in handler wrappers
    fn handle_error(self: Arc<Self>, _error: ()) -> BoxFuture<'static, ()> {
        Box::pin(async move {})
    }
}

pub fn report_bot_error(result: &BotError) {
    match result {
        BotError::InternalError(error) => tracing::error!("handler error: {error:?}"),
        BotError::UserError(error) => tracing::debug!("user error: {error}"),
    }
}

pub fn report_internal_error_result<T>(result: Result<T, InternalError>) {
    if let Err(error) = result {
        tracing::error!("handler error: {error:?}");
    }
}
