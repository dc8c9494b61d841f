use crate::message::{message_handler_wrapper, Command};
use crate::services::GatewayClient;
use crate::BotConfig;

use std::sync::Arc;
use std::time::Duration;
use teloxide::adaptors::throttle::Limits;
use teloxide::dispatching::ShutdownToken;
use teloxide::net::default_reqwest_settings;
use teloxide::prelude::*;
use teloxide::types::{AllowedUpdate, MenuButton, ParseMode};
use teloxide::update_listeners::Polling;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::error_handler::ErrorHandler;
use super::{Bot, RequestContext};

/// The chat front end: `initialize` builds everything without touching the network,
/// `run` registers commands and polls until shut down
pub struct UpdateListener {
    bot: Bot,
    request_context: RequestContext,
    shutdown_token: Mutex<Option<ShutdownToken>>,
}

impl UpdateListener {
    #[tracing::instrument(name = "UpdateListener::initialize", skip(config), err(Debug))]
    pub fn initialize(config: BotConfig) -> Result<Self, anyhow::Error> {
        // must outlast the long polling timeout
        let client = default_reqwest_settings()
            .connect_timeout(Duration::from_secs(20))
            .timeout(Duration::from_secs(60))
            .build()?;
        let bot = teloxide::Bot::with_client(config.telegram_bot_token.clone(), client)
            .parse_mode(ParseMode::MarkdownV2)
            .throttle(Limits::default());
        let search = Arc::new(GatewayClient::new(&config)?);

        Ok(Self {
            bot,
            request_context: RequestContext {
                config: Arc::new(config),
                search,
            },
            shutdown_token: Mutex::new(None),
        })
    }

    pub async fn setup_buttons(&self) -> anyhow::Result<()> {
        self.bot.set_my_commands(Command::list_visible()).await?;
        self.bot
            .set_chat_menu_button()
            .menu_button(MenuButton::Commands)
            .await?;

        Ok(())
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        self.setup_buttons().await?;

        let handler: Handler<'_, _, Result<(), ()>, _> =
            dptree::entry().branch(Update::filter_message().endpoint(message_handler_wrapper));

        let update_listener = Polling::builder(self.bot.clone())
            .timeout(Duration::from_secs(30))
            .allowed_updates(vec![AllowedUpdate::Message])
            .delete_webhook()
            .await
            .build();

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.request_context.clone()])
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd.id);
            })
            .error_handler(ErrorHandler::new())
            .distribution_function(distribution_function)
            .enable_ctrlc_handler()
            .build();
        *self.shutdown_token.lock().await = Some(dispatcher.shutdown_token());

        info!("Listening ...");
        dispatcher
            .dispatch_with_listener(
                update_listener,
                LoggingErrorHandler::with_custom_text("UPDATE LISTENER ERROR"),
            )
            .await;
        Ok(())
    }

    /// Stops a running dispatcher after in-flight updates are handled
    pub async fn shutdown(&self) {
        let Some(token) = self.shutdown_token.lock().await.take() else {
            info!("dispatcher was never started");
            return;
        };
        match token.shutdown() {
            Ok(done) => {
                done.await;
                info!("dispatcher stopped");
            }
            Err(_) => info!("dispatcher is already idle"),
        };
    }
}

/// messages from one chat are handled in order, chats are independent
fn distribution_function(update: &Update) -> Option<ChatId> {
    update.chat().map(|chat| chat.id)
}
