use teloxide::{
    adaptors::{throttle::ThrottlingRequest, DefaultParseMode, Throttle},
    payloads::SendMessage,
    requests::{JsonRequest, Requester},
    types::Recipient,
};

use crate::text::Markdown;

pub type Bot = Throttle<DefaultParseMode<teloxide::Bot>>;

pub trait BotExt {
    fn send_markdown<C, T>(
        &self,
        chat_id: C,
        text: T,
    ) -> ThrottlingRequest<JsonRequest<SendMessage>>
    where
        C: Into<Recipient>,
        T: Into<Markdown>;
}

impl BotExt for Bot {
    fn send_markdown<C, T>(
        &self,
        chat_id: C,
        text: T,
    ) -> ThrottlingRequest<JsonRequest<SendMessage>>
    where
        C: Into<Recipient>,
        T: Into<Markdown>,
    {
        #[allow(clippy::disallowed_methods)]
        self.send_message(chat_id, text.into())
    }
}
