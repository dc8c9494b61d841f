mod command;
mod message_handler;
mod reply;

pub use command::Command;
pub use message_handler::message_handler_wrapper;
pub use reply::{ChatReply, ReplySink, TelegramReplySink};
