mod bot_error;
mod context;
mod error_handler;
mod types;
mod update_listener;

pub use bot_error::*;
pub use context::*;
pub use error_handler::{report_bot_error, report_internal_error_result};
pub use types::*;
pub use update_listener::UpdateListener;
