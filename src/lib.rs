mod bot;

mod gateway;

mod message;

mod observability;

mod services;

mod settings;

mod text;

mod web;

pub use bot::UpdateListener;
pub use observability::setup_observability;
pub use settings::{BotConfig, ConfigurationError, GatewayConfig};
pub use web::server::GatewayServer;
