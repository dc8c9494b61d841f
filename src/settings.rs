use std::time::Duration;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use url::Url;

use crate::services::space_base_url;

pub const ENV_PREFIX: &str = "CLIP_SEARCH";

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("could not load configuration: {}", .0)]
    Load(#[from] ConfigError),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigurationError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Settings for the HTTP search gateway
#[derive(Deserialize, Clone, Debug)]
pub struct GatewayConfig {
    /// `owner/space` id or full URL of the gradio app
    pub hf_space_endpoint: String,
    /// prefix that image basenames are appended to, trailing separator included
    pub hf_dataset_endpoint: String,
    pub api_name: String,

    pub parameter_key: String,
    pub search_route: String,
    pub http_listen_address: String,

    /// per HTTP call to the space
    pub request_timeout_secs: u64,
    pub retry_backoff_millis: u64,
    /// whole search including the retry, keep it below the bot's `request_timeout_secs`
    pub search_deadline_secs: u64,
}

/// Settings for the telegram front end
#[derive(Deserialize, Clone)]
pub struct BotConfig {
    pub telegram_bot_token: String,
    pub telegram_bot_username: String,

    pub api_endpoint: Url,
    pub parameter_key: String,

    pub request_timeout_secs: u64,
}

/// defaults < config file < environment
pub fn settings_builder(config_file_path: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(with_defaults(config::Config::builder())?
        .add_source(config::File::with_name(config_file_path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX)))
}

pub(crate) fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("api_name", "predict")?
        .set_default("parameter_key", "query")?
        .set_default("search_route", "/search")?
        .set_default("http_listen_address", "0.0.0.0:8080")?
        .set_default("request_timeout_secs", 60)?
        .set_default("retry_backoff_millis", 500)?
        .set_default("search_deadline_secs", 45)
}

fn deserialize<T: DeserializeOwned>(settings: config::Config) -> Result<T, ConfigurationError> {
    Ok(settings.try_deserialize()?)
}

fn require_non_empty(key: &'static str, value: &str) -> Result<(), ConfigurationError> {
    if value.trim().is_empty() {
        Err(ConfigurationError::invalid(key, "must not be empty"))
    } else {
        Ok(())
    }
}

impl GatewayConfig {
    #[tracing::instrument(err(Debug))]
    pub fn load(config_file_path: &str) -> Result<Self, ConfigurationError> {
        Self::from_settings(settings_builder(config_file_path)?.build()?)
    }

    pub fn from_settings(settings: config::Config) -> Result<Self, ConfigurationError> {
        let config: Self = deserialize(settings)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        require_non_empty("hf_space_endpoint", &self.hf_space_endpoint)?;
        space_base_url(&self.hf_space_endpoint)
            .map_err(|err| ConfigurationError::invalid("hf_space_endpoint", err.to_string()))?;

        let dataset = Url::parse(&self.hf_dataset_endpoint)
            .map_err(|err| ConfigurationError::invalid("hf_dataset_endpoint", err.to_string()))?;
        if dataset.cannot_be_a_base() {
            return Err(ConfigurationError::invalid(
                "hf_dataset_endpoint",
                "must be an absolute http(s) address",
            ));
        }

        require_non_empty("api_name", &self.api_name)?;
        require_non_empty("parameter_key", &self.parameter_key)?;
        if !self.search_route.starts_with('/') {
            return Err(ConfigurationError::invalid("search_route", "must start with '/'"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigurationError::invalid("request_timeout_secs", "must be positive"));
        }
        if self.search_deadline_secs == 0 {
            return Err(ConfigurationError::invalid("search_deadline_secs", "must be positive"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_millis)
    }

    #[must_use]
    pub const fn search_deadline(&self) -> Duration {
        Duration::from_secs(self.search_deadline_secs)
    }
}

impl BotConfig {
    #[tracing::instrument(err(Debug))]
    pub fn load(config_file_path: &str) -> Result<Self, ConfigurationError> {
        Self::from_settings(settings_builder(config_file_path)?.build()?)
    }

    pub fn from_settings(settings: config::Config) -> Result<Self, ConfigurationError> {
        let config: Self = deserialize(settings)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        require_non_empty("telegram_bot_token", &self.telegram_bot_token)?;
        require_non_empty("telegram_bot_username", &self.telegram_bot_username)?;
        require_non_empty("parameter_key", &self.parameter_key)?;
        if !matches!(self.api_endpoint.scheme(), "http" | "https") {
            return Err(ConfigurationError::invalid("api_endpoint", "must be an http(s) address"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigurationError::invalid("request_timeout_secs", "must be positive"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
