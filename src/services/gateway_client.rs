use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{bot::InternalError, observability::TracedRequest, BotConfig};

/// Anything the front end can hand a query to and get image urls back from
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<String>, InternalError>;
}

/// HTTP client for the search gateway
pub struct GatewayClient {
    http_client: Client,
    endpoint: Url,
    parameter_key: String,
}

impl GatewayClient {
    pub fn new(config: &BotConfig) -> Result<Self, InternalError> {
        let http_client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            http_client,
            endpoint: config.api_endpoint.clone(),
            parameter_key: config.parameter_key.clone(),
        })
    }
}

#[async_trait]
impl ImageSearch for GatewayClient {
    #[tracing::instrument(skip(self), err(Debug))]
    async fn search(&self, query: &str) -> Result<Vec<String>, InternalError> {
        let urls = self
            .http_client
            .get(self.endpoint.clone())
            .query(&[(self.parameter_key.as_str(), query)])
            .send_traced("HTTP GET search gateway")
            .await?
            .error_for_status()?
            .json::<Vec<String>>()
            .await?;
        Ok(urls)
    }
}
