use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::observability::TracedRequest;

#[derive(Error, Debug)]
pub enum RemoteSearchError {
    #[error("transport error: {}", .0)]
    Transport(#[from] reqwest::Error),

    #[error("remote search service responded with status {}", .0)]
    Status(StatusCode),

    #[error("remote search service reported a failure: {}", .0)]
    Failed(String),

    #[error("malformed remote search response: {}", .0)]
    MalformedResponse(String),

    #[error("remote search did not finish within {:?}", .0)]
    DeadlineExceeded(Duration),
}

impl RemoteSearchError {
    /// whether a second attempt has a chance of succeeding
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Failed(_) => true,
            Self::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::MalformedResponse(_) | Self::DeadlineExceeded(_) => false,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_timeout(),
            Self::DeadlineExceeded(_) => true,
            _ => false,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptType {
    Text,
}

/// Arguments of the space's predict endpoint, in the order the app declares them
#[derive(Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub text_prompt: String,
    pub image_prompt: Option<String>,
    pub prompt_type: PromptType,
    pub num_images_to_show: u32,
}

impl PredictRequest {
    #[must_use]
    pub fn text(prompt: &str, num_images_to_show: u32) -> Self {
        Self {
            text_prompt: prompt.to_string(),
            image_prompt: None,
            prompt_type: PromptType::Text,
            num_images_to_show,
        }
    }

    fn to_data(&self) -> Value {
        serde_json::json!([
            self.text_prompt,
            self.image_prompt,
            self.prompt_type,
            self.num_images_to_show
        ])
    }
}

/// Gallery entries carry either a bare path or a gradio file object
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ImageReference {
    Path(String),
    File {
        path: Option<String>,
        url: Option<String>,
        orig_name: Option<String>,
    },
}

impl ImageReference {
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::File {
                path,
                url,
                orig_name,
            } => path.as_deref().or(orig_name.as_deref()).or(url.as_deref()),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub image: ImageReference,
}

impl SearchHit {
    pub fn reference(&self) -> Result<&str, RemoteSearchError> {
        self.image.path().ok_or_else(|| {
            RemoteSearchError::MalformedResponse("gallery entry without an image path".to_string())
        })
    }
}

#[async_trait]
pub trait RemoteSearch: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> Result<Vec<SearchHit>, RemoteSearchError>;
}

/// Maps an `owner/space` id to the space's own host; full URLs pass through
pub fn space_base_url(space: &str) -> Result<Url, url::ParseError> {
    let space = space.trim();
    if space.starts_with("http://") || space.starts_with("https://") {
        Url::parse(space)
    } else {
        let subdomain = space
            .to_lowercase()
            .replace(|c: char| matches!(c, '/' | '_' | '.'), "-");
        Url::parse(&format!("https://{subdomain}.hf.space"))
    }
}

#[derive(Deserialize)]
struct EventIdResponse {
    event_id: String,
}

/// Client for a gradio app's queued `call` api
pub struct GradioSpaceClient {
    http_client: Client,
    call_url: String,
}

impl GradioSpaceClient {
    pub fn new(space: &str, api_name: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = space_base_url(space)?;
        let call_url = format!(
            "{}/call/{}",
            base_url.as_str().trim_end_matches('/'),
            api_name.trim_matches('/')
        );
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http_client,
            call_url,
        })
    }

    fn check_status(response: Response) -> Result<Response, RemoteSearchError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(RemoteSearchError::Status(status))
        }
    }
}

#[async_trait]
impl RemoteSearch for GradioSpaceClient {
    #[tracing::instrument(skip(self))]
    async fn predict(&self, request: &PredictRequest) -> Result<Vec<SearchHit>, RemoteSearchError> {
        let response = self
            .http_client
            .post(&self.call_url)
            .json(&serde_json::json!({ "data": request.to_data() }))
            .send_traced("HTTP POST gradio call")
            .await?;
        let body = Self::check_status(response)?.text().await?;
        let EventIdResponse { event_id } = serde_json::from_str(&body)
            .map_err(|err| RemoteSearchError::MalformedResponse(err.to_string()))?;

        let response = self
            .http_client
            .get(format!("{}/{event_id}", self.call_url))
            .send_traced("HTTP GET gradio result stream")
            .await?;
        let stream = Self::check_status(response)?.text().await?;
        let output = parse_event_stream(&stream)?;
        parse_gallery(output)
    }
}

/// Extracts the payload of the terminal event of a gradio server-sent event stream
pub fn parse_event_stream(stream: &str) -> Result<Value, RemoteSearchError> {
    let mut event = "";
    for line in stream.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
        } else if let Some(data) = line.strip_prefix("data:") {
            let data = data.trim();
            match event {
                "complete" => {
                    return serde_json::from_str(data)
                        .map_err(|err| RemoteSearchError::MalformedResponse(err.to_string()));
                }
                "error" => {
                    let message = match serde_json::from_str::<Value>(data) {
                        Ok(Value::String(message)) => message,
                        Ok(Value::Null) => "no details".to_string(),
                        _ if data.is_empty() => "no details".to_string(),
                        _ => data.to_string(),
                    };
                    return Err(RemoteSearchError::Failed(message));
                }
                _ => {}
            }
        }
    }
    Err(RemoteSearchError::MalformedResponse(
        "event stream ended without a result".to_string(),
    ))
}

/// The first output of the predict endpoint is the gallery
pub fn parse_gallery(output: Value) -> Result<Vec<SearchHit>, RemoteSearchError> {
    let Value::Array(outputs) = output else {
        return Err(RemoteSearchError::MalformedResponse(
            "expected a list of outputs".to_string(),
        ));
    };
    match outputs.into_iter().next() {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(gallery) => serde_json::from_value(gallery)
            .map_err(|err| RemoteSearchError::MalformedResponse(err.to_string())),
    }
}
