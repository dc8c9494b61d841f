mod resolver;

use std::{sync::Arc, time::Duration};

use tracing::warn;

pub use resolver::*;

use crate::{
    bot::InternalError,
    services::{PredictRequest, RemoteSearch, RemoteSearchError, SearchHit},
};

pub const NUM_IMAGES_TO_SHOW: u32 = 5;
const MAX_RETRIES: u32 = 1;

/// Turns a text query into public image urls
pub struct SearchGateway {
    remote: Arc<dyn RemoteSearch>,
    dataset_endpoint: String,
    retry_backoff: Duration,
    /// covers every attempt and backoff of one search
    deadline: Duration,
}

impl SearchGateway {
    #[must_use]
    pub fn new(
        remote: Arc<dyn RemoteSearch>,
        dataset_endpoint: String,
        retry_backoff: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            remote,
            dataset_endpoint,
            retry_backoff,
            deadline,
        }
    }

    #[tracing::instrument(skip(self), err(Debug))]
    pub async fn search(&self, query: &str) -> Result<Vec<String>, InternalError> {
        let request = PredictRequest::text(query, NUM_IMAGES_TO_SHOW);
        let Ok(hits) = tokio::time::timeout(self.deadline, self.predict_with_retry(&request)).await
        else {
            return Err(RemoteSearchError::DeadlineExceeded(self.deadline).into());
        };
        let hits = hits?;
        let references = hits
            .iter()
            .map(SearchHit::reference)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(resolve_image_urls(&self.dataset_endpoint, references))
    }

    async fn predict_with_retry(
        &self,
        request: &PredictRequest,
    ) -> Result<Vec<SearchHit>, RemoteSearchError> {
        let mut attempt = 0;
        loop {
            match self.remote.predict(request).await {
                Ok(hits) => return Ok(hits),
                Err(err) if err.is_transient() && attempt < MAX_RETRIES => {
                    let backoff = self.retry_backoff * 2_u32.pow(attempt);
                    attempt += 1;
                    warn!(error = %err, ?backoff, "remote search failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
