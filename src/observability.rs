use std::future::Future;

use tracing::Instrument;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn setup_observability() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,actix_server=warn,hyper=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}

pub trait TracedRequest {
    fn send_traced(
        self,
        span_name: &str,
    ) -> impl Future<Output = reqwest::Result<reqwest::Response>> + Send;
}

impl TracedRequest for reqwest::RequestBuilder {
    fn send_traced(
        self,
        span_name: &str,
    ) -> impl Future<Output = reqwest::Result<reqwest::Response>> + Send {
        let span = tracing::info_span!(
            "http_request",
            "request.name" = span_name,
            "http.status_code" = tracing::field::Empty,
            "request.status" = tracing::field::Empty
        );

        async move {
            let result = self.send().await;

            match &result {
                Ok(resp) => {
                    let code = resp.status().as_u16();
                    tracing::Span::current().record("http.status_code", code);

                    if resp.status().is_success() {
                        tracing::Span::current().record("request.status", "OK");
                    } else {
                        tracing::Span::current().record("request.status", "ERROR");
                        tracing::warn!(status = code, "request failed");
                    }
                }
                Err(e) => {
                    tracing::Span::current().record("request.status", "ERROR");
                    tracing::warn!(error = %e, "request error");
                }
            }

            result
        }
        .instrument(span)
    }
}
