use std::sync::Arc;

use actix_web::{dev::ServerHandle, middleware, web, App, HttpServer};
use tokio::sync::Mutex;

use crate::{gateway::SearchGateway, services::GradioSpaceClient, GatewayConfig};

use super::service::{configure_routes, not_found, AppState};

/// The search gateway's HTTP server
pub struct GatewayServer {
    config: Arc<GatewayConfig>,
    state: web::Data<AppState>,
    handle: Mutex<Option<ServerHandle>>,
}

impl GatewayServer {
    #[tracing::instrument(name = "GatewayServer::initialize", err(Debug))]
    pub fn initialize(config: GatewayConfig) -> Result<Self, anyhow::Error> {
        let remote = GradioSpaceClient::new(
            &config.hf_space_endpoint,
            &config.api_name,
            config.request_timeout(),
        )?;
        let gateway = SearchGateway::new(
            Arc::new(remote),
            config.hf_dataset_endpoint.clone(),
            config.retry_backoff(),
            config.search_deadline(),
        );
        let state = web::Data::new(AppState {
            gateway,
            parameter_key: config.parameter_key.clone(),
        });
        Ok(Self {
            config: Arc::new(config),
            state,
            handle: Mutex::new(None),
        })
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let addr = self.config.http_listen_address.clone();
        let search_route = self.config.search_route.clone();
        let state = self.state.clone();
        tracing::info!("listening on http://{}{}", addr, search_route);
        let server = HttpServer::new(move || {
            App::new()
                .wrap(tracing_actix_web::TracingLogger::default())
                .app_data(state.clone())
                .configure(|cfg| configure_routes(cfg, &search_route))
                .default_service(web::route().to(not_found))
                .wrap(middleware::Compress::default())
        })
        .bind(addr)?
        .run();
        *self.handle.lock().await = Some(server.handle());
        server.await?;
        Ok(())
    }

    /// Stops accepting connections and lets in-flight requests finish
    pub async fn shutdown(&self) {
        let Some(handle) = self.handle.lock().await.take() else {
            tracing::info!("server was never started");
            return;
        };
        handle.stop(true).await;
        tracing::info!("server stopped");
    }
}
