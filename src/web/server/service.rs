use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use crate::{
    bot::{BotError, UserError},
    gateway::SearchGateway,
};

pub struct AppState {
    pub gateway: SearchGateway,
    pub parameter_key: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, search_route: &str) {
    cfg.route(search_route, web::get().to(search));
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().finish()
}

#[tracing::instrument(skip(params, data))]
async fn search(
    params: web::Query<HashMap<String, String>>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, BotError> {
    let query = params
        .get(&data.parameter_key)
        .map(|query| query.trim())
        .filter(|query| !query.is_empty())
        .ok_or_else(|| UserError::MissingQueryParameter(data.parameter_key.clone()))?;
    let urls = data.gateway.search(query).await?;
    tracing::info!(results = urls.len(), "search finished");
    Ok(HttpResponse::Ok().json(urls))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{http::StatusCode, test, App};
    use reqwest::StatusCode as UpstreamStatus;

    use super::*;
    use crate::{
        gateway::tests::{hits, FakeRemote},
        services::RemoteSearchError,
    };

    fn state(remote: std::sync::Arc<FakeRemote>) -> web::Data<AppState> {
        web::Data::new(AppState {
            gateway: SearchGateway::new(
                remote,
                "https://data.example/".to_string(),
                Duration::ZERO,
                Duration::from_secs(5),
            ),
            parameter_key: "query".to_string(),
        })
    }

    #[actix_web::test]
    async fn returns_resolved_urls_as_json_array() {
        let remote = FakeRemote::new([Ok(hits(&[
            "imgs/cat1.png",
            "imgs/cat2.png",
            "imgs/cat3.png",
        ]))]);
        let app = test::init_service(
            App::new()
                .app_data(state(remote.clone()))
                .configure(|cfg| configure_routes(cfg, "/search")),
        )
        .await;
        let req = test::TestRequest::get().uri("/search?query=Cat").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Vec<String> = test::read_body_json(resp).await;
        assert_eq!(
            body,
            vec![
                "https://data.example/cat1.png",
                "https://data.example/cat2.png",
                "https://data.example/cat3.png",
            ]
        );
        assert_eq!(remote.calls(), 1);
    }

    #[actix_web::test]
    async fn zero_matches_is_an_empty_array() {
        let remote = FakeRemote::new([Ok(Vec::new())]);
        let app = test::init_service(
            App::new()
                .app_data(state(remote))
                .configure(|cfg| configure_routes(cfg, "/search")),
        )
        .await;
        let req = test::TestRequest::get().uri("/search?query=Cat").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"[]");
    }

    #[actix_web::test]
    async fn missing_parameter_is_rejected_before_searching() {
        let remote = FakeRemote::new([Ok(hits(&["imgs/cat1.png"]))]);
        let app = test::init_service(
            App::new()
                .app_data(state(remote.clone()))
                .configure(|cfg| configure_routes(cfg, "/search")),
        )
        .await;
        for uri in ["/search", "/search?q=Cat", "/search?query=%20%20"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
        assert_eq!(remote.calls(), 0);
    }

    #[actix_web::test]
    async fn upstream_failure_is_a_bad_gateway() {
        let remote = FakeRemote::new([
            Err(RemoteSearchError::Status(UpstreamStatus::SERVICE_UNAVAILABLE)),
            Err(RemoteSearchError::Failed("space is sleeping".to_string())),
        ]);
        let app = test::init_service(
            App::new()
                .app_data(state(remote.clone()))
                .configure(|cfg| configure_routes(cfg, "/search")),
        )
        .await;
        let req = test::TestRequest::get().uri("/search?query=Cat").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(test::read_body(resp).await.is_empty());
        assert_eq!(remote.calls(), 2);
    }

    #[actix_web::test]
    async fn malformed_upstream_response_is_a_bad_gateway() {
        let remote = FakeRemote::new([Err(RemoteSearchError::MalformedResponse(
            "expected a list of outputs".to_string(),
        ))]);
        let app = test::init_service(
            App::new()
                .app_data(state(remote))
                .configure(|cfg| configure_routes(cfg, "/search")),
        )
        .await;
        let req = test::TestRequest::get().uri("/search?query=Cat").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn custom_parameter_key_is_honoured() {
        let remote = FakeRemote::new([Ok(hits(&["imgs/dog.png"]))]);
        let data = web::Data::new(AppState {
            gateway: SearchGateway::new(
                remote,
                "https://data.example/".to_string(),
                Duration::ZERO,
                Duration::from_secs(5),
            ),
            parameter_key: "text".to_string(),
        });
        let app = test::init_service(
            App::new()
                .app_data(data)
                .configure(|cfg| configure_routes(cfg, "/images")),
        )
        .await;
        let req = test::TestRequest::get().uri("/images?text=Dog").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Vec<String> = test::read_body_json(resp).await;
        assert_eq!(body, vec!["https://data.example/dog.png"]);
    }
}
