use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use registry::{FeedRecord, RegistryError};
use slicer::{Rule, FEED_CONTENT_TYPE};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for registering a feed
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateFeedRequest {
    /// Upstream feed URL (scheme optional; bare domains are accepted)
    pub host: String,
    /// Keep every Nth item; must be a positive integer
    pub rule: i64,
}

/// Response body for feed registration.
///
/// Validation failures are embedded as `error` with the inputs echoed back,
/// rather than surfaced as an HTTP error status.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreateFeedResponse {
    /// Assigned feed id, null when registration was rejected
    pub id: Option<String>,
    /// Public URL the sliced feed is served at
    pub url: Option<String>,
    pub host: String,
    pub rule: i64,
    pub error: Option<String>,
}

/// Query parameters for serving a feed
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct FeedQuery {
    /// Optional per-request rule overriding the stored one
    pub rule: Option<i64>,
}

/// Register a feed (idempotent for an already-registered pair)
#[utoipa::path(
    post,
    path = "/create-feed",
    tag = "feeds",
    request_body = CreateFeedRequest,
    responses(
        (status = 200, description = "Registration outcome, success or embedded validation error", body = CreateFeedResponse)
    )
)]
pub async fn create_feed(
    State(state): State<AppState>,
    Json(payload): Json<CreateFeedRequest>,
) -> AppResult<Json<CreateFeedResponse>> {
    let CreateFeedRequest { host, rule } = payload;

    let parsed = match Rule::new(rule) {
        Ok(parsed) => parsed,
        Err(e) => return Ok(Json(rejection(host, rule, e.to_string()))),
    };

    match state.registry.register(&host, parsed).await {
        Ok(registration) => Ok(Json(CreateFeedResponse {
            url: Some(state.config.feed_url(&registration.record.id)),
            id: Some(registration.record.id),
            host,
            rule,
            error: None,
        })),
        Err(
            e @ (RegistryError::EmptyHost
            | RegistryError::Unreachable(_)
            | RegistryError::BadStatus(_)
            | RegistryError::NotXml(_)),
        ) => {
            tracing::warn!(%host, error = %e, "feed registration rejected");
            Ok(Json(rejection(host, rule, e.to_string())))
        }
        // Store failures are server faults, not input problems.
        Err(e) => Err(e.into()),
    }
}

fn rejection(host: String, rule: i64, error: String) -> CreateFeedResponse {
    CreateFeedResponse {
        id: None,
        url: None,
        host,
        rule,
        error: Some(error),
    }
}

/// Serve a registered feed with its rule applied
#[utoipa::path(
    get,
    path = "/feed/{id}",
    tag = "feeds",
    params(
        ("id" = String, Path, description = "Feed id assigned at registration"),
        FeedQuery
    ),
    responses(
        (status = 200, description = "Filtered feed document", body = String, content_type = "text/xml"),
        (status = 404, description = "Unknown id or upstream unavailable"),
        (status = 400, description = "Invalid rule override")
    )
)]
pub async fn get_feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let record = state.registry.resolve(&id).await?;

    let rule = match query.rule {
        Some(raw) => Rule::new(raw).map_err(|e| AppError::bad_request(e.to_string()))?,
        None => record.rule,
    };

    let body = state.slicer.render(&record.host, rule).await?;

    Ok(([(header::CONTENT_TYPE, FEED_CONTENT_TYPE)], body))
}

/// Dump all registered feeds keyed by id (administrative)
#[utoipa::path(
    get,
    path = "/master",
    tag = "feeds",
    responses(
        (status = 200, description = "All registered feed records, keyed by id")
    )
)]
pub async fn dump_feeds(
    State(state): State<AppState>,
) -> AppResult<Json<HashMap<String, FeedRecord>>> {
    Ok(Json(state.registry.dump().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use registry::{MemoryFeedStore, Registry, SourceProbe};
    use slicer::SlicerClient;

    use crate::api::create_router;
    use crate::config::{Config, Environment, DEFAULT_PORT};

    struct AlwaysXmlProbe;

    #[async_trait]
    impl SourceProbe for AlwaysXmlProbe {
        async fn probe(&self, _url: &str) -> registry::Result<()> {
            Ok(())
        }
    }

    struct HtmlProbe;

    #[async_trait]
    impl SourceProbe for HtmlProbe {
        async fn probe(&self, _url: &str) -> registry::Result<()> {
            Err(RegistryError::NotXml("text/html".into()))
        }
    }

    fn test_app(probe: Arc<dyn SourceProbe>) -> axum::Router {
        let config = Config::new(Environment::Dev, "./data", DEFAULT_PORT, None);
        let registry = Registry::new(Arc::new(MemoryFeedStore::new()), probe);
        let slicer = SlicerClient::with_client(reqwest::Client::new());
        let state = AppState::with_parts(config, registry, slicer);
        create_router(state).0
    }

    async fn post_create_feed(app: &axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::post("/create-feed")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_feed_returns_id_and_url() {
        let app = test_app(Arc::new(AlwaysXmlProbe));

        let (status, body) =
            post_create_feed(&app, r#"{"host": "example.com/feed", "rule": 2}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].is_null());
        let id = body["id"].as_str().unwrap();
        assert_eq!(id.len(), registry::ID_LENGTH);
        assert_eq!(
            body["url"].as_str().unwrap(),
            format!("http://localhost:3002/feed/{id}")
        );
    }

    #[tokio::test]
    async fn test_create_feed_is_idempotent_over_http() {
        let app = test_app(Arc::new(AlwaysXmlProbe));
        let body = r#"{"host": "example.com/feed", "rule": 2}"#;

        let (_, first) = post_create_feed(&app, body).await;
        let (_, second) = post_create_feed(&app, body).await;

        assert_eq!(first["id"], second["id"]);
    }

    #[tokio::test]
    async fn test_create_feed_embeds_not_xml_error() {
        let app = test_app(Arc::new(HtmlProbe));

        let (status, body) =
            post_create_feed(&app, r#"{"host": "example.com/page", "rule": 2}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["id"].is_null());
        assert!(body["error"].as_str().unwrap().contains("text/html"));
        assert_eq!(body["host"], "example.com/page");
        assert_eq!(body["rule"], 2);
    }

    #[tokio::test]
    async fn test_create_feed_embeds_invalid_rule_error() {
        let app = test_app(Arc::new(AlwaysXmlProbe));

        let (status, body) = post_create_feed(&app, r#"{"host": "example.com", "rule": 0}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["id"].is_null());
        assert!(body["error"].as_str().unwrap().contains("positive"));
    }

    #[tokio::test]
    async fn test_create_feed_embeds_empty_host_error() {
        let app = test_app(Arc::new(AlwaysXmlProbe));

        let (_, body) = post_create_feed(&app, r#"{"host": "", "rule": 2}"#).await;

        assert!(body["id"].is_null());
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn test_get_feed_unknown_id_is_404() {
        let app = test_app(Arc::new(AlwaysXmlProbe));

        let response = app
            .oneshot(Request::get("/feed/zzzzzz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_master_dumps_registered_records() {
        let app = test_app(Arc::new(AlwaysXmlProbe));
        let (_, created) =
            post_create_feed(&app, r#"{"host": "example.com/feed", "rule": 3}"#).await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .oneshot(Request::get("/master").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let dump: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(dump[id]["host"], "https://www.example.com/feed");
        assert_eq!(dump[id]["rule"], 3);
    }
}
