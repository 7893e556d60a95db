//! Integration tests for the search API, driven through the router
//! with an in-memory log store and mock inference backends.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use pgvector::Vector;
use tower::ServiceExt;
use uuid::Uuid;

use rapport_api::{app, AppState};
use rapport_core::{
    EmbeddingBackend, GenerationBackend, HybridWeights, LogHit, LogStore, RateLimiter, Result,
};
use rapport_inference::MockInferenceBackend;
use rapport_search::{ResponseComposer, SearchService};

struct FixedStore {
    hits: Vec<LogHit>,
}

#[async_trait::async_trait]
impl LogStore for FixedStore {
    async fn keyword_search(&self, _query: &str, _user_id: Uuid, _limit: i64) -> Result<Vec<LogHit>> {
        Ok(self.hits.clone())
    }

    async fn semantic_search(
        &self,
        _embedding: &Vector,
        _user_id: Uuid,
        _limit: i64,
    ) -> Result<Vec<LogHit>> {
        Ok(self.hits.clone())
    }

    async fn hybrid_search(
        &self,
        _query: &str,
        _embedding: &Vector,
        _user_id: Uuid,
        _limit: i64,
        _weights: HybridWeights,
    ) -> Result<Vec<LogHit>> {
        Ok(self.hits.clone())
    }
}

fn hit(content: &str, name: &str, hybrid: f32, keyword: f32) -> LogHit {
    LogHit {
        log_id: Uuid::new_v4(),
        relationship_id: Uuid::new_v4(),
        content: content.to_string(),
        display_name: name.to_string(),
        occurred_at: Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap(),
        keyword_score: Some(keyword),
        semantic_score: None,
        hybrid_score: Some(hybrid),
    }
}

fn router_with(
    hits: Vec<LogHit>,
    backend: MockInferenceBackend,
    limiter: RateLimiter,
) -> Router {
    let store = Arc::new(FixedStore { hits });
    let embedder: Arc<dyn EmbeddingBackend> = Arc::new(backend.clone());
    let generator: Arc<dyn GenerationBackend> = Arc::new(backend);
    let composer = ResponseComposer::new(generator, Arc::new(limiter));
    let service = Arc::new(SearchService::new(store, embedder, composer));
    app(AppState { service })
}

fn search_request(body: &serde_json::Value, bearer: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/search")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user_id) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", user_id));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn search_returns_ranked_results_and_answer() {
    let backend = MockInferenceBackend::new().with_fixed_response("You met Sam for coffee.");
    let router = router_with(
        vec![
            hit("Lunch with Alex", "Alex", 0.4, 0.3),
            hit("Coffee downtown", "Sam", 0.9, 0.8),
        ],
        backend,
        RateLimiter::with_defaults(),
    );

    let body = serde_json::json!({"query": "coffee", "search_type": "hybrid"});
    let response = router
        .oneshot(search_request(&body, Some(Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["llm_answer"], "You met Sam for coffee.");

    // Ranked by hybrid score, highest first
    assert_eq!(json["results"][0]["name"], "Sam");
    assert_eq!(json["results"][0]["content"], "Coffee downtown");
    assert_eq!(json["results"][0]["date"], "2026-03-14T12:00:00+00:00");
    assert!(json["results"][0]["score"].as_f64().unwrap() > 0.89);
    assert_eq!(json["results"][1]["name"], "Alex");
}

#[tokio::test]
async fn generation_failure_degrades_answer_to_null() {
    let backend = MockInferenceBackend::new().with_failing_generation();
    let router = router_with(
        vec![hit("Coffee downtown", "Sam", 0.9, 0.8)],
        backend,
        RateLimiter::with_defaults(),
    );

    let body = serde_json::json!({"query": "coffee", "search_type": "keyword"});
    let response = router
        .oneshot(search_request(&body, Some(Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["llm_answer"].is_null());
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["name"], "Sam");
}

#[tokio::test]
async fn rate_limited_request_keeps_results() {
    let backend = MockInferenceBackend::new().with_fixed_response("never produced");
    let limiter = RateLimiter::new(0, std::time::Duration::from_secs(60));
    let router = router_with(vec![hit("Coffee downtown", "Sam", 0.9, 0.8)], backend, limiter);

    let body = serde_json::json!({"query": "coffee", "search_type": "keyword"});
    let response = router
        .oneshot(search_request(&body, Some(Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["llm_answer"].is_null());
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn empty_store_returns_empty_outcome() {
    let backend = MockInferenceBackend::new().with_fixed_response("never produced");
    let router = router_with(vec![], backend.clone(), RateLimiter::with_defaults());

    let body = serde_json::json!({"query": "coffee", "search_type": "keyword"});
    let response = router
        .oneshot(search_request(&body, Some(Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["count"], 0);
    assert!(json["llm_answer"].is_null());
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
    assert_eq!(backend.generate_call_count(), 0);
}

#[tokio::test]
async fn unknown_search_type_is_400() {
    let backend = MockInferenceBackend::new();
    let router = router_with(vec![], backend, RateLimiter::with_defaults());

    let body = serde_json::json!({"query": "coffee", "search_type": "regex"});
    let response = router
        .oneshot(search_request(&body, Some(Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("unknown search_type"));
}

#[tokio::test]
async fn missing_bearer_is_401() {
    let backend = MockInferenceBackend::new();
    let router = router_with(vec![], backend, RateLimiter::with_defaults());

    let body = serde_json::json!({"query": "coffee"});
    let response = router.oneshot(search_request(&body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn malformed_bearer_is_401() {
    let backend = MockInferenceBackend::new();
    let router = router_with(vec![], backend, RateLimiter::with_defaults());

    let body = serde_json::json!({"query": "coffee"});
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/search")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer not-a-uuid")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_service_and_version() {
    let backend = MockInferenceBackend::new();
    let router = router_with(vec![], backend, RateLimiter::with_defaults());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "rapport-api");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
