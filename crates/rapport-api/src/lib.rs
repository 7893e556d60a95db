//! # rapport-api
//!
//! HTTP API server for rapport: a thin axum boundary over the search
//! service. The router is exposed as a library so integration tests can
//! drive it with `tower::ServiceExt` without binding a socket.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use rapport_core::{defaults, HybridWeights};
use rapport_search::{SearchRequest, SearchService};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically and line up
/// with log output when debugging production incidents.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

// =============================================================================
// REQUEST / RESPONSE TYPES
// =============================================================================

fn default_search_type() -> String {
    "hybrid".to_string()
}

/// Optional per-request search parameters.
#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    pub full_text_weight: Option<f32>,
    pub semantic_weight: Option<f32>,
}

/// `POST /api/v1/search` request body.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
    #[serde(default = "default_search_type")]
    pub search_type: String,
    pub match_count: Option<i64>,
    #[serde(default)]
    pub params: Option<SearchParams>,
}

/// One search result in the response.
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub name: String,
    pub date: String,
    pub content: String,
    pub score: f32,
}

/// `POST /api/v1/search` response body.
#[derive(Debug, Serialize)]
pub struct SearchResponseBody {
    pub results: Vec<SearchResultItem>,
    pub llm_answer: Option<String>,
    pub count: usize,
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    Internal(rapport_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
}

impl From<rapport_core::Error> for ApiError {
    fn from(err: rapport_core::Error) -> Self {
        match &err {
            rapport_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            rapport_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Resolve the scope (user identity) from the bearer token.
///
/// Upstream auth middleware has already validated the token; here it
/// carries the user id directly. A missing or malformed header is 401.
fn bearer_user_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".to_string()))?;

    Uuid::parse_str(token.trim())
        .map_err(|_| ApiError::Unauthorized("invalid bearer token".to_string()))
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SearchBody>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = bearer_user_id(&headers)?;

    let weights = body.params.as_ref().map(|p| HybridWeights {
        full_text: p
            .full_text_weight
            .unwrap_or(defaults::HYBRID_FULL_TEXT_WEIGHT),
        semantic: p.semantic_weight.unwrap_or(defaults::HYBRID_SEMANTIC_WEIGHT),
    });

    let request = SearchRequest {
        query: body.query,
        search_type: body.search_type,
        match_count: body.match_count,
        weights,
    };

    let outcome = state.service.search(&request, user_id).await?;

    let results = outcome
        .results
        .into_iter()
        .map(|log| SearchResultItem {
            name: log.display_name,
            date: log.occurred_at.to_rfc3339(),
            content: log.content,
            score: log.score,
        })
        .collect();

    Ok(Json(SearchResponseBody {
        results,
        llm_answer: outcome.answer,
        count: outcome.count,
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rapport-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with middleware applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/search", post(search))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(
                    defaults::CORS_MAX_AGE_SECS,
                )),
        )
        .with_state(state)
}
