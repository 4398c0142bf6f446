//! Listing query HTTP server.
//!
//! Exposes the validated REST query surface and the natural-language search
//! endpoint over JSON.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/v1` | API index |
//! | `GET`  | `/api/v1/businesses` | List businesses (filter/sort/paginate) |
//! | `GET`  | `/api/v1/businesses/{id}` | Business by UUID or slug |
//! | `GET`  | `/api/v1/franchises` | List franchises |
//! | `GET`  | `/api/v1/franchises/{id}` | Franchise by UUID or slug |
//! | `GET`  | `/api/v1/search` | Cross-collection free-text search |
//! | `POST` | `/api/v1/nl-search` | Natural-language search |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses carry a machine-readable code and a short message:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "Search query must be at least 3 characters" } }
//! ```
//!
//! Malformed filters never error — they degrade to defaults inside the
//! validator. Only the hard-reject cases (too-short search text, bad
//! identifier format, unknown route, wrong method) and backend failures
//! produce an error response, and backend detail is logged server-side
//! rather than leaked to the client.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted; preflight `OPTIONS`
//! requests are answered by the CORS layer.

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::db;
use crate::executor;
use crate::intent;
use crate::models::{
    BusinessSummary, FranchiseSummary, PaginatedEnvelope, Pagination, ResponseMeta,
};
use crate::query::{self, RawQueryParams};

/// Maximum accepted length for `/{id}` path identifiers.
const MAX_ID_LENGTH: usize = 50;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid slug pattern"));

/// Shared application state passed to all route handlers via Axum's `State`
/// extractor. The pool is internally reference-counted; requests share it
/// without further coordination since nothing here mutates shared state.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    pool: SqlitePool,
}

/// Starts the listing query HTTP server.
///
/// Binds to the address configured in `[server].bind` and registers all
/// route handlers. Runs indefinitely until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pool = db::connect(config).await?;
    let state = AppState {
        config: Arc::new(config.clone()),
        pool,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/v1", get(handle_index))
        .route("/api/v1/businesses", get(handle_businesses))
        .route("/api/v1/businesses/{id}", get(handle_business_by_id))
        .route("/api/v1/franchises", get(handle_franchises))
        .route("/api/v1/franchises/{id}", get(handle_franchise_by_id))
        .route("/api/v1/search", get(handle_search))
        .route("/api/v1/nl-search", post(handle_nl_search))
        .fallback(handle_unknown_route)
        .layer(middleware::from_fn(response_headers))
        .layer(cors)
        .with_state(state);

    tracing::info!("listing API listening on http://{}", bind_addr);
    println!("Listing API listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Adds `X-Content-Type-Options: nosniff` to every response and a
/// short-lived public cache header to successful GETs.
async fn response_headers(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let mut response = next.run(request).await;

    let cache = if method == Method::GET && response.status() == StatusCode::OK {
        "public, max-age=60"
    } else {
        "no-cache"
    };
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache));

    response
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Backend failures surface as a generic message; the detail stays in the
/// server log.
fn store_error(context: &'static str, error: anyhow::Error) -> AppError {
    tracing::error!(%error, context, "store query failed");
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: format!("Failed to {}", context),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/v1 ============

async fn handle_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "BizSearch API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
        "endpoints": {
            "businesses": "/api/v1/businesses",
            "franchises": "/api/v1/franchises",
            "search": "/api/v1/search",
            "nl_search": "/api/v1/nl-search",
        },
    }))
}

async fn handle_unknown_route() -> AppError {
    not_found("Endpoint not found")
}

// ============ List endpoints ============

async fn handle_businesses(
    State(state): State<AppState>,
    Query(params): Query<RawQueryParams>,
) -> Result<Json<PaginatedEnvelope<BusinessSummary>>, AppError> {
    let start = Instant::now();
    let spec = query::validate(&params, &state.config.api);

    let page = executor::fetch_businesses(&state.pool, &spec)
        .await
        .map_err(|e| store_error("fetch businesses", e))?;

    Ok(Json(PaginatedEnvelope {
        data: page.rows,
        pagination: Pagination::new(spec.page, spec.limit, page.total),
        meta: ResponseMeta::since(start),
    }))
}

async fn handle_franchises(
    State(state): State<AppState>,
    Query(params): Query<RawQueryParams>,
) -> Result<Json<PaginatedEnvelope<FranchiseSummary>>, AppError> {
    let start = Instant::now();
    let spec = query::validate(&params, &state.config.api);

    let page = executor::fetch_franchises(&state.pool, &spec)
        .await
        .map_err(|e| store_error("fetch franchises", e))?;

    Ok(Json(PaginatedEnvelope {
        data: page.rows,
        pagination: Pagination::new(spec.page, spec.limit, page.total),
        meta: ResponseMeta::since(start),
    }))
}

// ============ By-id endpoints ============

#[derive(Serialize)]
struct SingleResponse<T> {
    data: T,
    meta: ResponseMeta,
}

/// Sanitizes and shape-checks a path identifier: either a UUID or a
/// lowercase slug. Anything else is a 400 before the store is consulted.
fn checked_identifier(raw: &str, label: &str) -> Result<String, AppError> {
    let id = crate::sanitize::sanitize_string(Some(raw), MAX_ID_LENGTH)
        .ok_or_else(|| bad_request(format!("Invalid {} ID", label)))?;
    if uuid::Uuid::parse_str(&id).is_err() && !SLUG_PATTERN.is_match(&id) {
        return Err(bad_request("Invalid identifier format"));
    }
    Ok(id)
}

async fn handle_business_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SingleResponse<BusinessSummary>>, AppError> {
    let start = Instant::now();
    let id = checked_identifier(&raw_id, "business")?;

    let listing = executor::fetch_business_by_id(&state.pool, &id)
        .await
        .map_err(|e| store_error("fetch business", e))?
        .ok_or_else(|| not_found("Business not found"))?;

    Ok(Json(SingleResponse {
        data: listing,
        meta: ResponseMeta::since(start),
    }))
}

async fn handle_franchise_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SingleResponse<FranchiseSummary>>, AppError> {
    let start = Instant::now();
    let id = checked_identifier(&raw_id, "franchise")?;

    let listing = executor::fetch_franchise_by_id(&state.pool, &id)
        .await
        .map_err(|e| store_error("fetch franchise", e))?
        .ok_or_else(|| not_found("Franchise not found"))?;

    Ok(Json(SingleResponse {
        data: listing,
        meta: ResponseMeta::since(start),
    }))
}

// ============ GET /api/v1/search ============

#[derive(Serialize)]
struct SearchResponse {
    data: SearchData,
    meta: SearchMeta,
}

#[derive(Serialize)]
struct SearchData {
    businesses: Vec<BusinessSummary>,
    franchises: Vec<FranchiseSummary>,
}

#[derive(Serialize)]
struct SearchMeta {
    search_term: String,
    total_results: usize,
    #[serde(flatten)]
    base: ResponseMeta,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<RawQueryParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let start = Instant::now();
    let spec = query::validate(&params, &state.config.api);

    // The one hard-reject on this endpoint: a too-short term against
    // partial-match filters is both meaningless and expensive.
    let term = spec
        .filters
        .search
        .filter(|t| t.chars().count() >= query::MIN_SEARCH_LENGTH)
        .ok_or_else(|| {
            bad_request(format!(
                "Search query must be at least {} characters",
                query::MIN_SEARCH_LENGTH
            ))
        })?;

    let (businesses, franchises) = tokio::join!(
        executor::search_businesses(&state.pool, &term, spec.limit),
        executor::search_franchises(&state.pool, &term, spec.limit),
    );
    let businesses = businesses.map_err(|e| store_error("search listings", e))?;
    let franchises = franchises.map_err(|e| store_error("search listings", e))?;

    let total_results = businesses.len() + franchises.len();
    Ok(Json(SearchResponse {
        data: SearchData {
            businesses,
            franchises,
        },
        meta: SearchMeta {
            search_term: term,
            total_results,
            base: ResponseMeta::since(start),
        },
    }))
}

// ============ POST /api/v1/nl-search ============

#[derive(Deserialize)]
struct NlSearchRequest {
    query: String,
    #[serde(default = "default_execute")]
    execute: bool,
    #[serde(default)]
    limit: Option<i64>,
}

fn default_execute() -> bool {
    true
}

#[derive(Serialize)]
struct NlParseResponse {
    intent: intent::ParsedIntent,
    meta: ResponseMeta,
}

#[derive(Serialize)]
struct NlSearchResponse {
    intent: intent::ParsedIntent,
    results: NlResults,
    meta: NlMeta,
}

#[derive(Serialize)]
struct NlResults {
    businesses: Vec<BusinessSummary>,
    franchises: Vec<FranchiseSummary>,
}

#[derive(Serialize)]
struct NlMeta {
    total_businesses: usize,
    total_franchises: usize,
    /// Collections whose store query failed; their result lists are empty
    /// but the rest of the response is still valid.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed_collections: Vec<&'static str>,
    #[serde(flatten)]
    base: ResponseMeta,
}

async fn handle_nl_search(
    State(state): State<AppState>,
    body: Result<Json<NlSearchRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let Json(request) = body.map_err(|_| bad_request("Invalid JSON body"))?;

    let length = request.query.chars().count();
    if length < intent::MIN_QUERY_LENGTH {
        return Err(bad_request(format!(
            "Query must be at least {} characters",
            intent::MIN_QUERY_LENGTH
        )));
    }
    if length > intent::MAX_QUERY_LENGTH {
        return Err(bad_request(format!(
            "Query must not exceed {} characters",
            intent::MAX_QUERY_LENGTH
        )));
    }

    let limit = request
        .limit
        .unwrap_or(query::DEFAULT_NL_RESULTS)
        .clamp(1, query::MAX_NL_RESULTS);

    let parsed = intent::parse(&request.query);

    // Dry-run mode: return the interpretation without touching the store,
    // so callers can confirm low-confidence parses with the user first.
    if !request.execute {
        return Ok(Json(NlParseResponse {
            intent: parsed,
            meta: ResponseMeta::since(start),
        })
        .into_response());
    }

    let results = executor::execute_intent(&state.pool, &parsed, limit).await;

    Ok(Json(NlSearchResponse {
        intent: parsed,
        meta: NlMeta {
            total_businesses: results.businesses.len(),
            total_franchises: results.franchises.len(),
            failed_collections: results.failed_collections,
            base: ResponseMeta::since(start),
        },
        results: NlResults {
            businesses: results.businesses,
            franchises: results.franchises,
        },
    })
    .into_response())
}
