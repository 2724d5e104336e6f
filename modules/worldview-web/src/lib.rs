use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, warn};

use worldview_common::{
    Dashboard, Dimension, Record, RecordSource, WorldviewError, LOAD_FAILED_MESSAGE,
};

// --- App State ---

/// One dashboard session plus the provider it loads from.
pub struct AppState {
    pub dashboard: RwLock<Dashboard>,
    pub source: Arc<dyn RecordSource>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(dashboard: Dashboard, source: Arc<dyn RecordSource>) -> SharedState {
        Arc::new(Self {
            dashboard: RwLock::new(dashboard),
            source,
        })
    }
}

/// Fetch once from the provider and resolve the session's load state.
/// No retry: a failure stays visible until the next explicit reload.
///
/// When reloads overlap, only the most recently started fetch lands.
pub async fn load_records(state: SharedState) {
    let ticket = state.dashboard.write().await.begin_reload();

    let result = state.source.fetch_records().await;

    let mut dashboard = state.dashboard.write().await;
    let applied = match result {
        Ok(records) => dashboard.load(ticket, records),
        Err(e) => dashboard.fail(ticket, format!("{e:#}")),
    };
    if !applied {
        debug!("Discarded result of a superseded fetch");
    }
}

// --- Router ---

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/records", get(api_records))
        .route("/api/facets", get(api_facets))
        .route("/api/filters", delete(api_clear_filters))
        .route(
            "/api/filters/{dimension}",
            put(api_set_filter).delete(api_clear_filter),
        )
        .route("/api/reload", post(api_reload))
        .with_state(state)
        // Views are derived per session state; never cache them
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        // Method + path only; filter values stay out of the log
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

// --- Errors ---

pub struct ApiError(WorldviewError);

impl From<WorldviewError> for ApiError {
    fn from(err: WorldviewError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            WorldviewError::UnknownDimension(key) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": format!("Unknown filter dimension: {key}") })),
            )
                .into_response(),
            WorldviewError::Loading => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "loading" })),
            )
                .into_response(),
            WorldviewError::LoadFailed(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": LOAD_FAILED_MESSAGE })),
            )
                .into_response(),
            other => {
                warn!(error = %other, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

// --- Handlers ---

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_dashboard(State(state): State<SharedState>) -> ApiResult<impl IntoResponse> {
    let view = state.dashboard.read().await.view()?;
    Ok(Json(view))
}

async fn api_records(State(state): State<SharedState>) -> ApiResult<impl IntoResponse> {
    let dashboard = state.dashboard.read().await;
    let records: Vec<Record> = dashboard.filtered_records()?.into_iter().cloned().collect();
    Ok(Json(records))
}

async fn api_facets(State(state): State<SharedState>) -> ApiResult<impl IntoResponse> {
    let facets = state.dashboard.read().await.facets()?;
    Ok(Json(facets))
}

#[derive(Deserialize)]
struct FilterBody {
    value: Option<String>,
}

async fn api_set_filter(
    State(state): State<SharedState>,
    Path(dimension): Path<String>,
    Json(body): Json<FilterBody>,
) -> ApiResult<impl IntoResponse> {
    let dimension: Dimension = dimension.parse()?;
    let view = state
        .dashboard
        .write()
        .await
        .set_filter(dimension, body.value.unwrap_or_default())?;
    Ok(Json(view))
}

async fn api_clear_filter(
    State(state): State<SharedState>,
    Path(dimension): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let dimension: Dimension = dimension.parse()?;
    let view = state.dashboard.write().await.clear_filter(dimension)?;
    Ok(Json(view))
}

async fn api_clear_filters(State(state): State<SharedState>) -> ApiResult<impl IntoResponse> {
    let view = state.dashboard.write().await.clear_filters()?;
    Ok(Json(view))
}

async fn api_reload(State(state): State<SharedState>) -> impl IntoResponse {
    tokio::spawn(load_records(Arc::clone(&state)));
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "loading" })),
    )
}
