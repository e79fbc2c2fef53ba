use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, CatalogState};
use crate::catalog::{self, FareBoard, JobBoard, JobSearch, JobSearchResult};
use crate::geo::{Coordinate, ReportedPosition};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FareSearchRequest {
    #[serde(default)]
    pub(crate) county: Option<String>,
    #[serde(default)]
    pub(crate) query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SuggestRequest {
    #[serde(default)]
    pub(crate) input: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OfficeRequest {
    /// Device position, if the client obtained one.
    #[serde(default)]
    pub(crate) position: Option<Coordinate>,
}

/// Router builder for the read-only catalog endpoints.
pub fn catalog_router(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/api/v1/jobs/search", post(search_jobs))
        .route("/api/v1/jobs/urgent", get(urgent_jobs))
        .route("/api/v1/fares/search", post(search_fares))
        .route("/api/v1/fares/trending/:county", get(trending_fares))
        .route("/api/v1/counties/suggest", post(suggest_counties))
        .route("/api/v1/offices/nearest", post(nearest_office))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn search_jobs(
    State(state): State<Arc<CatalogState>>,
    Json(request): Json<JobSearch>,
) -> Json<JobSearchResult> {
    let board = JobBoard::new(&state.jobs, &state.search);
    Json(board.search(&request))
}

pub(crate) async fn urgent_jobs(State(state): State<Arc<CatalogState>>) -> impl IntoResponse {
    Json(json!({ "jobs": state.jobs.urgent() }))
}

pub(crate) async fn search_fares(
    State(state): State<Arc<CatalogState>>,
    Json(request): Json<FareSearchRequest>,
) -> impl IntoResponse {
    let board = FareBoard::new(&state.fares, &state.search);
    let county = request
        .county
        .as_deref()
        .map(str::trim)
        .filter(|county| !county.is_empty())
        .unwrap_or(catalog::board::DEFAULT_COUNTY);
    let routes = board.search(Some(county), request.query.as_deref());

    Json(json!({
        "county": county,
        "dedicated_table": state.fares.has_county(county),
        "routes": routes,
    }))
}

pub(crate) async fn trending_fares(
    State(state): State<Arc<CatalogState>>,
    Path(county): Path<String>,
) -> impl IntoResponse {
    let board = FareBoard::new(&state.fares, &state.search);
    Json(json!({
        "county": county,
        "routes": board.trending(&county),
    }))
}

pub(crate) async fn suggest_counties(Json(request): Json<SuggestRequest>) -> impl IntoResponse {
    Json(catalog::suggest(&request.input))
}

pub(crate) async fn nearest_office(
    State(state): State<Arc<CatalogState>>,
    Json(request): Json<OfficeRequest>,
) -> impl IntoResponse {
    let board = FareBoard::new(&state.fares, &state.search);
    let lookup = board.report_office(&ReportedPosition(request.position)).await;

    Json(json!({
        "found": lookup.found(),
        "office": lookup.office,
        "distance_km": lookup.distance_km,
        "origin": lookup.origin,
    }))
}
