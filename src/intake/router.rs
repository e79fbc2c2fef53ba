use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::service::{SubmissionError, SubmissionService, APPLICATION_SUBMITTED, JOB_POSTED};
use crate::forms::{JobApplicationForm, JobPostForm, ValidationError};
use crate::store::{RecordStore, StoredRow};

/// Router builder exposing the submission and admin listing endpoints.
pub fn submission_router<S>(service: Arc<SubmissionService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/api/v1/jobs", post(post_job_handler::<S>))
        .route("/api/v1/applications", post(apply_handler::<S>))
        .route("/api/v1/admin/jobs", get(list_jobs_handler::<S>))
        .route(
            "/api/v1/admin/applications",
            get(list_applications_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn post_job_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    axum::Json(form): axum::Json<JobPostForm>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.post_job(&form) {
        Ok(row) => created(row, JOB_POSTED),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
    axum::Json(form): axum::Json<JobApplicationForm>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.apply(&form) {
        Ok(row) => created(row, APPLICATION_SUBMITTED),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_jobs_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.list_jobs() {
        Ok(rows) => listing(rows),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_applications_handler<S>(
    State(service): State<Arc<SubmissionService<S>>>,
) -> Response
where
    S: RecordStore + 'static,
{
    match service.list_applications() {
        Ok(rows) => listing(rows),
        Err(error) => error_response(error),
    }
}

fn created(row: StoredRow, message: &str) -> Response {
    let payload = json!({
        "id": row.id,
        "status": row.fields.get("status"),
        "created_at": row.created_at,
        "message": message,
    });
    (StatusCode::CREATED, axum::Json(payload)).into_response()
}

fn listing(rows: Vec<StoredRow>) -> Response {
    let payload = json!({
        "count": rows.len(),
        "rows": rows,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

fn error_response(error: SubmissionError) -> Response {
    match error {
        SubmissionError::Validation(validation) => {
            let fields = match &validation {
                ValidationError::MissingFields { fields, .. } => fields.clone(),
                _ => Vec::new(),
            };
            let payload = json!({
                "error": validation.to_string(),
                "code": validation.code(),
                "fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
