use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::forms::{JobApplicationForm, PhonePolicy};
use crate::intake::router::{apply_handler, list_applications_handler, post_job_handler};
use crate::intake::SubmissionService;

#[tokio::test]
async fn post_job_handler_returns_created() {
    let (service, _) = build_service();

    let response =
        post_job_handler(State(Arc::new(service)), axum::Json(job_post())).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "active");
    assert!(payload["message"]
        .as_str()
        .unwrap_or_default()
        .contains("submitted for review"));
}

#[tokio::test]
async fn apply_handler_returns_unprocessable_with_reason() {
    let (service, _) = build_service();
    let form = JobApplicationForm {
        age: Some("16".to_string()),
        ..application()
    };

    let response = apply_handler(State(Arc::new(service)), axum::Json(form)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], "underage");
    assert_eq!(
        payload["error"],
        "You must be 18 years or older to apply for jobs."
    );
}

#[tokio::test]
async fn missing_fields_are_listed() {
    let (service, _) = build_service();

    let response = apply_handler(
        State(Arc::new(service)),
        axum::Json(JobApplicationForm::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let fields = payload["fields"].as_array().cloned().unwrap_or_default();
    assert_eq!(fields.len(), 9);
    assert!(fields.contains(&json!("birth_certificate")));
}

#[tokio::test]
async fn store_outage_maps_to_service_unavailable() {
    let service = Arc::new(SubmissionService::new(
        Arc::new(UnavailableStore),
        PhonePolicy::kenya_mobile(),
    ));

    let response = post_job_handler(State(service.clone()), axum::Json(job_post())).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Failed to post job. Please try again.");

    let response = list_applications_handler(State(service)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn routes_accept_json_and_list_newest_first() {
    let (service, _) = build_service();
    let router = submission_router_with_service(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::post("/api/v1/applications")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&application()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/admin/applications")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["rows"][0]["job_title"], "Farm Workers");
    assert_eq!(payload["rows"][0]["status"], "pending");
}
