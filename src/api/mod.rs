//! HTTP surface: catalog search, submissions, accounts, and service probes.

pub mod accounts;
pub mod routes;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::{Extension, Router};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::catalog::{FareCatalog, JobCatalog};
use crate::config::SearchConfig;
use crate::intake::{submission_router, SubmissionService};
use crate::session::{Session, SessionStore};
use crate::store::RecordStore;

pub use accounts::account_router;
pub use routes::catalog_router;

/// Process-level probes shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Arc<PrometheusHandle>,
}

/// Read-only catalogs plus the search policy applied to them.
pub struct CatalogState {
    pub jobs: Arc<JobCatalog>,
    pub fares: Arc<FareCatalog>,
    pub search: SearchConfig,
}

impl CatalogState {
    pub fn seeded(search: SearchConfig) -> Self {
        Self {
            jobs: Arc::new(JobCatalog::seeded().clone()),
            fares: Arc::new(FareCatalog::seeded().clone()),
            search,
        }
    }
}

/// Assemble every route into one application router.
pub fn application<R, S>(
    state: AppState,
    catalogs: CatalogState,
    submissions: Arc<SubmissionService<R>>,
    session: Session<S>,
) -> Router
where
    R: RecordStore + 'static,
    S: SessionStore + 'static,
{
    submission_router(submissions)
        .merge(catalog_router(Arc::new(catalogs)))
        .merge(account_router(session))
        .route("/health", axum::routing::get(routes::healthcheck))
        .route("/ready", axum::routing::get(routes::readiness_endpoint))
        .route("/metrics", axum::routing::get(routes::metrics_endpoint))
        .layer(Extension(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    use crate::forms::PhonePolicy;
    use crate::session::InMemorySessionStore;
    use crate::store::InMemoryRecordStore;

    fn app_with_state() -> (Router, AppState) {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let submissions = Arc::new(SubmissionService::new(
            Arc::new(InMemoryRecordStore::default()),
            PhonePolicy::kenya_mobile(),
        ));
        let session = Session::new(Arc::new(InMemorySessionStore::default()));
        let router = application(
            state.clone(),
            CatalogState::seeded(SearchConfig::default()),
            submissions,
            session,
        );
        (router, state)
    }

    fn app() -> Router {
        app_with_state().0
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        let payload = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, payload)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (router, state) = app_with_state();
        let (status, payload) = send(router.clone(), get("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        state.readiness.store(true, Ordering::Release);
        let (status, _) = send(router, get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (status, payload) = send(app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn job_search_applies_radius_in_users_county() {
        let body = json!({
            "location": "Nairobi",
            "user_position": { "lat": -1.2864, "lng": 36.8172 }
        });
        let (status, payload) = send(app(), post_json("/api/v1/jobs/search", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["radius_applied"], true);
        assert_eq!(payload["user_county"], "Nairobi");
        assert_eq!(payload["jobs"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn urgent_jobs_are_listed() {
        let (status, payload) = send(app(), get("/api/v1/jobs/urgent")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["jobs"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn fare_search_reports_default_table() {
        let (status, payload) = send(
            app(),
            post_json("/api/v1/fares/search", json!({ "county": "Turkana" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["dedicated_table"], false);
        assert_eq!(payload["routes"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn trending_fares_by_path() {
        let (status, payload) = send(app(), get("/api/v1/fares/trending/Kisumu")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["routes"][0]["to"], "Mega City");
    }

    #[tokio::test]
    async fn county_suggestions_include_routes_on_exact_match() {
        let (status, payload) = send(
            app(),
            post_json("/api/v1/counties/suggest", json!({ "input": "Nairobi" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["counties"], json!(["Nairobi"]));
        assert!(payload["routes"].as_array().map(Vec::len).unwrap_or(0) > 0);
    }

    #[tokio::test]
    async fn nearest_office_found_and_not_found() {
        let (status, payload) = send(
            app(),
            post_json(
                "/api/v1/offices/nearest",
                json!({ "position": { "lat": -1.28, "lng": 36.82 } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["found"], true);
        assert_eq!(payload["office"]["name"], "Nairobi County Council");

        let (status, payload) = send(
            app(),
            post_json(
                "/api/v1/offices/nearest",
                json!({ "position": { "lat": 10.0, "lng": 10.0 } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["found"], false);
        assert!(payload["office"].is_null());
    }

    #[tokio::test]
    async fn missing_position_falls_back_to_nairobi() {
        let (_, payload) = send(app(), post_json("/api/v1/offices/nearest", json!({}))).await;
        assert_eq!(payload["found"], true);
        assert_eq!(payload["origin"]["source"]["kind"], "fallback");
    }

    #[tokio::test]
    async fn plans_and_checkout() {
        let router = app();
        let (status, payload) = send(router.clone(), get("/api/v1/plans")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["plans"].as_array().map(Vec::len), Some(3));

        let (status, payload) = send(
            router.clone(),
            post_json("/api/v1/checkout", json!({ "plan_id": "basic" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["next"], "post_directly");

        let (status, payload) = send(
            router.clone(),
            post_json("/api/v1/checkout", json!({ "plan_id": "premium" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["next"], "payment");
        assert_eq!(payload["amount_minor"], 50_000);
        assert_eq!(payload["email"], "customer@example.com");

        let (status, _) = send(
            router,
            post_json("/api/v1/checkout", json!({ "plan_id": "gold" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn signed_in_user_pays_with_own_email() {
        let router = app();
        let (status, payload) = send(
            router.clone(),
            post_json(
                "/api/v1/auth/signup",
                json!({
                    "email": "mwangi@example.com",
                    "password": "secret1",
                    "confirm_password": "secret1"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payload["message"], "Account created successfully!");

        let (_, payload) = send(
            router.clone(),
            post_json("/api/v1/checkout", json!({ "plan_id": "enterprise" })),
        )
        .await;
        assert_eq!(payload["email"], "mwangi@example.com");

        let (status, _) = send(router.clone(), post_json("/api/v1/auth/logout", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let (_, payload) = send(router, get("/api/v1/auth/me")).await;
        assert_eq!(payload["authenticated"], false);
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let (status, payload) = send(
            app(),
            post_json(
                "/api/v1/auth/login",
                json!({ "email": "nobody@example.com", "password": "secret1" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(payload["error"], "Invalid email or password.");
    }
}
