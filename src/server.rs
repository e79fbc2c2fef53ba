use crate::cli::ServeArgs;
use axum_prometheus::PrometheusMetricLayer;
use kwaground::api::{application, AppState, CatalogState};
use kwaground::config::AppConfig;
use kwaground::error::AppError;
use kwaground::intake::SubmissionService;
use kwaground::session::{InMemorySessionStore, Session};
use kwaground::store::InMemoryRecordStore;
use kwaground::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let submissions = Arc::new(SubmissionService::new(
        Arc::new(InMemoryRecordStore::default()),
        config.forms.phone_policy.policy(),
    ));
    let session = Session::new(Arc::new(InMemorySessionStore::default()));
    let catalogs = CatalogState::seeded(config.search.clone());

    let app = application(app_state, catalogs, submissions, session).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "kwaground job board ready");

    axum::serve(listener, app).await?;
    Ok(())
}
