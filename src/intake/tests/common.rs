use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::JobCatalog;
use crate::forms::{DocumentDescriptor, JobApplicationForm, JobPostForm, PhonePolicy};
use crate::intake::{submission_router, SubmissionService};
use crate::store::{InMemoryRecordStore, RecordStore, StoreError, StoredRow, Table};

pub(super) fn job_post() -> JobPostForm {
    JobPostForm {
        job_title: Some("Matatu Conductor".to_string()),
        location: Some("Nakuru, Town".to_string()),
        payment_type: Some("daily".to_string()),
        payment_amount: Some("900".to_string()),
        job_type: Some("Transport".to_string()),
        start_date: Some("2025-04-07".to_string()),
        end_date: Some("2025-04-30".to_string()),
        start_time: Some("06:00".to_string()),
        end_time: Some("18:00".to_string()),
        phone_number: Some("0722000111".to_string()),
        description: Some("Route 42, Nakuru to Naivasha.".to_string()),
        age_confirmed: true,
    }
}

pub(super) fn application() -> JobApplicationForm {
    let listing = &JobCatalog::seeded().listings()[11];
    JobApplicationForm {
        age: Some("24".to_string()),
        gender: Some("male".to_string()),
        education_level: Some("diploma".to_string()),
        location: Some("Naivasha".to_string()),
        phone_number: Some("0112345678".to_string()),
        parent_guardian_name: Some("Peter Kariuki".to_string()),
        sibling_name: Some("Grace Wambui".to_string()),
        id_number: Some("29876543".to_string()),
        birth_certificate: Some(DocumentDescriptor {
            name: "cert.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            storage_key: "uploads/applicants/0042/cert.jpg".to_string(),
        }),
        policy_agreed: true,
        faithful_honest: true,
        ..JobApplicationForm::for_listing(listing)
    }
}

pub(super) fn build_service() -> (
    SubmissionService<InMemoryRecordStore>,
    Arc<InMemoryRecordStore>,
) {
    let store = Arc::new(InMemoryRecordStore::default());
    let service = SubmissionService::new(store.clone(), PhonePolicy::kenya_mobile());
    (service, store)
}

pub(super) fn submission_router_with_service(
    service: SubmissionService<InMemoryRecordStore>,
) -> axum::Router {
    submission_router(Arc::new(service))
}

/// Store that refuses every call, standing in for an unreachable backend.
#[derive(Default, Clone)]
pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn insert(
        &self,
        _table: Table,
        _fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<StoredRow, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn query_all(&self, _table: Table) -> Result<Vec<StoredRow>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
