use std::sync::Arc;

use tracing::{info, warn};

use crate::forms::{JobApplicationForm, JobPostForm, PhonePolicy, ValidationError};
use crate::store::{to_fields, RecordStore, StoreError, StoredRow, Table};

pub const JOB_POSTED: &str =
    "Your job posting has been submitted for review. We'll contact you soon.";
pub const APPLICATION_SUBMITTED: &str =
    "Your job application has been submitted successfully. We'll contact you soon.";

/// Validates submitted forms and writes them to the record store.
pub struct SubmissionService<S> {
    store: Arc<S>,
    phone_policy: PhonePolicy,
}

impl<S> SubmissionService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, phone_policy: PhonePolicy) -> Self {
        Self {
            store,
            phone_policy,
        }
    }

    pub fn phone_policy(&self) -> &PhonePolicy {
        &self.phone_policy
    }

    /// Validate a job post and store it as `active`.
    pub fn post_job(&self, form: &JobPostForm) -> Result<StoredRow, SubmissionError> {
        let record = form.validate(&self.phone_policy).map_err(|error| {
            info!(code = error.code(), "job post rejected");
            error
        })?;
        let row = self.insert(Table::Jobs, to_fields(&record))?;
        info!(row_id = row.id, job_type = %record.job_type, "job posted");
        Ok(row)
    }

    /// Validate an application and store it as `pending`.
    pub fn apply(&self, form: &JobApplicationForm) -> Result<StoredRow, SubmissionError> {
        let record = form.validate(&self.phone_policy).map_err(|error| {
            info!(code = error.code(), "application rejected");
            error
        })?;
        let row = self.insert(Table::JobApplications, to_fields(&record))?;
        info!(row_id = row.id, job_title = %record.job_title, "application submitted");
        Ok(row)
    }

    /// Posted jobs, newest first.
    pub fn list_jobs(&self) -> Result<Vec<StoredRow>, SubmissionError> {
        self.query(Table::Jobs)
    }

    /// Applications, newest first.
    pub fn list_applications(&self) -> Result<Vec<StoredRow>, SubmissionError> {
        self.query(Table::JobApplications)
    }

    fn insert(
        &self,
        table: Table,
        fields: Result<serde_json::Map<String, serde_json::Value>, StoreError>,
    ) -> Result<StoredRow, SubmissionError> {
        fields
            .and_then(|fields| self.store.insert(table, fields))
            .map_err(|source| {
                warn!(table = table.name(), error = %source, "record store insert failed");
                SubmissionError::Store { table, source }
            })
    }

    fn query(&self, table: Table) -> Result<Vec<StoredRow>, SubmissionError> {
        self.store.query_all(table).map_err(|source| {
            warn!(table = table.name(), error = %source, "record store query failed");
            SubmissionError::Query { table, source }
        })
    }
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", retry_prompt(*.table))]
    Store {
        table: Table,
        #[source]
        source: StoreError,
    },
    #[error("Could not load {}. Please try again.", .table.name())]
    Query {
        table: Table,
        #[source]
        source: StoreError,
    },
}

/// Message shown when the store rejects a write; the user retries by hand.
pub fn retry_prompt(table: Table) -> &'static str {
    match table {
        Table::Jobs => "Failed to post job. Please try again.",
        Table::JobApplications => "Failed to submit application. Please try again.",
    }
}
