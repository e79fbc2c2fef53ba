//! Typed submission forms and the predicate library they are validated with.

pub mod application;
pub mod job_post;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use application::{DocumentDescriptor, JobApplicationForm, JobApplicationRecord, JobSnapshot};
pub use job_post::{JobPostForm, JobPostRecord};
pub use validation::{
    all_required_present, has_two_name_tokens, is_adult, is_composite_name, is_valid_email,
    is_valid_local_phone, PhonePolicy,
};

/// Which form a missing-field report belongs to; each has its own prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    JobPost,
    JobApplication,
}

impl FormKind {
    pub const fn missing_prompt(self) -> &'static str {
        match self {
            FormKind::JobPost => "Please fill in all required fields and confirm you are 18+.",
            FormKind::JobApplication => {
                "Please fill in all required fields and upload your birth certificate."
            }
        }
    }
}

/// User input that fails a field predicate. Always recoverable by editing the form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", .form.missing_prompt())]
    MissingFields {
        form: FormKind,
        fields: Vec<&'static str>,
    },
    #[error("Please enter your age as a whole number.")]
    InvalidAge { value: String },
    #[error("You must be 18 years or older to apply for jobs.")]
    Underage { age: u32 },
    #[error("Please enter a valid Kenyan phone number.")]
    InvalidPhone { policy: String },
    #[error("Payment amount must be a non-negative number.")]
    InvalidPaymentAmount { value: String },
    #[error("{field} must be a date in YYYY-MM-DD format.")]
    InvalidDate { field: &'static str, value: String },
    #[error("Please enter the parent or guardian's full name.")]
    IncompleteParentName,
    #[error("Please enter a brother or sister's full name, or N/A.")]
    IncompleteSiblingName,
    #[error("Please upload a PDF or image file for birth certificate.")]
    InvalidDocumentType { mime_type: String },
    #[error("Please agree to the policies and confirm your faithfulness and honesty.")]
    AgreementRequired,
}

impl ValidationError {
    /// Short machine-readable tag for API payloads and logs.
    pub const fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields { .. } => "missing_fields",
            ValidationError::InvalidAge { .. } => "invalid_age",
            ValidationError::Underage { .. } => "underage",
            ValidationError::InvalidPhone { .. } => "invalid_phone",
            ValidationError::InvalidPaymentAmount { .. } => "invalid_payment_amount",
            ValidationError::InvalidDate { .. } => "invalid_date",
            ValidationError::IncompleteParentName => "incomplete_parent_name",
            ValidationError::IncompleteSiblingName => "incomplete_sibling_name",
            ValidationError::InvalidDocumentType { .. } => "invalid_document_type",
            ValidationError::AgreementRequired => "agreement_required",
        }
    }
}

/// Lifecycle tag written alongside each stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Active,
    Pending,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Active => "active",
            SubmissionStatus::Pending => "pending",
        }
    }
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

fn optional_text(value: &Option<String>) -> Option<String> {
    Some(trimmed(value))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_prompt_depends_on_form() {
        let post = ValidationError::MissingFields {
            form: FormKind::JobPost,
            fields: vec!["phone_number"],
        };
        assert_eq!(
            post.to_string(),
            "Please fill in all required fields and confirm you are 18+."
        );
        let apply = ValidationError::MissingFields {
            form: FormKind::JobApplication,
            fields: vec!["id_number"],
        };
        assert!(apply.to_string().contains("birth certificate"));
        assert_eq!(apply.code(), "missing_fields");
    }

    #[test]
    fn status_labels() {
        assert_eq!(SubmissionStatus::Active.label(), "active");
        assert_eq!(
            serde_json::to_value(SubmissionStatus::Pending).expect("serializes"),
            serde_json::json!("pending")
        );
    }
}
