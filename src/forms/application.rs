use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::validation::{
    has_two_name_tokens, is_adult, is_composite_name, is_document_mime, missing_fields, parse_age,
    PhonePolicy,
};
use super::{optional_text, trimmed, FormKind, SubmissionStatus, ValidationError};
use crate::catalog::JobListing;

/// The listing an applicant is applying to, copied at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub title: String,
    pub location: Option<String>,
    pub pay: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

impl From<&JobListing> for JobSnapshot {
    fn from(listing: &JobListing) -> Self {
        Self {
            title: listing.title.clone(),
            location: Some(listing.location.clone()),
            pay: Some(listing.pay.clone()),
            job_type: Some(listing.kind.clone()),
        }
    }
}

/// Uploaded proof, referenced by storage key rather than inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub name: String,
    /// Declared by the client; may be blank.
    #[serde(default)]
    pub mime_type: String,
    pub storage_key: String,
}

impl DocumentDescriptor {
    /// Declared type, or a guess from the file extension when none was sent.
    pub fn effective_mime(&self) -> String {
        let declared = self.mime_type.trim();
        if !declared.is_empty() {
            return declared.to_string();
        }
        mime_guess::from_path(&self.name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string()
    }
}

/// In-progress job application input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobApplicationForm {
    pub job: Option<JobSnapshot>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub parent_guardian_name: Option<String>,
    /// Full name of a brother or sister, or "N/A".
    pub sibling_name: Option<String>,
    pub id_number: Option<String>,
    pub birth_certificate: Option<DocumentDescriptor>,
    pub policy_agreed: bool,
    pub faithful_honest: bool,
}

/// Row written to the `job_applications` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplicationRecord {
    pub job_title: String,
    pub job_location: Option<String>,
    pub job_pay: Option<String>,
    pub job_type: Option<String>,
    pub age: u32,
    pub gender: String,
    pub education_level: String,
    pub location: String,
    pub phone_number: String,
    pub parent_guardian_name: String,
    pub sibling_name: String,
    pub id_number: String,
    pub birth_certificate: DocumentDescriptor,
    pub policy_agreed: bool,
    pub faithful_honest: bool,
    pub status: SubmissionStatus,
}

const REQUIRED_FIELDS: [&str; 8] = [
    "age",
    "gender",
    "education_level",
    "location",
    "phone_number",
    "parent_guardian_name",
    "sibling_name",
    "id_number",
];

impl JobApplicationForm {
    pub fn for_listing(listing: &JobListing) -> Self {
        Self {
            job: Some(JobSnapshot::from(listing)),
            ..Self::default()
        }
    }

    fn required(&self) -> BTreeMap<&'static str, &str> {
        let mut fields = BTreeMap::new();
        fields.insert("age", trimmed(&self.age));
        fields.insert("gender", trimmed(&self.gender));
        fields.insert("education_level", trimmed(&self.education_level));
        fields.insert("location", trimmed(&self.location));
        fields.insert("phone_number", trimmed(&self.phone_number));
        fields.insert("parent_guardian_name", trimmed(&self.parent_guardian_name));
        fields.insert("sibling_name", trimmed(&self.sibling_name));
        fields.insert("id_number", trimmed(&self.id_number));
        fields
    }

    /// Every failing check, in the order the form reports them.
    pub fn violations(&self, policy: &PhonePolicy) -> Vec<ValidationError> {
        let mut violations = Vec::new();

        let fields = self.required();
        let mut missing = missing_fields(&fields, &REQUIRED_FIELDS);
        if self.birth_certificate.is_none() {
            missing.push("birth_certificate");
        }
        if !missing.is_empty() {
            violations.push(ValidationError::MissingFields {
                form: FormKind::JobApplication,
                fields: missing,
            });
        }

        if let Some(document) = &self.birth_certificate {
            let mime_type = document.effective_mime();
            if !is_document_mime(&mime_type) {
                violations.push(ValidationError::InvalidDocumentType { mime_type });
            }
        }

        let age = trimmed(&self.age);
        if !age.is_empty() {
            match parse_age(age) {
                Some(years) if !is_adult(years) => {
                    violations.push(ValidationError::Underage { age: years })
                }
                Some(_) => {}
                None => violations.push(ValidationError::InvalidAge {
                    value: age.to_string(),
                }),
            }
        }

        let phone = trimmed(&self.phone_number);
        if !phone.is_empty() && !policy.is_valid(phone) {
            violations.push(ValidationError::InvalidPhone {
                policy: policy.name().to_string(),
            });
        }

        let parent = trimmed(&self.parent_guardian_name);
        if !parent.is_empty() && !has_two_name_tokens(parent) {
            violations.push(ValidationError::IncompleteParentName);
        }

        let sibling = trimmed(&self.sibling_name);
        if !sibling.is_empty() && !is_composite_name(sibling) {
            violations.push(ValidationError::IncompleteSiblingName);
        }

        if !self.policy_agreed || !self.faithful_honest {
            violations.push(ValidationError::AgreementRequired);
        }

        violations
    }

    /// Validate and build the row to store, or return the first failing check.
    pub fn validate(&self, policy: &PhonePolicy) -> Result<JobApplicationRecord, ValidationError> {
        if let Some(first) = self.violations(policy).into_iter().next() {
            return Err(first);
        }

        let raw_age = trimmed(&self.age);
        let age = parse_age(raw_age).ok_or_else(|| ValidationError::InvalidAge {
            value: raw_age.to_string(),
        })?;
        let phone_number = policy.canonical(trimmed(&self.phone_number)).ok_or_else(|| {
            ValidationError::InvalidPhone {
                policy: policy.name().to_string(),
            }
        })?;
        let birth_certificate = self
            .birth_certificate
            .as_ref()
            .map(|document| DocumentDescriptor {
                mime_type: document.effective_mime(),
                ..document.clone()
            })
            .ok_or_else(|| ValidationError::MissingFields {
                form: FormKind::JobApplication,
                fields: vec!["birth_certificate"],
            })?;

        let job = self.job.clone().unwrap_or_default();

        Ok(JobApplicationRecord {
            job_title: job.title,
            job_location: job.location,
            job_pay: job.pay,
            job_type: job.job_type,
            age,
            gender: trimmed(&self.gender).to_string(),
            education_level: trimmed(&self.education_level).to_string(),
            location: trimmed(&self.location).to_string(),
            phone_number,
            parent_guardian_name: trimmed(&self.parent_guardian_name).to_string(),
            sibling_name: optional_text(&self.sibling_name).unwrap_or_default(),
            id_number: trimmed(&self.id_number).to_string(),
            birth_certificate,
            policy_agreed: self.policy_agreed,
            faithful_honest: self.faithful_honest,
            status: SubmissionStatus::Pending,
        })
    }
}
