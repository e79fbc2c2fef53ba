use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{missing_fields, PhonePolicy};
use super::{optional_text, trimmed, FormKind, SubmissionStatus, ValidationError};

/// In-progress "post a job" input. Every text field is optional until submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPostForm {
    pub job_title: Option<String>,
    pub location: Option<String>,
    /// e.g. "daily", "weekly", "fixed".
    pub payment_type: Option<String>,
    pub payment_amount: Option<String>,
    pub job_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub age_confirmed: bool,
}

/// Row written to the `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPostRecord {
    pub job_title: String,
    pub location: String,
    pub payment_type: String,
    pub payment_amount: f64,
    pub job_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub phone_number: String,
    pub description: Option<String>,
    pub age_confirmed: bool,
    pub status: SubmissionStatus,
}

impl JobPostForm {
    fn required(&self) -> BTreeMap<&'static str, &str> {
        let mut fields = BTreeMap::new();
        fields.insert("job_title", trimmed(&self.job_title));
        fields.insert("location", trimmed(&self.location));
        fields.insert("payment_type", trimmed(&self.payment_type));
        fields.insert("payment_amount", trimmed(&self.payment_amount));
        fields.insert("job_type", trimmed(&self.job_type));
        fields.insert("start_date", trimmed(&self.start_date));
        fields.insert("phone_number", trimmed(&self.phone_number));
        fields
    }

    /// Every failing check, in the order the form reports them.
    pub fn violations(&self, policy: &PhonePolicy) -> Vec<ValidationError> {
        let mut violations = Vec::new();

        let fields = self.required();
        let mut missing = missing_fields(&fields, &REQUIRED_FIELDS);
        if !self.age_confirmed {
            missing.push("age_confirmed");
        }
        if !missing.is_empty() {
            violations.push(ValidationError::MissingFields {
                form: FormKind::JobPost,
                fields: missing,
            });
        }

        let phone = trimmed(&self.phone_number);
        if !phone.is_empty() && !policy.is_valid(phone) {
            violations.push(ValidationError::InvalidPhone {
                policy: policy.name().to_string(),
            });
        }

        let amount = trimmed(&self.payment_amount);
        if !amount.is_empty() && parse_amount(amount).is_none() {
            violations.push(ValidationError::InvalidPaymentAmount {
                value: amount.to_string(),
            });
        }

        for (field, value) in [("start_date", &self.start_date), ("end_date", &self.end_date)] {
            let raw = trimmed(value);
            if !raw.is_empty() && parse_date(raw).is_none() {
                violations.push(ValidationError::InvalidDate {
                    field,
                    value: raw.to_string(),
                });
            }
        }

        violations
    }

    /// Validate and build the row to store, or return the first failing check.
    pub fn validate(&self, policy: &PhonePolicy) -> Result<JobPostRecord, ValidationError> {
        if let Some(first) = self.violations(policy).into_iter().next() {
            return Err(first);
        }

        let phone = trimmed(&self.phone_number);
        let phone_number = policy
            .canonical(phone)
            .ok_or_else(|| ValidationError::InvalidPhone {
                policy: policy.name().to_string(),
            })?;

        let amount = trimmed(&self.payment_amount);
        let payment_amount =
            parse_amount(amount).ok_or_else(|| ValidationError::InvalidPaymentAmount {
                value: amount.to_string(),
            })?;

        let start = trimmed(&self.start_date);
        let start_date = parse_date(start).ok_or_else(|| ValidationError::InvalidDate {
            field: "start_date",
            value: start.to_string(),
        })?;
        let end_date = optional_text(&self.end_date).and_then(|raw| parse_date(&raw));

        Ok(JobPostRecord {
            job_title: trimmed(&self.job_title).to_string(),
            location: trimmed(&self.location).to_string(),
            payment_type: trimmed(&self.payment_type).to_string(),
            payment_amount,
            job_type: trimmed(&self.job_type).to_string(),
            start_date,
            end_date,
            start_time: optional_text(&self.start_time),
            end_time: optional_text(&self.end_time),
            phone_number,
            description: optional_text(&self.description),
            age_confirmed: self.age_confirmed,
            status: SubmissionStatus::Active,
        })
    }
}

const REQUIRED_FIELDS: [&str; 7] = [
    "job_title",
    "location",
    "payment_type",
    "payment_amount",
    "job_type",
    "start_date",
    "phone_number",
];

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
