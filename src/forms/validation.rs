//! Field-level predicates shared by every form. All of them are total: they
//! answer `false` rather than failing.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Minimum age for applicants and job posters.
pub const ADULT_AGE: u32 = 18;

/// Placeholder accepted in optional name fields, compared case-insensitively.
pub const NOT_APPLICABLE: &str = "n/a";

const KENYA_MOBILE_PATTERN: &str = r"^(\+254|0)(7|1)\d{8}$";
const SAFARICOM_PATTERN: &str = r"^(\+254|0)(7[0-29]\d|11[0-5]|74[0-8]|75[7-9]|76[89])\d{6}$";

/// Regional mobile-number rule. Swappable because the business rule is not settled.
#[derive(Debug, Clone)]
pub struct PhonePolicy {
    name: String,
    pattern: Regex,
    country_code: String,
}

impl PhonePolicy {
    /// Any Kenyan mobile number: `+2547…`, `+2541…`, `07…`, `01…` with 8 more digits.
    pub fn kenya_mobile() -> Self {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(KENYA_MOBILE_PATTERN).expect("static pattern compiles"));
        Self {
            name: "kenya_mobile".to_string(),
            pattern: pattern.clone(),
            country_code: "254".to_string(),
        }
    }

    /// Safaricom number ranges only.
    pub fn safaricom() -> Self {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(SAFARICOM_PATTERN).expect("static pattern compiles"));
        Self {
            name: "safaricom".to_string(),
            pattern: pattern.clone(),
            country_code: "254".to_string(),
        }
    }

    /// Policy backed by an arbitrary pattern, e.g. for another market.
    pub fn custom(
        name: impl Into<String>,
        pattern: &str,
        country_code: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            country_code: country_code.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self, phone: &str) -> bool {
        self.pattern.is_match(phone)
    }

    /// International `+<cc>…` form of a valid number, so `07…` and `+2547…` compare equal.
    pub fn canonical(&self, phone: &str) -> Option<String> {
        if !self.is_valid(phone) {
            return None;
        }

        let international_prefix = format!("+{}", self.country_code);
        if phone.starts_with(&international_prefix) {
            return Some(phone.to_string());
        }

        phone
            .strip_prefix('0')
            .map(|subscriber| format!("{international_prefix}{subscriber}"))
    }
}

impl Default for PhonePolicy {
    fn default() -> Self {
        Self::kenya_mobile()
    }
}

/// Shorthand for [`PhonePolicy::kenya_mobile`].
pub fn is_valid_local_phone(phone: &str) -> bool {
    PhonePolicy::kenya_mobile().is_valid(phone)
}

pub fn is_adult(age: u32) -> bool {
    age >= ADULT_AGE
}

/// Leading integer of a free-text age field, the way a lenient number parser reads it.
pub fn parse_age(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// At least two whitespace-separated tokens, e.g. a first and last name.
pub fn has_two_name_tokens(value: &str) -> bool {
    value.split_whitespace().take(2).count() >= 2
}

/// [`has_two_name_tokens`], or the "N/A" placeholder for optional relatives.
pub fn is_composite_name(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(NOT_APPLICABLE) || has_two_name_tokens(value)
}

/// Every key in `required` maps to a value that is not blank.
pub fn all_required_present(fields: &BTreeMap<&str, &str>, required: &[&str]) -> bool {
    missing_fields(fields, required).is_empty()
}

/// Keys from `required` that are absent or blank, in `required` order.
pub fn missing_fields<'k>(fields: &BTreeMap<&str, &str>, required: &[&'k str]) -> Vec<&'k str> {
    required
        .iter()
        .copied()
        .filter(|key| {
            fields
                .get(key)
                .map(|value| value.trim().is_empty())
                .unwrap_or(true)
        })
        .collect()
}

pub fn is_valid_email(email: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern compiles"))
        .is_match(email)
}

/// Upload types accepted for identity documents.
pub fn is_document_mime(mime: &str) -> bool {
    let mime = mime.trim().to_ascii_lowercase();
    mime == "application/pdf" || mime.starts_with("image/")
}
