//! Static job and fare catalogs and the multi-criterion filter applied to them.

pub mod board;
pub mod counties;
pub mod fares;
pub mod jobs;

use serde::{Deserialize, Serialize};

use crate::geo::{distance_km, Coordinate};

pub use board::{FareBoard, JobBoard, JobSearch, JobSearchResult, OfficeLookup, UserArea};
pub use counties::{parse_route_label, suggest, CountySuggestions, KENYAN_COUNTIES};
pub use fares::{FareCatalog, FareRoute};
pub use jobs::{JobCatalog, JobCatalogImportError, JobListing};

/// Sentinel the search selectors use for "no constraint".
pub const ANY: &str = "all";

/// Uniform view over catalog entries so one filter serves jobs and fares.
pub trait CatalogRecord {
    /// Category tag compared by exact match, if the record carries one.
    fn kind(&self) -> Option<&str>;
    /// Fields searched by the free-text query.
    fn text_fields(&self) -> Vec<&str>;
    /// Location string the region tag is looked up in.
    fn location(&self) -> &str;
    /// Position used by the geo-radius predicate.
    fn point(&self) -> Option<Coordinate>;
}

/// Origin and radius for the proximity predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRadius {
    pub origin: Coordinate,
    pub radius_km: f64,
}

/// Independently optional search constraints. Empty strings and `"all"` count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub near: Option<GeoRadius>,
}

impl FilterCriteria {
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn near(mut self, origin: Coordinate, radius_km: f64) -> Self {
        self.near = Some(GeoRadius { origin, radius_km });
        self
    }

    fn active_kind(&self) -> Option<&str> {
        selector(self.kind.as_deref())
    }

    fn active_region(&self) -> Option<&str> {
        selector(self.region.as_deref())
    }

    /// Blankness is judged on the trimmed text; matching uses the text as typed.
    fn active_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|query| !query.trim().is_empty())
            .map(str::to_lowercase)
    }

    /// True when `record` passes every active predicate.
    pub fn matches<R: CatalogRecord + ?Sized>(&self, record: &R) -> bool {
        if let Some(kind) = self.active_kind() {
            if record.kind() != Some(kind) {
                return false;
            }
        }

        if let Some(query) = self.active_query() {
            let hit = record
                .text_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        if let Some(region) = self.active_region() {
            if !record.location().contains(region) {
                return false;
            }
        }

        if let (Some(near), Some(point)) = (self.near, record.point()) {
            if !(distance_km(near.origin, point) <= near.radius_km) {
                return false;
            }
        }

        true
    }
}

fn selector(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty() && *value != ANY)
}

/// Records passing `criteria`, in input order. The input is left untouched.
pub fn filter<'a, R: CatalogRecord>(records: &'a [R], criteria: &FilterCriteria) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| criteria.matches(*record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        kind: Option<&'static str>,
        title: &'static str,
        location: &'static str,
        point: Option<Coordinate>,
    }

    impl CatalogRecord for Row {
        fn kind(&self) -> Option<&str> {
            self.kind
        }

        fn text_fields(&self) -> Vec<&str> {
            vec![self.title, self.location]
        }

        fn location(&self) -> &str {
            self.location
        }

        fn point(&self) -> Option<Coordinate> {
            self.point
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                kind: Some("Cleaning"),
                title: "Office Cleaner",
                location: "Nairobi, CBD",
                point: Some(Coordinate::new(-1.2864, 36.8172)),
            },
            Row {
                kind: Some("Transport"),
                title: "Boda Rider",
                location: "Nairobi, Westlands",
                point: Some(Coordinate::new(-1.2630, 36.8065)),
            },
            Row {
                kind: Some("Cleaning"),
                title: "Campus Cleaner",
                location: "Eldoret, Town",
                point: Some(Coordinate::new(0.5143, 35.2698)),
            },
            Row {
                kind: None,
                title: "Town to Market",
                location: "Kisumu",
                point: None,
            },
        ]
    }

    #[test]
    fn empty_criteria_is_identity() {
        let records = rows();
        let filtered = filter(&records, &FilterCriteria::default());
        assert_eq!(filtered.len(), records.len());
        for (kept, original) in filtered.iter().zip(records.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn all_selector_is_no_constraint() {
        let records = rows();
        let criteria = FilterCriteria::default().with_kind(ANY).with_region(ANY);
        assert_eq!(filter(&records, &criteria).len(), 4);
    }

    #[test]
    fn kind_match_is_case_sensitive() {
        let records = rows();
        assert_eq!(
            filter(&records, &FilterCriteria::default().with_kind("Cleaning")).len(),
            2
        );
        assert!(filter(&records, &FilterCriteria::default().with_kind("cleaning")).is_empty());
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let records = rows();
        let found = filter(&records, &FilterCriteria::default().with_query("CLEAN"));
        let titles: Vec<_> = found.iter().map(|row| row.title).collect();
        assert_eq!(titles, vec!["Office Cleaner", "Campus Cleaner"]);
    }

    #[test]
    fn blank_query_matches_everything() {
        let records = rows();
        assert_eq!(
            filter(&records, &FilterCriteria::default().with_query("   ")).len(),
            4
        );
    }

    #[test]
    fn region_uses_substring_containment() {
        let records = rows();
        let found = filter(&records, &FilterCriteria::default().with_region("Nairobi"));
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|row| row.location.starts_with("Nairobi")));
    }

    #[test]
    fn geo_radius_skips_records_without_points() {
        let records = rows();
        let criteria = FilterCriteria::default().near(Coordinate::new(-1.28, 36.82), 10.0);
        let titles: Vec<_> = filter(&records, &criteria)
            .iter()
            .map(|row| row.title)
            .collect();
        assert_eq!(titles, vec!["Office Cleaner", "Boda Rider", "Town to Market"]);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let records = rows();
        let origin = Coordinate::new(-1.2630, 36.8065);
        let exact = distance_km(origin, Coordinate::new(-1.2864, 36.8172));
        let titles: Vec<_> = filter(&records, &FilterCriteria::default().near(origin, exact))
            .iter()
            .map(|row| row.title)
            .collect();
        assert_eq!(titles, vec!["Office Cleaner", "Boda Rider", "Town to Market"]);
    }

    #[test]
    fn zero_radius_keeps_records_at_the_origin() {
        let records = rows();
        let criteria = FilterCriteria::default().near(Coordinate::new(-1.2864, 36.8172), 0.0);
        let titles: Vec<_> = filter(&records, &criteria)
            .iter()
            .map(|row| row.title)
            .collect();
        assert_eq!(titles, vec!["Office Cleaner", "Town to Market"]);
    }

    #[test]
    fn query_whitespace_is_matched_as_typed() {
        let records = rows();
        assert_eq!(
            filter(&records, &FilterCriteria::default().with_query(" cleaner")).len(),
            2
        );
        assert!(filter(&records, &FilterCriteria::default().with_query("cleaner ")).is_empty());
    }

    #[test]
    fn predicates_combine_with_and() {
        let records = rows();
        let criteria = FilterCriteria::default()
            .with_kind("Cleaning")
            .with_region("Nairobi")
            .with_query("cleaner");
        let found = filter(&records, &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Office Cleaner");
    }

    #[test]
    fn no_match_is_an_empty_view() {
        let records = rows();
        assert!(filter(&records, &FilterCriteria::default().with_query("pilot")).is_empty());
    }

    #[test]
    fn criteria_deserialize_type_field() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"type":"Security","region":"all"}"#).expect("valid json");
        assert_eq!(criteria.kind.as_deref(), Some("Security"));
        assert_eq!(criteria.active_region(), None);
    }
}
