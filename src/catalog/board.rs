use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{filter, FareCatalog, FareRoute, FilterCriteria, JobCatalog, JobListing};
use crate::config::SearchConfig;
use crate::geo::{
    county_offices, locate_or_default, nearest_with_distance, resolve_county, Coordinate,
    GeolocationProvider, LabeledPoint, Located, ProximityPolicy, NAIROBI,
};

/// County the fare tracker opens on.
pub const DEFAULT_COUNTY: &str = "Nairobi";

/// Search form state for the job board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSearch {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, rename = "type")]
    pub job_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_position: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSearchResult {
    pub jobs: Vec<JobListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_county: Option<&'static str>,
    pub radius_applied: bool,
}

/// Where the user is, as far as the job board can tell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserArea {
    pub coordinate: Option<Coordinate>,
    pub county: Option<&'static str>,
}

/// Job search over a fixed catalog.
#[derive(Debug, Clone)]
pub struct JobBoard<'a> {
    catalog: &'a JobCatalog,
    search_radius_km: f64,
    geolocation_timeout: Duration,
}

impl<'a> JobBoard<'a> {
    pub fn new(catalog: &'a JobCatalog, config: &SearchConfig) -> Self {
        Self {
            catalog,
            search_radius_km: config.search_radius_km,
            geolocation_timeout: config.geolocation_timeout,
        }
    }

    pub fn catalog(&self) -> &'a JobCatalog {
        self.catalog
    }

    /// Resolve the user's county from the device, defaulting to Nairobi without a position.
    pub async fn locate_user<P>(&self, provider: &P) -> UserArea
    where
        P: GeolocationProvider + ?Sized,
    {
        let located = locate_or_default(provider, self.geolocation_timeout, NAIROBI).await;
        if located.is_fallback() {
            return UserArea {
                coordinate: None,
                county: Some(DEFAULT_COUNTY),
            };
        }

        UserArea {
            coordinate: Some(located.coordinate),
            county: resolve_county(located.coordinate),
        }
    }

    /// Filter the catalog. The radius check only runs when the selected location
    /// is the county the user is standing in.
    pub fn search(&self, request: &JobSearch) -> JobSearchResult {
        let user_county = request.user_position.and_then(resolve_county);

        let mut criteria = FilterCriteria {
            kind: request.job_type.clone(),
            query: request.query.clone(),
            region: request.location.clone(),
            near: None,
        };

        let radius_applied = match (request.user_position, user_county) {
            (Some(origin), Some(county)) if request.location.as_deref() == Some(county) => {
                criteria = criteria.near(origin, self.search_radius_km);
                true
            }
            _ => false,
        };

        let jobs: Vec<JobListing> = filter(self.catalog.listings(), &criteria)
            .into_iter()
            .cloned()
            .collect();

        debug!(
            matches = jobs.len(),
            radius_applied,
            county = user_county.unwrap_or("unknown"),
            "job search evaluated"
        );

        JobSearchResult {
            jobs,
            user_county,
            radius_applied,
        }
    }
}

/// Outcome of the nearest-office lookup behind "report a fare issue".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficeLookup {
    pub origin: Located,
    pub office: Option<LabeledPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl OfficeLookup {
    pub fn found(&self) -> bool {
        self.office.is_some()
    }
}

/// Fare tables plus the complaint-office lookup.
#[derive(Debug, Clone)]
pub struct FareBoard<'a> {
    catalog: &'a FareCatalog,
    offices: &'a [LabeledPoint],
    proximity: ProximityPolicy,
    geolocation_timeout: Duration,
}

impl<'a> FareBoard<'a> {
    pub fn new(catalog: &'a FareCatalog, config: &SearchConfig) -> Self {
        Self {
            catalog,
            offices: county_offices(),
            proximity: ProximityPolicy::new(config.nearest_max_km),
            geolocation_timeout: config.geolocation_timeout,
        }
    }

    pub fn with_offices(mut self, offices: &'a [LabeledPoint]) -> Self {
        self.offices = offices;
        self
    }

    /// Routes of `county` (or the generic table) whose endpoints match `query`.
    pub fn search(&self, county: Option<&str>, query: Option<&str>) -> Vec<&'a FareRoute> {
        let county = county
            .map(str::trim)
            .filter(|county| !county.is_empty())
            .unwrap_or(DEFAULT_COUNTY);
        let criteria = FilterCriteria {
            query: query.map(str::to_string),
            ..FilterCriteria::default()
        };
        filter(self.catalog.for_county(county), &criteria)
    }

    pub fn trending(&self, county: &str) -> Vec<&'a FareRoute> {
        self.catalog.trending(county)
    }

    /// Closest office to `origin` within the configured threshold.
    pub fn office_near(&self, origin: Coordinate) -> Option<(&'a LabeledPoint, f64)> {
        nearest_with_distance(origin, self.offices, self.proximity.max_distance_km())
    }

    /// Locate the user (falling back to Nairobi) and find the office to report to.
    pub async fn report_office<P>(&self, provider: &P) -> OfficeLookup
    where
        P: GeolocationProvider + ?Sized,
    {
        let origin = locate_or_default(provider, self.geolocation_timeout, NAIROBI).await;
        let found = self.office_near(origin.coordinate);

        match found {
            Some((office, distance)) => {
                info!(office = %office.name, distance_km = distance, "nearest office resolved");
            }
            None => {
                info!(
                    max_km = self.proximity.max_distance_km(),
                    "no county office within reach"
                );
            }
        }

        OfficeLookup {
            origin,
            office: found.map(|(office, _)| office.clone()),
            distance_km: found.map(|(_, distance)| distance),
        }
    }
}
