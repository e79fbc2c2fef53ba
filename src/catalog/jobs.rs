use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer, Serialize};

use super::CatalogRecord;
use crate::geo::Coordinate;

/// A casual-work listing shown on the job board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    /// "Town, Area" label, e.g. "Nairobi, CBD".
    pub location: String,
    pub pay: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub posted: String,
    pub urgent: bool,
    pub coordinate: Coordinate,
}

impl CatalogRecord for JobListing {
    fn kind(&self) -> Option<&str> {
        Some(&self.kind)
    }

    fn text_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description, &self.location]
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn point(&self) -> Option<Coordinate> {
        Some(self.coordinate)
    }
}

#[derive(Debug)]
pub enum JobCatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidCoordinate { title: String },
}

impl std::fmt::Display for JobCatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobCatalogImportError::Io(err) => write!(f, "failed to read job export: {}", err),
            JobCatalogImportError::Csv(err) => write!(f, "invalid job CSV data: {}", err),
            JobCatalogImportError::InvalidCoordinate { title } => {
                write!(f, "listing '{}' has an out-of-range coordinate", title)
            }
        }
    }
}

impl std::error::Error for JobCatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobCatalogImportError::Io(err) => Some(err),
            JobCatalogImportError::Csv(err) => Some(err),
            JobCatalogImportError::InvalidCoordinate { .. } => None,
        }
    }
}

impl From<std::io::Error> for JobCatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for JobCatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Ordered, immutable collection of job listings.
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    listings: Vec<JobListing>,
}

impl JobCatalog {
    pub fn new(listings: Vec<JobListing>) -> Self {
        Self { listings }
    }

    /// Listings the board ships with.
    pub fn seeded() -> &'static JobCatalog {
        static CATALOG: OnceLock<JobCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| JobCatalog::new(SEED.iter().map(seed_listing).collect()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, JobCatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load listings from a CSV export with
    /// `title,location,pay,type,description,posted,urgent,lat,lng` columns.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, JobCatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut listings = Vec::new();

        for row in csv_reader.deserialize::<JobRow>() {
            let row = row?;
            let coordinate = Coordinate::new(row.lat, row.lng);
            if !coordinate.is_valid() {
                return Err(JobCatalogImportError::InvalidCoordinate { title: row.title });
            }

            listings.push(JobListing {
                title: row.title,
                location: row.location,
                pay: row.pay,
                kind: row.kind,
                description: row.description.unwrap_or_default(),
                posted: row.posted.unwrap_or_default(),
                urgent: row.urgent,
                coordinate,
            });
        }

        Ok(Self { listings })
    }

    pub fn listings(&self) -> &[JobListing] {
        &self.listings
    }

    pub fn urgent(&self) -> Vec<&JobListing> {
        self.listings.iter().filter(|job| job.urgent).collect()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct JobRow {
    title: String,
    location: String,
    pay: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    posted: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    urgent: bool,
    lat: f64,
    lng: f64,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1" | "y"
    ))
}

type SeedListing = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    bool,
    f64,
    f64,
);

fn seed_listing(seed: &SeedListing) -> JobListing {
    let (title, location, pay, kind, description, posted, urgent, lat, lng) = *seed;
    JobListing {
        title: title.to_string(),
        location: location.to_string(),
        pay: pay.to_string(),
        kind: kind.to_string(),
        description: description.to_string(),
        posted: posted.to_string(),
        urgent,
        coordinate: Coordinate::new(lat, lng),
    }
}

#[rustfmt::skip]
const SEED: [SeedListing; 17] = [
    ("Boda Boda Rider Needed", "Nairobi, CBD", "Ksh 1,500/day", "Transport", "Need experienced boda rider for deliveries around CBD area. Must have own bike.", "2 hours ago", true, -1.2864, 36.8172),
    ("Waiter/Waitress", "Nairobi, Westlands", "Ksh 800/day", "Hospitality", "Busy restaurant needs servers for evening shifts. Experience preferred.", "3 hours ago", false, -1.2630, 36.8065),
    ("Security Guard", "Nairobi, Karen", "Ksh 18,000/month", "Security", "Night shift security guard needed for residential area. Experience required.", "1 day ago", false, -1.3167, 36.7833),
    ("House Help", "Nairobi, Kileleshwa", "Ksh 15,000/month", "Domestic", "Live-in house help needed for family of 4. Must be trustworthy and hardworking.", "2 days ago", false, -1.2833, 36.7833),
    ("Cleaner", "Nairobi, CBD", "Ksh 600/day", "Cleaning", "Office cleaning position available. No experience needed, training provided.", "4 hours ago", true, -1.2864, 36.8172),
    ("Construction Workers", "Kisumu, Town", "Ksh 800/day", "Mjengo", "Building project needs 5 workers for 2 weeks. Accommodation provided.", "4 hours ago", false, -0.0917, 34.7679),
    ("Shop Attendant", "Kisumu, Mega City", "Ksh 700/day", "Retail", "Supermarket needs sales attendants. Customer service experience preferred.", "6 hours ago", false, -0.0917, 34.7679),
    ("Mechanic", "Kisumu, Industrial Area", "Ksh 1,200/day", "Technical", "Experienced vehicle mechanic needed for busy garage.", "1 day ago", false, -0.0917, 34.7679),
    ("Delivery Driver", "Mombasa, Nyali", "Ksh 2,000/day", "Driving", "Need driver with valid license for local deliveries. Fuel provided.", "5 hours ago", false, -4.0435, 39.6682),
    ("Beach Vendor", "Mombasa, South Coast", "Ksh 1,000/day", "Sales", "Sell souvenirs and refreshments at popular beach. Commission based.", "3 hours ago", true, -4.0435, 39.6682),
    ("Hotel Housekeeper", "Mombasa, Kilifi", "Ksh 900/day", "Hospitality", "Beach resort needs housekeeping staff. Accommodation available.", "8 hours ago", false, -3.6305, 39.8499),
    ("Farm Workers", "Nakuru, Naivasha", "Ksh 600/day", "Farming", "Flower farm needs casual workers for harvesting. Transport provided.", "3 hours ago", true, -0.3031, 36.0800),
    ("Warehouse Assistant", "Nakuru, Industrial Area", "Ksh 750/day", "Logistics", "Loading and unloading goods in warehouse. Physical fitness required.", "5 hours ago", false, -0.3031, 36.0800),
    ("University Cleaner", "Eldoret, Moi University", "Ksh 650/day", "Cleaning", "Campus cleaning position. Regular hours, benefits included.", "1 day ago", false, 0.5143, 35.2698),
    ("Car Wash Attendant", "Eldoret, Town", "Ksh 500/day", "Services", "Car wash business needs attendants. Tips available.", "6 hours ago", false, 0.5143, 35.2698),
    ("Road Construction Worker", "Thika, Bypass", "Ksh 850/day", "Mjengo", "Highway construction project. Safety gear provided.", "2 hours ago", true, -1.0388, 37.0834),
    ("Barista", "Meru, Town", "Ksh 900/day", "Hospitality", "Coffee shop needs experienced barista. Training available.", "4 hours ago", false, 0.0476, 37.6459),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_keeps_source_order() {
        let catalog = JobCatalog::seeded();
        assert_eq!(catalog.len(), 17);
        assert_eq!(catalog.listings()[0].title, "Boda Boda Rider Needed");
        assert_eq!(catalog.listings()[16].title, "Barista");
    }

    #[test]
    fn urgent_view_lists_flagged_jobs() {
        let urgent: Vec<_> = JobCatalog::seeded()
            .urgent()
            .into_iter()
            .map(|job| job.title.as_str())
            .collect();
        assert_eq!(
            urgent,
            vec![
                "Boda Boda Rider Needed",
                "Cleaner",
                "Beach Vendor",
                "Farm Workers",
                "Road Construction Worker"
            ]
        );
    }

    #[test]
    fn imports_listings_from_csv() {
        let csv = "title,location,pay,type,description,posted,urgent,lat,lng\n\
                   Tout,\"Nairobi, CBD\",Ksh 700/day,Transport,,just now,yes,-1.2864,36.8172\n\
                   Porter,\"Kisumu, Town\",Ksh 500/day,Logistics,Carry goods,,,-0.0917,34.7679\n";
        let catalog = JobCatalog::from_reader(csv.as_bytes()).expect("csv parses");
        assert_eq!(catalog.len(), 2);
        let tout = &catalog.listings()[0];
        assert_eq!(tout.location, "Nairobi, CBD");
        assert!(tout.urgent);
        assert_eq!(tout.description, "");
        assert!(!catalog.listings()[1].urgent);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let csv = "title,location,pay,type,description,posted,urgent,lat,lng\n\
                   Ghost,Nowhere,0,Misc,,,,95.0,10.0\n";
        let err = JobCatalog::from_reader(csv.as_bytes()).expect_err("invalid coordinate");
        assert!(matches!(err, JobCatalogImportError::InvalidCoordinate { .. }));
    }
}
