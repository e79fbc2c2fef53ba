use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::CatalogRecord;
use crate::geo::Coordinate;

/// Matatu and boda-boda prices for one route, in Kenyan shillings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareRoute {
    pub county: String,
    pub from: String,
    pub to: String,
    pub matatu: u32,
    pub boda: u32,
    pub duration: String,
    pub trending: bool,
    pub last_updated: String,
}

impl CatalogRecord for FareRoute {
    fn kind(&self) -> Option<&str> {
        None
    }

    fn text_fields(&self) -> Vec<&str> {
        vec![&self.from, &self.to]
    }

    fn location(&self) -> &str {
        &self.county
    }

    fn point(&self) -> Option<Coordinate> {
        None
    }
}

/// Per-county fare tables with a generic table for counties without data.
#[derive(Debug, Clone)]
pub struct FareCatalog {
    counties: Vec<(String, Vec<FareRoute>)>,
    fallback: Vec<FareRoute>,
}

impl FareCatalog {
    pub fn new(counties: Vec<(String, Vec<FareRoute>)>, fallback: Vec<FareRoute>) -> Self {
        Self { counties, fallback }
    }

    pub fn seeded() -> &'static FareCatalog {
        static CATALOG: OnceLock<FareCatalog> = OnceLock::new();
        CATALOG.get_or_init(build_seeded)
    }

    /// Routes for `county`, or the generic table when the county has none.
    pub fn for_county(&self, county: &str) -> &[FareRoute] {
        self.counties
            .iter()
            .find(|(name, _)| name == county)
            .map(|(_, routes)| routes.as_slice())
            .unwrap_or(&self.fallback)
    }

    pub fn has_county(&self, county: &str) -> bool {
        self.counties.iter().any(|(name, _)| name == county)
    }

    /// Counties with dedicated fare tables, in catalog order.
    pub fn counties(&self) -> impl Iterator<Item = &str> {
        self.counties.iter().map(|(name, _)| name.as_str())
    }

    pub fn trending(&self, county: &str) -> Vec<&FareRoute> {
        self.for_county(county)
            .iter()
            .filter(|fare| fare.trending)
            .collect()
    }
}

type SeedFare = (
    &'static str,
    &'static str,
    &'static str,
    u32,
    u32,
    &'static str,
    bool,
    &'static str,
);

fn seed_fare(seed: &SeedFare) -> FareRoute {
    let (county, from, to, matatu, boda, duration, trending, last_updated) = *seed;
    FareRoute {
        county: county.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        matatu,
        boda,
        duration: duration.to_string(),
        trending,
        last_updated: last_updated.to_string(),
    }
}

fn build_seeded() -> FareCatalog {
    let mut counties: Vec<(String, Vec<FareRoute>)> = Vec::new();
    for seed in COUNTY_SEED.iter() {
        let county = seed.0;
        if counties.last().map_or(true, |(name, _)| name != county) {
            counties.push((county.to_string(), Vec::new()));
        }
        if let Some((_, routes)) = counties.last_mut() {
            routes.push(seed_fare(seed));
        }
    }

    let fallback = DEFAULT_SEED
        .iter()
        .map(seed_fare)
        .collect();

    FareCatalog::new(counties, fallback)
}

const DEFAULT_SEED: [SeedFare; 3] = [
    ("default", "Town Center", "CBD", 100, 150, "45 min", true, "5 mins ago"),
    ("default", "Town Center", "Market", 50, 70, "20 min", false, "10 mins ago"),
    ("default", "Town Center", "Hospital", 60, 90, "25 min", false, "15 mins ago"),
];

const COUNTY_SEED: [SeedFare; 114] = [
    ("Nairobi", "CBD", "Westlands", 80, 120, "25 min", true, "5 mins ago"),
    ("Nairobi", "CBD", "Karen", 100, 150, "35 min", true, "8 mins ago"),
    ("Nairobi", "CBD", "Kileleshwa", 70, 110, "20 min", false, "12 mins ago"),
    ("Nairobi", "Westlands", "Karen", 60, 90, "15 min", true, "15 mins ago"),
    ("Nairobi", "CBD", "Rongai", 120, 180, "45 min", false, "18 mins ago"),
    ("Nairobi", "CBD", "Kasarani", 90, 130, "30 min", false, "22 mins ago"),
    ("Nairobi", "CBD", "Eastleigh", 50, 80, "15 min", true, "25 mins ago"),
    ("Nairobi", "CBD", "South B", 70, 100, "25 min", false, "28 mins ago"),
    ("Nairobi", "CBD", "Ngong", 150, 220, "55 min", false, "30 mins ago"),
    ("Nairobi", "CBD", "Thika Road", 60, 90, "20 min", true, "35 mins ago"),
    ("Nairobi", "Juja", "CBD", 100, 150, "40 min", true, "40 mins ago"),
    ("Nairobi", "Thika", "CBD", 120, 180, "50 min", true, "45 mins ago"),
    ("Nairobi", "Limuru", "CBD", 80, 120, "35 min", false, "50 mins ago"),
    ("Nairobi", "Kiambu", "CBD", 70, 100, "30 min", false, "55 mins ago"),
    ("Nairobi", "Ruiru", "CBD", 90, 130, "35 min", false, "1 hour ago"),
    ("Mombasa", "CBD", "Nyali", 50, 80, "20 min", true, "5 mins ago"),
    ("Mombasa", "CBD", "South Coast", 70, 110, "30 min", true, "10 mins ago"),
    ("Mombasa", "CBD", "Kilifi", 200, 300, "1.5 hr", false, "15 mins ago"),
    ("Mombasa", "CBD", "Malindi", 400, 600, "3 hr", false, "20 mins ago"),
    ("Mombasa", "CBD", "Lamu", 800, 1200, "6 hr", false, "25 mins ago"),
    ("Mombasa", "CBD", "Voi", 300, 450, "2.5 hr", false, "30 mins ago"),
    ("Mombasa", "CBD", "Taveta", 350, 520, "3 hr", false, "35 mins ago"),
    ("Mombasa", "Nyali", "South Coast", 60, 90, "25 min", true, "40 mins ago"),
    ("Mombasa", "CBD", "Bamburi", 40, 60, "15 min", false, "45 mins ago"),
    ("Mombasa", "CBD", "Mombasa Road", 30, 50, "10 min", true, "50 mins ago"),
    ("Kisumu", "Town", "Mega City", 40, 60, "15 min", true, "5 mins ago"),
    ("Kisumu", "Town", "Industrial Area", 50, 70, "20 min", false, "10 mins ago"),
    ("Kisumu", "Town", "Kisumu Airport", 80, 120, "35 min", true, "15 mins ago"),
    ("Kisumu", "Town", "Ahero", 60, 90, "25 min", false, "20 mins ago"),
    ("Kisumu", "Town", "Muhoroni", 100, 150, "45 min", false, "25 mins ago"),
    ("Kisumu", "Town", "Nyakach", 120, 180, "50 min", false, "30 mins ago"),
    ("Kisumu", "Mega City", "Industrial Area", 30, 45, "10 min", true, "35 mins ago"),
    ("Kisumu", "Town", "Kondele", 35, 50, "12 min", false, "40 mins ago"),
    ("Nakuru", "Town", "Naivasha", 150, 220, "1 hr", true, "5 mins ago"),
    ("Nakuru", "Town", "Industrial Area", 40, 60, "15 min", false, "10 mins ago"),
    ("Nakuru", "Town", "Gilgil", 100, 150, "45 min", false, "15 mins ago"),
    ("Nakuru", "Town", "Elementaita", 80, 120, "35 min", false, "20 mins ago"),
    ("Nakuru", "Town", "Molo", 120, 180, "50 min", false, "25 mins ago"),
    ("Nakuru", "Naivasha", "Gilgil", 60, 90, "25 min", true, "30 mins ago"),
    ("Eldoret", "Town", "Moi University", 50, 70, "20 min", true, "5 mins ago"),
    ("Eldoret", "Town", "Industrial Area", 40, 60, "15 min", false, "10 mins ago"),
    ("Eldoret", "Town", "Turbo", 80, 120, "35 min", false, "15 mins ago"),
    ("Eldoret", "Town", "Kapsabet", 100, 150, "45 min", false, "20 mins ago"),
    ("Eldoret", "Town", "Kitale", 150, 220, "1 hr", false, "25 mins ago"),
    ("Kakamega", "Town", "Mumias", 120, 180, "50 min", true, "5 mins ago"),
    ("Kakamega", "Town", "Butere", 100, 150, "45 min", false, "10 mins ago"),
    ("Kakamega", "Town", "Webuye", 80, 120, "35 min", false, "15 mins ago"),
    ("Kakamega", "Town", "Malava", 60, 90, "25 min", false, "20 mins ago"),
    ("Meru", "Town", "Maua", 150, 220, "1 hr", true, "5 mins ago"),
    ("Meru", "Town", "Chuka", 120, 180, "50 min", false, "10 mins ago"),
    ("Meru", "Town", "Nkubu", 80, 120, "35 min", false, "15 mins ago"),
    ("Thika", "Town", "CBD", 120, 180, "50 min", true, "5 mins ago"),
    ("Thika", "Town", "Juja", 60, 90, "25 min", false, "10 mins ago"),
    ("Thika", "Town", "Ruiru", 80, 120, "35 min", false, "15 mins ago"),
    ("Machakos", "Town", "CBD", 100, 150, "45 min", true, "5 mins ago"),
    ("Machakos", "Town", "Athi River", 80, 120, "35 min", false, "10 mins ago"),
    ("Machakos", "Town", "Kangundo", 60, 90, "25 min", false, "15 mins ago"),
    ("Kiambu", "Town", "CBD", 70, 100, "30 min", true, "5 mins ago"),
    ("Kiambu", "Town", "Limuru", 50, 70, "20 min", false, "10 mins ago"),
    ("Kiambu", "Town", "Ruiru", 60, 90, "25 min", false, "15 mins ago"),
    ("Murang'a", "Town", "CBD", 120, 180, "50 min", true, "5 mins ago"),
    ("Murang'a", "Town", "Thika", 80, 120, "35 min", false, "10 mins ago"),
    ("Murang'a", "Town", "Kandara", 60, 90, "25 min", false, "15 mins ago"),
    ("Nyeri", "Town", "CBD", 150, 220, "1 hr", true, "5 mins ago"),
    ("Nyeri", "Town", "Nanyuki", 100, 150, "45 min", false, "10 mins ago"),
    ("Nyeri", "Town", "Karatina", 80, 120, "35 min", false, "15 mins ago"),
    ("Kirinyaga", "Town", "CBD", 130, 190, "55 min", true, "5 mins ago"),
    ("Kirinyaga", "Town", "Kerugoya", 60, 90, "25 min", false, "10 mins ago"),
    ("Kirinyaga", "Town", "Sagana", 80, 120, "35 min", false, "15 mins ago"),
    ("Embu", "Town", "CBD", 140, 210, "1 hr", true, "5 mins ago"),
    ("Embu", "Town", "Runyenjes", 100, 150, "45 min", false, "10 mins ago"),
    ("Embu", "Town", "Siakago", 80, 120, "35 min", false, "15 mins ago"),
    ("Kitui", "Town", "CBD", 160, 240, "1.5 hr", true, "5 mins ago"),
    ("Kitui", "Town", "Mwingi", 120, 180, "50 min", false, "10 mins ago"),
    ("Kitui", "Town", "Mutomo", 100, 150, "45 min", false, "15 mins ago"),
    ("Narok", "Town", "CBD", 180, 270, "2 hr", true, "5 mins ago"),
    ("Narok", "Town", "Kilgoris", 120, 180, "50 min", false, "10 mins ago"),
    ("Narok", "Town", "Ololulung'a", 100, 150, "45 min", false, "15 mins ago"),
    ("Kajiado", "Town", "CBD", 170, 250, "1.5 hr", true, "5 mins ago"),
    ("Kajiado", "Town", "Ngong", 80, 120, "35 min", false, "10 mins ago"),
    ("Kajiado", "Town", "Kitengela", 100, 150, "45 min", false, "15 mins ago"),
    ("Kericho", "Town", "CBD", 200, 300, "2.5 hr", true, "5 mins ago"),
    ("Kericho", "Town", "Kipkelion", 80, 120, "35 min", false, "10 mins ago"),
    ("Kericho", "Town", "Londiani", 100, 150, "45 min", false, "15 mins ago"),
    ("Bomet", "Town", "CBD", 190, 280, "2 hr", true, "5 mins ago"),
    ("Bomet", "Town", "Sotik", 80, 120, "35 min", false, "10 mins ago"),
    ("Bomet", "Town", "Chepalungu", 100, 150, "45 min", false, "15 mins ago"),
    ("Homa Bay", "Town", "CBD", 220, 330, "3 hr", true, "5 mins ago"),
    ("Homa Bay", "Town", "Mbita", 80, 120, "35 min", false, "10 mins ago"),
    ("Homa Bay", "Town", "Ndhiwa", 100, 150, "45 min", false, "15 mins ago"),
    ("Migori", "Town", "CBD", 210, 310, "2.5 hr", true, "5 mins ago"),
    ("Migori", "Town", "Isebania", 120, 180, "50 min", false, "10 mins ago"),
    ("Migori", "Town", "Kehancha", 100, 150, "45 min", false, "15 mins ago"),
    ("Kisii", "Town", "CBD", 230, 340, "3 hr", true, "5 mins ago"),
    ("Kisii", "Town", "Keroka", 80, 120, "35 min", false, "10 mins ago"),
    ("Kisii", "Town", "Nyamache", 100, 150, "45 min", false, "15 mins ago"),
    ("Nyamira", "Town", "CBD", 240, 360, "3.5 hr", true, "5 mins ago"),
    ("Nyamira", "Town", "Manga", 80, 120, "35 min", false, "10 mins ago"),
    ("Nyamira", "Town", "Nyansiongo", 100, 150, "45 min", false, "15 mins ago"),
    ("Taita Taveta", "Voi", "CBD", 300, 450, "4 hr", true, "5 mins ago"),
    ("Taita Taveta", "Voi", "Taveta", 80, 120, "35 min", false, "10 mins ago"),
    ("Taita Taveta", "Voi", "Mwatate", 100, 150, "45 min", false, "15 mins ago"),
    ("Kwale", "Ukunda", "CBD", 80, 120, "35 min", true, "5 mins ago"),
    ("Kwale", "Ukunda", "Diani", 60, 90, "25 min", false, "10 mins ago"),
    ("Kwale", "Ukunda", "Lunga Lunga", 100, 150, "45 min", false, "15 mins ago"),
    ("Kilifi", "Town", "CBD", 250, 370, "3.5 hr", true, "5 mins ago"),
    ("Kilifi", "Town", "Malindi", 120, 180, "50 min", false, "10 mins ago"),
    ("Kilifi", "Town", "Watamu", 100, 150, "45 min", false, "15 mins ago"),
    ("Tana River", "Hola", "CBD", 350, 520, "5 hr", true, "5 mins ago"),
    ("Tana River", "Hola", "Garsen", 80, 120, "35 min", false, "10 mins ago"),
    ("Tana River", "Hola", "Kipini", 100, 150, "45 min", false, "15 mins ago"),
    ("Lamu", "Town", "CBD", 800, 1200, "12 hr", true, "5 mins ago"),
    ("Lamu", "Town", "Hindi", 80, 120, "35 min", false, "10 mins ago"),
    ("Lamu", "Town", "Kiunga", 100, 150, "45 min", false, "15 mins ago"),
];
