use std::sync::OnceLock;

use super::{Coordinate, LabeledPoint};

/// Inclusive latitude/longitude box approximating a county's urban core.
struct CountyBounds {
    county: &'static str,
    lat: (f64, f64),
    lng: (f64, f64),
}

impl CountyBounds {
    fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.lat.0
            && point.lat <= self.lat.1
            && point.lng >= self.lng.0
            && point.lng <= self.lng.1
    }
}

const COUNTY_BOUNDS: [CountyBounds; 5] = [
    CountyBounds {
        county: "Nairobi",
        lat: (-1.5, -1.0),
        lng: (36.5, 37.0),
    },
    CountyBounds {
        county: "Kisumu",
        lat: (-0.2, 0.0),
        lng: (34.5, 35.0),
    },
    CountyBounds {
        county: "Mombasa",
        lat: (-4.2, -3.8),
        lng: (39.4, 39.8),
    },
    CountyBounds {
        county: "Nakuru",
        lat: (-0.4, -0.2),
        lng: (35.8, 36.2),
    },
    CountyBounds {
        county: "Uasin Gishu",
        lat: (0.4, 0.6),
        lng: (35.1, 35.4),
    },
];

/// County whose box contains `point`, checked in a fixed order.
pub fn resolve_county(point: Coordinate) -> Option<&'static str> {
    COUNTY_BOUNDS
        .iter()
        .find(|bounds| bounds.contains(point))
        .map(|bounds| bounds.county)
}

const OFFICES: [(&str, f64, f64, &str); 8] = [
    ("Nairobi County Council", -1.2864, 36.8172, "Nairobi"),
    ("Mombasa County Council", -4.0435, 39.6682, "Mombasa"),
    ("Kisumu County Council", -0.0917, 34.7679, "Kisumu"),
    ("Nakuru County Council", -0.3031, 36.0800, "Nakuru"),
    ("Eldoret County Council", 0.5143, 35.2698, "Uasin Gishu"),
    ("Thika County Council", -1.0388, 37.0834, "Kiambu"),
    ("Kakamega County Council", 0.2827, 34.7519, "Kakamega"),
    ("Meru County Council", 0.0476, 37.6459, "Meru"),
];

/// County council offices that accept fare complaints.
pub fn county_offices() -> &'static [LabeledPoint] {
    static CATALOG: OnceLock<Vec<LabeledPoint>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        OFFICES
            .iter()
            .map(|(name, lat, lng, county)| {
                LabeledPoint::new(*name, Coordinate::new(*lat, *lng)).with_region(*county)
            })
            .collect()
    })
}
