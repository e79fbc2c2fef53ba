//! Great-circle distance and the lookups built on it.

pub mod locate;
pub mod nearest;
pub mod regions;

use serde::{Deserialize, Serialize};

pub use locate::{
    locate_or_default, GeolocationError, GeolocationProvider, LivenessFlag, Located,
    PositionSource, ReportedPosition,
};
pub use nearest::{nearest, nearest_with_distance, LabeledPoint, ProximityPolicy};
pub use regions::{county_offices, resolve_county};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components sit inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Nairobi CBD, used whenever a device position is unavailable.
pub const NAIROBI: Coordinate = Coordinate::new(-1.2864, 36.8172);

fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Haversine distance in kilometres. NaN inputs propagate.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let d_lat = deg_to_rad(b.lat - a.lat);
    let d_lng = deg_to_rad(b.lng - a.lng);
    let h = (d_lat / 2.0).sin().powi(2)
        + deg_to_rad(a.lat).cos() * deg_to_rad(b.lat).cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
