use serde::{Deserialize, Serialize};

use super::{distance_km, Coordinate};

const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// A named location, optionally tagged with the county it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub name: String,
    pub coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl LabeledPoint {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Distance threshold beyond which the closest entry no longer counts as a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityPolicy {
    max_distance_km: f64,
}

impl ProximityPolicy {
    pub fn new(max_distance_km: f64) -> Self {
        let sanitized = if max_distance_km.is_finite() && max_distance_km >= 0.0 {
            max_distance_km
        } else {
            DEFAULT_MAX_DISTANCE_KM
        };

        Self {
            max_distance_km: sanitized,
        }
    }

    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    pub fn nearest<'a>(
        &self,
        origin: Coordinate,
        catalog: &'a [LabeledPoint],
    ) -> Option<&'a LabeledPoint> {
        nearest(origin, catalog, self.max_distance_km)
    }
}

impl Default for ProximityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE_KM)
    }
}

/// Closest catalog entry within `max_distance_km`, together with its distance.
///
/// Ties keep the earliest entry. Entries whose distance is NaN never win.
pub fn nearest_with_distance(
    origin: Coordinate,
    catalog: &[LabeledPoint],
    max_distance_km: f64,
) -> Option<(&LabeledPoint, f64)> {
    let mut best: Option<(&LabeledPoint, f64)> = None;

    for point in catalog {
        let distance = distance_km(origin, point.coordinate);
        let closer = match best {
            Some((_, min)) => distance < min,
            None => !distance.is_nan(),
        };
        if closer {
            best = Some((point, distance));
        }
    }

    best.filter(|(_, distance)| *distance <= max_distance_km)
}

/// Closest catalog entry within `max_distance_km`, or `None`.
pub fn nearest(
    origin: Coordinate,
    catalog: &[LabeledPoint],
    max_distance_km: f64,
) -> Option<&LabeledPoint> {
    nearest_with_distance(origin, catalog, max_distance_km).map(|(point, _)| point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offices() -> Vec<LabeledPoint> {
        vec![
            LabeledPoint::new("Nairobi Office", Coordinate::new(-1.2864, 36.8172)),
            LabeledPoint::new("Kisumu Office", Coordinate::new(-0.0917, 34.7679)),
        ]
    }

    #[test]
    fn empty_catalog_has_no_match() {
        assert!(nearest(Coordinate::new(-1.28, 36.82), &[], f64::INFINITY).is_none());
    }

    #[test]
    fn picks_nairobi_for_nearby_origin() {
        let catalog = offices();
        let found = nearest(Coordinate::new(-1.28, 36.82), &catalog, 50.0).expect("match");
        assert_eq!(found.name, "Nairobi Office");
    }

    #[test]
    fn far_origin_yields_none() {
        let catalog = offices();
        assert!(nearest(Coordinate::new(10.0, 10.0), &catalog, 50.0).is_none());
    }

    #[test]
    fn ties_resolve_to_first_entry() {
        let spot = Coordinate::new(-1.0, 36.0);
        let catalog = vec![
            LabeledPoint::new("first", spot),
            LabeledPoint::new("second", spot),
        ];
        let found = nearest(spot, &catalog, 1.0).expect("match");
        assert_eq!(found.name, "first");
    }

    #[test]
    fn match_is_within_radius_and_no_entry_is_closer() {
        let catalog = offices();
        let origin = Coordinate::new(-0.5, 35.0);
        let radius = 200.0;
        let (found, distance) =
            nearest_with_distance(origin, &catalog, radius).expect("within radius");
        assert!(distance <= radius);
        for other in &catalog {
            assert!(distance_km(origin, other.coordinate) >= distance);
        }
        assert_eq!(found.name, "Kisumu Office");
    }

    #[test]
    fn threshold_equal_to_distance_still_matches() {
        let catalog = offices();
        let origin = Coordinate::new(-1.0, 36.5);
        let exact = distance_km(origin, catalog[0].coordinate);

        let (found, distance) =
            nearest_with_distance(origin, &catalog, exact).expect("boundary counts as inside");
        assert_eq!(found.name, "Nairobi Office");
        assert_eq!(distance, exact);

        assert!(nearest_with_distance(origin, &catalog, exact * 0.999).is_none());
    }

    #[test]
    fn policy_sanitizes_invalid_threshold() {
        assert_eq!(ProximityPolicy::new(f64::NAN).max_distance_km(), 50.0);
        assert_eq!(ProximityPolicy::new(-3.0).max_distance_km(), 50.0);
        assert_eq!(ProximityPolicy::new(12.5).max_distance_km(), 12.5);
    }

    #[test]
    fn wider_policy_reaches_distant_office() {
        let catalog = offices();
        let origin = Coordinate::new(-0.6, 35.3);
        assert!(ProximityPolicy::default().nearest(origin, &catalog).is_none());
        let wide = ProximityPolicy::new(150.0);
        assert_eq!(
            wide.nearest(origin, &catalog).map(|point| point.name.as_str()),
            Some("Kisumu Office")
        );
    }
}
