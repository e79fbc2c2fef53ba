use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::Coordinate;

/// Failure modes of a device position request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("position permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    Unavailable(String),
    #[error("position request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("device reported an out-of-range coordinate")]
    OutOfRange,
}

/// Source of the user's current position (browser, device, or request payload).
pub trait GeolocationProvider: Send + Sync {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// Position supplied up front, typically by the HTTP client.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportedPosition(pub Option<Coordinate>);

impl GeolocationProvider for ReportedPosition {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send {
        let reported = self.0;
        async move {
            reported.ok_or_else(|| GeolocationError::Unavailable("no position reported".into()))
        }
    }
}

/// Where a resolved position came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum PositionSource {
    Device,
    Fallback(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Located {
    pub coordinate: Coordinate,
    pub source: PositionSource,
}

impl Located {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, PositionSource::Fallback(_))
    }
}

/// Ask the provider for a position, falling back to `fallback` on failure or timeout.
pub async fn locate_or_default<P>(provider: &P, timeout: Duration, fallback: Coordinate) -> Located
where
    P: GeolocationProvider + ?Sized,
{
    let outcome = match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(Ok(coordinate)) if coordinate.is_valid() => Ok(coordinate),
        Ok(Ok(_)) => Err(GeolocationError::OutOfRange),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(GeolocationError::TimedOut(timeout)),
    };

    match outcome {
        Ok(coordinate) => {
            debug!(lat = coordinate.lat, lng = coordinate.lng, "device position resolved");
            Located {
                coordinate,
                source: PositionSource::Device,
            }
        }
        Err(err) => {
            warn!(error = %err, "falling back to default position");
            Located {
                coordinate: fallback,
                source: PositionSource::Fallback(err.to_string()),
            }
        }
    }
}

/// Tracks whether the view that requested a position is still open.
///
/// Late geolocation callbacks check the flag and drop their result once the
/// view has closed.
#[derive(Debug, Clone)]
pub struct LivenessFlag {
    live: Arc<AtomicBool>,
}

impl LivenessFlag {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn close(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Hands `value` through only while the view is still open.
    pub fn deliver<T>(&self, value: T) -> Option<T> {
        if self.is_live() {
            Some(value)
        } else {
            debug!("discarding result delivered after close");
            None
        }
    }
}

impl Default for LivenessFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::NAIROBI;

    struct NeverResponds;

    impl GeolocationProvider for NeverResponds {
        fn current_position(
            &self,
        ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send {
            std::future::pending()
        }
    }

    struct Denied;

    impl GeolocationProvider for Denied {
        fn current_position(
            &self,
        ) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send {
            std::future::ready(Err(GeolocationError::PermissionDenied))
        }
    }

    #[tokio::test]
    async fn reported_position_is_used_when_present() {
        let kisumu = Coordinate::new(-0.0917, 34.7679);
        let located =
            locate_or_default(&ReportedPosition(Some(kisumu)), Duration::from_secs(1), NAIROBI)
                .await;
        assert_eq!(located.coordinate, kisumu);
        assert_eq!(located.source, PositionSource::Device);
    }

    #[tokio::test]
    async fn denied_request_falls_back() {
        let located = locate_or_default(&Denied, Duration::from_secs(1), NAIROBI).await;
        assert_eq!(located.coordinate, NAIROBI);
        assert!(located.is_fallback());
    }

    #[tokio::test]
    async fn hanging_prompt_times_out() {
        let located = locate_or_default(&NeverResponds, Duration::from_millis(10), NAIROBI).await;
        assert_eq!(located.coordinate, NAIROBI);
        match located.source {
            PositionSource::Fallback(reason) => assert!(reason.contains("timed out")),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn out_of_range_position_is_rejected() {
        let bogus = ReportedPosition(Some(Coordinate::new(120.0, 0.0)));
        let located = locate_or_default(&bogus, Duration::from_secs(1), NAIROBI).await;
        assert!(located.is_fallback());
    }

    #[test]
    fn closed_flag_discards_late_results() {
        let flag = LivenessFlag::new();
        assert_eq!(flag.deliver(1), Some(1));
        let shared = flag.clone();
        shared.close();
        assert!(!flag.is_live());
        assert_eq!(flag.deliver(2), None);
    }
}
