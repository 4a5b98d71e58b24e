//! Distance strategies shared by candidate pruning and model building.
//!
//! A run uses exactly one [`DistanceMetric`]. The value is passed explicitly
//! to every stage that compares centres so pruning and the disjointness rows
//! always agree on what "distance" means.

mod euclidean;
mod haversine;

use core::{fmt, str::FromStr};

use thiserror::Error;

use crate::disk::Point;

pub use self::euclidean::squared_euclidean;
pub use self::haversine::{EARTH_RADIUS_METRES, haversine};

/// Selects how centre-to-centre distances are computed.
///
/// The planar variant deliberately returns the *squared* Euclidean distance:
/// it is monotonic in true distance and avoids a square root. Radii are
/// compared against this quantity as-is.
///
/// # Examples
/// ```
/// use diskmerge_core::{DistanceMetric, Point};
///
/// let metric = DistanceMetric::default();
/// let d = metric.distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
/// assert_eq!(d, 25.0);
/// assert_eq!("haversine".parse::<DistanceMetric>()?, DistanceMetric::Haversine);
/// # Ok::<(), diskmerge_core::UnknownMetric>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DistanceMetric {
    /// Planar squared Euclidean distance.
    #[default]
    SquaredEuclidean,
    /// Great-circle arc length in metres between `(latitude, longitude)`
    /// pairs given in degrees.
    Haversine,
}

impl DistanceMetric {
    /// Computes the distance between `a` and `b` under this metric.
    #[must_use]
    pub fn distance(self, a: Point, b: Point) -> f64 {
        match self {
            Self::SquaredEuclidean => squared_euclidean(a, b),
            Self::Haversine => haversine(a, b),
        }
    }

    /// Returns the label used by the CLI and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SquaredEuclidean => "planar",
            Self::Haversine => "haversine",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised metric label.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown distance metric `{0}`; expected `planar` or `haversine`")]
pub struct UnknownMetric(pub String);

impl FromStr for DistanceMetric {
    type Err = UnknownMetric;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "planar" | "euclidean" | "squared-euclidean" => Ok(Self::SquaredEuclidean),
            "haversine" | "geographic" => Ok(Self::Haversine),
            other => Err(UnknownMetric(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("planar", DistanceMetric::SquaredEuclidean)]
    #[case(" Euclidean ", DistanceMetric::SquaredEuclidean)]
    #[case("HAVERSINE", DistanceMetric::Haversine)]
    #[case("geographic", DistanceMetric::Haversine)]
    fn parses_labels(#[case] raw: &str, #[case] expected: DistanceMetric) {
        assert_eq!(raw.parse::<DistanceMetric>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_labels() {
        let err = "manhattan"
            .parse::<DistanceMetric>()
            .expect_err("manhattan is not supported");
        assert_eq!(err, UnknownMetric("manhattan".to_owned()));
    }

    #[rstest]
    #[case(DistanceMetric::SquaredEuclidean)]
    #[case(DistanceMetric::Haversine)]
    fn display_round_trips(#[case] metric: DistanceMetric) {
        assert_eq!(metric.to_string().parse::<DistanceMetric>(), Ok(metric));
    }
}
