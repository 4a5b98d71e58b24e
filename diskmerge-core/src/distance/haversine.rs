use crate::disk::Point;

/// Mean earth radius, in metres, used by [`haversine`].
pub const EARTH_RADIUS_METRES: f64 = 6_371_230.0;

/// Computes the great-circle distance in metres between two
/// `(latitude, longitude)` points expressed in degrees.
///
/// # Examples
///
/// ```
/// use diskmerge_core::{EARTH_RADIUS_METRES, Point, haversine};
///
/// let quarter = haversine(Point::new(0.0, 0.0), Point::new(0.0, 90.0));
/// let expected = EARTH_RADIUS_METRES * std::f64::consts::FRAC_PI_2;
/// assert!((quarter - expected).abs() < 1e-6);
/// ```
#[must_use]
pub fn haversine(a: Point, b: Point) -> f64 {
    let lat1 = a.x.to_radians();
    let lon1 = a.y.to_radians();
    let lat2 = b.x.to_radians();
    let lon2 = b.y.to_radians();
    let v = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    // Rounding can push `v` just past 1 for antipodal points.
    let v = v.clamp(0.0, 1.0);
    (EARTH_RADIUS_METRES * 2.0 * v.sqrt().atan2((1.0 - v).sqrt())).abs()
}
