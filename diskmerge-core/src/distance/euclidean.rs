use crate::disk::Point;

/// Computes the squared Euclidean distance between two planar points.
///
/// # Examples
///
/// ```
/// use diskmerge_core::{Point, squared_euclidean};
///
/// assert_eq!(squared_euclidean(Point::new(1.0, 1.0), Point::new(4.0, 5.0)), 25.0);
/// ```
#[must_use]
pub fn squared_euclidean(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
