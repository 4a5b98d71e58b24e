//! Disk primitives consumed by the merge pipeline.

use std::ops::Index;

use crate::error::{Coordinate, DiskSetError};

/// A centre coordinate pair.
///
/// The meaning of the coordinates depends on the active
/// [`crate::DistanceMetric`]: planar `(x, y)` for
/// [`crate::DistanceMetric::SquaredEuclidean`], `(latitude, longitude)` in
/// degrees for [`crate::DistanceMetric::Haversine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// First coordinate.
    pub x: f64,
    /// Second coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point from its two coordinates.
    #[must_use]
    #[rustfmt::skip]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// A circular region described by its centre and radius.
///
/// # Examples
/// ```
/// use diskmerge_core::{Disk, Point};
///
/// let disk = Disk::new(Point::new(1.0, 2.0), 3.0);
/// assert_eq!(disk.centre(), Point::new(1.0, 2.0));
/// assert_eq!(disk.radius(), 3.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disk {
    centre: Point,
    radius: f64,
}

impl Disk {
    /// Creates a disk. Validation happens when the disk joins a [`DiskSet`].
    #[must_use]
    #[rustfmt::skip]
    pub const fn new(centre: Point, radius: f64) -> Self { Self { centre, radius } }

    /// Returns the centre of the disk.
    #[must_use]
    #[rustfmt::skip]
    pub const fn centre(&self) -> Point { self.centre }

    /// Returns the radius of the disk.
    #[must_use]
    #[rustfmt::skip]
    pub const fn radius(&self) -> f64 { self.radius }

    fn validate(&self, index: usize) -> Result<(), DiskSetError> {
        for (which, value) in [(Coordinate::X, self.centre.x), (Coordinate::Y, self.centre.y)] {
            if !value.is_finite() {
                return Err(DiskSetError::NonFiniteCoordinate {
                    index,
                    which,
                    value,
                });
            }
        }
        if !self.radius.is_finite() {
            return Err(DiskSetError::NonFiniteRadius {
                index,
                value: self.radius,
            });
        }
        if self.radius < 0.0 {
            return Err(DiskSetError::NegativeRadius {
                index,
                value: self.radius,
            });
        }
        Ok(())
    }
}

/// Immutable, index-ordered collection of validated disks.
///
/// A disk's position in the set is its identity throughout the pipeline.
///
/// # Examples
/// ```
/// use diskmerge_core::{Disk, DiskSet, Point};
///
/// let set = DiskSet::new(
///     "demo",
///     vec![
///         Disk::new(Point::new(0.0, 0.0), 1.0),
///         Disk::new(Point::new(5.0, 0.0), 2.0),
///     ],
/// )?;
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.name(), "demo");
/// assert_eq!(set[1].radius(), 2.0);
/// # Ok::<(), diskmerge_core::DiskSetError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DiskSet {
    name: String,
    disks: Vec<Disk>,
}

impl DiskSet {
    /// Validates `disks` and wraps them in a named set.
    ///
    /// # Errors
    /// Returns [`DiskSetError::NonFiniteCoordinate`] or
    /// [`DiskSetError::NonFiniteRadius`] when a value is NaN or infinite and
    /// [`DiskSetError::NegativeRadius`] when a radius is below zero. The first
    /// offending disk is reported.
    pub fn new(name: impl Into<String>, disks: Vec<Disk>) -> Result<Self, DiskSetError> {
        for (index, disk) in disks.iter().enumerate() {
            disk.validate(index)?;
        }
        Ok(Self {
            name: name.into(),
            disks,
        })
    }

    /// Builds a set from `(x, y, radius)` triples.
    ///
    /// # Errors
    /// Propagates the validation errors of [`DiskSet::new`].
    pub fn from_triples(
        name: impl Into<String>,
        triples: impl IntoIterator<Item = (f64, f64, f64)>,
    ) -> Result<Self, DiskSetError> {
        let disks = triples
            .into_iter()
            .map(|(x, y, radius)| Disk::new(Point::new(x, y), radius))
            .collect();
        Self::new(name, disks)
    }

    /// Returns the human-readable name of the set.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of disks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.disks.len()
    }

    /// Returns whether the set holds no disks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Returns the disks in input order.
    #[must_use]
    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    /// Returns the radius of disk `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of bounds.
    #[must_use]
    pub fn radius(&self, index: usize) -> f64 {
        self.disks[index].radius
    }

    /// Returns the centre of disk `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of bounds.
    #[must_use]
    pub fn centre(&self, index: usize) -> Point {
        self.disks[index].centre
    }

    /// Returns the sum of all radii.
    #[must_use]
    pub fn total_radius(&self) -> f64 {
        self.disks.iter().map(Disk::radius).sum()
    }
}

impl Index<usize> for DiskSet {
    type Output = Disk;

    fn index(&self, index: usize) -> &Self::Output {
        &self.disks[index]
    }
}
