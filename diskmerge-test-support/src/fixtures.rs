//! Disk fixtures shared by the core, provider and CLI suites.
//!
//! Every fixture is a list of `(x, y, radius)` triples in input order.

use proptest::prelude::*;

/// Two far-apart disks; nothing merges.
pub const SEPARATED_PAIR: [(f64, f64, f64); 2] = [(0.0, 0.0, 1.0), (10.0, 0.0, 1.0)];

/// Two disks sharing a centre; one absorbs the other.
pub const COINCIDENT_PAIR: [(f64, f64, f64); 2] = [(0.0, 0.0, 1.0), (0.0, 0.0, 1.0)];

/// Two large disks one degree of latitude apart.
pub const GEOGRAPHIC_PAIR: [(f64, f64, f64); 2] = [(0.0, 0.0, 50.0), (1.0, 0.0, 50.0)];

/// Three unit disks spaced three units apart on a line; nothing merges.
pub const SPACED_LINE: [(f64, f64, f64); 3] = [(0.0, 0.0, 1.0), (3.0, 0.0, 1.0), (6.0, 0.0, 1.0)];

/// Three radius-2 disks on a line one unit apart. The middle disk merges into
/// one end and both ends survive.
pub const OVERLAPPING_LINE: [(f64, f64, f64); 3] =
    [(0.0, 0.0, 2.0), (1.0, 0.0, 2.0), (2.0, 0.0, 2.0)];

/// A large disk, a small satellite inside its reach, and a distant outlier.
/// The only optimum merges the satellite into the large disk.
pub const ABSORBED_SATELLITE: [(f64, f64, f64); 3] =
    [(0.0, 0.0, 2.0), (1.0, 0.0, 0.5), (10.0, 0.0, 1.0)];

/// Renders triples the way the text provider reads them.
///
/// # Examples
/// ```
/// use diskmerge_test_support::fixtures::{SEPARATED_PAIR, to_text};
///
/// assert_eq!(to_text(&SEPARATED_PAIR), "0 0 1\n10 0 1\n");
/// ```
#[must_use]
pub fn to_text(triples: &[(f64, f64, f64)]) -> String {
    triples
        .iter()
        .map(|(x, y, radius)| format!("{x} {y} {radius}\n"))
        .collect()
}

/// Generates small instances on an integer grid with integer radii.
///
/// Integral inputs keep squared distances exact, so solver output can be
/// compared against brute force without tolerance games.
pub fn grid_disks(max_disks: usize) -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((0_u8..6, 0_u8..6, 0_u8..5), 1..=max_disks.max(1)).prop_map(|cells| {
        cells
            .into_iter()
            .map(|(x, y, radius)| (f64::from(x), f64::from(y), f64::from(radius)))
            .collect()
    })
}

/// Generates instances with arbitrary finite coordinates and radii.
pub fn scattered_disks(max_disks: usize) -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec(
        (-50.0_f64..50.0, -50.0_f64..50.0, 0.0_f64..20.0),
        1..=max_disks.max(1),
    )
}
