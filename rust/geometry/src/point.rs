// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point utilities
//!
//! Tolerance-based point comparisons and small vector helpers. Exact
//! floating-point equality is never used anywhere in the workspace; all
//! comparisons go through [`TOL`](fenestra_core::units::TOL).

use fenestra_core::diagnostics::{self, Severity};
use fenestra_core::units::TOL;
use nalgebra::{Point3, Vector3};

/// Coordinate axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component of a point along this axis.
    #[inline]
    pub fn of(&self, p: &Point3<f64>) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }

    /// The other two axes, in fixed order.
    #[inline]
    pub fn others(&self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

#[inline]
fn is_finite_point(p: &Point3<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// Tolerance-based point equality: each coordinate differs by less than
/// [`TOL`].
///
/// Non-finite coordinates compare unequal and are recorded at debug
/// severity.
pub fn points_equal(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    if !is_finite_point(a) || !is_finite_point(b) {
        diagnostics::record(
            Severity::Debug,
            "points_equal: non-finite coordinate, treating as unequal",
        );
        return false;
    }
    (a.x - b.x).abs() < TOL && (a.y - b.y).abs() < TOL && (a.z - b.z).abs() < TOL
}

/// True iff the segment `a -> b` runs along `axis`: its extent along that
/// axis exceeds [`TOL`] (non-degenerate) and, when `strict`, its extent
/// along the other two axes stays within [`TOL`].
pub fn is_axis_aligned(a: &Point3<f64>, b: &Point3<f64>, axis: Axis, strict: bool) -> bool {
    if !is_finite_point(a) || !is_finite_point(b) {
        diagnostics::record(
            Severity::Debug,
            "is_axis_aligned: non-finite coordinate, treating as unaligned",
        );
        return false;
    }
    if (axis.of(a) - axis.of(b)).abs() <= TOL {
        return false;
    }
    if strict {
        for other in axis.others() {
            if (other.of(a) - other.of(b)).abs() >= TOL {
                return false;
            }
        }
    }
    true
}

/// Componentwise scalar multiply.
///
/// A non-finite factor records at debug severity and yields the zero
/// vector.
pub fn scale(v: &Vector3<f64>, m: f64) -> Vector3<f64> {
    if !m.is_finite() {
        diagnostics::record(Severity::Debug, "scale: non-finite factor, returning zero");
        return Vector3::zeros();
    }
    v * m
}
