// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon predicates and metrics
//!
//! Width/height extents, area, and the fit/overlap tests built on the
//! boolean provider. Both polygons of a pairwise test are canonicalized
//! into the same plane frame first; areas are then compared through the
//! union, so the tests are insensitive to vertex order and winding.

use fenestra_core::diagnostics::{self, Severity};
use fenestra_core::units::AREA_TOL;
use nalgebra::Point3;

use crate::bool2d;
use crate::canonical::{canonicalize_full, to_2d, CanonicalOptions, CanonicalPolygon, Sequence};
use crate::transform::Plane;

/// Local-frame X extent of the polygon's bounding box, zero on failure.
pub fn width(points: &[Point3<f64>]) -> f64 {
    extent(points).map(|(w, _)| w).unwrap_or(0.0)
}

/// Local-frame Y extent of the polygon's bounding box, zero on failure.
pub fn height(points: &[Point3<f64>]) -> f64 {
    extent(points).map(|(_, h)| h).unwrap_or(0.0)
}

/// Area of the polygon in its own plane, zero on failure.
pub fn area(points: &[Point3<f64>]) -> f64 {
    match canonicalize_full(points, &CanonicalOptions::default()) {
        Ok(canonical) => bool2d::area(&to_2d(&canonical.points)),
        Err(e) => {
            diagnostics::record(Severity::Error, format!("area: {e}"));
            0.0
        }
    }
}

/// True iff `inner` is entirely contained within `outer`.
///
/// Both polygons are canonicalized against `outer`'s plane with forced
/// clockwise sequencing; `inner` fits iff the union area equals `outer`'s
/// area within the squared tolerance, i.e. the union contributes nothing
/// beyond `outer`. Degenerate input returns `false`.
///
/// Note this is a narrow criterion: containment with boundary contact
/// beyond tolerance is rejected.
pub fn fits(inner: &[Point3<f64>], outer: &[Point3<f64>], flatten: bool) -> bool {
    let Some((inner_c, outer_c)) = align_pair(inner, outer, flatten, "fits") else {
        return false;
    };

    let inner_2d = to_2d(&inner_c.points);
    let outer_2d = to_2d(&outer_c.points);
    if !bool2d::is_valid_contour(&inner_2d) || !bool2d::is_valid_contour(&outer_2d) {
        diagnostics::record(Severity::Debug, "fits: degenerate polygon, returning false");
        return false;
    }

    let outer_area = bool2d::area(&outer_2d);
    match bool2d::union_area(&inner_2d, &outer_2d) {
        Some(union) => (union - outer_area).abs() < AREA_TOL,
        None => {
            diagnostics::record(Severity::Error, "fits: boolean provider returned no result");
            false
        }
    }
}

/// True iff the polygons share a non-trivial region, including full
/// containment of one by the other.
///
/// Both polygons are canonicalized against `a`'s plane with forced
/// clockwise sequencing; they overlap iff the union area falls short of
/// the sum of the individual areas by more than the squared tolerance.
pub fn overlaps(a: &[Point3<f64>], b: &[Point3<f64>], flatten: bool) -> bool {
    let Some((b_c, a_c)) = align_pair(b, a, flatten, "overlaps") else {
        return false;
    };

    let a_2d = to_2d(&a_c.points);
    let b_2d = to_2d(&b_c.points);
    if !bool2d::is_valid_contour(&a_2d) || !bool2d::is_valid_contour(&b_2d) {
        diagnostics::record(Severity::Debug, "overlaps: degenerate polygon, returning false");
        return false;
    }

    let sum = bool2d::area(&a_2d) + bool2d::area(&b_2d);
    match bool2d::union_area(&a_2d, &b_2d) {
        Some(union) => union < sum - AREA_TOL,
        None => {
            diagnostics::record(
                Severity::Error,
                "overlaps: boolean provider returned no result",
            );
            false
        }
    }
}

/// Canonicalize `secondary` and `reference` into `reference`'s plane
/// frame, forced clockwise. When `flatten` is false, `secondary` must
/// already be coplanar with `reference` within tolerance.
fn align_pair(
    secondary: &[Point3<f64>],
    reference: &[Point3<f64>],
    flatten: bool,
    op: &str,
) -> Option<(CanonicalPolygon, CanonicalPolygon)> {
    let reference_opts = CanonicalOptions {
        sequence: Sequence::Clockwise,
        ..Default::default()
    };
    let reference_c = match canonicalize_full(reference, &reference_opts) {
        Ok(c) => c,
        Err(e) => {
            diagnostics::record(Severity::Error, format!("{op}: reference polygon: {e}"));
            return None;
        }
    };

    if !flatten {
        match Plane::fit(reference) {
            Ok(plane) if plane.contains_all(secondary) => {}
            _ => {
                diagnostics::record(
                    Severity::Error,
                    format!("{op}: polygons are not coplanar and flattening is disabled"),
                );
                return None;
            }
        }
    }

    let secondary_opts = CanonicalOptions {
        sequence: Sequence::Clockwise,
        transform: Some(reference_c.local_from_world),
        ..Default::default()
    };
    let secondary_c = match canonicalize_full(secondary, &secondary_opts) {
        Ok(c) => c,
        Err(e) => {
            diagnostics::record(Severity::Error, format!("{op}: secondary polygon: {e}"));
            return None;
        }
    };

    Some((secondary_c, reference_c))
}

/// Shared extent computation behind [`width`] and [`height`].
fn extent(points: &[Point3<f64>]) -> Option<(f64, f64)> {
    let canonical = match canonicalize_full(points, &CanonicalOptions::default()) {
        Ok(c) => c,
        Err(e) => {
            diagnostics::record(Severity::Error, format!("extent: {e}"));
            return None;
        }
    };
    let (min, max) = bool2d::contour_bounds(&to_2d(&canonical.points))?;
    Some((max.x - min.x, max.y - min.y))
}
