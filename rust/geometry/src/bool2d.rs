// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Provider
//!
//! Wrapper over the i_overlay boolean engine plus the purely local 2D
//! primitives (signed area, ray casting, miter offsetting) the rest of the
//! workspace treats as a black-box geometry provider.
//!
//! Contract: degenerate input (fewer than 3 vertices, near-zero area) and
//! empty boolean results yield an explicit "no result" (`None`), never a
//! zero polygon. Callers must treat `None` as a hard failure.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::{Point2, Vector2};

/// Minimum area threshold - contours smaller than this are considered
/// degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Near-parallel guard for offset-line intersections
const PARALLEL_EPSILON: f64 = 1e-9;

/// Compute the signed area of a 2D contour.
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Absolute area of a 2D contour.
#[inline]
pub fn area(contour: &[Point2<f64>]) -> f64 {
    signed_area(contour).abs()
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    area(contour) > MIN_AREA_THRESHOLD
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Area of the boolean union of two contours.
///
/// Returns `None` when either input is degenerate or the provider returns
/// no shapes. Holes in the union (possible when the inputs only touch at
/// vertices) are subtracted from the total.
pub fn union_area(a: &[Point2<f64>], b: &[Point2<f64>]) -> Option<f64> {
    if !is_valid_contour(a) || !is_valid_contour(b) {
        return None;
    }

    let subject = vec![contour_to_path(&ensure_ccw(a))];
    let clip = vec![contour_to_path(&ensure_ccw(b))];

    // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is
    // Vec of contours (first outer, rest holes)
    let shapes = subject.overlay(&clip, OverlayRule::Union, FillRule::EvenOdd);
    if shapes.is_empty() {
        return None;
    }

    let mut total = 0.0;
    for shape in &shapes {
        let Some(outer) = shape.first() else {
            continue;
        };
        total += path_area(outer);
        for hole in shape.iter().skip(1) {
            total -= path_area(hole);
        }
    }

    (total > MIN_AREA_THRESHOLD).then_some(total)
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    if contour.is_empty() {
        return None;
    }

    let mut min = contour[0];
    let mut max = contour[0];

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Buffer a convex contour by `distance`: positive grows, negative shrinks.
///
/// Each edge is shifted along its outward normal and consecutive offset
/// lines are intersected (miter join). Valid for convex contours only;
/// returns `None` when adjacent edges are near-parallel or the shrunken
/// result inverts or loses its area.
pub fn offset_contour(contour: &[Point2<f64>], distance: f64) -> Option<Vec<Point2<f64>>> {
    if !is_valid_contour(contour) {
        return None;
    }

    let n = contour.len();
    let winding = signed_area(contour).signum();

    // Offset line per edge: a point on the shifted line plus the edge
    // direction. Outward normal depends on winding: for CCW the interior
    // is left of each edge, so outward is the right-hand normal.
    let mut origins = Vec::with_capacity(n);
    let mut directions = Vec::with_capacity(n);
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        let d: Vector2<f64> = b - a;
        let len = d.norm();
        if len < PARALLEL_EPSILON {
            return None;
        }
        let d = d / len;
        let outward = Vector2::new(d.y, -d.x) * winding;
        origins.push(a + outward * distance);
        directions.push(d);
    }

    // New vertex i = intersection of the offset lines of edge i-1 and
    // edge i.
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let p = intersect_lines(origins[prev], directions[prev], origins[i], directions[i])?;
        out.push(p);
    }

    // A shrink larger than the inradius flips the winding; reject instead
    // of returning an inverted polygon.
    let out_signed = signed_area(&out);
    if out_signed.signum() != winding || out_signed.abs() < MIN_AREA_THRESHOLD {
        return None;
    }

    Some(out)
}

/// Intersect two parametric lines; `None` when near-parallel.
fn intersect_lines(
    o1: Point2<f64>,
    d1: Vector2<f64>,
    o2: Point2<f64>,
    d2: Vector2<f64>,
) -> Option<Point2<f64>> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < PARALLEL_EPSILON {
        return None;
    }
    let delta = o2 - o1;
    let t = (delta.x * d2.y - delta.y * d2.x) / cross;
    Some(o1 + d1 * t)
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

/// Absolute area of an i_overlay path
fn path_area(path: &[[f64; 2]]) -> f64 {
    let points: Vec<Point2<f64>> = path.iter().map(|p| Point2::new(p[0], p[1])).collect();
    area(&points)
}
