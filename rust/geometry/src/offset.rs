// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Offset/Buffer Engine
//!
//! Uniformly grows or shrinks a 3- or 4-sided convex polygon by a fixed
//! perpendicular distance. Two strategies:
//!
//! - the boolean provider's miter-offset primitive
//!   ([`bool2d::offset_contour`]), and
//! - the angle-bisector reference path, which displaces each vertex along
//!   its interior angle bisector by `width / sin(θ/2)` so the offset edges
//!   stay parallel to the originals.
//!
//! The bisector construction is exact for rectangles and a close
//! approximation for other convex quadrilaterals.

use fenestra_core::diagnostics::{self, Severity};
use fenestra_core::units::MIN_OFFSET;
use nalgebra::{Point2, Point3};
use smallvec::SmallVec;

use crate::bool2d;
use crate::canonical::{canonicalize_full, to_2d, CanonicalOptions, Sequence};
use crate::transform::transform_points;

/// Near-degenerate guard for edge lengths and half-angle sines
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Offset a convex 3- or 4-sided polygon by `width`: positive grows,
/// negative shrinks.
///
/// The polygon is canonicalized (forced clockwise) first; the offset is
/// computed in its plane frame and mapped back to the original 3D frame.
/// Offsets below [`MIN_OFFSET`] are no-ops. Wrong vertex count,
/// non-convex input or a collapsed result returns the original polygon
/// unchanged with a logged diagnostic.
pub fn offset(polygon: &[Point3<f64>], width: f64, use_provider: bool) -> Vec<Point3<f64>> {
    if !width.is_finite() {
        diagnostics::record(Severity::Debug, "offset: non-finite width, returning input");
        return polygon.to_vec();
    }
    if width.abs() < MIN_OFFSET {
        return polygon.to_vec();
    }

    let opts = CanonicalOptions {
        check_convex: true,
        sequence: Sequence::Clockwise,
        ..Default::default()
    };
    let canonical = match canonicalize_full(polygon, &opts) {
        Ok(c) => c,
        Err(e) => {
            diagnostics::record(Severity::Error, format!("offset: {e}"));
            return polygon.to_vec();
        }
    };

    let n = canonical.points.len();
    if !(3..=4).contains(&n) {
        diagnostics::record(
            Severity::Error,
            format!("offset: supports 3- or 4-sided convex polygons, got {} sides", n),
        );
        return polygon.to_vec();
    }

    let contour = to_2d(&canonical.points);
    let shifted = if use_provider {
        bool2d::offset_contour(&contour, width)
    } else {
        bisector_offset(&contour, width)
    };

    match shifted {
        Some(shifted) => {
            let local: Vec<Point3<f64>> = shifted
                .iter()
                .map(|p| Point3::new(p.x, p.y, 0.0))
                .collect();
            transform_points(&canonical.world_from_local, &local)
        }
        None => {
            diagnostics::record(
                Severity::Error,
                format!("offset: width {width} collapses or degenerates the polygon"),
            );
            polygon.to_vec()
        }
    }
}

/// Angle-bisector offset for a convex contour: each vertex moves along
/// its interior bisector by `distance / sin(θ/2)`, outward for positive
/// distances.
///
/// Equivalent to translating each vertex by `distance` along the edge
/// normal and correcting by `distance · cot(θ/2)` along the edge
/// direction. Returns `None` when a vertex is degenerate or the result
/// inverts.
pub(crate) fn bisector_offset(
    contour: &[Point2<f64>],
    distance: f64,
) -> Option<Vec<Point2<f64>>> {
    if !bool2d::is_valid_contour(contour) {
        return None;
    }

    let n = contour.len();
    let winding = bool2d::signed_area(contour).signum();

    let mut out: SmallVec<[Point2<f64>; 4]> = SmallVec::with_capacity(n);
    for i in 0..n {
        let prev = contour[(i + n - 1) % n];
        let v = contour[i];
        let next = contour[(i + 1) % n];

        let u = prev - v;
        let t = next - v;
        let (u_len, t_len) = (u.norm(), t.norm());
        if u_len < DEGENERATE_EPSILON || t_len < DEGENERATE_EPSILON {
            return None;
        }
        let u = u / u_len;
        let t = t / t_len;

        // interior bisector: for a convex vertex the sum of the two edge
        // directions points into the polygon
        let bisector = u + t;
        let b_len = bisector.norm();
        if b_len < DEGENERATE_EPSILON {
            return None; // straight vertex, no defined bisector
        }
        let bisector = bisector / b_len;

        let half_sin = ((1.0 - u.dot(&t)) / 2.0).sqrt();
        if half_sin < DEGENERATE_EPSILON {
            return None;
        }

        out.push(v - bisector * (distance / half_sin));
    }

    let out_signed = bool2d::signed_area(&out);
    if out_signed.signum() != winding || out_signed.abs() < DEGENERATE_EPSILON {
        return None;
    }

    Some(out.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bool2d::{area, contour_bounds};
    use crate::predicates;
    use approx::assert_relative_eq;

    fn rect2d(x0: f64, y0: f64, w: f64, h: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + w, y0),
            Point2::new(x0 + w, y0 + h),
            Point2::new(x0, y0 + h),
        ]
    }

    fn wall_rect(w: f64, h: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(w, 0.0, 0.0),
            Point3::new(w, 0.0, h),
            Point3::new(0.0, 0.0, h),
        ]
    }

    #[test]
    fn test_bisector_grow_rectangle_exact() {
        let grown = bisector_offset(&rect2d(0.0, 0.0, 3.0, 2.0), 0.5).unwrap();
        assert_relative_eq!(area(&grown), 4.0 * 3.0, epsilon = 1e-9);
        let (min, max) = contour_bounds(&grown).unwrap();
        assert_relative_eq!(min.x, -0.5, epsilon = 1e-9);
        assert_relative_eq!(min.y, -0.5, epsilon = 1e-9);
        assert_relative_eq!(max.x, 3.5, epsilon = 1e-9);
        assert_relative_eq!(max.y, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_bisector_round_trip_rectangle() {
        let original = rect2d(1.0, 1.0, 2.0, 1.5);
        let grown = bisector_offset(&original, 0.3).unwrap();
        let back = bisector_offset(&grown, -0.3).unwrap();
        for (a, b) in original.iter().zip(back.iter()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bisector_matches_provider_on_triangle() {
        let tri = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(1.0, 3.0),
        ];
        let a = bisector_offset(&tri, 0.25).unwrap();
        let b = bool2d::offset_contour(&tri, 0.25).unwrap();
        assert_relative_eq!(area(&a), area(&b), epsilon = 1e-9);
    }

    #[test]
    fn test_bisector_collapse_is_none() {
        assert!(bisector_offset(&rect2d(0.0, 0.0, 2.0, 2.0), -1.5).is_none());
    }

    #[test]
    fn test_offset_wall_rectangle() {
        let grown = offset(&wall_rect(4.0, 3.0), 0.1, false);
        assert_eq!(grown.len(), 4);
        assert_relative_eq!(predicates::width(&grown), 4.2, epsilon = 1e-9);
        assert_relative_eq!(predicates::height(&grown), 3.2, epsilon = 1e-9);
        assert_relative_eq!(predicates::area(&grown), 4.2 * 3.2, epsilon = 1e-9);
        // stays on the wall plane
        for p in &grown {
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_offset_provider_path_matches_bisector() {
        let host = wall_rect(4.0, 3.0);
        let a = offset(&host, 0.2, false);
        let b = offset(&host, 0.2, true);
        assert_relative_eq!(predicates::area(&a), predicates::area(&b), epsilon = 1e-9);
    }

    #[test]
    fn test_offset_below_threshold_is_noop() {
        let host = wall_rect(4.0, 3.0);
        let same = offset(&host, 0.01, false);
        assert_eq!(host, same);
    }

    #[test]
    fn test_offset_rejects_pentagon() {
        let pentagon = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 1.5, 0.0),
            Point3::new(1.0, 3.0, 0.0),
            Point3::new(-1.0, 1.5, 0.0),
        ];
        let same = offset(&pentagon, 0.1, false);
        assert_eq!(pentagon, same);
    }

    #[test]
    fn test_offset_rejects_non_convex(){
        let dart = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ];
        let same = offset(&dart, 0.1, false);
        assert_eq!(dart, same);
    }

    #[test]
    fn test_offset_shrink_window() {
        let shrunk = offset(&wall_rect(2.0, 1.0), -0.2, false);
        assert_relative_eq!(predicates::width(&shrunk), 1.6, epsilon = 1e-9);
        assert_relative_eq!(predicates::height(&shrunk), 0.6, epsilon = 1e-9);
    }
}
