// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-Set Canonicalizer
//!
//! Turns a raw, possibly redundant or collinear, possibly clockwise point
//! sequence into a well-formed polygon: deduplicated, non-collinear,
//! coplanar-validated and consistently sequenced. Every higher-level
//! operation in the workspace normalizes its inputs through here before
//! applying predicates or transforms.
//!
//! [`canonicalize`] returns the cleaned loop in the original 3D frame;
//! [`canonicalize_full`] additionally exposes the plane-aligned local
//! points (Z = 0) and the transforms linking the two frames.
//!
//! Failures (too few points, non-planar, non-convex when required) produce
//! an empty result and an error-severity diagnostic; callers check for
//! emptiness rather than handling errors.

use fenestra_core::diagnostics::{self, Severity};
use fenestra_core::units::TOL;
use nalgebra::{Matrix4, Point2, Point3, Vector2};

use crate::error::{Error, Result};
use crate::point::points_equal;
use crate::transform::{invert, transform_points, world_from_local, Plane};

/// Final vertex sequencing applied by [`canonicalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sequence {
    /// Return the loop in reversed order relative to the natural local
    /// winding.
    #[default]
    Reversed,
    /// Counterclockwise, re-rooted at the upper-left corner.
    UpperLeft,
    /// Clockwise, reversing if the natural orientation is
    /// counterclockwise.
    Clockwise,
}

/// Canonicalization controls with documented defaults.
///
/// `transform`, when supplied, is the local-from-world matrix of a shared
/// external frame (useful when testing set relationships between polygons
/// on the same plane); otherwise a fresh plane-alignment transform is
/// computed from the polygon itself.
#[derive(Debug, Clone)]
pub struct CanonicalOptions {
    /// Hard-fail on non-convex input. Default `false`.
    pub check_convex: bool,
    /// Remove duplicate points. Default `true`.
    pub dedupe: bool,
    /// Keep collinear points instead of removing them. Default `false`.
    pub keep_collinear: bool,
    /// Caller-supplied local-from-world transform. Default `None`.
    pub transform: Option<Matrix4<f64>>,
    /// Final sequencing convention. Default [`Sequence::Reversed`].
    pub sequence: Sequence,
}

impl Default for CanonicalOptions {
    fn default() -> Self {
        Self {
            check_convex: false,
            dedupe: true,
            keep_collinear: false,
            transform: None,
            sequence: Sequence::Reversed,
        }
    }
}

/// A canonicalized polygon in its local plane frame, with the transforms
/// linking it back to the original 3D frame.
#[derive(Debug, Clone)]
pub struct CanonicalPolygon {
    /// Plane-aligned points, Z = 0.
    pub points: Vec<Point3<f64>>,
    pub world_from_local: Matrix4<f64>,
    pub local_from_world: Matrix4<f64>,
}

impl CanonicalPolygon {
    /// The canonical loop mapped back to the original 3D frame.
    pub fn world_points(&self) -> Vec<Point3<f64>> {
        transform_points(&self.world_from_local, &self.points)
    }
}

/// Remove duplicate points, order-preserving: the first occurrence of each
/// location is kept, later repeats (consecutive or not) are dropped.
pub fn dedupe(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let mut kept: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if !kept.iter().any(|q| points_equal(p, q)) {
            kept.push(*p);
        }
    }
    kept
}

/// Remove collinear points: each point whose neighbors (wrapping) span it
/// within tolerance is dropped. The result keeps the original first point
/// first when it is retained.
pub fn remove_collinear(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let n = points.len();
    if n <= 3 {
        return points.to_vec();
    }

    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let p1 = &points[(i + n - 1) % n];
        let p2 = &points[i];
        let p3 = &points[(i + 1) % n];
        let cross = (p3 - p1).cross(&(p2 - p1));
        if cross.norm() >= TOL {
            kept.push(points[i]);
        }
    }

    if kept.len() < 3 {
        return points.to_vec();
    }
    kept
}

/// Winding test for a plane-aligned polygon.
///
/// Valid only for points already flattened to Z ≈ 0 with at least three
/// vertices; anything else is recorded as invalid input and reported as
/// not clockwise.
pub fn is_clockwise(points: &[Point3<f64>]) -> bool {
    if points.len() < 3 {
        diagnostics::record(
            Severity::Error,
            format!("is_clockwise: needs at least 3 points, got {}", points.len()),
        );
        return false;
    }
    if points.iter().any(|p| p.z.abs() > TOL) {
        diagnostics::record(
            Severity::Error,
            "is_clockwise: input is not aligned to the Z = 0 plane",
        );
        return false;
    }
    signed_area_xy(points) < 0.0
}

/// Reorder a plane-aligned polygon so that index 0 is the upper-left
/// corner and the winding is counterclockwise.
///
/// The root is the vertex coinciding with the local origin when one
/// exists, otherwise the upper end of the local left edge (X ≈ 0),
/// otherwise the vertex nearest the origin. Applying this twice is a
/// no-op.
pub fn to_upper_left_corner(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut ordered = points.to_vec();
    if signed_area_xy(&ordered) < 0.0 {
        ordered.reverse();
    }

    let origin = Point3::new(0.0, 0.0, 0.0);
    let root = ordered
        .iter()
        .position(|p| points_equal(p, &origin))
        .or_else(|| {
            ordered
                .iter()
                .enumerate()
                .filter(|(_, p)| p.x.abs() < TOL)
                .max_by(|(_, a), (_, b)| a.y.total_cmp(&b.y))
                .map(|(i, _)| i)
        })
        .or_else(|| {
            ordered
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.coords.norm_squared().total_cmp(&b.coords.norm_squared())
                })
                .map(|(i, _)| i)
        })
        .unwrap_or(0);

    ordered.rotate_left(root);
    ordered
}

/// Canonicalize a point sequence per the requested options, returning the
/// cleaned loop in the original 3D frame. Logs and returns an empty
/// sequence on failure.
pub fn canonicalize(points: &[Point3<f64>], options: &CanonicalOptions) -> Vec<Point3<f64>> {
    match canonicalize_full(points, options) {
        Ok(canonical) => canonical.world_points(),
        Err(e) => {
            diagnostics::record(Severity::Error, format!("canonicalize: {e}"));
            Vec::new()
        }
    }
}

/// Canonicalize and keep the local frame plus the plane transforms.
///
/// # Errors
///
/// `InsufficientPoints`, `NonPlanar`, `Degenerate`, `NonConvex` or
/// `SingularTransform` depending on the failing check.
pub fn canonicalize_full(
    points: &[Point3<f64>],
    options: &CanonicalOptions,
) -> Result<CanonicalPolygon> {
    if points.len() < 3 {
        return Err(Error::InsufficientPoints(format!(
            "polygon needs at least 3 points, got {}",
            points.len()
        )));
    }

    let plane = Plane::fit(points)?;
    if !plane.contains_all(points) {
        return Err(Error::NonPlanar(
            "points do not lie on a common plane within tolerance".to_string(),
        ));
    }

    let (local_from_world, world_from_local_m) = match options.transform {
        Some(t) => (t, invert(&t)?),
        None => {
            let w = world_from_local(&plane);
            (invert(&w)?, w)
        }
    };

    let mut local = transform_points(&local_from_world, points);
    if options.transform.is_some() && local.iter().any(|p| p.z.abs() > TOL) {
        diagnostics::record(
            Severity::Warn,
            "canonicalize: supplied transform does not flatten the polygon, forcing Z = 0",
        );
    }
    for p in &mut local {
        p.z = 0.0;
    }

    if options.dedupe {
        local = dedupe(&local);
    }
    if !options.keep_collinear {
        local = remove_collinear(&local);
    }
    if local.len() < 3 {
        return Err(Error::Degenerate(
            "fewer than 3 points remain after deduplication".to_string(),
        ));
    }

    if options.check_convex {
        check_convex(&local)?;
    }

    let points = match options.sequence {
        Sequence::Reversed => {
            local.reverse();
            local
        }
        Sequence::UpperLeft => to_upper_left_corner(&local),
        Sequence::Clockwise => {
            if signed_area_xy(&local) > 0.0 {
                local.reverse();
            }
            local
        }
    };

    Ok(CanonicalPolygon {
        points,
        world_from_local: world_from_local_m,
        local_from_world,
    })
}

/// Project plane-aligned points to 2D by dropping Z.
pub fn to_2d(points: &[Point3<f64>]) -> Vec<Point2<f64>> {
    points.iter().map(|p| Point2::new(p.x, p.y)).collect()
}

/// Lift 2D points back to plane-aligned 3D (Z = 0).
pub fn to_3d(points: &[Point2<f64>]) -> Vec<Point3<f64>> {
    points.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect()
}

/// Signed area of the XY projection.
pub(crate) fn signed_area_xy(points: &[Point3<f64>]) -> f64 {
    let mut area = 0.0;
    let n = points.len();
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area * 0.5
}

/// Verify convexity: every edge's supporting half-plane must keep all
/// other vertices on the non-positive side of its outward normal.
fn check_convex(points: &[Point3<f64>]) -> Result<()> {
    let n = points.len();
    let winding = if signed_area_xy(points) < 0.0 { -1.0 } else { 1.0 };

    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        let edge = Vector2::new(b.x - a.x, b.y - a.y);
        let len = edge.norm();
        if len < TOL {
            continue;
        }
        // right-hand normal is outward for counterclockwise interiors
        let outward = Vector2::new(edge.y, -edge.x) * (winding / len);
        for (j, v) in points.iter().enumerate() {
            if j == i || j == (i + 1) % n {
                continue;
            }
            let d = (v.x - a.x) * outward.x + (v.y - a.y) * outward.y;
            if d > TOL {
                return Err(Error::NonConvex(format!(
                    "vertex {} lies {:.4} outside the supporting half-plane of edge {}",
                    j, d, i
                )));
            }
        }
    }
    Ok(())
}
