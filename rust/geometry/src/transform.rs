// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plane fitting and plane-alignment transforms
//!
//! Every polygon entering the canonicalizer gets a plane fitted through
//! its first three non-collinear points and an affine transform aligning
//! that plane to Z = 0. The transform is owned by the canonicalization
//! call; nothing here is shared mutable state.

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Point3, Vector3};

use fenestra_core::units::TOL;

/// A plane in 3D, defined by a point on it and a unit normal.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub origin: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Fit a plane through the first three non-collinear points of the
    /// sequence.
    ///
    /// The normal's sign is normalized so that its dominant component is
    /// positive, making the fitted plane independent of vertex winding.
    /// Canonicalization depends on this: re-canonicalizing an already
    /// canonical polygon must reproduce the same frame.
    ///
    /// # Errors
    ///
    /// `InsufficientPoints` when fewer than three points are given or all
    /// of them are collinear within tolerance.
    pub fn fit(points: &[Point3<f64>]) -> Result<Self> {
        if points.len() < 3 {
            return Err(Error::InsufficientPoints(format!(
                "plane fit needs at least 3 points, got {}",
                points.len()
            )));
        }
        let a = points[0];
        for b in points.iter().skip(1) {
            let ab = b - a;
            if ab.norm() < TOL {
                continue;
            }
            for c in points.iter().skip(2) {
                let cross = ab.cross(&(c - a));
                if cross.norm() > TOL {
                    return Ok(Self {
                        origin: a,
                        normal: orient_normal(cross.normalize()),
                    });
                }
            }
        }
        Err(Error::InsufficientPoints(
            "all points are collinear within tolerance".to_string(),
        ))
    }

    /// Signed distance from the plane.
    #[inline]
    pub fn distance(&self, p: &Point3<f64>) -> f64 {
        (p - self.origin).dot(&self.normal)
    }

    /// True iff `p` lies on the plane within [`TOL`].
    #[inline]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        self.distance(p).abs() < TOL
    }

    /// True iff every point lies on the plane within [`TOL`].
    pub fn contains_all(&self, points: &[Point3<f64>]) -> bool {
        points.iter().all(|p| self.contains(p))
    }
}

/// Flip a unit normal so its dominant component is positive.
fn orient_normal(n: Vector3<f64>) -> Vector3<f64> {
    let dominant = if n.x.abs() >= n.y.abs() && n.x.abs() >= n.z.abs() {
        n.x
    } else if n.y.abs() >= n.z.abs() {
        n.y
    } else {
        n.z
    };
    if dominant < 0.0 {
        -n
    } else {
        n
    }
}

/// Build the world-from-local transform for a plane: an orthonormal frame
/// whose Z axis is the plane normal, translated to the plane origin.
///
/// The X axis is derived from a world reference axis chosen to avoid
/// near-parallel degeneracy, the same fallback used when orienting IFC
/// placement axes.
pub fn world_from_local(plane: &Plane) -> Matrix4<f64> {
    let z_axis = plane.normal.normalize();

    let x_axis = if z_axis.z.abs() < 0.9 {
        Vector3::new(0.0, 0.0, 1.0).cross(&z_axis).normalize()
    } else {
        Vector3::new(1.0, 0.0, 0.0).cross(&z_axis).normalize()
    };

    // Y axis from the right-hand rule: Y = Z x X
    let y_axis = z_axis.cross(&x_axis).normalize();

    Matrix4::new(
        x_axis.x, y_axis.x, z_axis.x, plane.origin.x,
        x_axis.y, y_axis.y, z_axis.y, plane.origin.y,
        x_axis.z, y_axis.z, z_axis.z, plane.origin.z,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Invert a plane-alignment transform.
///
/// # Errors
///
/// `SingularTransform` when the matrix has no inverse.
pub fn invert(m: &Matrix4<f64>) -> Result<Matrix4<f64>> {
    m.try_inverse().ok_or_else(|| {
        Error::SingularTransform("plane alignment matrix is not invertible".to_string())
    })
}

/// Apply a transform to a point slice.
pub fn transform_points(m: &Matrix4<f64>, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    points.iter().map(|p| m.transform_point(p)).collect()
}
