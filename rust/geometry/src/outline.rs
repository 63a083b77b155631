// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outline/Bounding-Box Generator
//!
//! Folds the plane-aligned bounding rectangles of several sub-polygons
//! (each expanded by its own frame width) into one enclosing rectangle,
//! optionally buffered. This is how a group of small framed openings gets
//! a single buffered cut-out on its host surface.

use fenestra_core::diagnostics::{self, Severity};
use fenestra_core::units::{MIN_OFFSET, TOL};
use nalgebra::{Point2, Point3};

use crate::bool2d::contour_bounds;
use crate::canonical::{canonicalize_full, to_2d, to_3d, CanonicalOptions};
use crate::offset::bisector_offset;
use crate::transform::{transform_points, Plane};

/// One polygon participating in an outline, with the frame width its
/// bounding rectangle must be expanded by.
#[derive(Debug, Clone)]
pub struct OutlineItem {
    pub points: Vec<Point3<f64>>,
    pub frame_width: f64,
}

impl OutlineItem {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            frame_width: 0.0,
        }
    }

    pub fn with_frame(points: Vec<Point3<f64>>, frame_width: f64) -> Self {
        Self {
            points,
            frame_width,
        }
    }
}

/// Compute the enclosing bounding rectangle of the items in the first
/// item's plane, expanded per-item by frame width and optionally buffered
/// by `buffer` (applied through the offset engine when it meets
/// [`MIN_OFFSET`]). Returns the rectangle in the original 3D frame, or an
/// empty polygon on degenerate input.
///
/// When `flatten` is false, every item must already be coplanar with the
/// first one within tolerance.
pub fn outline(items: &[OutlineItem], buffer: f64, flatten: bool) -> Vec<Point3<f64>> {
    let Some(first) = items.first() else {
        diagnostics::record(Severity::Error, "outline: no input polygons");
        return Vec::new();
    };

    let first_c = match canonicalize_full(&first.points, &CanonicalOptions::default()) {
        Ok(c) => c,
        Err(e) => {
            diagnostics::record(Severity::Error, format!("outline: first polygon: {e}"));
            return Vec::new();
        }
    };

    let reference_plane = if flatten {
        None
    } else {
        match Plane::fit(&first.points) {
            Ok(plane) => Some(plane),
            Err(e) => {
                diagnostics::record(Severity::Error, format!("outline: {e}"));
                return Vec::new();
            }
        }
    };

    let mut min = Point2::new(f64::MAX, f64::MAX);
    let mut max = Point2::new(f64::MIN, f64::MIN);
    let mut folded = 0usize;

    for (index, item) in items.iter().enumerate() {
        if let Some(plane) = &reference_plane {
            if !plane.contains_all(&item.points) {
                diagnostics::record(
                    Severity::Warn,
                    format!("outline: polygon {index} is not coplanar with the first, skipping"),
                );
                continue;
            }
        }

        let opts = CanonicalOptions {
            transform: Some(first_c.local_from_world),
            ..Default::default()
        };
        let local = match canonicalize_full(&item.points, &opts) {
            Ok(c) => c,
            Err(e) => {
                diagnostics::record(
                    Severity::Warn,
                    format!("outline: polygon {index} skipped: {e}"),
                );
                continue;
            }
        };

        let Some((item_min, item_max)) = contour_bounds(&to_2d(&local.points)) else {
            continue;
        };
        min.x = min.x.min(item_min.x - item.frame_width);
        min.y = min.y.min(item_min.y - item.frame_width);
        max.x = max.x.max(item_max.x + item.frame_width);
        max.y = max.y.max(item_max.y + item.frame_width);
        folded += 1;
    }

    if folded == 0 || max.x - min.x < TOL || max.y - min.y < TOL {
        diagnostics::record(
            Severity::Error,
            "outline: bounding extents are empty or inverted",
        );
        return Vec::new();
    }

    let mut rectangle = vec![
        Point2::new(min.x, min.y),
        Point2::new(max.x, min.y),
        Point2::new(max.x, max.y),
        Point2::new(min.x, max.y),
    ];

    if buffer.abs() >= MIN_OFFSET {
        match bisector_offset(&rectangle, buffer) {
            Some(buffered) => rectangle = buffered,
            None => {
                diagnostics::record(
                    Severity::Error,
                    format!("outline: buffer {buffer} collapses the bounding rectangle"),
                );
                return Vec::new();
            }
        }
    }

    transform_points(&first_c.world_from_local, &to_3d(&rectangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates;
    use approx::assert_relative_eq;

    fn wall_rect(x0: f64, z0: f64, w: f64, h: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(x0, 0.0, z0),
            Point3::new(x0 + w, 0.0, z0),
            Point3::new(x0 + w, 0.0, z0 + h),
            Point3::new(x0, 0.0, z0 + h),
        ]
    }

    #[test]
    fn test_outline_two_windows() {
        let items = vec![
            OutlineItem::new(wall_rect(1.0, 1.0, 1.0, 1.0)),
            OutlineItem::new(wall_rect(3.0, 1.0, 1.0, 1.5)),
        ];
        let rect = outline(&items, 0.0, true);
        assert_eq!(rect.len(), 4);
        assert_relative_eq!(predicates::width(&rect), 3.0, epsilon = 1e-9);
        assert_relative_eq!(predicates::height(&rect), 1.5, epsilon = 1e-9);
        // result lies on the shared wall plane
        for p in &rect {
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_outline_applies_frame_widths() {
        let items = vec![OutlineItem::with_frame(wall_rect(1.0, 1.0, 1.0, 1.0), 0.05)];
        let rect = outline(&items, 0.0, true);
        assert_relative_eq!(predicates::width(&rect), 1.1, epsilon = 1e-9);
        assert_relative_eq!(predicates::height(&rect), 1.1, epsilon = 1e-9);
    }

    #[test]
    fn test_outline_buffered() {
        let items = vec![OutlineItem::new(wall_rect(1.0, 1.0, 2.0, 1.0))];
        let rect = outline(&items, 0.1, true);
        assert_relative_eq!(predicates::width(&rect), 2.2, epsilon = 1e-9);
        assert_relative_eq!(predicates::height(&rect), 1.2, epsilon = 1e-9);
    }

    #[test]
    fn test_outline_sub_threshold_buffer_ignored() {
        let items = vec![OutlineItem::new(wall_rect(1.0, 1.0, 2.0, 1.0))];
        let rect = outline(&items, 0.02, true);
        assert_relative_eq!(predicates::width(&rect), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_outline_empty_input() {
        assert!(outline(&[], 0.0, true).is_empty());
    }

    #[test]
    fn test_outline_skips_non_coplanar_when_not_flattening() {
        let shifted: Vec<_> = wall_rect(3.0, 1.0, 1.0, 1.0)
            .iter()
            .map(|p| Point3::new(p.x, p.y + 1.0, p.z))
            .collect();
        let items = vec![
            OutlineItem::new(wall_rect(1.0, 1.0, 1.0, 1.0)),
            OutlineItem::new(shifted),
        ];
        let rect = outline(&items, 0.0, false);
        // only the coplanar window contributes
        assert_relative_eq!(predicates::width(&rect), 1.0, epsilon = 1e-9);
    }
}
