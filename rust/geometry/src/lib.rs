// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Fenestra Geometry
//!
//! Polygon normalization and transforms for planar building surfaces:
//! canonicalization to a local plane frame, fit/overlap predicates over an
//! i_overlay boolean provider, angle-bisector offsetting and bounding
//! outlines.
//!
//! All operations are synchronous and value-typed; soft failures return
//! neutral values (empty polygon, `false`, zero) and explain themselves
//! through the `fenestra-core` diagnostics sink.

pub mod bool2d;
pub mod canonical;
pub mod error;
pub mod offset;
pub mod outline;
pub mod point;
pub mod predicates;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

pub use canonical::{
    canonicalize, canonicalize_full, dedupe, is_clockwise, remove_collinear,
    to_upper_left_corner, CanonicalOptions, CanonicalPolygon, Sequence,
};
pub use error::{Error, Result};
pub use offset::offset;
pub use outline::{outline, OutlineItem};
pub use point::{is_axis_aligned, points_equal, scale, Axis};
pub use predicates::{area, fits, height, overlaps, width};
pub use transform::Plane;
