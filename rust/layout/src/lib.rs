// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Fenestra Layout
//!
//! The sub-element layout solver: given a host surface and a list of
//! opening specifications, reconcile the geometric constraints (head,
//! sill, height, width, count, offset, centreline, buffers, ratio
//! sizing), emit non-overlapping rectangles and commit them onto the
//! surface.
//!
//! ```rust
//! use fenestra_core::opening::{OpeningKind, OpeningSpec, SurfaceKind};
//! use fenestra_geometry::Point3;
//! use fenestra_layout::{LayoutSolver, Surface};
//!
//! let mut wall = Surface::new(
//!     "south",
//!     SurfaceKind::Wall,
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(4.0, 0.0, 0.0),
//!         Point3::new(4.0, 0.0, 3.0),
//!         Point3::new(0.0, 0.0, 3.0),
//!     ],
//! );
//! let spec = OpeningSpec::new("w1", OpeningKind::Window).with_ratio(0.3);
//! let result = LayoutSolver::default().place(&mut wall, &[spec]);
//! assert_eq!(result.committed_count(), 1);
//! ```

pub mod records;
pub mod solver;
pub mod surface;

pub use records::{specs_from_json, specs_to_json};
pub use solver::{LayoutConfig, LayoutResult, LayoutSolver, ResolutionState, ResolvedOpening};
pub use surface::{PlacedElement, Surface};
