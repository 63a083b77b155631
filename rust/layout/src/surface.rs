// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host surfaces and placed elements
//!
//! A [`Surface`] is the solver's view of one planar building face: its
//! vertex loop, kind tag and the registry of elements already committed
//! onto it. Placed elements are immutable once committed; the only
//! supported mutation is clear-and-regenerate.

use fenestra_core::opening::SurfaceKind;
use fenestra_core::units::MIN_OFFSET;
use fenestra_geometry::{offset, predicates, Point3};

/// A committed rectangle on a host surface, with a back-reference to the
/// specification that produced it.
#[derive(Debug, Clone)]
pub struct PlacedElement {
    /// Name of the originating specification.
    pub spec_name: String,
    /// Index within the specification's array.
    pub index: usize,
    /// Instance multiplier copied from the specification.
    pub multiplier: u32,
    /// Frame width applied when testing this element for collisions.
    pub frame_width: f64,
    vertices: [Point3<f64>; 4],
}

impl PlacedElement {
    pub(crate) fn new(
        spec_name: String,
        index: usize,
        multiplier: u32,
        frame_width: f64,
        vertices: [Point3<f64>; 4],
    ) -> Self {
        Self {
            spec_name,
            index,
            multiplier,
            frame_width,
            vertices,
        }
    }

    /// The committed rectangle's corners.
    pub fn vertices(&self) -> &[Point3<f64>; 4] {
        &self.vertices
    }

    /// The rectangle as a polygon loop.
    pub fn polygon(&self) -> Vec<Point3<f64>> {
        self.vertices.to_vec()
    }

    /// The rectangle grown by its frame width, as used in fit and
    /// collision tests. Sub-threshold frames leave it unchanged.
    pub fn buffered(&self) -> Vec<Point3<f64>> {
        if self.frame_width >= MIN_OFFSET {
            offset(&self.polygon(), self.frame_width, false)
        } else {
            self.polygon()
        }
    }

    /// Glass area of the rectangle.
    pub fn area(&self) -> f64 {
        predicates::area(&self.polygon())
    }
}

/// One planar host surface with its committed openings.
#[derive(Debug, Clone)]
pub struct Surface {
    name: String,
    kind: SurfaceKind,
    vertices: Vec<Point3<f64>>,
    placed: Vec<PlacedElement>,
}

impl Surface {
    pub fn new(name: impl Into<String>, kind: SurfaceKind, vertices: Vec<Point3<f64>>) -> Self {
        Self {
            name: name.into(),
            kind,
            vertices,
            placed: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Gross area of the surface polygon.
    pub fn gross_area(&self) -> f64 {
        predicates::area(&self.vertices)
    }

    /// Elements committed onto this surface.
    pub fn placed(&self) -> &[PlacedElement] {
        &self.placed
    }

    /// Remove all committed elements (clear-and-regenerate semantics).
    pub fn clear_placed(&mut self) {
        self.placed.clear();
    }

    pub(crate) fn commit(&mut self, element: PlacedElement) {
        self.placed.push(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wall() -> Surface {
        Surface::new(
            "south-wall",
            SurfaceKind::Wall,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 3.0),
                Point3::new(0.0, 0.0, 3.0),
            ],
        )
    }

    #[test]
    fn test_gross_area() {
        assert_relative_eq!(wall().gross_area(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clear_placed() {
        let mut surface = wall();
        surface.commit(PlacedElement::new(
            "w1".to_string(),
            0,
            1,
            0.0,
            [
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(2.0, 0.0, 1.0),
                Point3::new(2.0, 0.0, 2.0),
                Point3::new(1.0, 0.0, 2.0),
            ],
        ));
        assert_eq!(surface.placed().len(), 1);
        surface.clear_placed();
        assert!(surface.placed().is_empty());
    }

    #[test]
    fn test_buffered_grows_by_frame() {
        let element = PlacedElement::new(
            "w1".to_string(),
            0,
            1,
            0.05,
            [
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(2.0, 0.0, 1.0),
                Point3::new(2.0, 0.0, 2.0),
                Point3::new(1.0, 0.0, 2.0),
            ],
        );
        assert_relative_eq!(
            predicates::area(&element.buffered()),
            1.1 * 1.1,
            epsilon = 1e-9
        );
        assert_relative_eq!(element.area(), 1.0, epsilon = 1e-9);
    }
}
