// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening specification records
//!
//! An [`OpeningSpec`] describes one requested sub-element (or an array of
//! identical sub-elements) to be placed on a host surface: a window, door
//! or skylight with its geometric constraint fields. The layout solver
//! resolves defaults, repairs conflicts and emits concrete rectangles from
//! these records; rejected records are deterministically zeroed so callers
//! can detect no-ops without error handling.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of sub-element requested by a specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OpeningKind {
    Window,
    Door,
    Skylight,
}

/// Kind of host surface an opening is placed on.
///
/// Drives ratio-based sizing defaults: walls keep the standard head/sill
/// band, horizontal surfaces centre a host-proportional rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SurfaceKind {
    Wall,
    RoofCeiling,
    Floor,
}

/// One requested opening (or array of identical openings) on a host
/// surface.
///
/// All numeric constraint fields are lengths in metres and must be
/// non-negative, except `centreline` which is a signed offset from the
/// host centreline. Unset optional fields are defaulted by the solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OpeningSpec {
    /// Identifier, unique per host surface.
    pub name: String,
    /// Element kind.
    pub kind: OpeningKind,
    /// Number of identical elements in the array.
    #[cfg_attr(feature = "serde", serde(default = "default_count"))]
    pub count: usize,
    /// Instance multiplier carried through to the emitted elements.
    #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
    pub multiplier: u32,
    /// Frame width around the glass, if framed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub frame_width: Option<f64>,
    /// Assigned construction/assembly reference, opaque to the solver.
    #[cfg_attr(feature = "serde", serde(default))]
    pub assembly: Option<String>,
    /// Fraction of the host gross area to glaze; forces `count = 1`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ratio: Option<f64>,
    /// Head height above the host base.
    #[cfg_attr(feature = "serde", serde(default))]
    pub head: Option<f64>,
    /// Sill height above the host base.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sill: Option<f64>,
    /// Element height.
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Option<f64>,
    /// Element width.
    #[cfg_attr(feature = "serde", serde(default))]
    pub width: Option<f64>,
    /// Edge-to-edge gap between adjacent array elements.
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: Option<f64>,
    /// Signed offset of the array centre from the host centreline.
    #[cfg_attr(feature = "serde", serde(default))]
    pub centreline: Option<f64>,
    /// Distance from the host's left jamb to the first element.
    #[cfg_attr(feature = "serde", serde(default))]
    pub left_buffer: Option<f64>,
    /// Distance from the host's right jamb to the last element.
    #[cfg_attr(feature = "serde", serde(default))]
    pub right_buffer: Option<f64>,
}

#[cfg(feature = "serde")]
fn default_count() -> usize {
    1
}

#[cfg(feature = "serde")]
fn default_multiplier() -> u32 {
    1
}

impl OpeningSpec {
    /// Create a specification with defaults for every optional field.
    pub fn new(name: impl Into<String>, kind: OpeningKind) -> Self {
        Self {
            name: name.into(),
            kind,
            count: 1,
            multiplier: 1,
            frame_width: None,
            assembly: None,
            ratio: None,
            head: None,
            sill: None,
            height: None,
            width: None,
            offset: None,
            centreline: None,
            left_buffer: None,
            right_buffer: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_frame_width(mut self, frame_width: f64) -> Self {
        self.frame_width = Some(frame_width);
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn with_head(mut self, head: f64) -> Self {
        self.head = Some(head);
        self
    }

    pub fn with_sill(mut self, sill: f64) -> Self {
        self.sill = Some(sill);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_centreline(mut self, centreline: f64) -> Self {
        self.centreline = Some(centreline);
        self
    }

    pub fn with_left_buffer(mut self, left_buffer: f64) -> Self {
        self.left_buffer = Some(left_buffer);
        self
    }

    pub fn with_right_buffer(mut self, right_buffer: f64) -> Self {
        self.right_buffer = Some(right_buffer);
        self
    }

    pub fn with_assembly(mut self, assembly: impl Into<String>) -> Self {
        self.assembly = Some(assembly.into());
        self
    }

    /// Validate field ranges before resolution.
    ///
    /// Every numeric field must be finite and non-negative except
    /// `centreline`, which only needs to be finite.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidSpecification(
                "specification name must not be empty".to_string(),
            ));
        }
        if self.count == 0 {
            return Err(Error::InvalidSpecification(format!(
                "'{}': count must be at least 1",
                self.name
            )));
        }
        let non_negative = [
            ("frame_width", self.frame_width),
            ("ratio", self.ratio),
            ("head", self.head),
            ("sill", self.sill),
            ("height", self.height),
            ("width", self.width),
            ("offset", self.offset),
            ("left_buffer", self.left_buffer),
            ("right_buffer", self.right_buffer),
        ];
        for (field, value) in non_negative {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::InvalidSpecification(format!(
                        "'{}': {} must be finite and non-negative, got {}",
                        self.name, field, v
                    )));
                }
            }
        }
        if let Some(c) = self.centreline {
            if !c.is_finite() {
                return Err(Error::InvalidSpecification(format!(
                    "'{}': centreline must be finite",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Zero the record so callers can detect a rejected specification:
    /// no elements, no dimensions.
    pub fn zero(&mut self) {
        self.count = 0;
        self.ratio = None;
        self.head = Some(0.0);
        self.sill = Some(0.0);
        self.height = Some(0.0);
        self.width = Some(0.0);
        self.offset = Some(0.0);
    }

    /// True once [`zero`](Self::zero) has been applied.
    pub fn is_zeroed(&self) -> bool {
        self.count == 0
    }
}
