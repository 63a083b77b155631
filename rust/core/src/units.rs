// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared tolerances and standard opening dimensions
//!
//! All lengths are metres. Every tolerance-sensitive comparison in the
//! workspace routes through these constants so the whole engine shares one
//! numeric contract.

/// Pervasive length tolerance for point equality, coplanarity and extent
/// tests.
pub const TOL: f64 = 0.01;

/// Area-domain tolerance derived from [`TOL`], used by fit and overlap
/// tests.
pub const AREA_TOL: f64 = TOL * TOL;

/// Minimum meaningful offset/buffer distance (one inch). Requests below
/// this are treated as no-ops.
pub const MIN_OFFSET: f64 = 0.0254;

/// Standard door-head height (80 in).
pub const DEFAULT_HEAD_HEIGHT: f64 = 2.032;

/// Standard window sill height (30 in).
pub const DEFAULT_SILL_HEIGHT: f64 = 0.762;

/// Base minimum glass panel dimension before frame adjustment.
pub const MIN_GLASS_DIMENSION: f64 = 0.200;

/// Safety buffer kept between any opening (frame included) and the host
/// polygon boundary.
pub const EDGE_BUFFER: f64 = 0.0254;

/// Lower clamp bound for area ratios.
pub const RATIO_MIN: f64 = 0.05;

/// Upper clamp bound for area ratios.
pub const RATIO_MAX: f64 = 0.95;

/// Effective minimum glass dimension for a given frame width.
///
/// A framed panel narrower than three frame widths has no usable glass, so
/// the floor grows with the frame: `max(0.200, 3 * frame) - 2 * frame`.
#[inline]
pub fn min_glass_dimension(frame_width: f64) -> f64 {
    MIN_GLASS_DIMENSION.max(3.0 * frame_width) - 2.0 * frame_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_glass_unframed() {
        assert_eq!(min_glass_dimension(0.0), MIN_GLASS_DIMENSION);
    }

    #[test]
    fn test_min_glass_small_frame() {
        // 3 * 0.05 = 0.15 < 0.200, so the base dimension governs
        assert!((min_glass_dimension(0.05) - 0.100).abs() < 1e-12);
    }

    #[test]
    fn test_min_glass_wide_frame() {
        // 3 * 0.1 = 0.3 > 0.200, frame-driven floor
        assert!((min_glass_dimension(0.1) - 0.100).abs() < 1e-12);
    }

    #[test]
    fn test_area_tol_is_tol_squared() {
        assert_eq!(AREA_TOL, TOL * TOL);
    }
}
