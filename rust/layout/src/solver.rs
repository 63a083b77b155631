// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sub-element layout solver
//!
//! Converts opening specifications into concrete, non-overlapping
//! rectangles on a host surface. Resolution runs per specification
//! through a fixed pipeline - envelope, vertical, horizontal, emission -
//! clamping soft violations with a warning and zeroing the specification
//! on unrecoverable conflict. A failure in one specification never aborts
//! its siblings; partial success is success.
//!
//! The solver never rewrites caller-owned records: resolved values,
//! terminal state and emitted elements are returned as
//! [`ResolvedOpening`] values.

use fenestra_core::diagnostics::{self, Severity};
use fenestra_core::opening::{OpeningKind, OpeningSpec, SurfaceKind};
use fenestra_core::units::{
    DEFAULT_HEAD_HEIGHT, DEFAULT_SILL_HEIGHT, EDGE_BUFFER, MIN_OFFSET, RATIO_MAX, RATIO_MIN, TOL,
};
use fenestra_geometry::bool2d::contour_bounds;
use fenestra_geometry::canonical::to_2d;
use fenestra_geometry::{
    bool2d, canonicalize_full, fits, offset, overlaps, CanonicalOptions, Matrix4, Point3,
};
use rustc_hash::FxHashSet;

use crate::surface::{PlacedElement, Surface};

/// Solver tunables, defaulted from the shared dimension constants.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Safety buffer between any opening (frame included) and the host
    /// boundary.
    pub edge_buffer: f64,
    /// Head height used when a specification leaves it open.
    pub default_head: f64,
    /// Sill height used when a specification leaves it open.
    pub default_sill: f64,
    /// Route frame buffering through the boolean provider instead of the
    /// angle-bisector path.
    pub use_provider_offset: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            edge_buffer: EDGE_BUFFER,
            default_head: DEFAULT_HEAD_HEIGHT,
            default_sill: DEFAULT_SILL_HEIGHT,
            use_provider_offset: false,
        }
    }
}

/// Per-specification resolution progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    EnvelopeResolved,
    VerticallyResolved,
    HorizontallyResolved,
    /// At least one rectangle committed (possibly fewer than requested).
    Committed,
    /// No geometry emitted; the returned spec copy is zeroed.
    Rejected,
}

/// Resolution record returned per input specification.
#[derive(Debug, Clone)]
pub struct ResolvedOpening {
    /// Copy of the input with every resolved default written back, or
    /// zeroed on rejection.
    pub spec: OpeningSpec,
    pub state: ResolutionState,
    /// Elements committed for this specification, in emission order.
    pub elements: Vec<PlacedElement>,
}

impl ResolvedOpening {
    fn rejected(mut spec: OpeningSpec) -> Self {
        spec.zero();
        Self {
            spec,
            state: ResolutionState::Rejected,
            elements: Vec::new(),
        }
    }
}

/// Outcome of one solver call.
#[derive(Debug, Default)]
pub struct LayoutResult {
    pub resolved: Vec<ResolvedOpening>,
}

impl LayoutResult {
    /// Total number of committed elements across all specifications.
    pub fn committed_count(&self) -> usize {
        self.resolved.iter().map(|r| r.elements.len()).sum()
    }

    /// Number of rejected specifications.
    pub fn rejected_count(&self) -> usize {
        self.resolved
            .iter()
            .filter(|r| r.state == ResolutionState::Rejected)
            .count()
    }
}

/// The layout solver.
#[derive(Debug, Default)]
pub struct LayoutSolver {
    config: LayoutConfig,
}

impl LayoutSolver {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Place every specification on the host surface.
    ///
    /// Specifications are processed in order; each one resolves its
    /// defaults against the host envelope, then emits its rectangles
    /// left to right, committing each one onto the surface after the
    /// fit and collision checks pass.
    pub fn place(&self, surface: &mut Surface, specs: &[OpeningSpec]) -> LayoutResult {
        let mut result = LayoutResult::default();

        let host = match HostFrame::build(surface) {
            Some(host) => host,
            None => {
                for spec in specs {
                    result.resolved.push(ResolvedOpening::rejected(spec.clone()));
                }
                return result;
            }
        };

        let mut names: FxHashSet<&str> = FxHashSet::default();
        for spec in specs {
            if !names.insert(spec.name.as_str()) {
                diagnostics::record(
                    Severity::Warn,
                    format!("layout: duplicate specification name '{}'", spec.name),
                );
            }
            tracing::debug!(target: "fenestra", spec = %spec.name, "resolving opening");
            result.resolved.push(self.resolve_one(surface, &host, spec));
        }
        result
    }

    fn resolve_one(
        &self,
        surface: &mut Surface,
        host: &HostFrame,
        input: &OpeningSpec,
    ) -> ResolvedOpening {
        let mut spec = input.clone();

        if let Err(e) = spec.validate() {
            diagnostics::record(Severity::Error, format!("layout: {e}"));
            return ResolvedOpening::rejected(spec);
        }

        let Some(envelope) = self.resolve_envelope(host, &spec) else {
            return ResolvedOpening::rejected(spec);
        };

        let Some(mut vertical) = self.resolve_vertical(host, &envelope, &spec, surface.kind())
        else {
            return ResolvedOpening::rejected(spec);
        };

        let Some(horizontal) = self.resolve_horizontal(host, &envelope, &mut vertical, &mut spec)
        else {
            return ResolvedOpening::rejected(spec);
        };

        spec.head = Some(vertical.head);
        spec.sill = Some(vertical.sill);
        spec.height = Some(vertical.height);
        spec.width = Some(horizontal.width);

        let elements = self.emit(surface, host, &envelope, &vertical, &horizontal, &spec);
        if elements.is_empty() {
            return ResolvedOpening::rejected(spec);
        }

        spec.count = elements.len();
        ResolvedOpening {
            spec,
            state: ResolutionState::Committed,
            elements,
        }
    }

    /// Step 1: derive the geometric envelope the remaining steps clamp
    /// against.
    fn resolve_envelope(&self, host: &HostFrame, spec: &OpeningSpec) -> Option<Envelope> {
        let frame = spec.frame_width.unwrap_or(0.0);
        let min_glass = fenestra_core::units::min_glass_dimension(frame);
        let min_sill = self.config.edge_buffer + frame;
        let max_head = host.height - self.config.edge_buffer - frame;
        let min_jamb = self.config.edge_buffer + frame;
        let max_width = host.width - 2.0 * min_jamb;

        if max_head - min_sill < min_glass || max_width < min_glass {
            diagnostics::record(
                Severity::Error,
                format!(
                    "layout: '{}': host ({:.3} x {:.3}) cannot hold the minimum glass dimension",
                    spec.name, host.width, host.height
                ),
            );
            return None;
        }

        Some(Envelope {
            frame,
            min_glass,
            min_sill,
            max_head,
            min_jamb,
            max_width,
        })
    }

    /// Step 2: reconcile head, sill and height.
    fn resolve_vertical(
        &self,
        host: &HostFrame,
        env: &Envelope,
        spec: &OpeningSpec,
        kind: SurfaceKind,
    ) -> Option<Vertical> {
        let name = spec.name.as_str();

        let (head, sill) = match (spec.head, spec.sill, spec.height) {
            (Some(head), Some(sill), height) => {
                if let Some(h) = height {
                    if (head - sill - h).abs() > TOL {
                        diagnostics::record(
                            Severity::Warn,
                            format!(
                                "layout: '{name}': height {h:.3} conflicts with head/sill, \
                                 deriving height = head - sill"
                            ),
                        );
                    }
                }
                let head = self.clamp(name, "head", head, env.min_sill, env.max_head);
                let sill = self.clamp(name, "sill", sill, env.min_sill, env.max_head);
                (head, sill)
            }
            (Some(head), None, Some(height)) => {
                let head = self.clamp(name, "head", head, env.min_sill, env.max_head);
                let sill = self.clamp(name, "sill", head - height, env.min_sill, env.max_head);
                (head, sill)
            }
            (None, Some(sill), Some(height)) => {
                let sill = self.clamp(name, "sill", sill, env.min_sill, env.max_head);
                let head = self.clamp(name, "head", sill + height, env.min_sill, env.max_head);
                (head, sill)
            }
            (Some(head), None, None) => {
                let head = self.clamp(name, "head", head, env.min_sill, env.max_head);
                let sill =
                    self.clamp(name, "sill", self.config.default_sill, env.min_sill, env.max_head);
                (head, sill)
            }
            (None, Some(sill), None) => {
                let sill = self.clamp(name, "sill", sill, env.min_sill, env.max_head);
                let head =
                    self.clamp(name, "head", self.config.default_head, env.min_sill, env.max_head);
                (head, sill)
            }
            (None, None, Some(height)) => {
                // default head first, then push the band up if the sill
                // lands below its bound
                let mut head = self.config.default_head.min(env.max_head);
                let mut sill = head - height;
                if sill < env.min_sill {
                    sill = env.min_sill;
                    head = (sill + height).min(env.max_head);
                }
                if head - sill < height - TOL {
                    diagnostics::record(
                        Severity::Warn,
                        format!(
                            "layout: '{name}': height {height:.3} clamped to the available \
                             band {:.3}",
                            head - sill
                        ),
                    );
                }
                (head, sill)
            }
            (None, None, None) => {
                if spec.ratio.is_some() && kind != SurfaceKind::Wall {
                    // skylight-style sizing: a centred band proportional
                    // to the host aspect
                    let ratio = spec.ratio.unwrap_or(0.0).clamp(RATIO_MIN, RATIO_MAX);
                    let target = host.area * ratio;
                    let mut height = (target * host.height / host.width).sqrt();
                    height = height
                        .max(env.min_glass)
                        .min(env.max_head - env.min_sill);
                    let sill = env.min_sill.max((host.height - height) / 2.0);
                    let head = (sill + height).min(env.max_head);
                    (head, sill)
                } else {
                    // doors reach for the lowest allowed sill, windows
                    // take the standard band
                    let sill_default = match spec.kind {
                        OpeningKind::Door => env.min_sill,
                        _ => self.config.default_sill,
                    };
                    let sill = self.clamp(name, "sill", sill_default, env.min_sill, env.max_head);
                    let head =
                        self.clamp(name, "head", self.config.default_head, env.min_sill, env.max_head);
                    (head, sill)
                }
            }
        };

        let height = head - sill;
        if height < env.min_glass {
            diagnostics::record(
                Severity::Error,
                format!(
                    "layout: '{name}': head/sill band of {height:.3} collapses below the \
                     minimum glass dimension {:.3}",
                    env.min_glass
                ),
            );
            return None;
        }

        Some(Vertical { head, sill, height })
    }

    /// Step 3: resolve width, count and the horizontal origin.
    fn resolve_horizontal(
        &self,
        host: &HostFrame,
        env: &Envelope,
        vertical: &mut Vertical,
        spec: &mut OpeningSpec,
    ) -> Option<Horizontal> {
        let name = spec.name.clone();

        if let Some(ratio_raw) = spec.ratio {
            let ratio = self.clamp(&name, "ratio", ratio_raw, RATIO_MIN, RATIO_MAX);
            spec.ratio = Some(ratio);
            if spec.count != 1 {
                diagnostics::record(
                    Severity::Warn,
                    format!("layout: '{name}': ratio sizing forces count = 1, ignoring {}", spec.count),
                );
                spec.count = 1;
            }
            if spec.width.is_some() {
                diagnostics::record(
                    Severity::Warn,
                    format!("layout: '{name}': explicit width ignored with ratio sizing"),
                );
            }

            let target = host.area * ratio;
            let mut width = target / vertical.height;
            if width > env.max_width {
                // widen by raising the head, then lowering the sill
                width = env.max_width;
                let mut height = target / width;
                let head = (vertical.sill + height).min(env.max_head);
                let mut sill = vertical.sill;
                if head - sill < height {
                    sill = (head - height).max(env.min_sill);
                }
                if head - sill < height - TOL {
                    diagnostics::record(
                        Severity::Warn,
                        format!(
                            "layout: '{name}': ratio {ratio:.2} is not reachable within the \
                             host, clamping to the available band"
                        ),
                    );
                    height = head - sill;
                }
                if height < env.min_glass {
                    diagnostics::record(
                        Severity::Error,
                        format!("layout: '{name}': ratio sizing collapses below minimum glass"),
                    );
                    return None;
                }
                vertical.head = head;
                vertical.sill = sill;
                vertical.height = height;
            }
            if width < env.min_glass {
                diagnostics::record(
                    Severity::Error,
                    format!("layout: '{name}': ratio width {width:.3} below minimum glass"),
                );
                return None;
            }

            let x0 = self.horizontal_origin(host, env, spec, width, 0.0)?;
            spec.offset = Some(0.0);
            return Some(Horizontal {
                x0,
                width,
                step: 0.0,
                count: 1,
            });
        }

        if let Some(width_raw) = spec.width {
            let width = if width_raw < env.min_glass {
                diagnostics::record(
                    Severity::Warn,
                    format!(
                        "layout: '{name}': width {width_raw:.3} raised to the minimum glass \
                         dimension {:.3}",
                        env.min_glass
                    ),
                );
                env.min_glass
            } else {
                width_raw
            };

            let count = spec.count;
            let avail = host.width - 2.0 * env.min_jamb;
            let gap = match spec.offset {
                Some(gap) => gap,
                None => (avail - count as f64 * width) / (count as f64 + 1.0),
            };
            let span = count as f64 * width + count.saturating_sub(1) as f64 * gap;

            let x0 = self.horizontal_origin(host, env, spec, span, gap)?;
            spec.offset = Some(gap);
            return Some(Horizontal {
                x0,
                width,
                step: width + gap,
                count,
            });
        }

        diagnostics::record(
            Severity::Error,
            format!("layout: '{name}': specification has neither ratio nor width"),
        );
        None
    }

    /// Place a span of the given width inside the host jamb bounds,
    /// honoring centreline or left/right buffers. Rejects spans whose
    /// bounding box exceeds the host bounds.
    fn horizontal_origin(
        &self,
        host: &HostFrame,
        env: &Envelope,
        spec: &OpeningSpec,
        span: f64,
        gap: f64,
    ) -> Option<f64> {
        let name = spec.name.as_str();

        if spec.centreline.is_some() && (spec.left_buffer.is_some() || spec.right_buffer.is_some())
        {
            diagnostics::record(
                Severity::Warn,
                format!("layout: '{name}': centreline overrides left/right buffers"),
            );
        }
        if spec.centreline.is_none() && spec.left_buffer.is_some() && spec.right_buffer.is_some() {
            diagnostics::record(
                Severity::Warn,
                format!("layout: '{name}': both buffers given, using left_buffer"),
            );
        }

        let x0 = if let Some(centre) = spec.centreline {
            host.width / 2.0 + centre - span / 2.0
        } else if let Some(left) = spec.left_buffer {
            left
        } else if let Some(right) = spec.right_buffer {
            host.width - right - span
        } else if spec.offset.is_some() || spec.ratio.is_some() {
            // explicit gap or single ratio element: centre the span
            (host.width - span) / 2.0
        } else {
            // derived even distribution
            env.min_jamb + gap
        };

        if x0 < env.min_jamb - TOL || x0 + span > host.width - env.min_jamb + TOL {
            diagnostics::record(
                Severity::Error,
                format!(
                    "layout: '{name}': bounding box [{:.3}, {:.3}] exceeds the host jamb \
                     bounds [{:.3}, {:.3}]",
                    x0,
                    x0 + span,
                    env.min_jamb,
                    host.width - env.min_jamb
                ),
            );
            return None;
        }

        Some(x0)
    }

    /// Step 4: emit the array left to right, committing each rectangle
    /// that passes the fit and collision checks. The first failure
    /// aborts the remaining emissions; committed siblings stay.
    fn emit(
        &self,
        surface: &mut Surface,
        host: &HostFrame,
        env: &Envelope,
        vertical: &Vertical,
        horizontal: &Horizontal,
        spec: &OpeningSpec,
    ) -> Vec<PlacedElement> {
        let mut committed = Vec::new();

        for index in 0..horizontal.count {
            let x = horizontal.x0 + index as f64 * horizontal.step;
            let rect = host.rectangle(x, vertical.sill, x + horizontal.width, vertical.head);
            let probe = if env.frame >= MIN_OFFSET {
                offset(&rect.to_vec(), env.frame, self.config.use_provider_offset)
            } else {
                rect.to_vec()
            };

            if !fits(&probe, &host.polygon, true) {
                diagnostics::record(
                    Severity::Error,
                    format!(
                        "layout: '{}': element {index} does not fit the host, aborting \
                         remaining emissions",
                        spec.name
                    ),
                );
                break;
            }

            if let Some(hit) = surface
                .placed()
                .iter()
                .find(|p| overlaps(&probe, &p.buffered(), true))
            {
                diagnostics::record(
                    Severity::Error,
                    format!(
                        "layout: '{}': element {index} collides with '{}' [{}], aborting \
                         remaining emissions",
                        spec.name, hit.spec_name, hit.index
                    ),
                );
                break;
            }

            let element = PlacedElement::new(
                spec.name.clone(),
                index,
                spec.multiplier,
                env.frame,
                rect,
            );
            surface.commit(element.clone());
            committed.push(element);
        }

        committed
    }

    fn clamp(&self, name: &str, field: &str, value: f64, lo: f64, hi: f64) -> f64 {
        if value < lo {
            diagnostics::record(
                Severity::Warn,
                format!("layout: '{name}': {field} {value:.3} clamped up to {lo:.3}"),
            );
            lo
        } else if value > hi {
            diagnostics::record(
                Severity::Warn,
                format!("layout: '{name}': {field} {value:.3} clamped down to {hi:.3}"),
            );
            hi
        } else {
            value
        }
    }
}

/// Geometric envelope resolved once per specification.
#[derive(Debug, Clone, Copy)]
struct Envelope {
    frame: f64,
    min_glass: f64,
    min_sill: f64,
    max_head: f64,
    min_jamb: f64,
    max_width: f64,
}

/// Resolved vertical band.
#[derive(Debug, Clone, Copy)]
struct Vertical {
    head: f64,
    sill: f64,
    height: f64,
}

/// Resolved horizontal placement.
#[derive(Debug, Clone, Copy)]
struct Horizontal {
    x0: f64,
    width: f64,
    step: f64,
    count: usize,
}

/// The host surface's local frame: plane transform plus normalized
/// bounding extents, so layout math runs in `[0, width] x [0, height]`.
struct HostFrame {
    world_from_local: Matrix4<f64>,
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
    area: f64,
    polygon: Vec<Point3<f64>>,
}

impl HostFrame {
    fn build(surface: &Surface) -> Option<Self> {
        let canonical = match canonicalize_full(surface.vertices(), &CanonicalOptions::default()) {
            Ok(c) => c,
            Err(e) => {
                diagnostics::record(
                    Severity::Error,
                    format!("layout: host surface '{}': {e}", surface.name()),
                );
                return None;
            }
        };
        let contour = to_2d(&canonical.points);
        let (min, max) = contour_bounds(&contour)?;
        let area = bool2d::area(&contour);
        if area < TOL * TOL {
            diagnostics::record(
                Severity::Error,
                format!("layout: host surface '{}' has no area", surface.name()),
            );
            return None;
        }

        Some(Self {
            world_from_local: canonical.world_from_local,
            min_x: min.x,
            min_y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
            area,
            polygon: surface.vertices().to_vec(),
        })
    }

    /// Rectangle in the original 3D frame from normalized local
    /// coordinates.
    fn rectangle(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> [Point3<f64>; 4] {
        [
            self.to_world(x0, y0),
            self.to_world(x1, y0),
            self.to_world(x1, y1),
            self.to_world(x0, y1),
        ]
    }

    fn to_world(&self, x: f64, y: f64) -> Point3<f64> {
        self.world_from_local
            .transform_point(&Point3::new(self.min_x + x, self.min_y + y, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn host_4x3() -> (Surface, HostFrame) {
        let surface = Surface::new(
            "wall",
            SurfaceKind::Wall,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 3.0),
                Point3::new(0.0, 0.0, 3.0),
            ],
        );
        let host = HostFrame::build(&surface).unwrap();
        (surface, host)
    }

    fn envelope(solver: &LayoutSolver, host: &HostFrame, spec: &OpeningSpec) -> Envelope {
        solver.resolve_envelope(host, spec).unwrap()
    }

    #[test]
    fn test_host_frame_extents() {
        let (_, host) = host_4x3();
        assert_relative_eq!(host.width, 4.0, epsilon = 1e-9);
        assert_relative_eq!(host.height, 3.0, epsilon = 1e-9);
        assert_relative_eq!(host.area, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_head_and_sill_derive_height() {
        let solver = LayoutSolver::default();
        let (surface, host) = host_4x3();
        let spec = OpeningSpec::new("w", OpeningKind::Window)
            .with_head(2.2)
            .with_sill(0.9);
        let env = envelope(&solver, &host, &spec);
        let v = solver
            .resolve_vertical(&host, &env, &spec, surface.kind())
            .unwrap();
        assert_relative_eq!(v.height, 1.3, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_sill_only_takes_default_head() {
        let solver = LayoutSolver::default();
        let (surface, host) = host_4x3();
        let spec = OpeningSpec::new("w", OpeningKind::Window).with_sill(1.0);
        let env = envelope(&solver, &host, &spec);
        let v = solver
            .resolve_vertical(&host, &env, &spec, surface.kind())
            .unwrap();
        assert_relative_eq!(v.head, 2.032, epsilon = 1e-9);
        assert_relative_eq!(v.sill, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_band_below_min_glass_rejects() {
        let solver = LayoutSolver::default();
        let (surface, host) = host_4x3();
        let spec = OpeningSpec::new("w", OpeningKind::Window)
            .with_head(1.0)
            .with_sill(0.9);
        let env = envelope(&solver, &host, &spec);
        assert!(solver
            .resolve_vertical(&host, &env, &spec, surface.kind())
            .is_none());
    }

    #[test]
    fn test_horizontal_origin_rejects_out_of_bounds_centreline() {
        let solver = LayoutSolver::default();
        let (_, host) = host_4x3();
        let spec = OpeningSpec::new("w", OpeningKind::Window)
            .with_width(1.0)
            .with_centreline(2.0);
        let env = envelope(&solver, &host, &spec);
        // centre at 4.0 puts the right edge past the jamb bound
        assert!(solver.horizontal_origin(&host, &env, &spec, 1.0, 0.0).is_none());
    }

    #[test]
    fn test_clamp_limits() {
        let solver = LayoutSolver::default();
        assert_relative_eq!(solver.clamp("w", "head", 5.0, 0.0, 3.0), 3.0);
        assert_relative_eq!(solver.clamp("w", "sill", -1.0, 0.0, 3.0), 0.0);
        assert_relative_eq!(solver.clamp("w", "sill", 1.5, 0.0, 3.0), 1.5);
    }
}
