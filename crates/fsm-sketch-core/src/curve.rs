//! Deterministic curve synthesis for transitions without a stored path.
//!
//! Distinct endpoints get a quadratic Bézier whose control point sits on the
//! perpendicular through the segment midpoint, always on the same side of
//! the `from -> to` direction. Reciprocal transitions therefore bend apart
//! instead of overlapping. Self-loops get a near-closed arc with fixed flags.

use std::fmt;

use log::trace;

use crate::{geometry::Point, model::CurvePath};

/// Default fraction of the segment vector used to offset the control point.
pub const DEFAULT_BEND: f64 = 0.2;

/// Default radius of a self-loop arc.
pub const DEFAULT_LOOP_RADIUS: f64 = 2.0;

/// Horizontal gap between the start and end of a self-loop arc.
///
/// SVG arcs whose endpoints coincide are not drawn at all.
pub const LOOP_GAP: f64 = 0.1;

/// Structured curve geometry, rendered to SVG path data on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// A quadratic Bézier: `M start Q control end`.
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    /// A circular arc: `M start A r r 0 large sweep end`.
    Arc {
        start: Point,
        radius: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
}

impl Curve {
    /// Renders the curve as opaque path data.
    pub fn to_path(&self) -> CurvePath {
        CurvePath::new(self.to_string())
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Quadratic {
                start,
                control,
                end,
            } => write!(f, "M {start} Q {control} {end}"),
            Curve::Arc {
                start,
                radius,
                large_arc,
                sweep,
                end,
            } => write!(
                f,
                "M {start} A {radius} {radius} 0 {} {} {end}",
                u8::from(*large_arc),
                u8::from(*sweep)
            ),
        }
    }
}

/// Computes curves for transitions that carry no explicit path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSynthesizer {
    bend: f64,
    loop_radius: f64,
}

impl Default for CurveSynthesizer {
    fn default() -> Self {
        Self {
            bend: DEFAULT_BEND,
            loop_radius: DEFAULT_LOOP_RADIUS,
        }
    }
}

impl CurveSynthesizer {
    /// Creates a synthesizer with a custom bend factor and self-loop radius.
    pub fn new(bend: f64, loop_radius: f64) -> Self {
        Self { bend, loop_radius }
    }

    pub fn bend(&self) -> f64 {
        self.bend
    }

    pub fn loop_radius(&self) -> f64 {
        self.loop_radius
    }

    /// Synthesizes the curve for a transition between `from` and `to`.
    ///
    /// When `is_self_loop` is set, `to` is ignored and a loop on `from` is
    /// produced.
    pub fn synthesize(&self, from: Point, to: Point, is_self_loop: bool) -> Curve {
        let curve = if is_self_loop {
            self.self_loop(from)
        } else {
            Curve::Quadratic {
                start: from,
                control: self.control_point(from, to),
                end: to,
            }
        };
        trace!(curve:?; "Synthesized curve");
        curve
    }

    /// Control point for a bent edge: midpoint plus the rotated segment scaled by `bend`.
    pub fn control_point(&self, from: Point, to: Point) -> Point {
        let offset = to.sub_point(from).perpendicular().scale(self.bend);
        from.midpoint(to).add_point(offset)
    }

    /// A near-closed arc that starts at `at` and ends just left of it.
    pub fn self_loop(&self, at: Point) -> Curve {
        Curve::Arc {
            start: at,
            radius: self.loop_radius,
            large_arc: true,
            sweep: true,
            end: at.sub_point(Point::new(LOOP_GAP, 0.0)),
        }
    }
}
