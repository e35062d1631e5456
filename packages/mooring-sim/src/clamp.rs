//! clamp.rs — Feasible hull positions under the mooring lines
//!
//! Each line allows its attachment to sit anywhere within `max_stretch` of
//! its fixed point. At the attachment's current elevation that is a
//! horizontal half-width `sqrt(max² − dy²)`, zero once `dy ≥ max`. The hull
//! center must satisfy both lines and keep the bow off the dock face:
//!
//! ```text
//! bow:    |x − L/2 − dock.x|   ≤ allowed_bow
//! stern:  |x + L/2 − anchor.x| ≤ allowed_stern
//! dock:    x − L/2             ≥ dock.x
//! ```
//!
//! If the intervals do not intersect the hull goes to the middle of the gap.

use mooring_types::Point2D;

/// Horizontal reach of a line whose ends are `dy` apart vertically.
pub fn allowed_dx(max_stretch_cm: f64, dy_cm: f64) -> f64 {
    let dy = dy_cm.abs();
    if dy >= max_stretch_cm {
        0.0
    } else {
        (max_stretch_cm * max_stretch_cm - dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampInput {
    pub dock: Point2D,
    pub anchor: Point2D,
    pub boat_length_cm: f64,
    pub bow_attach_y_cm: f64,
    pub stern_attach_y_cm: f64,
    pub bow_max_stretch_cm: f64,
    pub stern_max_stretch_cm: f64,
}

/// Which limit stopped the hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    BowLine,
    SternLine,
    DockFace,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
    pub lo_bound: Bound,
    pub hi_bound: Bound,
}

impl Interval {
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }
}

/// Intersect the bow, stern and dock-face intervals for the hull center.
pub fn feasible_interval(input: &ClampInput) -> Interval {
    let half = input.boat_length_cm / 2.0;
    let bow = allowed_dx(input.bow_max_stretch_cm, input.bow_attach_y_cm - input.dock.y);
    let stern = allowed_dx(input.stern_max_stretch_cm, input.stern_attach_y_cm - input.anchor.y);

    let candidates_lo = [
        (input.dock.x - bow + half, Bound::BowLine),
        (input.anchor.x - stern - half, Bound::SternLine),
        (input.dock.x + half, Bound::DockFace),
    ];
    let candidates_hi = [(input.dock.x + bow + half, Bound::BowLine), (input.anchor.x + stern - half, Bound::SternLine)];

    let (lo, lo_bound) = candidates_lo
        .into_iter()
        .fold((f64::NEG_INFINITY, Bound::DockFace), |acc, c| if c.0 > acc.0 { c } else { acc });
    let (hi, hi_bound) = candidates_hi
        .into_iter()
        .fold((f64::INFINITY, Bound::BowLine), |acc, c| if c.0 < acc.0 { c } else { acc });

    Interval { lo, hi, lo_bound, hi_bound }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub x_cm: f64,
    pub velocity_cm_per_tick: f64,
    /// Limit the hull was pressed against, if any
    pub active: Option<Bound>,
    /// The lines and the dock left no room; the hull sits mid-gap
    pub infeasible: bool,
}

/// Move a candidate position into `interval`, dropping the velocity that
/// pushed it out.
pub fn clamp_position(x_cm: f64, velocity: f64, interval: &Interval) -> Clamped {
    if interval.is_empty() {
        return Clamped {
            x_cm: (interval.lo + interval.hi) / 2.0,
            velocity_cm_per_tick: 0.0,
            active: None,
            infeasible: true,
        };
    }
    if x_cm <= interval.lo {
        return Clamped {
            x_cm: interval.lo,
            velocity_cm_per_tick: velocity.max(0.0),
            active: Some(interval.lo_bound),
            infeasible: false,
        };
    }
    if x_cm >= interval.hi {
        return Clamped {
            x_cm: interval.hi,
            velocity_cm_per_tick: velocity.min(0.0),
            active: Some(interval.hi_bound),
            infeasible: false,
        };
    }
    Clamped { x_cm, velocity_cm_per_tick: velocity, active: None, infeasible: false }
}
