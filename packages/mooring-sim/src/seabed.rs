//! seabed.rs — Catenary solver for lines that run down to an anchor on the bottom
//!
//! Wraps [`solve_catenary`] and guarantees that no sampled point falls below
//! the seabed plane. Three outcomes:
//!
//! 1. The free catenary has no dip, or its dip clears the bottom by a margin →
//!    use it, with stray samples lifted onto the seabed.
//! 2. There is more line than `height + horizontal distance` → the line drops
//!    straight down from the boat and lies flat to the anchor, zero tension.
//! 3. Otherwise the line touches down tangentially: a suspended catenary arc
//!    of length `s` whose vertex sits on the seabed, followed by `L − s` of
//!    line resting flat. `s` is found by bisection.
//!
//! For the touchdown arc (vertex on the bottom, boat `h` above it):
//!
//! ```text
//! a = (s² − h²) / 2h          reach X = a·asinh(s / a)
//! X + (L − s) = D
//! ```

use mooring_types::{LineMode, Point2D};

use crate::catenary::{solve_catenary, CatenarySolution};

/// Clearance a dipping free curve must keep above the seabed to be accepted (cm)
pub const SEABED_MARGIN_CM: f64 = 1.0;
/// Hard cap on bisection steps
pub const MAX_BISECTION_ITERATIONS: u32 = 20;
/// Horizontal-balance error accepted by the bisection (cm)
pub const BISECTION_TOLERANCE_CM: f64 = 1.0;

const TOUCHDOWN_SEGMENTS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SeabedSolution {
    pub mode: LineMode,
    /// Shape parameter of the suspended part (cm); 0 when it carries no
    /// catenary tension.
    pub shape_param: f64,
    /// Boat end first, anchor last
    pub points: Vec<Point2D>,
    /// Where the line meets the bottom, if it does before the anchor
    pub touchdown: Option<Point2D>,
    /// Length of line off the bottom (cm)
    pub suspended_length_cm: f64,
    /// Solver iterations (Newton or bisection)
    pub iterations: u32,
}

impl SeabedSolution {
    fn from_free(sol: CatenarySolution, length: f64) -> Self {
        Self {
            mode: sol.mode,
            shape_param: sol.shape_param,
            points: sol.points,
            touchdown: None,
            suspended_length_cm: length,
            iterations: sol.iterations,
        }
    }

    /// Slack line: straight down, then flat along the bottom.
    fn resting(boat: Point2D, anchor: Point2D) -> Self {
        let foot = Point2D::new(boat.x, anchor.y);
        Self {
            mode: LineMode::Resting,
            shape_param: 0.0,
            points: vec![boat, foot, anchor],
            touchdown: Some(foot),
            suspended_length_cm: (boat.y - anchor.y).max(0.0),
            iterations: 0,
        }
    }

    /// True when the line exerts no horizontal pull on the boat.
    pub fn is_zero_tension(&self) -> bool {
        self.mode == LineMode::Resting
    }
}

/// Solve a line from `boat` down to `anchor`, which lies on the seabed
/// (`anchor.y` is the seabed elevation).
pub fn solve_on_seabed(boat: Point2D, anchor: Point2D, length: f64) -> SeabedSolution {
    let mut free = solve_catenary(boat, anchor, length);
    if free.is_straight() || clears_seabed(&free, boat, anchor) {
        clamp_to_seabed(&mut free.points, anchor.y);
        return SeabedSolution::from_free(free, length);
    }

    let h = boat.y - anchor.y;
    let d = (anchor.x - boat.x).abs();
    if length > h + d || h <= 0.0 {
        return SeabedSolution::resting(boat, anchor);
    }

    touchdown(boat, anchor, length, h, d)
}

/// The free curve is usable when its lowest point is an endpoint (no dip
/// between the ends) or when the dip stays `SEABED_MARGIN_CM` off the bottom.
fn clears_seabed(free: &CatenarySolution, boat: Point2D, anchor: Point2D) -> bool {
    let dips = free.lowest_y_cm < boat.y.min(anchor.y);
    (!dips && boat.y > anchor.y) || free.lowest_y_cm >= anchor.y + SEABED_MARGIN_CM
}

/// Horizontal reach of a suspended arc of length `s` hanging from height `h`
/// with its vertex on the bottom, together with its shape parameter.
fn suspended_reach(s: f64, h: f64) -> (f64, f64) {
    let a = (s * s - h * h) / (2.0 * h);
    if a <= f64::EPSILON {
        return (0.0, 0.0);
    }
    (a * (s / a).asinh(), a)
}

fn touchdown(boat: Point2D, anchor: Point2D, length: f64, h: f64, d: f64) -> SeabedSolution {
    // f(s) = X(s) + (L − s) − D rises from L − h − D ≤ 0 at s = h.
    let balance = |s: f64| suspended_reach(s, h).0 + (length - s) - d;

    let (mut lo, mut hi) = (h, length);
    let mut s = hi;
    let mut iterations = 0;
    if balance(hi) > 0.0 {
        for i in 0..MAX_BISECTION_ITERATIONS {
            iterations = i + 1;
            s = 0.5 * (lo + hi);
            let f = balance(s);
            if f.abs() <= BISECTION_TOLERANCE_CM {
                break;
            }
            if f < 0.0 { lo = s } else { hi = s }
        }
    }

    let (reach, a) = suspended_reach(s, h);
    if a <= 0.0 {
        return SeabedSolution::resting(boat, anchor);
    }

    let dir = if anchor.x >= boat.x { 1.0 } else { -1.0 };
    let touch = Point2D::new(boat.x + dir * reach, anchor.y);

    let mut points = Vec::with_capacity(TOUCHDOWN_SEGMENTS + 2);
    points.push(boat);
    for i in 1..TOUCHDOWN_SEGMENTS {
        // u: horizontal distance back from the touchdown point
        let u = reach * (1.0 - i as f64 / TOUCHDOWN_SEGMENTS as f64);
        points.push(Point2D::new(touch.x - dir * u, anchor.y + a * ((u / a).cosh() - 1.0)));
    }
    points.push(touch);
    if touch.dist(&anchor) > f64::EPSILON {
        points.push(anchor);
    }

    SeabedSolution {
        mode: LineMode::SeabedTouchdown,
        shape_param: a,
        points,
        touchdown: Some(touch),
        suspended_length_cm: s,
        iterations,
    }
}

/// Lift any sample that dipped under the seabed back onto it. Used for lines
/// whose lower end is not itself on the bottom.
pub fn clamp_to_seabed(points: &mut [Point2D], seabed_y: f64) {
    for p in points.iter_mut() {
        p.y = p.y.max(seabed_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catenary::polyline_length;
    use approx::assert_relative_eq;

    fn above_seabed(points: &[Point2D]) -> bool {
        points.iter().all(|p| p.y >= -1e-9)
    }

    #[test]
    fn nearly_taut_line_keeps_free_curve() {
        let boat = Point2D::new(0.0, 200.0);
        let anchor = Point2D::new(600.0, 0.0);
        let sol = solve_on_seabed(boat, anchor, boat.dist(&anchor) + 0.5);
        assert_eq!(sol.mode, LineMode::Catenary);
        assert!(sol.touchdown.is_none());
        assert!(sol.points.iter().all(|p| p.y >= anchor.y));
    }

    #[test]
    fn shallow_nearly_taut_line_never_goes_under() {
        let boat = Point2D::new(0.0, 50.0);
        let anchor = Point2D::new(800.0, 0.0);
        for slack in [0.02, 0.05, 0.1, 0.3, 1.0, 5.0] {
            let sol = solve_on_seabed(boat, anchor, boat.dist(&anchor) + slack);
            assert!(above_seabed(&sol.points), "slack {slack}: {:?}", sol.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min));
            assert_eq!(sol.points.first(), Some(&boat));
            assert!(sol.points[sol.points.len() - 1].dist(&anchor) < 1e-9);
        }
    }

    #[test]
    fn deep_dip_is_not_accepted_as_free_curve() {
        let boat = Point2D::new(0.0, 200.0);
        let anchor = Point2D::new(650.0, 0.0);
        let free = solve_catenary(boat, anchor, 760.0);
        assert!(!clears_seabed(&free, boat, anchor));
        assert_eq!(solve_on_seabed(boat, anchor, 760.0).mode, LineMode::SeabedTouchdown);
    }

    #[test]
    fn taut_line_is_straight() {
        let boat = Point2D::new(0.0, 200.0);
        let anchor = Point2D::new(600.0, 0.0);
        let sol = solve_on_seabed(boat, anchor, 400.0);
        assert_eq!(sol.mode, LineMode::Straight);
        assert_eq!(sol.points, vec![boat, anchor]);
    }

    #[test]
    fn excess_slack_rests_on_bottom_without_tension() {
        let boat = Point2D::new(0.0, 150.0);
        let anchor = Point2D::new(300.0, 0.0);
        let sol = solve_on_seabed(boat, anchor, 500.0);
        assert!(sol.is_zero_tension());
        assert_eq!(sol.iterations, 0);
        assert_eq!(sol.points, vec![boat, Point2D::new(0.0, 0.0), anchor]);
    }

    #[test]
    fn long_chain_touches_down_tangentially() {
        let boat = Point2D::new(0.0, 200.0);
        let anchor = Point2D::new(650.0, 0.0);
        let length = 760.0;
        let sol = solve_on_seabed(boat, anchor, length);

        assert_eq!(sol.mode, LineMode::SeabedTouchdown);
        assert!(sol.iterations <= MAX_BISECTION_ITERATIONS);
        assert!(above_seabed(&sol.points));

        let touch = sol.touchdown.expect("touchdown point");
        assert!(touch.x > boat.x && touch.x < anchor.x);
        assert_relative_eq!(touch.y, 0.0);

        // horizontal balance within the bisection tolerance
        let (reach, _) = suspended_reach(sol.suspended_length_cm, 200.0);
        let resting = length - sol.suspended_length_cm;
        assert!((reach + resting - 650.0).abs() <= BISECTION_TOLERANCE_CM);

        // sampled length close to the real one
        assert!((polyline_length(&sol.points) - length).abs() <= length * 0.01);
        assert_eq!(sol.points.first(), Some(&boat));
        assert_eq!(sol.points.last(), Some(&anchor));
    }

    #[test]
    fn touchdown_works_with_anchor_on_the_dock_side() {
        let boat = Point2D::new(900.0, 180.0);
        let anchor = Point2D::new(300.0, 0.0);
        let sol = solve_on_seabed(boat, anchor, 700.0);
        assert_eq!(sol.mode, LineMode::SeabedTouchdown);
        let touch = sol.touchdown.unwrap();
        assert!(touch.x < boat.x && touch.x > anchor.x);
        assert!(above_seabed(&sol.points));
    }

    #[test]
    fn grounded_boat_line_lies_flat() {
        let boat = Point2D::new(0.0, 0.0);
        let anchor = Point2D::new(400.0, 0.0);
        let sol = solve_on_seabed(boat, anchor, 450.0);
        assert!(sol.is_zero_tension());
        assert!(above_seabed(&sol.points));
    }

    #[test]
    fn clamp_lifts_points_to_bottom() {
        let mut pts = vec![Point2D::new(0.0, 5.0), Point2D::new(1.0, -3.0)];
        clamp_to_seabed(&mut pts, 0.0);
        assert_eq!(pts[1].y, 0.0);
        assert_eq!(pts[0].y, 5.0);
    }
}
