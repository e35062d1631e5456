//! geometry.rs — Hull elevation, tilt and line attachment points
//!
//! The vertical position is not integrated. Each hull end is placed on its
//! local float line and then pushed into the band its mooring line allows:
//!
//! - the center never sits lower than the keel depth above the seabed
//! - a line that is too short to reach the water lifts its end (hanging)
//! - a line that is too short to let the end float up holds it under
//!
//! Tilt follows from the two end elevations; the attachment points sit on
//! deck, rotated with the hull.

use mooring_types::Point2D;

use crate::waves::WaveField;

/// Deck height above the hull center, and keel depth below it, per cm of length
pub const HULL_HALF_HEIGHT_RATIO: f64 = 0.15;
/// Steepest tilt the solver produces, as a sine
pub const MAX_TILT_SIN: f64 = 0.9;
/// List of a sinking hull (radians)
pub const SUNK_LIST_RAD: f64 = std::f64::consts::PI / 12.0;
/// A sunk hull comes to rest this far above the seabed, per cm of length
const SUNK_REST_RATIO: f64 = 0.3;

/// One line's reach, seen from the hull end it is tied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tether {
    pub fixed: Point2D,
    pub reach_cm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub center_y_cm: f64,
    /// Positive when the stern is higher than the bow
    pub angle_rad: f64,
    pub bow_attach: Point2D,
    pub stern_attach: Point2D,
    /// How far a line holds either end below its float line (cm, ≥ 0)
    pub forced_depth_cm: f64,
}

/// Vertical band for one hull end. Returns `(elevation, forced_depth)`.
fn settle_end(end_x: f64, natural_y: f64, deck: f64, tether: Tether) -> (f64, f64) {
    // keel depth equals deck height: the center stays that far off the bottom
    let mut y = natural_y.max(deck);

    let dx = (end_x - tether.fixed.x).abs();
    if dx < tether.reach_cm {
        let max_dy = (tether.reach_cm.powi(2) - dx * dx).sqrt();
        // hanging: cannot drop further than the line reaches below the fixed point
        y = y.max(tether.fixed.y - max_dy - deck);
        // held under: cannot float higher than the line reaches above it
        y = y.min(tether.fixed.y + max_dy - deck);
    }

    (y, (natural_y - y).max(0.0))
}

fn attach_points(x: f64, center_y: f64, angle: f64, half_len: f64, deck: f64) -> (Point2D, Point2D) {
    let (sin_a, cos_a) = angle.sin_cos();
    let rotate = |lx: f64, ly: f64| Point2D::new(x + lx * cos_a - ly * sin_a, center_y + lx * sin_a + ly * cos_a);
    (rotate(-half_len, deck), rotate(half_len, deck))
}

/// Solve the hull attitude at center `x_cm`. The bow end faces the dock
/// (`x − L/2`) and the stern end faces the anchor (`x + L/2`).
pub fn solve_attitude(x_cm: f64, length_cm: f64, waves: &WaveField, bow: Tether, stern: Tether) -> Attitude {
    let half = length_cm / 2.0;
    let deck = length_cm * HULL_HALF_HEIGHT_RATIO;

    let (bow_x, stern_x) = (x_cm - half, x_cm + half);
    let (bow_y, bow_forced) = settle_end(bow_x, waves.surface_at(bow_x), deck, bow);
    let (stern_y, stern_forced) = settle_end(stern_x, waves.surface_at(stern_x), deck, stern);

    let sin = ((stern_y - bow_y) / length_cm).clamp(-MAX_TILT_SIN, MAX_TILT_SIN);
    let angle = sin.asin();
    let center_y = (bow_y + stern_y) / 2.0;
    let (bow_attach, stern_attach) = attach_points(x_cm, center_y, angle, half, deck);

    Attitude {
        center_y_cm: center_y,
        angle_rad: angle,
        bow_attach,
        stern_attach,
        forced_depth_cm: bow_forced.max(stern_forced),
    }
}

/// Attitude of a flooded hull that has sunk `sink_offset_cm` below the
/// still surface, resting on the bottom at most.
pub fn sunk_attitude(x_cm: f64, length_cm: f64, surface_cm: f64, sink_offset_cm: f64) -> Attitude {
    let half = length_cm / 2.0;
    let deck = length_cm * HULL_HALF_HEIGHT_RATIO;
    let center_y = (surface_cm - sink_offset_cm).max(length_cm * SUNK_REST_RATIO);
    let (bow_attach, stern_attach) = attach_points(x_cm, center_y, SUNK_LIST_RAD, half, deck);
    Attitude { center_y_cm: center_y, angle_rad: SUNK_LIST_RAD, bow_attach, stern_attach, forced_depth_cm: 0.0 }
}
