//! mooring_line.rs — Line weight and tension model
//!
//! A mooring line is rope at the boat end and (optionally) chain at the
//! anchor end. Its pull on the boat comes from one of two regimes:
//!
//! - **Taut** (straight): an elastic spring past its natural length,
//!   `T = base + stretch · stiffness`, of which `T·cos(elevation)` is horizontal.
//! - **Slack** (catenary / touchdown): the catenary identity `H = a · w`,
//!   where `w` is the weight per length of the part that is off the bottom.
//!   Capped at the base tension so the slack branch never exceeds the taut one.
//!
//! A line resting on the bottom, or hanging vertically, pulls nothing sideways.

use mooring_types::{LineMode, LineTelemetry, Point2D};
use serde::Deserialize;

use crate::catenary::solve_catenary;
use crate::seabed::{clamp_to_seabed, solve_on_seabed};

const GRAVITY: f64 = 9.81;
/// kg/m → N/cm
const KG_PER_M_TO_N_PER_CM: f64 = GRAVITY / 100.0;
/// Stud-less chain mass: 0.0225·d² kg/m with d in mm
const CHAIN_MASS_COEFF: f64 = 0.0225;
/// Mooring rope mass, kg/m
pub const ROPE_MASS_KG_PER_M: f64 = 0.5;

/// Elastic parameters shared by both lines.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TensionModel {
    /// Tension of a line that has just gone taut (N)
    pub base_tension_n: f64,
    /// Extra tension per cm of stretch (N/cm)
    pub stiffness_n_per_cm: f64,
}

impl Default for TensionModel {
    fn default() -> Self {
        Self { base_tension_n: 1500.0, stiffness_n_per_cm: 300.0 }
    }
}

// ── Line description ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MooringLine {
    pub chain_length_cm: f64,
    pub rope_length_cm: f64,
    pub chain_thickness_mm: f64,
    /// How far the rope part may stretch before the clamp stops the boat (×)
    pub rope_stretch_allowance: f64,
    pub chain_weight_n_per_cm: f64,
    pub rope_weight_n_per_cm: f64,
}

impl MooringLine {
    /// Chain at the anchor end, rope at the boat end.
    pub fn chain_and_rope(chain_length_cm: f64, rope_length_cm: f64, chain_thickness_mm: f64, rope_stretch_allowance: f64) -> Self {
        Self {
            chain_length_cm,
            rope_length_cm,
            chain_thickness_mm,
            rope_stretch_allowance,
            chain_weight_n_per_cm: CHAIN_MASS_COEFF * chain_thickness_mm.powi(2) * KG_PER_M_TO_N_PER_CM,
            rope_weight_n_per_cm: ROPE_MASS_KG_PER_M * KG_PER_M_TO_N_PER_CM,
        }
    }

    /// Pure rope (the bow line).
    pub fn rope(rope_length_cm: f64, rope_stretch_allowance: f64) -> Self {
        Self::chain_and_rope(0.0, rope_length_cm, 0.0, rope_stretch_allowance)
    }

    pub fn total_length_cm(&self) -> f64 {
        self.chain_length_cm + self.rope_length_cm
    }

    /// Distance at which the line is fully stretched; chain does not stretch.
    pub fn max_stretch_cm(&self) -> f64 {
        self.chain_length_cm + self.rope_length_cm * self.rope_stretch_allowance
    }

    /// Weight per cm of the lifted part of the line, for a given straight-line
    /// distance between its ends. Rope comes off the bottom first, then chain.
    pub fn effective_unit_weight(&self, distance_cm: f64) -> f64 {
        let lifted_rope = distance_cm.clamp(0.0, self.rope_length_cm);
        let lifted_chain = (distance_cm - self.rope_length_cm).clamp(0.0, self.chain_length_cm);
        let lifted = lifted_rope + lifted_chain;
        if lifted <= f64::EPSILON {
            return if self.rope_length_cm > 0.0 { self.rope_weight_n_per_cm } else { self.chain_weight_n_per_cm };
        }
        (lifted_rope * self.rope_weight_n_per_cm + lifted_chain * self.chain_weight_n_per_cm) / lifted
    }

    /// Solve a line running from the boat down to an anchor on the seabed.
    pub fn solve_to_anchor(&self, boat: Point2D, anchor: Point2D, model: &TensionModel) -> LineState {
        let length = self.total_length_cm();
        let sol = solve_on_seabed(boat, anchor, length);
        LineState::new(self, sol.mode, sol.shape_param, sol.points, boat, anchor, model)
    }

    /// Solve a line between the boat and a raised fixed point (the dock).
    pub fn solve_to_fixed(&self, boat: Point2D, fixed: Point2D, seabed_y: f64, model: &TensionModel) -> LineState {
        let length = self.total_length_cm();
        let mut sol = solve_catenary(boat, fixed, length);
        clamp_to_seabed(&mut sol.points, seabed_y);
        LineState::new(self, sol.mode, sol.shape_param, sol.points, boat, fixed, model)
    }
}

// ── Solved line ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LineState {
    pub mode: LineMode,
    pub shape_param: f64,
    /// Boat end first
    pub points: Vec<Point2D>,
    pub distance_cm: f64,
    pub max_stretch_cm: f64,
    pub unit_weight_n_per_cm: f64,
    /// Line tension (N): elastic tension when taut, catenary H otherwise
    pub tension_n: f64,
    /// Horizontal component acting on the boat (N, always ≥ 0)
    pub horizontal_tension_n: f64,
}

impl LineState {
    fn new(
        line: &MooringLine,
        mode: LineMode,
        shape_param: f64,
        points: Vec<Point2D>,
        boat: Point2D,
        far_end: Point2D,
        model: &TensionModel,
    ) -> Self {
        let distance_cm = boat.dist(&far_end);
        let unit_weight = line.effective_unit_weight(distance_cm);

        let (tension_n, horizontal_tension_n) = match mode {
            LineMode::Straight => {
                let stretch = (distance_cm - line.total_length_cm()).max(0.0);
                let tension = model.base_tension_n + stretch * model.stiffness_n_per_cm;
                let cos_elevation = if distance_cm > f64::EPSILON {
                    (far_end.x - boat.x).abs() / distance_cm
                } else {
                    0.0
                };
                (tension, tension * cos_elevation)
            }
            LineMode::Catenary | LineMode::SeabedTouchdown => {
                let h = (shape_param * unit_weight).abs().min(model.base_tension_n);
                (h, h)
            }
            LineMode::VerticalHang | LineMode::Resting => (0.0, 0.0),
        };

        Self {
            mode,
            shape_param,
            points,
            distance_cm,
            max_stretch_cm: line.max_stretch_cm(),
            unit_weight_n_per_cm: unit_weight,
            tension_n,
            horizontal_tension_n,
        }
    }

    pub fn load_ratio(&self) -> f64 {
        if self.max_stretch_cm > 0.0 { self.distance_cm / self.max_stretch_cm } else { 0.0 }
    }

    pub fn telemetry(&self) -> LineTelemetry {
        LineTelemetry {
            mode: self.mode,
            points: self.points.clone(),
            distance_cm: self.distance_cm,
            max_stretch_cm: self.max_stretch_cm,
            tension_n: self.tension_n,
            horizontal_tension_n: self.horizontal_tension_n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stern() -> MooringLine {
        MooringLine::chain_and_rope(500.0, 200.0, 10.0, 1.03)
    }

    #[test]
    fn unit_weights_follow_chain_thickness() {
        let line = stern();
        assert_relative_eq!(line.chain_weight_n_per_cm, 2.25 * 9.81 / 100.0, epsilon = 1e-12);
        assert_relative_eq!(line.rope_weight_n_per_cm, 0.5 * 9.81 / 100.0, epsilon = 1e-12);
        assert_relative_eq!(line.total_length_cm(), 700.0);
        assert_relative_eq!(line.max_stretch_cm(), 500.0 + 206.0, epsilon = 1e-9);

        let thick = MooringLine::chain_and_rope(500.0, 200.0, 16.0, 1.03);
        assert!(thick.chain_weight_n_per_cm > line.chain_weight_n_per_cm);
    }

    #[test]
    fn lifting_chain_raises_effective_weight() {
        let line = stern();
        // only rope off the bottom
        assert_relative_eq!(line.effective_unit_weight(150.0), line.rope_weight_n_per_cm, epsilon = 1e-12);
        let partly = line.effective_unit_weight(400.0);
        let fully = line.effective_unit_weight(700.0);
        assert!(partly > line.rope_weight_n_per_cm);
        assert!(fully > partly);
        assert!(fully < line.chain_weight_n_per_cm);
    }

    #[test]
    fn taut_line_is_an_elastic_spring() {
        let line = MooringLine::rope(120.0, 1.05);
        let model = TensionModel::default();
        let boat = Point2D::new(0.0, 0.0);
        let dock = Point2D::new(120.0 * 0.8 + 6.0 * 0.8, 120.0 * 0.6 + 6.0 * 0.6); // 126 cm away
        let state = line.solve_to_fixed(boat, dock, 0.0, &model);

        assert_eq!(state.mode, LineMode::Straight);
        assert_relative_eq!(state.tension_n, 1500.0 + 6.0 * 300.0, epsilon = 1e-6);
        assert_relative_eq!(state.horizontal_tension_n, state.tension_n * 0.8, epsilon = 1e-6);
    }

    #[test]
    fn slack_rope_is_nearly_weightless() {
        let line = MooringLine::rope(120.0, 1.05);
        let model = TensionModel::default();
        let state = line.solve_to_fixed(Point2D::new(0.0, 190.0), Point2D::new(80.0, 200.0), 0.0, &model);
        assert_eq!(state.mode, LineMode::Catenary);
        assert!(state.horizontal_tension_n < 5.0, "got {}", state.horizontal_tension_n);
    }

    #[test]
    fn chain_pulls_harder_than_rope_of_same_shape() {
        let model = TensionModel::default();
        let boat = Point2D::new(0.0, 195.0);
        let anchor = Point2D::new(600.0, 0.0);
        let chain = MooringLine::chain_and_rope(500.0, 200.0, 10.0, 1.03).solve_to_anchor(boat, anchor, &model);
        let rope = MooringLine::rope(700.0, 1.03).solve_to_anchor(boat, anchor, &model);
        assert_eq!(chain.mode, rope.mode);
        assert!(chain.horizontal_tension_n > rope.horizontal_tension_n);
        assert!(chain.horizontal_tension_n <= model.base_tension_n);
    }

    #[test]
    fn resting_line_has_no_pull() {
        let model = TensionModel::default();
        let state = stern().solve_to_anchor(Point2D::new(0.0, 100.0), Point2D::new(300.0, 0.0), &model);
        assert_eq!(state.mode, LineMode::Resting);
        assert_eq!(state.horizontal_tension_n, 0.0);
    }
}
