//! state.rs — Simulation state threaded through every tick
//!
//! Built once from a validated [`SimConfig`], mutated in place by
//! [`crate::sim::tick`], reset by [`SimulationState::restart`] and
//! re-laid-out by [`SimulationState::reconfigure`].

use mooring_types::{BoatTelemetry, MooringStatus, Point2D};

use crate::anchor::Anchor;
use crate::config::{Environment, MooringConfig, SimConfig};
use crate::dynamics::ForceBreakdown;
use crate::error::ConfigResult;
use crate::geometry::{solve_attitude, Attitude, Tether};
use crate::mooring_line::{LineState, MooringLine};
use crate::waves::{dock_attachment, WaveField};

// ── Boat ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Boat {
    pub x_cm: f64,
    pub velocity_cm_per_tick: f64,
    pub length_cm: f64,
    pub mass_kg: f64,
    pub center_y_cm: f64,
    pub angle_rad: f64,
    pub bow_attach: Point2D,
    pub stern_attach: Point2D,
    /// How far a sunk hull has settled below the surface (cm)
    pub sink_offset_cm: f64,
}

impl Boat {
    pub fn apply_attitude(&mut self, att: &Attitude) {
        self.center_y_cm = att.center_y_cm;
        self.angle_rad = att.angle_rad;
        self.bow_attach = att.bow_attach;
        self.stern_attach = att.stern_attach;
    }

    pub fn telemetry(&self) -> BoatTelemetry {
        BoatTelemetry {
            x_cm: self.x_cm,
            y_cm: self.center_y_cm,
            angle_rad: self.angle_rad,
            velocity_cm_per_tick: self.velocity_cm_per_tick,
            length_cm: self.length_cm,
            mass_kg: self.mass_kg,
            bow_attach: self.bow_attach,
            stern_attach: self.stern_attach,
        }
    }
}

// ── Simulation state ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: SimConfig,
    /// Inputs of the most recent tick
    pub environment: Environment,
    pub boat: Boat,
    pub bow_line: MooringLine,
    pub stern_line: MooringLine,
    pub anchor: Anchor,
    pub dock: Point2D,
    pub waves: WaveField,
    pub is_sunk: bool,
    pub status: MooringStatus,
    pub tick: u64,
    pub ticks_since_reconfigure: u64,
    /// Lines as solved at the end of the last tick
    pub bow: LineState,
    pub stern: LineState,
    pub forces: ForceBreakdown,
    pub numerical_instability: bool,
}

impl SimulationState {
    pub fn new(config: SimConfig) -> ConfigResult<Self> {
        config.validate()?;

        let environment = config.environment.clone();
        let waves = WaveField::new(&environment);
        let dock = dock_attachment(config.mooring.dock_x_cm, &environment, &waves);
        let anchor = Anchor::new(config.mooring.anchor_x_cm(), config.anchor.holding_force_n);
        let bow_line = config.bow_line();
        let stern_line = config.stern_line();

        let boat = Boat {
            x_cm: initial_x(&config.mooring),
            velocity_cm_per_tick: 0.0,
            length_cm: config.mooring.boat_length_cm,
            mass_kg: config.boat_mass_kg(),
            center_y_cm: environment.water_surface_cm(),
            angle_rad: 0.0,
            bow_attach: Point2D::default(),
            stern_attach: Point2D::default(),
            sink_offset_cm: 0.0,
        };

        let tension = config.physics.tension;
        let placeholder = bow_line.solve_to_fixed(dock, dock, 0.0, &tension);
        let mut state = Self {
            config,
            environment,
            boat,
            bow: placeholder.clone(),
            stern: placeholder,
            bow_line,
            stern_line,
            anchor,
            dock,
            waves,
            is_sunk: false,
            status: MooringStatus::Normal,
            tick: 0,
            ticks_since_reconfigure: 0,
            forces: ForceBreakdown::default(),
            numerical_instability: false,
        };
        state.settle();
        Ok(state)
    }

    /// Lines as tethers for the attitude solver.
    pub fn tethers(&self) -> (Tether, Tether) {
        (
            Tether { fixed: self.dock, reach_cm: self.bow_line.max_stretch_cm() },
            Tether { fixed: self.anchor.position(), reach_cm: self.stern_line.max_stretch_cm() },
        )
    }

    /// Re-solve attitude and lines at the current hull position.
    pub(crate) fn settle(&mut self) {
        let (bow, stern) = self.tethers();
        let att = solve_attitude(self.boat.x_cm, self.boat.length_cm, &self.waves, bow, stern);
        self.boat.apply_attitude(&att);
        self.solve_lines();
    }

    pub(crate) fn solve_lines(&mut self) {
        let tension = &self.config.physics.tension;
        self.bow = self.bow_line.solve_to_fixed(self.boat.bow_attach, self.dock, 0.0, tension);
        self.stern = self.stern_line.solve_to_anchor(self.boat.stern_attach, self.anchor.position(), tension);
    }

    /// Closest the anchor may drag toward the dock.
    pub fn anchor_floor_x_cm(&self) -> f64 {
        self.config.mooring.dock_x_cm + self.boat.length_cm
    }

    pub fn dt_s(&self) -> f64 {
        self.config.dt_s()
    }

    /// Back to the configured layout: anchor at its base, hull afloat at its
    /// starting position, all sticky flags cleared.
    pub fn restart(&mut self) {
        self.anchor.reset();
        self.boat.x_cm = initial_x(&self.config.mooring);
        self.boat.velocity_cm_per_tick = 0.0;
        self.boat.sink_offset_cm = 0.0;
        self.is_sunk = false;
        self.status = MooringStatus::Normal;
        self.tick = 0;
        self.ticks_since_reconfigure = 0;
        self.forces = ForceBreakdown::default();
        self.numerical_instability = false;
        self.waves = WaveField::new(&self.environment);
        self.dock = dock_attachment(self.config.mooring.dock_x_cm, &self.environment, &self.waves);
        self.settle();
    }

    /// Apply a new mooring layout. Restarts the anchor-drag grace period and
    /// puts the anchor back at its (new) base.
    pub fn reconfigure(&mut self, mooring: MooringConfig) -> ConfigResult<()> {
        mooring.validate()?;
        self.config.mooring = mooring;
        self.bow_line = self.config.bow_line();
        self.stern_line = self.config.stern_line();
        self.anchor = Anchor::new(self.config.mooring.anchor_x_cm(), self.config.anchor.holding_force_n);
        self.boat.length_cm = self.config.mooring.boat_length_cm;
        self.boat.mass_kg = self.config.boat_mass_kg();
        self.ticks_since_reconfigure = 0;
        self.settle();
        Ok(())
    }

    /// Clear a sinking without touching the layout.
    pub fn refloat(&mut self) {
        if self.is_sunk {
            self.is_sunk = false;
            self.boat.sink_offset_cm = 0.0;
            self.boat.velocity_cm_per_tick = 0.0;
            self.status = MooringStatus::Normal;
            self.settle();
        }
    }
}

/// Starting position: bow half a bow-line length off the dock face.
fn initial_x(mooring: &MooringConfig) -> f64 {
    mooring.dock_x_cm + mooring.boat_length_cm / 2.0 + mooring.bow_rope_length_cm / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use approx::assert_relative_eq;

    #[test]
    fn builds_afloat_off_the_dock() {
        let state = SimulationState::new(SimConfig::default()).unwrap();
        assert_eq!(state.boat.x_cm, 310.0);
        assert_eq!(state.anchor.x_cm, 1200.0);
        assert_eq!(state.dock, Point2D::new(0.0, 200.0));
        assert!(state.boat.bow_attach.x < state.boat.x_cm);
        assert!(state.boat.stern_attach.x > state.boat.x_cm);
        assert!(state.boat.center_y_cm > 100.0);
        assert!(!state.is_sunk);
        assert_relative_eq!(state.stern.max_stretch_cm, 497.0 + 203.0 * 1.03, epsilon = 1e-9);
    }

    #[test]
    fn rejects_invalid_config() {
        let mut cfg = SimConfig::default();
        cfg.mooring.boat_length_cm = -1.0;
        assert!(matches!(SimulationState::new(cfg), Err(ConfigError::NotPositive { field: "boat_length_cm", .. })));
    }

    #[test]
    fn reconfigure_resets_anchor_and_grace() {
        let mut state = SimulationState::new(SimConfig::default()).unwrap();
        state.anchor.x_cm = 1100.0;
        state.anchor.dragged = true;
        state.ticks_since_reconfigure = 900;

        let mut mooring = state.config.mooring.clone();
        mooring.anchor_position_cm = 1000.0;
        mooring.boat_length_cm = 600.0;
        state.reconfigure(mooring).unwrap();

        assert_eq!(state.anchor.x_cm, 1000.0);
        assert!(!state.anchor.dragged);
        assert_eq!(state.ticks_since_reconfigure, 0);
        assert_eq!(state.boat.length_cm, 600.0);
        assert_eq!(state.boat.mass_kg, 2000.0);
    }

    #[test]
    fn failed_reconfigure_keeps_layout() {
        let mut state = SimulationState::new(SimConfig::default()).unwrap();
        let mut mooring = state.config.mooring.clone();
        mooring.anchor_position_cm = 100.0;
        assert!(state.reconfigure(mooring).is_err());
        assert_eq!(state.config.mooring, MooringConfig::default());
    }

    #[test]
    fn restart_clears_sticky_flags() {
        let mut state = SimulationState::new(SimConfig::default()).unwrap();
        state.is_sunk = true;
        state.anchor.x_cm = 900.0;
        state.anchor.dragged = true;
        state.boat.x_cm = 600.0;
        state.boat.velocity_cm_per_tick = 3.0;
        state.restart();
        assert!(!state.is_sunk);
        assert!(!state.anchor.dragged);
        assert_eq!(state.anchor.x_cm, 1200.0);
        assert_eq!(state.boat.x_cm, 310.0);
        assert_eq!(state.boat.velocity_cm_per_tick, 0.0);
    }
}
