//! sim.rs — The per-tick pipeline
//!
//! Strict order, one call per tick:
//!   1. environment inputs, wave field, dock attachment
//!   2. line shapes and tensions from last tick's attachment points
//!   3. dynamics candidate
//!   4. anchor drag
//!   5. constraint clamp
//!   6. attitude (elevation, tilt, attachment points) and the sinking check
//!   7. status classification
//!   8. lines re-solved at the final attachment points for the snapshot
//!
//! A sunk hull skips 2–5: it settles toward the bottom and stays put.

use mooring_types::{EnvironmentTelemetry, ForceTelemetry, MooringStatus, TickSnapshot};
use tracing::{debug, info, warn};

use crate::anchor::AnchorDragModel;
use crate::clamp::{clamp_position, feasible_interval, ClampInput};
use crate::classifier::{classify, StatusInput};
use crate::config::Environment;
use crate::dynamics::{BoatDynamics, ForceBreakdown};
use crate::geometry::{solve_attitude, sunk_attitude};
use crate::state::SimulationState;
use crate::waves::dock_attachment;

// ── Report ────────────────────────────────────────────────────────────────────

/// Noteworthy things that happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// The integrator produced a non-finite value; the hull was put back
    /// at its last good position and stopped.
    NumericalInstability { x_cm: f64 },
    /// The anchor started to drag for the first time.
    AnchorDragStarted { anchor_x_cm: f64, stern_tension_n: f64 },
    /// The lines and the dock face left no room; the hull sits mid-gap.
    InfeasibleConstraints { lo_cm: f64, hi_cm: f64 },
    /// A line held one end of the hull under water.
    Sunk { forced_depth_cm: f64 },
    StatusChanged { from: MooringStatus, to: MooringStatus },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub status: MooringStatus,
    pub events: Vec<TickEvent>,
}

impl TickReport {
    pub fn numerical_instability(&self) -> bool {
        self.events.iter().any(|e| matches!(e, TickEvent::NumericalInstability { .. }))
    }
}

// ── Observer hook ─────────────────────────────────────────────────────────────

/// Called after every tick with the updated state.
pub trait TickObserver {
    fn on_tick(&mut self, state: &SimulationState, report: &TickReport);
}

/// Does nothing; for callers that only want the report.
pub struct NullObserver;

impl TickObserver for NullObserver {
    fn on_tick(&mut self, _state: &SimulationState, _report: &TickReport) {}
}

/// Logs events through `tracing`, plus a debug summary every `summary_every` ticks.
pub struct TracingObserver {
    pub summary_every: u64,
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self { summary_every: 60 }
    }
}

impl TickObserver for TracingObserver {
    fn on_tick(&mut self, state: &SimulationState, report: &TickReport) {
        for event in &report.events {
            match event {
                TickEvent::NumericalInstability { x_cm } => {
                    warn!(tick = report.tick, x_cm, "numerical instability, hull stopped at last good position");
                }
                TickEvent::AnchorDragStarted { anchor_x_cm, stern_tension_n } => {
                    info!(tick = report.tick, anchor_x_cm, stern_tension_n, "⚓ anchor dragging");
                }
                TickEvent::InfeasibleConstraints { lo_cm, hi_cm } => {
                    debug!(tick = report.tick, lo_cm, hi_cm, "no feasible position, hull centered in gap");
                }
                TickEvent::Sunk { forced_depth_cm } => {
                    warn!(tick = report.tick, forced_depth_cm, "🛟 boat held under and sunk");
                }
                TickEvent::StatusChanged { from, to } => {
                    info!(tick = report.tick, ?from, ?to, "status changed");
                }
            }
        }

        if self.summary_every > 0 && report.tick % self.summary_every == 0 {
            debug!(
                tick = report.tick,
                x_cm = format_args!("{:.1}", state.boat.x_cm),
                v = format_args!("{:.3}", state.boat.velocity_cm_per_tick),
                bow_n = format_args!("{:.0}", state.bow.tension_n),
                stern_n = format_args!("{:.0}", state.stern.tension_n),
                anchor_x_cm = format_args!("{:.1}", state.anchor.x_cm),
                status = ?state.status,
                "tick"
            );
        }
    }
}

// ── Tick ──────────────────────────────────────────────────────────────────────

/// Advance the simulation by one tick under `env`.
pub fn tick(state: &mut SimulationState, env: &Environment) -> TickReport {
    let previous = state.status;
    let mut events = Vec::new();

    // 1. inputs
    state.tick += 1;
    state.ticks_since_reconfigure = state.ticks_since_reconfigure.saturating_add(1);
    state.environment = env.clone();
    let dt = state.dt_s();
    state.waves.advance(env, dt);
    state.dock = dock_attachment(state.config.mooring.dock_x_cm, env, &state.waves);
    state.numerical_instability = false;

    if state.is_sunk {
        sink(state);
    } else {
        float(state, env, &mut events);
    }

    // 7. status
    state.status = classify(&StatusInput {
        is_sunk: state.is_sunk,
        bow_distance_cm: state.boat.bow_attach.dist(&state.dock),
        bow_max_stretch_cm: state.bow_line.max_stretch_cm(),
        stern_distance_cm: state.boat.stern_attach.dist(&state.anchor.position()),
        stern_max_stretch_cm: state.stern_line.max_stretch_cm(),
        wind_speed_ms: env.wind_speed_ms,
        wind_direction: env.wind_direction,
        boat_x_cm: state.boat.x_cm,
        boat_length_cm: state.boat.length_cm,
        dock_x_cm: state.config.mooring.dock_x_cm,
    });
    if state.status != previous {
        events.push(TickEvent::StatusChanged { from: previous, to: state.status });
    }

    // 8. lines at the final attachment points
    state.solve_lines();

    TickReport { tick: state.tick, status: state.status, events }
}

/// [`tick`], then notify `observer`.
pub fn tick_observed(state: &mut SimulationState, env: &Environment, observer: &mut dyn TickObserver) -> TickReport {
    let report = tick(state, env);
    observer.on_tick(state, &report);
    report
}

fn float(state: &mut SimulationState, env: &Environment, events: &mut Vec<TickEvent>) {
    let dt = state.dt_s();

    // 2. lines from last tick's attachment points
    state.solve_lines();

    // 3. dynamics
    let dynamics = BoatDynamics::new(&state.config.physics, dt);
    let forces = dynamics.forces(
        env.signed_wind_ms(),
        state.boat.length_cm,
        state.boat.velocity_cm_per_tick,
        (&state.bow, state.boat.bow_attach, state.dock.x),
        (&state.stern, state.boat.stern_attach, state.anchor.x_cm),
    );
    let candidate = dynamics.integrate(state.boat.x_cm, state.boat.velocity_cm_per_tick, forces.net_n, state.boat.mass_kg);
    if candidate.unstable {
        state.numerical_instability = true;
        events.push(TickEvent::NumericalInstability { x_cm: candidate.x_cm });
    }
    state.forces = forces;

    // 4. anchor drag
    let floor = state.anchor_floor_x_cm();
    let drag = AnchorDragModel::new(&state.config.anchor, dt);
    let outcome = drag.step(&mut state.anchor, state.stern.tension_n, state.ticks_since_reconfigure, floor);
    if outcome.started {
        events.push(TickEvent::AnchorDragStarted { anchor_x_cm: state.anchor.x_cm, stern_tension_n: state.stern.tension_n });
    }

    // 5. clamp
    let interval = feasible_interval(&ClampInput {
        dock: state.dock,
        anchor: state.anchor.position(),
        boat_length_cm: state.boat.length_cm,
        bow_attach_y_cm: state.boat.bow_attach.y,
        stern_attach_y_cm: state.boat.stern_attach.y,
        bow_max_stretch_cm: state.bow_line.max_stretch_cm(),
        stern_max_stretch_cm: state.stern_line.max_stretch_cm(),
    });
    let clamped = clamp_position(candidate.x_cm, candidate.velocity_cm_per_tick, &interval);
    if clamped.infeasible {
        events.push(TickEvent::InfeasibleConstraints { lo_cm: interval.lo, hi_cm: interval.hi });
    }
    state.boat.x_cm = clamped.x_cm;
    state.boat.velocity_cm_per_tick = clamped.velocity_cm_per_tick;

    // 6. attitude
    let (bow, stern) = state.tethers();
    let att = solve_attitude(state.boat.x_cm, state.boat.length_cm, &state.waves, bow, stern);
    state.boat.apply_attitude(&att);
    if att.forced_depth_cm > state.config.physics.sink_threshold_cm {
        state.is_sunk = true;
        state.boat.velocity_cm_per_tick = 0.0;
        events.push(TickEvent::Sunk { forced_depth_cm: att.forced_depth_cm });
    }
}

fn sink(state: &mut SimulationState) {
    state.boat.sink_offset_cm += state.config.physics.sink_rate_cm_per_tick;
    state.boat.velocity_cm_per_tick = 0.0;
    state.forces = ForceBreakdown::default();
    let att = sunk_attitude(state.boat.x_cm, state.boat.length_cm, state.waves.still_surface_cm(), state.boat.sink_offset_cm);
    state.boat.apply_attitude(&att);
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

impl SimulationState {
    /// Advance one tick; see [`tick`].
    pub fn step(&mut self, env: &Environment) -> TickReport {
        tick(self, env)
    }

    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            tick: self.tick,
            status: self.status,
            is_sunk: self.is_sunk,
            boat: self.boat.telemetry(),
            bow_line: self.bow.telemetry(),
            stern_line: self.stern.telemetry(),
            anchor: self.anchor.telemetry(),
            forces: ForceTelemetry {
                wind_n: self.forces.wind_n,
                water_drag_n: self.forces.water_drag_n,
                bow_line_n: self.forces.bow_line_n,
                stern_line_n: self.forces.stern_line_n,
                net_n: self.forces.net_n,
            },
            environment: EnvironmentTelemetry {
                wind_speed_ms: self.environment.wind_speed_ms,
                wind_direction: self.environment.wind_direction,
                water_surface_cm: self.environment.water_surface_cm(),
                wave_amplitude_cm: self.waves.amplitude_cm,
                wave_phase_rad: self.waves.phase_rad,
                dock: self.dock,
            },
            numerical_instability: self.numerical_instability,
        }
    }
}
