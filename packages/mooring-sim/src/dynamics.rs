//! dynamics.rs — Horizontal boat dynamics
//!
//! One degree of freedom: the hull center `x`. Forces along `+x` (toward the
//! sea) are summed and integrated with semi-implicit Euler in cm/tick:
//!
//! ```text
//! v += F/m · 100 · dt²     (m/s² → cm/tick²)
//! v *= damping
//! x += v
//! ```
//!
//! Forces:
//! - wind:  `sign(w) · ½ρ_air · A_wind · w² · tuning`, `A_wind = L_m · windage height`
//! - water: `−sign(v) · ½ρ_w · Cd · A_sub · v² − c_lin · v`, `A_sub = L_m · draft`
//! - lines: horizontal tension, pulling the attachment toward its fixed point

use mooring_types::Point2D;

use crate::config::PhysicsConfig;
use crate::mooring_line::LineState;

/// Forces acting on the hull this tick (N, positive toward the sea).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceBreakdown {
    pub wind_n: f64,
    pub water_drag_n: f64,
    pub bow_line_n: f64,
    pub stern_line_n: f64,
    pub net_n: f64,
}

/// Integrator output before anchor drag and the clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x_cm: f64,
    pub velocity_cm_per_tick: f64,
    pub at_rest: bool,
    /// The step produced a non-finite value and was rolled back
    pub unstable: bool,
}

pub struct BoatDynamics<'a> {
    physics: &'a PhysicsConfig,
    dt_s: f64,
}

impl<'a> BoatDynamics<'a> {
    pub fn new(physics: &'a PhysicsConfig, dt_s: f64) -> Self {
        Self { physics, dt_s }
    }

    fn cm_per_tick_to_ms(&self, v: f64) -> f64 {
        v / (100.0 * self.dt_s)
    }

    pub fn wind_force_n(&self, signed_wind_ms: f64, length_cm: f64) -> f64 {
        let p = self.physics;
        let area = length_cm / 100.0 * p.windage_height_m;
        signed_wind_ms.signum() * 0.5 * p.air_density_kg_m3 * area * signed_wind_ms.powi(2) * p.wind_tuning
    }

    pub fn water_drag_n(&self, velocity_cm_per_tick: f64, length_cm: f64) -> f64 {
        let p = self.physics;
        let v = self.cm_per_tick_to_ms(velocity_cm_per_tick);
        if v == 0.0 {
            return 0.0;
        }
        let area = length_cm / 100.0 * p.draft_m;
        -v.signum() * 0.5 * p.water_density_kg_m3 * p.drag_coefficient * area * v * v - p.linear_drag_n_per_ms * v
    }

    /// Sum the forces on a hull of `length_cm` moving at `velocity`.
    pub fn forces(
        &self,
        signed_wind_ms: f64,
        length_cm: f64,
        velocity_cm_per_tick: f64,
        bow: (&LineState, Point2D, f64),
        stern: (&LineState, Point2D, f64),
    ) -> ForceBreakdown {
        let wind_n = self.wind_force_n(signed_wind_ms, length_cm);
        let water_drag_n = self.water_drag_n(velocity_cm_per_tick, length_cm);
        let bow_line_n = line_pull_n(bow.0, bow.1.x, bow.2);
        let stern_line_n = line_pull_n(stern.0, stern.1.x, stern.2);
        ForceBreakdown {
            wind_n,
            water_drag_n,
            bow_line_n,
            stern_line_n,
            net_n: wind_n + water_drag_n + bow_line_n + stern_line_n,
        }
    }

    /// Advance `x`/`v` one tick under `net_n` for a hull of `mass_kg`.
    pub fn integrate(&self, x_cm: f64, velocity_cm_per_tick: f64, net_n: f64, mass_kg: f64) -> Candidate {
        let p = self.physics;
        let accel = net_n / mass_kg * 100.0 * self.dt_s * self.dt_s;
        let mut v = (velocity_cm_per_tick + accel) * p.velocity_damping;

        let at_rest = v.abs() < p.rest_speed_cm_per_tick && net_n.abs() < p.rest_force_n;
        if at_rest {
            v = 0.0;
        }
        let x = x_cm + v;

        if !x.is_finite() || !v.is_finite() {
            return Candidate { x_cm, velocity_cm_per_tick: 0.0, at_rest: false, unstable: true };
        }
        Candidate { x_cm: x, velocity_cm_per_tick: v, at_rest, unstable: false }
    }
}

/// Horizontal pull of a line on its attachment at `attach_x`, toward the
/// fixed end at `fixed_x`.
pub fn line_pull_n(line: &LineState, attach_x: f64, fixed_x: f64) -> f64 {
    let dx = fixed_x - attach_x;
    if dx == 0.0 {
        return 0.0;
    }
    dx.signum() * line.horizontal_tension_n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mooring_line::{MooringLine, TensionModel};
    use approx::assert_relative_eq;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn wind_force_follows_the_quadratic_law() {
        let p = PhysicsConfig::default();
        let d = BoatDynamics::new(&p, DT);
        // 5 m hull → 6 m² windage
        assert_relative_eq!(d.wind_force_n(10.0, 500.0), 0.5 * 1.225 * 6.0 * 100.0, epsilon = 1e-9);
        assert_relative_eq!(d.wind_force_n(-10.0, 500.0), -0.5 * 1.225 * 6.0 * 100.0, epsilon = 1e-9);
        assert_eq!(d.wind_force_n(0.0, 500.0), 0.0);
    }

    #[test]
    fn water_drag_opposes_motion() {
        let p = PhysicsConfig::default();
        let d = BoatDynamics::new(&p, DT);
        assert!(d.water_drag_n(1.0, 500.0) < 0.0);
        assert!(d.water_drag_n(-1.0, 500.0) > 0.0);
        assert_eq!(d.water_drag_n(0.0, 500.0), 0.0);
        // 1 cm/tick = 0.6 m/s
        let expected = -(0.5 * 1000.0 * 0.8 * 2.0 * 0.36 + 150.0 * 0.6);
        assert_relative_eq!(d.water_drag_n(1.0, 500.0), expected, epsilon = 1e-9);
    }

    #[test]
    fn lines_pull_toward_their_fixed_points() {
        let model = TensionModel::default();
        let bow = MooringLine::rope(120.0, 1.05).solve_to_fixed(Point2D::new(130.0, 200.0), Point2D::new(0.0, 200.0), 0.0, &model);
        assert_eq!(bow.mode, mooring_types::LineMode::Straight);
        // attachment seaward of the dock: pulled toward -x
        assert!(line_pull_n(&bow, 130.0, 0.0) < 0.0);
        assert!(line_pull_n(&bow, -130.0, 0.0) > 0.0);
        assert_eq!(line_pull_n(&bow, 0.0, 0.0), 0.0);
    }

    #[test]
    fn constant_force_accelerates_then_damping_limits_speed() {
        let p = PhysicsConfig::default();
        let d = BoatDynamics::new(&p, DT);
        let (mut x, mut v) = (0.0, 0.0);
        for _ in 0..2_000 {
            let c = d.integrate(x, v, 1_000.0, 1_600.0);
            x = c.x_cm;
            v = c.velocity_cm_per_tick;
        }
        // terminal speed of the damped integrator: a·d / (1 − d)
        let a = 1_000.0 / 1_600.0 * 100.0 * DT * DT;
        assert_relative_eq!(v, a * 0.98 / 0.02, epsilon = 1e-6);
        assert!(x > 0.0);
    }

    #[test]
    fn small_motion_under_small_force_snaps_to_rest() {
        let p = PhysicsConfig::default();
        let d = BoatDynamics::new(&p, DT);
        let c = d.integrate(100.0, 0.005, 10.0, 1_600.0);
        assert!(c.at_rest);
        assert_eq!(c.velocity_cm_per_tick, 0.0);
        assert_eq!(c.x_cm, 100.0);

        // a real force keeps it moving
        let c = d.integrate(100.0, 0.005, 500.0, 1_600.0);
        assert!(!c.at_rest);
    }

    #[test]
    fn non_finite_step_is_rolled_back() {
        let p = PhysicsConfig::default();
        let d = BoatDynamics::new(&p, DT);
        let c = d.integrate(42.0, 1.0, f64::NAN, 1_600.0);
        assert!(c.unstable);
        assert_eq!(c.x_cm, 42.0);
        assert_eq!(c.velocity_cm_per_tick, 0.0);

        let c = d.integrate(42.0, f64::INFINITY, 0.0, 1_600.0);
        assert!(c.unstable);
    }
}
