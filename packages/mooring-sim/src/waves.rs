//! waves.rs — Travelling surface wave and dock elevation
//!
//! Surface elevation at `x` is `surface + sin(x·k + phase) · amplitude`.
//! The wave runs in the direction the wind pushes, and its amplitude
//! breathes slowly around the configured wave height.

use std::f64::consts::PI;

use mooring_types::Point2D;

use crate::config::Environment;

pub const WAVELENGTH_CM: f64 = 600.0;
pub const WAVE_SPEED_CM_PER_S: f64 = 100.0;
/// Wave number `k = 2π / λ`
pub const WAVE_K: f64 = 2.0 * PI / WAVELENGTH_CM;
/// Floating dock attachment height above the local surface (cm)
pub const FLOATING_DOCK_FREEBOARD_CM: f64 = 15.0;

/// Modulation clock advance per tick
const CLOCK_STEP: f64 = 0.02;
const AMPLITUDE_SWING: f64 = 0.2;
const AMPLITUDE_RATE: f64 = 0.7;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveField {
    pub phase_rad: f64,
    pub amplitude_cm: f64,
    clock: f64,
    surface_cm: f64,
}

impl WaveField {
    pub fn new(env: &Environment) -> Self {
        Self {
            phase_rad: 0.0,
            amplitude_cm: env.wave_height_cm,
            clock: 0.0,
            surface_cm: env.water_surface_cm(),
        }
    }

    /// Advance by one tick of `dt_s` seconds under `env`.
    pub fn advance(&mut self, env: &Environment, dt_s: f64) {
        self.clock += CLOCK_STEP;
        self.amplitude_cm = env.wave_height_cm * (1.0 + AMPLITUDE_SWING * (self.clock * AMPLITUDE_RATE).sin());
        self.phase_rad -= WAVE_SPEED_CM_PER_S * dt_s * WAVE_K * env.wind_direction.push_sign();
        self.phase_rad %= 2.0 * PI;
        self.surface_cm = env.water_surface_cm();
    }

    /// Wave offset from the still surface at `x` (cm).
    pub fn offset(&self, x_cm: f64) -> f64 {
        (x_cm * WAVE_K + self.phase_rad).sin() * self.amplitude_cm
    }

    /// Absolute surface elevation above the seabed at `x` (cm).
    pub fn surface_at(&self, x_cm: f64) -> f64 {
        self.surface_cm + self.offset(x_cm)
    }

    pub fn still_surface_cm(&self) -> f64 {
        self.surface_cm
    }
}

/// Dock attachment point for this tick.
pub fn dock_attachment(dock_x_cm: f64, env: &Environment, waves: &WaveField) -> Point2D {
    let y = if env.floating_dock {
        waves.surface_at(dock_x_cm) + FLOATING_DOCK_FREEBOARD_CM
    } else {
        env.dock_height_cm
    };
    Point2D::new(dock_x_cm, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mooring_types::WindDirection;

    #[test]
    fn flat_sea_without_wave_height() {
        let env = Environment { wave_height_cm: 0.0, ..Environment::default() };
        let mut waves = WaveField::new(&env);
        for _ in 0..100 {
            waves.advance(&env, 1.0 / 60.0);
        }
        assert_eq!(waves.offset(123.0), 0.0);
        assert_eq!(waves.surface_at(-40.0), 120.0);
    }

    #[test]
    fn wave_runs_with_the_wind() {
        let env = Environment { wind_direction: WindDirection::FromDock, ..Environment::default() };
        let mut waves = WaveField::new(&env);
        waves.advance(&env, 1.0 / 60.0);
        // pushed toward +x: the phase decreases
        assert!(waves.phase_rad < 0.0);

        let env = Environment { wind_direction: WindDirection::FromSea, ..Environment::default() };
        let mut waves = WaveField::new(&env);
        waves.advance(&env, 1.0 / 60.0);
        assert!(waves.phase_rad > 0.0);
    }

    #[test]
    fn amplitude_stays_within_swing() {
        let env = Environment::default();
        let mut waves = WaveField::new(&env);
        for _ in 0..1000 {
            waves.advance(&env, 1.0 / 60.0);
            assert!(waves.amplitude_cm <= env.wave_height_cm * 1.2 + 1e-9);
            assert!(waves.amplitude_cm >= env.wave_height_cm * 0.8 - 1e-9);
        }
    }

    #[test]
    fn floating_dock_rides_the_surface() {
        let env = Environment { floating_dock: true, wave_height_cm: 0.0, ..Environment::default() };
        let waves = WaveField::new(&env);
        let dock = dock_attachment(0.0, &env, &waves);
        assert_relative_eq!(dock.y, env.water_surface_cm() + FLOATING_DOCK_FREEBOARD_CM);

        let fixed = Environment { floating_dock: false, ..env };
        assert_eq!(dock_attachment(0.0, &fixed, &waves).y, fixed.dock_height_cm);
    }
}
