//! weather.rs — Scripted weather and wind gusts for the host loop
//!
//! Produces the [`Environment`] fed into each tick. The core never calls
//! into this module; it only sees the numbers it hands out.
//!
//! - `OFF`: the base environment, held fixed.
//! - `NORMAL` / `EXTREME`: water level and a signed wind follow slow sine
//!   mixes; the wave height tracks the wind.
//!
//! Gusts are applied in every mode: a slow swell of the wind speed plus
//! optional Gaussian jitter.

use mooring_types::{WeatherMode, WindDirection};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use crate::config::Environment;

/// Script clock advance per weather update
const SCRIPT_STEP: f64 = 0.02;
/// Weather updates are spaced this far apart (s)
const SCRIPT_PERIOD_S: f64 = 0.05;
/// Gust clock advance per tick
const GUST_STEP: f64 = 0.02;
const GUST_SWING: f64 = 0.35;
const GUST_RATE: f64 = 0.45;
const MIN_WAVE_HEIGHT_CM: f64 = 5.0;
const WAVE_PER_WIND: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub mode: WeatherMode,
    /// Standard deviation of the random gust jitter (m/s); 0 disables it
    pub gust_jitter_ms: f64,
    /// Seed for the jitter; the same seed replays the same gusts
    pub seed: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { mode: WeatherMode::Off, gust_jitter_ms: 0.0, seed: 7 }
    }
}

/// Water level (cm) and signed wind (m/s) of a weather script at time `t`.
pub fn scripted(mode: WeatherMode, t: f64) -> Option<(f64, f64)> {
    match mode {
        WeatherMode::Off => None,
        WeatherMode::Normal => Some((
            (25.0 + 55.0 * (t * 0.1).sin()).round(),
            21.0 * ((t * 0.15).sin() * 0.6 + (t * 0.4).sin() * 0.4),
        )),
        WeatherMode::Extreme => Some((
            (35.0 + 135.0 * (t * 0.08).sin()).round(),
            30.0 * ((t * 0.12).sin() * 0.7 + (t * 0.5).sin() * 0.3),
        )),
    }
}

pub struct WeatherGenerator {
    mode: WeatherMode,
    script_clock: f64,
    since_update_s: f64,
    gust_clock: f64,
    jitter: Option<Normal<f64>>,
    rng: StdRng,
    /// Last scripted values, held between updates
    scripted: Option<(f64, f64)>,
}

impl WeatherGenerator {
    pub fn new(cfg: &WeatherConfig) -> Self {
        let jitter = if cfg.gust_jitter_ms > 0.0 { Normal::new(0.0, cfg.gust_jitter_ms).ok() } else { None };
        Self {
            mode: cfg.mode,
            script_clock: 0.0,
            since_update_s: 0.0,
            gust_clock: 0.0,
            jitter,
            rng: StdRng::seed_from_u64(cfg.seed),
            scripted: None,
        }
    }

    pub fn mode(&self) -> WeatherMode {
        self.mode
    }

    /// Switch script. Each switch starts the script from its beginning.
    pub fn set_mode(&mut self, mode: WeatherMode) {
        self.mode = mode;
        self.script_clock = 0.0;
        self.since_update_s = 0.0;
        self.scripted = None;
    }

    /// True when wind, water and waves come from the script, not the base.
    pub fn is_scripted(&self) -> bool {
        self.mode != WeatherMode::Off
    }

    /// Environment for the next tick of `dt_s` seconds.
    pub fn next(&mut self, base: &Environment, dt_s: f64) -> Environment {
        let mut env = base.clone();

        if self.is_scripted() {
            self.since_update_s += dt_s;
            if self.scripted.is_none() || self.since_update_s >= SCRIPT_PERIOD_S {
                self.since_update_s = 0.0;
                self.script_clock += SCRIPT_STEP;
                self.scripted = scripted(self.mode, self.script_clock);
            }
            if let Some((water, wind)) = self.scripted {
                let speed = wind.abs().round();
                env.water_level_cm = water;
                env.wind_speed_ms = speed;
                env.wind_direction = WindDirection::from_signed(wind);
                env.wave_height_cm = (speed * WAVE_PER_WIND).round().max(MIN_WAVE_HEIGHT_CM);
            }
        }

        self.gust_clock += GUST_STEP;
        let swell = 1.0 + (self.gust_clock * GUST_RATE).sin() * GUST_SWING + GUST_SWING;
        let jitter = self.jitter.map(|n| n.sample(&mut self.rng)).unwrap_or(0.0);
        env.wind_speed_ms = (env.wind_speed_ms * swell + jitter).max(0.0);
        env
    }
}
