//! config.rs — Simulation parameters
//!
//! Everything the core needs to build a [`crate::state::SimulationState`],
//! deserialized from the `[environment]`, `[mooring]`, `[physics]` and
//! `[anchor]` tables of `config.toml`. Every field has a default, so a
//! partial file (or none at all) still yields a working harbor.

use mooring_types::{EnvironmentUpdate, MooringUpdate, WindDirection};
use serde::Deserialize;

use crate::error::{finite, non_negative, positive, unit_interval, ConfigError, ConfigResult};
use crate::mooring_line::{MooringLine, TensionModel};

// ── Environment ───────────────────────────────────────────────────────────────

/// Per-tick environment inputs. The host may replace these every tick
/// (weather generator) or hold them fixed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Water surface relative to the nominal datum, may be negative (cm)
    pub water_level_cm: f64,
    /// Nominal datum above the seabed (cm)
    pub seabed_depth_cm: f64,
    pub wave_height_cm: f64,
    /// Fixed dock attachment above the seabed (cm)
    pub dock_height_cm: f64,
    pub floating_dock: bool,
    pub wind_speed_ms: f64,
    pub wind_direction: WindDirection,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            water_level_cm: 20.0,
            seabed_depth_cm: 100.0,
            wave_height_cm: 10.0,
            dock_height_cm: 200.0,
            floating_dock: false,
            wind_speed_ms: 5.0,
            wind_direction: WindDirection::FromDock,
        }
    }
}

impl Environment {
    /// Elevation of the still-water surface above the seabed (cm).
    pub fn water_surface_cm(&self) -> f64 {
        self.seabed_depth_cm + self.water_level_cm
    }

    /// Wind speed signed along `+x` (toward the sea), m/s.
    pub fn signed_wind_ms(&self) -> f64 {
        self.wind_speed_ms * self.wind_direction.push_sign()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        finite("water_level_cm", self.water_level_cm)?;
        non_negative("seabed_depth_cm", self.seabed_depth_cm)?;
        non_negative("wave_height_cm", self.wave_height_cm)?;
        positive("dock_height_cm", self.dock_height_cm)?;
        non_negative("wind_speed_ms", self.wind_speed_ms)?;
        Ok(())
    }

    pub fn apply(&self, update: &EnvironmentUpdate) -> Self {
        let mut next = self.clone();
        if let Some(v) = update.water_level_cm { next.water_level_cm = v; }
        if let Some(v) = update.seabed_depth_cm { next.seabed_depth_cm = v; }
        if let Some(v) = update.wave_height_cm { next.wave_height_cm = v; }
        if let Some(v) = update.dock_height_cm { next.dock_height_cm = v; }
        if let Some(v) = update.floating_dock { next.floating_dock = v; }
        next
    }
}

// ── Mooring layout ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MooringConfig {
    pub stern_chain_length_cm: f64,
    pub stern_rope_length_cm: f64,
    pub bow_rope_length_cm: f64,
    /// Anchor distance from the dock face (cm)
    pub anchor_position_cm: f64,
    pub chain_thickness_mm: f64,
    pub boat_length_cm: f64,
    /// World x of the dock face (cm)
    pub dock_x_cm: f64,
}

impl Default for MooringConfig {
    fn default() -> Self {
        Self {
            stern_chain_length_cm: 497.0,
            stern_rope_length_cm: 203.0,
            bow_rope_length_cm: 120.0,
            anchor_position_cm: 1200.0,
            chain_thickness_mm: 10.0,
            boat_length_cm: 500.0,
            dock_x_cm: 0.0,
        }
    }
}

impl MooringConfig {
    pub fn stern_total_length_cm(&self) -> f64 {
        self.stern_chain_length_cm + self.stern_rope_length_cm
    }

    pub fn stern_chain_percent(&self) -> f64 {
        let total = self.stern_total_length_cm();
        if total > 0.0 { self.stern_chain_length_cm / total * 100.0 } else { 0.0 }
    }

    /// Split a stern line of `total_cm` into chain and rope by chain share.
    pub fn split_stern(&mut self, total_cm: f64, chain_percent: f64) {
        let chain = (total_cm * chain_percent / 100.0).round().clamp(0.0, total_cm.max(0.0));
        self.stern_chain_length_cm = chain;
        self.stern_rope_length_cm = total_cm - chain;
    }

    pub fn anchor_x_cm(&self) -> f64 {
        self.dock_x_cm + self.anchor_position_cm
    }

    pub fn validate(&self) -> ConfigResult<()> {
        positive("boat_length_cm", self.boat_length_cm)?;
        positive("bow_rope_length_cm", self.bow_rope_length_cm)?;
        non_negative("stern_chain_length_cm", self.stern_chain_length_cm)?;
        non_negative("stern_rope_length_cm", self.stern_rope_length_cm)?;
        positive("stern_total_length_cm", self.stern_total_length_cm())?;
        positive("chain_thickness_mm", self.chain_thickness_mm)?;
        finite("dock_x_cm", self.dock_x_cm)?;
        finite("anchor_position_cm", self.anchor_position_cm)?;
        if self.anchor_position_cm < self.boat_length_cm {
            return Err(ConfigError::AnchorTooClose {
                anchor_cm: self.anchor_position_cm,
                min_cm: self.boat_length_cm,
            });
        }
        Ok(())
    }

    /// Merge a partial update. Total stern length and chain share are
    /// converted into chain and rope lengths here.
    pub fn apply(&self, update: &MooringUpdate) -> ConfigResult<Self> {
        let mut next = self.clone();
        if update.stern_total_length_cm.is_some() || update.stern_chain_percent.is_some() {
            let total = update.stern_total_length_cm.unwrap_or_else(|| self.stern_total_length_cm());
            let percent = update.stern_chain_percent.unwrap_or_else(|| self.stern_chain_percent());
            if !(0.0..=100.0).contains(&percent) {
                return Err(ConfigError::ChainPercent(percent));
            }
            next.split_stern(total, percent);
        }
        if let Some(v) = update.bow_rope_length_cm { next.bow_rope_length_cm = v; }
        if let Some(v) = update.anchor_position_cm { next.anchor_position_cm = v; }
        if let Some(v) = update.chain_thickness_mm { next.chain_thickness_mm = v; }
        if let Some(v) = update.boat_length_cm { next.boat_length_cm = v; }
        next.validate()?;
        Ok(next)
    }
}

// ── Physics tunables ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub tension: TensionModel,
    pub air_density_kg_m3: f64,
    pub water_density_kg_m3: f64,
    pub drag_coefficient: f64,
    /// Linear water drag (N per m/s)
    pub linear_drag_n_per_ms: f64,
    /// Windage height per meter of hull (m)
    pub windage_height_m: f64,
    /// Submerged depth per meter of hull (m)
    pub draft_m: f64,
    /// Scales the aerodynamic wind force
    pub wind_tuning: f64,
    /// Velocity retained per tick
    pub velocity_damping: f64,
    pub rest_speed_cm_per_tick: f64,
    pub rest_force_n: f64,
    pub base_mass_kg: f64,
    pub mass_per_cm_kg: f64,
    pub reference_length_cm: f64,
    pub min_mass_kg: f64,
    pub bow_stretch_allowance: f64,
    pub stern_stretch_allowance: f64,
    /// Depth under its float line at which a held-down hull floods (cm)
    pub sink_threshold_cm: f64,
    pub sink_rate_cm_per_tick: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tension: TensionModel::default(),
            air_density_kg_m3: 1.225,
            water_density_kg_m3: 1000.0,
            drag_coefficient: 0.8,
            linear_drag_n_per_ms: 150.0,
            windage_height_m: 1.2,
            draft_m: 0.4,
            wind_tuning: 1.0,
            velocity_damping: 0.98,
            rest_speed_cm_per_tick: 0.01,
            rest_force_n: 50.0,
            base_mass_kg: 800.0,
            mass_per_cm_kg: 4.0,
            reference_length_cm: 300.0,
            min_mass_kg: 100.0,
            bow_stretch_allowance: 1.05,
            stern_stretch_allowance: 1.03,
            sink_threshold_cm: 5.0,
            sink_rate_cm_per_tick: 0.5,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        non_negative("tension.base_tension_n", self.tension.base_tension_n)?;
        positive("tension.stiffness_n_per_cm", self.tension.stiffness_n_per_cm)?;
        non_negative("air_density_kg_m3", self.air_density_kg_m3)?;
        positive("water_density_kg_m3", self.water_density_kg_m3)?;
        non_negative("drag_coefficient", self.drag_coefficient)?;
        non_negative("linear_drag_n_per_ms", self.linear_drag_n_per_ms)?;
        non_negative("windage_height_m", self.windage_height_m)?;
        non_negative("draft_m", self.draft_m)?;
        finite("wind_tuning", self.wind_tuning)?;
        unit_interval("velocity_damping", self.velocity_damping)?;
        non_negative("rest_speed_cm_per_tick", self.rest_speed_cm_per_tick)?;
        non_negative("rest_force_n", self.rest_force_n)?;
        finite("base_mass_kg", self.base_mass_kg)?;
        finite("mass_per_cm_kg", self.mass_per_cm_kg)?;
        finite("reference_length_cm", self.reference_length_cm)?;
        positive("min_mass_kg", self.min_mass_kg)?;
        for (field, value) in [("bow", self.bow_stretch_allowance), ("stern", self.stern_stretch_allowance)] {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::StretchAllowance { field, value });
            }
        }
        non_negative("sink_threshold_cm", self.sink_threshold_cm)?;
        non_negative("sink_rate_cm_per_tick", self.sink_rate_cm_per_tick)?;
        Ok(())
    }
}

// ── Anchor ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Stern tension the anchor resists before it starts to drag (N)
    pub holding_force_n: f64,
    pub drag_speed_cm_per_s: f64,
    /// No drag for this long after a (re)configuration (s)
    pub grace_period_s: f64,
    pub settle_rate_rad_per_tick: f64,
    pub max_settle_rad: f64,
    pub settle_decay: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            holding_force_n: 2000.0,
            drag_speed_cm_per_s: 10.0,
            grace_period_s: 5.0,
            settle_rate_rad_per_tick: 0.01,
            max_settle_rad: 0.6,
            settle_decay: 0.95,
        }
    }
}

impl AnchorConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        non_negative("holding_force_n", self.holding_force_n)?;
        non_negative("drag_speed_cm_per_s", self.drag_speed_cm_per_s)?;
        non_negative("grace_period_s", self.grace_period_s)?;
        non_negative("settle_rate_rad_per_tick", self.settle_rate_rad_per_tick)?;
        non_negative("max_settle_rad", self.max_settle_rad)?;
        unit_interval("settle_decay", self.settle_decay)?;
        Ok(())
    }
}

// ── Whole model ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_rate_hz: f64,
    pub environment: Environment,
    pub mooring: MooringConfig,
    pub physics: PhysicsConfig,
    pub anchor: AnchorConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            environment: Environment::default(),
            mooring: MooringConfig::default(),
            physics: PhysicsConfig::default(),
            anchor: AnchorConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.tick_rate_hz.is_finite() || !(1.0..=1000.0).contains(&self.tick_rate_hz) {
            return Err(ConfigError::TickRate(self.tick_rate_hz));
        }
        self.environment.validate()?;
        self.mooring.validate()?;
        self.physics.validate()?;
        self.anchor.validate()
    }

    /// Seconds per tick.
    pub fn dt_s(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }

    pub fn bow_line(&self) -> MooringLine {
        MooringLine::rope(self.mooring.bow_rope_length_cm, self.physics.bow_stretch_allowance)
    }

    pub fn stern_line(&self) -> MooringLine {
        MooringLine::chain_and_rope(
            self.mooring.stern_chain_length_cm,
            self.mooring.stern_rope_length_cm,
            self.mooring.chain_thickness_mm,
            self.physics.stern_stretch_allowance,
        )
    }

    /// Heuristic hull mass from length (kg).
    pub fn boat_mass_kg(&self) -> f64 {
        let p = &self.physics;
        (p.base_mass_kg + p.mass_per_cm_kg * (self.mooring.boat_length_cm - p.reference_length_cm)).max(p.min_mass_kg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.mooring.stern_total_length_cm(), 700.0);
        assert_eq!(cfg.environment.water_surface_cm(), 120.0);
        assert_eq!(cfg.boat_mass_kg(), 1600.0);
    }

    #[test]
    fn mass_stays_positive_for_tiny_boats() {
        let mut cfg = SimConfig::default();
        cfg.mooring.boat_length_cm = 10.0;
        assert_eq!(cfg.boat_mass_kg(), cfg.physics.min_mass_kg);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: SimConfig = toml::from_str(
            r#"
            [mooring]
            bow_rope_length_cm = 150.0

            [physics.tension]
            stiffness_n_per_cm = 250.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mooring.bow_rope_length_cm, 150.0);
        assert_eq!(cfg.mooring.boat_length_cm, 500.0);
        assert_eq!(cfg.physics.tension.stiffness_n_per_cm, 250.0);
        assert_eq!(cfg.physics.tension.base_tension_n, 1500.0);
    }

    #[test]
    fn stern_share_is_split_into_chain_and_rope() {
        let cfg = MooringConfig::default();
        let next = cfg
            .apply(&MooringUpdate { stern_total_length_cm: Some(1000.0), ..Default::default() })
            .unwrap();
        // share of the default layout is kept: 497 / 700
        assert_eq!(next.stern_chain_length_cm, 710.0);
        assert_eq!(next.stern_rope_length_cm, 290.0);

        let next = cfg.apply(&MooringUpdate { stern_chain_percent: Some(0.0), ..Default::default() }).unwrap();
        assert_eq!(next.stern_chain_length_cm, 0.0);
        assert_eq!(next.stern_rope_length_cm, 700.0);

        assert_eq!(
            cfg.apply(&MooringUpdate { stern_chain_percent: Some(120.0), ..Default::default() }),
            Err(ConfigError::ChainPercent(120.0))
        );
    }

    #[test]
    fn rejects_bad_layouts() {
        let mut m = MooringConfig::default();
        m.anchor_position_cm = 300.0;
        assert_eq!(m.validate(), Err(ConfigError::AnchorTooClose { anchor_cm: 300.0, min_cm: 500.0 }));

        let mut m = MooringConfig::default();
        m.bow_rope_length_cm = 0.0;
        assert!(matches!(m.validate(), Err(ConfigError::NotPositive { field: "bow_rope_length_cm", .. })));

        let mut p = PhysicsConfig::default();
        p.velocity_damping = 1.2;
        assert!(matches!(p.validate(), Err(ConfigError::OutOfRange { field: "velocity_damping", .. })));

        let mut p = PhysicsConfig::default();
        p.bow_stretch_allowance = 0.9;
        assert!(matches!(p.validate(), Err(ConfigError::StretchAllowance { field: "bow", .. })));

        let mut cfg = SimConfig::default();
        cfg.tick_rate_hz = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::TickRate(0.0)));
    }

    #[test]
    fn environment_update_touches_only_given_fields() {
        let env = Environment::default();
        let next = env.apply(&EnvironmentUpdate { floating_dock: Some(true), ..Default::default() });
        assert!(next.floating_dock);
        assert_eq!(next.water_level_cm, env.water_level_cm);
    }
}
