//! presets.rs — Named harbor situations selectable from the control socket
//!
//! Each preset is a full environment, a mooring layout and a weather mode.
//! Loading one reconfigures the simulation, so the anchor grace period
//! starts over.

use mooring_types::{WeatherMode, WindDirection};

use crate::config::{Environment, MooringConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub environment: Environment,
    pub mooring: MooringConfig,
    pub weather: WeatherMode,
}

impl Default for Preset {
    fn default() -> Self {
        Self { environment: Environment::default(), mooring: MooringConfig::default(), weather: WeatherMode::Off }
    }
}

pub const PRESET_NAMES: [&str; 5] = ["default", "calm", "storm", "short_scope", "low_water"];

pub fn by_name(name: &str) -> Option<Preset> {
    match name {
        "default" => Some(Preset::default()),
        "calm" => Some(preset_calm()),
        "storm" => Some(preset_storm()),
        "short_scope" => Some(preset_short_scope()),
        "low_water" => Some(preset_low_water()),
        _ => None,
    }
}

/// Still water, no wind: the boat should come to rest.
pub fn preset_calm() -> Preset {
    Preset {
        environment: Environment { wind_speed_ms: 0.0, wave_height_cm: 0.0, ..Environment::default() },
        ..Preset::default()
    }
}

/// Onshore gale over flat harbor water on a short stern line: the stern
/// pins at its stretch limit and the anchor drags once the grace period ends.
pub fn preset_storm() -> Preset {
    Preset {
        environment: Environment {
            wind_speed_ms: 35.0,
            wind_direction: WindDirection::FromSea,
            wave_height_cm: 0.0,
            ..Environment::default()
        },
        mooring: MooringConfig {
            stern_chain_length_cm: 300.0,
            stern_rope_length_cm: 100.0,
            anchor_position_cm: 900.0,
            ..MooringConfig::default()
        },
        weather: WeatherMode::Off,
    }
}

/// Anchor far out on little line: a moderate onshore wind holds the stern
/// near its stretch limit, short of dragging the anchor.
pub fn preset_short_scope() -> Preset {
    Preset {
        environment: Environment {
            wind_speed_ms: 15.0,
            wind_direction: WindDirection::FromSea,
            wave_height_cm: 2.0,
            ..Environment::default()
        },
        mooring: MooringConfig {
            stern_chain_length_cm: 250.0,
            stern_rope_length_cm: 250.0,
            anchor_position_cm: 1000.0,
            ..MooringConfig::default()
        },
        weather: WeatherMode::Off,
    }
}

/// Ebb far below the datum: the stern chain lies slack on the bottom and the
/// bow line alone holds the boat against an offshore breeze.
pub fn preset_low_water() -> Preset {
    Preset {
        environment: Environment { water_level_cm: -60.0, wind_speed_ms: 8.0, ..Environment::default() },
        mooring: MooringConfig { bow_rope_length_cm: 150.0, anchor_position_cm: 1100.0, ..MooringConfig::default() },
        weather: WeatherMode::Off,
    }
}
