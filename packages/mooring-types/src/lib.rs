//! # mooring-types
//!
//! Shared structures exchanged between the mooring simulation core, its host
//! loop and the rendering clients (telemetry snapshots, control commands).
//!
//! ## Coordinate Conventions
//!
//! - Units are centimeters, Newtons and simulation ticks.
//! - `x` is horizontal: the dock face sits at the dock x, the sea (and the
//!   anchor) lie toward `+x`.
//! - `y` is elevation above the seabed plane `y = 0` (not screen-down).
//!
//! Screen scaling, drawing and localisation are the renderer's business and
//! never appear in these types.

use serde::{Deserialize, Serialize};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Plain 2D point, centimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }

    pub fn dist(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool { self.x.is_finite() && self.y.is_finite() }
}

// ── Environment enums ─────────────────────────────────────────────────────────

/// Where the wind blows from. Serialized as `-1` / `1` like the UI toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum WindDirection {
    /// Blows from the dock out to sea: pushes the boat away from the dock
    /// and loads the bow line.
    FromDock,
    /// Blows from the sea onto the dock: pushes the boat toward the dock and
    /// loads the stern line.
    FromSea,
}

impl WindDirection {
    /// Sign of the push along `+x` (toward the sea).
    pub fn push_sign(self) -> f64 {
        match self {
            Self::FromDock => 1.0,
            Self::FromSea => -1.0,
        }
    }

    pub fn from_signed(value: f64) -> Self {
        if value >= 0.0 { Self::FromSea } else { Self::FromDock }
    }
}

impl From<WindDirection> for i8 {
    fn from(d: WindDirection) -> i8 {
        match d {
            WindDirection::FromDock => -1,
            WindDirection::FromSea => 1,
        }
    }
}

impl TryFrom<i8> for WindDirection {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Self::FromDock),
            1 => Ok(Self::FromSea),
            other => Err(format!("wind direction must be -1 or 1, got {other}")),
        }
    }
}

/// Scripted weather selector. Anything but `Off` means the host feeds
/// generated wind/water/wave values every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeatherMode {
    #[default]
    Off,
    Normal,
    Extreme,
}

// ── Status ────────────────────────────────────────────────────────────────────

/// Discrete mooring status, highest priority first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MooringStatus {
    /// Terminal: a mooring line held one end of the hull under water.
    Sunk,
    /// Bow line at its stretch limit while the wind loads it.
    Critical,
    /// Hull bow touching the dock face.
    Colliding,
    /// A loaded line is close to its stretch limit.
    Stressed,
    #[default]
    Normal,
}

/// How a solved line hangs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMode {
    /// Fully extended; tension comes from the elastic model.
    Straight,
    /// Free hanging chain between the two endpoints.
    Catenary,
    /// Near-vertical hang (endpoints horizontally closer than the solver
    /// can resolve).
    VerticalHang,
    /// Suspended catenary touching down on the seabed, then lying flat.
    SeabedTouchdown,
    /// Slack line hanging straight down and lying on the bottom.
    Resting,
}

// ── Telemetry (core → renderer) ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoatTelemetry {
    /// Hull center x (cm)
    pub x_cm: f64,
    /// Hull center elevation above the seabed (cm)
    pub y_cm: f64,
    /// Tilt, radians, positive = stern up
    pub angle_rad: f64,
    pub velocity_cm_per_tick: f64,
    pub length_cm: f64,
    pub mass_kg: f64,
    pub bow_attach: Point2D,
    pub stern_attach: Point2D,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineTelemetry {
    pub mode: LineMode,
    /// Sampled polyline, boat end first
    pub points: Vec<Point2D>,
    /// Straight-line distance between the endpoints (cm)
    pub distance_cm: f64,
    /// Distance at which the clamp stops the boat (cm)
    pub max_stretch_cm: f64,
    pub tension_n: f64,
    pub horizontal_tension_n: f64,
}

impl LineTelemetry {
    /// Share of the stretch limit in use, for the debug overlay.
    pub fn load_ratio(&self) -> f64 {
        if self.max_stretch_cm > 0.0 { self.distance_cm / self.max_stretch_cm } else { 0.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorTelemetry {
    pub position: Point2D,
    pub base_x_cm: f64,
    pub dragged: bool,
    /// Cosmetic rotation of the anchor icon (radians)
    pub settle_rotation_rad: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceTelemetry {
    pub wind_n: f64,
    pub water_drag_n: f64,
    pub bow_line_n: f64,
    pub stern_line_n: f64,
    pub net_n: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentTelemetry {
    pub wind_speed_ms: f64,
    pub wind_direction: WindDirection,
    pub water_surface_cm: f64,
    pub wave_amplitude_cm: f64,
    pub wave_phase_rad: f64,
    pub dock: Point2D,
}

/// Everything a renderer needs after one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub status: MooringStatus,
    pub is_sunk: bool,
    pub boat: BoatTelemetry,
    pub bow_line: LineTelemetry,
    pub stern_line: LineTelemetry,
    pub anchor: AnchorTelemetry,
    pub forces: ForceTelemetry,
    pub environment: EnvironmentTelemetry,
    /// Set on ticks where the integrator had to recover from a non-finite state
    pub numerical_instability: bool,
}

impl TickSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ── Control (renderer/UI → host) ──────────────────────────────────────────────

/// Partial mooring reconfiguration; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MooringUpdate {
    pub stern_total_length_cm: Option<f64>,
    pub stern_chain_percent: Option<f64>,
    pub bow_rope_length_cm: Option<f64>,
    pub anchor_position_cm: Option<f64>,
    pub chain_thickness_mm: Option<f64>,
    pub boat_length_cm: Option<f64>,
}

/// Partial environment update; ignored by the host for fields the active
/// weather mode is generating.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentUpdate {
    pub water_level_cm: Option<f64>,
    pub seabed_depth_cm: Option<f64>,
    pub wave_height_cm: Option<f64>,
    pub dock_height_cm: Option<f64>,
    pub floating_dock: Option<bool>,
}

/// Commands are JSON: `{ "cmd": "...", "args": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "args", rename_all = "snake_case")]
pub enum ControlCommand {
    Pause,
    Resume,
    Restart,
    SetSpeed { speed: f64 },
    SetWeather { mode: WeatherMode },
    SetWind { speed_ms: f64, direction: WindDirection },
    UpdateEnvironment(EnvironmentUpdate),
    UpdateMooring(MooringUpdate),
    Preset { name: String },
}

impl ControlCommand {
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
