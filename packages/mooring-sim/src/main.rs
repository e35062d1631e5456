//! main.rs — Mooring simulator host
//!
//! Runs two concurrent tasks:
//!   1. Sim loop: feeds weather into the core at `tick_rate_hz` (× speed)
//!      and broadcasts a JSON snapshot every few ticks
//!   2. WebSocket server: control panel on `ctrl_port` (pause/resume,
//!      weather, wind, mooring layout, presets) and live telemetry

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use clap::Parser;
use mooring_types::{ControlCommand, WeatherMode};
use serde::Deserialize;
use tokio::sync::{broadcast, RwLock};
use tokio::time::interval;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use mooring_sim::config::{AnchorConfig, Environment, MooringConfig, PhysicsConfig, SimConfig};
use mooring_sim::presets;
use mooring_sim::sim::{tick_observed, TracingObserver};
use mooring_sim::state::SimulationState;
use mooring_sim::weather::{WeatherConfig, WeatherGenerator};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mooring-sim", about = "Bow-and-stern mooring simulator")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    /// Simulation speed multiplier (1.0 = real-time)
    #[arg(long)]
    speed: Option<f64>,
    /// Control panel WebSocket port
    #[arg(long)]
    ctrl_port: Option<u16>,
    /// Start with a weather script (OFF, NORMAL, EXTREME)
    #[arg(long)]
    weather: Option<String>,
    /// Seed for the gust jitter
    #[arg(long)]
    seed: Option<u64>,
}

// ── Config file ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FullConfig {
    simulation: HostConfig,
    weather: WeatherConfig,
    environment: Environment,
    mooring: MooringConfig,
    physics: PhysicsConfig,
    anchor: AnchorConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct HostConfig {
    tick_rate_hz: f64,
    speed: f64,
    ctrl_port: u16,
    /// Broadcast a snapshot every N ticks
    telemetry_every: u64,
    /// Debug summary every N ticks
    log_every: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { tick_rate_hz: 60.0, speed: 1.0, ctrl_port: 9191, telemetry_every: 2, log_every: 60 }
    }
}

impl FullConfig {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            tick_rate_hz: self.simulation.tick_rate_hz,
            environment: self.environment.clone(),
            mooring: self.mooring.clone(),
            physics: self.physics.clone(),
            anchor: self.anchor.clone(),
        }
    }
}

fn parse_weather(raw: &str) -> Result<WeatherMode> {
    serde_json::from_value(serde_json::Value::String(raw.to_uppercase()))
        .with_context(|| format!("unknown weather mode '{raw}' (expected OFF, NORMAL or EXTREME)"))
}

// ── Shared state ──────────────────────────────────────────────────────────────

struct SimState {
    sim: SimulationState,
    weather: WeatherGenerator,
    /// Environment as set from the control panel; the weather script and
    /// gusts are layered on top of it each tick
    base_env: Environment,
    paused: bool,
    speed: f64,
    last_telemetry: Option<String>,
}

type SharedState = Arc<RwLock<SimState>>;

// ── Main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mooring_sim=info".into()),
        )
        .init();

    let args = Args::parse();

    let config_str = std::fs::read_to_string(&args.config).unwrap_or_else(|_| {
        info!("{} not found, using built-in defaults", args.config);
        include_str!("../config.toml").to_string()
    });
    let mut cfg: FullConfig = toml::from_str(&config_str).with_context(|| format!("invalid {}", args.config))?;

    if let Some(speed) = args.speed { cfg.simulation.speed = speed; }
    if let Some(port) = args.ctrl_port { cfg.simulation.ctrl_port = port; }
    if let Some(seed) = args.seed { cfg.weather.seed = seed; }
    if let Some(raw) = args.weather.as_deref() { cfg.weather.mode = parse_weather(raw)?; }

    let sim = SimulationState::new(cfg.sim_config()).context("invalid simulation config")?;

    info!(
        "⛵ Mooring simulator starting — {:.0} cm boat, bow line {:.0} cm, stern {:.0} cm chain + {:.0} cm rope, anchor at {:.0} cm",
        cfg.mooring.boat_length_cm,
        cfg.mooring.bow_rope_length_cm,
        cfg.mooring.stern_chain_length_cm,
        cfg.mooring.stern_rope_length_cm,
        cfg.mooring.anchor_position_cm,
    );

    let shared: SharedState = Arc::new(RwLock::new(SimState {
        sim,
        weather: WeatherGenerator::new(&cfg.weather),
        base_env: cfg.environment.clone(),
        paused: false,
        speed: cfg.simulation.speed.clamp(0.1, 20.0),
        last_telemetry: None,
    }));

    // Broadcast channel for telemetry (control panel)
    let (telem_tx, _) = broadcast::channel::<String>(64);
    let telem_tx = Arc::new(telem_tx);

    let shared_loop = shared.clone();
    let telem_tx_loop = telem_tx.clone();
    let tick_rate = cfg.simulation.tick_rate_hz;
    let telemetry_every = cfg.simulation.telemetry_every.max(1);
    let log_every = cfg.simulation.log_every;
    tokio::spawn(async move {
        sim_loop(shared_loop, telem_tx_loop, tick_rate, telemetry_every, log_every).await;
    });

    let ctrl_addr = format!("0.0.0.0:{}", cfg.simulation.ctrl_port);
    info!("🖥  Control panel WebSocket at ws://{ctrl_addr}/ws");

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "mooring-sim ok" }))
        .with_state((shared.clone(), telem_tx.clone()))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let listener = tokio::net::TcpListener::bind(&ctrl_addr)
        .await
        .with_context(|| format!("failed to bind {ctrl_addr}"))?;
    axum::serve(listener, app).await.context("control server stopped")?;
    Ok(())
}

// ── Simulation loop ───────────────────────────────────────────────────────────

async fn sim_loop(
    state: SharedState,
    telem: Arc<broadcast::Sender<String>>,
    tick_rate_hz: f64,
    telemetry_every: u64,
    log_every: u64,
) {
    let period = Duration::from_secs_f64(1.0 / tick_rate_hz);
    let mut ticker = interval(period);
    let mut observer = TracingObserver { summary_every: log_every };
    // Fractional ticks owed at speeds other than 1×
    let mut owed = 0.0_f64;

    info!("⚓ Sim loop running at {tick_rate_hz} Hz ({:.1} ms tick)", period.as_secs_f64() * 1000.0);

    loop {
        ticker.tick().await;

        let (paused, speed) = {
            let s = state.read().await;
            (s.paused, s.speed)
        };
        if paused { continue; }

        owed += speed;
        let due = owed.floor() as u32;
        owed -= due as f64;

        let telemetry = {
            let mut s = state.write().await;
            let s = &mut *s;
            let mut out = None;
            for _ in 0..due {
                let env = s.weather.next(&s.base_env, s.sim.dt_s());
                let report = tick_observed(&mut s.sim, &env, &mut observer);
                if report.tick % telemetry_every == 0 {
                    out = s.sim.snapshot().to_json().ok();
                }
            }
            if out.is_some() {
                s.last_telemetry = out.clone();
            }
            out
        };

        if let Some(json) = telemetry {
            let _ = telem.send(json);
        }
    }
}

// ── WebSocket control handler ─────────────────────────────────────────────────

async fn ws_handler(
    ws: WebSocketUpgrade,
    State((state, telem_tx)): State<(SharedState, Arc<broadcast::Sender<String>>)>,
) -> Response {
    ws.on_upgrade(move |socket| handle_ws(socket, state, telem_tx))
}

async fn handle_ws(mut socket: WebSocket, state: SharedState, telem_tx: Arc<broadcast::Sender<String>>) {
    let mut telem_rx = telem_tx.subscribe();

    // Send current state immediately on connect
    let last = state.read().await.last_telemetry.clone();
    if let Some(telem) = last {
        let _ = socket.send(Message::Text(telem)).await;
    }

    loop {
        tokio::select! {
            Ok(msg) = telem_rx.recv() => {
                if socket.send(Message::Text(msg)).await.is_err() { break; }
            }
            Some(Ok(Message::Text(raw))) = socket.recv() => {
                match ControlCommand::parse(&raw) {
                    Ok(cmd) => handle_command(&state, cmd).await,
                    Err(e) => warn!("Bad control command {raw}: {e}"),
                }
            }
            else => break,
        }
    }
}

/// Apply a command from the control panel. Takes effect on the next tick.
async fn handle_command(state: &SharedState, cmd: ControlCommand) {
    let mut s = state.write().await;
    match cmd {
        ControlCommand::Pause => { s.paused = true; info!("⏸ Sim paused"); }
        ControlCommand::Resume => { s.paused = false; info!("▶ Sim resumed"); }
        ControlCommand::Restart => {
            s.sim.restart();
            info!("↺ Sim restarted");
        }
        ControlCommand::SetSpeed { speed } => {
            s.speed = speed.clamp(0.1, 20.0);
            info!("⚡ Sim speed set to {}×", s.speed);
        }
        ControlCommand::SetWeather { mode } => {
            s.weather.set_mode(mode);
            if mode != WeatherMode::Off {
                s.sim.refloat();
            }
            info!("🌦 Weather mode {mode:?}");
        }
        ControlCommand::SetWind { speed_ms, direction } => {
            if s.weather.is_scripted() {
                warn!("Wind is scripted by the weather mode, ignoring set_wind");
                return;
            }
            let next = Environment { wind_speed_ms: speed_ms, wind_direction: direction, ..s.base_env.clone() };
            match next.validate() {
                Ok(()) => { s.base_env = next; info!("🌬 Wind {speed_ms} m/s {direction:?}"); }
                Err(e) => warn!("Rejected wind: {e}"),
            }
        }
        ControlCommand::UpdateEnvironment(update) => {
            let next = s.base_env.apply(&update);
            match next.validate() {
                Ok(()) => { s.base_env = next; info!("🌊 Environment updated"); }
                Err(e) => warn!("Rejected environment update: {e}"),
            }
        }
        ControlCommand::UpdateMooring(update) => {
            let applied = s.sim.config.mooring.apply(&update).and_then(|m| s.sim.reconfigure(m));
            match applied {
                Ok(()) => info!("🪢 Mooring reconfigured"),
                Err(e) => warn!("Rejected mooring update: {e}"),
            }
        }
        ControlCommand::Preset { name } => {
            let Some(preset) = presets::by_name(&name) else {
                warn!("Unknown preset: {name}");
                return;
            };
            if let Err(e) = s.sim.reconfigure(preset.mooring) {
                warn!("Preset '{name}' rejected: {e}");
                return;
            }
            s.base_env = preset.environment;
            s.weather.set_mode(preset.weather);
            s.sim.restart();
            info!("🎭 Preset '{name}' loaded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_parses_and_validates() {
        let cfg: FullConfig = toml::from_str(include_str!("../config.toml")).unwrap();
        assert_eq!(cfg.sim_config().validate(), Ok(()));
        assert_eq!(cfg.simulation.ctrl_port, 9191);
    }

    #[test]
    fn weather_flag_is_case_insensitive() {
        assert_eq!(parse_weather("extreme").unwrap(), WeatherMode::Extreme);
        assert!(parse_weather("tornado").is_err());
    }
}
