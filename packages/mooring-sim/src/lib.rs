//! # mooring-sim
//!
//! A boat on two mooring lines: a rope from the bow to a dock and a
//! chain-plus-rope stern line to an anchor on the seabed, pushed around by
//! wind and waves.
//!
//! The core is synchronous and single-threaded. Build a
//! [`state::SimulationState`] from a [`config::SimConfig`], then call
//! [`sim::tick`] once per tick with that tick's [`config::Environment`]:
//!
//! ```no_run
//! use mooring_sim::{config::SimConfig, state::SimulationState, sim};
//!
//! let cfg = SimConfig::default();
//! let env = cfg.environment.clone();
//! let mut state = SimulationState::new(cfg)?;
//! for _ in 0..600 {
//!     let report = sim::tick(&mut state, &env);
//!     if report.numerical_instability() { break; }
//! }
//! println!("{}", state.snapshot().to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! `weather` and `presets` belong to the host: they produce environment
//! inputs and layouts, and nothing in the core depends on them.

pub mod anchor;
pub mod catenary;
pub mod clamp;
pub mod classifier;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod mooring_line;
pub mod presets;
pub mod seabed;
pub mod sim;
pub mod state;
pub mod waves;
pub mod weather;

pub use config::{Environment, SimConfig};
pub use error::ConfigError;
pub use sim::{tick, TickEvent, TickObserver, TickReport, TracingObserver};
pub use state::SimulationState;
