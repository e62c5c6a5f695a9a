//! Core engine module
//!
//! Contains the tick driver, configuration, timing and diagnostics

mod config;
mod debug;
mod engine;
mod overlay;
mod time;

pub use config::{ConfigError, EngineConfig};
pub use debug::{DebugInfo, RateStats};
pub use engine::{Engine, EngineContext, EngineError, Game};
pub use overlay::{DebugOverlay, OverlayColor, OverlayFrame, OverlayShape};
pub use time::Time;
