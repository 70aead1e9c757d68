//! Configuration system for the Veld engine.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! The adaptive-quality thresholds live here rather than as literals in the
//! decision engine: their exact values are tuning, only their ordering is
//! load-bearing, and `Config::validate` enforces that ordering.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, FpsRatioBands, LodConfig, QualityConfig, TerrainConfig, TriangleBands,
};
pub use error::ConfigError;
