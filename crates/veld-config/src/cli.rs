//! Command-line argument parsing for the Veld engine.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Veld engine command-line arguments.
///
/// CLI values override settings loaded from `veld.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "veld", about = "Veld engine adaptive quality demo")]
pub struct CliArgs {
    /// Target frame rate the controller steers toward.
    #[arg(long)]
    pub target_fps: Option<f64>,

    /// Force the mobile device profile (Medium initial tier).
    #[arg(long)]
    pub mobile: bool,

    /// Terrain world seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Active chunk radius around the viewer.
    #[arg(long)]
    pub active_radius: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(fps) = args.target_fps {
            self.quality.target_fps = fps;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(radius) = args.active_radius {
            self.terrain.active_radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
