//! Headless demo of the adaptive quality loop.
//!
//! Drives the runtime against a simulated renderer whose frame cost grows
//! with the loaded triangle count, so the controller has a real feedback
//! signal to steer: watch the tier, pixel ratio, and chunk resolutions react
//! as the viewer drifts across the terrain.
//!
//! Run with `cargo run -p veld-app` (desktop profile) or
//! `cargo run -p veld-app -- --mobile --target-fps 30` for the constrained
//! path.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;
use tracing::info;
use veld_app::{AdaptiveRuntime, RenderBackend};
use veld_config::{CliArgs, Config};
use veld_log::init_logging;
use veld_metrics::{Cadence, FrameCounters};
use veld_quality::DeviceProbe;
use veld_render::ViewerCamera;
use veld_terrain::HeightField;

/// Simulated wall-clock length of the demo.
const DEMO_DURATION_MS: f64 = 60_000.0;

/// Per-frame base cost in milliseconds (everything but terrain).
const BASE_FRAME_MS: f64 = 4.0;

/// Additional frame cost per terrain triangle, in milliseconds.
const COST_PER_TRIANGLE_MS: f64 = 3.0e-5;

struct SimulatedRenderer {
    pixel_ratio: f64,
    simplified_shadows: bool,
    triangles: u64,
}

impl SimulatedRenderer {
    /// Frame time for the current load. Pixel-ratio reductions pay off
    /// quadratically, which is what makes the emergency lever effective.
    fn frame_cost_ms(&self) -> f64 {
        let fill_scale = self.pixel_ratio * self.pixel_ratio;
        BASE_FRAME_MS + self.triangles as f64 * COST_PER_TRIANGLE_MS * fill_scale
    }
}

impl RenderBackend for SimulatedRenderer {
    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }
    fn set_simplified_shadows(&mut self, simplified: bool) {
        self.simplified_shadows = simplified;
    }
    fn frame_counters(&self) -> FrameCounters {
        let mut counters = FrameCounters {
            draw_calls: 1 + (self.triangles / 8192) as u32,
            triangles: self.triangles,
            geometries: (self.triangles / 8192) as u32,
            textures: 12,
            ..Default::default()
        };
        counters
            .system_times_ms
            .insert("terrain".to_string(), self.frame_cost_ms() - BASE_FRAME_MS);
        counters
    }
}

fn config_dir(args: &CliArgs) -> PathBuf {
    args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("veld"))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn main() {
    let args = CliArgs::parse();

    let mut config = match Config::load_or_create(&config_dir(&args)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config unavailable ({err}), using defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);
    init_logging(None, Some(&config));

    let probe = if args.mobile {
        DeviceProbe::mobile()
    } else {
        DeviceProbe::desktop()
    };
    let initial_pixel_ratio = probe.pixel_ratio;
    info!(class = ?probe.class, target_fps = config.quality.target_fps, "starting demo");

    let height = HeightField::from_config(&config.terrain);
    let mut runtime = AdaptiveRuntime::new(config, probe, Box::new(height), 0.0);

    let mut renderer = SimulatedRenderer {
        pixel_ratio: initial_pixel_ratio,
        simplified_shadows: false,
        triangles: 0,
    };
    let mut camera = ViewerCamera::new(
        Vec3::new(0.0, 60.0, 0.0),
        Vec3::NEG_Z,
        60f32.to_radians(),
        16.0 / 9.0,
    );

    let mut snapshot_cadence = Cadence::new(5000.0, 0.0);
    let mut now_ms = 0.0;

    while now_ms < DEMO_DURATION_MS {
        // The viewer drifts forward at 12 m/s
        let z = -(now_ms / 1000.0 * 12.0) as f32;
        camera.set_pose(Vec3::new(0.0, 60.0, z), Vec3::NEG_Z);

        runtime.frame(now_ms, &mut renderer, &camera);

        // The next frame renders whatever the pipeline now holds
        renderer.triangles = runtime.terrain().total_triangles();
        now_ms += renderer.frame_cost_ms();

        if snapshot_cadence.try_fire(now_ms) {
            let snapshot = runtime.snapshot(now_ms);
            info!(
                tier = %snapshot.tier,
                avg_fps = format!("{:.1}", snapshot.avg_fps),
                chunks = snapshot.active_chunks,
                visible = snapshot.visible_chunks,
                triangles = snapshot.terrain_triangles,
                pixel_ratio = format!("{:.2}", renderer.pixel_ratio),
                simplified_shadows = renderer.simplified_shadows,
                "snapshot"
            );
        }
    }

    let report = runtime.report();
    info!(
        tier = %runtime.tier(),
        distance_scale = runtime.distance_scale(),
        avg_fps = format!("{:.1}", report.averages.fps),
        min_fps = format!("{:.1}", report.peaks.min_fps),
        max_draw_calls = report.peaks.max_draw_calls,
        "demo finished"
    );
}
