//! End-to-end tests of the measure → decide → actuate loop over simulated frames.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;
use veld_app::{AdaptiveRuntime, RenderBackend, VegetationCollaborator, WaterCollaborator};
use veld_config::Config;
use veld_lod::{DistanceBand, WaterDistances};
use veld_metrics::FrameCounters;
use veld_quality::{DeviceProbe, QualityTier};
use veld_render::ViewerCamera;
use veld_terrain::HeightField;

struct SimRenderer {
    pixel_ratio: f64,
    simplified_shadows: bool,
    triangles: u64,
}

impl RenderBackend for SimRenderer {
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
        FrameCounters {
            draw_calls: 96,
            triangles: self.triangles,
            ..Default::default()
        }
    }
}

struct SimVegetation {
    density: f64,
    regenerations: Rc<Cell<u32>>,
}

impl VegetationCollaborator for SimVegetation {
    fn density_scale(&self) -> f64 {
        self.density
    }
    fn set_density_scale(&mut self, scale: f64) {
        self.density = scale;
    }
    fn regenerate(&mut self) {
        self.regenerations.set(self.regenerations.get() + 1);
    }
    fn set_lod_distances(&mut self, _band: &DistanceBand) {}
}

struct SimWater {
    reflections: bool,
    recreations: Rc<Cell<u32>>,
}

impl WaterCollaborator for SimWater {
    fn reflection_enabled(&self) -> bool {
        self.reflections
    }
    fn recreate(&mut self, reflections: bool, _distances: &WaterDistances) {
        self.reflections = reflections;
        self.recreations.set(self.recreations.get() + 1);
    }
}

struct Harness {
    runtime: AdaptiveRuntime,
    renderer: SimRenderer,
    camera: ViewerCamera,
    regenerations: Rc<Cell<u32>>,
    recreations: Rc<Cell<u32>>,
    now_ms: f64,
}

impl Harness {
    fn new(probe: DeviceProbe) -> Self {
        let mut config = Config::default();
        config.terrain.active_radius = 1;
        let height = HeightField::from_config(&config.terrain);
        let mut runtime = AdaptiveRuntime::new(config, probe, Box::new(height), 0.0);

        let regenerations = Rc::new(Cell::new(0));
        let recreations = Rc::new(Cell::new(0));
        runtime.set_vegetation(Box::new(SimVegetation {
            density: 0.0,
            regenerations: Rc::clone(&regenerations),
        }));
        runtime.set_water(Box::new(SimWater {
            reflections: false,
            recreations: Rc::clone(&recreations),
        }));

        Self {
            runtime,
            renderer: SimRenderer {
                pixel_ratio: 1.0,
                simplified_shadows: false,
                triangles: 150_000,
            },
            camera: ViewerCamera::new(
                Vec3::new(0.0, 40.0, 0.0),
                Vec3::NEG_Z,
                60f32.to_radians(),
                16.0 / 9.0,
            ),
            regenerations,
            recreations,
            now_ms: 0.0,
        }
    }

    /// Run frames at `fps` until the simulated clock reaches `until_ms`.
    fn run_at(&mut self, fps: f64, until_ms: f64) {
        let dt_ms = 1000.0 / fps;
        while self.now_ms < until_ms {
            self.runtime
                .frame(self.now_ms, &mut self.renderer, &self.camera);
            self.now_ms += dt_ms;
        }
    }
}

/// Sustained poor performance walks the tier down to Low and then keeps
/// pulling the pixel-ratio emergency lever, which bottoms out at its floor.
#[test]
fn test_degrading_load_collapses_to_low_without_runaway() {
    let mut harness = Harness::new(DeviceProbe::desktop());

    // Benchmark window at target fps: seeds the middling tier
    harness.run_at(60.0, 2200.0);
    assert_eq!(harness.runtime.tier(), QualityTier::Medium);

    // Then 20 fps against a 60 fps target for half a minute
    harness.run_at(20.0, 32_000.0);

    assert_eq!(harness.runtime.tier(), QualityTier::Low);
    assert!(
        harness.renderer.pixel_ratio < 1.0,
        "emergency lever should have lowered the pixel ratio"
    );
    assert!(
        harness.renderer.pixel_ratio >= 0.6 - 1e-9,
        "pixel ratio must not fall below its floor, got {}",
        harness.renderer.pixel_ratio
    );
    let scale = harness.runtime.distance_scale();
    assert!((0.3..=1.0).contains(&scale));
    assert!(harness.runtime.terrain().chunk_count() > 0);
}

/// Sustained good performance raises the tier to High exactly once, flipping
/// water reflections on with a single recreation.
#[test]
fn test_improving_load_raises_to_high_once() {
    let mut harness = Harness::new(DeviceProbe::desktop());

    harness.run_at(60.0, 2200.0);
    assert_eq!(harness.runtime.tier(), QualityTier::Medium);
    let regenerations_after_seed = harness.regenerations.get();
    assert!(
        regenerations_after_seed >= 1,
        "seeding Medium should assign the vegetation density once"
    );

    // 100 fps with a light scene for twenty seconds
    harness.run_at(100.0, 22_000.0);

    assert_eq!(harness.runtime.tier(), QualityTier::High);
    assert_eq!(
        harness.recreations.get(),
        1,
        "reflections flip off->on exactly once"
    );
    assert_eq!(
        harness.regenerations.get(),
        regenerations_after_seed + 1,
        "only the Medium->High density change regenerates vegetation again"
    );
    assert_eq!(
        harness.renderer.pixel_ratio, 1.0,
        "no emergency ever fires on an improving device"
    );
}

/// Steady performance near target produces no transitions at all after the
/// benchmark seed: the hysteresis and trigger bands hold the tier stable.
#[test]
fn test_steady_load_does_not_oscillate() {
    let mut harness = Harness::new(DeviceProbe::desktop());

    harness.run_at(60.0, 2200.0);
    let seeded = harness.runtime.tier();
    let regenerations_after_seed = harness.regenerations.get();

    // One minute at target fps with a moderate scene
    harness.run_at(60.0, 62_000.0);

    assert_eq!(harness.runtime.tier(), seeded, "tier must hold steady");
    assert_eq!(
        harness.regenerations.get(),
        regenerations_after_seed,
        "no vegetation churn while the tier is stable"
    );
    assert_eq!(harness.recreations.get(), 0);
}

/// The distance table exposed by the runtime tracks the benchmark's scaling
/// factor and keeps its band ordering.
#[test]
fn test_distance_table_scaled_and_ordered() {
    let mut harness = Harness::new(DeviceProbe::mobile());

    // Fast device: benchmark grows the distance scale
    harness.run_at(100.0, 2200.0);
    let table = harness.runtime.distance_table();
    assert!(table.terrain.high < table.terrain.medium);
    assert!(table.terrain.medium < table.terrain.low);

    let base = veld_lod::LodDistanceTable::default();
    let scale = harness.runtime.distance_scale();
    assert!(
        (table.terrain.low - base.terrain.low * scale).abs() < 1e-9,
        "table must equal base times the scaling factor"
    );
}
