//! The per-frame adaptive quality loop.

use serde::Serialize;
use tracing::info;
use veld_config::Config;
use veld_lod::{DistanceTableCache, LodDistanceTable};
use veld_metrics::{Cadence, FpsMeter, MetricsCollector, PerformanceReport, PerformanceSample};
use veld_quality::{
    AdaptiveQualityController, CapabilityBenchmark, DeviceProbe, QualityTier,
};
use veld_render::ViewerCamera;
use veld_terrain::{ChunkPipeline, TerrainHeight};

use crate::collaborators::{RenderBackend, VegetationCollaborator, WaterCollaborator};
use crate::propagation::Propagator;

/// Serializable per-frame state, for debug surfaces and logs.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeSnapshot {
    pub timestamp_ms: f64,
    pub tier: QualityTier,
    pub distance_scale: f64,
    pub benchmark_complete: bool,
    pub avg_fps: f64,
    pub sample_count: usize,
    pub active_chunks: usize,
    pub visible_chunks: usize,
    pub terrain_triangles: u64,
}

/// Owns the whole closed loop: sampling, benchmark, assessment, propagation,
/// and the terrain pipeline.
///
/// Everything happens synchronously inside [`frame`](Self::frame); there is
/// no background thread and no timer. The controller state and distance table
/// are written only inside the assessment step and read everywhere else,
/// which is safe here because the loop is single-threaded by construction.
pub struct AdaptiveRuntime {
    config: Config,
    probe: DeviceProbe,
    collector: MetricsCollector,
    fps: FpsMeter,
    sample_cadence: Cadence,
    controller: AdaptiveQualityController,
    benchmark: Option<CapabilityBenchmark>,
    table: DistanceTableCache,
    terrain: ChunkPipeline,
    propagator: Propagator,
    last_frame_ms: Option<f64>,
}

impl AdaptiveRuntime {
    /// Build the runtime; the benchmark window starts at `now_ms`.
    pub fn new(
        config: Config,
        probe: DeviceProbe,
        height: Box<dyn TerrainHeight>,
        now_ms: f64,
    ) -> Self {
        let controller = AdaptiveQualityController::new(&config.quality, &probe, now_ms);
        let table = DistanceTableCache::new(
            LodDistanceTable::from_config(&config.lod),
            controller.distance_scale(),
        );
        let terrain = ChunkPipeline::new(
            &config.terrain,
            probe.class,
            controller.preset().terrain_lod,
            height,
        );
        let benchmark = CapabilityBenchmark::new(now_ms, config.quality.benchmark_window_ms);

        Self {
            collector: MetricsCollector::new(config.quality.sample_capacity),
            fps: FpsMeter::new(now_ms),
            sample_cadence: Cadence::new(config.quality.reporting_interval_ms, now_ms),
            controller,
            benchmark: Some(benchmark),
            table,
            terrain,
            propagator: Propagator::default(),
            last_frame_ms: None,
            config,
            probe,
        }
    }

    /// Register the vegetation collaborator.
    pub fn set_vegetation(&mut self, vegetation: Box<dyn VegetationCollaborator>) {
        self.propagator.set_vegetation(vegetation);
    }

    /// Register the water collaborator.
    pub fn set_water(&mut self, water: Box<dyn WaterCollaborator>) {
        self.propagator.set_water(water);
    }

    /// Run one frame of the loop at `now_ms`.
    pub fn frame(&mut self, now_ms: f64, renderer: &mut dyn RenderBackend, camera: &ViewerCamera) {
        self.fps.frame();

        // The benchmark observes every frame of its burst, not just ticks.
        if let Some(benchmark) = self.benchmark.as_mut() {
            if let Some(last_ms) = self.last_frame_ms {
                let dt_ms = now_ms - last_ms;
                if dt_ms > 0.0 {
                    benchmark.record(1000.0 / dt_ms);
                }
            }
        }
        self.last_frame_ms = Some(now_ms);

        // Reporting tick: fold the renderer counters into a sample.
        if self.sample_cadence.try_fire(now_ms) {
            let fps = self.fps.sample(now_ms);
            self.collector
                .record(PerformanceSample::from_counters(now_ms, fps, renderer.frame_counters()));
        }

        let position = camera.position();
        let (viewer_x, viewer_z) = (f64::from(position.x), f64::from(position.z));

        // Startup benchmark first; assessment only once it has concluded.
        if let Some(benchmark) = self.benchmark.take() {
            if benchmark.is_elapsed(now_ms) {
                let seed = benchmark.conclude(self.config.quality.target_fps, &self.probe);
                self.controller.complete_benchmark(&seed, now_ms);
                self.actuate(renderer, viewer_x, viewer_z);
            } else {
                self.benchmark = Some(benchmark);
            }
        } else if let Some(decision) = self.controller.assess(now_ms, &self.collector.report()) {
            if decision.emergency {
                let current = renderer.pixel_ratio();
                let lowered = (current * self.config.quality.pixel_ratio_step)
                    .max(self.config.quality.pixel_ratio_floor);
                if lowered < current {
                    renderer.set_pixel_ratio(lowered);
                    info!(from = current, to = lowered, "emergency pixel-ratio reduction");
                }
            }
            if decision.applied {
                self.actuate(renderer, viewer_x, viewer_z);
            }
        }

        self.terrain
            .update_active_set(viewer_x, viewer_z, &self.table.table().terrain);
        self.terrain.update_visibility(&camera.frustum());
    }

    /// Push the controller's current state out to every consumer.
    fn actuate(&mut self, renderer: &mut dyn RenderBackend, viewer_x: f64, viewer_z: f64) {
        self.table.refresh(self.controller.distance_scale());
        let preset = self.controller.preset();
        renderer.set_simplified_shadows(preset.flags.simplified_shadows);
        self.propagator.apply(&preset, self.table.table());
        self.terrain.apply_quality(
            preset.terrain_lod,
            &self.table.table().terrain,
            viewer_x,
            viewer_z,
        );
    }

    /// Derived performance report over the buffered samples.
    pub fn report(&self) -> PerformanceReport {
        self.collector.report()
    }

    /// Current quality tier.
    pub fn tier(&self) -> QualityTier {
        self.controller.tier()
    }

    /// Current distance-scaling factor.
    pub fn distance_scale(&self) -> f64 {
        self.controller.distance_scale()
    }

    /// The scaled LOD distance table.
    pub fn distance_table(&self) -> &LodDistanceTable {
        self.table.table()
    }

    /// Segment count for a chunk at `distance` from the viewer.
    pub fn resolution_for(&self, distance: f64) -> u32 {
        self.terrain
            .resolution_for(distance, &self.table.table().terrain)
    }

    /// Whether the startup benchmark is still running.
    pub fn benchmark_active(&self) -> bool {
        self.benchmark.is_some()
    }

    /// The terrain pipeline, for inspection.
    pub fn terrain(&self) -> &ChunkPipeline {
        &self.terrain
    }

    /// Capture the serializable per-frame state.
    pub fn snapshot(&self, now_ms: f64) -> RuntimeSnapshot {
        let report = self.collector.report();
        RuntimeSnapshot {
            timestamp_ms: now_ms,
            tier: self.controller.tier(),
            distance_scale: self.controller.distance_scale(),
            benchmark_complete: self.controller.state().benchmark_complete,
            avg_fps: report.averages.fps,
            sample_count: report.sample_count,
            active_chunks: self.terrain.chunk_count(),
            visible_chunks: self.terrain.visible_count(),
            terrain_triangles: self.terrain.total_triangles(),
        }
    }
}
