//! Startup capability benchmark.

use tracing::info;

use crate::controller::{DISTANCE_SCALE_MAX, DISTANCE_SCALE_MIN};
use crate::device::DeviceProbe;
use crate::tier::QualityTier;

/// Mean fps below this fraction of target seeds the `Low` tier.
const SLOW_RATIO: f64 = 0.8;
/// Mean fps above this fraction of target seeds the `High` tier.
const FAST_RATIO: f64 = 1.5;
/// Distance-scale shrink applied on a slow result.
const SHRINK_FACTOR: f64 = 0.8;
/// Distance-scale growth applied on a fast result.
const GROW_FACTOR: f64 = 1.2;
/// The benchmark never grows the distance scale past this.
const GROW_CAP: f64 = 0.8;

/// The state the benchmark seeds the controller with.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkSeed {
    pub tier: QualityTier,
    pub distance_scale: f64,
    /// Mean fps observed, or `None` when the window produced no samples.
    pub mean_fps: Option<f64>,
}

/// Observes a short burst of frames at startup without acting on them.
///
/// Runs for a fixed wall-clock window immediately after system start, then
/// seeds the initial quality tier and distance-scaling factor from the mean
/// observed fps. A window that produced no observations falls back to the
/// device-class defaults; the probe is a prior, the benchmark the
/// authoritative signal.
pub struct CapabilityBenchmark {
    started_at_ms: f64,
    window_ms: f64,
    fps_samples: Vec<f64>,
}

impl CapabilityBenchmark {
    /// Start a benchmark window at `now_ms`.
    pub fn new(now_ms: f64, window_ms: f64) -> Self {
        Self {
            started_at_ms: now_ms,
            window_ms,
            fps_samples: Vec::new(),
        }
    }

    /// Record one fps observation.
    pub fn record(&mut self, fps: f64) {
        self.fps_samples.push(fps);
    }

    /// Whether the wall-clock window has elapsed.
    pub fn is_elapsed(&self, now_ms: f64) -> bool {
        now_ms - self.started_at_ms >= self.window_ms
    }

    /// Number of observations recorded so far.
    pub fn sample_count(&self) -> usize {
        self.fps_samples.len()
    }

    /// Conclude the window and derive the seed state.
    ///
    /// `probe` supplies the fallback tier and the distance scale the banded
    /// adjustments start from.
    pub fn conclude(&self, target_fps: f64, probe: &DeviceProbe) -> BenchmarkSeed {
        let default_scale = probe.initial_distance_scale();

        if self.fps_samples.is_empty() {
            info!("benchmark window collected no samples, keeping device-class defaults");
            return BenchmarkSeed {
                tier: probe.initial_tier(),
                distance_scale: default_scale,
                mean_fps: None,
            };
        }

        let mean_fps =
            self.fps_samples.iter().sum::<f64>() / self.fps_samples.len() as f64;
        let ratio = mean_fps / target_fps;

        let (tier, distance_scale) = if ratio < SLOW_RATIO {
            (QualityTier::Low, (default_scale * SHRINK_FACTOR).max(DISTANCE_SCALE_MIN))
        } else if ratio > FAST_RATIO {
            (QualityTier::High, (default_scale * GROW_FACTOR).min(GROW_CAP))
        } else {
            (QualityTier::Medium, default_scale)
        };

        let distance_scale = distance_scale.clamp(DISTANCE_SCALE_MIN, DISTANCE_SCALE_MAX);
        info!(
            samples = self.fps_samples.len(),
            mean_fps, %tier, distance_scale, "capability benchmark concluded"
        );
        BenchmarkSeed {
            tier,
            distance_scale,
            mean_fps: Some(mean_fps),
        }
    }
}
