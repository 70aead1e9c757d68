//! The stateful quality decision engine.

use serde::Serialize;
use tracing::{debug, info};
use veld_config::QualityConfig;
use veld_metrics::{Cadence, PerformanceReport};

use crate::benchmark::BenchmarkSeed;
use crate::device::DeviceProbe;
use crate::preset::QualityPreset;
use crate::tier::QualityTier;

/// Lowest value the distance-scaling factor may take.
pub const DISTANCE_SCALE_MIN: f64 = 0.3;
/// Highest value the distance-scaling factor may take.
pub const DISTANCE_SCALE_MAX: f64 = 1.0;

/// Controller state, mutated only inside the assessment step.
///
/// Everything downstream reads it; in a multi-threaded port it must be
/// published as an immutable per-frame snapshot, never read mid-update.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ControllerState {
    pub tier: QualityTier,
    /// Multiplier on the base LOD distance table, in
    /// `[DISTANCE_SCALE_MIN, DISTANCE_SCALE_MAX]`.
    pub distance_scale: f64,
    /// Milliseconds spent at the current tier.
    pub time_at_tier_ms: f64,
    /// Timestamp of the last accepted transition (or seeding event).
    pub last_change_at_ms: f64,
    pub benchmark_complete: bool,
}

/// Direction of a requested tier change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TierShift {
    Decrease,
    Increase,
}

/// The outcome of one accepted assessment cycle.
#[derive(Debug, Clone)]
pub struct QualityDecision {
    pub shift: TierShift,
    /// `false` when the tier was already at the requested boundary.
    pub applied: bool,
    /// Tier after the decision.
    pub tier: QualityTier,
    /// Parameter bundle for `tier`, looked up on transition.
    pub preset: QualityPreset,
    /// Requests the renderer pixel-ratio emergency lever. Set on decreases
    /// with fps below the emergency band, including boundary-saturated ones:
    /// at `Low` the pixel ratio is the only lever left.
    pub emergency: bool,
    pub fps_ratio: f64,
    pub avg_triangles: f64,
}

/// Periodically consumes performance reports and steps the quality tier.
///
/// Assessment runs on a fixed cadence, never mid-frame, and applies
/// asymmetric hysteresis: decreases react within one dwell interval to avoid
/// visible stutter, increases wait twice as long to avoid thrashing. Cycles
/// with too few samples are skipped outright so the controller never acts on
/// statistically meaningless data.
pub struct AdaptiveQualityController {
    config: QualityConfig,
    state: ControllerState,
    cadence: Cadence,
}

impl AdaptiveQualityController {
    /// Create a controller seeded from the device probe's weak prior.
    pub fn new(config: &QualityConfig, probe: &DeviceProbe, now_ms: f64) -> Self {
        Self {
            config: config.clone(),
            state: ControllerState {
                tier: probe.initial_tier(),
                distance_scale: probe
                    .initial_distance_scale()
                    .clamp(DISTANCE_SCALE_MIN, DISTANCE_SCALE_MAX),
                time_at_tier_ms: 0.0,
                last_change_at_ms: now_ms,
                benchmark_complete: false,
            },
            cadence: Cadence::new(config.adjustment_interval_ms, now_ms),
        }
    }

    /// Current controller state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Current quality tier.
    pub fn tier(&self) -> QualityTier {
        self.state.tier
    }

    /// Current distance-scaling factor.
    pub fn distance_scale(&self) -> f64 {
        self.state.distance_scale
    }

    /// The parameter bundle for the current tier.
    pub fn preset(&self) -> QualityPreset {
        QualityPreset::for_tier(self.state.tier)
    }

    /// Adopt the benchmark's seed state.
    pub fn complete_benchmark(&mut self, seed: &BenchmarkSeed, now_ms: f64) {
        self.state.tier = seed.tier;
        self.state.distance_scale = seed
            .distance_scale
            .clamp(DISTANCE_SCALE_MIN, DISTANCE_SCALE_MAX);
        self.state.time_at_tier_ms = 0.0;
        self.state.last_change_at_ms = now_ms;
        self.state.benchmark_complete = true;
        info!(tier = %self.state.tier, distance_scale = self.state.distance_scale,
            "quality seeded from capability benchmark");
    }

    /// Run one assessment cycle if the cadence and data allow it.
    ///
    /// Returns `None` when the benchmark has not concluded, the cadence has
    /// not elapsed, fewer than the minimum samples are buffered, no trigger
    /// fired, or hysteresis suppressed the pending change. State is mutated
    /// only on accepted transitions.
    pub fn assess(&mut self, now_ms: f64, report: &PerformanceReport) -> Option<QualityDecision> {
        if !self.state.benchmark_complete {
            return None;
        }
        if !self.cadence.try_fire(now_ms) {
            return None;
        }
        self.state.time_at_tier_ms = now_ms - self.state.last_change_at_ms;

        if report.sample_count < self.config.min_samples {
            debug!(
                samples = report.sample_count,
                required = self.config.min_samples,
                "skipping assessment: insufficient data"
            );
            return None;
        }

        let fps_ratio = report.averages.fps / self.config.target_fps;
        let avg_triangles = report.averages.triangles;
        let bands = &self.config.fps_ratio;
        let tris = &self.config.triangles;

        let should_decrease = fps_ratio < bands.critical
            || fps_ratio < bands.below_target
            || avg_triangles > tris.critical as f64
            || (avg_triangles > tris.high as f64 && fps_ratio < bands.headroom);

        let should_increase = (fps_ratio > bands.good && avg_triangles < tris.medium as f64)
            || (avg_triangles < tris.low as f64 && fps_ratio > bands.excellent);

        let elapsed_ms = now_ms - self.state.last_change_at_ms;

        // Decrease takes priority when both directions trigger.
        if should_decrease {
            if elapsed_ms < self.config.min_time_before_decrease_ms {
                debug!(elapsed_ms, "decrease suppressed by hysteresis");
                return None;
            }
            let emergency = fps_ratio < bands.emergency;
            Some(self.transition(TierShift::Decrease, emergency, fps_ratio, avg_triangles, now_ms))
        } else if should_increase {
            if elapsed_ms < self.config.min_time_before_increase_ms {
                debug!(elapsed_ms, "increase suppressed by hysteresis");
                return None;
            }
            Some(self.transition(TierShift::Increase, false, fps_ratio, avg_triangles, now_ms))
        } else {
            None
        }
    }

    fn transition(
        &mut self,
        shift: TierShift,
        emergency: bool,
        fps_ratio: f64,
        avg_triangles: f64,
        now_ms: f64,
    ) -> QualityDecision {
        let next = match shift {
            TierShift::Decrease => self.state.tier.lower(),
            TierShift::Increase => self.state.tier.higher(),
        };
        let applied = next != self.state.tier;
        if applied {
            info!(from = %self.state.tier, to = %next, ?shift, fps_ratio, avg_triangles,
                "quality tier transition");
            self.state.tier = next;
            self.state.time_at_tier_ms = 0.0;
            self.state.last_change_at_ms = now_ms;
        } else {
            debug!(tier = %self.state.tier, ?shift, "tier already at boundary");
        }
        QualityDecision {
            shift,
            applied,
            tier: self.state.tier,
            preset: QualityPreset::for_tier(self.state.tier),
            emergency,
            fps_ratio,
            avg_triangles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_metrics::{MetricsCollector, PerformanceSample};

    fn config(target_fps: f64) -> QualityConfig {
        QualityConfig {
            target_fps,
            ..Default::default()
        }
    }

    /// Controller seeded at `tier` with the benchmark already concluded at t=0.
    fn controller_at(tier: QualityTier, target_fps: f64) -> AdaptiveQualityController {
        let mut controller =
            AdaptiveQualityController::new(&config(target_fps), &DeviceProbe::desktop(), 0.0);
        controller.complete_benchmark(
            &BenchmarkSeed {
                tier,
                distance_scale: 0.65,
                mean_fps: Some(target_fps),
            },
            0.0,
        );
        controller
    }

    /// A report with `count` samples at the given fps and triangle load.
    fn report(count: usize, fps: f64, triangles: u64) -> PerformanceReport {
        let mut collector = MetricsCollector::new(100);
        for i in 0..count {
            collector.record(PerformanceSample {
                timestamp_ms: i as f64 * 1000.0,
                fps,
                triangles,
                ..Default::default()
            });
        }
        collector.report()
    }

    /// Scenario A: ratio 0.5 at Medium with 6 s dwell transitions to Low.
    #[test]
    fn test_poor_fps_decreases_after_dwell() {
        let mut controller = controller_at(QualityTier::Medium, 30.0);
        let decision = controller
            .assess(6000.0, &report(20, 15.0, 100_000))
            .expect("decrease should be accepted");
        assert_eq!(decision.shift, TierShift::Decrease);
        assert!(decision.applied);
        assert_eq!(controller.tier(), QualityTier::Low);
    }

    /// Scenario B: same load but only 2 s dwell is blocked by hysteresis.
    #[test]
    fn test_hysteresis_blocks_early_decrease() {
        let mut controller = controller_at(QualityTier::Medium, 30.0);
        // Force the cadence to have elapsed while dwell has not: seed the
        // benchmark late so last_change is recent relative to the cadence.
        controller.complete_benchmark(
            &BenchmarkSeed {
                tier: QualityTier::Medium,
                distance_scale: 0.65,
                mean_fps: Some(30.0),
            },
            4000.0,
        );
        let decision = controller.assess(6000.0, &report(20, 15.0, 100_000));
        assert!(decision.is_none(), "2s dwell must suppress the decrease");
        assert_eq!(controller.tier(), QualityTier::Medium);
    }

    /// Scenario C: at Low the decrease is requested but saturates.
    #[test]
    fn test_decrease_at_low_saturates() {
        let mut controller = controller_at(QualityTier::Low, 30.0);
        let decision = controller
            .assess(6000.0, &report(20, 15.0, 100_000))
            .expect("a saturated decrease still yields a decision");
        assert!(!decision.applied);
        assert_eq!(decision.tier, QualityTier::Low);
        assert_eq!(controller.tier(), QualityTier::Low);
        assert!(
            decision.emergency,
            "ratio 0.5 is under the emergency band even at Low"
        );
    }

    /// Scenario D: ratio 1.83 with 150k triangles and 11 s dwell raises Medium to High.
    #[test]
    fn test_good_fps_increases_after_long_dwell() {
        let mut controller = controller_at(QualityTier::Medium, 30.0);
        let decision = controller
            .assess(11_000.0, &report(20, 55.0, 150_000))
            .expect("increase should be accepted");
        assert_eq!(decision.shift, TierShift::Increase);
        assert!(decision.applied);
        assert_eq!(controller.tier(), QualityTier::High);
    }

    #[test]
    fn test_increase_blocked_before_ten_seconds() {
        let mut controller = controller_at(QualityTier::Medium, 30.0);
        let decision = controller.assess(8000.0, &report(20, 55.0, 150_000));
        assert!(decision.is_none(), "8s dwell must suppress the increase");
    }

    #[test]
    fn test_insufficient_samples_skips_cycle() {
        let mut controller = controller_at(QualityTier::Medium, 30.0);
        let decision = controller.assess(6000.0, &report(5, 15.0, 100_000));
        assert!(decision.is_none());
        assert_eq!(
            controller.tier(),
            QualityTier::Medium,
            "a skipped cycle must not mutate state"
        );
    }

    #[test]
    fn test_cadence_gates_assessment() {
        let mut controller = controller_at(QualityTier::Medium, 30.0);
        // 5s cadence seeded at t=0: t=3000 is too early regardless of load
        assert!(controller.assess(3000.0, &report(20, 15.0, 100_000)).is_none());
        assert!(controller.assess(6000.0, &report(20, 15.0, 100_000)).is_some());
    }

    #[test]
    fn test_triangle_pressure_decreases_with_modest_fps() {
        let mut controller = controller_at(QualityTier::High, 60.0);
        // ratio 1.0 is fine on its own, but 450k triangles with ratio < 1.1
        let decision = controller
            .assess(6000.0, &report(20, 60.0, 450_000))
            .expect("triangle pressure should force a decrease");
        assert_eq!(decision.shift, TierShift::Decrease);
        assert!(!decision.emergency);
        assert_eq!(controller.tier(), QualityTier::Medium);
    }

    #[test]
    fn test_heavy_scene_blocks_increase() {
        let mut controller = controller_at(QualityTier::Medium, 60.0);
        // Excellent fps but 350k triangles: above the medium band, no increase
        let decision = controller.assess(11_000.0, &report(20, 90.0, 350_000));
        assert!(decision.is_none());
    }

    #[test]
    fn test_no_two_decreases_within_dwell() {
        let mut controller = controller_at(QualityTier::High, 30.0);
        let bad = report(20, 15.0, 100_000);

        let first = controller.assess(6000.0, &bad).unwrap();
        assert!(first.applied);
        let first_at = 6000.0;

        // Next cadence tick at 11s: 5s elapsed since the accepted change,
        // which meets the dwell exactly
        let second = controller.assess(11_000.0, &bad).unwrap();
        assert!(second.applied);
        assert!(11_000.0 - first_at >= 5000.0);

        // And between the two, at 10s, nothing fires (cadence already spent)
        assert_eq!(controller.tier(), QualityTier::Low);
    }

    #[test]
    fn test_transitions_step_by_one() {
        let mut controller = controller_at(QualityTier::High, 30.0);
        let bad = report(20, 10.0, 100_000);
        let mut now = 6000.0;
        let mut tiers = vec![controller.tier()];
        for _ in 0..4 {
            if let Some(decision) = controller.assess(now, &bad) {
                if decision.applied {
                    tiers.push(decision.tier);
                }
            }
            now += 5000.0;
        }
        for pair in tiers.windows(2) {
            assert_eq!(
                pair[1],
                pair[0].lower(),
                "each accepted transition moves exactly one step"
            );
        }
        assert_eq!(controller.tier(), QualityTier::Low);
    }

    #[test]
    fn test_no_decision_without_benchmark() {
        let mut controller =
            AdaptiveQualityController::new(&config(30.0), &DeviceProbe::desktop(), 0.0);
        let decision = controller.assess(6000.0, &report(20, 15.0, 100_000));
        assert!(decision.is_none(), "assessment waits for the benchmark");
    }

    #[test]
    fn test_distance_scale_always_clamped() {
        let mut controller = controller_at(QualityTier::Medium, 30.0);
        controller.complete_benchmark(
            &BenchmarkSeed {
                tier: QualityTier::Low,
                distance_scale: 0.05,
                mean_fps: Some(10.0),
            },
            0.0,
        );
        assert!(controller.distance_scale() >= DISTANCE_SCALE_MIN);

        controller.complete_benchmark(
            &BenchmarkSeed {
                tier: QualityTier::High,
                distance_scale: 3.0,
                mean_fps: Some(200.0),
            },
            0.0,
        );
        assert!(controller.distance_scale() <= DISTANCE_SCALE_MAX);
    }
}
