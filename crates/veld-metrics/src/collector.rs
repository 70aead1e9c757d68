//! Bounded ring buffer of performance samples.

use std::collections::VecDeque;

use crate::report::{PerformanceReport, ReportAverages, ReportPeaks, SystemPeak};
use crate::sample::PerformanceSample;

/// Fraction trimmed from each end of the sorted fps values before averaging.
const TRIM_FRACTION: f64 = 0.1;

/// Average after discarding the lowest and highest `trim_fraction` of values.
///
/// The trim count is `⌊n · trim_fraction⌋` per end, so small sets are averaged
/// untrimmed. Rejects single-frame stalls and spikes without widening the
/// sample window. Returns 0.0 for an empty slice.
pub fn trimmed_mean(values: &[f64], trim_fraction: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let trim = (sorted.len() as f64 * trim_fraction).floor() as usize;
    let kept = &sorted[trim..sorted.len() - trim];
    kept.iter().sum::<f64>() / kept.len() as f64
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Ring buffer of [`PerformanceSample`]s, capped at a fixed capacity with
/// oldest-first eviction.
///
/// Recording is O(1); deriving a report is O(n log n) in the capacity for the
/// trimmed-mean sort, bounded and allocation-light enough to run inside a
/// frame.
pub struct MetricsCollector {
    samples: VecDeque<PerformanceSample>,
    capacity: usize,
}

impl MetricsCollector {
    /// Create a collector holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest entry past capacity.
    pub fn record(&mut self, sample: PerformanceSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recently recorded sample.
    pub fn latest(&self) -> Option<&PerformanceSample> {
        self.samples.back()
    }

    /// Iterate over buffered samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &PerformanceSample> {
        self.samples.iter()
    }

    /// Derive a report from the buffered samples.
    ///
    /// An empty buffer yields a report of zeros rather than an error; the
    /// controller treats too-few samples as a skipped cycle, never a failure.
    pub fn report(&self) -> PerformanceReport {
        if self.samples.is_empty() {
            return PerformanceReport::default();
        }

        let fps_values: Vec<f64> = self.samples.iter().map(|s| s.fps).collect();
        let averages = ReportAverages {
            fps: trimmed_mean(&fps_values, TRIM_FRACTION),
            draw_calls: mean(self.samples.iter().map(|s| f64::from(s.draw_calls))),
            triangles: mean(self.samples.iter().map(|s| s.triangles as f64)),
            points: mean(self.samples.iter().map(|s| s.points as f64)),
            lines: mean(self.samples.iter().map(|s| s.lines as f64)),
            geometries: mean(self.samples.iter().map(|s| f64::from(s.geometries))),
            textures: mean(self.samples.iter().map(|s| f64::from(s.textures))),
            heap_used_bytes: mean(
                self.samples
                    .iter()
                    .filter_map(|s| s.heap_used_bytes.map(|b| b as f64)),
            ),
        };

        let mut slowest_system: Option<SystemPeak> = None;
        for sample in &self.samples {
            for (system, &duration_ms) in &sample.system_times_ms {
                let is_slower = slowest_system
                    .as_ref()
                    .is_none_or(|peak| duration_ms > peak.duration_ms);
                if is_slower {
                    slowest_system = Some(SystemPeak {
                        system: system.clone(),
                        duration_ms,
                    });
                }
            }
        }

        let peaks = ReportPeaks {
            max_draw_calls: self.samples.iter().map(|s| s.draw_calls).max().unwrap_or(0),
            min_fps: self
                .samples
                .iter()
                .map(|s| s.fps)
                .fold(f64::INFINITY, f64::min),
            slowest_system,
        };

        PerformanceReport {
            sample_count: self.samples.len(),
            averages,
            current: self.samples.back().cloned(),
            peaks,
        }
    }
}
