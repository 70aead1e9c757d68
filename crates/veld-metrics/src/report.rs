//! Derived performance reports.
//!
//! Reports are recomputed on demand from the collector's ring buffer, never
//! stored.

use serde::Serialize;

use crate::sample::PerformanceSample;

/// Averages over the buffered samples.
///
/// `fps` is a trimmed mean (lowest and highest 10% discarded); all other
/// fields are plain arithmetic means. `heap_used_bytes` averages only the
/// samples that carried a heap hint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportAverages {
    pub fps: f64,
    pub draw_calls: f64,
    pub triangles: f64,
    pub points: f64,
    pub lines: f64,
    pub geometries: f64,
    pub textures: f64,
    pub heap_used_bytes: f64,
}

/// The single slowest subsystem observation across the buffer.
#[derive(Debug, Clone, Serialize)]
pub struct SystemPeak {
    pub system: String,
    pub duration_ms: f64,
}

/// Worst-case observations across the buffered samples.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPeaks {
    pub max_draw_calls: u32,
    pub min_fps: f64,
    pub slowest_system: Option<SystemPeak>,
}

impl Default for ReportPeaks {
    fn default() -> Self {
        Self {
            max_draw_calls: 0,
            min_fps: 0.0,
            slowest_system: None,
        }
    }
}

/// Snapshot of recent performance, derived on demand.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceReport {
    /// Number of samples the statistics were computed from.
    pub sample_count: usize,
    pub averages: ReportAverages,
    /// The latest sample, if any.
    pub current: Option<PerformanceSample>,
    pub peaks: ReportPeaks,
}
