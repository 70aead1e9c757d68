//! Per-tick performance samples and the counters they are built from.

use std::collections::HashMap;

use serde::Serialize;

/// Renderer/engine counters captured at one instant.
///
/// Filled in by the render backend once per frame; the sampling layer folds
/// them into a [`PerformanceSample`] on each reporting tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameCounters {
    pub draw_calls: u32,
    pub triangles: u64,
    pub points: u64,
    pub lines: u64,
    pub geometries: u32,
    pub textures: u32,
    /// Heap usage hint, when the platform exposes one.
    pub heap_used_bytes: Option<u64>,
    /// Per-subsystem update durations, keyed by subsystem name.
    pub system_times_ms: HashMap<String, f64>,
}

/// One performance observation, produced once per reporting tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceSample {
    /// Milliseconds since engine start.
    pub timestamp_ms: f64,
    /// Frames per second over the reporting tick that ended at `timestamp_ms`.
    pub fps: f64,
    pub draw_calls: u32,
    pub triangles: u64,
    pub points: u64,
    pub lines: u64,
    pub geometries: u32,
    pub textures: u32,
    pub heap_used_bytes: Option<u64>,
    pub system_times_ms: HashMap<String, f64>,
}

impl PerformanceSample {
    /// Build a sample from a counter snapshot and the fps measured this tick.
    pub fn from_counters(timestamp_ms: f64, fps: f64, counters: FrameCounters) -> Self {
        Self {
            timestamp_ms,
            fps,
            draw_calls: counters.draw_calls,
            triangles: counters.triangles,
            points: counters.points,
            lines: counters.lines,
            geometries: counters.geometries,
            textures: counters.textures,
            heap_used_bytes: counters.heap_used_bytes,
            system_times_ms: counters.system_times_ms,
        }
    }
}

/// Derives fps from frames counted between reporting ticks.
///
/// Call [`frame`](Self::frame) once per rendered frame and
/// [`sample`](Self::sample) once per reporting tick; the meter resets itself
/// after each sample so every tick measures only its own window.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    frames: u32,
    window_start_ms: f64,
}

impl FpsMeter {
    /// Create a meter whose first window starts at `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            frames: 0,
            window_start_ms: now_ms,
        }
    }

    /// Count one rendered frame.
    pub fn frame(&mut self) {
        self.frames += 1;
    }

    /// Frames counted in the current window so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Close the current window and return its average fps.
    ///
    /// A zero-length window yields 0.0 rather than a division by zero.
    pub fn sample(&mut self, now_ms: f64) -> f64 {
        let elapsed_ms = now_ms - self.window_start_ms;
        let fps = if elapsed_ms > 0.0 {
            f64::from(self.frames) * 1000.0 / elapsed_ms
        } else {
            0.0
        };
        self.frames = 0;
        self.window_start_ms = now_ms;
        fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_meter_counts_frames_per_window() {
        let mut meter = FpsMeter::new(0.0);
        for _ in 0..60 {
            meter.frame();
        }
        let fps = meter.sample(1000.0);
        assert!(
            (fps - 60.0).abs() < 1e-9,
            "60 frames over 1s should be 60 fps, got {fps}"
        );
    }

    #[test]
    fn test_fps_meter_resets_after_sample() {
        let mut meter = FpsMeter::new(0.0);
        for _ in 0..30 {
            meter.frame();
        }
        meter.sample(1000.0);
        assert_eq!(meter.frames(), 0, "sample should reset the frame count");

        for _ in 0..15 {
            meter.frame();
        }
        let fps = meter.sample(1500.0);
        assert!(
            (fps - 30.0).abs() < 1e-9,
            "15 frames over 0.5s should be 30 fps, got {fps}"
        );
    }

    #[test]
    fn test_fps_meter_zero_window_yields_zero() {
        let mut meter = FpsMeter::new(100.0);
        meter.frame();
        assert_eq!(meter.sample(100.0), 0.0);
    }

    #[test]
    fn test_sample_from_counters_carries_all_fields() {
        let mut system_times_ms = HashMap::new();
        system_times_ms.insert("terrain".to_string(), 2.5);
        let counters = FrameCounters {
            draw_calls: 120,
            triangles: 350_000,
            textures: 14,
            heap_used_bytes: Some(64 << 20),
            system_times_ms,
            ..Default::default()
        };
        let sample = PerformanceSample::from_counters(5000.0, 58.3, counters);
        assert_eq!(sample.draw_calls, 120);
        assert_eq!(sample.triangles, 350_000);
        assert_eq!(sample.heap_used_bytes, Some(64 << 20));
        assert_eq!(sample.system_times_ms["terrain"], 2.5);
    }
}
