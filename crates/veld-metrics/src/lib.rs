//! Performance sampling and reporting for the Veld engine.
//!
//! A bounded ring buffer of per-tick [`PerformanceSample`]s and a derived
//! [`PerformanceReport`] with trimmed-mean fps statistics. This crate performs
//! no I/O and holds no timers: pacing is done by timestamp comparison via
//! [`Cadence`], so everything is callable from inside a frame at bounded cost.

mod cadence;
mod collector;
mod report;
mod sample;

pub use cadence::Cadence;
pub use collector::{MetricsCollector, trimmed_mean};
pub use report::{PerformanceReport, ReportAverages, ReportPeaks, SystemPeak};
pub use sample::{FpsMeter, FrameCounters, PerformanceSample};
