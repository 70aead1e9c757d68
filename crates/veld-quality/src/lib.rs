//! Adaptive quality decision engine for the Veld engine.
//!
//! A closed-loop controller over three discrete quality tiers: a startup
//! [`CapabilityBenchmark`] seeds the initial state, then the
//! [`AdaptiveQualityController`] periodically consumes performance reports
//! and steps the tier up or down with asymmetric hysteresis. Decisions are
//! emitted as values; actuation (preset propagation, pixel-ratio changes)
//! belongs to the caller.

mod benchmark;
mod controller;
mod device;
mod preset;
mod tier;

pub use benchmark::{BenchmarkSeed, CapabilityBenchmark};
pub use controller::{
    AdaptiveQualityController, ControllerState, DISTANCE_SCALE_MAX, DISTANCE_SCALE_MIN,
    QualityDecision, TierShift,
};
pub use device::{DeviceClass, DeviceProbe, GpuTierHint};
pub use preset::{OptimizationFlags, QualityPreset, TerrainLodMode};
pub use tier::QualityTier;
