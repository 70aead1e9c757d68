//! Narrow interfaces to external collaborators.
//!
//! Each subsystem receives only the contract it needs, injected at
//! construction, rather than a reference to a shared engine object. The
//! implementations live outside this core (real renderer, vegetation, water);
//! tests and the demo provide simulated ones.

use veld_lod::{DistanceBand, WaterDistances};
use veld_metrics::FrameCounters;

/// The rendering backend, as seen by the quality loop.
pub trait RenderBackend {
    /// Current render pixel ratio.
    fn pixel_ratio(&self) -> f64;

    /// Set the render pixel ratio. Cheap to apply; used as the fast-acting
    /// emergency lever independent of the discrete quality tier.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Toggle simplified shadow rendering.
    fn set_simplified_shadows(&mut self, simplified: bool);

    /// Counters accumulated over the last frame.
    fn frame_counters(&self) -> FrameCounters;
}

/// The vegetation system, as seen by quality propagation.
pub trait VegetationCollaborator {
    /// Current density scale in `[0, 1]`.
    fn density_scale(&self) -> f64;

    /// Assign a new density scale without regenerating.
    fn set_density_scale(&mut self, scale: f64);

    /// Rebuild vegetation instances for the current density. Expensive;
    /// callers must only invoke this on an actual density change.
    fn regenerate(&mut self);

    /// Update the distance thresholds vegetation uses for its own LOD.
    fn set_lod_distances(&mut self, band: &DistanceBand);
}

/// The water system, as seen by quality propagation.
pub trait WaterCollaborator {
    /// Whether the current water setup renders reflections.
    fn reflection_enabled(&self) -> bool;

    /// Dispose the existing water mesh/material and rebuild with the given
    /// parameters. The implementation must release the old resources before
    /// or immediately after installing the new ones, never leaving both
    /// alive. Expensive; callers must only invoke this when the reflection
    /// flag actually flips.
    fn recreate(&mut self, reflections: bool, distances: &WaterDistances);
}
