//! Frame-driven runtime tying the adaptive quality loop together.
//!
//! The [`AdaptiveRuntime`] runs the full measure → decide → actuate cycle
//! synchronously inside each per-frame update: sampling on the reporting
//! tick, the startup benchmark, periodic assessment, change-gated propagation
//! to collaborators, active-set maintenance, and frustum culling. Everything
//! is single-threaded; cadences are timestamp comparisons, never timers.

mod collaborators;
mod propagation;
mod runtime;

pub use collaborators::{RenderBackend, VegetationCollaborator, WaterCollaborator};
pub use propagation::{PropagationOutcome, Propagator};
pub use runtime::{AdaptiveRuntime, RuntimeSnapshot};
