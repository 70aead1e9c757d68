//! Camera and visibility primitives for the Veld engine.
//!
//! The GPU backend itself is an external collaborator; this crate holds only
//! what the chunk pipeline needs from it each frame: a viewer pose with a
//! view-projection matrix, and frustum-vs-AABB culling tests.

mod camera;
mod frustum;

pub use camera::ViewerCamera;
pub use frustum::{Aabb, Frustum};
