//! Procedural terrain chunks at variable resolution.
//!
//! A [`HeightField`] provides deterministic heights from multi-octave noise;
//! the [`ChunkPipeline`] maintains the active chunk set around the viewer,
//! selects per-chunk mesh resolution from the LOD distance table, and
//! performs frustum-based visibility culling. Resolution only changes at
//! regeneration boundaries (chunk entry or an explicit quality change), never
//! frame to frame.

mod chunk;
mod heightfield;
mod pipeline;

pub use chunk::{ChunkCoord, ChunkMesh, TerrainChunk};
pub use heightfield::{HeightField, TerrainHeight};
pub use pipeline::{ActiveSetChange, ChunkPipeline, MeshPool};
