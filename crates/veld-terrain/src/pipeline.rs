//! Active-set management, resolution selection, and visibility culling.

use hashbrown::HashMap;
use tracing::debug;
use veld_config::TerrainConfig;
use veld_lod::DistanceBand;
use veld_quality::{DeviceClass, QualityTier, TerrainLodMode};
use veld_render::Frustum;

use crate::chunk::{ChunkCoord, ChunkMesh, TerrainChunk};
use crate::heightfield::TerrainHeight;

/// Segment counts for the adaptive distance buckets, nearest first.
const ADAPTIVE_RESOLUTIONS: [u32; 4] = [48, 32, 16, 8];

/// Most evicted meshes kept for buffer reuse.
const POOL_CAPACITY: usize = 64;

/// Fixed segment count for a pinned LOD level.
pub fn fixed_resolution(tier: QualityTier) -> u32 {
    match tier {
        QualityTier::Low => 16,
        QualityTier::Medium => 32,
        QualityTier::High => 48,
    }
}

/// Recycles evicted chunk meshes so regeneration reuses their allocations.
#[derive(Debug, Default)]
pub struct MeshPool {
    free: Vec<ChunkMesh>,
}

impl MeshPool {
    /// Take a pooled mesh, or a fresh empty one if the pool is dry.
    pub fn acquire(&mut self) -> ChunkMesh {
        self.free.pop().unwrap_or_default()
    }

    /// Return a mesh to the pool; excess meshes are dropped outright.
    pub fn release(&mut self, mesh: ChunkMesh) {
        if self.free.len() < POOL_CAPACITY {
            self.free.push(mesh);
        }
    }

    /// Number of meshes waiting for reuse.
    pub fn pooled(&self) -> usize {
        self.free.len()
    }
}

/// What one active-set update did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveSetChange {
    /// Chunks created and meshed this update.
    pub entered: usize,
    /// Chunks evicted (meshes pooled) this update.
    pub evicted: usize,
}

/// Maintains the set of terrain chunks around the viewer.
///
/// Chunks are created when they enter the active radius and evicted when they
/// leave it. A chunk's resolution is chosen at creation (and again on an
/// explicit quality change) from the distance bucket; it never changes frame
/// to frame, so there are no seams or popping except at regeneration
/// boundaries.
pub struct ChunkPipeline {
    chunk_size: f64,
    active_radius: i32,
    base_resolution: u32,
    min_height: f64,
    max_height: f64,
    device: DeviceClass,
    mode: TerrainLodMode,
    height: Box<dyn TerrainHeight>,
    chunks: HashMap<ChunkCoord, TerrainChunk>,
    pool: MeshPool,
}

impl ChunkPipeline {
    /// Create an empty pipeline over the given height oracle.
    pub fn new(
        config: &TerrainConfig,
        device: DeviceClass,
        mode: TerrainLodMode,
        height: Box<dyn TerrainHeight>,
    ) -> Self {
        Self {
            chunk_size: config.chunk_size,
            active_radius: config.active_radius as i32,
            base_resolution: config.base_resolution,
            min_height: config.min_height,
            max_height: config.max_height,
            device,
            mode,
            height,
            chunks: HashMap::new(),
            pool: MeshPool::default(),
        }
    }

    /// Segment count for a chunk at `distance` from the viewer.
    ///
    /// Desktop-class devices always mesh at the configured base resolution.
    /// Otherwise a pinned LOD mode maps to its fixed segment count, and
    /// adaptive mode buckets the distance against the terrain band.
    pub fn resolution_for(&self, distance: f64, band: &DistanceBand) -> u32 {
        if self.device == DeviceClass::Desktop {
            return self.base_resolution;
        }
        match self.mode {
            TerrainLodMode::Fixed(tier) => fixed_resolution(tier),
            TerrainLodMode::Adaptive => {
                if distance < band.high {
                    ADAPTIVE_RESOLUTIONS[0]
                } else if distance < band.medium {
                    ADAPTIVE_RESOLUTIONS[1]
                } else if distance < band.low {
                    ADAPTIVE_RESOLUTIONS[2]
                } else {
                    ADAPTIVE_RESOLUTIONS[3]
                }
            }
        }
    }

    /// Create chunks entering the active radius and evict those leaving it.
    pub fn update_active_set(
        &mut self,
        viewer_x: f64,
        viewer_z: f64,
        band: &DistanceBand,
    ) -> ActiveSetChange {
        let center = ChunkCoord::containing(self.chunk_size, viewer_x, viewer_z);
        let radius = self.active_radius;
        let mut change = ActiveSetChange::default();

        let leaving: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| (c.x - center.x).abs() > radius || (c.z - center.z).abs() > radius)
            .copied()
            .collect();
        for coord in leaving {
            if let Some(mut chunk) = self.chunks.remove(&coord) {
                if let Some(mesh) = chunk.take_mesh() {
                    self.pool.release(mesh);
                }
                change.evicted += 1;
            }
        }

        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if self.chunks.contains_key(&coord) {
                    continue;
                }
                let distance = coord.distance_to(self.chunk_size, viewer_x, viewer_z);
                let resolution = self.resolution_for(distance, band);
                let mut chunk = TerrainChunk::new(coord, resolution);
                let mut mesh = self.pool.acquire();
                let aabb = mesh.rebuild(coord, self.chunk_size, resolution, self.height.as_ref());
                chunk.install_mesh(mesh, resolution, aabb);
                self.chunks.insert(coord, chunk);
                change.entered += 1;
            }
        }

        if change != ActiveSetChange::default() {
            debug!(
                entered = change.entered,
                evicted = change.evicted,
                active = self.chunks.len(),
                "active chunk set updated"
            );
        }
        change
    }

    /// Apply a quality change: adopt the new LOD mode and regenerate every
    /// chunk whose bucketed resolution differs from its current one.
    ///
    /// Returns the number of chunks remeshed. This is the only path besides
    /// chunk entry where a chunk's resolution may change.
    pub fn apply_quality(
        &mut self,
        mode: TerrainLodMode,
        band: &DistanceBand,
        viewer_x: f64,
        viewer_z: f64,
    ) -> usize {
        self.mode = mode;
        let mut regenerated = 0;

        let coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        for coord in coords {
            let distance = coord.distance_to(self.chunk_size, viewer_x, viewer_z);
            let desired = self.resolution_for(distance, band);
            let current = self.chunks[&coord].resolution();
            if desired == current {
                continue;
            }
            let mut mesh = self.pool.acquire();
            let aabb = mesh.rebuild(coord, self.chunk_size, desired, self.height.as_ref());
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                if let Some(old) = chunk.install_mesh(mesh, desired, aabb) {
                    self.pool.release(old);
                }
                regenerated += 1;
            }
        }

        if regenerated > 0 {
            debug!(regenerated, ?mode, "chunk resolutions re-evaluated");
        }
        regenerated
    }

    /// Frustum-cull every active chunk, toggling `visible` only on change.
    ///
    /// Returns how many chunks changed visibility this frame.
    pub fn update_visibility(&mut self, frustum: &Frustum) -> usize {
        let mut toggled = 0;
        for chunk in self.chunks.values_mut() {
            let bounds = chunk.bounds(self.chunk_size, self.min_height, self.max_height);
            let in_view = frustum.intersects_aabb(&bounds);
            if in_view != chunk.visible {
                chunk.visible = in_view;
                toggled += 1;
            }
        }
        toggled
    }

    /// Whether a chunk's bounds intersect the given frustum.
    pub fn is_visible(&self, chunk: &TerrainChunk, frustum: &Frustum) -> bool {
        frustum.intersects_aabb(&chunk.bounds(self.chunk_size, self.min_height, self.max_height))
    }

    /// Number of active chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of active chunks currently marked visible.
    pub fn visible_count(&self) -> usize {
        self.chunks.values().filter(|c| c.visible).count()
    }

    /// Total triangles across all active chunk meshes.
    pub fn total_triangles(&self) -> u64 {
        self.chunks
            .values()
            .filter_map(|c| c.mesh())
            .map(|m| m.triangle_count() as u64)
            .sum()
    }

    /// Iterate over the active chunks in arbitrary order.
    pub fn chunks(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.chunks.values()
    }

    /// The mesh pool, for inspection.
    pub fn pool(&self) -> &MeshPool {
        &self.pool
    }
}
