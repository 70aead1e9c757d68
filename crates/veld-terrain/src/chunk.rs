//! Terrain chunks and their meshes.

use glam::Vec3;
use veld_render::Aabb;

use crate::heightfield::TerrainHeight;

/// Integer grid coordinate of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World coordinate of the chunk's minimum corner.
    pub fn min_corner(self, chunk_size: f64) -> (f64, f64) {
        (f64::from(self.x) * chunk_size, f64::from(self.z) * chunk_size)
    }

    /// World coordinate of the chunk center.
    pub fn center(self, chunk_size: f64) -> (f64, f64) {
        let (x, z) = self.min_corner(chunk_size);
        (x + chunk_size * 0.5, z + chunk_size * 0.5)
    }

    /// Euclidean distance from the chunk center to a world-space point.
    pub fn distance_to(self, chunk_size: f64, x: f64, z: f64) -> f64 {
        let (cx, cz) = self.center(chunk_size);
        let dx = cx - x;
        let dz = cz - z;
        (dx * dx + dz * dz).sqrt()
    }

    /// The chunk containing a world-space point.
    pub fn containing(chunk_size: f64, x: f64, z: f64) -> Self {
        Self {
            x: (x / chunk_size).floor() as i32,
            z: (z / chunk_size).floor() as i32,
        }
    }
}

/// CPU-side chunk geometry: a regular grid of `resolution + 1` squared
/// vertices with heights from the terrain oracle.
///
/// Buffers are reused across regenerations: `rebuild` clears and refills in
/// place, so a mesh recycled through the pool keeps its allocations.
#[derive(Debug, Default)]
pub struct ChunkMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    resolution: u32,
}

impl ChunkMesh {
    /// The segment count this mesh was generated at.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Regenerate geometry for `coord` at `resolution` segments per side.
    ///
    /// Returns the world-space bounds of the generated surface. Normals use
    /// central differences on the height oracle so seams between chunks of
    /// different resolution still shade consistently.
    pub fn rebuild(
        &mut self,
        coord: ChunkCoord,
        chunk_size: f64,
        resolution: u32,
        height: &dyn TerrainHeight,
    ) -> Aabb {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
        self.resolution = resolution;

        let (origin_x, origin_z) = coord.min_corner(chunk_size);
        let step = chunk_size / f64::from(resolution);
        let verts_per_side = resolution + 1;

        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for iz in 0..verts_per_side {
            for ix in 0..verts_per_side {
                let x = origin_x + f64::from(ix) * step;
                let z = origin_z + f64::from(iz) * step;
                let y = height.height(x, z);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
                self.positions.push([x as f32, y as f32, z as f32]);

                let dx = height.height(x + step, z) - height.height(x - step, z);
                let dz = height.height(x, z + step) - height.height(x, z - step);
                let normal =
                    Vec3::new(-dx as f32, (2.0 * step) as f32, -dz as f32).normalize_or(Vec3::Y);
                self.normals.push(normal.to_array());
            }
        }

        for iz in 0..resolution {
            for ix in 0..resolution {
                let a = iz * verts_per_side + ix;
                let b = a + 1;
                let c = a + verts_per_side;
                let d = c + 1;
                self.indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        Aabb::new(
            Vec3::new(origin_x as f32, min_y as f32, origin_z as f32),
            Vec3::new(
                (origin_x + chunk_size) as f32,
                max_y as f32,
                (origin_z + chunk_size) as f32,
            ),
        )
    }
}

/// One terrain chunk in the active set.
///
/// The mesh is exclusively owned: replacing it installs the new geometry
/// before the old is released, and eviction hands the old buffers back to the
/// pool, so there is never a frame with both meshes live or neither.
#[derive(Debug)]
pub struct TerrainChunk {
    pub coord: ChunkCoord,
    resolution: u32,
    aabb: Option<Aabb>,
    pub visible: bool,
    mesh: Option<ChunkMesh>,
}

impl TerrainChunk {
    /// Create a chunk shell; geometry is attached by the pipeline.
    pub fn new(coord: ChunkCoord, resolution: u32) -> Self {
        Self {
            coord,
            resolution,
            aabb: None,
            visible: true,
            mesh: None,
        }
    }

    /// The resolution the current mesh was (or will be) generated at.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Install a freshly generated mesh, returning the previous one.
    pub fn install_mesh(&mut self, mesh: ChunkMesh, resolution: u32, aabb: Aabb) -> Option<ChunkMesh> {
        self.resolution = resolution;
        self.aabb = Some(aabb);
        self.mesh.replace(mesh)
    }

    /// Remove and return the mesh (on eviction).
    pub fn take_mesh(&mut self) -> Option<ChunkMesh> {
        self.mesh.take()
    }

    /// The chunk's bounds, synthesizing from grid coordinates and the
    /// configured height range when no mesh-derived box is cached.
    pub fn bounds(&self, chunk_size: f64, min_height: f64, max_height: f64) -> Aabb {
        match self.aabb {
            Some(aabb) => aabb,
            None => {
                let (x, z) = self.coord.min_corner(chunk_size);
                Aabb::new(
                    Vec3::new(x as f32, min_height as f32, z as f32),
                    Vec3::new(
                        (x + chunk_size) as f32,
                        max_height as f32,
                        (z + chunk_size) as f32,
                    ),
                )
            }
        }
    }
}
