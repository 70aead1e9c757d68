//! View-frustum extraction and AABB intersection tests.

use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(
            min.x <= max.x && min.y <= max.y && min.z <= max.z,
            "degenerate AABB: min {min:?} max {max:?}"
        );
        Self { min, max }
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis.
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The corner furthest along `direction` (the "p-vertex").
    fn positive_vertex(&self, direction: Vec3) -> Vec3 {
        Vec3::new(
            if direction.x >= 0.0 { self.max.x } else { self.min.x },
            if direction.y >= 0.0 { self.max.y } else { self.min.y },
            if direction.z >= 0.0 { self.max.z } else { self.min.z },
        )
    }
}

/// A view frustum as six inward-pointing planes.
///
/// Each plane is `Vec4(a, b, c, d)` with unit normal `(a, b, c)`; a point is
/// inside the half-space when `dot(n, p) + d >= 0`.
#[derive(Clone, Debug)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract planes from a combined view-projection matrix.
    ///
    /// Assumes a standard depth range of `[0, 1]` (glam's `perspective_rh`):
    /// the near plane is the third row itself, the far plane the fourth row
    /// minus the third. Left/right/bottom/top follow the usual
    /// row-combination extraction.
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        let mut planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r2,      // near: 0 <= z_clip
            r3 - r2, // far: z_clip <= w_clip
        ];

        for plane in &mut planes {
            let len = plane.xyz().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    /// Whether the AABB intersects the frustum, conservatively.
    ///
    /// Tests the p-vertex of the box against each plane: if the corner
    /// furthest along a plane's normal is behind that plane, the whole box is
    /// outside. May report `true` for boxes just outside a frustum corner,
    /// never `false` for a visible box.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let normal = plane.xyz();
            normal.dot(aabb.positive_vertex(normal)) + plane.w >= 0.0
        })
    }
}
