//! Viewer camera: world pose plus a view-projection matrix refreshed per frame.

use glam::{Mat4, Vec3};

use crate::frustum::Frustum;

/// Perspective camera describing the viewer.
///
/// The chunk pipeline consumes exactly two things from it each frame: the
/// world position (for distance bucketing) and the view-projection matrix
/// (for frustum culling). Both are plain reads; the matrix is rebuilt when
/// the pose or projection changes.
#[derive(Debug, Clone)]
pub struct ViewerCamera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    fov_y_radians: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view_projection: Mat4,
}

impl ViewerCamera {
    /// Create a camera at `position` looking along `forward`.
    pub fn new(position: Vec3, forward: Vec3, fov_y_radians: f32, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            forward: forward.normalize_or(Vec3::NEG_Z),
            up: Vec3::Y,
            fov_y_radians,
            aspect,
            near: 0.1,
            far: 2000.0,
            view_projection: Mat4::IDENTITY,
        };
        camera.rebuild();
        camera
    }

    fn rebuild(&mut self) {
        let view = Mat4::look_to_rh(self.position, self.forward, self.up);
        let proj = Mat4::perspective_rh(self.fov_y_radians, self.aspect, self.near, self.far);
        self.view_projection = proj * view;
    }

    /// Move and reorient the viewer. Call once per frame before culling.
    pub fn set_pose(&mut self, position: Vec3, forward: Vec3) {
        self.position = position;
        self.forward = forward.normalize_or(Vec3::NEG_Z);
        self.rebuild();
    }

    /// Update the projection aspect ratio (e.g. after a window resize).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.rebuild();
    }

    /// Viewer world position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Combined view-projection matrix for the current pose.
    pub fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }

    /// Extract the view frustum for the current pose.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection)
    }
}
