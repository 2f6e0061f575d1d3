use glam::{Mat4, Vec2, Vec3};

use crate::Ray;

/// Pinhole camera for 3D rendering
///
/// `fov_y` is stored in radians. The projection follows glam's right-handed
/// convention with depth in [0, 1], so the near plane sits at NDC z = 0.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 45.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Builder-style vertical field of view, in degrees.
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov_y = degrees.to_radians();
        self
    }

    /// Builder-style near/far clip distances.
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix (camera → clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unproject an NDC coordinate on the near plane to a world-space ray.
    ///
    /// `(-1, 1)` is the top-left corner of the image and `(1, -1)` the
    /// bottom-right. The ray starts at the camera position and has a unit
    /// direction.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix().inverse();
        self.ray_through_ndc_with(&inverse, ndc)
    }

    /// Same as [`Camera::ray_through_ndc`] with a precomputed inverse
    /// view-projection matrix, for callers generating many rays per frame.
    pub fn ray_through_ndc_with(&self, inverse_view_projection: &Mat4, ndc: Vec2) -> Ray {
        let near_point = inverse_view_projection.project_point3(ndc.extend(0.0));
        Ray::towards(self.position, near_point)
    }
}
