// Transform utilities for Mat4
//
// Extends glam::Mat4 with the normal-matrix helpers the shader needs.
// Note: glam::Mat4 already provides transform_point3(), transform_vector3()
// and inverse()

use glam::{Mat3, Mat4};

/// Extension trait for Mat4 to provide the normal matrix
pub trait Mat4Ext {
    /// The inverse-transpose of the upper 3x3 block.
    ///
    /// Surface normals must be transformed by this matrix rather than the
    /// world matrix itself, otherwise non-uniform scale skews them.
    fn normal_matrix(&self) -> Mat3;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn transform_normal(mat: &Mat4, normal: Vec3) -> Vec3 {
        (mat.normal_matrix() * normal).normalize()
    }

    #[test]
    fn test_normal_matrix_ignores_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let n = Vec3::new(0.0, 1.0, 0.0);

        assert!((transform_normal(&mat, n) - n).length() < 1e-6);
    }

    #[test]
    fn test_normal_follows_rotation() {
        use std::f32::consts::PI;

        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let transformed = transform_normal(&mat, Vec3::X);

        // X normal should rotate to Y normal
        assert!((transformed - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_normal_stays_perpendicular_under_non_uniform_scale() {
        let mat = Mat4::from_scale_rotation_translation(
            Vec3::new(4.0, 1.0, 1.0),
            Quat::from_rotation_y(0.3),
            Vec3::new(1.0, 2.0, 3.0),
        );

        // A 45 degree slope in the xy plane: tangent (1,1,0), normal (1,-1,0)
        let tangent = Vec3::new(1.0, 1.0, 0.0);
        let normal = Vec3::new(1.0, -1.0, 0.0).normalize();

        let world_tangent = mat.transform_vector3(tangent);
        let world_normal = transform_normal(&mat, normal);

        assert!(world_tangent.dot(world_normal).abs() < 1e-5);
        assert!((world_normal.length() - 1.0).abs() < 1e-5);

        // The naive transform would not be perpendicular
        let naive = mat.transform_vector3(normal).normalize();
        assert!(world_tangent.dot(naive).abs() > 1e-2);
    }

    #[test]
    fn test_mat4_inverse_round_trip() {
        let mat = Mat4::from_rotation_y(std::f32::consts::PI / 4.0)
            * Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let inv = mat.inverse();

        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = inv.transform_point3(mat.transform_point3(point));

        assert!((back - point).length() < 0.001);
    }
}
