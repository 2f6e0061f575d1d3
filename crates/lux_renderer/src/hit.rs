//! Intersection records.

use lux_core::Primitive;
use lux_math::Vec3;

use crate::error::{ShadeError, ShadeResult};

/// How the surface normal of a hit is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceNormal {
    /// World-space unit normal from the analytic sphere test, oriented
    /// against the incoming ray.
    Analytic(Vec3),

    /// Object-space unit normal of the struck triangle, already oriented
    /// against the incoming ray. `None` for degenerate triangles.
    Face(Option<Vec3>),
}

/// Record of a ray-primitive intersection.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Euclidean distance from the ray origin, always > 0
    pub distance: f32,
    /// World-space point of intersection
    pub point: Vec3,
    /// The primitive that was hit
    pub primitive: &'a Primitive,
    pub normal: SurfaceNormal,
}

impl<'a> Intersection<'a> {
    /// Unit world-space normal at the hit.
    ///
    /// Face normals go through the primitive's inverse-transpose world
    /// matrix. A triangle without a face normal is an error.
    pub fn world_normal(&self) -> ShadeResult<Vec3> {
        match self.normal {
            SurfaceNormal::Analytic(normal) => Ok(normal),
            SurfaceNormal::Face(Some(normal)) => Ok(self.primitive.normal_to_world(normal)),
            SurfaceNormal::Face(None) => Err(ShadeError::MissingFaceNormal {
                primitive: self.primitive.id(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::{Material, Mesh, PrimitiveId, Scene, Shape, Transform};
    use lux_math::Quat;

    fn tilted_plane() -> Scene {
        let mut scene = Scene::new("hit");
        scene.add_primitive(
            "plane",
            Shape::mesh(Mesh::plane(1.0, 1.0)),
            Material::default(),
            Transform::default().with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        );
        scene
    }

    #[test]
    fn test_face_normal_goes_to_world() {
        let scene = tilted_plane();
        let hit = Intersection {
            distance: 1.0,
            point: Vec3::ZERO,
            primitive: &scene.primitives()[0],
            normal: SurfaceNormal::Face(Some(Vec3::Z)),
        };

        let normal = hit.world_normal().unwrap();
        assert!((normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_analytic_normal_passes_through() {
        let scene = tilted_plane();
        let hit = Intersection {
            distance: 1.0,
            point: Vec3::ZERO,
            primitive: &scene.primitives()[0],
            normal: SurfaceNormal::Analytic(Vec3::X),
        };

        assert_eq!(hit.world_normal().unwrap(), Vec3::X);
    }

    #[test]
    fn test_missing_face_normal_is_an_error() {
        let scene = tilted_plane();
        let hit = Intersection {
            distance: 1.0,
            point: Vec3::ZERO,
            primitive: &scene.primitives()[0],
            normal: SurfaceNormal::Face(None),
        };

        assert_eq!(
            hit.world_normal(),
            Err(ShadeError::MissingFaceNormal {
                primitive: PrimitiveId(0)
            })
        );
    }
}
