//! Scene model for the Lux ray tracer.
//!
//! A scene is a flat list of primitives (spheres and triangle meshes), each
//! with its own material and world transform, plus a list of point lights.
//! There is no hierarchy: every primitive carries its full world transform.

use std::sync::Arc;

use lux_math::{Color, Mat3, Mat4, Mat4Ext, Quat, Vec3};

use crate::mesh::Mesh;

/// Segment counts for the tessellated stand-in of an analytic sphere.
pub const SPHERE_WIDTH_SEGMENTS: u32 = 8;
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 4;

/// Phong surface description.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Diffuse/base color (RGB, 0-1)
    pub color: Color,

    /// Specular color (RGB, 0-1)
    pub specular: Color,

    /// Specular exponent
    pub shininess: f32,

    /// Whether reflected rays are traced from this surface
    pub mirror: bool,

    /// Blend weight of the reflected color, kept in [0, 1]
    reflectivity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::splat(0.5), // Grey default
            specular: Color::splat(0.067),
            shininess: 30.0,
            mirror: false,
            reflectivity: 0.0,
        }
    }
}

impl Material {
    /// Create a non-mirror material with the given base color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Create a material from a packed `0xRRGGBB` color.
    pub fn from_hex(rgb: u32) -> Self {
        Self::new(color_from_hex(rgb))
    }

    /// Set the specular color and exponent.
    pub fn with_specular(mut self, specular: Color, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    /// Turn this material into a mirror with the given reflectivity.
    ///
    /// Reflectivity is clamped into [0, 1].
    pub fn with_mirror(mut self, reflectivity: f32) -> Self {
        self.mirror = true;
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    /// Blend weight of the reflected color, always in [0, 1].
    pub fn reflectivity(&self) -> f32 {
        self.reflectivity
    }
}

/// Unpack a `0xRRGGBB` integer into a linear color.
pub fn color_from_hex(rgb: u32) -> Color {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    Color::new(channel(16), channel(8), channel(0))
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Builder-style rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder-style scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Stable identifier of a primitive: its insertion index in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(pub usize);

impl std::fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry of a primitive.
#[derive(Clone, Debug)]
pub enum Shape {
    /// A sphere centered on the object origin. The tessellation is used when
    /// analytic sphere intersection is switched off.
    Sphere { radius: f32, tessellation: Arc<Mesh> },

    /// An object-space triangle mesh.
    Mesh(Arc<Mesh>),
}

impl Shape {
    /// A sphere with the default tessellation.
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere {
            radius,
            tessellation: Arc::new(Mesh::uv_sphere(
                radius,
                SPHERE_WIDTH_SEGMENTS,
                SPHERE_HEIGHT_SEGMENTS,
            )),
        }
    }

    /// A triangle mesh shape.
    pub fn mesh(mesh: Mesh) -> Self {
        Shape::Mesh(Arc::new(mesh))
    }

    /// Triangle count of the mesh used for this shape when tessellated.
    pub fn triangle_count(&self) -> usize {
        match self {
            Shape::Sphere { tessellation, .. } => tessellation.triangle_count(),
            Shape::Mesh(mesh) => mesh.triangle_count(),
        }
    }
}

/// A shape placed in the world with a material.
///
/// The world matrix and its inverse are cached; change the transform through
/// [`Primitive::set_transform`] so they stay in sync.
#[derive(Clone, Debug)]
pub struct Primitive {
    id: PrimitiveId,

    /// Display name, used in logs and error messages
    pub name: String,

    pub shape: Shape,

    pub material: Material,

    transform: Transform,
    world: Mat4,
    inverse_world: Mat4,
    normal_matrix: Mat3,
}

impl Primitive {
    fn new(
        id: PrimitiveId,
        name: String,
        shape: Shape,
        material: Material,
        transform: Transform,
    ) -> Self {
        let world = transform.to_matrix();
        Self {
            id,
            name,
            shape,
            material,
            transform,
            world,
            inverse_world: world.inverse(),
            normal_matrix: world.normal_matrix(),
        }
    }

    pub fn id(&self) -> PrimitiveId {
        self.id
    }

    /// Replace the transform and refresh the cached matrices.
    pub fn set_transform(&mut self, transform: Transform) {
        self.world = transform.to_matrix();
        self.inverse_world = self.world.inverse();
        self.normal_matrix = self.world.normal_matrix();
        self.transform = transform;
    }

    /// Object → world matrix.
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// World → object matrix.
    pub fn inverse_world_matrix(&self) -> &Mat4 {
        &self.inverse_world
    }

    /// Map an object-space normal to a unit world-space normal using the
    /// inverse-transpose of the world matrix.
    pub fn normal_to_world(&self, normal: Vec3) -> Vec3 {
        (self.normal_matrix * normal).normalize()
    }

    /// World-space center and radius, if this primitive is a sphere.
    ///
    /// Non-uniform scale is not supported for analytic spheres; the largest
    /// scale component is used.
    pub fn world_sphere(&self) -> Option<(Vec3, f32)> {
        match &self.shape {
            Shape::Sphere { radius, .. } => Some((
                self.transform.translation,
                radius * self.transform.scale.abs().max_element(),
            )),
            Shape::Mesh(_) => None,
        }
    }
}

/// A point light.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    /// Lookup key for single-light rendering
    pub name: String,
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(name: impl Into<String>, position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            name: name.into(),
            position,
            color,
            intensity,
        }
    }
}

/// A complete scene containing primitives and lights.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<PointLight>,

    /// Scene name (used in logs)
    pub name: String,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a primitive to the scene and return its ID.
    pub fn add_primitive(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        material: Material,
        transform: Transform,
    ) -> PrimitiveId {
        let id = PrimitiveId(self.primitives.len());
        self.primitives
            .push(Primitive::new(id, name.into(), shape, material, transform));
        id
    }

    /// Add a point light.
    pub fn add_light(&mut self, light: PointLight) {
        if self.light_by_name(&light.name).is_some() {
            log::warn!(
                "Scene '{}' already has a light named '{}', lookups will find the first one",
                self.name,
                light.name
            );
        }
        self.lights.push(light);
    }

    /// All primitives in insertion order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// All lights in insertion order.
    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// First light with the given name.
    pub fn light_by_name(&self, name: &str) -> Option<&PointLight> {
        self.lights.iter().find(|light| light.name == name)
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0)
    }

    /// Mutable access for patching a primitive between render passes.
    pub fn primitive_mut(&mut self, id: PrimitiveId) -> Option<&mut Primitive> {
        self.primitives.get_mut(id.0)
    }

    /// First primitive with the given name.
    pub fn find_primitive(&self, name: &str) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.name == name)
    }

    /// Get total triangle count across all primitives, counting spheres by
    /// their tessellation.
    pub fn total_triangle_count(&self) -> usize {
        self.primitives.iter().map(|p| p.shape.triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new("test");

        let triangle = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]);
        let a = scene.add_primitive(
            "triangle",
            Shape::mesh(triangle),
            Material::default(),
            Transform::default(),
        );
        let b = scene.add_primitive(
            "ball",
            Shape::sphere(1.0),
            Material::default(),
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        );

        assert_eq!(a, PrimitiveId(0));
        assert_eq!(b, PrimitiveId(1));
        assert_eq!(scene.primitives().len(), 2);
        assert_eq!(scene.primitive(b).map(|p| p.name.as_str()), Some("ball"));
        assert_eq!(scene.total_triangle_count(), 1 + 48);
    }

    #[test]
    fn test_light_lookup_by_name() {
        let mut scene = Scene::new("lights");
        scene.add_light(PointLight::new("fill", Vec3::ONE, Color::ONE, 0.5));
        scene.add_light(PointLight::new("main_light", Vec3::Y, Color::X, 0.2));

        let main = scene.light_by_name("main_light").unwrap();
        assert_eq!(main.position, Vec3::Y);
        assert!(scene.light_by_name("missing").is_none());
        assert_eq!(scene.lights().len(), 2);
    }

    #[test]
    fn test_reflectivity_is_clamped() {
        assert_eq!(Material::default().with_mirror(1.5).reflectivity(), 1.0);
        assert_eq!(Material::default().with_mirror(-0.2).reflectivity(), 0.0);
        assert_eq!(Material::default().with_mirror(0.8).reflectivity(), 0.8);
        assert!(!Material::default().mirror);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(color_from_hex(0xff0000), Color::new(1.0, 0.0, 0.0));
        assert_eq!(color_from_hex(0x00ff00), Color::new(0.0, 1.0, 0.0));
        let grey = color_from_hex(0x666666);
        assert!((grey.x - 0.4).abs() < 1e-6 && grey.x == grey.y && grey.y == grey.z);
    }

    #[test]
    fn test_set_transform_refreshes_matrices() {
        let mut scene = Scene::new("move");
        let id = scene.add_primitive(
            "ball",
            Shape::sphere(0.5),
            Material::default(),
            Transform::default(),
        );

        let moved = Transform::from_translation(Vec3::new(0.0, 0.0, -5.0))
            .with_scale(Vec3::splat(2.0));
        scene.primitive_mut(id).unwrap().set_transform(moved);

        let prim = scene.primitive(id).unwrap();
        let p = Vec3::new(1.0, 2.0, 3.0);
        let back = prim
            .inverse_world_matrix()
            .transform_point3(prim.world_matrix().transform_point3(p));
        assert!((back - p).length() < 1e-5);
        assert_eq!(prim.world_sphere(), Some((Vec3::new(0.0, 0.0, -5.0), 1.0)));
    }

    #[test]
    fn test_normal_to_world_uses_inverse_transpose() {
        let mut scene = Scene::new("squashed");
        let id = scene.add_primitive(
            "wedge",
            Shape::mesh(Mesh::plane(1.0, 1.0)),
            Material::default(),
            Transform::default().with_scale(Vec3::new(1.0, 0.25, 1.0)),
        );
        let prim = scene.primitive(id).unwrap();

        // Slope y = x has normal (1, -1, 0); squashing y flattens the slope
        // so the world normal tilts toward -y
        let normal = prim.normal_to_world(Vec3::new(1.0, -1.0, 0.0).normalize());
        let tangent = prim.world_matrix().transform_vector3(Vec3::new(1.0, 1.0, 0.0));

        assert!(normal.dot(tangent).abs() < 1e-5);
        assert!((normal.length() - 1.0).abs() < 1e-5);
        assert!(normal.y.abs() > normal.x.abs());
    }

    #[test]
    fn test_transform_matrix_srt_order() {
        let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))
            .with_scale(Vec3::splat(2.0));

        // X is scaled to 2X, rotated onto -Z, then translated
        let p = transform.to_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 2.0, 1.0)).length() < 1e-5);
    }
}
