//! Recursive mirror reflection.

use lux_math::{Color, Ray};

use crate::context::RenderContext;
use crate::error::ShadeResult;
use crate::hit::Intersection;
use crate::shade::shade_all;

/// Color returned for rays that leave the scene.
pub const BACKGROUND: Color = Color::ZERO;

/// Final color of a hit, blending in mirror bounces.
///
/// `depth` is the number of bounces already taken to reach `hit`; primary
/// hits start at 0. A mirror at the bounce limit, or whose reflected ray
/// escapes, blends toward the black background by its reflectivity.
pub fn resolve_color(
    ctx: &RenderContext,
    hit: &Intersection,
    ray: &Ray,
    depth: u32,
) -> ShadeResult<Color> {
    let direct = shade_all(ctx, hit, ray)?;
    let material = &hit.primitive.material;

    if !material.mirror || !ctx.settings.mirrors || ctx.settings.max_depth == 0 {
        return Ok(direct);
    }

    let reflectivity = material.reflectivity();
    if depth >= ctx.settings.max_depth {
        return Ok(direct.lerp(BACKGROUND, reflectivity));
    }

    let normal = hit.world_normal()?;
    let reflected = Ray::new(hit.point, ray.direction.normalize().reflect(normal));

    match ctx.closest_hit(&reflected, Some(hit.primitive.id())) {
        None => Ok(direct.lerp(BACKGROUND, reflectivity)),
        Some(next) => {
            let bounce = resolve_color(ctx, &next, &reflected, depth + 1)?;
            Ok(direct.lerp(bounce, reflectivity))
        }
    }
}

/// Color seen along a ray: the closest hit resolved with reflections, or
/// the background.
pub fn trace(ctx: &RenderContext, ray: &Ray) -> ShadeResult<Color> {
    match ctx.closest_hit(ray, None) {
        Some(hit) => resolve_color(ctx, &hit, ray, 0),
        None => Ok(BACKGROUND),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShadeError;
    use lux_core::{Material, Mesh, PointLight, PrimitiveId, RenderSettings, Scene, Shape, Transform};
    use lux_math::Vec3;

    const EPS: f32 = 1e-5;

    /// A mirror floor facing +Z at the origin with a red sphere above it. The
    /// light sits between them so the underside of the sphere is lit.
    fn mirror_scene() -> Scene {
        let mut scene = Scene::new("mirror");
        scene.add_primitive(
            "mirror",
            Shape::mesh(Mesh::plane(20.0, 20.0)),
            Material::new(Color::splat(0.2)).with_mirror(0.5),
            Transform::default(),
        );
        scene.add_primitive(
            "ball",
            Shape::sphere(1.0),
            Material::new(Color::new(1.0, 0.0, 0.0)),
            Transform::from_translation(Vec3::new(0.0, 0.0, 4.0)),
        );
        scene.add_light(PointLight::new("main_light", Vec3::new(0.0, 3.0, 1.0), Color::ONE, 2.0));
        scene
    }

    fn settings(edit: impl FnOnce(&mut RenderSettings)) -> RenderSettings {
        let mut settings = RenderSettings {
            shadows: false,
            ..Default::default()
        };
        edit(&mut settings);
        settings
    }

    /// Look straight down -Z at the mirror, off to the side of the ball so
    /// the primary ray reaches the mirror. The reflection hits the ball.
    fn mirror_hit<'a>(ctx: &RenderContext<'a>) -> (Intersection<'a>, Ray) {
        let ray = Ray::new(Vec3::new(0.0, 0.3, 10.0), Vec3::NEG_Z);
        let hit = ctx.closest_hit(&ray, Some(PrimitiveId(1))).unwrap();
        (hit, ray)
    }

    #[test]
    fn test_mirrors_off_returns_direct_color() {
        let scene = mirror_scene();
        let ctx = RenderContext::new(&scene, settings(|s| s.mirrors = false)).unwrap();
        let (hit, ray) = mirror_hit(&ctx);

        let direct = shade_all(&ctx, &hit, &ray).unwrap();
        assert_eq!(resolve_color(&ctx, &hit, &ray, 0).unwrap(), direct);
    }

    #[test]
    fn test_zero_depth_returns_direct_color() {
        let scene = mirror_scene();
        let ctx = RenderContext::new(&scene, settings(|s| s.max_depth = 0)).unwrap();
        let (hit, ray) = mirror_hit(&ctx);

        let direct = shade_all(&ctx, &hit, &ray).unwrap();
        assert_eq!(resolve_color(&ctx, &hit, &ray, 0).unwrap(), direct);
    }

    #[test]
    fn test_bounce_blends_in_reflected_color() {
        let scene = mirror_scene();
        let ctx = RenderContext::new(&scene, settings(|_| {})).unwrap();
        let (hit, ray) = mirror_hit(&ctx);
        assert_eq!(hit.primitive.name, "mirror");

        let direct = shade_all(&ctx, &hit, &ray).unwrap();
        let resolved = resolve_color(&ctx, &hit, &ray, 0).unwrap();

        // The reflected ray goes straight up into the red ball
        let up = Ray::new(hit.point, Vec3::Z);
        let ball = ctx.closest_hit(&up, Some(hit.primitive.id())).unwrap();
        assert_eq!(ball.primitive.name, "ball");
        let bounce = resolve_color(&ctx, &ball, &up, 1).unwrap();

        let expected = direct.lerp(bounce, 0.5);
        assert!((resolved - expected).length() < EPS);
        assert!(resolved.x > resolved.y);
    }

    #[test]
    fn test_escaping_reflection_darkens() {
        let mut scene = mirror_scene();
        // Move the ball out of the reflected path
        scene
            .primitive_mut(PrimitiveId(1))
            .unwrap()
            .set_transform(Transform::from_translation(Vec3::new(8.0, 0.0, 4.0)));
        let ctx = RenderContext::new(&scene, settings(|_| {})).unwrap();
        let (hit, ray) = mirror_hit(&ctx);

        let direct = shade_all(&ctx, &hit, &ray).unwrap();
        let resolved = resolve_color(&ctx, &hit, &ray, 0).unwrap();
        assert!((resolved - direct * 0.5).length() < EPS);
    }

    #[test]
    fn test_depth_limit_darkens_without_tracing() {
        let scene = mirror_scene();
        let ctx = RenderContext::new(&scene, settings(|s| s.max_depth = 2)).unwrap();
        let (hit, ray) = mirror_hit(&ctx);

        let direct = shade_all(&ctx, &hit, &ray).unwrap();
        let at_limit = resolve_color(&ctx, &hit, &ray, 2).unwrap();
        assert!((at_limit - direct * 0.5).length() < EPS);
    }

    #[test]
    fn test_facing_mirrors_terminate() {
        let mut scene = Scene::new("hall");
        let mirror = Material::new(Color::splat(0.5)).with_mirror(1.0);
        scene.add_primitive(
            "south",
            Shape::mesh(Mesh::plane(10.0, 10.0)),
            mirror.clone(),
            Transform::from_translation(Vec3::new(0.0, 0.0, -1.0)),
        );
        scene.add_primitive(
            "north",
            Shape::mesh(Mesh::plane(10.0, 10.0)),
            mirror,
            Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
        );
        scene.add_light(PointLight::new("main_light", Vec3::ZERO, Color::ONE, 1.0));
        let ctx = RenderContext::new(&scene, settings(|s| s.max_depth = 7)).unwrap();

        // Full reflectivity: every bounce passes the black limit back up
        let color = trace(&ctx, &Ray::new(Vec3::ZERO, Vec3::Z)).unwrap();
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_trace_miss_is_background() {
        let scene = mirror_scene();
        let ctx = RenderContext::new(&scene, settings(|_| {})).unwrap();

        let color = trace(&ctx, &Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z)).unwrap();
        assert_eq!(color, BACKGROUND);
    }

    #[test]
    fn test_missing_normal_propagates() {
        let mut scene = Scene::new("sliver");
        // Nearly collinear in object space, stretched tall in world space
        let sliver = Mesh::new(
            vec![
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1e-7, 0.0),
            ],
            vec![0, 1, 2],
        );
        let id = scene.add_primitive(
            "sliver",
            Shape::mesh(sliver),
            Material::default(),
            Transform::default().with_scale(Vec3::new(1.0, 1e7, 1.0)),
        );
        scene.add_light(PointLight::new("main_light", Vec3::Z, Color::ONE, 1.0));
        let ctx = RenderContext::new(&scene, settings(|_| {})).unwrap();

        let err = trace(&ctx, &Ray::new(Vec3::new(0.0, 0.3, 5.0), Vec3::NEG_Z)).unwrap_err();
        assert_eq!(err, ShadeError::MissingFaceNormal { primitive: id });
    }
}
