//! Phong (Blinn half-vector) shading with point lights and hard shadows.

use lux_core::PointLight;
use lux_math::{Color, Ray, Vec3};

use crate::context::RenderContext;
use crate::error::ShadeResult;
use crate::hit::Intersection;

/// Scale applied to every light's intensity before inverse-square falloff.
pub const LIGHT_BRIGHTNESS: f32 = 4.0;

/// Energy normalization of the specular lobe, `2 / (n + 2)`.
///
/// Sharper highlights (larger exponents) get dimmer so they don't dominate
/// the diffuse term.
pub fn specular_normalization(shininess: f32) -> f32 {
    2.0 / (shininess + 2.0)
}

/// Whether `light` is hidden from the hit point by another primitive.
///
/// The primitive that was hit is never its own occluder, and objects beyond
/// the light don't count.
pub fn in_shadow(ctx: &RenderContext, hit: &Intersection, light: &PointLight) -> bool {
    let to_light = light.position - hit.point;
    let distance = to_light.length();
    if distance <= 0.0 {
        return false;
    }
    let shadow_ray = Ray::new(hit.point, to_light / distance);
    ctx.occluded(&shadow_ray, Some(hit.primitive.id()), distance)
}

/// Contribution of one light at a hit.
///
/// `normal` is the unit world normal and `view` the unit direction from the
/// hit back toward the viewer. Returns black when shadows are on and the
/// light is blocked.
pub fn shade(
    ctx: &RenderContext,
    hit: &Intersection,
    normal: Vec3,
    view: Vec3,
    light: &PointLight,
) -> Color {
    let to_light = light.position - hit.point;
    let distance_squared = to_light.length_squared();
    let Some(light_dir) = to_light.try_normalize() else {
        return Color::ZERO;
    };

    if ctx.settings.shadows && in_shadow(ctx, hit, light) {
        return Color::ZERO;
    }

    let material = &hit.primitive.material;
    let irradiance = light.color * light.intensity * LIGHT_BRIGHTNESS / distance_squared;

    let cos_theta = light_dir.dot(normal).max(0.0);
    let diffuse = cos_theta * irradiance * material.color;

    let specular = match (view + light_dir).try_normalize() {
        Some(half) => {
            let cos_half = half.dot(normal);
            if cos_half > 0.0 {
                cos_half.powf(material.shininess)
                    * specular_normalization(material.shininess)
                    * irradiance
                    * material.specular
            } else {
                Color::ZERO
            }
        }
        None => Color::ZERO,
    };

    diffuse + specular
}

/// Direct color at a hit: flat base color when Phong is off, otherwise the
/// sum over the active lights.
pub fn shade_all(ctx: &RenderContext, hit: &Intersection, ray: &Ray) -> ShadeResult<Color> {
    if !ctx.settings.phong {
        return Ok(hit.primitive.material.color);
    }

    let normal = hit.world_normal()?;
    let view = -ray.direction.normalize();

    Ok(ctx
        .active_lights()
        .iter()
        .map(|light| shade(ctx, hit, normal, view, light))
        .sum())
}
