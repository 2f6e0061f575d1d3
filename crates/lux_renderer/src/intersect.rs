//! Ray-scene intersection.
//!
//! Every primitive is tested on every query; there is no acceleration
//! structure. Spheres are solved analytically (or through their
//! tessellation when `correct_spheres` is off) and meshes use Möller-Trumbore
//! in object space.

use std::ops::ControlFlow;

use lux_core::{Mesh, Primitive, PrimitiveId, Shape};
use lux_math::{Interval, Ray, Vec3};

use crate::context::RenderContext;
use crate::hit::{Intersection, SurfaceNormal};

/// Real roots of a quadratic, ascending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    Zero,
    One(f32),
    Two(f32, f32),
}

impl Roots {
    pub fn iter(&self) -> impl Iterator<Item = f32> {
        let (first, second) = match *self {
            Roots::Zero => (None, None),
            Roots::One(t) => (Some(t), None),
            Roots::Two(t0, t1) => (Some(t0), Some(t1)),
        };
        first.into_iter().chain(second)
    }

    /// Keep only roots inside `range` (exclusive).
    pub fn within(self, range: Interval) -> Roots {
        let mut kept = self.iter().filter(|t| range.surrounds(*t));
        match (kept.next(), kept.next()) {
            (Some(t0), Some(t1)) => Roots::Two(t0, t1),
            (Some(t), None) => Roots::One(t),
            _ => Roots::Zero,
        }
    }
}

/// Solve `a t² + b t + c = 0` for real `t`.
///
/// Uses the cancellation-free form `q = -½(b + sign(b)√Δ)`,
/// `t0 = q / a`, `t1 = c / q`. A zero discriminant gives the single root
/// `-b / 2a`.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Roots {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Roots::Zero;
    }
    if discriminant == 0.0 {
        return Roots::One(-0.5 * b / a);
    }

    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    let (t0, t1) = (q / a, c / q);
    if t0 <= t1 {
        Roots::Two(t0, t1)
    } else {
        Roots::Two(t1, t0)
    }
}

/// Ray parameters where `ray` meets the sphere, restricted to `t > 0`.
///
/// `t` is in units of the ray direction's length.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Roots {
    let l = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * ray.direction.dot(l);
    let c = l.dot(l) - radius * radius;
    solve_quadratic(a, b, c).within(Interval::POSITIVE)
}

/// A ray-triangle hit in the triangle's own space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    /// Barycentric coordinates of the hit relative to v1 and v2
    pub u: f32,
    pub v: f32,
}

/// Möller-Trumbore ray-triangle intersection, double-sided.
///
/// Returns hits with `t > 0` only.
pub fn intersect_triangle(ray: &Ray, triangle: &[Vec3; 3]) -> Option<TriangleHit> {
    let [v0, v1, v2] = *triangle;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-8 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    Interval::POSITIVE
        .surrounds(t)
        .then_some(TriangleHit { t, u, v })
}

impl<'a> RenderContext<'a> {
    /// Visit every hit of `ray` with every primitive except `exclude`, in
    /// primitive order. Stops early when the visitor breaks.
    pub fn for_each_hit<F>(&self, ray: &Ray, exclude: Option<PrimitiveId>, mut visit: F)
    where
        F: FnMut(Intersection<'a>) -> ControlFlow<()>,
    {
        for primitive in self.scene.primitives() {
            if Some(primitive.id()) == exclude {
                continue;
            }
            let flow = match &primitive.shape {
                Shape::Sphere { tessellation, .. } => {
                    if self.settings.correct_spheres {
                        visit_sphere(ray, primitive, &mut visit)
                    } else {
                        visit_mesh(ray, primitive, tessellation, &mut visit)
                    }
                }
                Shape::Mesh(mesh) => visit_mesh(ray, primitive, mesh, &mut visit),
            };
            if flow.is_break() {
                return;
            }
        }
    }

    /// All hits along `ray`, nearest first.
    ///
    /// Equal distances keep primitive insertion order.
    pub fn intersect_all(&self, ray: &Ray, exclude: Option<PrimitiveId>) -> Vec<Intersection<'a>> {
        let mut hits = Vec::new();
        self.for_each_hit(ray, exclude, |hit| {
            hits.push(hit);
            ControlFlow::Continue(())
        });
        // Stable, so ties stay in insertion order
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// The nearest hit along `ray`, the same hit `intersect_all` lists first.
    pub fn closest_hit(&self, ray: &Ray, exclude: Option<PrimitiveId>) -> Option<Intersection<'a>> {
        let mut closest: Option<Intersection<'a>> = None;
        self.for_each_hit(ray, exclude, |hit| {
            if closest.map_or(true, |best| hit.distance < best.distance) {
                closest = Some(hit);
            }
            ControlFlow::Continue(())
        });
        closest
    }

    /// Whether anything other than `exclude` lies on `ray` closer than
    /// `max_distance`.
    pub fn occluded(&self, ray: &Ray, exclude: Option<PrimitiveId>, max_distance: f32) -> bool {
        let range = Interval::POSITIVE.up_to(max_distance);
        let mut blocked = false;
        self.for_each_hit(ray, exclude, |hit| {
            if range.surrounds(hit.distance) {
                blocked = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        blocked
    }
}

fn visit_sphere<'a, F>(ray: &Ray, primitive: &'a Primitive, visit: &mut F) -> ControlFlow<()>
where
    F: FnMut(Intersection<'a>) -> ControlFlow<()>,
{
    let Some((center, radius)) = primitive.world_sphere() else {
        return ControlFlow::Continue(());
    };
    let scale = ray.direction.length();

    for t in intersect_sphere(ray, center, radius).iter() {
        let point = ray.at(t);
        let outward = (point - center).normalize();
        // Same orientation rule as mesh faces: against the incoming ray
        let normal = if outward.dot(ray.direction) > 0.0 {
            -outward
        } else {
            outward
        };
        visit(Intersection {
            distance: t * scale,
            point,
            primitive,
            normal: SurfaceNormal::Analytic(normal),
        })?;
    }
    ControlFlow::Continue(())
}

fn visit_mesh<'a, F>(
    ray: &Ray,
    primitive: &'a Primitive,
    mesh: &Mesh,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(Intersection<'a>) -> ControlFlow<()>,
{
    // `t` is the same in both spaces because the map is affine and the
    // object ray's direction is not renormalized
    let inverse = primitive.inverse_world_matrix();
    let object_ray = Ray {
        origin: inverse.transform_point3(ray.origin),
        direction: inverse.transform_vector3(ray.direction),
    };
    let scale = ray.direction.length();

    for triangle in mesh.triangles() {
        let Some(hit) = intersect_triangle(&object_ray, &triangle) else {
            continue;
        };
        let face_normal = Mesh::face_normal(&triangle).map(|n| {
            if n.dot(object_ray.direction) > 0.0 {
                -n
            } else {
                n
            }
        });
        visit(Intersection {
            distance: hit.t * scale,
            point: ray.at(hit.t),
            primitive,
            normal: SurfaceNormal::Face(face_normal),
        })?;
    }
    ControlFlow::Continue(())
}
