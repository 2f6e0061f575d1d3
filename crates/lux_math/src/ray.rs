use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Every ray the tracer casts (primary, shadow and reflected rays) has a
/// unit-length direction, so `t` along the ray is also the Euclidean
/// distance from the origin. The type itself does not enforce unit length;
/// `Ray::towards` is the normalizing constructor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    ///
    /// The direction must not be zero-length.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(
            direction.length_squared() > 0.0,
            "ray direction must not be zero-length"
        );
        Self { origin, direction }
    }

    /// Create a ray from `origin` through `target` with a normalized direction.
    ///
    /// `origin` and `target` must be distinct points.
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, (target - origin).normalize())
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_towards_normalizes() {
        let ray = Ray::towards(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, -9.0));

        assert_eq!(ray.origin(), Vec3::new(1.0, 1.0, 1.0));
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-6);
        assert!((ray.at(10.0) - Vec3::new(1.0, 1.0, -9.0)).length() < 1e-5);
    }
}
