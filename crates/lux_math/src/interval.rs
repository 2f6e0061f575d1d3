/// A closed range of `t` values along a ray.
///
/// The tracer only accepts hits strictly in front of the ray origin, so most
/// callers use [`Interval::POSITIVE`] together with [`Interval::surrounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Open-ended interval of strictly positive distances, `(0, inf)`.
    pub const POSITIVE: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Same interval with `max` pulled in to `limit` when that is nearer.
    pub fn up_to(&self, limit: f32) -> Interval {
        Interval::new(self.min, self.max.min(limit))
    }
}
