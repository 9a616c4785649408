use crate::Vec4;

/// A half-line in 4D space.
///
/// Valid intersection parameters are strictly positive. The direction does not
/// have to be unit length; [`Ray::param_of`] accounts for its squared norm.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec4,
    pub direction: Vec4,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec4, direction: Vec4) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec4 {
        self.origin + self.direction * t
    }

    /// Map a point on the ray back to its parameter.
    ///
    /// Points off the ray are projected onto it first.
    #[inline]
    pub fn param_of(&self, point: Vec4) -> f32 {
        (point - self.origin).dot(self.direction) / self.direction.length_squared()
    }
}
