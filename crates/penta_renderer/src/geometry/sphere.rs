use super::{pad_bounds, MicroGeometry};
use crate::error::{check_finite, check_positive, PhysicsResult};
use penta_math::{Aabb, Ray, Vec4};

/// A solid 4-ball. Normals point outward.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec4,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Vec4, radius: f32) -> PhysicsResult<Self> {
        Ok(Self {
            center: check_finite("sphere center", center)?,
            radius: check_positive("sphere radius", radius)?,
        })
    }

    pub fn center(&self) -> Vec4 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn intersect(&self, ray: &Ray) -> Option<MicroGeometry> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        if a == 0.0 {
            return None;
        }
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the positive range
        let near = (-half_b - sqrtd) / a;
        let far = (-half_b + sqrtd) / a;
        let t = if near > 0.0 {
            near
        } else if far > 0.0 {
            far
        } else {
            return None;
        };

        let pos = ray.at(t);
        let normal = (pos - self.center).normalize();
        Some(MicroGeometry::new(pos, normal))
    }

    pub fn bounds(&self) -> Aabb {
        let r = Vec4::splat(self.radius);
        pad_bounds(Aabb::new(self.center - r, self.center + r))
    }
}
