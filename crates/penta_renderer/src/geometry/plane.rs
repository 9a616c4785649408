use super::{pad_bounds, MicroGeometry};
use crate::error::{check_finite, check_positive, check_unit, PhysicsError, PhysicsResult};
use penta_math::{Aabb, Ray, Vec4};

/// The hyperplane `{p | p·normal = offset}`.
///
/// With a cutoff radius only the 3-ball of that radius around the foot point
/// `normal * offset` is kept, which gives the plane finite bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vec4,
    offset: f32,
    cutoff: Option<f32>,
}

impl Plane {
    pub fn new(normal: Vec4, offset: f32, cutoff: Option<f32>) -> PhysicsResult<Self> {
        if !offset.is_finite() {
            return Err(PhysicsError::NotFinite {
                what: "plane offset",
                value: Vec4::splat(offset),
            });
        }
        Ok(Self {
            normal: check_unit("plane normal", normal)?,
            offset,
            cutoff: cutoff.map(|r| check_positive("plane cutoff radius", r)).transpose()?,
        })
    }

    pub fn normal(&self) -> Vec4 {
        self.normal
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn intersect(&self, ray: &Ray) -> Option<MicroGeometry> {
        let hit = intersect_hyperplane(self.normal, self.offset, ray)?;
        match self.cutoff {
            Some(radius) if (hit.pos - self.normal * self.offset).length() > radius => None,
            _ => Some(hit),
        }
    }

    pub fn bounds(&self) -> Aabb {
        if let Some(radius) = self.cutoff {
            return ball_bounds(self.normal * self.offset, self.normal, radius);
        }

        // Unbounded, except along the normal when it is a coordinate axis.
        let mut bounds = Aabb::UNIVERSE;
        let mask = self.normal.cmpne(Vec4::ZERO).bitmask();
        if mask.count_ones() == 1 {
            let axis = mask.trailing_zeros() as usize;
            let at = self.normal[axis] * self.offset;
            let pad = 1e-4 * at.abs().max(1.0);
            bounds.min[axis] = at - pad;
            bounds.max[axis] = at + pad;
        }
        bounds
    }
}

/// A flat 3-ball embedded in 4D, double sided.
#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    center: Vec4,
    normal: Vec4,
    radius: f32,
}

impl Disc {
    pub fn new(center: Vec4, normal: Vec4, radius: f32) -> PhysicsResult<Self> {
        Ok(Self {
            center: check_finite("disc center", center)?,
            normal: check_unit("disc normal", normal)?,
            radius: check_positive("disc radius", radius)?,
        })
    }

    pub fn intersect(&self, ray: &Ray) -> Option<MicroGeometry> {
        let hit = intersect_hyperplane(self.normal, self.normal.dot(self.center), ray)?;
        if (hit.pos - self.center).length() > self.radius {
            return None;
        }
        Some(hit)
    }

    pub fn bounds(&self) -> Aabb {
        ball_bounds(self.center, self.normal, self.radius)
    }
}

/// Ray against an unbounded hyperplane; the normal opposes the ray.
fn intersect_hyperplane(normal: Vec4, offset: f32, ray: &Ray) -> Option<MicroGeometry> {
    let perp = normal.dot(ray.direction);
    if perp == 0.0 {
        return None;
    }
    let t = (offset - normal.dot(ray.origin)) / perp;
    if !(t > 0.0) {
        return None;
    }
    let facing = if perp > 0.0 { -normal } else { normal };
    Some(MicroGeometry::new(ray.at(t), facing))
}

/// Bounds of a 3-ball of `radius` around `center` lying in the hyperplane
/// with unit `normal`. Its extent along axis i is `radius * sqrt(1 - n_i²)`.
fn ball_bounds(center: Vec4, normal: Vec4, radius: f32) -> Aabb {
    let extent = Vec4::from_array(normal.to_array().map(|n| radius * (1.0 - n * n).max(0.0).sqrt()));
    pad_bounds(Aabb::new(center - extent, center + extent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use penta_math::Interval;

    #[test]
    fn test_plane_normal_faces_ray() {
        let plane = Plane::new(Vec4::W, 2.0, None).unwrap();

        let from_below = plane.intersect(&Ray::new(Vec4::ZERO, Vec4::W)).unwrap();
        assert_eq!(from_below.pos, Vec4::new(0.0, 0.0, 0.0, 2.0));
        assert_eq!(from_below.normal, -Vec4::W);

        let from_above = plane
            .intersect(&Ray::new(Vec4::new(1.0, 0.0, 0.0, 5.0), -Vec4::W))
            .unwrap();
        assert_eq!(from_above.normal, Vec4::W);
    }

    #[test]
    fn test_plane_parallel_and_behind() {
        let plane = Plane::new(Vec4::W, 2.0, None).unwrap();
        assert!(plane.intersect(&Ray::new(Vec4::ZERO, Vec4::X)).is_none());
        assert!(plane.intersect(&Ray::new(Vec4::ZERO, -Vec4::W)).is_none());
    }

    #[test]
    fn test_plane_rejects_non_unit_normal() {
        assert!(Plane::new(Vec4::new(0.0, 0.0, 0.0, 2.0), 1.0, None).is_err());
        assert!(Plane::new(Vec4::W, 1.0, Some(0.0)).is_err());
    }

    #[test]
    fn test_plane_cutoff_limits_hits_and_bounds() {
        let plane = Plane::new(Vec4::Y, -1.0, Some(10.0)).unwrap();
        let near = Ray::new(Vec4::new(3.0, 0.0, 0.0, 0.0), -Vec4::Y);
        let far = Ray::new(Vec4::new(30.0, 0.0, 0.0, 0.0), -Vec4::Y);

        assert!(plane.intersect(&near).is_some());
        assert!(plane.intersect(&far).is_none());

        let bounds = plane.bounds();
        assert!(bounds.max.x >= 10.0 && bounds.max.x < 10.1);
        assert!(bounds.hit(&near, Interval::POSITIVE));
    }

    #[test]
    fn test_axis_plane_bounds_are_thin() {
        let bounds = Plane::new(-Vec4::Z, 3.0, None).unwrap().bounds();
        assert!(bounds.min.z < -3.0 && bounds.max.z > -3.0);
        assert!(bounds.size().z < 0.01);
        assert_eq!(bounds.max.x, f32::MAX);
    }

    #[test]
    fn test_disc_radial_cutoff() {
        let disc = Disc::new(Vec4::new(0.0, 0.0, 0.0, 4.0), Vec4::W, 1.0).unwrap();

        let hit = disc.intersect(&Ray::new(Vec4::new(0.5, 0.5, 0.0, 0.0), Vec4::W)).unwrap();
        assert_eq!(hit.normal, -Vec4::W);
        assert!(disc.intersect(&Ray::new(Vec4::new(0.8, 0.8, 0.0, 0.0), Vec4::W)).is_none());
    }

    #[test]
    fn test_disc_hit_is_within_bounds() {
        let normal = Vec4::new(1.0, 1.0, 0.0, 1.0).normalize();
        let disc = Disc::new(Vec4::new(1.0, 2.0, 3.0, 4.0), normal, 2.0).unwrap();
        let ray = Ray::new(Vec4::new(1.0, 2.0, 3.0, 4.0) + normal * 5.0, -normal + Vec4::Z * 0.1);

        let hit = disc.intersect(&ray).unwrap();
        assert!(disc.bounds().contains(hit.pos));
        assert!((hit.pos - Vec4::new(1.0, 2.0, 3.0, 4.0)).length() <= 2.0);
    }
}
