use crate::{Interval, Ray, Vec4};

/// Axis-aligned bounding box in 4D, used by the BVH and by the box primitives.
///
/// Zero-width axes are allowed (a disc lying in an axis hyperplane has one) and
/// stay queryable because [`Aabb::hit`] treats slabs as closed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec4,
    pub max: Vec4,
}

impl Aabb {
    /// Contains nothing; the identity for [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        min: Vec4::splat(f32::INFINITY),
        max: Vec4::splat(f32::NEG_INFINITY),
    };

    /// Contains everything. Extents stay finite so centers are well defined.
    pub const UNIVERSE: Aabb = Aabb {
        min: Vec4::splat(f32::MIN),
        max: Vec4::splat(f32::MAX),
    };

    /// Create an AABB from its corners. `min <= max` must hold per axis.
    pub fn new(min: Vec4, max: Vec4) -> Self {
        debug_assert!(min.cmple(max).all(), "inverted aabb {min:?} {max:?}");
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec4, b: Vec4) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point.
    pub fn from_point_cloud(points: impl IntoIterator<Item = Vec4>) -> Self {
        points.into_iter().fold(Self::EMPTY, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z, 3=W).
    pub fn axis_interval(&self, n: usize) -> Interval {
        Interval::new(self.min[n], self.max[n])
    }

    pub fn size(&self) -> Vec4 {
        self.max - self.min
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> Vec4 {
        (self.min + self.max) * 0.5
    }

    /// Returns the index of the axis with the longest extent; ties go to the lower axis.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        (1..4).fold(0, |best, axis| if size[axis] > size[best] { axis } else { best })
    }

    /// Inclusive point containment.
    pub fn contains(&self, point: Vec4) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }

    /// Grow every axis by `delta` on both sides.
    pub fn padded(&self, delta: f32) -> Aabb {
        Aabb {
            min: self.min - Vec4::splat(delta),
            max: self.max + Vec4::splat(delta),
        }
    }

    /// Test if a ray intersects this AABB within the given parameter window.
    ///
    /// Slab method over the four axes. A zero direction component means the
    /// ray runs parallel to that slab, so it hits only if the origin is inside it.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        let mut window = ray_t;
        for axis in 0..4 {
            let slab = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            if dir == 0.0 {
                if !slab.contains(origin) {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (slab.min - origin) * inv;
            let mut t1 = (slab.max - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            window = window.overlap(&Interval::new(t0, t1));
            if window.is_empty() {
                return false;
            }
        }
        true
    }
}
