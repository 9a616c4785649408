use super::{pad_bounds, MicroGeometry};
use crate::error::{PhysicsError, PhysicsResult};
use penta_math::{Aabb, Pose, Ray, Vec4};

/// Relative tolerance for a face hit to count as inside the other slabs.
const FACE_TOLERANCE: f32 = 1e-5;

/// A solid axis-aligned box. Normals point outward.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    bounds: Aabb,
}

impl Cuboid {
    pub fn new(min: Vec4, max: Vec4) -> PhysicsResult<Self> {
        let size = max - min;
        if !(size.cmpgt(Vec4::ZERO).all() && size.is_finite()) {
            return Err(PhysicsError::NonPositiveSize { size });
        }
        Ok(Self {
            bounds: Aabb::new(min, max),
        })
    }

    pub fn intersect(&self, ray: &Ray) -> Option<MicroGeometry> {
        intersect_slabs(&self.bounds, ray)
    }

    pub fn bounds(&self) -> Aabb {
        pad_bounds(self.bounds)
    }
}

/// A solid box with arbitrary orientation: a centered box of the given half
/// size, placed by a pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Obb {
    pose: Pose,
    local: Aabb,
}

impl Obb {
    pub fn new(pose: Pose, half_size: Vec4) -> PhysicsResult<Self> {
        if !(half_size.cmpgt(Vec4::ZERO).all() && half_size.is_finite()) {
            return Err(PhysicsError::NonPositiveSize { size: half_size * 2.0 });
        }
        Ok(Self {
            pose,
            local: Aabb::new(-half_size, half_size),
        })
    }

    pub fn half_size(&self) -> Vec4 {
        self.local.max
    }

    pub fn intersect(&self, ray: &Ray) -> Option<MicroGeometry> {
        let local_ray = Ray::new(
            self.pose.inverse_transform_point(ray.origin),
            self.pose.inverse_transform_vector(ray.direction),
        );
        let hit = intersect_slabs(&self.local, &local_ray)?;
        Some(MicroGeometry::new(
            self.pose.transform_point(hit.pos),
            self.pose.transform_vector(hit.normal),
        ))
    }

    pub fn bounds(&self) -> Aabb {
        let corners = (0..16u32).map(|mask| {
            let local = Vec4::from_array(std::array::from_fn(|axis| {
                if mask & (1 << axis) != 0 {
                    self.local.max[axis]
                } else {
                    self.local.min[axis]
                }
            }));
            self.pose.transform_point(local)
        });
        pad_bounds(Aabb::from_point_cloud(corners))
    }
}

/// Nearest positive face hit of a ray against a box, with the outward normal.
///
/// Each of the eight faces is tested on its own: the hit on a face's
/// hyperplane must fall inside the other three slabs.
fn intersect_slabs(bounds: &Aabb, ray: &Ray) -> Option<MicroGeometry> {
    let size = bounds.size();
    let mut best: Option<(f32, MicroGeometry)> = None;

    for axis in 0..4 {
        let dir = ray.direction[axis];
        if dir == 0.0 {
            continue;
        }
        for (face, sign) in [(bounds.min[axis], -1.0), (bounds.max[axis], 1.0)] {
            let t = (face - ray.origin[axis]) / dir;
            if !(t > 0.0) || best.is_some_and(|(nearest, _)| t >= nearest) {
                continue;
            }

            let mut pos = ray.at(t);
            pos[axis] = face;
            let on_face = (0..4).filter(|&other| other != axis).all(|other| {
                let tol = FACE_TOLERANCE * size[other].max(1.0);
                bounds.min[other] - tol <= pos[other] && pos[other] <= bounds.max[other] + tol
            });
            if on_face {
                let mut normal = Vec4::ZERO;
                normal[axis] = sign;
                best = Some((t, MicroGeometry::new(pos, normal)));
            }
        }
    }

    best.map(|(_, hit)| hit)
}
