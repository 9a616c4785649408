//! Ray intersection for the 4D primitive set.
//!
//! Every primitive reports a conservative bounding box: any ray that hits the
//! primitive also hits its [`Geometry::bounds`]. The BVH relies on this.
//!
//! Normal orientation: solids (sphere, boxes) return the outward normal;
//! hyper-surfaces without an inside (plane, disc, tetrahedron) return the
//! normal facing the side the ray arrived from.

mod cuboid;
mod plane;
mod sphere;
mod tetrahedron;

pub use cuboid::{Cuboid, Obb};
pub use plane::{Disc, Plane};
pub use sphere::Sphere;
pub use tetrahedron::Tetrahedron;

use penta_math::{Aabb, Ray, Vec4};

/// A surface point and its unit normal, produced by a successful intersection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MicroGeometry {
    pub pos: Vec4,
    pub normal: Vec4,
}

impl MicroGeometry {
    pub fn new(pos: Vec4, normal: Vec4) -> Self {
        Self { pos, normal }
    }
}

/// The closed set of primitives a scene object can be made of.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere(Sphere),
    Plane(Plane),
    Disc(Disc),
    Cuboid(Cuboid),
    Obb(Obb),
    Tetrahedron(Tetrahedron),
}

impl Geometry {
    /// Nearest intersection with parameter t > 0, if any.
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<MicroGeometry> {
        match self {
            Geometry::Sphere(g) => g.intersect(ray),
            Geometry::Plane(g) => g.intersect(ray),
            Geometry::Disc(g) => g.intersect(ray),
            Geometry::Cuboid(g) => g.intersect(ray),
            Geometry::Obb(g) => g.intersect(ray),
            Geometry::Tetrahedron(g) => g.intersect(ray),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Geometry::Sphere(g) => g.bounds(),
            Geometry::Plane(g) => g.bounds(),
            Geometry::Disc(g) => g.bounds(),
            Geometry::Cuboid(g) => g.bounds(),
            Geometry::Obb(g) => g.bounds(),
            Geometry::Tetrahedron(g) => g.bounds(),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($variant:ident),*) => {
        $(impl From<$variant> for Geometry {
            fn from(g: $variant) -> Self {
                Geometry::$variant(g)
            }
        })*
    };
}

impl_from_primitive!(Sphere, Plane, Disc, Cuboid, Obb, Tetrahedron);

/// Grow finite bounds by a margin relative to their magnitude, so hits accepted
/// within an intersection tolerance stay inside the box.
pub(crate) fn pad_bounds(bounds: Aabb) -> Aabb {
    let scale = bounds.min.abs().max(bounds.max.abs()).max_element().max(1.0);
    bounds.padded(scale * 1e-4)
}
