//! Nearest-hit queries over a scene's objects.

use crate::geometry::MicroGeometry;
use crate::scene::Object;
use penta_math::Ray;

/// The nearest intersection with an object in the scene's arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectHit {
    /// Index into the object slice the structure was built over.
    pub index: usize,
    pub geom: MicroGeometry,
    pub t: f32,
}

/// A spatial index built once over a fixed object slice and shared read-only
/// by all render threads.
///
/// `objects` must be the same slice (same order, same length) the structure
/// was built from.
pub trait Accel: Send + Sync {
    fn intersect(&self, objects: &[Object], ray: &Ray) -> Option<ObjectHit>;
}

/// Linear scan over every object. The reference the BVH is checked against.
#[derive(Debug, Clone)]
pub struct BruteForceAccel {
    count: usize,
}

impl BruteForceAccel {
    pub fn build(objects: &[Object]) -> Self {
        Self {
            count: objects.len(),
        }
    }
}

impl Accel for BruteForceAccel {
    fn intersect(&self, objects: &[Object], ray: &Ray) -> Option<ObjectHit> {
        debug_assert_eq!(objects.len(), self.count, "accelerator built over a different scene");
        nearest_hit(objects, 0..self.count, ray)
    }
}

/// Nearest hit among the given objects; the first one wins ties.
pub(crate) fn nearest_hit(
    objects: &[Object],
    indices: impl IntoIterator<Item = usize>,
    ray: &Ray,
) -> Option<ObjectHit> {
    let mut nearest: Option<ObjectHit> = None;
    for index in indices {
        let Some(geom) = objects[index].geometry.intersect(ray) else {
            continue;
        };
        let t = ray.param_of(geom.pos);
        if nearest.map_or(true, |best| t < best.t) {
            nearest = Some(ObjectHit { index, geom, t });
        }
    }
    nearest
}
