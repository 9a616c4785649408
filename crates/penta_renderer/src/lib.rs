//! Pentatope - 4D Path Tracing
//!
//! A Monte Carlo path tracer for scenes living in four-dimensional space,
//! rendered to ordinary 2D images through a camera that looks along +W.
//! Space may be filled with a homogeneous scattering medium.

mod accel;
mod bucket;
mod bvh;
mod camera;
mod error;
mod geometry;
mod light;
mod material;
mod renderer;
mod sampler;
mod scene;
mod tonemap;

#[cfg(test)]
mod testing;

pub use accel::{Accel, BruteForceAccel, ObjectHit};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, TileJob, TileQueue, DEFAULT_BUCKET_SIZE};
pub use bvh::{BvhAccel, LEAF_MAX_SIZE};
pub use camera::Camera;
pub use error::{PhysicsError, PhysicsResult, RenderError};
pub use geometry::{Cuboid, Disc, Geometry, MicroGeometry, Obb, Plane, Sphere, Tetrahedron};
pub use light::{Light, PointLight};
pub use material::{Bsdf, Material, Spectrum};
pub use renderer::{render_pixel, ImageBuffer, RenderConfig};
pub use sampler::{Sampler, DEFAULT_SEED};
pub use scene::{AccelStrategy, Object, Scene, SurfaceHit, EPSILON_SURFACE_OFFSET};
pub use tonemap::tonemap;

/// Re-export common math types from penta_math
pub use penta_math::{Aabb, Interval, Pose, Ray, Vec3, Vec4};
