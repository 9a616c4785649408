//! Math primitives for rendering in four-dimensional Euclidean space.
//!
//! Points and directions are plain `glam::Vec4` values; this crate adds the
//! ray, interval, bounding box and rigid pose types the renderer builds on.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod cross;
mod interval;
mod pose;
mod ray;

pub use aabb::Aabb;
pub use cross::cross;
pub use interval::Interval;
pub use pose::{plane_rotation, Pose, PoseError};
pub use ray::Ray;
