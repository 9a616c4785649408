//! Pinhole camera recording a planar slice of the 4D light field.

use crate::error::{PhysicsError, PhysicsResult};
use penta_math::{Pose, Ray, Vec4};
use std::f32::consts::PI;

/// Looks along local +W. Image x maps to local +X, image y (downward) to
/// local -Y, and recorded rays have no local Z component.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    pose: Pose,
    fov_x: f32,
    fov_y: f32,

    // Cached half extents of the image plane at distance one
    half_x: f32,
    half_y: f32,
}

impl Camera {
    /// Field of view angles are full angles in radians, within (0, π).
    pub fn new(pose: Pose, width: u32, height: u32, fov_x: f32, fov_y: f32) -> PhysicsResult<Self> {
        if width == 0 || height == 0 {
            return Err(PhysicsError::EmptyImage { width, height });
        }
        for fov in [fov_x, fov_y] {
            if !(fov > 0.0 && fov < PI) {
                return Err(PhysicsError::InvalidFov(fov));
            }
        }
        Ok(Self {
            width,
            height,
            pose,
            fov_x,
            fov_y,
            half_x: (fov_x * 0.5).tan(),
            half_y: (fov_y * 0.5).tan(),
        })
    }

    /// Move the camera.
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn fov(&self) -> (f32, f32) {
        (self.fov_x, self.fov_y)
    }

    /// Primary ray through a continuous image position, where pixel `(x, y)`
    /// covers `[x, x + 1) × [y, y + 1)`.
    pub fn ray_at(&self, image_x: f32, image_y: f32) -> Ray {
        let u = image_x / self.width as f32 * 2.0 - 1.0;
        let v = image_y / self.height as f32 * 2.0 - 1.0;
        let local = Vec4::new(u * self.half_x, -v * self.half_y, 0.0, 1.0).normalize();
        Ray::new(self.pose.translation(), self.pose.transform_vector(local))
    }
}
