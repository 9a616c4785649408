//! Rigid transforms in 4D.

use glam::{Mat4, Vec4};
use thiserror::Error;

/// Tolerance on `det(rotation) - 1` for a rotation to count as proper.
pub const ROTATION_DET_TOLERANCE: f32 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    #[error("rotation is not proper: determinant {determinant} (expected 1 within 1e-6)")]
    ImproperRotation { determinant: f32 },
}

/// A rotation followed by a translation, mapping a local frame into world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    rotation: Mat4,
    translation: Vec4,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        rotation: Mat4::IDENTITY,
        translation: Vec4::ZERO,
    };

    /// Create a pose, rejecting rotations whose determinant is not 1.
    pub fn new(rotation: Mat4, translation: Vec4) -> Result<Self, PoseError> {
        let determinant = rotation.determinant();
        if !((determinant - 1.0).abs() <= ROTATION_DET_TOLERANCE) {
            return Err(PoseError::ImproperRotation { determinant });
        }
        Ok(Self {
            rotation,
            translation,
        })
    }

    pub fn from_translation(translation: Vec4) -> Self {
        Self {
            rotation: Mat4::IDENTITY,
            translation,
        }
    }

    #[inline]
    pub fn rotation(&self) -> Mat4 {
        self.rotation
    }

    #[inline]
    pub fn translation(&self) -> Vec4 {
        self.translation
    }

    #[inline]
    pub fn transform_point(&self, point: Vec4) -> Vec4 {
        self.rotation * point + self.translation
    }

    /// Rotation only; translation does not apply to directions.
    #[inline]
    pub fn transform_vector(&self, vector: Vec4) -> Vec4 {
        self.rotation * vector
    }

    #[inline]
    pub fn inverse_transform_point(&self, point: Vec4) -> Vec4 {
        self.rotation.transpose() * (point - self.translation)
    }

    #[inline]
    pub fn inverse_transform_vector(&self, vector: Vec4) -> Vec4 {
        self.rotation.transpose() * vector
    }
}

/// Rotation by `angle` radians in the plane spanned by two coordinate axes.
///
/// Rotates `axis_a` towards `axis_b`. Both indices must be distinct and below 4.
pub fn plane_rotation(axis_a: usize, axis_b: usize, angle: f32) -> Mat4 {
    assert!(axis_a < 4 && axis_b < 4 && axis_a != axis_b, "invalid rotation plane ({axis_a}, {axis_b})");
    let (sin, cos) = angle.sin_cos();
    let mut cols = Mat4::IDENTITY.to_cols_array_2d();
    cols[axis_a][axis_a] = cos;
    cols[axis_a][axis_b] = sin;
    cols[axis_b][axis_a] = -sin;
    cols[axis_b][axis_b] = cos;
    Mat4::from_cols_array_2d(&cols)
}
