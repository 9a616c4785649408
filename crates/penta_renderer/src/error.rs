//! Construction-time and render-time errors.
//!
//! Geometric degeneracies (parallel rays, singular systems) are not errors;
//! intersection routines report them as a miss.

use crate::Spectrum;
use penta_math::{PoseError, Vec4};
use thiserror::Error;

/// Tolerance on `|v| - 1` for vectors that must be unit length.
pub const UNIT_TOLERANCE: f32 = 1e-5;

/// A physical or geometric constraint violated while constructing a scene object.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("{what} must be positive and finite, got {value}")]
    NonPositive { what: &'static str, value: f32 },

    #[error("{what} must be unit length, got length {length}")]
    NotUnitLength { what: &'static str, length: f32 },

    #[error("{what} must be finite, got {value:?}")]
    NotFinite { what: &'static str, value: Vec4 },

    #[error("box size must be positive on every axis, got {size:?}")]
    NonPositiveSize { size: Vec4 },

    #[error("reflectance must lie in [0, 1] on every channel, got {0:?}")]
    ReflectanceOutOfRange(Spectrum),

    #[error("{what} must be finite and non-negative, got {value:?}")]
    NegativeSpectrum { what: &'static str, value: Spectrum },

    #[error("tetrahedron vertices are degenerate (volume {volume})")]
    DegenerateTetrahedron { volume: f32 },

    #[error("field of view must lie in (0, pi) radians, got {0}")]
    InvalidFov(f32),

    #[error("image size must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error(transparent)]
    Pose(#[from] PoseError),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render needs at least one thread")]
    NoThreads,

    #[error("render needs at least one sample per pixel")]
    NoSamples,

    #[error("failed to start a pool of {threads} render threads")]
    ThreadPool {
        threads: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

pub(crate) fn check_positive(what: &'static str, value: f32) -> PhysicsResult<f32> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(PhysicsError::NonPositive { what, value })
    }
}

pub(crate) fn check_unit(what: &'static str, v: Vec4) -> PhysicsResult<Vec4> {
    let length = v.length();
    if (length - 1.0).abs() < UNIT_TOLERANCE {
        Ok(v)
    } else {
        Err(PhysicsError::NotUnitLength { what, length })
    }
}

pub(crate) fn check_finite(what: &'static str, value: Vec4) -> PhysicsResult<Vec4> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PhysicsError::NotFinite { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_positive() {
        assert!(check_positive("radius", 0.5).is_ok());
        assert!(check_positive("radius", 0.0).is_err());
        assert!(check_positive("radius", f32::NAN).is_err());
        assert!(check_positive("radius", f32::INFINITY).is_err());
    }

    #[test]
    fn test_check_unit_reports_length() {
        let err = check_unit("normal", Vec4::new(0.0, 2.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, PhysicsError::NotUnitLength { what: "normal", length: 2.0 });
        assert_eq!(err.to_string(), "normal must be unit length, got length 2");
    }
}
