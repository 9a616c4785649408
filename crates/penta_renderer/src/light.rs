//! Light sources.

use crate::error::{check_finite, PhysicsError, PhysicsResult};
use crate::Spectrum;
use penta_math::Vec4;
use std::f32::consts::PI;

/// Surface area of the unit 3-sphere.
const UNIT_S3_AREA: f32 = 2.0 * PI * PI;

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Point(PointLight),
}

impl Light {
    /// Position of the emitter as seen from `point`, and its intensity.
    pub fn intensity_at(&self, point: Vec4) -> (Vec4, Spectrum) {
        match self {
            Light::Point(light) => light.intensity_at(point),
        }
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}

/// An isotropic point emitter. Irradiance falls off with the cube of distance.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    position: Vec4,
    intensity: Spectrum,
}

impl PointLight {
    /// `power` is the total emitted power, spread over the 3-sphere of directions.
    pub fn new(position: Vec4, power: Spectrum) -> PhysicsResult<Self> {
        check_finite("light position", position)?;
        if !(power.is_finite() && power.min_element() >= 0.0) {
            return Err(PhysicsError::NegativeSpectrum {
                what: "light power",
                value: power,
            });
        }
        Ok(Self {
            position,
            intensity: power / UNIT_S3_AREA,
        })
    }

    pub fn position(&self) -> Vec4 {
        self.position
    }

    pub fn power(&self) -> Spectrum {
        self.intensity * UNIT_S3_AREA
    }

    pub fn intensity_at(&self, _point: Vec4) -> (Vec4, Spectrum) {
        (self.position, self.intensity)
    }
}
