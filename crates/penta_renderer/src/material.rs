//! Surface materials and the per-hit BSDFs they produce.

use crate::error::{check_positive, PhysicsError, PhysicsResult};
use crate::geometry::MicroGeometry;
use penta_math::{Vec3, Vec4};
use std::f32::consts::PI;

/// RGB radiance, power or reflectance.
pub type Spectrum = Vec3;

/// Incidence this close to the normal passes straight through a refractive surface.
const PASS_THROUGH_COS: f32 = 1.0 - 1e-3;

/// Normalization of a 4D Lambertian lobe: the cosine integral over a hemisphere
/// of S³ is `4π/3`.
const LAMBERT_NORMALIZATION: f32 = 3.0 / (4.0 * PI);

/// How light interacts with an object's surface. Owned by the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Ideal diffuse reflector.
    Lambert { reflectance: Spectrum },
    /// Constant emitter that reflects nothing.
    Emission { radiance: Spectrum },
    /// Ideal refractor with the given index relative to the surroundings.
    Glass { refractive_index: f32 },
}

impl Material {
    pub fn lambert(reflectance: Spectrum) -> PhysicsResult<Self> {
        let in_range = reflectance.cmpge(Vec3::ZERO).all() && reflectance.cmple(Vec3::ONE).all();
        if !in_range {
            return Err(PhysicsError::ReflectanceOutOfRange(reflectance));
        }
        Ok(Material::Lambert { reflectance })
    }

    pub fn emission(radiance: Spectrum) -> PhysicsResult<Self> {
        if !(radiance.is_finite() && radiance.min_element() >= 0.0) {
            return Err(PhysicsError::NegativeSpectrum {
                what: "emitted radiance",
                value: radiance,
            });
        }
        Ok(Material::Emission { radiance })
    }

    pub fn glass(refractive_index: f32) -> PhysicsResult<Self> {
        Ok(Material::Glass {
            refractive_index: check_positive("refractive index", refractive_index)?,
        })
    }

    /// The BSDF at one surface point.
    pub fn bsdf(&self, geom: &MicroGeometry) -> Bsdf {
        match *self {
            Material::Lambert { reflectance } => Bsdf::Lambertian {
                value: reflectance * LAMBERT_NORMALIZATION,
            },
            Material::Emission { radiance } => Bsdf::Emission { radiance },
            Material::Glass { refractive_index } => Bsdf::Refractive {
                normal: geom.normal,
                index: refractive_index,
            },
        }
    }
}

/// Scattering at a single surface point, created per intersection.
///
/// Directions passed in point away from the surface; `dir_out` is the
/// reversed direction of the arriving ray and must be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bsdf {
    Lambertian { value: Spectrum },
    Emission { radiance: Spectrum },
    Refractive { normal: Vec4, index: f32 },
}

impl Bsdf {
    /// The single deterministic continuation of a specular surface, with its
    /// throughput. `None` for surfaces that scatter diffusely.
    pub fn specular(&self, dir_out: Vec4) -> Option<(Vec4, Spectrum)> {
        match *self {
            Bsdf::Refractive { normal, index } => Some((refract(normal, index, dir_out), Spectrum::ONE)),
            _ => None,
        }
    }

    /// Diffuse response for light arriving from `dir_in` and leaving along `dir_out`.
    pub fn eval(&self, _dir_in: Vec4, _dir_out: Vec4) -> Spectrum {
        match *self {
            Bsdf::Lambertian { value } => value,
            _ => Spectrum::ZERO,
        }
    }

    pub fn emission(&self, _dir_out: Vec4) -> Spectrum {
        match *self {
            Bsdf::Emission { radiance } => radiance,
            _ => Spectrum::ZERO,
        }
    }
}

/// Snell's law across a surface with unit `normal`.
///
/// The sign of `normal·dir_out` tells entering (positive) from exiting.
/// Returns the direction the light continues along.
fn refract(normal: Vec4, index: f32, dir_out: Vec4) -> Vec4 {
    let cos_out = normal.dot(dir_out);
    if cos_out.abs() >= PASS_THROUGH_COS {
        return -dir_out;
    }
    let sin_out = (1.0 - cos_out * cos_out).sqrt();
    let relative_index = if cos_out > 0.0 { index } else { index.recip() };

    // Unit normal on the incoming side, and the unit tangential part of dir_out.
    let facing = normal * cos_out.signum();
    let tangent = (dir_out - normal * cos_out).normalize();

    let sin_in = sin_out / relative_index;
    if sin_in > 1.0 {
        // Total internal reflection
        return facing * cos_out.abs() - tangent * sin_out;
    }
    let cos_in = (1.0 - sin_in * sin_in).sqrt();
    -facing * cos_in - tangent * sin_in
}
