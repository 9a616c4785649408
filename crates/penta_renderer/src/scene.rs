//! Scene ownership and the recursive light transport integrator.

use crate::accel::{Accel, BruteForceAccel};
use crate::bvh::BvhAccel;
use crate::error::{check_positive, PhysicsResult};
use crate::geometry::{Geometry, MicroGeometry};
use crate::light::Light;
use crate::material::{Bsdf, Material};
use crate::sampler::Sampler;
use crate::Spectrum;
use penta_math::{Ray, Vec4};
use std::f32::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};

/// Relative distance, along the surface normal, between a hit point and the
/// origin of any ray leaving it.
pub const EPSILON_SURFACE_OFFSET: f32 = 1e-4;

/// Uniform sampling pdf over an S³ hemisphere is `1/π²`.
const HEMISPHERE_MEASURE: f32 = PI * PI;

/// Isotropic phase function over S³.
const ISOTROPIC_PHASE: f32 = 1.0 / (2.0 * PI * PI);

/// How often exhausted paths get reported.
const DEPTH_LOG_INTERVAL: u64 = 1_000_000;

static DEPTH_EXHAUSTED: AtomicU64 = AtomicU64::new(0);

/// A primitive together with its surface material.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub geometry: Geometry,
    pub material: Material,
}

impl Object {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }
}

/// Which acceleration structure [`Scene::finalize_with`] builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelStrategy {
    #[default]
    Bvh,
    BruteForce,
}

/// A surface hit with the BSDF at that point.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    pub bsdf: Bsdf,
    pub geom: MicroGeometry,
    pub t: f32,
}

/// Objects, lights and the space between them.
///
/// Populate with [`Scene::add_object`] and [`Scene::add_light`], then call
/// [`Scene::finalize`] once. Afterwards the scene is read-only and can be
/// shared between render threads.
pub struct Scene {
    objects: Vec<Object>,
    lights: Vec<Light>,
    background: Spectrum,
    scattering_sigma: Option<f32>,
    accel: Option<Box<dyn Accel>>,
}

impl Scene {
    /// `scattering_sigma` is the mean free path of a homogeneous, non-absorbing
    /// medium filling all empty space. `None` means vacuum.
    pub fn new(background: Spectrum, scattering_sigma: Option<f32>) -> PhysicsResult<Self> {
        let scattering_sigma = scattering_sigma
            .map(|sigma| check_positive("scattering sigma", sigma))
            .transpose()?;
        Ok(Self {
            objects: Vec::new(),
            lights: Vec::new(),
            background,
            scattering_sigma,
            accel: None,
        })
    }

    pub fn add_object(&mut self, object: Object) {
        assert!(self.accel.is_none(), "object added after Scene::finalize");
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Light) {
        assert!(self.accel.is_none(), "light added after Scene::finalize");
        self.lights.push(light);
    }

    /// Build the BVH over the current objects.
    pub fn finalize(&mut self) {
        self.finalize_with(AccelStrategy::Bvh);
    }

    pub fn finalize_with(&mut self, strategy: AccelStrategy) {
        assert!(self.accel.is_none(), "Scene::finalize called twice");
        let accel: Box<dyn Accel> = match strategy {
            AccelStrategy::Bvh => Box::new(BvhAccel::build(&self.objects)),
            AccelStrategy::BruteForce => Box::new(BruteForceAccel::build(&self.objects)),
        };
        log::info!(
            "Scene finalized: {} objects, {} lights, {strategy:?} accelerator",
            self.objects.len(),
            self.lights.len()
        );
        self.accel = Some(accel);
    }

    pub fn is_finalized(&self) -> bool {
        self.accel.is_some()
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn background(&self) -> Spectrum {
        self.background
    }

    pub fn scattering_sigma(&self) -> Option<f32> {
        self.scattering_sigma
    }

    /// Nearest surface along the ray. Panics before [`Scene::finalize`].
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let accel = self
            .accel
            .as_ref()
            .expect("Scene::intersect called before Scene::finalize");
        let hit = accel.intersect(&self.objects, ray)?;
        Some(SurfaceHit {
            bsdf: self.objects[hit.index].material.bsdf(&hit.geom),
            geom: hit.geom,
            t: hit.t,
        })
    }

    /// Radiance arriving at `ray.origin` from `-ray.direction`.
    ///
    /// `depth` bounds the number of bounces and scattering events; an
    /// exhausted path contributes nothing.
    pub fn trace(&self, ray: &Ray, sampler: &mut Sampler, depth: u32) -> Spectrum {
        if depth == 0 {
            let n = DEPTH_EXHAUSTED.fetch_add(1, Ordering::Relaxed);
            if n % DEPTH_LOG_INTERVAL == 0 {
                log::info!("path depth exhausted ({} times so far)", n + 1);
            }
            return Spectrum::ZERO;
        }

        let Some(hit) = self.intersect(ray) else {
            // A scattering-only medium leaves the background unchanged.
            return self.background;
        };
        let dir = ray.direction.normalize();

        if let Some(sigma) = self.scattering_sigma {
            let distance = (hit.geom.pos - ray.origin).length();
            let free_path = sampler.free_path(sigma);
            if free_path < distance {
                return self.trace_particle(ray.origin + dir * free_path, sampler, depth);
            }
        }

        self.trace_surface(&hit, -dir, sampler, depth)
    }

    fn trace_surface(&self, hit: &SurfaceHit, dir_out: Vec4, sampler: &mut Sampler, depth: u32) -> Spectrum {
        let bsdf = &hit.bsdf;
        let pos = hit.geom.pos;
        let normal = hit.geom.normal;
        let emission = bsdf.emission(dir_out);

        if let Some((dir, throughput)) = bsdf.specular(dir_out) {
            let next = Ray::new(offset_from_surface(pos, normal, dir), dir);
            return throughput * self.trace(&next, sampler, depth - 1) + emission;
        }

        let dir = sampler.uniform_hemisphere(normal);
        let reflectance = bsdf.eval(dir, dir_out);
        let indirect = if reflectance == Spectrum::ZERO {
            Spectrum::ZERO
        } else {
            let next = Ray::new(offset_from_surface(pos, normal, dir), dir);
            let incoming = self.trace(&next, sampler, depth - 1);
            reflectance * incoming * (normal.dot(dir).abs() * HEMISPHERE_MEASURE)
        };

        indirect + emission + self.direct_light_to_surface(pos, normal, dir_out, bsdf)
    }

    /// In-scattering at a point inside the medium.
    fn trace_particle(&self, pos: Vec4, sampler: &mut Sampler, depth: u32) -> Spectrum {
        let direct = self.direct_light_to_particle(pos);
        let dir = sampler.uniform_sphere();
        // Uniform sampling matches the isotropic phase function, so the weight is one.
        direct + self.trace(&Ray::new(pos, dir), sampler, depth - 1)
    }

    /// Radiance reflected toward `dir_out` from every visible light.
    ///
    /// `pos` lies on the surface; shadow rays start just off it on the
    /// light's side.
    pub fn direct_light_to_surface(&self, pos: Vec4, normal: Vec4, dir_out: Vec4, bsdf: &Bsdf) -> Spectrum {
        let mut total = Spectrum::ZERO;
        for light in &self.lights {
            let (light_pos, intensity) = light.intensity_at(pos);
            if !self.is_visible_from(light_pos, offset_from_surface(pos, normal, light_pos - pos)) {
                continue;
            }
            let to_light = light_pos - pos;
            let distance = to_light.length();
            let dir = to_light / distance;
            total += intensity * bsdf.eval(dir, dir_out) * normal.dot(dir).abs() * self.transmittance(distance)
                / distance.powi(3);
        }
        total
    }

    /// Radiance scattered at a point in the medium from every visible light.
    pub fn direct_light_to_particle(&self, pos: Vec4) -> Spectrum {
        let mut total = Spectrum::ZERO;
        for light in &self.lights {
            let (light_pos, intensity) = light.intensity_at(pos);
            if !self.is_visible_from(light_pos, pos) {
                continue;
            }
            let distance = (light_pos - pos).length();
            total += intensity * ISOTROPIC_PHASE * self.transmittance(distance) / distance.powi(3);
        }
        total
    }

    /// True when nothing blocks the segment from `from` to `to`.
    pub fn is_visible_from(&self, to: Vec4, from: Vec4) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance == 0.0 {
            return true;
        }
        match self.intersect(&Ray::new(from, delta / distance)) {
            None => true,
            Some(hit) => hit.t > distance,
        }
    }

    /// Fraction of light surviving `distance` through the medium unscattered.
    fn transmittance(&self, distance: f32) -> f32 {
        match self.scattering_sigma {
            Some(sigma) => (-distance / sigma).exp(),
            None => 1.0,
        }
    }
}

/// Step off a surface along the normal, to the side `dir` leaves through.
///
/// The step scales with the magnitude of `pos` so it stays above f32
/// rounding; a grazing `dir` still clears the surface.
fn offset_from_surface(pos: Vec4, normal: Vec4, dir: Vec4) -> Vec4 {
    let scale = pos.abs().max_element().max(1.0);
    let side = if normal.dot(dir) < 0.0 { -1.0 } else { 1.0 };
    pos + normal * (side * EPSILON_SURFACE_OFFSET * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Disc, Sphere};
    use crate::light::PointLight;

    fn lambert(r: f32) -> Material {
        Material::lambert(Spectrum::splat(r)).unwrap()
    }

    /// Camera-less probe: the inside of a closed emitting sphere.
    fn enclosure(radiance: Spectrum, sigma: Option<f32>) -> Scene {
        let mut scene = Scene::new(Spectrum::ZERO, sigma).unwrap();
        scene.add_object(Object::new(
            Sphere::new(Vec4::ZERO, 1.0).unwrap().into(),
            Material::emission(radiance).unwrap(),
        ));
        scene.finalize();
        scene
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        assert!(Scene::new(Spectrum::ZERO, Some(0.0)).is_err());
        assert!(Scene::new(Spectrum::ZERO, Some(-2.0)).is_err());
        assert!(Scene::new(Spectrum::ZERO, Some(1.0)).is_ok());
    }

    #[test]
    #[should_panic(expected = "before Scene::finalize")]
    fn test_intersect_before_finalize_panics() {
        let scene = Scene::new(Spectrum::ZERO, None).unwrap();
        scene.intersect(&Ray::new(Vec4::ZERO, Vec4::W));
    }

    #[test]
    #[should_panic(expected = "after Scene::finalize")]
    fn test_add_after_finalize_panics() {
        let mut scene = Scene::new(Spectrum::ZERO, None).unwrap();
        scene.finalize();
        scene.add_object(Object::new(Sphere::new(Vec4::ZERO, 1.0).unwrap().into(), lambert(0.5)));
    }

    #[test]
    fn test_miss_returns_background() {
        let background = Spectrum::new(0.1, 0.2, 0.3);
        for sigma in [None, Some(0.5)] {
            let mut scene = Scene::new(background, sigma).unwrap();
            scene.add_object(Object::new(
                Sphere::new(Vec4::new(0.0, 0.0, 0.0, 5.0), 1.0).unwrap().into(),
                lambert(0.5),
            ));
            scene.finalize();

            let mut sampler = Sampler::new(0);
            let ray = Ray::new(Vec4::ZERO, -Vec4::W);
            assert_eq!(scene.trace(&ray, &mut sampler, 5), background);
        }
    }

    #[test]
    fn test_zero_depth_returns_zero() {
        let scene = enclosure(Spectrum::ONE, None);
        let mut sampler = Sampler::new(0);
        assert_eq!(scene.trace(&Ray::new(Vec4::ZERO, Vec4::X), &mut sampler, 0), Spectrum::ZERO);
    }

    #[test]
    fn test_enclosure_radiance_is_preserved_by_medium() {
        let radiance = Spectrum::new(0.25, 1.0, 4.0);
        for sigma in [None, Some(4.0), Some(1.0)] {
            let scene = enclosure(radiance, sigma);
            let mut sampler = Sampler::new(9);
            for _ in 0..200 {
                let dir = sampler.uniform_sphere();
                let value = scene.trace(&Ray::new(Vec4::new(0.1, 0.0, -0.2, 0.3), dir), &mut sampler, 64);
                assert!((value - radiance).abs().max_element() < 1e-5, "sigma {sigma:?}: {value:?}");
            }
        }
    }

    #[test]
    fn test_direct_light_cubic_falloff() {
        // A large floor disc lit from straight above.
        let mut scene = Scene::new(Spectrum::ZERO, None).unwrap();
        scene.add_object(Object::new(Disc::new(Vec4::ZERO, Vec4::Y, 100.0).unwrap().into(), lambert(1.0)));
        let power = Spectrum::splat(2.0 * PI * PI);
        scene.add_light(PointLight::new(Vec4::new(0.0, 2.0, 0.0, 0.0), power).unwrap().into());
        scene.finalize();

        let geom = MicroGeometry::new(Vec4::ZERO, Vec4::Y);
        let bsdf = lambert(1.0).bsdf(&geom);
        let direct = scene.direct_light_to_surface(Vec4::new(0.0, 1e-5, 0.0, 0.0), Vec4::Y, Vec4::Y, &bsdf);
        // intensity 1, cos 1, distance 2
        let expected = 3.0 / (4.0 * PI) / 8.0;
        assert!((direct.x - expected).abs() < 1e-4, "{direct:?}");
    }

    #[test]
    fn test_occluded_light_contributes_nothing() {
        let mut scene = Scene::new(Spectrum::ZERO, None).unwrap();
        scene.add_object(Object::new(
            Sphere::new(Vec4::new(0.0, 1.0, 0.0, 0.0), 0.5).unwrap().into(),
            lambert(0.5),
        ));
        scene.add_light(PointLight::new(Vec4::new(0.0, 2.0, 0.0, 0.0), Spectrum::ONE).unwrap().into());
        scene.finalize();

        assert!(!scene.is_visible_from(Vec4::new(0.0, 2.0, 0.0, 0.0), Vec4::ZERO));
        assert!(scene.is_visible_from(Vec4::new(3.0, 0.0, 0.0, 0.0), Vec4::ZERO));
        assert_eq!(scene.direct_light_to_particle(Vec4::ZERO), Spectrum::ZERO);
        assert!(scene.direct_light_to_particle(Vec4::new(2.0, 2.0, 0.0, 0.0)).x > 0.0);
    }

    #[test]
    fn test_lit_diffuse_point_never_shadows_itself() {
        let mut scene = Scene::new(Spectrum::ZERO, None).unwrap();
        scene.add_object(Object::new(
            Sphere::new(Vec4::new(0.0, 0.0, 0.0, 5.0), 1.0).unwrap().into(),
            lambert(0.8),
        ));
        scene.add_light(PointLight::new(Vec4::new(0.0, 3.0, 0.0, 3.0), Spectrum::splat(100.0)).unwrap().into());
        scene.finalize();

        let ray = Ray::new(Vec4::ZERO, Vec4::new(0.2, 0.3, -0.1, 1.0).normalize());
        let hit = scene.intersect(&ray).unwrap();
        assert!(hit.geom.normal.dot(Vec4::new(0.0, 3.0, 0.0, 3.0) - hit.geom.pos) > 0.0);

        // Depth one leaves only emission and direct light, whatever the
        // sampled bounce direction.
        let mut sampler = Sampler::new(11);
        let first = scene.trace(&ray, &mut sampler, 1);
        assert!(first.x > 0.0, "{first:?}");
        for _ in 0..1000 {
            assert_eq!(scene.trace(&ray, &mut sampler, 1), first);
        }
    }

    #[test]
    fn test_glass_sphere_of_index_one_is_invisible() {
        let background = Spectrum::new(0.3, 0.6, 0.9);
        let mut scene = Scene::new(background, None).unwrap();
        scene.add_object(Object::new(
            Sphere::new(Vec4::new(0.0, 0.0, 0.0, 4.0), 1.0).unwrap().into(),
            Material::glass(1.0).unwrap(),
        ));
        scene.finalize_with(AccelStrategy::BruteForce);

        let mut sampler = Sampler::new(2);
        let ray = Ray::new(Vec4::new(0.2, 0.1, 0.0, 0.0), Vec4::W);
        assert_eq!(scene.trace(&ray, &mut sampler, 5), background);
    }

    #[test]
    fn test_diffuse_trace_is_finite_and_non_negative() {
        let mut scene = Scene::new(Spectrum::splat(0.2), Some(3.0)).unwrap();
        scene.add_object(Object::new(Sphere::new(Vec4::new(0.0, 0.0, 0.0, 3.0), 1.0).unwrap().into(), lambert(0.8)));
        scene.add_object(Object::new(Disc::new(Vec4::new(0.0, -1.0, 0.0, 3.0), Vec4::Y, 5.0).unwrap().into(), lambert(0.5)));
        scene.add_light(PointLight::new(Vec4::new(0.0, 3.0, 0.0, 3.0), Spectrum::splat(50.0)).unwrap().into());
        scene.finalize();

        let mut sampler = Sampler::new(4);
        for _ in 0..500 {
            let dir = (Vec4::W + sampler.uniform_sphere() * 0.5).normalize();
            let value = scene.trace(&Ray::new(Vec4::ZERO, dir), &mut sampler, 5);
            assert!(value.is_finite() && value.min_element() >= 0.0, "{value:?}");
        }
    }
}
