//! Random scene fixtures shared by the unit tests.

use crate::geometry::{Cuboid, Disc, Geometry, Obb, Plane, Sphere, Tetrahedron};
use penta_math::{plane_rotation, Mat4, Pose, Ray, Vec4};
use rand::Rng;

pub fn random_point(rng: &mut impl Rng, scale: f32) -> Vec4 {
    Vec4::new(
        rng.gen_range(-scale..scale),
        rng.gen_range(-scale..scale),
        rng.gen_range(-scale..scale),
        rng.gen_range(-scale..scale),
    )
}

pub fn random_unit(rng: &mut impl Rng) -> Vec4 {
    loop {
        let v = random_point(rng, 1.0);
        let len = v.length();
        if len > 1e-3 && len <= 1.0 {
            return v / len;
        }
    }
}

pub fn random_pose(rng: &mut impl Rng, scale: f32) -> Pose {
    let planes = [(0, 1), (0, 3), (1, 2), (2, 3)];
    let rotation = planes.iter().fold(Mat4::IDENTITY, |acc, &(a, b)| {
        acc * plane_rotation(a, b, rng.gen_range(-3.1..3.1))
    });
    let translation = random_point(rng, scale);
    Pose::new(rotation, translation).unwrap_or(Pose::from_translation(translation))
}

/// A random primitive roughly within `[-scale, scale]^4`.
pub fn random_geometry(rng: &mut impl Rng, scale: f32) -> Geometry {
    let center = random_point(rng, scale);
    let size = scale * rng.gen_range(0.02..0.3);
    match rng.gen_range(0..100) {
        0..=39 => Sphere::new(center, size).unwrap().into(),
        40..=54 => Disc::new(center, random_unit(rng), size).unwrap().into(),
        55..=64 => Cuboid::new(center, center + Vec4::splat(size) + random_point(rng, size).abs())
            .unwrap()
            .into(),
        65..=79 => Obb::new(random_pose(rng, scale), Vec4::splat(size * 0.5) + random_point(rng, size).abs())
            .unwrap()
            .into(),
        80..=94 => loop {
            let vertices = [
                center,
                center + random_point(rng, size),
                center + random_point(rng, size),
                center + random_point(rng, size),
            ];
            if let Ok(tet) = Tetrahedron::new(vertices) {
                break tet.into();
            }
        },
        95..=97 => {
            let normal = random_unit(rng);
            Plane::new(normal, normal.dot(center), Some(size * 2.0)).unwrap().into()
        }
        // Unbounded, so its box is the whole space
        _ => {
            let normal = random_unit(rng);
            Plane::new(normal, normal.dot(center), None).unwrap().into()
        }
    }
}

pub fn random_ray(rng: &mut impl Rng, scale: f32) -> Ray {
    Ray::new(random_point(rng, scale), random_unit(rng))
}
