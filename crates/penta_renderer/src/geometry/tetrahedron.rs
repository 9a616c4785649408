use super::{pad_bounds, MicroGeometry};
use crate::error::{check_finite, PhysicsError, PhysicsResult};
use penta_math::{cross, Aabb, Mat4, Ray, Vec4};

/// Below this the ray is treated as parallel to the tetrahedron's hyperplane.
const SINGULAR_DET: f32 = 1e-6;

/// A flat tetrahedron (3-simplex) in 4D, double sided.
#[derive(Debug, Clone, PartialEq)]
pub struct Tetrahedron {
    vertices: [Vec4; 4],
    normal: Vec4,
}

impl Tetrahedron {
    pub fn new(vertices: [Vec4; 4]) -> PhysicsResult<Self> {
        for v in vertices {
            check_finite("tetrahedron vertex", v)?;
        }
        let [v0, v1, v2, v3] = vertices;
        let normal = cross(v1 - v0, v2 - v0, v3 - v0);
        let volume = normal.length();
        if !(volume > SINGULAR_DET) {
            return Err(PhysicsError::DegenerateTetrahedron { volume });
        }
        Ok(Self {
            vertices,
            normal: normal / volume,
        })
    }

    pub fn vertices(&self) -> &[Vec4; 4] {
        &self.vertices
    }

    /// Solves `o + t·d = v0 + a·e1 + b·e2 + c·e3` for (a, b, c, t).
    pub fn intersect(&self, ray: &Ray) -> Option<MicroGeometry> {
        let [v0, v1, v2, v3] = self.vertices;
        let system = Mat4::from_cols(v1 - v0, v2 - v0, v3 - v0, -ray.direction);
        if system.determinant().abs() < SINGULAR_DET {
            return None;
        }

        let solution = system.inverse() * (ray.origin - v0);
        let t = solution.w;
        let barycentric = solution.truncate();
        if barycentric.min_element() < 0.0 || barycentric.element_sum() > 1.0 || !(t > 0.0) {
            return None;
        }

        let normal = if self.normal.dot(ray.direction) > 0.0 {
            -self.normal
        } else {
            self.normal
        };
        Some(MicroGeometry::new(ray.at(t), normal))
    }

    pub fn bounds(&self) -> Aabb {
        pad_bounds(Aabb::from_point_cloud(self.vertices))
    }
}
