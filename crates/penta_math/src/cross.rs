use crate::{Mat3, Vec3, Vec4};

/// Generalized cross product of three 4D vectors.
///
/// Each component is the signed 3x3 minor of the matrix whose rows are
/// `v0, v1, v2` with that component's column removed. The result is
/// orthogonal to all three inputs and its length is the 3-volume of the
/// parallelepiped they span. It is not normalized.
pub fn cross(v0: Vec4, v1: Vec4, v2: Vec4) -> Vec4 {
    let minor = |pick: fn(Vec4) -> Vec3| Mat3::from_cols(pick(v0), pick(v1), pick(v2)).determinant();

    Vec4::new(
        minor(|v| Vec3::new(v.y, v.z, v.w)),
        -minor(|v| Vec3::new(v.x, v.z, v.w)),
        minor(|v| Vec3::new(v.x, v.y, v.w)),
        -minor(|v| Vec3::new(v.x, v.y, v.z)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_of_axes() {
        assert_eq!(cross(Vec4::X, Vec4::Y, Vec4::Z), -Vec4::W);
        assert_eq!(cross(Vec4::Y, Vec4::Z, Vec4::W), Vec4::X);
    }

    #[test]
    fn test_cross_is_orthogonal() {
        let v0 = Vec4::new(1.0, 2.0, -0.5, 3.0);
        let v1 = Vec4::new(-2.0, 0.25, 1.0, 0.0);
        let v2 = Vec4::new(0.5, -1.0, 4.0, 2.0);
        let n = cross(v0, v1, v2);

        assert!(n.length() > 1e-3);
        for v in [v0, v1, v2] {
            assert!(n.dot(v).abs() < 1e-4, "{n:?} not orthogonal to {v:?}");
        }
    }

    #[test]
    fn test_cross_of_dependent_vectors_vanishes() {
        let v0 = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let v1 = Vec4::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!(cross(v0, v1, v0 * 2.0), Vec4::ZERO);
    }
}
