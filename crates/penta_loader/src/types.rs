//! Serialized render task description.
//!
//! These types mirror the JSON layout one to one. Nothing here is validated;
//! see [`crate::loader`] for conversion into renderer objects.

use serde::{Deserialize, Serialize};

/// RGB triple.
pub type RgbDesc = [f32; 3];

/// 4D point or vector.
pub type PointDesc = [f32; 4];

/// Everything needed to render one image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderTaskDesc {
    /// Name of a builtin scene. Exclusive with `scene`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneDesc>,

    pub camera: CameraDesc,

    pub samples_per_pixel: u32,

    /// Defaults to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDesc {
    /// Radiance of rays escaping the scene; black when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<RgbDesc>,

    /// Mean free path of the medium filling space; vacuum when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scattering_sigma: Option<f32>,

    #[serde(default)]
    pub objects: Vec<ObjectDesc>,

    #[serde(default)]
    pub lights: Vec<LightDesc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDesc {
    pub geometry: GeometryDesc,
    pub material: MaterialDesc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryDesc {
    Sphere {
        center: PointDesc,
        radius: f32,
    },
    /// The hyperplane `normal · x = offset`, optionally clipped to a ball of
    /// radius `cutoff` around its closest point to the origin.
    Plane {
        normal: PointDesc,
        offset: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cutoff: Option<f32>,
    },
    Disc {
        center: PointDesc,
        normal: PointDesc,
        radius: f32,
    },
    Cuboid {
        min: PointDesc,
        max: PointDesc,
    },
    /// Box of full edge lengths `size`, centered on the pose origin.
    Obb {
        local_to_world: PoseDesc,
        size: PointDesc,
    },
    Tetrahedron {
        vertices: [PointDesc; 4],
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambert {
        reflectance: RgbDesc,
    },
    Emission {
        radiance: RgbDesc,
    },
    Glass {
        #[serde(default = "default_refractive_index")]
        refractive_index: f32,
    },
}

fn default_refractive_index() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDesc {
    Point { position: PointDesc, power: RgbDesc },
}

/// Perspective camera looking along its local +W axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraDesc {
    pub width: u32,
    pub height: u32,
    /// Horizontal field of view in degrees
    pub fov_x: f32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_to_world: Option<PoseDesc>,
}

/// Rigid transform. Missing parts default to identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoseDesc {
    /// 4x4 rotation in row-major order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 16]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<PointDesc>,
}
