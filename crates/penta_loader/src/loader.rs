//! Render task loading.
//!
//! Converts a [`RenderTaskDesc`] into a finalized [`Scene`], a [`Camera`] and
//! a [`RenderConfig`]. Every value is checked on the way; errors name the
//! offending field, e.g. `scene.objects[3].geometry`.

use std::path::Path;

use glam::Mat4;
use penta_math::{Pose, Vec4};
use penta_renderer::{
    Camera, Cuboid, Disc, Geometry, Light, Material, Obb, Object, PhysicsError, Plane, PointLight, RenderConfig,
    Scene, Spectrum, Sphere, Tetrahedron, DEFAULT_SEED,
};
use thiserror::Error;

use crate::cornell::{cornell_tesseract, CORNELL_SCENE_NAME};
use crate::types::{CameraDesc, GeometryDesc, LightDesc, MaterialDesc, ObjectDesc, PoseDesc, RenderTaskDesc, SceneDesc};

/// Default bounce limit when the task does not set one.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Errors that can occur while loading a render task.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("{field}: {source}")]
    Physics {
        field: String,
        #[source]
        source: PhysicsError,
    },

    #[error("unknown scene name: {0}")]
    UnknownScene(String),

    #[error("task needs exactly one of `scene` and `scene_name`")]
    SceneSource,
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// A validated task, ready for [`Camera::render`].
pub struct RenderTask {
    /// Finalized scene
    pub scene: Scene,
    pub camera: Camera,
    pub config: RenderConfig,
    pub seed: u64,
}

/// Load a render task from a JSON file.
pub fn load_render_task<P: AsRef<Path>>(path: P) -> LoadResult<RenderTask> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_render_task_from_str(&json)
}

/// Load a render task from a JSON string.
pub fn load_render_task_from_str(json: &str) -> LoadResult<RenderTask> {
    let desc: RenderTaskDesc = serde_json::from_str(json)?;
    build_render_task(&desc)
}

pub fn build_render_task(desc: &RenderTaskDesc) -> LoadResult<RenderTask> {
    log::info!(
        "RenderTask scene: {}",
        desc.scene_name.as_deref().unwrap_or("<scene name unspecified>")
    );

    let scene_desc = match (&desc.scene_name, &desc.scene) {
        (Some(name), None) if name == CORNELL_SCENE_NAME => cornell_tesseract(),
        (Some(name), None) => return Err(LoadError::UnknownScene(name.clone())),
        (None, Some(scene)) => scene.clone(),
        _ => return Err(LoadError::SceneSource),
    };
    let mut scene = build_scene(&scene_desc)?;
    scene.finalize();

    let camera = build_camera(&desc.camera)?;

    if desc.samples_per_pixel == 0 {
        return Err(invalid("samples_per_pixel", "must be > 0"));
    }
    let max_depth = desc.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
    if max_depth == 0 {
        return Err(invalid("max_depth", "must be > 0"));
    }
    let config = RenderConfig {
        samples_per_pixel: desc.samples_per_pixel,
        max_depth,
        ..RenderConfig::default()
    };

    Ok(RenderTask {
        scene,
        camera,
        config,
        seed: desc.seed.unwrap_or(DEFAULT_SEED),
    })
}

/// Build an unfinalized scene.
pub fn build_scene(desc: &SceneDesc) -> LoadResult<Scene> {
    let background = match desc.background {
        Some(rgb) => load_radiance("scene.background", rgb)?,
        None => Spectrum::ZERO,
    };
    let mut scene = Scene::new(background, desc.scattering_sigma).map_err(physics("scene.scattering_sigma"))?;

    for (i, object) in desc.objects.iter().enumerate() {
        scene.add_object(load_object(i, object)?);
    }
    for (i, light) in desc.lights.iter().enumerate() {
        scene.add_light(load_light(i, light)?);
    }
    Ok(scene)
}

fn load_object(index: usize, desc: &ObjectDesc) -> LoadResult<Object> {
    let field = format!("scene.objects[{index}].geometry");
    let geometry = load_geometry(&field, &desc.geometry)?;

    let field = format!("scene.objects[{index}].material");
    let material = match desc.material {
        MaterialDesc::Lambert { reflectance } => Material::lambert(Spectrum::from_array(reflectance)),
        MaterialDesc::Emission { radiance } => Material::emission(Spectrum::from_array(radiance)),
        MaterialDesc::Glass { refractive_index } => Material::glass(refractive_index),
    }
    .map_err(physics(&field))?;

    Ok(Object::new(geometry, material))
}

fn load_geometry(field: &str, desc: &GeometryDesc) -> LoadResult<Geometry> {
    let geometry: Geometry = match desc {
        GeometryDesc::Sphere { center, radius } => Sphere::new(point(center), *radius).map(Into::into),
        GeometryDesc::Plane { normal, offset, cutoff } => Plane::new(point(normal), *offset, *cutoff).map(Into::into),
        GeometryDesc::Disc { center, normal, radius } => {
            Disc::new(point(center), point(normal), *radius).map(Into::into)
        }
        GeometryDesc::Cuboid { min, max } => Cuboid::new(point(min), point(max)).map(Into::into),
        GeometryDesc::Obb { local_to_world, size } => {
            let pose = load_pose(&format!("{field}.local_to_world"), local_to_world)?;
            Obb::new(pose, point(size) * 0.5).map(Into::into)
        }
        GeometryDesc::Tetrahedron { vertices } => Tetrahedron::new((*vertices).map(Vec4::from_array)).map(Into::into),
    }
    .map_err(physics(field))?;
    Ok(geometry)
}

fn load_light(index: usize, desc: &LightDesc) -> LoadResult<Light> {
    let field = format!("scene.lights[{index}]");
    match desc {
        LightDesc::Point { position, power } => PointLight::new(point(position), Spectrum::from_array(*power))
            .map(Into::into)
            .map_err(physics(&field)),
    }
}

/// Build a camera. Field of view is given in degrees.
pub fn build_camera(desc: &CameraDesc) -> LoadResult<Camera> {
    for (name, fov) in [("camera.fov_x", desc.fov_x), ("camera.fov_y", desc.fov_y)] {
        if !(fov > 0.0 && fov < 180.0) {
            return Err(invalid(name, format!("must be in (0, 180) degrees, got {fov}")));
        }
    }
    let pose = match &desc.local_to_world {
        Some(pose) => load_pose("camera.local_to_world", pose)?,
        None => {
            log::warn!("camera.local_to_world not found; defaults to identity transform");
            Pose::IDENTITY
        }
    };
    Camera::new(
        pose,
        desc.width,
        desc.height,
        desc.fov_x.to_radians(),
        desc.fov_y.to_radians(),
    )
    .map_err(physics("camera"))
}

/// Parse a rigid transform. Missing rotation or translation defaults to identity.
pub fn load_pose(field: &str, desc: &PoseDesc) -> LoadResult<Pose> {
    let rotation = match desc.rotation {
        // Stored row-major; glam is column-major.
        Some(rows) => Mat4::from_cols_array(&rows).transpose(),
        None => {
            log::warn!("{field}.rotation not found; defaults to no rotation");
            Mat4::IDENTITY
        }
    };
    let translation = match desc.translation {
        Some(t) => Vec4::from_array(t),
        None => {
            log::warn!("{field}.translation not found; defaults to origin");
            Vec4::ZERO
        }
    };
    log::debug!("{field}: rotation {rotation:?}, translation {translation:?}");
    Pose::new(rotation, translation).map_err(|e| physics(field)(e.into()))
}

fn load_radiance(field: &str, rgb: [f32; 3]) -> LoadResult<Spectrum> {
    let value = Spectrum::from_array(rgb);
    if !(value.is_finite() && value.min_element() >= 0.0) {
        return Err(invalid(field, format!("must be finite and non-negative, got {value:?}")));
    }
    Ok(value)
}

fn point(p: &[f32; 4]) -> Vec4 {
    Vec4::from_array(*p)
}

fn invalid(field: &str, reason: impl Into<String>) -> LoadError {
    LoadError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn physics(field: &str) -> impl FnOnce(PhysicsError) -> LoadError + '_ {
    move |source| LoadError::Physics {
        field: field.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penta_math::Ray;

    const MINIMAL_TASK: &str = r#"{
        "scene": {
            "background": [0.0, 0.0, 0.1],
            "objects": [
                {
                    "geometry": { "type": "sphere", "center": [0, 0, 0, 5], "radius": 1 },
                    "material": { "type": "lambert", "reflectance": [0.8, 0.8, 0.8] }
                },
                {
                    "geometry": { "type": "disc", "center": [0, 0, 0, 8], "normal": [0, 0, 0, -1], "radius": 4 },
                    "material": { "type": "glass" }
                }
            ],
            "lights": [
                { "type": "point", "position": [0, 2, 0, 2], "power": [10, 10, 10] }
            ]
        },
        "camera": { "width": 32, "height": 24, "fov_x": 90, "fov_y": 70 },
        "samples_per_pixel": 4,
        "seed": 42
    }"#;

    fn expect_field(err: LoadError, expected: &str) {
        match err {
            LoadError::Invalid { field, .. } | LoadError::Physics { field, .. } => assert_eq!(field, expected),
            other => panic!("expected an error on {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_load_minimal_task() {
        let task = load_render_task_from_str(MINIMAL_TASK).unwrap();
        assert!(task.scene.is_finalized());
        assert_eq!(task.scene.objects().len(), 2);
        assert_eq!(task.scene.lights().len(), 1);
        assert_eq!(task.scene.background(), Spectrum::new(0.0, 0.0, 0.1));
        assert_eq!(task.scene.scattering_sigma(), None);
        assert_eq!((task.camera.width, task.camera.height), (32, 24));
        assert_eq!(task.config.samples_per_pixel, 4);
        assert_eq!(task.config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(task.seed, 42);

        assert!(matches!(
            task.scene.objects()[1].material,
            Material::Glass { refractive_index } if refractive_index == 1.0
        ));
        let hit = task.scene.intersect(&Ray::new(Vec4::ZERO, Vec4::W)).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_builtin_cornell_scene() {
        let json = r#"{
            "scene_name": "cornell",
            "camera": { "width": 8, "height": 8, "fov_x": 120, "fov_y": 120 },
            "samples_per_pixel": 1,
            "max_depth": 3
        }"#;
        let task = load_render_task_from_str(json).unwrap();
        assert_eq!(task.scene.objects().len(), cornell_tesseract().objects.len());
        assert_eq!(task.config.max_depth, 3);
        assert_eq!(task.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_scene_source_must_be_unique() {
        let both = MINIMAL_TASK.replacen("\"scene\": {", "\"scene_name\": \"cornell\", \"scene\": {", 1);
        assert!(matches!(load_render_task_from_str(&both), Err(LoadError::SceneSource)));

        let unknown = r#"{
            "scene_name": "kitchen",
            "camera": { "width": 8, "height": 8, "fov_x": 60, "fov_y": 60 },
            "samples_per_pixel": 1
        }"#;
        assert!(matches!(load_render_task_from_str(unknown), Err(LoadError::UnknownScene(name)) if name == "kitchen"));
    }

    #[test]
    fn test_rejects_bad_reflectance() {
        let json = MINIMAL_TASK.replace("[0.8, 0.8, 0.8]", "[0.8, 1.2, 0.8]");
        let err = load_render_task_from_str(&json).err().unwrap();
        expect_field(err, "scene.objects[0].material");
    }

    #[test]
    fn test_rejects_non_unit_normal() {
        let json = MINIMAL_TASK.replace("\"normal\": [0, 0, 0, -1]", "\"normal\": [0, 0, 0, -2]");
        let err = load_render_task_from_str(&json).err().unwrap();
        expect_field(err, "scene.objects[1].geometry");
    }

    #[test]
    fn test_rejects_bad_camera_and_sampling() {
        let json = MINIMAL_TASK.replace("\"fov_x\": 90", "\"fov_x\": 180");
        expect_field(load_render_task_from_str(&json).err().unwrap(), "camera.fov_x");

        let json = MINIMAL_TASK.replace("\"samples_per_pixel\": 4", "\"samples_per_pixel\": 0");
        expect_field(load_render_task_from_str(&json).err().unwrap(), "samples_per_pixel");

        let json = MINIMAL_TASK.replace("\"radius\": 1", "\"radius\": -1");
        expect_field(load_render_task_from_str(&json).err().unwrap(), "scene.objects[0].geometry");
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        let json = MINIMAL_TASK.replace("\"background\"", "\"scattering_sigma\": 0.0, \"background\"");
        expect_field(load_render_task_from_str(&json).err().unwrap(), "scene.scattering_sigma");
    }

    #[test]
    fn test_malformed_json_is_reported() {
        assert!(matches!(load_render_task_from_str("{"), Err(LoadError::Json(_))));
        let unknown_field = MINIMAL_TASK.replace("\"seed\": 42", "\"seeed\": 42");
        assert!(matches!(load_render_task_from_str(&unknown_field), Err(LoadError::Json(_))));
        assert!(matches!(
            load_render_task("/nonexistent/task.json"),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn test_pose_rows_and_defaults() {
        // Row-major: first row maps local Y onto world X.
        let desc = PoseDesc {
            rotation: Some([
                0.0, 1.0, 0.0, 0.0, //
                -1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ]),
            translation: None,
        };
        let pose = load_pose("pose", &desc).unwrap();
        assert_eq!(pose.transform_vector(Vec4::Y), Vec4::X);
        assert_eq!(pose.translation(), Vec4::ZERO);

        assert_eq!(load_pose("pose", &PoseDesc::default()).unwrap(), Pose::IDENTITY);
    }

    #[test]
    fn test_rejects_improper_rotation() {
        let mut rows = Mat4::IDENTITY.to_cols_array();
        rows[0] = -1.0;
        let desc = PoseDesc {
            rotation: Some(rows),
            translation: Some([1.0, 2.0, 3.0, 4.0]),
        };
        let err = load_pose("camera.local_to_world", &desc).err().unwrap();
        assert!(matches!(
            err,
            LoadError::Physics { source: PhysicsError::Pose(_), .. }
        ));
    }

    #[test]
    fn test_demo_tasks_load() {
        let fog = load_render_task_from_str(include_str!("../../../demos/foggy_room.json")).unwrap();
        assert_eq!(fog.scene.scattering_sigma(), Some(4.0));
        assert_eq!(fog.scene.objects().len(), 5);
        assert_eq!(fog.config.max_depth, 6);

        let cornell = load_render_task_from_str(include_str!("../../../demos/cornell_tesseract.json")).unwrap();
        assert_eq!(cornell.camera, build_camera(&crate::cornell_camera(200, 200)).unwrap());
    }

    #[test]
    fn test_obb_size_is_full_extent() {
        let geometry = load_geometry(
            "obb",
            &GeometryDesc::Obb {
                local_to_world: PoseDesc::default(),
                size: [2.0, 2.0, 2.0, 4.0],
            },
        )
        .unwrap();
        let hit = geometry.intersect(&Ray::new(Vec4::new(0.0, 0.0, 0.0, -10.0), Vec4::W)).unwrap();
        assert!((hit.pos.w + 2.0).abs() < 1e-5);
    }
}
