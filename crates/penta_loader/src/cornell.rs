//! The builtin "cornell tesseract" scene.
//!
//! A room `[-1, 1]³ × [0, 2]` with a white floor and ceiling along W, white X
//! walls, green/red Y walls and yellow/blue Z walls. Inside sit a diffuse
//! sphere, a glass sphere and a box, lit by one point light under the ceiling.

use crate::types::{
    CameraDesc, GeometryDesc, LightDesc, MaterialDesc, ObjectDesc, PointDesc, PoseDesc, RenderTaskDesc, RgbDesc,
    SceneDesc,
};

/// Value of `scene_name` that selects this scene.
pub const CORNELL_SCENE_NAME: &str = "cornell";

const WALL_RADIUS: f32 = 5.0;

fn wall(center: PointDesc, normal: PointDesc, reflectance: RgbDesc) -> ObjectDesc {
    ObjectDesc {
        geometry: GeometryDesc::Disc {
            center,
            normal,
            radius: WALL_RADIUS,
        },
        material: MaterialDesc::Lambert { reflectance },
    }
}

pub fn cornell_tesseract() -> SceneDesc {
    const WHITE: RgbDesc = [1.0, 1.0, 1.0];

    let mut objects = vec![
        // floor and ceiling (W)
        wall([0.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0], WHITE),
        wall([0.0, 0.0, 0.0, 2.0], [0.0, 0.0, 0.0, -1.0], WHITE),
        // X
        wall([-1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 0.0], WHITE),
        wall([1.0, 0.0, 0.0, 1.0], [-1.0, 0.0, 0.0, 0.0], WHITE),
        // Y
        wall([0.0, -1.0, 0.0, 1.0], [0.0, 1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        wall([0.0, 1.0, 0.0, 1.0], [0.0, -1.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
        // Z
        wall([0.0, 0.0, -1.0, 1.0], [0.0, 0.0, 1.0, 0.0], [1.0, 1.0, 0.0]),
        wall([0.0, 0.0, 1.0, 1.0], [0.0, 0.0, -1.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    objects.extend([
        ObjectDesc {
            geometry: GeometryDesc::Sphere {
                center: [0.0, 0.0, 0.0, 0.2],
                radius: 0.2,
            },
            material: MaterialDesc::Lambert { reflectance: WHITE },
        },
        ObjectDesc {
            geometry: GeometryDesc::Sphere {
                center: [0.0, 0.5, 0.1, 0.5],
                radius: 0.5,
            },
            material: MaterialDesc::Glass { refractive_index: 1.5 },
        },
        ObjectDesc {
            geometry: GeometryDesc::Obb {
                local_to_world: PoseDesc {
                    rotation: Some(IDENTITY_ROWS),
                    translation: Some([0.0; 4]),
                },
                size: [0.4, 0.4, 0.4, 0.8],
            },
            material: MaterialDesc::Lambert { reflectance: WHITE },
        },
    ]);

    SceneDesc {
        background: Some([0.0, 0.0, 0.1]),
        scattering_sigma: None,
        objects,
        lights: vec![LightDesc::Point {
            position: [0.0, 0.0, 0.0, 1.9],
            power: [100.0, 100.0, 100.0],
        }],
    }
}

const IDENTITY_ROWS: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Camera standing just inside the Y- wall, looking along +Y with W up.
pub fn cornell_camera(width: u32, height: u32) -> CameraDesc {
    CameraDesc {
        width,
        height,
        fov_x: 120.0,
        fov_y: 120.0,
        local_to_world: Some(PoseDesc {
            // columns: X -> X, Y -> W, Z -> -Z, W -> Y
            rotation: Some([
                1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, //
                0.0, 0.0, -1.0, 0.0, //
                0.0, 1.0, 0.0, 0.0,
            ]),
            translation: Some([0.0, -0.95, 0.0, 1.0]),
        }),
    }
}

/// The builtin scene seen through [`cornell_camera`].
pub fn cornell_task(width: u32, height: u32, samples_per_pixel: u32) -> RenderTaskDesc {
    RenderTaskDesc {
        scene_name: Some(CORNELL_SCENE_NAME.to_string()),
        scene: None,
        camera: cornell_camera(width, height),
        samples_per_pixel,
        max_depth: None,
        seed: None,
    }
}
