//! Pentatope Loader - JSON render tasks.
//!
//! This crate provides:
//!
//! - **Task description types**: serde mirrors of the JSON task format
//! - **Loading**: validation and construction of the renderer's scene, camera
//!   and configuration
//! - **Builtin scenes**: the "cornell tesseract"
//!
//! # Example
//!
//! ```ignore
//! use penta_loader::load_render_task;
//! use penta_renderer::Sampler;
//!
//! let task = load_render_task("scene.json")?;
//! let image = task.camera.render(&task.scene, &mut Sampler::new(task.seed), &task.config)?;
//! ```

pub mod cornell;
pub mod loader;
pub mod types;

pub use cornell::{cornell_camera, cornell_task, cornell_tesseract, CORNELL_SCENE_NAME};
pub use loader::{
    build_camera, build_render_task, build_scene, load_pose, load_render_task, load_render_task_from_str, LoadError,
    LoadResult, RenderTask, DEFAULT_MAX_DEPTH,
};
pub use types::*;
