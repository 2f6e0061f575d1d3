//! Lux Core - Scene model and render settings for the Lux ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Primitive`, `Shape`, `Material`, `PointLight`
//! - **Meshes**: indexed triangle meshes and builders for planes, boxes and
//!   spheres
//! - **Settings**: serializable `RenderSettings` and `LiveSettings` with
//!   change listeners
//! - **Demo scenes**: a Cornell-style box and a single lit sphere
//!
//! # Example
//!
//! ```ignore
//! use lux_core::demo;
//! use lux_core::settings::RenderSettings;
//!
//! let settings = RenderSettings::from_json_file("render.json")?;
//! let (scene, camera) = demo::cornell_box(settings.aspect());
//! println!("{} primitives, {} lights", scene.primitives().len(), scene.lights().len());
//! ```

pub mod demo;
pub mod mesh;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use mesh::Mesh;
pub use scene::{Material, PointLight, Primitive, PrimitiveId, Scene, Shape, Transform};
pub use settings::{LiveSettings, RenderSettings, SettingsError, MAX_DIMENSION};
