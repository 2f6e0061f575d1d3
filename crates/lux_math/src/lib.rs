//! Math primitives for the Lux ray tracer.
//!
//! Vectors, colors and matrices come straight from glam. This crate adds the
//! ray type, the pinhole camera and the normal-matrix extension the tracer needs
//! on top of glam's value types.

// Re-export glam for convenience
pub use glam::*;

mod camera;
mod interval;
mod ray;
mod transform;
mod vector;

pub use camera::Camera;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;
pub use vector::Color;
