//! Lux Renderer - CPU Whitted-style ray tracing
//!
//! Traces primary rays from a pinhole camera through a flat scene of
//! spheres and triangle meshes, shades hits with Phong lighting and hard
//! shadows, and follows mirror reflections up to a fixed depth.
//!
//! Every pass snapshots its settings into a [`RenderContext`] up front, so
//! the core never reads shared mutable state while tracing.

mod bucket;
mod context;
mod error;
mod hit;
mod intersect;
mod reflect;
mod renderer;
mod sampling;
mod shade;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use context::RenderContext;
pub use error::{RenderError, RenderResult, ShadeError, ShadeResult};
pub use hit::{Intersection, SurfaceNormal};
pub use intersect::{intersect_sphere, intersect_triangle, solve_quadratic, Roots, TriangleHit};
pub use reflect::{resolve_color, trace, BACKGROUND};
pub use renderer::{
    color_to_rgba, output_dimensions, render, render_into, render_pixel, CancelToken, ImageBuffer,
    PixelSink, RenderControl, RenderStats, SENTINEL_COLOR,
};
pub use sampling::{pixel_to_ndc, rays_for_pixel, subsample_offsets, RaySampler};
pub use shade::{in_shadow, shade, shade_all, specular_normalization, LIGHT_BRIGHTNESS};

/// Re-export common math types from lux_math
pub use lux_math::{Color, Ray, Vec3};
