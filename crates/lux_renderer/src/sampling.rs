//! Primary ray generation with stratified subsampling.
//!
//! Each pixel is split into an `n × n` grid of subsamples placed at
//! `k / (n + 1)` for `k = 1..=n` along both axes, so samples never touch the
//! pixel border and the pattern is the same for every pixel.

use lux_core::RenderSettings;
use lux_math::{Camera, Mat4, Ray, Vec2};

/// Sub-pixel offsets along one axis for `subsamples` samples.
///
/// `subsamples <= 1` gives the single pixel center.
pub fn subsample_offsets(subsamples: u32) -> Vec<f32> {
    if subsamples <= 1 {
        return vec![0.5];
    }
    let step = 1.0 / (subsamples + 1) as f32;
    (1..=subsamples).map(|k| k as f32 * step).collect()
}

/// Map a position in pixel space to NDC. Row 0 is the top of the image.
pub fn pixel_to_ndc(px: f32, py: f32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        2.0 * px / width as f32 - 1.0,
        1.0 - 2.0 * py / height as f32,
    )
}

/// Generates the primary rays of a frame.
///
/// Caches the inverse view-projection matrix and the subsample offsets so
/// per-pixel generation does no matrix inversion.
#[derive(Debug, Clone)]
pub struct RaySampler {
    camera: Camera,
    inverse_view_projection: Mat4,
    offsets: Vec<f32>,
    width: u32,
    height: u32,
}

impl RaySampler {
    pub fn new(camera: &Camera, settings: &RenderSettings) -> Self {
        Self {
            camera: *camera,
            inverse_view_projection: camera.view_projection_matrix().inverse(),
            offsets: subsample_offsets(settings.subsamples),
            width: settings.width,
            height: settings.height,
        }
    }

    /// Number of rays per pixel.
    pub fn rays_per_pixel(&self) -> usize {
        self.offsets.len() * self.offsets.len()
    }

    /// Rays through the subsamples of pixel `(x, y)`, row by row.
    pub fn rays_for_pixel(&self, x: u32, y: u32) -> impl Iterator<Item = Ray> + '_ {
        self.offsets.iter().flat_map(move |&oy| {
            self.offsets.iter().map(move |&ox| {
                let ndc = pixel_to_ndc(x as f32 + ox, y as f32 + oy, self.width, self.height);
                self.camera
                    .ray_through_ndc_with(&self.inverse_view_projection, ndc)
            })
        })
    }
}

/// Rays through the subsamples of pixel `(x, y)`.
///
/// Returns `subsamples²` rays, or one when `subsamples <= 1`.
pub fn rays_for_pixel(camera: &Camera, x: u32, y: u32, settings: &RenderSettings) -> Vec<Ray> {
    RaySampler::new(camera, settings).rays_for_pixel(x, y).collect()
}
