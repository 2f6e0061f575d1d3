//! Bucket-based parallel rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! on the rayon pool. Every bucket owns a disjoint pixel range and returns
//! its own colors; the sink is written only after all buckets finish.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use lux_core::{RenderSettings, Scene};
use lux_math::{Camera, Color};
use rayon::prelude::*;

use crate::context::RenderContext;
use crate::error::RenderResult;
use crate::renderer::{check_sink, output_dimensions, render_pixel, PixelSink, RenderControl, RenderStats};
use crate::sampling::RaySampler;

/// Default bucket edge length in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Top-left corner
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bucket {
    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Twice the bucket center, in integer pixels.
    fn doubled_center(&self) -> (i64, i64) {
        (
            2 * self.x as i64 + self.width as i64,
            2 * self.y as i64 + self.height as i64,
        )
    }
}

/// Tile a `width` × `height` image, center buckets first.
///
/// Edge buckets are cropped to the image. Ordering from the middle outward
/// means an interrupted render has its most visible region done.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width).step_by(size as usize).map(move |x| Bucket {
                x,
                y,
                width: size.min(width - x),
                height: size.min(height - y),
            })
        })
        .collect();

    let (cx, cy) = (width as i64, height as i64);
    buckets.sort_by_key(|b| {
        let (bx, by) = b.doubled_center();
        (bx - cx).pow(2) + (by - cy).pow(2)
    });
    buckets
}

/// Pixels of a rendered bucket in row-major order, with its counters.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
    pub stats: RenderStats,
}

/// Render one bucket, checking `control` before each of its rows.
pub fn render_bucket(
    ctx: &RenderContext,
    sampler: &RaySampler,
    bucket: Bucket,
    control: &RenderControl,
    started: Instant,
) -> RenderResult<BucketResult> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count());
    let mut stats = RenderStats::default();

    for y in bucket.y..bucket.y + bucket.height {
        control.check(started)?;
        for x in bucket.x..bucket.x + bucket.width {
            let result = render_pixel(ctx, sampler, x, y);
            pixels.push(stats.record(sampler.rays_per_pixel(), result, x, y));
        }
    }

    Ok(BucketResult {
        bucket,
        pixels,
        stats,
    })
}

/// Render the entire scene into `sink` on the current rayon pool.
///
/// Produces the same image as [`crate::render_into`]. A cancelled or
/// timed-out pass leaves the sink untouched.
pub fn render_parallel(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    sink: &mut dyn PixelSink,
    control: &RenderControl,
    bucket_size: u32,
) -> RenderResult<RenderStats> {
    let started = Instant::now();
    let ctx = RenderContext::new(scene, settings.clone())?;
    let (width, height) = output_dimensions(&ctx.settings);
    check_sink(sink, (width, height))?;

    let sampler = RaySampler::new(camera, &ctx.settings);
    let buckets = generate_buckets(width, height, bucket_size);
    let total = buckets.len();
    let done = AtomicUsize::new(0);

    log::info!(
        "Rendering '{}' at {width}x{height} in {total} buckets on {} threads",
        scene.name,
        rayon::current_num_threads()
    );

    let results = buckets
        .par_iter()
        .map(|bucket| -> RenderResult<BucketResult> {
            let result = render_bucket(&ctx, &sampler, *bucket, control, started)?;
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {finished}/{total} done at ({}, {})", bucket.x, bucket.y);
            Ok(result)
        })
        .collect::<RenderResult<Vec<_>>>()?;

    let mut stats = RenderStats {
        width,
        height,
        ..Default::default()
    };
    for result in &results {
        let Bucket {
            x: left,
            y: top,
            width: span,
            ..
        } = result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            sink.set_pixel(left + i % span, top + i / span, *color);
        }
        stats.absorb(&result.stats);
    }

    stats.elapsed = started.elapsed();
    stats.log_summary(&scene.name);
    Ok(stats)
}
