//! Frame driver.
//!
//! Walks the pixels of a frame, averages the subsample rays of each pixel
//! and writes the result to a [`PixelSink`]. This is the single-threaded
//! reference path; [`crate::bucket::render_parallel`] renders the same image
//! on the rayon pool.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lux_core::{RenderSettings, Scene};
use lux_math::{Camera, Color, Interval};

use crate::context::RenderContext;
use crate::error::{RenderError, RenderResult, ShadeResult};
use crate::reflect::trace;
use crate::sampling::RaySampler;

/// Painted into pixels whose shading failed, so they stand out.
pub const SENTINEL_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// Destination for rendered pixels.
pub trait PixelSink {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgba(*c)).collect()
    }
}

impl PixelSink for ImageBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.set(x, y, color);
    }
}

/// Convert a color to 8-bit RGBA.
///
/// Channels are clamped to [0, 1]; no gamma curve is applied.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let unit = Interval::new(0.0, 1.0);
    let channel = |c: f32| (255.0 * unit.clamp(c)).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// Output size for the given settings.
///
/// The legacy inclusive range samples one extra row and column.
pub fn output_dimensions(settings: &RenderSettings) -> (u32, u32) {
    if settings.inclusive_bounds {
        (
            settings.width.saturating_add(1),
            settings.height.saturating_add(1),
        )
    } else {
        (settings.width, settings.height)
    }
}

/// Shared flag for stopping a render from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Cancellation and time limit for a render pass.
///
/// Both are checked before each scanline, so a pass stops within one row of
/// work.
#[derive(Debug, Clone, Default)]
pub struct RenderControl {
    pub cancel: CancelToken,
    /// Soft limit on wall-clock time
    pub deadline: Option<Duration>,
}

impl RenderControl {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Error out if the pass should stop.
    pub fn check(&self, started: Instant) -> RenderResult<()> {
        if self.cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            let elapsed = started.elapsed();
            if elapsed >= deadline {
                return Err(RenderError::DeadlineExceeded {
                    elapsed_ms: elapsed.as_millis(),
                });
            }
        }
        Ok(())
    }
}

/// Counters and timing of a finished pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    pub width: u32,
    pub height: u32,
    pub pixels: u64,
    pub rays: u64,
    /// Pixels painted with [`SENTINEL_COLOR`]
    pub failed_pixels: u64,
    pub elapsed: Duration,
}

impl RenderStats {
    /// Record one pixel's outcome and return the color to store.
    pub(crate) fn record(&mut self, rays: usize, result: ShadeResult<Color>, x: u32, y: u32) -> Color {
        self.pixels += 1;
        self.rays += rays as u64;
        match result {
            Ok(color) => color,
            Err(err) => {
                log::debug!("Pixel ({x}, {y}) failed: {err}");
                self.failed_pixels += 1;
                SENTINEL_COLOR
            }
        }
    }

    pub(crate) fn absorb(&mut self, other: &RenderStats) {
        self.pixels += other.pixels;
        self.rays += other.rays;
        self.failed_pixels += other.failed_pixels;
    }

    pub(crate) fn log_summary(&self, scene: &str) {
        log::info!("Render of '{scene}' took {:.2} ms: {self}", self.elapsed.as_secs_f64() * 1000.0);
        if self.failed_pixels > 0 {
            log::warn!(
                "{} pixel(s) could not be shaded and were painted magenta",
                self.failed_pixels
            );
        }
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}, {} pixels, {} rays, {} failed",
            self.width, self.height, self.pixels, self.rays, self.failed_pixels
        )
    }
}

/// Average color of the subsample rays through pixel `(x, y)`.
///
/// Fails if shading any of the rays fails.
pub fn render_pixel(ctx: &RenderContext, sampler: &RaySampler, x: u32, y: u32) -> ShadeResult<Color> {
    let mut sum = Color::ZERO;
    for ray in sampler.rays_for_pixel(x, y) {
        sum += trace(ctx, &ray)?;
    }
    Ok(sum / sampler.rays_per_pixel() as f32)
}

/// Render the entire scene into `sink`.
///
/// The sink must match [`output_dimensions`] of the settings. Pixels whose
/// shading fails are painted [`SENTINEL_COLOR`] and counted; the pass
/// carries on.
pub fn render_into(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    sink: &mut dyn PixelSink,
    control: &RenderControl,
) -> RenderResult<RenderStats> {
    let started = Instant::now();
    let ctx = RenderContext::new(scene, settings.clone())?;
    let (width, height) = output_dimensions(&ctx.settings);
    check_sink(sink, (width, height))?;

    let sampler = RaySampler::new(camera, &ctx.settings);
    let mut stats = RenderStats {
        width,
        height,
        ..Default::default()
    };

    log::info!(
        "Rendering '{}' at {width}x{height}, {} rays per pixel",
        scene.name,
        sampler.rays_per_pixel()
    );

    for y in 0..height {
        control.check(started)?;
        for x in 0..width {
            let result = render_pixel(&ctx, &sampler, x, y);
            let color = stats.record(sampler.rays_per_pixel(), result, x, y);
            sink.set_pixel(x, y, color);
        }
    }

    stats.elapsed = started.elapsed();
    stats.log_summary(&scene.name);
    Ok(stats)
}

/// Render the entire scene to a new image buffer.
///
/// This is the simple single-threaded renderer.
pub fn render(scene: &Scene, camera: &Camera, settings: &RenderSettings) -> RenderResult<ImageBuffer> {
    settings.validate()?;
    let (width, height) = output_dimensions(settings);
    let mut image = ImageBuffer::new(width, height);
    render_into(scene, camera, settings, &mut image, &RenderControl::default())?;
    Ok(image)
}

pub(crate) fn check_sink(sink: &dyn PixelSink, expected: (u32, u32)) -> RenderResult<()> {
    let actual = sink.dimensions();
    if actual != expected {
        return Err(RenderError::SinkSize { expected, actual });
    }
    Ok(())
}
