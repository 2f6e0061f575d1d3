mod cli;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use lux_core::{demo, LiveSettings, RenderSettings, Scene};
use lux_math::Camera;
use lux_renderer::{output_dimensions, render_into, render_parallel, ImageBuffer, RenderControl};

use cli::{Args, SceneChoice};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(LevelFilter::from(args.log_level))
        .parse_default_env()
        .init();

    log::info!("Starting Lux");

    let base = match &args.config {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };

    let live = LiveSettings::new(base);
    live.subscribe(|changed, _| {
        log::info!("Settings overridden from the command line: {}", changed.join(", "));
    });
    live.update(|settings| args.apply_overrides(settings))
        .context("Invalid command line settings")?;
    let settings = live.snapshot();

    let (scene, camera) = build_scene(args.scene, settings.aspect());
    log::info!(
        "Scene '{}': {} primitives, {} lights, {} triangles",
        scene.name,
        scene.primitives().len(),
        scene.lights().len(),
        scene.total_triangle_count()
    );

    let mut control = RenderControl::default();
    if let Some(ms) = args.deadline_ms {
        control = control.with_deadline(Duration::from_millis(ms));
    }

    let (width, height) = output_dimensions(&settings);
    let mut image = ImageBuffer::new(width, height);

    let stats = if args.serial {
        render_into(&scene, &camera, &settings, &mut image, &control)?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build()
            .context("Failed to build render thread pool")?;
        log::info!("Rendering on {} threads", pool.current_num_threads());
        pool.install(|| {
            render_parallel(&scene, &camera, &settings, &mut image, &control, args.bucket_size)
        })?
    };

    if stats.failed_pixels > 0 {
        log::warn!("{} pixels could not be shaded", stats.failed_pixels);
    }

    save_png(&image, &args.output)?;
    log::info!("Saved {}x{} image to {}", width, height, args.output.display());

    Ok(())
}

fn build_scene(choice: SceneChoice, aspect: f32) -> (Scene, Camera) {
    match choice {
        SceneChoice::Cornell => demo::cornell_box(aspect),
        SceneChoice::RedSphere => demo::red_sphere(aspect),
    }
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        &image.to_rgba(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", path.display()))
}
