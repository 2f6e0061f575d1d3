use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lux_core::RenderSettings;
use lux_renderer::DEFAULT_BUCKET_SIZE;

/// Log levels accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneChoice {
    /// Box with mirror cubes, two spheres and three colored lights
    Cornell,
    /// One red sphere under a white light
    RedSphere,
}

#[derive(Debug, Parser)]
#[command(name = "lux")]
#[command(about = "Whitted-style CPU ray tracer")]
pub struct Args {
    /// JSON render settings; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "cornell")]
    pub scene: SceneChoice,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Subsamples per pixel axis
    #[arg(short, long)]
    pub subsamples: Option<u32>,

    /// Maximum number of mirror bounces
    #[arg(long)]
    pub max_depth: Option<u32>,

    #[arg(long)]
    pub no_shadows: bool,

    /// Light with the main light only
    #[arg(long)]
    pub single_light: bool,

    /// Name of the light used by --single-light
    #[arg(long)]
    pub main_light: Option<String>,

    /// Intersect spheres through their triangle tessellation
    #[arg(long)]
    pub tessellated_spheres: bool,

    #[arg(long)]
    pub no_mirrors: bool,

    /// Paint flat material colors instead of Phong shading
    #[arg(long)]
    pub no_phong: bool,

    /// Sample one extra row and column, as older renders did
    #[arg(long)]
    pub inclusive_bounds: bool,

    /// Worker threads (0 picks one per core)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,

    /// Render on the calling thread, scanline by scanline
    #[arg(long)]
    pub serial: bool,

    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Give up once the pass runs this long
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Logging level; RUST_LOG takes precedence when set
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Write every flag the user passed into `settings`.
    pub fn apply_overrides(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(subsamples) = self.subsamples {
            settings.subsamples = subsamples;
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = max_depth;
        }
        if let Some(name) = &self.main_light {
            settings.main_light = name.clone();
        }
        if self.no_shadows {
            settings.shadows = false;
        }
        if self.single_light {
            settings.all_lights = false;
        }
        if self.tessellated_spheres {
            settings.correct_spheres = false;
        }
        if self.no_mirrors {
            settings.mirrors = false;
        }
        if self.no_phong {
            settings.phong = false;
        }
        if self.inclusive_bounds {
            settings.inclusive_bounds = true;
        }
    }
}
