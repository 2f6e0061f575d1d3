//! Render settings and live settings with change notification.
//!
//! [`RenderSettings`] is a plain serializable value. [`LiveSettings`] wraps
//! one behind a lock so a host can change parameters while listeners are
//! told which fields changed. Render passes never read `LiveSettings`
//! directly; they take a [`LiveSettings::snapshot`] once and keep it for the
//! whole pass.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or changing settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Largest accepted image width or height.
pub const MAX_DIMENSION: u32 = 1 << 16;

/// Parameters of a render pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Subsamples per pixel along each axis (1 = one centered sample)
    pub subsamples: u32,

    /// Maximum number of mirror bounces
    pub max_depth: u32,

    /// Trace shadow rays toward each light
    pub shadows: bool,

    /// Sum all lights instead of only the main light
    pub all_lights: bool,

    /// Intersect spheres analytically instead of through their tessellation
    pub correct_spheres: bool,

    /// Trace reflections on mirror materials
    pub mirrors: bool,

    /// Phong lighting; when off, pixels take the flat material color
    pub phong: bool,

    /// Name of the light used when `all_lights` is off
    pub main_light: String,

    /// Sample the closed pixel range `[0, width] x [0, height]` and produce
    /// a `(width + 1) x (height + 1)` image
    pub inclusive_bounds: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            subsamples: 3,
            max_depth: 5,
            shadows: true,
            all_lights: true,
            correct_spheres: true,
            mirrors: true,
            phong: true,
            main_light: "main_light".to_string(),
            inclusive_bounds: false,
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded render settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(text: &str) -> SettingsResult<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.width == 0 {
            return Err(invalid("width", "must be at least 1"));
        }
        if self.height == 0 {
            return Err(invalid("height", "must be at least 1"));
        }
        if self.width > MAX_DIMENSION {
            return Err(invalid("width", &format!("must be at most {MAX_DIMENSION}")));
        }
        if self.height > MAX_DIMENSION {
            return Err(invalid("height", &format!("must be at most {MAX_DIMENSION}")));
        }
        if !self.all_lights && self.main_light.trim().is_empty() {
            return Err(invalid(
                "main_light",
                "must name a light when all_lights is off",
            ));
        }
        Ok(())
    }

    /// Width/height ratio of the output image.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Names of the fields whose values differ between two settings.
    pub fn changed_fields(&self, other: &RenderSettings) -> Vec<&'static str> {
        let mut changed = Vec::new();
        macro_rules! compare {
            ($($field:ident),* $(,)?) => {
                $(
                    if self.$field != other.$field {
                        changed.push(stringify!($field));
                    }
                )*
            };
        }
        compare!(
            width,
            height,
            subsamples,
            max_depth,
            shadows,
            all_lights,
            correct_spheres,
            mirrors,
            phong,
            main_light,
            inclusive_bounds,
        );
        changed
    }
}

fn invalid(field: &'static str, message: &str) -> SettingsError {
    SettingsError::Invalid {
        field,
        message: message.to_string(),
    }
}

type Listener = Box<dyn Fn(&[&'static str], &RenderSettings) + Send + Sync>;

/// Shared, mutable settings with change listeners.
#[derive(Default)]
pub struct LiveSettings {
    current: RwLock<RenderSettings>,
    listeners: Mutex<Vec<Listener>>,
}

impl LiveSettings {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            current: RwLock::new(settings),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> RenderSettings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register a listener called after every update that changes at least
    /// one field. It receives the changed field names and the new settings.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&[&'static str], &RenderSettings) + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Apply an edit, validate it and notify listeners.
    ///
    /// An edit that fails validation is discarded and the previous settings
    /// stay in place. Returns the names of the changed fields.
    pub fn update<F>(&self, edit: F) -> SettingsResult<Vec<&'static str>>
    where
        F: FnOnce(&mut RenderSettings),
    {
        let (changed, updated) = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let mut candidate = current.clone();
            edit(&mut candidate);
            candidate.validate()?;

            let changed = current.changed_fields(&candidate);
            *current = candidate.clone();
            (changed, candidate)
        };

        if !changed.is_empty() {
            // Lock released above so listeners may take a snapshot
            let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            for listener in listeners.iter() {
                listener(&changed, &updated);
            }
        }
        Ok(changed)
    }
}

impl std::fmt::Debug for LiveSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSettings")
            .field("current", &self.snapshot())
            .finish_non_exhaustive()
    }
}
