//! Per-pass render context.
//!
//! A `RenderContext` pairs a scene with a snapshot of the settings taken
//! when the pass starts. Everything downstream (intersection, shading,
//! reflection) reads settings from here, so a pass sees one consistent
//! configuration even if the live settings change meanwhile.

use std::slice;

use lux_core::{PointLight, RenderSettings, Scene};

use crate::error::{RenderError, RenderResult};

/// Immutable state shared by every ray of one render pass.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub settings: RenderSettings,
    main_light: Option<&'a PointLight>,
}

impl<'a> RenderContext<'a> {
    /// Validate the settings against the scene and freeze them.
    ///
    /// Single-light Phong rendering needs the scene to contain a light
    /// named `settings.main_light`.
    pub fn new(scene: &'a Scene, settings: RenderSettings) -> RenderResult<Self> {
        settings.validate()?;

        let main_light = scene.light_by_name(&settings.main_light);
        if settings.phong && !settings.all_lights && main_light.is_none() {
            return Err(RenderError::MissingLight(settings.main_light.clone()));
        }
        if scene.lights().is_empty() && settings.phong {
            log::warn!("Scene '{}' has no lights, Phong shading will be black", scene.name);
        }

        Ok(Self {
            scene,
            settings,
            main_light,
        })
    }

    /// Lights that contribute to shading in this pass.
    pub fn active_lights(&self) -> &'a [PointLight] {
        if self.settings.all_lights {
            return self.scene.lights();
        }
        match self.main_light {
            Some(light) => slice::from_ref(light),
            None => &[],
        }
    }
}
