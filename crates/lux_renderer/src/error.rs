//! Error types for shading and frame rendering.

use lux_core::{PrimitiveId, SettingsError};
use thiserror::Error;

/// Failure while shading a single hit. Fatal to one pixel only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShadeError {
    #[error("Triangle hit on primitive {primitive} has no face normal")]
    MissingFaceNormal { primitive: PrimitiveId },
}

/// Result type for shading operations.
pub type ShadeResult<T> = Result<T, ShadeError>;

/// Errors that stop a render pass.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Light '{0}' not found in scene")]
    MissingLight(String),

    #[error("Pixel sink is {actual:?} but the render needs {expected:?}")]
    SinkSize {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Render cancelled")]
    Cancelled,

    #[error("Render deadline passed after {elapsed_ms} ms")]
    DeadlineExceeded { elapsed_ms: u128 },
}

/// Result type for render passes.
pub type RenderResult<T> = Result<T, RenderError>;
