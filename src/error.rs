//! Error types for the effect

use thiserror::Error;

/// Errors raised while building an effect
///
/// Nothing at runtime is an error: an exhausted pool just drops spawns and an
/// empty scene just draws nothing.
#[derive(Debug, Error)]
pub enum HanabiError {
    /// A drawing surface could not produce a 2D context
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    #[error("Unknown render mode: {0}")]
    UnknownRenderMode(String),
}

pub type Result<T> = std::result::Result<T, HanabiError>;
