//! # Error Types
//!
//! The render core never fails: degenerate geometry draws nothing and history
//! moves at the boundaries are no-ops. These errors only surface at the host
//! boundary (decoding files, parsing configuration, CLI parameter patches).

use thiserror::Error;

/// Main error type for dotmatrix operations
#[derive(Debug, Error)]
pub enum DotmatrixError {
    /// Image decode/encode failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration (de)serialization failure
    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    /// No effect registered under this name
    #[error("Unknown effect '{0}'")]
    UnknownEffect(String),

    /// Parameter name not present on the effect's config
    #[error("Unknown param '{name}' for {effect}")]
    UnknownParam { effect: String, name: String },

    /// Parameter value could not be applied
    #[error("Invalid value '{value}' for '{name}': {reason}")]
    InvalidParam {
        name: String,
        value: String,
        reason: String,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
