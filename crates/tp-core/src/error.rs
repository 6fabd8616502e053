//! Error types for the track panel

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Invalid display bounds: lower {lower} must be below upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("Invalid dB range: {0} (must be positive)")]
    InvalidDbRange(f64),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type PanelResult<T> = Result<T, PanelError>;
