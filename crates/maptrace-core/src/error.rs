//! Error types for maptrace
//!
//! Calibration and optimization are expected to fail under normal input
//! conditions (one matched pair, no image loaded yet), so every failure is a
//! value-returned variant here rather than a panic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaptraceError {
    // Transform preconditions
    #[error("No image loaded: image dimensions are {width}x{height}")]
    NoImage { width: u32, height: u32 },

    #[error("Displayed bounds are degenerate: {reason}")]
    DegenerateBounds { reason: String },

    // Calibration errors
    #[error("Calibration needs at least 2 matched pairs, found {found}")]
    InsufficientPairs { found: usize },

    #[error("Calibration diverged: {reason}")]
    CalibrationDiverged { reason: String },

    // Route errors
    #[error("Control point not found: {id}")]
    ControlPointNotFound { id: String },

    // Document normalization errors
    #[error("Invalid route document: {reason}")]
    DocumentInvalid { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, MaptraceError>;
