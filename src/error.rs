//! Error types for the background renderer

use std::fmt;

/// Errors that can occur during configuration or renderer setup
///
/// Degenerate geometry is deliberately absent from this taxonomy: the mesh
/// builder skips or defaults bad cells and always yields a valid (possibly
/// empty) mesh instead of failing.
#[derive(Debug, Clone)]
pub enum BackgroundError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Rendering surface or GPU resource setup failed
    SetupFailed(String),
}

impl fmt::Display for BackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            BackgroundError::SetupFailed(msg) => write!(f, "setup failed: {}", msg),
        }
    }
}

impl std::error::Error for BackgroundError {}

/// Result type alias for background operations
pub type Result<T> = std::result::Result<T, BackgroundError>;
