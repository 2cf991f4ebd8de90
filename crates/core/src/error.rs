// Error handling for the playback controller

use std::fmt;

/// Playback controller error types
#[derive(Debug, Clone)]
pub enum PlaybackError {
    /// No renderable surface is bound yet; the open request is kept and
    /// retried when a surface appears
    SourceUnavailable(String),

    /// Engine construction, source binding, or playback control failed
    EngineFailure(String),

    /// A state transition outside the defined table was rejected
    InvalidTransition(String),

    /// Generic error
    Other(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlaybackError::SourceUnavailable(msg) => write!(f, "Source unavailable: {}", msg),
            PlaybackError::EngineFailure(msg) => write!(f, "Engine failure: {}", msg),
            PlaybackError::InvalidTransition(msg) => write!(f, "Invalid transition: {}", msg),
            PlaybackError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Result type alias for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
