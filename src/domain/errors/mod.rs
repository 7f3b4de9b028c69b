//! Error types for the split domain

use thiserror::Error;

/// Main error type for split operations
#[derive(Error, Debug)]
pub enum SplitError {
    /// Invalid time format
    #[error("Invalid time format: {input}. Expected HH:MM:SS, MM:SS, or seconds")]
    InvalidTimeFormat { input: String },

    /// Segment duration must be positive
    #[error("Invalid segment duration: {seconds}. Duration must be greater than zero")]
    InvalidDuration { seconds: f64 },

    /// Scene threshold outside the accepted range
    #[error("Invalid scene threshold: {threshold}. Threshold must be between 0.1 and 1.0")]
    InvalidThreshold { threshold: f32 },

    /// Manual cut point outside the valid range
    #[error("Cut point {point}s is out of range: must be >= 0 and < {ceiling}s")]
    PointOutOfRange { point: f64, ceiling: f64 },

    /// Manual cut point already present
    #[error("Duplicate cut point: {point}s is already in the set")]
    DuplicatePoint { point: f64 },

    /// Manual strategy with no points
    #[error("Manual split requires at least one cut point")]
    EmptyManualSet,

    /// No output directory given and none derivable from the source path
    #[error("No output directory given and none could be derived from {source_path}")]
    MissingOutputDirectory { source_path: String },

    /// Media engine binary missing or not runnable
    #[error("Media engine unavailable: {message}")]
    EngineUnavailable { message: String },

    /// Engine reported a failure while running
    #[error("Media engine failed: {message}")]
    EngineFailure { message: String },

    /// Source file not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Insufficient permissions for the output location
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// Container format not in the supported set
    #[error("Unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// Session operation that needs probed metadata first
    #[error("No source video loaded")]
    NoSourceLoaded,

    /// Planning produced nothing to cut
    #[error("No cut points produced; nothing to split")]
    NoCutPoints,

    /// A split is already running in this session
    #[error("A split operation is already in flight for this session")]
    ExecutionInFlight,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SplitError {
    /// Whether this error is a strategy parameter violation. These are
    /// resolved at input time and never reach the execution stage.
    pub fn is_invalid_strategy(&self) -> bool {
        matches!(
            self,
            SplitError::InvalidDuration { .. }
                | SplitError::InvalidThreshold { .. }
                | SplitError::PointOutOfRange { .. }
                | SplitError::DuplicatePoint { .. }
                | SplitError::EmptyManualSet
        )
    }
}

/// Result type alias for split operations
pub type SplitResult<T> = std::result::Result<T, SplitError>;
