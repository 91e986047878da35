//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Grid reference that cannot be parsed (bad digits, odd length, too short)
    #[error("Malformed grid reference: {0}")]
    MalformedGridReference(String),

    /// Grid square letter outside the National Grid lettering
    #[error("Unknown grid square letter: {0:?}")]
    UnknownGridSquare(char),

    /// Inverse projection exceeded its iteration cap
    #[error("Projection did not converge after {iterations} iterations")]
    ProjectionDidNotConverge {
        /// Iterations performed before giving up
        iterations: usize,
    },

    /// Simplification tolerance that is not a positive finite number
    #[error("Invalid tolerance: {0} (must be positive)")]
    InvalidTolerance(f64),

    /// Track without any points
    #[error("Track contains no points")]
    EmptyTrack,

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Stable numeric error codes.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Malformed grid reference
    MalformedGridReference = 10001,
    /// Unknown grid square letter
    UnknownGridSquare = 10002,
    /// Inverse projection did not converge
    ProjectionDidNotConverge = 10003,
    /// Non-positive simplification tolerance
    InvalidTolerance = 10004,
    /// Empty track
    EmptyTrack = 10005,
    /// JSON parsing error
    JsonParsing = 10006,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::MalformedGridReference(_) => GeoErrorCode::MalformedGridReference,
            GeoError::UnknownGridSquare(_) => GeoErrorCode::UnknownGridSquare,
            GeoError::ProjectionDidNotConverge { .. } => GeoErrorCode::ProjectionDidNotConverge,
            GeoError::InvalidTolerance(_) => GeoErrorCode::InvalidTolerance,
            GeoError::EmptyTrack => GeoErrorCode::EmptyTrack,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
