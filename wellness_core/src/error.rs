//! Error types for the wellness_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wellness_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An assessment failed ranking validation
    #[error("course '{course}', assessment '{assessment}': {reason}")]
    InvalidAssessment {
        course: String,
        assessment: String,
        reason: String,
    },

    /// A course failed ranking validation
    #[error("course '{course}': {reason}")]
    InvalidCourse { course: String, reason: String },

    /// Course portfolio error
    #[error("Portfolio error: {0}")]
    Portfolio(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
