//! Error types for group-runner
//!
//! Selection itself fails soft on malformed metadata. The variants here cover
//! configuration problems, bad `--regex=` patterns and unreadable test files,
//! all of which abort the run.

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid --regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read test file {path}: {source}")]
    TestFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by a [`TestRunner`](crate::runner::TestRunner)
    /// implementation; returned unchanged by `GroupRunner::run_tests`
    #[error("Test runner failed: {0}")]
    Host(String),
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
