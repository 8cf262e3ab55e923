use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for Warden
#[derive(Debug, Error)]
pub enum WardenError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Orchestration errors
    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Failed to load config from {path}: {message}")]
    LoadError { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Fatal orchestration-level failures.
///
/// Validator failures never end up here; they are folded into the report.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The project path does not point at a directory
    #[error("The path '{0}' is not a valid project directory\nPlease provide the root directory of the project to validate")]
    InvalidProjectPath(PathBuf),

    /// An aggregation invariant does not hold
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

/// Operational failures raised by a validator call
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Reading the project failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Source scanning failed
    #[error("Failed to scan '{path}': {message}")]
    Scan { path: PathBuf, message: String },

    /// A network check failed in an unexpected way
    #[error("Network error: {0}")]
    Network(String),

    /// The validator exceeded its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The validator could not run at all
    #[error("Validator '{name}' unavailable: {message}")]
    Unavailable { name: String, message: String },

    /// The validator panicked
    #[error("Validator panicked: {0}")]
    Panicked(String),
}
