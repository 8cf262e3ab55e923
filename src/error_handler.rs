//! Mapping of validator errors into user-facing validation results

use log::debug;
use std::error::Error as StdError;

use crate::models::{ErrorKind, ValidationError, ValidationResult, SUGGESTION_PREFIX};

/// Translates [`ValidationError`]s into [`ValidationResult`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    /// Create a new ErrorHandler
    pub fn new() -> Self {
        Self
    }

    /// Map a single error to exactly one result variant
    pub fn handle_validation_error(&self, error: &ValidationError) -> ValidationResult {
        let ValidationError {
            kind,
            message,
            details,
            suggested_fix,
        } = error.clone();

        match kind {
            ErrorKind::CompilationError => ValidationResult::Error {
                message,
                details,
                fix: suggested_fix,
            },
            ErrorKind::RuntimeRisk => ValidationResult::Warning { message, details },
            ErrorKind::CodeQuality => ValidationResult::Success {
                message: format!("{}{}", SUGGESTION_PREFIX, message),
            },
            ErrorKind::ArchitecturalViolation => ValidationResult::Error {
                message: format!("Architectural Violation: {}", message),
                details,
                fix: suggested_fix,
            },
            ErrorKind::NetworkConfiguration => ValidationResult::Error {
                message: format!("Network Configuration Issue: {}", message),
                details,
                fix: suggested_fix,
            },
            ErrorKind::DataBinding => ValidationResult::Warning {
                message: format!("Data Binding Issue: {}", message),
                details,
            },
            ErrorKind::DependencyInjection => ValidationResult::Error {
                message: format!("DI Configuration Issue: {}", message),
                details,
                fix: suggested_fix,
            },
        }
    }

    /// Map errors element-wise, preserving order
    pub fn handle_validation_errors(&self, errors: &[ValidationError]) -> Vec<ValidationResult> {
        errors
            .iter()
            .map(|error| self.handle_validation_error(error))
            .collect()
    }

    /// Wrap a failure captured during a validator call
    pub fn create_validation_error<E>(&self, cause: &E, kind: ErrorKind, context: &str) -> ValidationError
    where
        E: StdError + ?Sized,
    {
        let mut details = cause.to_string();
        let mut source = cause.source();
        while let Some(inner) = source {
            details.push_str(&format!("\ncaused by: {}", inner));
            source = inner.source();
        }

        debug!("Wrapping {} failure in '{}': {}", kind, context, details);

        ValidationError {
            kind,
            message: context.to_string(),
            details,
            suggested_fix: kind.remediation_hint().to_string(),
        }
    }
}
