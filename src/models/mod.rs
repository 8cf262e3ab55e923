//! Core data models for Warden

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub mod findings;
pub mod report;

pub use findings::*;
pub use report::*;

/// Prefix attached to non-blocking code quality suggestions
pub const SUGGESTION_PREFIX: &str = "Suggestion: ";

/// Severity levels for issues
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Must be fixed; blocks a healthy report
    Critical,

    /// Should be fixed
    Warning,

    /// Worth looking at
    Info,
}

impl Severity {
    /// Score penalty for a single issue of this severity
    pub fn penalty(&self) -> u32 {
        match self {
            Severity::Critical => 10,
            Severity::Warning => 3,
            Severity::Info => 1,
        }
    }

    /// Get the emoji representation of this severity
    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Critical => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }
}

/// Priority of a recommendation or action item
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Kinds of validator-level errors
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ErrorKind {
    /// Code that will not compile
    CompilationError,

    /// Code that compiles but may fail at runtime
    RuntimeRisk,

    /// Style or maintainability concern
    CodeQuality,

    /// Dependency that crosses a forbidden layer boundary
    ArchitecturalViolation,

    /// Webhook or network setup problem
    NetworkConfiguration,

    /// UI state binding problem
    DataBinding,

    /// Dependency injection setup problem
    DependencyInjection,
}

impl ErrorKind {
    /// Canned remediation hint for this kind of error
    pub fn remediation_hint(&self) -> &'static str {
        match self {
            ErrorKind::CompilationError => {
                "Fix the compilation error before running validation again."
            }
            ErrorKind::RuntimeRisk => {
                "Review the flagged code path and guard against runtime failures."
            }
            ErrorKind::CodeQuality => {
                "Consider refactoring to improve readability and maintainability."
            }
            ErrorKind::ArchitecturalViolation => {
                "Move the dependency behind an interface in the correct architectural layer."
            }
            ErrorKind::NetworkConfiguration => {
                "Check the webhook URL, network security configuration and connectivity."
            }
            ErrorKind::DataBinding => {
                "Expose UI state as read-only StateFlow and collect it lifecycle-aware."
            }
            ErrorKind::DependencyInjection => {
                "Verify Hilt modules, bindings and scopes for the affected component."
            }
        }
    }
}

/// Normalized outcome of a single validation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationResult {
    /// Nothing to fix
    Success { message: String },

    /// Something should be looked at
    Warning { message: String, details: String },

    /// Something must be fixed
    Error {
        message: String,
        details: String,
        fix: String,
    },
}

impl ValidationResult {
    /// Get the user-facing message
    pub fn message(&self) -> &str {
        match self {
            ValidationResult::Success { message }
            | ValidationResult::Warning { message, .. }
            | ValidationResult::Error { message, .. } => message,
        }
    }

    /// Get the details, if this result carries any
    pub fn details(&self) -> Option<&str> {
        match self {
            ValidationResult::Success { .. } => None,
            ValidationResult::Warning { details, .. } | ValidationResult::Error { details, .. } => {
                Some(details)
            }
        }
    }

    /// Get the suggested fix, if this result carries one
    pub fn fix(&self) -> Option<&str> {
        match self {
            ValidationResult::Error { fix, .. } => Some(fix),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationResult::Error { .. })
    }

    /// Whether this is a non-blocking code quality suggestion
    pub fn is_suggestion(&self) -> bool {
        matches!(self, ValidationResult::Success { message } if message.starts_with(SUGGESTION_PREFIX))
    }

    /// Severity this result counts as when folded into a report.
    ///
    /// Plain successes are not issues and return `None`; suggestions count as info.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            ValidationResult::Error { .. } => Some(Severity::Critical),
            ValidationResult::Warning { .. } => Some(Severity::Warning),
            ValidationResult::Success { .. } if self.is_suggestion() => Some(Severity::Info),
            ValidationResult::Success { .. } => None,
        }
    }
}

/// A validator-level error before it is mapped to a [`ValidationResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Kind of error
    pub kind: ErrorKind,

    /// Short description
    pub message: String,

    /// Longer explanation, usually the underlying cause
    pub details: String,

    /// How to fix it
    pub suggested_fix: String,
}

impl ValidationError {
    /// Create a new validation error with the canned hint for its kind
    pub fn new(kind: ErrorKind, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: details.into(),
            suggested_fix: kind.remediation_hint().to_string(),
        }
    }

    /// Replace the suggested fix
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = fix.into();
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
