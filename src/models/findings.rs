//! Category-specific finding records produced by the validator families

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use strum_macros::{Display, EnumIter};

use super::{ErrorKind, Severity, ValidationResult};

/// Type of a finding, used for classification and recommendations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum FindingKind {
    UnusedImport,
    MissingImport,
    ArchitecturalViolation,
    CircularDependency,
    NetworkConfiguration,
    MissingEndpoint,
    ConnectivityFailure,
    JsonSerialization,
    StateFlow,
    DataBinding,
    Lifecycle,
    ModuleConfiguration,
    MissingBinding,
    DuplicateBinding,
    ScopeMismatch,
    StyleSuggestion,
    OperationalFailure,
}

impl FindingKind {
    /// Severity assignment policy.
    ///
    /// Layer violations, cycles, failed connectivity, bindings without an
    /// implementation and validator failures are critical. Import hygiene and
    /// style suggestions are informational. Everything else is a warning.
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::ArchitecturalViolation
            | FindingKind::CircularDependency
            | FindingKind::ConnectivityFailure
            | FindingKind::MissingBinding
            | FindingKind::OperationalFailure => Severity::Critical,
            FindingKind::UnusedImport | FindingKind::MissingImport | FindingKind::StyleSuggestion => {
                Severity::Info
            }
            FindingKind::NetworkConfiguration
            | FindingKind::MissingEndpoint
            | FindingKind::JsonSerialization
            | FindingKind::StateFlow
            | FindingKind::DataBinding
            | FindingKind::Lifecycle
            | FindingKind::ModuleConfiguration
            | FindingKind::DuplicateBinding
            | FindingKind::ScopeMismatch => Severity::Warning,
        }
    }

    /// Error kind used when this finding is reported as a [`ValidationResult`]
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            FindingKind::UnusedImport
            | FindingKind::MissingImport
            | FindingKind::StyleSuggestion => ErrorKind::CodeQuality,
            FindingKind::ArchitecturalViolation | FindingKind::CircularDependency => {
                ErrorKind::ArchitecturalViolation
            }
            FindingKind::NetworkConfiguration
            | FindingKind::MissingEndpoint
            | FindingKind::ConnectivityFailure
            | FindingKind::JsonSerialization => ErrorKind::NetworkConfiguration,
            FindingKind::StateFlow | FindingKind::DataBinding | FindingKind::Lifecycle => {
                ErrorKind::DataBinding
            }
            FindingKind::ModuleConfiguration
            | FindingKind::MissingBinding
            | FindingKind::DuplicateBinding
            | FindingKind::ScopeMismatch => ErrorKind::DependencyInjection,
            FindingKind::OperationalFailure => ErrorKind::CompilationError,
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::UnusedImport => "Unused imports",
            FindingKind::MissingImport => "Missing imports",
            FindingKind::ArchitecturalViolation => "Architectural violations",
            FindingKind::CircularDependency => "Circular dependencies",
            FindingKind::NetworkConfiguration => "Network configuration",
            FindingKind::MissingEndpoint => "Missing API endpoints",
            FindingKind::ConnectivityFailure => "Webhook connectivity",
            FindingKind::JsonSerialization => "JSON serialization",
            FindingKind::StateFlow => "State flow exposure",
            FindingKind::DataBinding => "Data binding",
            FindingKind::Lifecycle => "Lifecycle handling",
            FindingKind::ModuleConfiguration => "Hilt module configuration",
            FindingKind::MissingBinding => "Missing DI bindings",
            FindingKind::DuplicateBinding => "Duplicate DI bindings",
            FindingKind::ScopeMismatch => "DI scope mismatches",
            FindingKind::StyleSuggestion => "Style suggestions",
            FindingKind::OperationalFailure => "Validator failures",
        }
    }
}

/// A classified issue, flattened from a category-specific finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Finding type
    pub kind: FindingKind,

    /// Severity assigned by the policy
    pub severity: Severity,

    /// Issue message
    pub message: String,

    /// File where the issue was found
    pub file: Option<PathBuf>,
}

impl Issue {
    /// Create an issue classified by the severity policy
    pub fn new(kind: FindingKind, message: impl Into<String>, file: Option<PathBuf>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            file,
        }
    }

    /// Convert a folded diagnostic into an issue; plain successes yield nothing
    pub fn from_diagnostic(result: &ValidationResult) -> Option<Self> {
        let severity = result.severity()?;
        let kind = if result.is_suggestion() {
            FindingKind::StyleSuggestion
        } else {
            FindingKind::OperationalFailure
        };

        Some(Self {
            kind,
            severity,
            message: result.message().to_string(),
            file: None,
        })
    }
}

/// Anything that can be flattened into classified issues
pub trait Findings {
    /// Flatten into issues, in a stable order
    fn issues(&self) -> Vec<Issue>;
}

// ---------------------------------------------------------------------------
// Imports
// ---------------------------------------------------------------------------

/// An import that is never referenced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedImport {
    /// File containing the import
    pub file_path: PathBuf,

    /// The full import statement
    pub import_statement: String,

    /// Line number (1-indexed)
    pub line_number: usize,
}

/// A well-known symbol used without an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingImport {
    pub file_path: PathBuf,

    /// Symbol as it appears in the source
    pub symbol: String,

    /// Import that would resolve it
    pub suggested_import: String,
}

/// Kind of architectural violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ViolationKind {
    /// A layer depends on a layer it must not know about
    LayerDependency,

    /// The UI talks to the data layer directly
    DirectDataAccess,
}

/// A dependency crossing a forbidden layer boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitecturalViolation {
    pub file_path: PathBuf,
    pub violation_type: ViolationKind,
    pub description: String,
    pub suggestion: String,
}

/// A cycle in the package import graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularDependency {
    /// Packages participating in the cycle, sorted
    pub cycle: Vec<String>,
}

/// Aggregate result of the import validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportValidationResult {
    pub unused_imports: Vec<UnusedImport>,
    pub missing_imports: Vec<MissingImport>,
    pub architectural_violations: Vec<ArchitecturalViolation>,
    pub circular_dependencies: Vec<CircularDependency>,
}

impl Findings for ImportValidationResult {
    fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        for unused in &self.unused_imports {
            issues.push(Issue::new(
                FindingKind::UnusedImport,
                format!(
                    "Unused import '{}' (line {})",
                    unused.import_statement, unused.line_number
                ),
                Some(unused.file_path.clone()),
            ));
        }

        for missing in &self.missing_imports {
            issues.push(Issue::new(
                FindingKind::MissingImport,
                format!(
                    "'{}' is used without importing {}",
                    missing.symbol, missing.suggested_import
                ),
                Some(missing.file_path.clone()),
            ));
        }

        for violation in &self.architectural_violations {
            issues.push(Issue::new(
                FindingKind::ArchitecturalViolation,
                violation.description.clone(),
                Some(violation.file_path.clone()),
            ));
        }

        for circular in &self.circular_dependencies {
            issues.push(Issue::new(
                FindingKind::CircularDependency,
                format!("Circular dependency between {}", circular.cycle.join(" <-> ")),
                None,
            ));
        }

        issues
    }
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

/// A problem with network or webhook configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfigIssue {
    /// File the problem was found in, if any
    pub file_path: Option<PathBuf>,

    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfigResult {
    pub issues: Vec<NetworkConfigIssue>,
}

impl NetworkConfigResult {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Which required API endpoints are referenced by the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpointResult {
    pub valid_endpoints: Vec<String>,
    pub missing_endpoints: Vec<String>,
}

/// Outcome of a webhook connectivity test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityResult {
    /// Whether the endpoint accepted a connection
    pub is_connected: bool,

    /// Time until the endpoint answered
    pub response_time: Option<Duration>,

    /// HTTP status of the answer, when there was one
    #[serde(default)]
    pub status_code: Option<u16>,

    /// What went wrong, if anything
    pub error_message: Option<String>,
}

impl ConnectivityResult {
    /// A successful connection after `elapsed`
    pub fn connected(status: u16, elapsed: Duration) -> Self {
        Self {
            is_connected: true,
            response_time: Some(elapsed),
            status_code: Some(status),
            error_message: None,
        }
    }

    /// The endpoint answered, but not with a 2xx status
    pub fn rejected(status: u16, status_text: &str, elapsed: Duration) -> Self {
        Self {
            is_connected: false,
            response_time: Some(elapsed),
            status_code: Some(status),
            error_message: Some(format!("HTTP {} {}", status, status_text).trim_end().to_string()),
        }
    }

    /// A failed connection
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_connected: false,
            response_time: None,
            status_code: None,
            error_message: Some(message.into()),
        }
    }

    /// The test did not finish within its time budget
    pub fn timeout() -> Self {
        Self::failed("timeout")
    }
}

/// A network model class that cannot be (de)serialized reliably
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializationIssue {
    pub file_path: PathBuf,
    pub class_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSerializationResult {
    pub issues: Vec<SerializationIssue>,

    /// Number of network model classes inspected
    pub checked_classes: usize,
}

/// Aggregate result of the webhook validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookValidationResult {
    pub network_config: NetworkConfigResult,
    pub api_endpoints: ApiEndpointResult,

    /// `None` when no endpoint was available to test
    pub connectivity: Option<ConnectivityResult>,

    pub json_serialization: JsonSerializationResult,
}

impl WebhookValidationResult {
    /// Result used when the whole webhook family exceeded its time budget
    pub fn timed_out() -> Self {
        Self {
            connectivity: Some(ConnectivityResult::timeout()),
            ..Self::default()
        }
    }
}

impl Findings for WebhookValidationResult {
    fn issues(&self) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .network_config
            .issues
            .iter()
            .map(|issue| {
                Issue::new(
                    FindingKind::NetworkConfiguration,
                    issue.description.clone(),
                    issue.file_path.clone(),
                )
            })
            .collect();

        for endpoint in &self.api_endpoints.missing_endpoints {
            issues.push(Issue::new(
                FindingKind::MissingEndpoint,
                format!("Required endpoint '{}' is not referenced", endpoint),
                None,
            ));
        }

        if let Some(connectivity) = &self.connectivity {
            if !connectivity.is_connected {
                let reason = connectivity
                    .error_message
                    .as_deref()
                    .unwrap_or("unknown error");
                issues.push(Issue::new(
                    FindingKind::ConnectivityFailure,
                    format!("Webhook connectivity test failed: {}", reason),
                    None,
                ));
            }
        }

        for issue in &self.json_serialization.issues {
            issues.push(Issue::new(
                FindingKind::JsonSerialization,
                format!("{}: {}", issue.class_name, issue.description),
                Some(issue.file_path.clone()),
            ));
        }

        issues
    }
}

// ---------------------------------------------------------------------------
// UI data flow
// ---------------------------------------------------------------------------

/// Mutable state leaking out of a ViewModel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFlowIssue {
    pub file_path: PathBuf,
    pub view_model: String,
    pub property: String,
    pub description: String,
}

/// State that is exposed but never bound by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBindingIssue {
    pub file_path: PathBuf,
    pub property: String,
    pub description: String,
}

/// Work that is not tied to the right lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleIssue {
    pub file_path: PathBuf,
    pub description: String,
}

/// Aggregate result of the UI data flow validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModelValidationResult {
    pub state_flow_issues: Vec<StateFlowIssue>,
    pub data_binding_issues: Vec<DataBindingIssue>,
    pub lifecycle_issues: Vec<LifecycleIssue>,
}

/// Result of inspecting UI components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiComponentResult {
    pub issues: Vec<String>,
    pub valid_count: usize,
    pub total_count: usize,
}

impl Findings for ViewModelValidationResult {
    fn issues(&self) -> Vec<Issue> {
        let state = self.state_flow_issues.iter().map(|issue| {
            Issue::new(
                FindingKind::StateFlow,
                format!("{}.{}: {}", issue.view_model, issue.property, issue.description),
                Some(issue.file_path.clone()),
            )
        });

        let binding = self.data_binding_issues.iter().map(|issue| {
            Issue::new(
                FindingKind::DataBinding,
                format!("{}: {}", issue.property, issue.description),
                Some(issue.file_path.clone()),
            )
        });

        let lifecycle = self.lifecycle_issues.iter().map(|issue| {
            Issue::new(
                FindingKind::Lifecycle,
                issue.description.clone(),
                Some(issue.file_path.clone()),
            )
        });

        state.chain(binding).chain(lifecycle).collect()
    }
}

// ---------------------------------------------------------------------------
// Dependency injection
// ---------------------------------------------------------------------------

/// A misconfigured Hilt module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleIssue {
    pub file_path: PathBuf,
    pub module_name: String,
    pub description: String,
}

/// Kind of binding problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum BindingIssueKind {
    /// The bound implementation does not exist
    MissingImplementation,

    /// The same type is bound more than once
    DuplicateBinding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingIssue {
    pub file_path: PathBuf,

    /// The bound type
    pub binding: String,

    pub kind: BindingIssueKind,
    pub description: String,
}

/// A scope annotation used in a component that does not own it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeIssue {
    pub file_path: PathBuf,
    pub component: String,
    pub scope: String,
    pub description: String,
}

/// Aggregate result of the dependency injection validator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiltValidationResult {
    pub module_issues: Vec<ModuleIssue>,
    pub binding_issues: Vec<BindingIssue>,
    pub scope_issues: Vec<ScopeIssue>,
}

/// Shape of the injection graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraphResult {
    pub circular_deps: Vec<String>,
    pub missing_deps: Vec<String>,
    pub is_valid: bool,
}

impl Findings for HiltValidationResult {
    fn issues(&self) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .module_issues
            .iter()
            .map(|issue| {
                Issue::new(
                    FindingKind::ModuleConfiguration,
                    format!("{}: {}", issue.module_name, issue.description),
                    Some(issue.file_path.clone()),
                )
            })
            .collect();

        for issue in &self.binding_issues {
            let kind = match issue.kind {
                BindingIssueKind::MissingImplementation => FindingKind::MissingBinding,
                BindingIssueKind::DuplicateBinding => FindingKind::DuplicateBinding,
            };
            issues.push(Issue::new(
                kind,
                format!("{}: {}", issue.binding, issue.description),
                Some(issue.file_path.clone()),
            ));
        }

        for issue in &self.scope_issues {
            issues.push(Issue::new(
                FindingKind::ScopeMismatch,
                format!("@{} in {}: {}", issue.scope, issue.component, issue.description),
                Some(issue.file_path.clone()),
            ));
        }

        issues
    }
}
