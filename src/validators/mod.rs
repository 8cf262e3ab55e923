//! Validator contracts and the registry that hands them to the orchestrator

use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;

use crate::config::WardenConfig;
use crate::error_handler::ErrorHandler;
use crate::errors::ValidatorError;
use crate::models::{
    ApiEndpointResult, ArchitecturalViolation, BindingIssue, Category, CircularDependency,
    ConnectivityResult, DataBindingIssue, DependencyGraphResult, Findings, HiltValidationResult,
    ImportValidationResult, JsonSerializationResult, MissingImport, NetworkConfigResult,
    ScopeIssue, StateFlowIssue, UiComponentResult, UnusedImport, ValidationError,
    ValidationResult, ViewModelValidationResult, WebhookValidationResult,
};

mod di;
mod imports;
mod ui_data_flow;
mod webhook;

pub use di::FsDiValidator;
pub use imports::FsImportValidator;
pub use ui_data_flow::FsUiDataFlowValidator;
pub use webhook::FsWebhookValidator;

/// Base capabilities shared by every validator
///
/// Implementations MUST follow these guidelines:
/// 1. Never modify the inspected project
/// 2. Either complete or fail; partial results are not valid return values
/// 3. Return an empty collection when nothing was found, which is distinct from failing
pub trait Validator: Send + Sync {
    /// Run the validator and project its findings onto [`ValidationResult`]s
    fn validate(&self, project: &Path) -> Vec<ValidationResult>;

    /// Get the validator name
    fn validator_name(&self) -> &str;

    /// Get the category this validator reports under
    fn category(&self) -> &str;
}

/// Import and package dependency inspection
pub trait ImportValidator: Validator {
    /// Run every import check over the project
    fn validate_imports(&self, project: &Path) -> Result<ImportValidationResult, ValidatorError>;

    fn find_unused_imports(&self, file: &Path) -> Result<Vec<UnusedImport>, ValidatorError>;

    fn find_missing_imports(&self, file: &Path) -> Result<Vec<MissingImport>, ValidatorError>;

    /// Check a single file against the layer rules
    fn validate_architectural_dependencies(
        &self,
        file: &Path,
    ) -> Result<Vec<ArchitecturalViolation>, ValidatorError>;

    fn detect_circular_dependencies(
        &self,
        project: &Path,
    ) -> Result<Vec<CircularDependency>, ValidatorError>;
}

/// Webhook service and network configuration inspection
pub trait WebhookValidator: Validator {
    /// Run every webhook check over the project
    fn validate_make_service(&self, project: &Path)
        -> Result<WebhookValidationResult, ValidatorError>;

    fn validate_network_configuration(
        &self,
        project: &Path,
    ) -> Result<NetworkConfigResult, ValidatorError>;

    fn validate_api_endpoints(&self, project: &Path) -> Result<ApiEndpointResult, ValidatorError>;

    /// Test connectivity to the webhook.
    ///
    /// Must give up after `timeout` and report the elapsed time on success.
    /// Returns `None` when there is no endpoint to test.
    fn test_webhook_connectivity(
        &self,
        timeout: Duration,
    ) -> Result<Option<ConnectivityResult>, ValidatorError>;

    fn validate_json_serialization(
        &self,
        project: &Path,
    ) -> Result<JsonSerializationResult, ValidatorError>;

    /// Describe network calls that lack error handling
    fn validate_error_handling(&self, project: &Path) -> Result<Vec<String>, ValidatorError>;
}

/// ViewModel and UI state flow inspection
pub trait UiDataFlowValidator: Validator {
    /// Run every ViewModel check over the project
    fn validate_view_models(
        &self,
        project: &Path,
    ) -> Result<ViewModelValidationResult, ValidatorError>;

    fn validate_data_binding(&self, project: &Path)
        -> Result<Vec<DataBindingIssue>, ValidatorError>;

    fn validate_state_management(
        &self,
        project: &Path,
    ) -> Result<Vec<StateFlowIssue>, ValidatorError>;

    fn validate_ui_components(&self, project: &Path) -> Result<UiComponentResult, ValidatorError>;

    fn validate_data_mappers(&self, project: &Path) -> Result<Vec<String>, ValidatorError>;
}

/// Dependency injection (Hilt) inspection
pub trait DiValidator: Validator {
    /// Run every module, binding and scope check over the project
    fn validate_hilt_modules(&self, project: &Path)
        -> Result<HiltValidationResult, ValidatorError>;

    fn validate_dependency_graph(
        &self,
        project: &Path,
    ) -> Result<DependencyGraphResult, ValidatorError>;

    fn validate_scopes(&self, project: &Path) -> Result<Vec<ScopeIssue>, ValidatorError>;

    fn validate_bindings(&self, project: &Path) -> Result<Vec<BindingIssue>, ValidatorError>;

    fn detect_circular_dependencies(&self, project: &Path) -> Result<Vec<String>, ValidatorError>;
}

/// Project an aggregate outcome onto coarse [`ValidationResult`]s.
///
/// Every issue goes through the [`ErrorHandler`] mapping; a clean outcome
/// yields a single success and a failure yields the mapped failure.
pub fn project_results<T: Findings>(
    outcome: Result<T, ValidatorError>,
    category: Category,
    validator_name: &str,
) -> Vec<ValidationResult> {
    let handler = ErrorHandler::new();

    match outcome {
        Ok(findings) => {
            let issues = findings.issues();
            if issues.is_empty() {
                return vec![ValidationResult::Success {
                    message: format!("{}: no {} issues found", validator_name, category),
                }];
            }

            let errors: Vec<ValidationError> = issues
                .into_iter()
                .map(|issue| {
                    let details = issue
                        .file
                        .as_ref()
                        .map(|file| format!("in {}", file.display()))
                        .unwrap_or_default();
                    ValidationError::new(issue.kind.error_kind(), issue.message, details)
                })
                .collect();

            handler.handle_validation_errors(&errors)
        }
        Err(err) => {
            let context = format!("{} failed", validator_name);
            let error = handler.create_validation_error(&err, category.failure_kind(), &context);
            vec![handler.handle_validation_error(&error)]
        }
    }
}

/// Validator information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorInfo {
    /// Validator name
    pub name: String,

    /// Category the validator reports under
    pub category: Category,
}

/// Registry of the four validator families
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    imports: Option<Arc<dyn ImportValidator>>,
    webhook: Option<Arc<dyn WebhookValidator>>,
    ui_data_flow: Option<Arc<dyn UiDataFlowValidator>>,
    dependency_injection: Option<Arc<dyn DiValidator>>,
}

impl ValidatorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the file-system validators for every family
    pub fn with_default_validators(config: &WardenConfig) -> Self {
        let mut registry = Self::new();
        registry.register_import_validator(Arc::new(FsImportValidator::new(config)));
        registry.register_webhook_validator(Arc::new(FsWebhookValidator::new(config)));
        registry.register_ui_data_flow_validator(Arc::new(FsUiDataFlowValidator::new(config)));
        registry.register_di_validator(Arc::new(FsDiValidator::new(config)));
        registry
    }

    /// Register the import validator, replacing any previous one
    pub fn register_import_validator(&mut self, validator: Arc<dyn ImportValidator>) {
        debug!("Registering import validator: {}", validator.validator_name());
        self.imports = Some(validator);
    }

    pub fn register_webhook_validator(&mut self, validator: Arc<dyn WebhookValidator>) {
        debug!("Registering webhook validator: {}", validator.validator_name());
        self.webhook = Some(validator);
    }

    pub fn register_ui_data_flow_validator(&mut self, validator: Arc<dyn UiDataFlowValidator>) {
        debug!("Registering UI data flow validator: {}", validator.validator_name());
        self.ui_data_flow = Some(validator);
    }

    pub fn register_di_validator(&mut self, validator: Arc<dyn DiValidator>) {
        debug!("Registering DI validator: {}", validator.validator_name());
        self.dependency_injection = Some(validator);
    }

    /// Builder-style [`Self::register_import_validator`]
    pub fn with_import_validator(mut self, validator: Arc<dyn ImportValidator>) -> Self {
        self.register_import_validator(validator);
        self
    }

    pub fn with_webhook_validator(mut self, validator: Arc<dyn WebhookValidator>) -> Self {
        self.register_webhook_validator(validator);
        self
    }

    pub fn with_ui_data_flow_validator(mut self, validator: Arc<dyn UiDataFlowValidator>) -> Self {
        self.register_ui_data_flow_validator(validator);
        self
    }

    pub fn with_di_validator(mut self, validator: Arc<dyn DiValidator>) -> Self {
        self.register_di_validator(validator);
        self
    }

    pub fn import_validator(&self) -> Option<Arc<dyn ImportValidator>> {
        self.imports.clone()
    }

    pub fn webhook_validator(&self) -> Option<Arc<dyn WebhookValidator>> {
        self.webhook.clone()
    }

    pub fn ui_data_flow_validator(&self) -> Option<Arc<dyn UiDataFlowValidator>> {
        self.ui_data_flow.clone()
    }

    pub fn di_validator(&self) -> Option<Arc<dyn DiValidator>> {
        self.dependency_injection.clone()
    }

    /// Whether every family has a validator
    pub fn is_complete(&self) -> bool {
        self.imports.is_some()
            && self.webhook.is_some()
            && self.ui_data_flow.is_some()
            && self.dependency_injection.is_some()
    }

    /// Name of the validator registered for a family
    pub fn validator_name(&self, category: Category) -> Option<String> {
        match category {
            Category::Imports => self.imports.as_ref().map(|v| v.validator_name().to_string()),
            Category::Webhook => self.webhook.as_ref().map(|v| v.validator_name().to_string()),
            Category::UiDataFlow => self
                .ui_data_flow
                .as_ref()
                .map(|v| v.validator_name().to_string()),
            Category::DependencyInjection => self
                .dependency_injection
                .as_ref()
                .map(|v| v.validator_name().to_string()),
        }
    }

    /// Get info for all registered validators, sorted by category name
    pub fn get_validator_info(&self) -> Vec<ValidatorInfo> {
        let mut info: Vec<ValidatorInfo> = Category::iter()
            .filter_map(|category| {
                self.validator_name(category)
                    .map(|name| ValidatorInfo { name, category })
            })
            .collect();

        info.sort_by(|a, b| a.category.name().cmp(b.category.name()));
        info
    }
}
