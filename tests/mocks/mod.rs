//! Hand-rolled validator mocks shared by the integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use warden::errors::ValidatorError;
use warden::models::{
    ApiEndpointResult, ArchitecturalViolation, BindingIssue, BindingIssueKind, Category,
    CircularDependency, ConnectivityResult, DataBindingIssue, DependencyGraphResult,
    HiltValidationResult, ImportValidationResult, JsonSerializationResult, MissingImport,
    NetworkConfigResult, ScopeIssue, StateFlowIssue, UiComponentResult, UnusedImport,
    ValidationResult, ViewModelValidationResult, ViolationKind, WebhookValidationResult,
};
use warden::validators::{
    project_results, DiValidator, ImportValidator, UiDataFlowValidator, Validator,
    ValidatorRegistry, WebhookValidator,
};

/// How a mock answers its aggregate method
#[derive(Debug, Clone)]
pub enum Behavior<T> {
    /// Return these findings
    Return(T),

    /// Fail with a scan error carrying this message
    Fail(String),

    /// Panic inside the validator
    Panic,

    /// Sleep, then return empty findings
    Slow(Duration),
}

impl<T: Clone + Default> Behavior<T> {
    fn run(&self) -> Result<T, ValidatorError> {
        match self {
            Behavior::Return(findings) => Ok(findings.clone()),
            Behavior::Fail(message) => Err(ValidatorError::Scan {
                path: PathBuf::from("mock"),
                message: message.clone(),
            }),
            Behavior::Panic => panic!("mock validator panicked"),
            Behavior::Slow(delay) => {
                thread::sleep(*delay);
                Ok(T::default())
            }
        }
    }
}

impl<T: Default> Default for Behavior<T> {
    fn default() -> Self {
        Behavior::Return(T::default())
    }
}

pub struct MockImportValidator {
    pub behavior: Behavior<ImportValidationResult>,
}

impl MockImportValidator {
    pub fn new(behavior: Behavior<ImportValidationResult>) -> Arc<Self> {
        Arc::new(Self { behavior })
    }

    pub fn clean() -> Arc<Self> {
        Self::new(Behavior::default())
    }
}

impl Validator for MockImportValidator {
    fn validate(&self, project: &Path) -> Vec<ValidationResult> {
        project_results(self.validate_imports(project), Category::Imports, self.validator_name())
    }

    fn validator_name(&self) -> &str {
        "mock-imports"
    }

    fn category(&self) -> &str {
        Category::Imports.name()
    }
}

impl ImportValidator for MockImportValidator {
    fn validate_imports(&self, _project: &Path) -> Result<ImportValidationResult, ValidatorError> {
        self.behavior.run()
    }

    fn find_unused_imports(&self, _file: &Path) -> Result<Vec<UnusedImport>, ValidatorError> {
        Ok(self.behavior.run()?.unused_imports)
    }

    fn find_missing_imports(&self, _file: &Path) -> Result<Vec<MissingImport>, ValidatorError> {
        Ok(self.behavior.run()?.missing_imports)
    }

    fn validate_architectural_dependencies(
        &self,
        _file: &Path,
    ) -> Result<Vec<ArchitecturalViolation>, ValidatorError> {
        Ok(self.behavior.run()?.architectural_violations)
    }

    fn detect_circular_dependencies(
        &self,
        _project: &Path,
    ) -> Result<Vec<CircularDependency>, ValidatorError> {
        Ok(self.behavior.run()?.circular_dependencies)
    }
}

pub struct MockWebhookValidator {
    pub behavior: Behavior<WebhookValidationResult>,
}

impl MockWebhookValidator {
    pub fn new(behavior: Behavior<WebhookValidationResult>) -> Arc<Self> {
        Arc::new(Self { behavior })
    }

    pub fn clean() -> Arc<Self> {
        Self::new(Behavior::default())
    }
}

impl Validator for MockWebhookValidator {
    fn validate(&self, project: &Path) -> Vec<ValidationResult> {
        project_results(
            self.validate_make_service(project),
            Category::Webhook,
            self.validator_name(),
        )
    }

    fn validator_name(&self) -> &str {
        "mock-webhook"
    }

    fn category(&self) -> &str {
        Category::Webhook.name()
    }
}

impl WebhookValidator for MockWebhookValidator {
    fn validate_make_service(
        &self,
        _project: &Path,
    ) -> Result<WebhookValidationResult, ValidatorError> {
        self.behavior.run()
    }

    fn validate_network_configuration(
        &self,
        _project: &Path,
    ) -> Result<NetworkConfigResult, ValidatorError> {
        Ok(self.behavior.run()?.network_config)
    }

    fn validate_api_endpoints(&self, _project: &Path) -> Result<ApiEndpointResult, ValidatorError> {
        Ok(self.behavior.run()?.api_endpoints)
    }

    fn test_webhook_connectivity(
        &self,
        _timeout: Duration,
    ) -> Result<Option<ConnectivityResult>, ValidatorError> {
        Ok(self.behavior.run()?.connectivity)
    }

    fn validate_json_serialization(
        &self,
        _project: &Path,
    ) -> Result<JsonSerializationResult, ValidatorError> {
        Ok(self.behavior.run()?.json_serialization)
    }

    fn validate_error_handling(&self, _project: &Path) -> Result<Vec<String>, ValidatorError> {
        self.behavior.run().map(|_| Vec::new())
    }
}

pub struct MockUiDataFlowValidator {
    pub behavior: Behavior<ViewModelValidationResult>,
}

impl MockUiDataFlowValidator {
    pub fn new(behavior: Behavior<ViewModelValidationResult>) -> Arc<Self> {
        Arc::new(Self { behavior })
    }

    pub fn clean() -> Arc<Self> {
        Self::new(Behavior::default())
    }
}

impl Validator for MockUiDataFlowValidator {
    fn validate(&self, project: &Path) -> Vec<ValidationResult> {
        project_results(
            self.validate_view_models(project),
            Category::UiDataFlow,
            self.validator_name(),
        )
    }

    fn validator_name(&self) -> &str {
        "mock-ui-data-flow"
    }

    fn category(&self) -> &str {
        Category::UiDataFlow.name()
    }
}

impl UiDataFlowValidator for MockUiDataFlowValidator {
    fn validate_view_models(
        &self,
        _project: &Path,
    ) -> Result<ViewModelValidationResult, ValidatorError> {
        self.behavior.run()
    }

    fn validate_data_binding(
        &self,
        _project: &Path,
    ) -> Result<Vec<DataBindingIssue>, ValidatorError> {
        Ok(self.behavior.run()?.data_binding_issues)
    }

    fn validate_state_management(
        &self,
        _project: &Path,
    ) -> Result<Vec<StateFlowIssue>, ValidatorError> {
        Ok(self.behavior.run()?.state_flow_issues)
    }

    fn validate_ui_components(&self, _project: &Path) -> Result<UiComponentResult, ValidatorError> {
        self.behavior.run().map(|_| UiComponentResult::default())
    }

    fn validate_data_mappers(&self, _project: &Path) -> Result<Vec<String>, ValidatorError> {
        self.behavior.run().map(|_| Vec::new())
    }
}

pub struct MockDiValidator {
    pub behavior: Behavior<HiltValidationResult>,
}

impl MockDiValidator {
    pub fn new(behavior: Behavior<HiltValidationResult>) -> Arc<Self> {
        Arc::new(Self { behavior })
    }

    pub fn clean() -> Arc<Self> {
        Self::new(Behavior::default())
    }
}

impl Validator for MockDiValidator {
    fn validate(&self, project: &Path) -> Vec<ValidationResult> {
        project_results(
            self.validate_hilt_modules(project),
            Category::DependencyInjection,
            self.validator_name(),
        )
    }

    fn validator_name(&self) -> &str {
        "mock-di"
    }

    fn category(&self) -> &str {
        Category::DependencyInjection.name()
    }
}

impl DiValidator for MockDiValidator {
    fn validate_hilt_modules(
        &self,
        _project: &Path,
    ) -> Result<HiltValidationResult, ValidatorError> {
        self.behavior.run()
    }

    fn validate_dependency_graph(
        &self,
        _project: &Path,
    ) -> Result<DependencyGraphResult, ValidatorError> {
        self.behavior.run().map(|_| DependencyGraphResult {
            is_valid: true,
            ..Default::default()
        })
    }

    fn validate_scopes(&self, _project: &Path) -> Result<Vec<ScopeIssue>, ValidatorError> {
        Ok(self.behavior.run()?.scope_issues)
    }

    fn validate_bindings(&self, _project: &Path) -> Result<Vec<BindingIssue>, ValidatorError> {
        Ok(self.behavior.run()?.binding_issues)
    }

    fn detect_circular_dependencies(&self, _project: &Path) -> Result<Vec<String>, ValidatorError> {
        self.behavior.run().map(|_| Vec::new())
    }
}

/// Registry with a clean mock for every family
pub fn clean_registry() -> ValidatorRegistry {
    ValidatorRegistry::new()
        .with_import_validator(MockImportValidator::clean())
        .with_webhook_validator(MockWebhookValidator::clean())
        .with_ui_data_flow_validator(MockUiDataFlowValidator::clean())
        .with_di_validator(MockDiValidator::clean())
}

pub fn unused_import(file: &str) -> UnusedImport {
    UnusedImport {
        file_path: PathBuf::from(file),
        import_statement: "import java.util.Date".to_string(),
        line_number: 3,
    }
}

pub fn layer_violation(file: &str) -> ArchitecturalViolation {
    ArchitecturalViolation {
        file_path: PathBuf::from(file),
        violation_type: ViolationKind::LayerDependency,
        description: "domain layer depends on data layer via 'com.example.data.UserDao'"
            .to_string(),
        suggestion: "Depend on an abstraction owned by the domain layer".to_string(),
    }
}

pub fn state_flow_issue(property: &str) -> StateFlowIssue {
    StateFlowIssue {
        file_path: PathBuf::from("ui/HomeViewModel.kt"),
        view_model: "HomeViewModel".to_string(),
        property: property.to_string(),
        description: "Mutable state is exposed publicly".to_string(),
    }
}

pub fn missing_binding(bound: &str) -> BindingIssue {
    BindingIssue {
        file_path: PathBuf::from("di/RepositoryModule.kt"),
        binding: bound.to_string(),
        kind: BindingIssueKind::MissingImplementation,
        description: format!("Bound implementation {}Impl is not declared", bound),
    }
}
