use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};
use tempfile::TempDir;

use warden::config::WardenConfig;
use warden::errors::{OrchestrationError, WardenError};
use warden::models::{
    Category, HiltValidationResult, ImportValidationResult, Severity, ValidationResult,
    ViewModelValidationResult, WebhookValidationResult,
};
use warden::orchestrator::{OrchestratorState, ValidationOrchestrator};
use warden::validators::ValidatorRegistry;

#[path = "mocks/mod.rs"]
mod mocks;

use mocks::{
    clean_registry, layer_violation, state_flow_issue, unused_import, Behavior,
    MockDiValidator, MockImportValidator, MockUiDataFlowValidator, MockWebhookValidator,
};

fn project() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

#[tokio::test]
async fn test_clean_validators_score_100() {
    let dir = project();
    let orchestrator = ValidationOrchestrator::new(clean_registry(), WardenConfig::default());
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);

    let report = orchestrator
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("validation should succeed");

    let summary = report.summary();
    assert_eq!(summary.score, 100);
    assert_eq!(summary.total_issues, 0);
    assert_eq!(summary.critical_issues, 0);
    assert_eq!(summary.categories.len(), 4);
    assert!(summary.categories.values().all(|c| c.score == 100));
    assert!(report.recommendations().is_empty());
    assert_eq!(report.project_path(), dir.path());
    assert_eq!(orchestrator.state(), OrchestratorState::Completed);
}

#[tokio::test]
async fn test_unused_import_and_violation_score_89() {
    let dir = project();
    let imports = ImportValidationResult {
        unused_imports: vec![unused_import("domain/GetUser.kt")],
        architectural_violations: vec![layer_violation("domain/GetUser.kt")],
        ..Default::default()
    };
    let registry = clean_registry()
        .with_import_validator(MockImportValidator::new(Behavior::Return(imports)));
    let orchestrator = ValidationOrchestrator::new(registry, WardenConfig::default());

    let report = orchestrator
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("validation should succeed");

    let summary = report.summary();
    let category = summary.categories["imports"];
    assert_eq!(category.score, 89);
    assert_eq!(category.critical_issues, 1);
    assert_eq!(category.info_issues, 1);
    assert_eq!(summary.score, 89);
    assert_eq!(summary.total_issues, 2);
    assert!(report.recommendations().is_empty());

    // Issues keep the order of the typed findings
    let severities: Vec<Severity> = report.imports().issues().iter().map(|i| i.severity).collect();
    assert_eq!(severities, vec![Severity::Info, Severity::Critical]);
}

#[tokio::test]
async fn test_failing_family_does_not_block_the_others() {
    let dir = project();
    let imports = ImportValidationResult {
        unused_imports: vec![unused_import("ui/Screen.kt")],
        ..Default::default()
    };
    let registry = clean_registry()
        .with_import_validator(MockImportValidator::new(Behavior::Return(imports)))
        .with_webhook_validator(MockWebhookValidator::new(Behavior::Fail(
            "connection refused".to_string(),
        )));
    let orchestrator = ValidationOrchestrator::new(registry, WardenConfig::default());

    let report = orchestrator
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("a failing validator must not fail the run");

    // Webhook failure is folded into its own diagnostics
    let webhook = report.webhook();
    assert_eq!(webhook.findings(), &WebhookValidationResult::default());
    assert_eq!(webhook.diagnostics().len(), 1);
    match &webhook.diagnostics()[0] {
        ValidationResult::Error {
            message, details, ..
        } => {
            assert_eq!(message, "Network Configuration Issue: webhook validation failed");
            assert!(details.contains("connection refused"));
        }
        other => panic!("expected an error result, got {:?}", other),
    }

    // Other families still contribute
    assert_eq!(report.imports().issues().len(), 1);
    assert!(report.imports().diagnostics().is_empty());

    let summary = report.summary();
    assert_eq!(summary.categories["webhook"].critical_issues, 1);
    assert_eq!(summary.categories["webhook"].score, 90);
    assert_eq!(summary.categories["imports"].score, 99);
    assert_eq!(summary.score, 89);
    assert_eq!(orchestrator.state(), OrchestratorState::Completed);
}

#[tokio::test]
async fn test_panicking_validator_is_folded() {
    let dir = project();
    let registry = clean_registry().with_di_validator(MockDiValidator::new(Behavior::Panic));
    let orchestrator = ValidationOrchestrator::new(registry, WardenConfig::default());

    let report = orchestrator
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("a panicking validator must not fail the run");

    let di = report.dependency_injection();
    assert_eq!(di.findings(), &HiltValidationResult::default());
    assert_eq!(di.diagnostics().len(), 1);
    assert_eq!(
        di.diagnostics()[0].message(),
        "DI Configuration Issue: dependency_injection validation failed"
    );
    assert_eq!(report.summary().categories["dependency_injection"].score, 90);
}

#[tokio::test]
async fn test_unregistered_family_is_reported() {
    let dir = project();
    let registry = ValidatorRegistry::new()
        .with_import_validator(MockImportValidator::clean())
        .with_webhook_validator(MockWebhookValidator::clean())
        .with_di_validator(MockDiValidator::clean());
    let orchestrator = ValidationOrchestrator::new(registry, WardenConfig::default());

    let report = orchestrator
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("validation should succeed");

    let ui = report.ui_data_flow();
    assert_eq!(ui.validator_name(), "unregistered");
    assert_eq!(ui.diagnostics().len(), 1);
    assert!(ui.diagnostics()[0].is_error());
    assert_eq!(report.summary().categories["ui_data_flow"].critical_issues, 1);
}

#[tokio::test]
async fn test_webhook_family_timeout_marks_connectivity() {
    let dir = project();
    let mut config = WardenConfig::default();
    config.webhook.timeout_ms = 20;
    config.webhook.family_timeout_ms = 50;

    let registry = clean_registry().with_webhook_validator(MockWebhookValidator::new(
        Behavior::Slow(Duration::from_millis(500)),
    ));
    let orchestrator = ValidationOrchestrator::new(registry, config);

    let report = orchestrator
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("a timed out family must not fail the run");

    let webhook = report.webhook();
    let connectivity = webhook
        .findings()
        .connectivity
        .as_ref()
        .expect("timed out run reports connectivity");
    assert!(!connectivity.is_connected);
    assert_eq!(connectivity.error_message.as_deref(), Some("timeout"));
    assert!(webhook.diagnostics().is_empty());
    assert_eq!(report.summary().categories["webhook"].critical_issues, 1);
}

#[test]
fn test_timed_out_webhook_does_not_block_runtime_shutdown() {
    let dir = project();
    let mut config = WardenConfig::default();
    config.webhook.timeout_ms = 20;
    config.webhook.family_timeout_ms = 50;

    let registry = clean_registry().with_webhook_validator(MockWebhookValidator::new(
        Behavior::Slow(Duration::from_secs(3)),
    ));
    let orchestrator = ValidationOrchestrator::new(registry, config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");
    let report = runtime
        .block_on(orchestrator.execute_comprehensive_validation(dir.path()))
        .expect("a timed out family must not fail the run");
    assert_eq!(report.summary().categories["webhook"].critical_issues, 1);

    let start = Instant::now();
    drop(runtime);
    assert!(
        start.elapsed() < Duration::from_secs(1),
        "runtime shutdown waited {:?} for the stalled validator",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_panicking_webhook_validator_is_folded() {
    let dir = project();
    let registry = clean_registry().with_webhook_validator(MockWebhookValidator::new(Behavior::Panic));
    let orchestrator = ValidationOrchestrator::new(registry, WardenConfig::default());

    let report = orchestrator
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("a panicking validator must not fail the run");

    let webhook = report.webhook();
    assert_eq!(webhook.findings(), &WebhookValidationResult::default());
    assert_eq!(webhook.diagnostics().len(), 1);
    assert_eq!(
        webhook.diagnostics()[0].message(),
        "Network Configuration Issue: webhook validation failed"
    );
}

#[tokio::test]
async fn test_sequential_and_parallel_runs_agree() {
    let dir = project();
    let ui = ViewModelValidationResult {
        state_flow_issues: vec![state_flow_issue("_state"), state_flow_issue("_events")],
        ..Default::default()
    };
    let registry = clean_registry()
        .with_ui_data_flow_validator(MockUiDataFlowValidator::new(Behavior::Return(ui)));

    let parallel = ValidationOrchestrator::new(registry.clone(), WardenConfig::default())
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("parallel run");

    let mut config = WardenConfig::default();
    config.general.parallel = false;
    let sequential = ValidationOrchestrator::new(registry, config)
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("sequential run");

    assert_eq!(parallel.summary(), sequential.summary());
    assert_eq!(parallel.recommendations(), sequential.recommendations());
    assert_eq!(parallel.summary().categories["ui_data_flow"].score, 94);
}

#[tokio::test]
async fn test_invalid_project_path_is_an_error() {
    let dir = project();
    let missing = dir.path().join("does-not-exist");
    let orchestrator = ValidationOrchestrator::new(clean_registry(), WardenConfig::default());

    let result = orchestrator.execute_comprehensive_validation(&missing).await;

    assert!(matches!(
        result,
        Err(WardenError::Orchestration(OrchestrationError::InvalidProjectPath(ref path))) if *path == missing
    ));
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[test]
fn test_system_status_lists_validators() {
    let orchestrator = ValidationOrchestrator::new(clean_registry(), WardenConfig::default());

    let status = orchestrator.get_system_status();

    assert!(status.is_initialized);
    assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    let categories: Vec<Category> = status
        .available_validators
        .iter()
        .map(|info| info.category)
        .collect();
    assert_eq!(
        categories,
        vec![
            Category::DependencyInjection,
            Category::Imports,
            Category::UiDataFlow,
            Category::Webhook,
        ]
    );
}

#[test]
fn test_incomplete_registry_is_not_initialized() {
    let registry = ValidatorRegistry::new().with_import_validator(MockImportValidator::clean());
    let orchestrator = ValidationOrchestrator::new(registry, WardenConfig::default());

    let status = orchestrator.get_system_status();

    assert!(!status.is_initialized);
    assert_eq!(status.available_validators.len(), 1);
    assert_eq!(status.available_validators[0].name, "mock-imports");
}
