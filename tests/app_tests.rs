use std::fs;
use std::path::Path;
use tempfile::TempDir;

use warden::app::WardenApp;
use warden::cli::{InitArgs, ValidateArgs, Verbosity};
use warden::config::{ConfigProvider, WardenConfig};
use warden::errors::{ConfigError, WardenError};
use warden::models::ImportValidationResult;
use warden::output::ReportFormat;

#[path = "mocks/mod.rs"]
mod mocks;

use mocks::{clean_registry, layer_violation, Behavior, MockImportValidator};

/// Config provider returning a fixed configuration
struct StaticConfigProvider(WardenConfig);

impl ConfigProvider for StaticConfigProvider {
    fn load_config(&self, _base_dir: &Path) -> Result<WardenConfig, ConfigError> {
        Ok(self.0.clone())
    }
}

/// Config provider that always fails
struct BrokenConfigProvider;

impl ConfigProvider for BrokenConfigProvider {
    fn load_config(&self, base_dir: &Path) -> Result<WardenConfig, ConfigError> {
        Err(ConfigError::LoadError {
            path: base_dir.join(".warden.toml"),
            message: "broken".to_string(),
        })
    }
}

fn quiet_app(config: WardenConfig) -> WardenApp<StaticConfigProvider> {
    WardenApp::new(StaticConfigProvider(config)).with_verbosity(Verbosity::Quiet)
}

#[tokio::test]
async fn test_validate_writes_json_report() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let output = dir.path().join("report.json");
    let app = quiet_app(WardenConfig::default()).with_registry(clean_registry());

    let outcome = app
        .validate(ValidateArgs {
            path: dir.path().to_path_buf(),
            format: Some(ReportFormat::Json),
            output: Some(output.clone()),
            sequential: false,
            fail_under: None,
        })
        .await
        .expect("validation should succeed");

    assert_eq!(outcome.score, 100);
    assert!(outcome.passed());

    let content = fs::read_to_string(&output).expect("report should be written");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");
    assert_eq!(value["summary"]["score"], 100);
}

#[tokio::test]
async fn test_validate_fails_under_threshold() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let imports = ImportValidationResult {
        architectural_violations: vec![layer_violation("domain/GetUser.kt")],
        ..Default::default()
    };
    let registry = clean_registry()
        .with_import_validator(MockImportValidator::new(Behavior::Return(imports)));

    let mut config = WardenConfig::default();
    config.general.fail_under = Some(95);
    let app = quiet_app(config).with_registry(registry);

    let outcome = app
        .validate(ValidateArgs {
            path: dir.path().to_path_buf(),
            format: Some(ReportFormat::Markdown),
            output: Some(dir.path().join("report.md")),
            ..ValidateArgs::default()
        })
        .await
        .expect("validation should succeed");

    assert_eq!(outcome.score, 90);
    assert_eq!(outcome.fail_under, Some(95));
    assert!(!outcome.passed());

    let markdown = fs::read_to_string(dir.path().join("report.md")).expect("report written");
    assert!(markdown.starts_with("# Warden Validation Report"));
}

#[tokio::test]
async fn test_validate_missing_project_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let app = quiet_app(WardenConfig::default()).with_registry(clean_registry());

    let result = app
        .validate(ValidateArgs {
            path: dir.path().join("missing"),
            output: Some(dir.path().join("report.txt")),
            ..ValidateArgs::default()
        })
        .await;

    assert!(matches!(result, Err(WardenError::Orchestration(_))));
    assert!(!dir.path().join("report.txt").exists());
}

#[tokio::test]
async fn test_config_errors_surface() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let app = WardenApp::new(BrokenConfigProvider).with_verbosity(Verbosity::Quiet);

    let result = app
        .validate(ValidateArgs {
            path: dir.path().to_path_buf(),
            ..ValidateArgs::default()
        })
        .await;

    assert!(matches!(result, Err(WardenError::Config(_))));
}

#[test]
fn test_status_reports_registered_validators() {
    let app = quiet_app(WardenConfig::default());

    let status = app.status().expect("status should be available");

    assert!(status.is_initialized);
    assert_eq!(status.available_validators.len(), 4);
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let app = quiet_app(WardenConfig::default());

    let path = app
        .init(InitArgs {
            path: dir.path().to_path_buf(),
        })
        .expect("init should succeed");
    assert!(path.is_file());

    let again = app.init(InitArgs {
        path: dir.path().to_path_buf(),
    });
    assert!(matches!(again, Err(WardenError::Config(_))));
}
