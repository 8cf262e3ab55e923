use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

use warden::config::WardenConfig;
use warden::models::{
    HiltValidationResult, ImportValidationResult, Priority, Severity, ValidationReport,
    ViewModelValidationResult,
};
use warden::orchestrator::ValidationOrchestrator;
use warden::output::{format_report, formatter_for, ReportFormat};

#[path = "mocks/mod.rs"]
mod mocks;

use mocks::{
    clean_registry, layer_violation, missing_binding, state_flow_issue, unused_import, Behavior,
    MockDiValidator, MockImportValidator, MockUiDataFlowValidator,
};

/// Imports and DI below the threshold with critical issues, UI data flow below it without
async fn troubled_report(dir: &TempDir) -> ValidationReport {
    let imports = ImportValidationResult {
        unused_imports: vec![unused_import("domain/GetUser.kt")],
        architectural_violations: (0..4)
            .map(|i| layer_violation(&format!("domain/UseCase{}.kt", i % 2)))
            .collect(),
        ..Default::default()
    };
    let ui = ViewModelValidationResult {
        state_flow_issues: (0..11).map(|i| state_flow_issue(&format!("_state{}", i))).collect(),
        ..Default::default()
    };
    let di = HiltValidationResult {
        binding_issues: (0..4).map(|i| missing_binding(&format!("Store{}", i))).collect(),
        ..Default::default()
    };

    let registry = clean_registry()
        .with_import_validator(MockImportValidator::new(Behavior::Return(imports)))
        .with_ui_data_flow_validator(MockUiDataFlowValidator::new(Behavior::Return(ui)))
        .with_di_validator(MockDiValidator::new(Behavior::Return(di)));

    ValidationOrchestrator::new(registry, WardenConfig::default())
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("validation should succeed")
}

/// Every "Critical: N | Warning: N | Info: N" line, in order
fn count_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.find("Critical: ").map(|start| &line[start..]))
        .map(|line| line.split(" | validator").next().unwrap_or(line).to_string())
        .collect()
}

#[tokio::test]
async fn test_recommendations_are_ordered_by_priority_then_category() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let report = troubled_report(&dir).await;

    let order: Vec<(Priority, &str)> = report
        .recommendations()
        .iter()
        .map(|r| (r.priority, r.category.as_str()))
        .collect();

    assert_eq!(
        order,
        vec![
            (Priority::High, "dependency_injection"),
            (Priority::High, "imports"),
            (Priority::High, "imports"),
            (Priority::Medium, "ui_data_flow"),
        ]
    );

    let violations = &report.recommendations()[2];
    assert_eq!(violations.title, "Architectural violations (4)");
    assert_eq!(
        violations.affected_files,
        vec![
            PathBuf::from("domain/UseCase0.kt"),
            PathBuf::from("domain/UseCase1.kt"),
        ]
    );

    // Same input, same recommendations
    let again = troubled_report(&dir).await;
    assert_eq!(report.recommendations(), again.recommendations());
}

#[tokio::test]
async fn test_console_and_markdown_agree_on_numbers() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let report = troubled_report(&dir).await;
    let summary = report.summary();

    let console = formatter_for(ReportFormat::Console, false).format_report(&report);
    let markdown = formatter_for(ReportFormat::Markdown, false).format_report(&report);

    assert!(console.contains(&format!("Overall score: {}/100", summary.score)));
    assert!(markdown.contains(&format!("**Overall score:** {}/100", summary.score)));
    assert!(console.contains(&format!("Total issues: {}", summary.total_issues)));
    assert!(markdown.contains(&format!("**Total issues:** {}", summary.total_issues)));

    let console_counts = count_lines(&console);
    let markdown_counts = count_lines(&markdown);
    assert_eq!(console_counts.len(), 5);
    assert_eq!(console_counts, markdown_counts);
    assert_eq!(
        console_counts[0],
        format!(
            "Critical: {} | Warning: {} | Info: {}",
            summary.critical_issues, summary.warning_issues, summary.info_issues
        )
    );

    for (name, category) in &summary.categories {
        assert!(console.contains(&format!("{}  score {}/100", name, category.score)));
        assert!(markdown.contains(&format!("## {} ({}/100)", name, category.score)));
    }

    assert!(console.contains("[HIGH] dependency_injection: Missing DI bindings (4)"));
    assert!(console.contains("Files: domain/UseCase0.kt, domain/UseCase1.kt"));
    assert!(markdown.contains("  - Files: `domain/UseCase0.kt`, `domain/UseCase1.kt`"));
    assert!(console.contains("[critical]"));
    assert!(!console.contains(Severity::Critical.emoji()));
    assert!(markdown.contains("- [ ] **[high] dependency_injection: Missing DI bindings (4)**"));
}

#[tokio::test]
async fn test_json_report_is_machine_readable() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let report = troubled_report(&dir).await;

    let json = format_report(&report, ReportFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(value["summary"]["score"], report.summary().score);
    assert_eq!(
        value["summary"]["categories"]["imports"]["critical_issues"],
        4
    );
    assert_eq!(
        value["recommendations"].as_array().map(|r| r.len()),
        Some(report.recommendations().len())
    );

    let parsed: ValidationReport = serde_json::from_str(&json).expect("report round-trips");
    assert_eq!(parsed.summary(), report.summary());
}

#[tokio::test]
async fn test_inconsistent_json_report_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let report = troubled_report(&dir).await;

    let mut value = serde_json::to_value(&report).expect("report serializes");
    value["summary"]["total_issues"] = serde_json::json!(999);

    let err = serde_json::from_value::<ValidationReport>(value)
        .expect_err("tampered totals must not load");
    assert!(err.to_string().contains("Invariant violated"));
}

#[tokio::test]
async fn test_clean_report_has_no_recommendations() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let report = ValidationOrchestrator::new(clean_registry(), WardenConfig::default())
        .execute_comprehensive_validation(dir.path())
        .await
        .expect("validation should succeed");

    let console = formatter_for(ReportFormat::Console, false).format_report(&report);
    let markdown = formatter_for(ReportFormat::Markdown, false).format_report(&report);

    assert!(console.contains("Overall score: 100/100"));
    assert!(console.contains("No recommendations"));
    assert!(markdown.contains("No recommendations."));
    assert_eq!(markdown.matches("No issues found.").count(), 4);
}

#[test]
fn test_report_format_parsing() {
    assert_eq!("markdown".parse::<ReportFormat>().ok(), Some(ReportFormat::Markdown));
    assert_eq!("json".parse::<ReportFormat>().ok(), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::default(), ReportFormat::Console);
    assert!("html".parse::<ReportFormat>().is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn test_json_serialization_failure_is_reported() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().expect("Failed to create temp directory");
    let project = dir.path().join(OsStr::from_bytes(b"caf\xe9"));
    std::fs::create_dir(&project).expect("Failed to create project directory");

    let report = ValidationOrchestrator::new(clean_registry(), WardenConfig::default())
        .execute_comprehensive_validation(&project)
        .await
        .expect("validation should succeed");

    let json = format_report(&report, ReportFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert!(value["summary"].is_null());
    assert!(value["error"]
        .as_str()
        .is_some_and(|error| error.starts_with("failed to serialize report")));
}
