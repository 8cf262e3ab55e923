//! Report types assembled by the orchestrator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum_macros::{Display, EnumIter, EnumString};

use super::findings::{
    Findings, HiltValidationResult, ImportValidationResult, Issue, ViewModelValidationResult,
    WebhookValidationResult,
};
use super::{ErrorKind, Priority, Severity, ValidationResult};
use crate::errors::OrchestrationError;
use crate::orchestrator::scoring::check_invariants;

/// The four validator families
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
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Imports,
    Webhook,
    UiDataFlow,
    DependencyInjection,
}

impl Category {
    /// Category name used as the summary key
    pub fn name(&self) -> &'static str {
        match self {
            Category::Imports => "imports",
            Category::Webhook => "webhook",
            Category::UiDataFlow => "ui_data_flow",
            Category::DependencyInjection => "dependency_injection",
        }
    }

    /// Error kind used when a validator of this family fails outright
    pub fn failure_kind(&self) -> ErrorKind {
        match self {
            Category::Imports => ErrorKind::CompilationError,
            Category::Webhook => ErrorKind::NetworkConfiguration,
            Category::UiDataFlow => ErrorKind::CompilationError,
            Category::DependencyInjection => ErrorKind::DependencyInjection,
        }
    }
}

/// Results contributed by one validator family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult<T> {
    category: Category,
    validator_name: String,
    findings: T,
    diagnostics: Vec<ValidationResult>,
    issues: Vec<Issue>,
    elapsed: Duration,
}

impl<T: Findings> CategoryResult<T> {
    /// Build a family result; issues are derived from the findings followed by the diagnostics
    pub fn new(
        category: Category,
        validator_name: impl Into<String>,
        findings: T,
        diagnostics: Vec<ValidationResult>,
        elapsed: Duration,
    ) -> Self {
        let mut issues = findings.issues();
        issues.extend(diagnostics.iter().filter_map(Issue::from_diagnostic));

        Self {
            category,
            validator_name: validator_name.into(),
            findings,
            diagnostics,
            issues,
            elapsed,
        }
    }
}

impl<T> CategoryResult<T> {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn validator_name(&self) -> &str {
        &self.validator_name
    }

    /// Typed findings returned by the validator
    pub fn findings(&self) -> &T {
        &self.findings
    }

    /// Operational failures folded into this family
    pub fn diagnostics(&self) -> &[ValidationResult] {
        &self.diagnostics
    }

    /// Every classified issue of this family
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Type-erased view used by formatters
    pub fn overview(&self) -> CategoryOverview<'_> {
        CategoryOverview {
            category: self.category,
            validator_name: &self.validator_name,
            issues: &self.issues,
            diagnostics: &self.diagnostics,
            elapsed: self.elapsed,
        }
    }
}

/// Borrowed, type-erased view of a [`CategoryResult`]
#[derive(Debug, Clone, Copy)]
pub struct CategoryOverview<'a> {
    pub category: Category,
    pub validator_name: &'a str,
    pub issues: &'a [Issue],
    pub diagnostics: &'a [ValidationResult],
    pub elapsed: Duration,
}

/// Issue counts and score for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub info_issues: usize,

    /// Quality score, 0-100
    pub score: u32,
}

impl CategorySummary {
    /// Count of issues with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical_issues,
            Severity::Warning => self.warning_issues,
            Severity::Info => self.info_issues,
        }
    }
}

/// Counts and scores for the whole report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub info_issues: usize,

    /// Overall quality score, 0-100
    pub score: u32,

    /// Per-category summaries keyed by category name
    pub categories: BTreeMap<String, CategorySummary>,
}

/// A suggested course of action derived from the findings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Category the recommendation applies to
    pub category: String,

    pub priority: Priority,
    pub title: String,
    pub description: String,

    /// Ordered steps to resolve the problem
    pub action_items: Vec<String>,

    /// Files affected, sorted and de-duplicated
    pub affected_files: Vec<PathBuf>,

    /// Rough effort estimate
    pub estimated_effort: Option<String>,
}

/// Immutable snapshot of one validation run.
///
/// Reports loaded back from JSON are checked with the same summary
/// invariants the orchestrator enforces; an inconsistent report is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReportData")]
pub struct ValidationReport {
    timestamp: DateTime<Utc>,
    project_path: PathBuf,
    summary: ValidationSummary,
    imports: CategoryResult<ImportValidationResult>,
    webhook: CategoryResult<WebhookValidationResult>,
    ui_data_flow: CategoryResult<ViewModelValidationResult>,
    dependency_injection: CategoryResult<HiltValidationResult>,
    recommendations: Vec<Recommendation>,
}

/// Unchecked wire form of a report
#[derive(Deserialize)]
struct ReportData {
    timestamp: DateTime<Utc>,
    project_path: PathBuf,
    summary: ValidationSummary,
    imports: CategoryResult<ImportValidationResult>,
    webhook: CategoryResult<WebhookValidationResult>,
    ui_data_flow: CategoryResult<ViewModelValidationResult>,
    dependency_injection: CategoryResult<HiltValidationResult>,
    recommendations: Vec<Recommendation>,
}

impl TryFrom<ReportData> for ValidationReport {
    type Error = OrchestrationError;

    fn try_from(data: ReportData) -> Result<Self, Self::Error> {
        check_invariants(&data.summary)?;

        Ok(Self::new(
            data.timestamp,
            data.project_path,
            data.summary,
            data.imports,
            data.webhook,
            data.ui_data_flow,
            data.dependency_injection,
            data.recommendations,
        ))
    }
}

impl ValidationReport {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        timestamp: DateTime<Utc>,
        project_path: PathBuf,
        summary: ValidationSummary,
        imports: CategoryResult<ImportValidationResult>,
        webhook: CategoryResult<WebhookValidationResult>,
        ui_data_flow: CategoryResult<ViewModelValidationResult>,
        dependency_injection: CategoryResult<HiltValidationResult>,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            timestamp,
            project_path,
            summary,
            imports,
            webhook,
            ui_data_flow,
            dependency_injection,
            recommendations,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn summary(&self) -> &ValidationSummary {
        &self.summary
    }

    pub fn imports(&self) -> &CategoryResult<ImportValidationResult> {
        &self.imports
    }

    pub fn webhook(&self) -> &CategoryResult<WebhookValidationResult> {
        &self.webhook
    }

    pub fn ui_data_flow(&self) -> &CategoryResult<ViewModelValidationResult> {
        &self.ui_data_flow
    }

    pub fn dependency_injection(&self) -> &CategoryResult<HiltValidationResult> {
        &self.dependency_injection
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// All category results, sorted by category name
    pub fn categories(&self) -> Vec<CategoryOverview<'_>> {
        let mut categories = vec![
            self.imports.overview(),
            self.webhook.overview(),
            self.ui_data_flow.overview(),
            self.dependency_injection.overview(),
        ];
        categories.sort_by(|a, b| a.category.name().cmp(b.category.name()));
        categories
    }
}
