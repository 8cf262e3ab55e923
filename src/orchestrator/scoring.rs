//! Severity counting and quality scores

use std::collections::BTreeMap;

use crate::errors::OrchestrationError;
use crate::models::{CategoryOverview, CategorySummary, Issue, Severity, ValidationSummary};

/// Highest possible score
pub const MAX_SCORE: u32 = 100;

/// Quality score for the given severity counts.
///
/// `max(0, 100 - 10 * critical - 3 * warning - info)`
pub fn score(critical: usize, warning: usize, info: usize) -> u32 {
    let penalty = [
        (critical, Severity::Critical),
        (warning, Severity::Warning),
        (info, Severity::Info),
    ]
    .iter()
    .fold(0u64, |total, (count, severity)| {
        total.saturating_add((*count as u64).saturating_mul(u64::from(severity.penalty())))
    });

    u64::from(MAX_SCORE).saturating_sub(penalty) as u32
}

/// Count issues by severity and score them
pub fn summarize_issues(issues: &[Issue]) -> CategorySummary {
    let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();

    let critical_issues = count(Severity::Critical);
    let warning_issues = count(Severity::Warning);
    let info_issues = count(Severity::Info);

    CategorySummary {
        total_issues: issues.len(),
        critical_issues,
        warning_issues,
        info_issues,
        score: score(critical_issues, warning_issues, info_issues),
    }
}

/// Build the report summary from every category
pub fn summarize(categories: &[CategoryOverview<'_>]) -> ValidationSummary {
    let per_category: BTreeMap<String, CategorySummary> = categories
        .iter()
        .map(|overview| {
            (
                overview.category.name().to_string(),
                summarize_issues(overview.issues),
            )
        })
        .collect();

    let total_issues = per_category.values().map(|c| c.total_issues).sum();
    let critical_issues = per_category.values().map(|c| c.critical_issues).sum();
    let warning_issues = per_category.values().map(|c| c.warning_issues).sum();
    let info_issues = per_category.values().map(|c| c.info_issues).sum();

    ValidationSummary {
        total_issues,
        critical_issues,
        warning_issues,
        info_issues,
        score: score(critical_issues, warning_issues, info_issues),
        categories: per_category,
    }
}

/// Verify the summary is internally consistent; violations are reported, never corrected
pub fn check_invariants(summary: &ValidationSummary) -> Result<(), OrchestrationError> {
    check_counts("overall", &summary_counts(summary))?;

    for (name, category) in &summary.categories {
        check_counts(name, category)?;
    }

    let sum = |f: fn(&CategorySummary) -> usize| summary.categories.values().map(f).sum::<usize>();
    if sum(|c| c.total_issues) != summary.total_issues
        || sum(|c| c.critical_issues) != summary.critical_issues
        || sum(|c| c.warning_issues) != summary.warning_issues
        || sum(|c| c.info_issues) != summary.info_issues
    {
        return Err(OrchestrationError::InvariantViolation(
            "category counts do not add up to the overall counts".to_string(),
        ));
    }

    Ok(())
}

fn summary_counts(summary: &ValidationSummary) -> CategorySummary {
    CategorySummary {
        total_issues: summary.total_issues,
        critical_issues: summary.critical_issues,
        warning_issues: summary.warning_issues,
        info_issues: summary.info_issues,
        score: summary.score,
    }
}

fn check_counts(name: &str, counts: &CategorySummary) -> Result<(), OrchestrationError> {
    let by_severity = counts.critical_issues + counts.warning_issues + counts.info_issues;
    if counts.total_issues != by_severity {
        return Err(OrchestrationError::InvariantViolation(format!(
            "{}: total {} does not match {} critical + {} warning + {} info",
            name,
            counts.total_issues,
            counts.critical_issues,
            counts.warning_issues,
            counts.info_issues
        )));
    }

    if counts.score > MAX_SCORE {
        return Err(OrchestrationError::InvariantViolation(format!(
            "{}: score {} is outside 0..={}",
            name, counts.score, MAX_SCORE
        )));
    }

    Ok(())
}
