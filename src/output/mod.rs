//! Report formatting for Warden

use console::Style;
use log::warn;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::models::{CategoryOverview, CategorySummary, Issue, Recommendation, ValidationReport};

pub mod terminal;

use terminal::{divider, priority_style, score_style, section_header, severity_style, WardenColors};

/// Supported report encodings
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// Colored terminal output
    #[default]
    Console,

    /// Markdown document
    Markdown,

    /// Machine-readable JSON
    Json,
}

/// Trait for rendering a validation report
///
/// Formatters are read-only projections: they never change the report and
/// every numeric field they print comes straight from its summary.
pub trait ReportFormatter {
    fn format_report(&self, report: &ValidationReport) -> String;
}

/// Render `report` in the given format with default settings
pub fn format_report(report: &ValidationReport, format: ReportFormat) -> String {
    formatter_for(format, true).format_report(report)
}

/// Create the formatter for a format
///
/// Plain console output falls back to bracketed severity markers.
pub fn formatter_for(format: ReportFormat, use_colors: bool) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Console => Box::new(
            ConsoleFormatter::new()
                .with_colors(use_colors)
                .with_emoji(use_colors),
        ),
        ReportFormat::Markdown => Box::new(MarkdownFormatter),
        ReportFormat::Json => Box::new(JsonFormatter),
    }
}

fn counts_line(critical: usize, warning: usize, info: usize) -> String {
    format!("Critical: {} | Warning: {} | Info: {}", critical, warning, info)
}

fn category_counts(summary: &CategorySummary) -> String {
    counts_line(
        summary.critical_issues,
        summary.warning_issues,
        summary.info_issues,
    )
}

/// Files touched by a recommendation, relative to the project root
fn affected_files(recommendation: &Recommendation, report: &ValidationReport) -> Vec<String> {
    recommendation
        .affected_files
        .iter()
        .map(|file| {
            crate::utils::relative_to(file, report.project_path())
                .display()
                .to_string()
        })
        .collect()
}

fn issue_location(issue: &Issue, report: &ValidationReport) -> Option<String> {
    issue.file.as_ref().map(|file| {
        crate::utils::relative_to(file, report.project_path())
            .display()
            .to_string()
    })
}

/// Human friendly terminal report
#[derive(Debug, Clone)]
pub struct ConsoleFormatter {
    use_colors: bool,
    use_emoji: bool,
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleFormatter {
    /// Create a new ConsoleFormatter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            use_emoji: true,
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_emoji(mut self, use_emoji: bool) -> Self {
        self.use_emoji = use_emoji;
        self
    }

    fn paint(&self, text: impl std::fmt::Display, style: Style) -> String {
        if self.use_colors {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, title: &str) -> String {
        if self.use_colors {
            section_header(title)
        } else {
            format!("\n{}\n", title)
        }
    }

    fn divider(&self) -> String {
        if self.use_colors {
            divider()
        } else {
            "-".repeat(60)
        }
    }

    fn category_block(
        &self,
        report: &ValidationReport,
        overview: &CategoryOverview<'_>,
        summary: &CategorySummary,
    ) -> String {
        let name = overview.category.name();
        let mut output = format!(
            "{}  score {}  ({} issues)\n",
            self.paint(name, Style::new().bold()),
            self.paint(format!("{}/100", summary.score), score_style(summary.score)),
            summary.total_issues
        );
        output.push_str(&format!(
            "  {}\n",
            self.paint(
                format!(
                    "{} | validator {} | {:.2?}",
                    category_counts(summary),
                    overview.validator_name,
                    overview.elapsed
                ),
                WardenColors::subtle()
            )
        ));

        for issue in overview.issues {
            let marker = if self.use_emoji {
                issue.severity.emoji().to_string()
            } else {
                format!("[{}]", issue.severity)
            };
            let location = issue_location(issue, report)
                .map(|location| format!(" ({})", location))
                .unwrap_or_default();
            output.push_str(&format!(
                "    {} {}{}\n",
                self.paint(marker, severity_style(issue.severity)),
                issue.message,
                self.paint(location, WardenColors::subtle())
            ));
        }

        output
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ValidationReport) -> String {
        let summary = report.summary();
        let mut output = String::new();

        // Executive summary
        output.push_str(&self.header("Warden validation report"));
        output.push_str(&format!("Project: {}\n", report.project_path().display()));
        output.push_str(&format!(
            "Generated: {}\n\n",
            report.timestamp().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!(
            "Overall score: {}\n",
            self.paint(format!("{}/100", summary.score), score_style(summary.score))
        ));
        output.push_str(&format!("Total issues: {}\n", summary.total_issues));
        output.push_str(&format!(
            "Critical issues: {}\n",
            self.paint(summary.critical_issues, WardenColors::error())
        ));
        output.push_str(&format!(
            "{}\n",
            counts_line(
                summary.critical_issues,
                summary.warning_issues,
                summary.info_issues
            )
        ));
        output.push_str(&self.divider());
        output.push('\n');

        // Categories
        output.push_str(&self.header("Categories"));
        for overview in report.categories() {
            let category_summary = summary
                .categories
                .get(overview.category.name())
                .copied()
                .unwrap_or_default();
            output.push_str(&self.category_block(report, &overview, &category_summary));
            output.push('\n');
        }

        // Recommendations
        output.push_str(&self.header("Recommendations"));
        if report.recommendations().is_empty() {
            output.push_str(&format!(
                "{}\n",
                self.paint("No recommendations, every category is healthy", WardenColors::success())
            ));
        }

        for (index, recommendation) in report.recommendations().iter().enumerate() {
            output.push_str(&format!(
                "{}. {} {}: {}\n",
                index + 1,
                self.paint(
                    format!("[{}]", recommendation.priority.to_string().to_uppercase()),
                    priority_style(recommendation.priority)
                ),
                recommendation.category,
                self.paint(&recommendation.title, Style::new().bold())
            ));
            output.push_str(&format!("   {}\n", recommendation.description));
            for item in &recommendation.action_items {
                output.push_str(&format!("   - {}\n", item));
            }
            let files = affected_files(recommendation, report);
            if !files.is_empty() {
                output.push_str(&format!(
                    "   {}\n",
                    self.paint(format!("Files: {}", files.join(", ")), WardenColors::subtle())
                ));
            }
            if let Some(effort) = &recommendation.estimated_effort {
                output.push_str(&format!(
                    "   {}\n",
                    self.paint(format!("Effort: {}", effort), WardenColors::subtle())
                ));
            }
        }

        output
    }
}

/// Markdown report suitable for pull requests and wikis
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl ReportFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ValidationReport) -> String {
        let summary = report.summary();
        let mut output = String::from("# Warden Validation Report\n\n");

        output.push_str(&format!(
            "- **Project:** `{}`\n",
            report.project_path().display()
        ));
        output.push_str(&format!(
            "- **Generated:** {}\n",
            report.timestamp().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("- **Overall score:** {}/100\n", summary.score));
        output.push_str(&format!("- **Total issues:** {}\n", summary.total_issues));
        output.push_str(&format!(
            "- **Critical issues:** {}\n",
            summary.critical_issues
        ));
        output.push_str(&format!(
            "- {}\n\n",
            counts_line(
                summary.critical_issues,
                summary.warning_issues,
                summary.info_issues
            )
        ));

        output.push_str("## Summary\n\n");
        output.push_str("| Category | Score | Critical | Warning | Info | Total |\n");
        output.push_str("|---|---|---|---|---|---|\n");
        for (name, category) in &summary.categories {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                name,
                category.score,
                category.critical_issues,
                category.warning_issues,
                category.info_issues,
                category.total_issues
            ));
        }
        output.push('\n');

        for overview in report.categories() {
            let name = overview.category.name();
            let category = summary.categories.get(name).copied().unwrap_or_default();

            output.push_str(&format!("## {} ({}/100)\n\n", name, category.score));
            output.push_str(&format!("{}\n\n", category_counts(&category)));

            if overview.issues.is_empty() {
                output.push_str("No issues found.\n\n");
                continue;
            }

            for issue in overview.issues {
                let location = issue_location(issue, report)
                    .map(|location| format!(" (`{}`)", location))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "- {} **{}** {}{}\n",
                    issue.severity.emoji(),
                    issue.severity,
                    issue.message,
                    location
                ));
            }
            output.push('\n');
        }

        output.push_str("## Recommendations\n\n");
        if report.recommendations().is_empty() {
            output.push_str("No recommendations.\n");
        }

        for recommendation in report.recommendations() {
            output.push_str(&format!(
                "- [ ] **[{}] {}: {}** {}\n",
                recommendation.priority,
                recommendation.category,
                recommendation.title,
                recommendation.description
            ));
            for item in &recommendation.action_items {
                output.push_str(&format!("  - {}\n", item));
            }
            let files = affected_files(recommendation, report);
            if !files.is_empty() {
                let files: Vec<String> = files.iter().map(|file| format!("`{}`", file)).collect();
                output.push_str(&format!("  - Files: {}\n", files.join(", ")));
            }
            if let Some(effort) = &recommendation.estimated_effort {
                output.push_str(&format!("  - _Effort: {}_\n", effort));
            }
        }

        output
    }
}

/// JSON formatter for machine-readable output
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &ValidationReport) -> String {
        match serde_json::to_string_pretty(report) {
            Ok(json) => json,
            Err(err) => {
                warn!("Failed to serialize report to JSON: {}", err);
                serde_json::json!({ "error": format!("failed to serialize report: {}", err) })
                    .to_string()
            }
        }
    }
}
