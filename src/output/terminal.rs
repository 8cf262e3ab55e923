//! Terminal styling helpers for Warden

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::models::{Priority, Severity};

/// Color palette used by the console report
pub struct WardenColors;

impl WardenColors {
    pub fn primary() -> Style {
        Style::new().cyan().bold()
    }

    pub fn error() -> Style {
        Style::new().red().bold()
    }

    pub fn warning() -> Style {
        Style::new().yellow()
    }

    pub fn success() -> Style {
        Style::new().green().bold()
    }

    pub fn subtle() -> Style {
        Style::new().dim()
    }

    pub fn highlight() -> Style {
        Style::new().blue().italic()
    }
}

/// Style for a score: green when healthy, yellow when recommendations kick in, red when poor
pub fn score_style(score: u32) -> Style {
    match score {
        90..=u32::MAX => WardenColors::success(),
        70..=89 => WardenColors::warning(),
        _ => WardenColors::error(),
    }
}

pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => WardenColors::error(),
        Severity::Warning => WardenColors::warning(),
        Severity::Info => WardenColors::highlight(),
    }
}

pub fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => WardenColors::error(),
        Priority::Medium => WardenColors::warning(),
        Priority::Low => WardenColors::subtle(),
    }
}

/// Section header
pub fn section_header(title: &str) -> String {
    format!("\n{}\n", WardenColors::primary().apply_to(format!("╸ {} ╺", title)))
}

/// Divider line
pub fn divider() -> String {
    WardenColors::subtle().apply_to("━".repeat(60)).to_string()
}

/// Spinner shown while a validation runs
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]);

    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
