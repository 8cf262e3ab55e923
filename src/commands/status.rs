use colored::*;

use crate::cli::Verbosity;
use crate::orchestrator::{SystemStatus, ValidationOrchestrator};

/// Command handler for the status command
pub struct StatusCommand {
    verbosity: Verbosity,
}

impl StatusCommand {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Render a system status for the terminal
    pub fn render(status: &SystemStatus) -> String {
        let mut output = format!("{} {}\n", "Warden".cyan().bold(), status.version);

        let readiness = if status.is_initialized {
            "ready".green().bold()
        } else {
            "incomplete".yellow().bold()
        };
        output.push_str(&format!("Status: {}\n", readiness));
        output.push_str(&format!(
            "Validators ({}):\n",
            status.available_validators.len()
        ));

        for info in &status.available_validators {
            output.push_str(&format!(
                "  {} {:<22} {}\n",
                "•".bright_blue(),
                info.category.name(),
                info.name.dimmed()
            ));
        }

        output
    }

    /// Execute the status command
    pub fn execute(&self, orchestrator: &ValidationOrchestrator) -> SystemStatus {
        let status = orchestrator.get_system_status();
        if self.verbosity > Verbosity::Quiet {
            print!("{}", Self::render(&status));
        }
        status
    }
}
