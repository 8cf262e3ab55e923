use colored::*;
use log::debug;
use std::fs;

use crate::cli::{ValidateArgs, Verbosity};
use crate::config::WardenConfig;
use crate::errors::WardenError;
use crate::orchestrator::ValidationOrchestrator;
use crate::output::{formatter_for, terminal, ReportFormat};
use crate::validators::ValidatorRegistry;

/// What a validate run ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOutcome {
    /// Overall score of the report
    pub score: u32,

    /// Threshold the score was compared against, if any
    pub fail_under: Option<u32>,
}

impl ValidateOutcome {
    /// Whether the score met the threshold
    pub fn passed(&self) -> bool {
        self.fail_under.map_or(true, |threshold| self.score >= threshold)
    }
}

/// Command handler for the validate command
pub struct ValidateCommand {
    registry: Option<ValidatorRegistry>,
    verbosity: Verbosity,
}

impl ValidateCommand {
    /// Create a new validate command handler using the file-system validators
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            registry: None,
            verbosity,
        }
    }

    /// Use these validators instead of the file-system ones
    pub fn with_registry(mut self, registry: ValidatorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Apply command line overrides on top of the loaded configuration
    pub fn effective_config(args: &ValidateArgs, mut config: WardenConfig) -> WardenConfig {
        if args.sequential {
            config.general.parallel = false;
        }
        if let Some(format) = args.format {
            config.output.format = format;
        }
        if args.fail_under.is_some() {
            config.general.fail_under = args.fail_under;
        }
        config
    }

    /// Execute the validate command
    pub async fn execute(
        &self,
        args: ValidateArgs,
        config: WardenConfig,
    ) -> Result<ValidateOutcome, WardenError> {
        let config = Self::effective_config(&args, config);
        let format = config.output.format;
        let use_colors = config.output.use_colors && console::colors_enabled();
        let fail_under = config.general.fail_under;

        debug!(
            "Validating {} (format: {}, parallel: {})",
            args.path.display(),
            format,
            config.general.parallel
        );

        let registry = self
            .registry
            .clone()
            .unwrap_or_else(|| ValidatorRegistry::with_default_validators(&config));
        let orchestrator = ValidationOrchestrator::new(registry, config);

        // No spinner when machine-readable output goes to stdout
        let show_spinner = self.verbosity >= Verbosity::Normal
            && (args.output.is_some() || format == ReportFormat::Console);
        let spinner = show_spinner.then(|| terminal::create_spinner("Validating project..."));

        let result = orchestrator.execute_comprehensive_validation(&args.path).await;

        if let Some(spinner) = &spinner {
            spinner.finish_and_clear();
        }
        let report = result?;

        let rendered = formatter_for(format, use_colors && args.output.is_none())
            .format_report(&report);

        match &args.output {
            Some(path) => {
                fs::write(path, &rendered)?;
                if self.verbosity >= Verbosity::Normal {
                    println!(
                        "{} Report written to {} (score {}/100)",
                        "✓".green().bold(),
                        path.display(),
                        report.summary().score
                    );
                }
            }
            None => println!("{}", rendered),
        }

        let outcome = ValidateOutcome {
            score: report.summary().score,
            fail_under,
        };

        if !outcome.passed() && self.verbosity >= Verbosity::Normal {
            eprintln!(
                "{} Score {} is below the required {}",
                "✗".red().bold(),
                outcome.score,
                fail_under.unwrap_or_default()
            );
        }

        Ok(outcome)
    }
}
