use colored::*;
use log::info;
use std::path::PathBuf;

use crate::cli::{InitArgs, Verbosity};
use crate::config::defaults;
use crate::errors::WardenError;

/// Command handler for the init command
pub struct InitCommand {
    verbosity: Verbosity,
}

impl InitCommand {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Write a default configuration into the target directory
    pub fn execute(&self, args: InitArgs) -> Result<PathBuf, WardenError> {
        let path = defaults::write_default_config(&args.path)?;
        info!("Wrote default configuration to {}", path.display());

        if self.verbosity > Verbosity::Quiet {
            println!("{} Created {}", "✓".green().bold(), path.display());
        }

        Ok(path)
    }
}
