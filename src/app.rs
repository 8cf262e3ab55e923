use std::path::{Path, PathBuf};

use crate::cli::{InitArgs, ValidateArgs, Verbosity};
use crate::commands::{InitCommand, StatusCommand, ValidateCommand, ValidateOutcome};
use crate::config::{ConfigProvider, WardenConfig};
use crate::errors::WardenError;
use crate::orchestrator::{SystemStatus, ValidationOrchestrator};
use crate::validators::ValidatorRegistry;

/// Core application that wires configuration, validators and commands together
pub struct WardenApp<C>
where
    C: ConfigProvider,
{
    config_provider: C,
    registry: Option<ValidatorRegistry>,
    verbosity: Verbosity,
}

impl<C> WardenApp<C>
where
    C: ConfigProvider,
{
    /// Create a new instance of WardenApp
    pub fn new(config_provider: C) -> Self {
        Self {
            config_provider,
            registry: None,
            verbosity: Verbosity::default(),
        }
    }

    /// Set the verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Use these validators instead of the file-system ones
    pub fn with_registry(mut self, registry: ValidatorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Run the validate command
    pub async fn validate(&self, args: ValidateArgs) -> Result<ValidateOutcome, WardenError> {
        let config = self.load_config(&args.path)?;

        let mut command = ValidateCommand::new(self.verbosity);
        if let Some(registry) = &self.registry {
            command = command.with_registry(registry.clone());
        }

        command.execute(args, config).await
    }

    /// Run the status command
    pub fn status(&self) -> Result<SystemStatus, WardenError> {
        let config = self.load_config(Path::new("."))?;
        let registry = self.registry_for(&config);
        let orchestrator = ValidationOrchestrator::new(registry, config);

        Ok(StatusCommand::new(self.verbosity).execute(&orchestrator))
    }

    /// Run the init command
    pub fn init(&self, args: InitArgs) -> Result<PathBuf, WardenError> {
        InitCommand::new(self.verbosity).execute(args)
    }

    fn load_config(&self, base_dir: &Path) -> Result<WardenConfig, WardenError> {
        Ok(self.config_provider.load_config(base_dir)?)
    }

    fn registry_for(&self, config: &WardenConfig) -> ValidatorRegistry {
        self.registry
            .clone()
            .unwrap_or_else(|| ValidatorRegistry::with_default_validators(config))
    }
}
