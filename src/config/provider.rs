use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::WardenConfig;
use crate::errors::ConfigError;

/// File names searched for, in order, in each directory
pub const CONFIG_FILE_NAMES: [&str; 2] = [".warden.toml", "warden.toml"];

/// Trait for providing configuration to the application
pub trait ConfigProvider {
    /// Load configuration for a project directory
    fn load_config(&self, base_dir: &Path) -> Result<WardenConfig, ConfigError>;
}

/// TOML-based configuration provider
#[derive(Debug, Default)]
pub struct TomlConfigProvider {
    /// Explicit configuration file, bypassing discovery
    config_path: Option<PathBuf>,
}

impl TomlConfigProvider {
    /// Create a new TOML configuration provider
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Use this file instead of searching for one
    pub fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Find project-level config by traversing directory tree upwards
    pub fn find_project_config(&self, base_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = base_dir.to_path_buf();

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current_dir.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            // Try parent directory, break if no parent
            if !current_dir.pop() {
                break;
            }
        }

        None
    }

    /// Read configuration from a file
    fn read_config_file(&self, path: &Path) -> Result<WardenConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::LoadError {
                path: path.to_path_buf(),
                message: "File does not exist".to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: WardenConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn load_config(&self, base_dir: &Path) -> Result<WardenConfig, ConfigError> {
        if let Some(path) = &self.config_path {
            debug!("Loading config from {:?}", path);
            return self.read_config_file(path);
        }

        match self.find_project_config(base_dir) {
            Some(path) => {
                debug!("Loading project config from {:?}", path);
                self.read_config_file(&path)
            }
            None => {
                debug!("No config found from {:?}, using defaults", base_dir);
                Ok(WardenConfig::default())
            }
        }
    }
}
