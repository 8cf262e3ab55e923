use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{LayerRule, WardenConfig};
use crate::errors::ConfigError;

/// Default clean architecture layer rules
pub fn default_layer_rules() -> Vec<LayerRule> {
    vec![
        LayerRule {
            layer: "domain".to_string(),
            forbidden: vec![
                "data".to_string(),
                "ui".to_string(),
                "presentation".to_string(),
            ],
        },
        LayerRule {
            layer: "ui".to_string(),
            forbidden: vec!["data".to_string()],
        },
        LayerRule {
            layer: "presentation".to_string(),
            forbidden: vec!["data".to_string()],
        },
    ]
}

/// Create a default configuration for a new project
pub fn create_default_config() -> WardenConfig {
    let mut config = WardenConfig::default();

    // Endpoints most webhook integrations reference
    config.webhook.required_endpoints = vec!["/webhook".to_string()];

    config
}

/// Render the default configuration as TOML
pub fn render_default_config() -> Result<String, ConfigError> {
    let body = toml::to_string_pretty(&create_default_config())?;
    Ok(format!("# Warden configuration\n\n{}", body))
}

/// Write a default `.warden.toml` into `dir`, refusing to overwrite
pub fn write_default_config(dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = dir.join(".warden.toml");
    if path.exists() {
        return Err(ConfigError::LoadError {
            path,
            message: "Config file already exists".to_string(),
        });
    }

    fs::write(&path, render_default_config()?)?;
    Ok(path)
}
