//! Configuration management for Warden

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ConfigError;
use crate::output::ReportFormat;

pub mod defaults;
mod provider;

pub use provider::{ConfigProvider, TomlConfigProvider, CONFIG_FILE_NAMES};

/// General configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Run validator families concurrently
    pub parallel: bool,

    /// Fail when the overall score is below this value
    pub fail_under: Option<u32>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            fail_under: None,
        }
    }
}

/// Source scanning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions to inspect
    pub extensions: Vec<String>,

    /// Directory names that are never scanned
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["kt".to_string(), "java".to_string()],
            exclude_dirs: vec![
                "build".to_string(),
                ".gradle".to_string(),
                ".idea".to_string(),
                "generated".to_string(),
            ],
        }
    }
}

/// A layer and the layers it must not depend on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRule {
    /// Package segment naming the layer (e.g. "domain")
    pub layer: String,

    /// Layers this layer must not import from
    pub forbidden: Vec<String>,
}

/// Import validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportsConfig {
    /// Architectural layer rules
    pub layers: Vec<LayerRule>,
}

impl Default for ImportsConfig {
    fn default() -> Self {
        Self {
            layers: defaults::default_layer_rules(),
        }
    }
}

/// Webhook validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook URL to test
    pub url: Option<String>,

    /// Connectivity timeout in milliseconds
    pub timeout_ms: u64,

    /// Time budget for the whole webhook family in milliseconds
    pub family_timeout_ms: u64,

    /// Path fragments the project is expected to reference
    pub required_endpoints: Vec<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: 5000,
            family_timeout_ms: 30_000,
            required_endpoints: Vec::new(),
        }
    }
}

impl WebhookConfig {
    /// Connectivity timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Budget for the whole webhook family, never shorter than the connectivity timeout
    pub fn family_timeout(&self) -> Duration {
        Duration::from_millis(self.family_timeout_ms.max(self.timeout_ms))
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format
    pub format: ReportFormat,

    /// Colorize console output
    pub use_colors: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Console,
            use_colors: true,
        }
    }
}

/// Main configuration for Warden
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub imports: ImportsConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl WardenConfig {
    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.general.fail_under {
            if threshold > 100 {
                return Err(ConfigError::InvalidValue {
                    key: "general.fail_under".to_string(),
                    message: format!("{} is not a score between 0 and 100", threshold),
                });
            }
        }

        if self.webhook.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "webhook.timeout_ms".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }

        if self.scan.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "scan.extensions".to_string(),
                message: "at least one extension is required".to_string(),
            });
        }

        Ok(())
    }
}
