//! Webhook service and network configuration validator

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error as _;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use ureq::AgentBuilder;
use url::Url;

use crate::config::{ScanConfig, WardenConfig, WebhookConfig};
use crate::errors::ValidatorError;
use crate::models::{
    ApiEndpointResult, Category, ConnectivityResult, JsonSerializationResult, NetworkConfigIssue,
    NetworkConfigResult, SerializationIssue, ValidationResult, WebhookValidationResult,
};
use crate::utils::{contains_word, find_files_named, SourceTree};
use crate::validators::{project_results, Validator, WebhookValidator};

static STRING_LITERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"\n]*)""#).unwrap());

static NETWORK_MODEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"data\s+class\s+(\w+(?:Dto|DTO|Request|Response))\b").unwrap()
});

static NETWORK_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.execute\(\)|\bnewCall\(|\.await\(\)|\.enqueue\(").unwrap());

const CLASS_ANNOTATIONS: [&str; 2] = ["@Serializable", "@JsonClass"];
const FIELD_ANNOTATIONS: [&str; 3] = ["@SerializedName", "@SerialName", "@Json("];

/// Webhook validator that inspects configuration files and sources
pub struct FsWebhookValidator {
    scan: ScanConfig,
    webhook: WebhookConfig,
}

impl FsWebhookValidator {
    /// Create a new FsWebhookValidator
    pub fn new(config: &WardenConfig) -> Self {
        Self {
            scan: config.scan.clone(),
            webhook: config.webhook.clone(),
        }
    }

    fn url_issues(&self) -> Vec<NetworkConfigIssue> {
        let Some(raw) = &self.webhook.url else {
            return vec![NetworkConfigIssue {
                file_path: None,
                description: "No webhook URL configured".to_string(),
            }];
        };

        match Url::parse(raw) {
            Ok(url) if url.scheme() != "https" => vec![NetworkConfigIssue {
                file_path: None,
                description: format!("Webhook URL uses plain {} instead of https", url.scheme()),
            }],
            Ok(_) => Vec::new(),
            Err(err) => vec![NetworkConfigIssue {
                file_path: None,
                description: format!("Webhook URL '{}' is invalid: {}", raw, err),
            }],
        }
    }

    fn project_file_issues(&self, project: &Path) -> Result<Vec<NetworkConfigIssue>, ValidatorError> {
        let mut issues = Vec::new();

        for path in find_files_named(project, "network_security_config.xml", &self.scan) {
            let content = fs::read_to_string(&path)?;
            if content.contains(r#"cleartextTrafficPermitted="true""#) {
                issues.push(NetworkConfigIssue {
                    file_path: Some(path),
                    description: "Cleartext traffic is permitted".to_string(),
                });
            }
        }

        let manifests = find_files_named(project, "AndroidManifest.xml", &self.scan);
        if !manifests.is_empty() {
            let mut has_internet = false;
            for path in &manifests {
                if fs::read_to_string(path)?.contains("android.permission.INTERNET") {
                    has_internet = true;
                    break;
                }
            }
            if !has_internet {
                issues.push(NetworkConfigIssue {
                    file_path: manifests.first().cloned(),
                    description: "INTERNET permission is not declared".to_string(),
                });
            }
        }

        Ok(issues)
    }

    fn network_configuration(
        &self,
        project: &Path,
        tree: &SourceTree,
    ) -> Result<NetworkConfigResult, ValidatorError> {
        let mut issues = self.url_issues();
        issues.extend(self.project_file_issues(project)?);

        for file in tree.files() {
            let cleartext = STRING_LITERAL_RE
                .captures_iter(&file.content)
                .any(|caps| caps[1].starts_with("http://"));
            if cleartext {
                issues.push(NetworkConfigIssue {
                    file_path: Some(file.path.clone()),
                    description: "Hard-coded cleartext http:// URL".to_string(),
                });
            }
        }

        Ok(NetworkConfigResult { issues })
    }

    fn api_endpoints(&self, tree: &SourceTree) -> ApiEndpointResult {
        let mut literals: Vec<String> = tree
            .files()
            .iter()
            .flat_map(|file| {
                STRING_LITERAL_RE
                    .captures_iter(&file.content)
                    .map(|caps| caps[1].to_string())
                    .collect::<Vec<_>>()
            })
            .collect();
        if let Some(url) = &self.webhook.url {
            literals.push(url.clone());
        }

        let mut result = ApiEndpointResult::default();
        for endpoint in &self.webhook.required_endpoints {
            if literals.iter().any(|literal| literal.contains(endpoint.as_str())) {
                result.valid_endpoints.push(endpoint.clone());
            } else {
                result.missing_endpoints.push(endpoint.clone());
            }
        }

        result
    }
}

impl Validator for FsWebhookValidator {
    fn validate(&self, project: &Path) -> Vec<ValidationResult> {
        project_results(
            self.validate_make_service(project),
            Category::Webhook,
            self.validator_name(),
        )
    }

    fn validator_name(&self) -> &str {
        "fs-webhook"
    }

    fn category(&self) -> &str {
        Category::Webhook.name()
    }
}

impl WebhookValidator for FsWebhookValidator {
    fn validate_make_service(
        &self,
        project: &Path,
    ) -> Result<WebhookValidationResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;

        Ok(WebhookValidationResult {
            network_config: self.network_configuration(project, &tree)?,
            api_endpoints: self.api_endpoints(&tree),
            connectivity: self.test_webhook_connectivity(self.webhook.timeout())?,
            json_serialization: serialization_issues(&tree),
        })
    }

    fn validate_network_configuration(
        &self,
        project: &Path,
    ) -> Result<NetworkConfigResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        self.network_configuration(project, &tree)
    }

    fn validate_api_endpoints(&self, project: &Path) -> Result<ApiEndpointResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(self.api_endpoints(&tree))
    }

    /// Send a HEAD request to the webhook URL within `timeout`.
    ///
    /// Only a 2xx answer counts as connected.
    fn test_webhook_connectivity(
        &self,
        timeout: Duration,
    ) -> Result<Option<ConnectivityResult>, ValidatorError> {
        let Some(raw) = &self.webhook.url else {
            return Ok(None);
        };

        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(err) => return Ok(Some(ConnectivityResult::failed(format!("invalid URL: {}", err)))),
        };
        if url.host_str().is_none() {
            return Ok(Some(ConnectivityResult::failed("URL has no host")));
        }

        let agent = AgentBuilder::new().timeout(timeout).build();
        let start = Instant::now();

        let result = match agent.head(url.as_str()).call() {
            Ok(response) => {
                let elapsed = start.elapsed();
                let status = response.status();
                debug!("HEAD {} answered {} in {:?}", url, status, elapsed);
                if (200..300).contains(&status) {
                    ConnectivityResult::connected(status, elapsed)
                } else {
                    ConnectivityResult::rejected(status, response.status_text(), elapsed)
                }
            }
            Err(ureq::Error::Status(status, response)) => {
                warn!("Webhook {} answered {}", url, status);
                ConnectivityResult::rejected(status, response.status_text(), start.elapsed())
            }
            Err(ureq::Error::Transport(transport)) => {
                if start.elapsed() >= timeout || is_timeout(&transport) {
                    ConnectivityResult::timeout()
                } else {
                    warn!("Webhook request to {} failed: {}", url, transport);
                    ConnectivityResult::failed(transport.to_string())
                }
            }
        };

        Ok(Some(result))
    }

    fn validate_json_serialization(
        &self,
        project: &Path,
    ) -> Result<JsonSerializationResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(serialization_issues(&tree))
    }

    fn validate_error_handling(&self, project: &Path) -> Result<Vec<String>, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;

        Ok(tree
            .files()
            .iter()
            .filter(|file| NETWORK_CALL_RE.is_match(&file.content))
            .filter(|file| {
                !contains_word(&file.content, "try")
                    && !contains_word(&file.content, "catch")
                    && !file.content.contains("runCatching")
            })
            .map(|file| {
                format!(
                    "{}: network call without error handling",
                    file.path.display()
                )
            })
            .collect())
    }
}

/// Network model classes without serialization annotations
fn serialization_issues(tree: &SourceTree) -> JsonSerializationResult {
    let mut result = JsonSerializationResult::default();

    for file in tree.files() {
        let content = &file.content;
        let declarations: Vec<_> = NETWORK_MODEL_RE.captures_iter(content).collect();

        for (index, caps) in declarations.iter().enumerate() {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let class_name = caps[1].to_string();
            result.checked_classes += 1;

            // Annotations directly above the declaration
            let header_start = content[..whole.start()]
                .rmatch_indices('\n')
                .nth(2)
                .map(|(i, _)| i)
                .unwrap_or(0);
            let header = &content[header_start..whole.end()];

            // Class body runs until the next network model declaration
            let body_end = declarations
                .get(index + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(content.len());
            let body = &content[whole.end()..body_end];

            let annotated = CLASS_ANNOTATIONS.iter().any(|a| header.contains(a))
                || FIELD_ANNOTATIONS.iter().any(|a| body.contains(a));

            if !annotated {
                result.issues.push(SerializationIssue {
                    file_path: file.path.clone(),
                    class_name,
                    description: "Network model has no serialization annotations".to_string(),
                });
            }
        }
    }

    result
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    transport
        .source()
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(|err| {
            matches!(
                err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            )
        })
}
