//! Runs every validator family and assembles the validation report

use chrono::Utc;
use log::{debug, info, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};
use strum_macros::Display;
use tokio::sync::oneshot;
use tokio::task;
use tokio::time;

use crate::config::WardenConfig;
use crate::error_handler::ErrorHandler;
use crate::errors::{OrchestrationError, ValidatorError, WardenError};
use crate::models::{
    Category, CategoryResult, Findings, ValidationReport, WebhookValidationResult,
};
use crate::validators::{Validator, ValidatorInfo, ValidatorRegistry};

pub mod recommendations;
pub mod scoring;

pub use recommendations::{generate_recommendations, RECOMMENDATION_THRESHOLD};
pub use scoring::{score, MAX_SCORE};

/// Lifecycle of an orchestrator run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OrchestratorState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Readiness of the validation system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatus {
    /// Whether every validator family has an implementation
    pub is_initialized: bool,

    /// Version of this crate
    pub version: String,

    /// Registered validators, sorted by category name
    pub available_validators: Vec<ValidatorInfo>,
}

/// How a single family run ended
enum FamilyOutcome<T> {
    Finished(Result<T, ValidatorError>),
    Panicked(ValidatorError),
    TimedOut(Duration),
    Unregistered,
}

/// Orchestrates the validator families over a project
pub struct ValidationOrchestrator {
    registry: ValidatorRegistry,
    config: WardenConfig,
    handler: ErrorHandler,
    state: RwLock<OrchestratorState>,
}

impl ValidationOrchestrator {
    /// Create a new orchestrator
    pub fn new(registry: ValidatorRegistry, config: WardenConfig) -> Self {
        Self {
            registry,
            config,
            handler: ErrorHandler::new(),
            state: RwLock::new(OrchestratorState::Idle),
        }
    }

    /// Current state
    pub fn state(&self) -> OrchestratorState {
        self.state
            .read()
            .map(|state| *state)
            .unwrap_or(OrchestratorState::Failed)
    }

    fn set_state(&self, state: OrchestratorState) {
        if let Ok(mut current) = self.state.write() {
            debug!("Orchestrator state: {} -> {}", *current, state);
            *current = state;
        }
    }

    /// Report readiness and the registered validators
    pub fn get_system_status(&self) -> SystemStatus {
        SystemStatus {
            is_initialized: self.registry.is_complete(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            available_validators: self.registry.get_validator_info(),
        }
    }

    /// Run all four families over `project` and build the report.
    ///
    /// Validator failures are folded into their family's results. Only an
    /// invalid project path or an internal invariant violation is an error.
    pub async fn execute_comprehensive_validation(
        &self,
        project: &Path,
    ) -> Result<ValidationReport, WardenError> {
        if !project.is_dir() {
            return Err(OrchestrationError::InvalidProjectPath(project.to_path_buf()).into());
        }

        self.set_state(OrchestratorState::Running);
        info!("Validating project at {}", project.display());
        let start = Instant::now();

        let imports = self.run_family(
            Category::Imports,
            self.registry.import_validator(),
            project,
            None,
            |validator, project| validator.validate_imports(project),
        );
        let webhook = self.run_family(
            Category::Webhook,
            self.registry.webhook_validator(),
            project,
            Some(self.config.webhook.family_timeout()),
            |validator, project| validator.validate_make_service(project),
        );
        let ui_data_flow = self.run_family(
            Category::UiDataFlow,
            self.registry.ui_data_flow_validator(),
            project,
            None,
            |validator, project| validator.validate_view_models(project),
        );
        let dependency_injection = self.run_family(
            Category::DependencyInjection,
            self.registry.di_validator(),
            project,
            None,
            |validator, project| validator.validate_hilt_modules(project),
        );

        let (imports, webhook, ui_data_flow, dependency_injection) = if self.config.general.parallel {
            futures::join!(imports, webhook, ui_data_flow, dependency_injection)
        } else {
            (
                imports.await,
                webhook.await,
                ui_data_flow.await,
                dependency_injection.await,
            )
        };

        let imports = self.fold(Category::Imports, imports, |_| Default::default());
        let webhook = self.fold(Category::Webhook, webhook, |_| {
            WebhookValidationResult::timed_out()
        });
        let ui_data_flow = self.fold(Category::UiDataFlow, ui_data_flow, |_| Default::default());
        let dependency_injection = self.fold(
            Category::DependencyInjection,
            dependency_injection,
            |_| Default::default(),
        );

        let categories = [
            imports.overview(),
            webhook.overview(),
            ui_data_flow.overview(),
            dependency_injection.overview(),
        ];

        let summary = scoring::summarize(&categories);
        if let Err(err) = scoring::check_invariants(&summary) {
            self.set_state(OrchestratorState::Failed);
            return Err(err.into());
        }

        let recommendations = generate_recommendations(&categories, &summary);

        info!(
            "Validation finished in {:.2?}: score {}, {} issues ({} critical, {} warning, {} info), {} recommendations",
            start.elapsed(),
            summary.score,
            summary.total_issues,
            summary.critical_issues,
            summary.warning_issues,
            summary.info_issues,
            recommendations.len()
        );

        let report = ValidationReport::new(
            Utc::now(),
            project.to_path_buf(),
            summary,
            imports,
            webhook,
            ui_data_flow,
            dependency_injection,
            recommendations,
        );

        self.set_state(OrchestratorState::Completed);
        Ok(report)
    }

    /// Run one family's aggregate method on a blocking worker
    async fn run_family<V, T, F>(
        &self,
        category: Category,
        validator: Option<Arc<V>>,
        project: &Path,
        budget: Option<Duration>,
        run: F,
    ) -> (String, FamilyOutcome<T>, Duration)
    where
        V: Validator + ?Sized + 'static,
        T: Send + 'static,
        F: FnOnce(&V, &Path) -> Result<T, ValidatorError> + Send + 'static,
    {
        let Some(validator) = validator else {
            return ("unregistered".to_string(), FamilyOutcome::Unregistered, Duration::ZERO);
        };

        let name = validator.validator_name().to_string();
        let project: PathBuf = project.to_path_buf();
        debug!("Starting {} validator '{}'", category, name);
        let start = Instant::now();

        let outcome = match budget {
            Some(budget) => {
                Self::run_detached(category, budget, move || run(&*validator, &project)).await
            }
            None => match task::spawn_blocking(move || run(&*validator, &project)).await {
                Ok(result) => FamilyOutcome::Finished(result),
                Err(err) => FamilyOutcome::Panicked(ValidatorError::Panicked(err.to_string())),
            },
        };

        let elapsed = start.elapsed();
        info!("Finished {} validator '{}' in {:.2?}", category, name, elapsed);
        (name, outcome, elapsed)
    }

    /// Run a time-budgeted family on its own thread.
    ///
    /// The thread is detached: when the budget runs out it is left to finish
    /// on its own, so runtime shutdown never waits on a stalled validator.
    async fn run_detached<T, F>(category: Category, budget: Duration, run: F) -> FamilyOutcome<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ValidatorError> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let spawned = thread::Builder::new()
            .name(format!("warden-{}", category))
            .spawn(move || {
                // The receiver is gone once the budget has run out
                let _ = tx.send(panic::catch_unwind(AssertUnwindSafe(run)));
            });
        if let Err(err) = spawned {
            return FamilyOutcome::Finished(Err(ValidatorError::Io(err)));
        }

        match time::timeout(budget, rx).await {
            Ok(Ok(Ok(result))) => FamilyOutcome::Finished(result),
            Ok(Ok(Err(payload))) => {
                FamilyOutcome::Panicked(ValidatorError::Panicked(panic_message(&*payload)))
            }
            Ok(Err(_)) => FamilyOutcome::Panicked(ValidatorError::Panicked(
                "worker exited without a result".to_string(),
            )),
            Err(_) => FamilyOutcome::TimedOut(budget),
        }
    }

    /// Turn a family outcome into its category result, folding failures into diagnostics
    fn fold<T, D>(
        &self,
        category: Category,
        (name, outcome, elapsed): (String, FamilyOutcome<T>, Duration),
        on_timeout: D,
    ) -> CategoryResult<T>
    where
        T: Findings + Default,
        D: FnOnce(Duration) -> T,
    {
        let context = format!("{} validation failed", category);

        let (findings, diagnostics) = match outcome {
            FamilyOutcome::Finished(Ok(findings)) => (findings, Vec::new()),
            FamilyOutcome::Finished(Err(err)) => {
                warn!("{} validator '{}' failed: {}", category, name, err);
                let error = self
                    .handler
                    .create_validation_error(&err, category.failure_kind(), &context);
                (T::default(), vec![self.handler.handle_validation_error(&error)])
            }
            FamilyOutcome::Panicked(err) => {
                warn!("{} validator '{}' panicked: {}", category, name, err);
                let error = self
                    .handler
                    .create_validation_error(&err, category.failure_kind(), &context);
                (T::default(), vec![self.handler.handle_validation_error(&error)])
            }
            FamilyOutcome::TimedOut(budget) => {
                warn!("{} validator '{}' timed out after {:?}", category, name, budget);
                (on_timeout(budget), Vec::new())
            }
            FamilyOutcome::Unregistered => {
                warn!("No {} validator registered", category);
                let err = ValidatorError::Unavailable {
                    name: category.name().to_string(),
                    message: "no validator registered".to_string(),
                };
                let error = self
                    .handler
                    .create_validation_error(&err, category.failure_kind(), &context);
                (T::default(), vec![self.handler.handle_validation_error(&error)])
            }
        };

        CategoryResult::new(category, name, findings, diagnostics, elapsed)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
