//! ViewModel, UI state and lifecycle validator

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::config::{ScanConfig, WardenConfig};
use crate::errors::ValidatorError;
use crate::models::{
    Category, DataBindingIssue, LifecycleIssue, StateFlowIssue, UiComponentResult,
    ValidationResult, ViewModelValidationResult,
};
use crate::utils::{contains_word, SourceFile, SourceTree};
use crate::validators::{project_results, UiDataFlowValidator, Validator};

static VIEW_MODEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"class\s+(\w+)[^{]*?:\s*[^{]*?\b(?:Android)?ViewModel\s*\(").unwrap()
});

static PROPERTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*((?:\w+[ \t]+)*?)va[lr][ \t]+(\w+)([^\n]*)$").unwrap());

static COMPOSABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@Composable\s+(?:(?:private|internal|public)\s+)?fun\s+(\w+)").unwrap()
});

static VIEW_MODEL_CONSTRUCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]\w*ViewModel)\s*\(").unwrap());

static EXTENSION_MAPPER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"fun\s+[\w.<>]+\.to[A-Z]\w*\s*\(").unwrap());

const MUTABLE_HOLDERS: [&str; 3] = ["MutableStateFlow", "MutableLiveData", "MutableSharedFlow"];

/// A ViewModel declaration and the range of the file it owns
struct ViewModelDecl<'a> {
    name: String,
    file: &'a SourceFile,
    start: usize,
    end: usize,
}

/// A property declared on a ViewModel
struct Property<'a> {
    view_model: &'a str,
    name: String,
    modifiers: String,
    declaration: String,
}

impl Property<'_> {
    fn is_private(&self) -> bool {
        contains_word(&self.modifiers, "private") || contains_word(&self.modifiers, "protected")
    }

    fn is_mutable_holder(&self) -> bool {
        MUTABLE_HOLDERS
            .iter()
            .any(|holder| contains_word(&self.declaration, holder))
    }

    fn is_exposed_state(&self) -> bool {
        !self.is_private()
            && !self.is_mutable_holder()
            && (contains_word(&self.declaration, "StateFlow")
                || contains_word(&self.declaration, "LiveData")
                || self.declaration.contains("asStateFlow()")
                || self.declaration.contains("stateIn("))
    }
}

/// UI data flow validator that scans Kotlin sources
pub struct FsUiDataFlowValidator {
    scan: ScanConfig,
}

impl FsUiDataFlowValidator {
    /// Create a new FsUiDataFlowValidator
    pub fn new(config: &WardenConfig) -> Self {
        Self {
            scan: config.scan.clone(),
        }
    }

    fn view_models<'a>(&self, tree: &'a SourceTree) -> Vec<ViewModelDecl<'a>> {
        let mut decls = Vec::new();

        for file in tree.files() {
            let starts: Vec<(usize, String)> = VIEW_MODEL_RE
                .captures_iter(&file.content)
                .filter_map(|caps| Some((caps.get(0)?.start(), caps[1].to_string())))
                .collect();

            for (index, (start, name)) in starts.iter().enumerate() {
                let end = starts
                    .get(index + 1)
                    .map(|(next, _)| *next)
                    .unwrap_or(file.content.len());
                decls.push(ViewModelDecl {
                    name: name.clone(),
                    file,
                    start: *start,
                    end,
                });
            }
        }

        decls
    }

    fn properties<'a>(&self, decl: &'a ViewModelDecl<'_>) -> Vec<Property<'a>> {
        let section = &decl.file.content[decl.start..decl.end];

        PROPERTY_RE
            .captures_iter(section)
            .map(|caps| Property {
                view_model: &decl.name,
                name: caps[2].to_string(),
                modifiers: caps[1].to_string(),
                declaration: caps[3].to_string(),
            })
            .collect()
    }

    fn state_flow_issues(&self, tree: &SourceTree) -> Vec<StateFlowIssue> {
        let mut issues = Vec::new();

        for decl in self.view_models(tree) {
            for property in self.properties(&decl) {
                if property.is_mutable_holder() && !property.is_private() {
                    issues.push(StateFlowIssue {
                        file_path: decl.file.path.clone(),
                        view_model: property.view_model.to_string(),
                        property: property.name.clone(),
                        description: "Mutable state is exposed; keep it private and expose a read-only StateFlow".to_string(),
                    });
                }
            }
        }

        issues
    }

    fn data_binding_issues(&self, tree: &SourceTree) -> Vec<DataBindingIssue> {
        let mut issues = Vec::new();

        for decl in self.view_models(tree) {
            for property in self.properties(&decl) {
                if !property.is_exposed_state() {
                    continue;
                }

                let observed = tree
                    .files()
                    .iter()
                    .filter(|file| file.path != decl.file.path)
                    .any(|file| contains_word(&file.content, &property.name));

                if !observed {
                    issues.push(DataBindingIssue {
                        file_path: decl.file.path.clone(),
                        property: format!("{}.{}", decl.name, property.name),
                        description: "Exposed state is never observed outside its ViewModel"
                            .to_string(),
                    });
                }
            }
        }

        issues
    }

    fn lifecycle_issues(&self, tree: &SourceTree) -> Vec<LifecycleIssue> {
        let view_models = self.view_models(tree);
        let mut issues = Vec::new();

        for decl in &view_models {
            let section = &decl.file.content[decl.start..decl.end];
            if contains_word(section, "GlobalScope") {
                issues.push(LifecycleIssue {
                    file_path: decl.file.path.clone(),
                    description: format!(
                        "{} launches work in GlobalScope instead of viewModelScope",
                        decl.name
                    ),
                });
            }
        }

        for file in tree.files() {
            if view_models.iter().any(|decl| decl.file.path == file.path) {
                continue;
            }

            let content = &file.content;
            let collects_in_lifecycle_scope =
                content.contains("lifecycleScope.launch") && content.contains(".collect");
            let lifecycle_aware =
                content.contains("repeatOnLifecycle") || content.contains("flowWithLifecycle");

            if collects_in_lifecycle_scope && !lifecycle_aware {
                issues.push(LifecycleIssue {
                    file_path: file.path.clone(),
                    description: "Flow collected in lifecycleScope without repeatOnLifecycle"
                        .to_string(),
                });
            }
        }

        issues
    }

    fn ui_components(&self, tree: &SourceTree) -> UiComponentResult {
        let mut result = UiComponentResult::default();

        for file in tree.files() {
            let content = &file.content;
            let composables: Vec<(usize, usize, String)> = COMPOSABLE_RE
                .captures_iter(content)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    Some((whole.start(), whole.end(), caps[1].to_string()))
                })
                .collect();

            for (index, (_, body_start, name)) in composables.iter().enumerate() {
                let body_end = composables
                    .get(index + 1)
                    .map(|(next, _, _)| *next)
                    .unwrap_or(content.len());
                let body = &content[*body_start..body_end];

                result.total_count += 1;
                match VIEW_MODEL_CONSTRUCTION_RE.captures(body) {
                    Some(caps) => result.issues.push(format!(
                        "{}: {} constructs {} directly; obtain it with hiltViewModel() or viewModel()",
                        file.path.display(),
                        name,
                        &caps[1]
                    )),
                    None => result.valid_count += 1,
                }
            }
        }

        result
    }

    fn data_mappers(&self, tree: &SourceTree) -> Vec<String> {
        tree.files()
            .iter()
            .filter(|file| {
                file.stem().ends_with("Mapper") || EXTENSION_MAPPER_RE.is_match(&file.content)
            })
            .filter(|file| file.content.contains("!!"))
            .map(|file| {
                format!(
                    "{}: mapper uses non-null assertions (!!); map nullable fields explicitly",
                    file.path.display()
                )
            })
            .collect()
    }
}

impl Validator for FsUiDataFlowValidator {
    fn validate(&self, project: &Path) -> Vec<ValidationResult> {
        project_results(
            self.validate_view_models(project),
            Category::UiDataFlow,
            self.validator_name(),
        )
    }

    fn validator_name(&self) -> &str {
        "fs-ui-data-flow"
    }

    fn category(&self) -> &str {
        Category::UiDataFlow.name()
    }
}

impl UiDataFlowValidator for FsUiDataFlowValidator {
    fn validate_view_models(
        &self,
        project: &Path,
    ) -> Result<ViewModelValidationResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;

        let result = ViewModelValidationResult {
            state_flow_issues: self.state_flow_issues(&tree),
            data_binding_issues: self.data_binding_issues(&tree),
            lifecycle_issues: self.lifecycle_issues(&tree),
        };

        debug!(
            "ViewModel scan: {} state flow, {} data binding, {} lifecycle issues",
            result.state_flow_issues.len(),
            result.data_binding_issues.len(),
            result.lifecycle_issues.len()
        );

        Ok(result)
    }

    fn validate_data_binding(
        &self,
        project: &Path,
    ) -> Result<Vec<DataBindingIssue>, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(self.data_binding_issues(&tree))
    }

    fn validate_state_management(
        &self,
        project: &Path,
    ) -> Result<Vec<StateFlowIssue>, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(self.state_flow_issues(&tree))
    }

    fn validate_ui_components(&self, project: &Path) -> Result<UiComponentResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(self.ui_components(&tree))
    }

    fn validate_data_mappers(&self, project: &Path) -> Result<Vec<String>, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(self.data_mappers(&tree))
    }
}
