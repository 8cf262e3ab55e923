//! Hilt module, binding, scope and injection graph validator

use log::debug;
use once_cell::sync::Lazy;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::{ScanConfig, WardenConfig};
use crate::errors::ValidatorError;
use crate::models::{
    BindingIssue, BindingIssueKind, Category, DependencyGraphResult, HiltValidationResult,
    ModuleIssue, ScopeIssue, ValidationResult,
};
use crate::utils::{SourceFile, SourceTree};
use crate::validators::{project_results, DiValidator, Validator};

static ANNOTATED_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"((?:@\w+(?:\([^)]*\))?\s+)+)(?:(?:abstract|internal|private|public|open)\s+)*(?:object|class|interface)\s+(\w+)",
    )
    .unwrap()
});

static INSTALL_IN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@InstallIn\(\s*(\w+)(?:::class)?\s*\)").unwrap());

static BINDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"@Binds\s+((?:@\w+(?:\([^)]*\))?\s+)*)(?:abstract\s+)?fun\s+\w+\s*\(\s*\w+\s*:\s*(\w+)\s*\)\s*:\s*(\w+)",
    )
    .unwrap()
});

static PROVIDES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@Provides\s+((?:@\w+(?:\([^)]*\))?\s+)*)fun\s+\w+\s*\([^)]*\)\s*:\s*(\w+)")
        .unwrap()
});

static SCOPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"@(Singleton|ActivityRetainedScoped|ViewModelScoped|ActivityScoped|FragmentScoped|ViewScoped|ServiceScoped)\b",
    )
    .unwrap()
});

static INJECT_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"class\s+(\w+)\s*(?:@\w+\s+)*@Inject\s+constructor\s*\(([^)]*)\)").unwrap()
});

static PARAM_TYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*([A-Z]\w*)").unwrap());

static INTERFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\binterface\s+([A-Z]\w*)").unwrap());

/// Scope annotation owned by each Hilt component
const COMPONENT_SCOPES: [(&str, &str); 7] = [
    ("SingletonComponent", "Singleton"),
    ("ActivityRetainedComponent", "ActivityRetainedScoped"),
    ("ViewModelComponent", "ViewModelScoped"),
    ("ActivityComponent", "ActivityScoped"),
    ("FragmentComponent", "FragmentScoped"),
    ("ViewComponent", "ViewScoped"),
    ("ServiceComponent", "ServiceScoped"),
];

/// A `@Module` declaration and the part of the file it spans
struct ModuleDecl<'a> {
    name: String,
    component: Option<String>,
    file: &'a SourceFile,
    body: &'a str,
}

/// A type made available to the graph through `@Binds` or `@Provides`
struct Binding<'a> {
    file: &'a SourceFile,
    bound: String,
    qualifiers: String,
    implementation: Option<String>,
}

impl Binding<'_> {
    fn key(&self) -> String {
        format!("{}{}", self.qualifiers, self.bound)
    }

    fn is_multibinding(&self) -> bool {
        self.qualifiers.contains("@Into") || self.qualifiers.contains("@ElementsIntoSet")
    }
}

/// Annotations on a binding that distinguish it from others of the same type
fn qualifiers(annotations: &str) -> String {
    annotations
        .split_whitespace()
        .filter(|annotation| !SCOPE_RE.is_match(annotation))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Injection graph built from `@Inject constructor` classes
struct InjectionGraph {
    /// Class name to the parameter types of its constructor
    classes: BTreeMap<String, Vec<String>>,
}

impl InjectionGraph {
    fn build(tree: &SourceTree) -> Self {
        let mut classes = BTreeMap::new();

        for file in tree.files() {
            for caps in INJECT_CLASS_RE.captures_iter(&file.content) {
                let params = PARAM_TYPE_RE
                    .captures_iter(&caps[2])
                    .map(|param| param[1].to_string())
                    .collect();
                classes.insert(caps[1].to_string(), params);
            }
        }

        Self { classes }
    }

    fn cycles(&self) -> Vec<String> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let nodes: BTreeMap<&str, NodeIndex> = self
            .classes
            .keys()
            .map(|name| (name.as_str(), graph.add_node(name.as_str())))
            .collect();

        for (class, params) in &self.classes {
            for param in params {
                if let (Some(&a), Some(&b)) = (nodes.get(class.as_str()), nodes.get(param.as_str())) {
                    graph.update_edge(a, b, ());
                }
            }
        }

        let mut cycles: Vec<String> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut members: Vec<&str> = scc.iter().map(|n| graph[*n]).collect();
                members.sort();
                members.join(" -> ")
            })
            .collect();
        cycles.sort();
        cycles
    }
}

/// Dependency injection validator for Hilt projects
pub struct FsDiValidator {
    scan: ScanConfig,
}

impl FsDiValidator {
    /// Create a new FsDiValidator
    pub fn new(config: &WardenConfig) -> Self {
        Self {
            scan: config.scan.clone(),
        }
    }

    fn modules<'a>(&self, tree: &'a SourceTree) -> Vec<ModuleDecl<'a>> {
        let mut modules = Vec::new();

        for file in tree.files() {
            let content = file.content.as_str();
            let decls: Vec<_> = ANNOTATED_DECL_RE.captures_iter(content).collect();

            for (index, caps) in decls.iter().enumerate() {
                let annotations = &caps[1];
                if !annotations.contains("@Module") {
                    continue;
                }
                let Some(whole) = caps.get(0) else {
                    continue;
                };

                let end = decls
                    .get(index + 1)
                    .and_then(|next| next.get(0))
                    .map(|m| m.start())
                    .unwrap_or(content.len());

                modules.push(ModuleDecl {
                    name: caps[2].to_string(),
                    component: INSTALL_IN_RE
                        .captures(annotations)
                        .map(|install| install[1].to_string()),
                    file,
                    body: &content[whole.end()..end],
                });
            }
        }

        modules
    }

    fn bindings<'a>(&self, modules: &[ModuleDecl<'a>]) -> Vec<Binding<'a>> {
        let mut bindings = Vec::new();

        for module in modules {
            for caps in BINDS_RE.captures_iter(module.body) {
                bindings.push(Binding {
                    file: module.file,
                    bound: caps[3].to_string(),
                    qualifiers: qualifiers(&caps[1]),
                    implementation: Some(caps[2].to_string()),
                });
            }
            for caps in PROVIDES_RE.captures_iter(module.body) {
                bindings.push(Binding {
                    file: module.file,
                    bound: caps[2].to_string(),
                    qualifiers: qualifiers(&caps[1]),
                    implementation: None,
                });
            }
        }

        bindings
    }

    fn module_issues(&self, modules: &[ModuleDecl<'_>]) -> Vec<ModuleIssue> {
        modules
            .iter()
            .filter(|module| module.component.is_none())
            .map(|module| ModuleIssue {
                file_path: module.file.path.clone(),
                module_name: module.name.clone(),
                description: "Module is not installed in a component; add @InstallIn".to_string(),
            })
            .collect()
    }

    fn binding_issues(&self, tree: &SourceTree, modules: &[ModuleDecl<'_>]) -> Vec<BindingIssue> {
        let declared: BTreeSet<String> = tree.declared_types().into_iter().collect();
        let bindings = self.bindings(modules);
        let mut issues = Vec::new();

        for binding in &bindings {
            let Some(implementation) = &binding.implementation else {
                continue;
            };
            if !declared.contains(implementation) {
                issues.push(BindingIssue {
                    file_path: binding.file.path.clone(),
                    binding: binding.bound.clone(),
                    kind: BindingIssueKind::MissingImplementation,
                    description: format!("Bound implementation {} is not declared", implementation),
                });
            }
        }

        let mut seen: BTreeMap<String, &PathBuf> = BTreeMap::new();
        for binding in bindings.iter().filter(|b| !b.is_multibinding()) {
            let key = binding.key();
            if let Some(first) = seen.get(&key) {
                issues.push(BindingIssue {
                    file_path: binding.file.path.clone(),
                    binding: binding.bound.clone(),
                    kind: BindingIssueKind::DuplicateBinding,
                    description: format!("{} is already bound in {}", binding.bound, first.display()),
                });
            } else {
                seen.insert(key, &binding.file.path);
            }
        }

        issues
    }

    fn scope_issues(&self, modules: &[ModuleDecl<'_>]) -> Vec<ScopeIssue> {
        let mut issues = Vec::new();

        for module in modules {
            let Some(component) = &module.component else {
                continue;
            };
            let Some(&(_, owned)) = COMPONENT_SCOPES
                .iter()
                .find(|(c, _)| *c == component.as_str())
            else {
                continue;
            };

            for caps in SCOPE_RE.captures_iter(module.body) {
                let scope = &caps[1];
                if scope != owned {
                    issues.push(ScopeIssue {
                        file_path: module.file.path.clone(),
                        component: component.clone(),
                        scope: scope.to_string(),
                        description: format!("{} only supports @{}", component, owned),
                    });
                }
            }
        }

        issues
    }

    fn dependency_graph(&self, tree: &SourceTree) -> DependencyGraphResult {
        let graph = InjectionGraph::build(tree);
        let modules = self.modules(tree);
        let provided: BTreeSet<String> = self
            .bindings(&modules)
            .into_iter()
            .map(|binding| binding.bound)
            .collect();
        let interfaces: BTreeSet<String> = tree
            .files()
            .iter()
            .flat_map(|file| {
                INTERFACE_RE
                    .captures_iter(&file.content)
                    .map(|caps| caps[1].to_string())
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut missing_deps = Vec::new();
        for (class, params) in &graph.classes {
            for param in params {
                if interfaces.contains(param)
                    && !provided.contains(param)
                    && !graph.classes.contains_key(param)
                {
                    missing_deps.push(format!("{} (required by {})", param, class));
                }
            }
        }
        missing_deps.sort();
        missing_deps.dedup();

        let circular_deps = graph.cycles();
        let is_valid = circular_deps.is_empty() && missing_deps.is_empty();

        DependencyGraphResult {
            circular_deps,
            missing_deps,
            is_valid,
        }
    }
}

impl Validator for FsDiValidator {
    fn validate(&self, project: &Path) -> Vec<ValidationResult> {
        project_results(
            self.validate_hilt_modules(project),
            Category::DependencyInjection,
            self.validator_name(),
        )
    }

    fn validator_name(&self) -> &str {
        "fs-di"
    }

    fn category(&self) -> &str {
        Category::DependencyInjection.name()
    }
}

impl DiValidator for FsDiValidator {
    fn validate_hilt_modules(&self, project: &Path) -> Result<HiltValidationResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        let modules = self.modules(&tree);

        let result = HiltValidationResult {
            module_issues: self.module_issues(&modules),
            binding_issues: self.binding_issues(&tree, &modules),
            scope_issues: self.scope_issues(&modules),
        };

        debug!(
            "Hilt scan: {} modules, {} module issues, {} binding issues, {} scope issues",
            modules.len(),
            result.module_issues.len(),
            result.binding_issues.len(),
            result.scope_issues.len()
        );

        Ok(result)
    }

    fn validate_dependency_graph(
        &self,
        project: &Path,
    ) -> Result<DependencyGraphResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(self.dependency_graph(&tree))
    }

    fn validate_scopes(&self, project: &Path) -> Result<Vec<ScopeIssue>, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(self.scope_issues(&self.modules(&tree)))
    }

    fn validate_bindings(&self, project: &Path) -> Result<Vec<BindingIssue>, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        let modules = self.modules(&tree);
        Ok(self.binding_issues(&tree, &modules))
    }

    fn detect_circular_dependencies(&self, project: &Path) -> Result<Vec<String>, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(InjectionGraph::build(&tree).cycles())
    }
}
