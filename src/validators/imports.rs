//! Import hygiene and package dependency validator

use log::debug;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::{LayerRule, ScanConfig, WardenConfig};
use crate::errors::ValidatorError;
use crate::models::{
    ArchitecturalViolation, Category, CircularDependency, ImportValidationResult, MissingImport,
    UnusedImport, ValidationResult, ViolationKind,
};
use crate::utils::{contains_word, SourceFile, SourceTree};
use crate::validators::{project_results, ImportValidator, Validator};

/// Symbols that are commonly used without an import, with the import that resolves them
const WELL_KNOWN_SYMBOLS: &[(&str, &str)] = &[
    ("@Inject", "javax.inject.Inject"),
    ("@Singleton", "javax.inject.Singleton"),
    ("@HiltViewModel", "dagger.hilt.android.lifecycle.HiltViewModel"),
    ("@Composable", "androidx.compose.runtime.Composable"),
    ("@Module", "dagger.Module"),
    ("@InstallIn", "dagger.hilt.InstallIn"),
    ("@Provides", "dagger.Provides"),
    ("@Binds", "dagger.Binds"),
    ("MutableStateFlow", "kotlinx.coroutines.flow.MutableStateFlow"),
    ("StateFlow", "kotlinx.coroutines.flow.StateFlow"),
    ("viewModelScope", "androidx.lifecycle.viewModelScope"),
];

/// Import validator that scans Kotlin and Java sources
pub struct FsImportValidator {
    scan: ScanConfig,
    layers: Vec<LayerRule>,
}

impl FsImportValidator {
    /// Create a new FsImportValidator
    pub fn new(config: &WardenConfig) -> Self {
        Self {
            scan: config.scan.clone(),
            layers: config.imports.layers.clone(),
        }
    }

    fn unused_imports(&self, file: &SourceFile) -> Vec<UnusedImport> {
        let body = file.body();

        file.imports
            .iter()
            .filter(|import| !import.wildcard)
            .filter(|import| !contains_word(&body, import.simple_name()))
            .map(|import| UnusedImport {
                file_path: file.path.clone(),
                import_statement: import.statement.clone(),
                line_number: import.line,
            })
            .collect()
    }

    fn missing_imports(&self, file: &SourceFile) -> Vec<MissingImport> {
        let body = file.body();
        let declared = file.declared_types();

        WELL_KNOWN_SYMBOLS
            .iter()
            .filter(|&&(symbol, qualified)| {
                let name = symbol.trim_start_matches('@');
                let used = if symbol.starts_with('@') {
                    body.match_indices(symbol).any(|(start, _)| {
                        !body[start + symbol.len()..]
                            .chars()
                            .next()
                            .is_some_and(|c| c.is_alphanumeric() || c == '_')
                    })
                } else {
                    contains_word(&body, name)
                };

                let same_package = file
                    .package
                    .as_deref()
                    .is_some_and(|package| qualified.rsplit_once('.').map(|(p, _)| p) == Some(package));

                let imported = file.imports_qualified(qualified)
                    || file.imports.iter().any(|import| import.simple_name() == name);

                used && !imported && !same_package && !declared.iter().any(|d| d == name)
            })
            .map(|&(symbol, qualified)| MissingImport {
                file_path: file.path.clone(),
                symbol: symbol.to_string(),
                suggested_import: qualified.to_string(),
            })
            .collect()
    }

    /// Layer of a package: the first segment that names a configured layer
    fn layer_of<'a>(&'a self, package: &str) -> Option<&'a LayerRule> {
        package
            .split('.')
            .find_map(|segment| self.layers.iter().find(|rule| rule.layer == segment))
    }

    fn architectural_violations(&self, file: &SourceFile) -> Vec<ArchitecturalViolation> {
        let Some(package) = file.package.as_deref() else {
            return Vec::new();
        };
        let Some(rule) = self.layer_of(package) else {
            return Vec::new();
        };

        // Imports sharing the first two package segments belong to the project
        let project_prefix: Vec<&str> = package.split('.').take(2).collect();

        let mut violations = Vec::new();
        for import in &file.imports {
            let segments: Vec<&str> = import.package().split('.').collect();
            if segments.len() < project_prefix.len() || segments[..project_prefix.len()] != project_prefix[..] {
                continue;
            }

            let Some(target) = segments
                .iter()
                .find(|segment| rule.forbidden.iter().any(|f| f == *segment))
            else {
                continue;
            };

            let violation_type = if rule.layer != "domain" && *target == "data" {
                ViolationKind::DirectDataAccess
            } else {
                ViolationKind::LayerDependency
            };

            violations.push(ArchitecturalViolation {
                file_path: file.path.clone(),
                violation_type,
                description: format!(
                    "{} layer depends on {} layer via '{}'",
                    rule.layer, target, import.path
                ),
                suggestion: format!(
                    "Depend on an abstraction owned by the {} layer instead of {}",
                    rule.layer, import.path
                ),
            });
        }

        violations
    }

    fn circular_dependencies(&self, tree: &SourceTree) -> Vec<CircularDependency> {
        let packages: BTreeSet<&str> = tree
            .files()
            .iter()
            .filter_map(|file| file.package.as_deref())
            .collect();

        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let nodes: BTreeMap<&str, NodeIndex> = packages
            .iter()
            .map(|package| (*package, graph.add_node(*package)))
            .collect();

        for file in tree.files() {
            let Some(from) = file.package.as_deref() else {
                continue;
            };
            for import in &file.imports {
                let to = import.package();
                if to == from {
                    continue;
                }
                if let (Some(&a), Some(&b)) = (nodes.get(from), nodes.get(to)) {
                    graph.update_edge(a, b, ());
                }
            }
        }

        let mut cycles: Vec<CircularDependency> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut cycle: Vec<String> = scc.iter().map(|n| graph[*n].to_string()).collect();
                cycle.sort();
                CircularDependency { cycle }
            })
            .collect();
        cycles.sort_by(|a, b| a.cycle.cmp(&b.cycle));
        cycles
    }
}

impl Validator for FsImportValidator {
    fn validate(&self, project: &Path) -> Vec<ValidationResult> {
        project_results(self.validate_imports(project), Category::Imports, self.validator_name())
    }

    fn validator_name(&self) -> &str {
        "fs-imports"
    }

    fn category(&self) -> &str {
        Category::Imports.name()
    }
}

impl ImportValidator for FsImportValidator {
    fn validate_imports(&self, project: &Path) -> Result<ImportValidationResult, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;

        let per_file: Vec<_> = tree
            .files()
            .par_iter()
            .map(|file| {
                (
                    self.unused_imports(file),
                    self.missing_imports(file),
                    self.architectural_violations(file),
                )
            })
            .collect();

        let mut result = ImportValidationResult::default();
        for (unused, missing, violations) in per_file {
            result.unused_imports.extend(unused);
            result.missing_imports.extend(missing);
            result.architectural_violations.extend(violations);
        }
        result.circular_dependencies = self.circular_dependencies(&tree);

        debug!(
            "Import scan: {} unused, {} missing, {} violations, {} cycles",
            result.unused_imports.len(),
            result.missing_imports.len(),
            result.architectural_violations.len(),
            result.circular_dependencies.len()
        );

        Ok(result)
    }

    fn find_unused_imports(&self, file: &Path) -> Result<Vec<UnusedImport>, ValidatorError> {
        Ok(self.unused_imports(&SourceFile::load(file)?))
    }

    fn find_missing_imports(&self, file: &Path) -> Result<Vec<MissingImport>, ValidatorError> {
        Ok(self.missing_imports(&SourceFile::load(file)?))
    }

    fn validate_architectural_dependencies(
        &self,
        file: &Path,
    ) -> Result<Vec<ArchitecturalViolation>, ValidatorError> {
        Ok(self.architectural_violations(&SourceFile::load(file)?))
    }

    fn detect_circular_dependencies(
        &self,
        project: &Path,
    ) -> Result<Vec<CircularDependency>, ValidatorError> {
        let tree = SourceTree::scan(project, &self.scan)?;
        Ok(self.circular_dependencies(&tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> SourceFile {
        SourceFile::parse(Path::new("Test.kt"), content.to_string())
    }

    #[test]
    fn test_unused_import_detected() {
        let validator = FsImportValidator::new(&WardenConfig::default());
        let file = parse(
            "package com.example.ui\n\nimport com.example.domain.User\nimport java.util.Date\n\nfun show(user: User) {}\n",
        );

        let unused = validator.unused_imports(&file);

        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].import_statement, "import java.util.Date");
        assert_eq!(unused[0].line_number, 4);
    }

    #[test]
    fn test_missing_annotation_import() {
        let validator = FsImportValidator::new(&WardenConfig::default());
        let file = parse("package com.example.data\n\nclass Repo @Inject constructor()\n");

        let missing = validator.missing_imports(&file);

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].symbol, "@Inject");
        assert_eq!(missing[0].suggested_import, "javax.inject.Inject");
    }

    #[test]
    fn test_domain_importing_data_is_violation() {
        let validator = FsImportValidator::new(&WardenConfig::default());
        let file = parse(
            "package com.example.domain\n\nimport com.example.data.UserDao\n\nclass UseCase(val dao: UserDao)\n",
        );

        let violations = validator.architectural_violations(&file);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationKind::LayerDependency);
    }

    #[test]
    fn test_ui_importing_data_is_direct_access() {
        let validator = FsImportValidator::new(&WardenConfig::default());
        let file = parse(
            "package com.example.ui.home\n\nimport com.example.data.UserDao\n\nclass Screen(val dao: UserDao)\n",
        );

        let violations = validator.architectural_violations(&file);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationKind::DirectDataAccess);
    }

    #[test]
    fn test_package_cycle_detected() {
        let validator = FsImportValidator::new(&WardenConfig::default());
        let a = SourceFile::parse(
            Path::new("a/A.kt"),
            "package com.example.a\nimport com.example.b.B\nclass A(val b: B)\n".to_string(),
        );
        let b = SourceFile::parse(
            Path::new("b/B.kt"),
            "package com.example.b\nimport com.example.a.A\nclass B(val a: A)\n".to_string(),
        );
        let tree = SourceTree::from_files(vec![a, b]);

        let cycles = validator.circular_dependencies(&tree);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].cycle, vec!["com.example.a", "com.example.b"]);
    }
}
