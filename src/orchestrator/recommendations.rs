//! Recommendations derived from low scoring categories

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::models::{
    CategoryOverview, FindingKind, Issue, Priority, Recommendation, ValidationSummary,
};

/// Categories scoring below this get recommendations
pub const RECOMMENDATION_THRESHOLD: u32 = 70;

/// Canned guidance for one finding type
struct Template {
    description: &'static str,
    action_items: &'static [&'static str],
    effort: &'static str,
}

fn template(kind: FindingKind) -> Template {
    match kind {
        FindingKind::UnusedImport => Template {
            description: "Imports that are never referenced clutter files and hide real dependencies.",
            action_items: &[
                "Remove the unused imports",
                "Enable the IDE's optimize imports on save",
            ],
            effort: "15 minutes",
        },
        FindingKind::MissingImport => Template {
            description: "Symbols are used without the import that resolves them.",
            action_items: &["Add the suggested imports", "Rebuild to confirm the files compile"],
            effort: "15 minutes",
        },
        FindingKind::ArchitecturalViolation => Template {
            description: "Layers depend on layers they must not know about.",
            action_items: &[
                "Introduce an interface in the depending layer",
                "Move the implementation behind that interface",
                "Inject the interface instead of the concrete class",
            ],
            effort: "2-4 hours",
        },
        FindingKind::CircularDependency => Template {
            description: "Packages import each other, which couples them into a single unit.",
            action_items: &[
                "Find the types that create the cycle",
                "Extract the shared types into a package both can depend on",
            ],
            effort: "2-4 hours",
        },
        FindingKind::NetworkConfiguration => Template {
            description: "The webhook or network security configuration is incomplete or insecure.",
            action_items: &[
                "Configure an https webhook URL",
                "Disable cleartext traffic",
                "Move hard-coded URLs into build configuration",
            ],
            effort: "1 hour",
        },
        FindingKind::MissingEndpoint => Template {
            description: "Required API endpoints are not referenced by the project.",
            action_items: &[
                "Add the missing endpoints to the API interface",
                "Cover each endpoint with a request test",
            ],
            effort: "1-2 hours",
        },
        FindingKind::ConnectivityFailure => Template {
            description: "The webhook endpoint could not be reached.",
            action_items: &[
                "Check the webhook URL and that the service is running",
                "Verify DNS and firewall rules",
                "Retry with a longer timeout",
            ],
            effort: "30 minutes",
        },
        FindingKind::JsonSerialization => Template {
            description: "Network models lack serialization annotations and may break on obfuscation.",
            action_items: &[
                "Annotate network models with @Serializable or @JsonClass",
                "Annotate fields whose JSON names differ",
            ],
            effort: "1 hour",
        },
        FindingKind::StateFlow => Template {
            description: "ViewModels expose mutable state to the UI.",
            action_items: &[
                "Make mutable state holders private",
                "Expose read-only StateFlow via asStateFlow()",
            ],
            effort: "1 hour",
        },
        FindingKind::DataBinding => Template {
            description: "ViewModel state is exposed but never observed.",
            action_items: &[
                "Collect the state in the UI or remove it",
                "Merge related properties into a single UI state",
            ],
            effort: "1 hour",
        },
        FindingKind::Lifecycle => Template {
            description: "Work is not tied to the lifecycle of its owner.",
            action_items: &[
                "Replace GlobalScope with viewModelScope",
                "Collect flows inside repeatOnLifecycle",
            ],
            effort: "1-2 hours",
        },
        FindingKind::ModuleConfiguration => Template {
            description: "Hilt modules are not installed in a component.",
            action_items: &["Add @InstallIn with the component that owns the bindings"],
            effort: "30 minutes",
        },
        FindingKind::MissingBinding => Template {
            description: "Bindings point at implementations that do not exist.",
            action_items: &[
                "Create the missing implementation or fix the bound type",
                "Run a build to let Hilt verify the graph",
            ],
            effort: "1-2 hours",
        },
        FindingKind::DuplicateBinding => Template {
            description: "The same type is bound more than once.",
            action_items: &["Remove the duplicate binding or add a qualifier"],
            effort: "30 minutes",
        },
        FindingKind::ScopeMismatch => Template {
            description: "Scope annotations do not match the component they are installed in.",
            action_items: &["Use the scope owned by the @InstallIn component or move the binding"],
            effort: "30 minutes",
        },
        FindingKind::StyleSuggestion => Template {
            description: "Code quality suggestions were reported.",
            action_items: &["Review the suggestions and apply the relevant ones"],
            effort: "30 minutes",
        },
        FindingKind::OperationalFailure => Template {
            description: "A validator failed and its checks did not run.",
            action_items: &[
                "Run with -vv to see the failure",
                "Fix the underlying problem and validate again",
            ],
            effort: "30 minutes",
        },
    }
}

fn recommendation(category: &str, priority: Priority, kind: FindingKind, issues: &[Issue]) -> Recommendation {
    let matching: Vec<&Issue> = issues.iter().filter(|issue| issue.kind == kind).collect();
    let template = template(kind);

    let affected_files: Vec<PathBuf> = matching
        .iter()
        .filter_map(|issue| issue.file.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Recommendation {
        category: category.to_string(),
        priority,
        title: format!("{} ({})", kind.label(), matching.len()),
        description: template.description.to_string(),
        action_items: template.action_items.iter().map(|s| s.to_string()).collect(),
        affected_files,
        estimated_effort: Some(template.effort.to_string()),
    }
}

/// One recommendation per distinct finding type in every category scoring
/// below [`RECOMMENDATION_THRESHOLD`], ordered by priority then category name
pub fn generate_recommendations(
    categories: &[CategoryOverview<'_>],
    summary: &ValidationSummary,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for overview in categories {
        let name = overview.category.name();
        let Some(category_summary) = summary.categories.get(name) else {
            continue;
        };
        if category_summary.score >= RECOMMENDATION_THRESHOLD {
            continue;
        }

        let priority = if category_summary.critical_issues > 0 {
            Priority::High
        } else {
            Priority::Medium
        };

        let kinds: BTreeSet<FindingKind> = overview.issues.iter().map(|issue| issue.kind).collect();
        for kind in kinds {
            recommendations.push(recommendation(name, priority, kind, overview.issues));
        }
    }

    recommendations.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.category.cmp(&b.category))
    });
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::orchestrator::scoring::summarize;
    use std::time::Duration;

    fn overview(category: Category, issues: &[Issue]) -> CategoryOverview<'_> {
        CategoryOverview {
            category,
            validator_name: "mock",
            issues,
            diagnostics: &[],
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_no_recommendations_above_threshold() {
        let issues = vec![Issue::new(FindingKind::ArchitecturalViolation, "v", None)];
        let categories = vec![overview(Category::Imports, &issues)];
        let summary = summarize(&categories);

        assert!(generate_recommendations(&categories, &summary).is_empty());
    }

    #[test]
    fn test_one_recommendation_per_kind_with_priority() {
        let imports: Vec<Issue> = (0..3)
            .map(|i| {
                Issue::new(
                    FindingKind::ArchitecturalViolation,
                    "violation",
                    Some(PathBuf::from(format!("src/File{}.kt", i % 2))),
                )
            })
            .chain(std::iter::once(Issue::new(FindingKind::UnusedImport, "unused", None)))
            .collect();
        let ui: Vec<Issue> = (0..11)
            .map(|_| Issue::new(FindingKind::StateFlow, "state", None))
            .collect();

        let categories = vec![
            overview(Category::UiDataFlow, &ui),
            overview(Category::Imports, &imports),
        ];
        let summary = summarize(&categories);

        let recommendations = generate_recommendations(&categories, &summary);

        assert_eq!(recommendations.len(), 3);
        assert_eq!(recommendations[0].priority, Priority::High);
        assert_eq!(recommendations[0].category, "imports");
        assert!(recommendations[0].title.starts_with("Unused imports"));
        assert!(recommendations[0].affected_files.is_empty());
        assert_eq!(recommendations[1].priority, Priority::High);
        assert_eq!(recommendations[1].title, "Architectural violations (3)");
        assert_eq!(recommendations[1].affected_files.len(), 2);
        assert_eq!(recommendations[2].priority, Priority::Medium);
        assert_eq!(recommendations[2].category, "ui_data_flow");
    }
}
