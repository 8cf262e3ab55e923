//! Source scanning utilities shared by the file-system validators

use log::{debug, log_enabled, warn, Level};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::ScanConfig;
use crate::errors::ValidatorError;

static PACKAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*package\s+([\w.]+)\s*;?\s*$").unwrap());

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*import\s+(?:static\s+)?([\w.]+?)(\.\*)?(?:\s+as\s+(\w+))?\s*;?\s*$").unwrap()
});

static DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:class|interface|object|typealias)\s+([A-Z]\w*)").unwrap()
});

/// A parsed import line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLine {
    /// The statement as written, trimmed
    pub statement: String,

    /// Imported path without wildcard (e.g. `com.example.data.UserRepository`)
    pub path: String,

    /// Alias introduced with `as`
    pub alias: Option<String>,

    /// Whether this is a wildcard import
    pub wildcard: bool,

    /// Line number (1-indexed)
    pub line: usize,
}

impl ImportLine {
    /// Name the import introduces into the file
    pub fn simple_name(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    /// Package the import points into
    pub fn package(&self) -> &str {
        if self.wildcard {
            return &self.path;
        }
        match self.path.rfind('.') {
            Some(index) => &self.path[..index],
            None => "",
        }
    }
}

/// A source file with its package and imports parsed
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub package: Option<String>,
    pub imports: Vec<ImportLine>,
    pub content: String,
}

impl SourceFile {
    /// Read and parse a file.
    ///
    /// Content that is not valid UTF-8 (legacy Latin-1 sources) is decoded lossily.
    pub fn load(path: &Path) -> Result<Self, ValidatorError> {
        let bytes = fs::read(path).map_err(|e| ValidatorError::Scan {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => {
                warn!("{} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        Ok(Self::parse(path, content))
    }

    /// Parse already loaded content
    pub fn parse(path: &Path, content: String) -> Self {
        let mut package = None;
        let mut imports = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if package.is_none() {
                if let Some(caps) = PACKAGE_RE.captures(line) {
                    package = Some(caps[1].to_string());
                    continue;
                }
            }

            if let Some(caps) = IMPORT_RE.captures(line) {
                imports.push(ImportLine {
                    statement: line.trim().trim_end_matches(';').to_string(),
                    path: caps[1].to_string(),
                    alias: caps.get(3).map(|m| m.as_str().to_string()),
                    wildcard: caps.get(2).is_some(),
                    line: index + 1,
                });
            }
        }

        Self {
            path: path.to_path_buf(),
            package,
            imports,
            content,
        }
    }

    /// Content without package and import lines
    pub fn body(&self) -> String {
        self.content
            .lines()
            .filter(|line| !PACKAGE_RE.is_match(line) && !IMPORT_RE.is_match(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Names of classes, interfaces and objects declared in this file
    pub fn declared_types(&self) -> Vec<String> {
        DECLARATION_RE
            .captures_iter(&self.content)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// File name without extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Whether the file imports `qualified` exactly or through a wildcard
    pub fn imports_qualified(&self, qualified: &str) -> bool {
        let package = qualified.rsplit_once('.').map(|(p, _)| p).unwrap_or("");
        self.imports.iter().any(|import| {
            (!import.wildcard && import.path == qualified) || (import.wildcard && import.path == package)
        })
    }
}

/// All source files of a project
#[derive(Debug, Clone)]
pub struct SourceTree {
    files: Vec<SourceFile>,
}

impl SourceTree {
    /// Scan and parse every matching source file under `root`
    pub fn scan(root: &Path, config: &ScanConfig) -> Result<Self, ValidatorError> {
        let paths = collect_source_files(root, config)?;

        let mut files = paths
            .par_iter()
            .map(|path| SourceFile::load(path))
            .collect::<Result<Vec<_>, _>>()?;
        files.sort_by(|a, b| a.path.cmp(&b.path));

        debug!("Parsed {} source files under {:?}", files.len(), root);

        Ok(Self { files })
    }

    /// Build a tree from already parsed files
    pub fn from_files(mut files: Vec<SourceFile>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self { files }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Every type name declared anywhere in the project
    pub fn declared_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .files
            .iter()
            .flat_map(|file| file.declared_types())
            .collect();
        types.sort();
        types.dedup();
        types
    }
}

/// Collect files with a configured extension, respecting `.gitignore` and excluded directories
pub fn collect_source_files(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>, ValidatorError> {
    if !root.is_dir() {
        return Err(ValidatorError::Scan {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let exclude_dirs = config.exclude_dirs.clone();

    let mut walker_builder = ignore::WalkBuilder::new(root);
    walker_builder
        .hidden(false) // Don't ignore hidden files by default
        .git_ignore(true) // Respect .gitignore
        .git_global(false)
        .git_exclude(true) // Respect .git/info/exclude
        .require_git(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            let name = entry.file_name().to_string_lossy();
            !(is_dir && (name == ".git" || exclude_dirs.iter().any(|d| *d == name)))
        });

    let mut files = Vec::new();
    let mut skipped = 0;

    for entry in walker_builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                skipped += 1;
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| config.extensions.iter().any(|wanted| wanted == ext));

        if matches_extension {
            files.push(path.to_path_buf());
        }
    }

    if log_enabled!(Level::Debug) {
        debug!(
            "Collected {} source files under {:?} ({} entries skipped)",
            files.len(),
            root,
            skipped
        );
    }

    files.sort();
    Ok(files)
}

/// Find files with the given name anywhere under `root`, skipping build output
pub fn find_files_named(root: &Path, name: &str, config: &ScanConfig) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = ignore::WalkBuilder::new(root)
        .hidden(false)
        .require_git(false)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| path.file_name().is_some_and(|n| n == name))
        .filter(|path| {
            !path.components().any(|c| match c {
                Component::Normal(segment) => {
                    let segment = segment.to_string_lossy();
                    segment == ".git" || config.exclude_dirs.iter().any(|d| *d == segment)
                }
                _ => false,
            })
        })
        .collect();
    found.sort();
    found
}

/// Whether `word` occurs in `text` with no identifier characters on either side
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }

    let is_ident = |c: char| c.is_alphanumeric() || c == '_';

    text.match_indices(word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// Path relative to `root` for display, falling back to the full path
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
