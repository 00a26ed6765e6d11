//! Directory walking and per-file extraction.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::extract::extractor_for;
use super::javascript::AnalysisError;
use super::language::Language;
use super::module::Module;

/// Directory names pruned from every walk.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "__pycache__",
    ".git",
    "venv",
    ".venv",
    "dist",
    "build",
    "vendor",
];

/// Errors that abort a scan before any module is produced.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Scan root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Scan root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// What to scan and how.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory to walk
    pub root: PathBuf,
    /// Language deciding extensions and extractor
    pub language: Language,
    /// Directory names that are never descended into
    pub ignored_dirs: Vec<String>,
}

impl ScanOptions {
    /// Options with the default ignored directories.
    pub fn new(root: impl Into<PathBuf>, language: Language) -> Self {
        Self {
            root: root.into(),
            language,
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|d| d == name)
    }
}

/// Walks `options.root` and extracts a [`Module`] from every matching file.
///
/// Files are visited in file-name order, so the returned modules (and every
/// ordering derived from them later) are deterministic. A file that cannot be
/// read or is not valid UTF-8 is logged and skipped.
///
/// # Errors
///
/// Fails before reading anything if the root is missing or not a directory,
/// or if the extractor for the language cannot be built.
pub fn scan(options: &ScanOptions) -> ScanResult<Vec<Module>> {
    let root = options.root.as_path();
    if !root.exists() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut extractor = extractor_for(options.language)?;
    let mut modules = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // never prune the root itself, whatever it is called
            e.depth() == 0
                || !(e.file_type().is_dir() && options.is_ignored(&e.file_name().to_string_lossy()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !options.language.matches_path(path) {
            continue;
        }

        let rel_path = relative_key(root, path);
        match fs::read_to_string(path) {
            Ok(content) => {
                let module = extractor.extract(&content, &rel_path);
                debug!(
                    path = %rel_path,
                    imports = module.imports.len(),
                    exports = module.exports.len(),
                    "analyzed module"
                );
                modules.push(module);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to analyze file, skipping");
            }
        }
    }

    info!(
        root = %root.display(),
        language = %options.language,
        modules = modules.len(),
        "scan complete"
    );
    Ok(modules)
}

/// Path of `path` relative to `root`, `/`-separated on every platform.
fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
