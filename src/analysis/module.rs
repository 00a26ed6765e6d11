//! The per-file record produced by extraction.

use std::path::Path;

/// One scanned source file and the imports/exports found in it.
///
/// `path` is relative to the scan root and always uses `/` separators, so it
/// doubles as the module's key in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Relative path, e.g. `pkg/utils.py`
    pub path: String,
    /// File stem, e.g. `utils`
    pub name: String,
    /// Raw import strings in source order
    pub imports: Vec<String>,
    /// Exported identifiers (best-effort)
    pub exports: Vec<String>,
}

impl Module {
    /// Creates a module with no imports or exports.
    ///
    /// The name is derived from the path's file stem.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::analysis::Module;
    ///
    /// let module = Module::new("pkg/utils.py");
    /// assert_eq!(module.name, "utils");
    /// assert!(module.imports.is_empty());
    /// ```
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = stem_of(&path).to_string();
        Self {
            path,
            name,
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }

    /// Sets the raw import list.
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the export list.
    pub fn with_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports = exports.into_iter().map(Into::into).collect();
        self
    }
}

/// Returns the file stem of a relative module path (`a/b.py` -> `b`).
pub fn stem_of(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}
