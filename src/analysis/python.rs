//! Regex-based import extraction for Python sources.
//!
//! Only top-level (unindented) `import` and `from ... import` lines are
//! recognised. Imports nested in functions or conditionals are not
//! evaluated, and anything the patterns do not match is simply skipped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::extract::ImportExtractor;
use super::module::Module;

static IMPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:from\s+([\w.]+)\s+)?import\s+(.+)$").expect("valid import pattern")
});

static ALL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__all__\s*=\s*\[([^\]]+)\]").expect("valid __all__ pattern"));

/// Extracts `import` / `from ... import` statements and `__all__` exports.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ImportExtractor for PythonExtractor {
    fn extract(&mut self, content: &str, path: &str) -> Module {
        let mut imports = Vec::new();

        for caps in IMPORT_PATTERN.captures_iter(content) {
            let names = caps.get(2).map_or("", |m| m.as_str());

            match caps.get(1).map(|m| m.as_str()) {
                // `from . import a, b` names sibling modules directly
                Some(from) if from.chars().all(|c| c == '.') => {
                    let before = imports.len();
                    for name in imported_names(names).filter(|n| *n != "*") {
                        imports.push(format!("{from}{name}"));
                    }
                    if imports.len() == before {
                        imports.push(from.to_string());
                    }
                }
                Some(from) => imports.push(from.to_string()),
                None => {
                    for name in imported_names(names) {
                        let top = name.split('.').next().unwrap_or(name);
                        imports.push(top.to_string());
                    }
                }
            }
        }

        let exports: Vec<String> = ALL_PATTERN
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|list| {
                list.as_str()
                    .split(',')
                    .map(|s| s.trim().trim_matches(|c: char| c == '\'' || c == '"'))
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Module::new(path)
            .with_imports(imports)
            .with_exports(exports)
    }
}

/// Splits `a, b as c, (d` into `a`, `b`, `d`.
fn imported_names(names: &str) -> impl Iterator<Item = &str> {
    names.split(',').filter_map(|raw| {
        let raw = raw.split('#').next().unwrap_or("");
        let name = raw
            .trim()
            .trim_matches(|c: char| c == '(' || c == ')' || c == '\\')
            .split(" as ")
            .next()
            .unwrap_or("")
            .trim();
        (!name.is_empty()).then_some(name)
    })
}
