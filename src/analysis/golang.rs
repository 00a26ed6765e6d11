//! Regex-based import extraction for Go sources.

use once_cell::sync::Lazy;
use regex::Regex;

use super::extract::ImportExtractor;
use super::module::Module;

static IMPORT_SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^import[ \t]+(?:[\w.]+[ \t]+)?"([^"]+)""#).expect("valid import pattern")
});

static IMPORT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"import\s*\(([^)]*)\)").expect("valid import block pattern"));

/// Extracts single-line and grouped `import` declarations.
///
/// Go has no export list; capitalised identifiers are not collected.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoExtractor;

impl GoExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ImportExtractor for GoExtractor {
    fn extract(&mut self, content: &str, path: &str) -> Module {
        let mut imports: Vec<String> = IMPORT_SINGLE
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect();

        for caps in IMPORT_BLOCK.captures_iter(content) {
            let Some(block) = caps.get(1) else {
                continue;
            };
            for line in block.as_str().lines() {
                let line = line.trim();
                if line.starts_with("//") {
                    continue;
                }
                if let Some(pkg) = first_quoted(line) {
                    imports.push(pkg.to_string());
                }
            }
        }

        Module::new(path).with_imports(imports)
    }
}

/// Returns the contents of the first `"..."` on the line, if any.
fn first_quoted(line: &str) -> Option<&str> {
    let mut parts = line.split('"');
    parts.next()?;
    let quoted = parts.next()?;
    // an opening quote with no closing quote is not an import path
    parts.next()?;
    (!quoted.is_empty()).then_some(quoted)
}
