//! The extractor seam shared by every supported language.

use super::javascript::{AnalysisResult, JavaScriptExtractor};
use super::golang::GoExtractor;
use super::language::Language;
use super::module::Module;
use super::python::PythonExtractor;

/// Turns the text of one source file into a [`Module`].
///
/// Extraction is best-effort: malformed or unexpected syntax yields a
/// shorter import list, never an error.
pub trait ImportExtractor {
    /// Extract imports and exports from `content`, recorded under `path`.
    fn extract(&mut self, content: &str, path: &str) -> Module;
}

/// Builds the extractor for `language`.
///
/// Only the tree-sitter backed JS/TS extractor can fail, when its grammar
/// cannot be loaded.
pub fn extractor_for(language: Language) -> AnalysisResult<Box<dyn ImportExtractor>> {
    Ok(match language {
        Language::Python => Box::new(PythonExtractor::new()),
        Language::TypeScript | Language::JavaScript => Box::new(JavaScriptExtractor::new()?),
        Language::Go => Box::new(GoExtractor::new()),
    })
}
