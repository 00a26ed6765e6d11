//! Source code analysis module for depscope.
//!
//! This module walks a source tree and turns every file of the selected
//! language into a [`Module`]: its relative path, stem, raw import strings
//! and best-effort export names.
//!
//! # Supported Languages
//!
//! - **Python** - regex over `import x` / `from x import y` lines, `__all__`
//! - **JavaScript / TypeScript** - tree-sitter parse of ES imports,
//!   re-exports, `require()` and dynamic `import()`
//! - **Go** - regex over single and grouped `import` declarations
//!
//! # Example
//!
//! ```ignore
//! use depscope::analysis::{scan, Language, ScanOptions};
//!
//! let modules = scan(&ScanOptions::new("./src", Language::Python))?;
//! for module in &modules {
//!     println!("{}: {:?}", module.path, module.imports);
//! }
//! ```

pub mod extract;
pub mod golang;
pub mod javascript;
pub mod language;
pub mod module;
pub mod python;
pub mod scan;

// Re-export main types for convenience
pub use extract::{extractor_for, ImportExtractor};
pub use golang::GoExtractor;
pub use javascript::{AnalysisError, Import, ImportKind, JavaScriptExtractor, SourceDialect};
pub use language::{Language, LanguageError};
pub use module::{stem_of, Module};
pub use python::PythonExtractor;
pub use scan::{scan, ScanError, ScanOptions, ScanResult, DEFAULT_IGNORED_DIRS};
