//! Source language selection.
//!
//! The language decides which file extensions are scanned and which
//! extractor runs over each file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Error returned when a language selector is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language: '{0}'. Valid languages: python, typescript, javascript, go")]
pub struct LanguageError(pub String);

/// A language the scanner knows how to extract imports from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    TypeScript,
    JavaScript,
    Go,
}

impl Language {
    /// File extensions (without the dot) scanned for this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::TypeScript => &["ts", "tsx"],
            Language::JavaScript => &["js", "jsx"],
            Language::Go => &["go"],
        }
    }

    /// Returns true if `path` carries one of this language's extensions.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }

    /// Separator between the segments of a non-relative import string.
    ///
    /// Python packages are dotted (`pkg.sub`), JS and Go specifiers are
    /// slash separated (`lib/util`, `example.com/mod/pkg`).
    pub fn segment_separator(&self) -> char {
        match self {
            Language::Python => '.',
            Language::TypeScript | Language::JavaScript | Language::Go => '/',
        }
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "javascript" | "js" => Ok(Language::JavaScript),
            "go" | "golang" => Ok(Language::Go),
            _ => Err(LanguageError(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::TypeScript => write!(f, "typescript"),
            Language::JavaScript => write!(f, "javascript"),
            Language::Go => write!(f, "go"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("TypeScript".parse::<Language>().unwrap(), Language::TypeScript);
        assert_eq!("javascript".parse::<Language>().unwrap(), Language::JavaScript);
        assert_eq!("go".parse::<Language>().unwrap(), Language::Go);
    }

    #[test]
    fn test_language_from_str_unsupported() {
        let err = "rust".parse::<Language>().unwrap_err();
        assert_eq!(err, LanguageError("rust".to_string()));
        assert!(err.to_string().contains("Unsupported language: 'rust'"));
    }

    #[test]
    fn test_language_display_round_trips() {
        for lang in [
            Language::Python,
            Language::TypeScript,
            Language::JavaScript,
            Language::Go,
        ] {
            assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn test_matches_path() {
        assert!(Language::Python.matches_path(Path::new("pkg/a.py")));
        assert!(!Language::Python.matches_path(Path::new("pkg/a.pyc")));
        assert!(Language::TypeScript.matches_path(Path::new("src/App.tsx")));
        assert!(!Language::TypeScript.matches_path(Path::new("src/app.js")));
        assert!(Language::JavaScript.matches_path(Path::new("src/app.jsx")));
        assert!(Language::Go.matches_path(Path::new("cmd/main.go")));
        assert!(!Language::Go.matches_path(Path::new("Makefile")));
    }
}
