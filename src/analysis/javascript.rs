//! Import analysis using tree-sitter for JavaScript/TypeScript.
//!
//! Collects the module specifiers a file pulls in (ES imports, re-exports,
//! CommonJS `require()` and dynamic `import()`) together with the names of
//! its top-level exported declarations. tree-sitter recovers from syntax
//! errors, so broken files still yield whatever imports are recognisable.

use thiserror::Error;
use tracing::{trace, warn};
use tree_sitter::{Node, Parser, Tree, TreeCursor};

use super::extract::ImportExtractor;
use super::module::Module;

/// Errors that can occur while setting up the analyzer.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Tree-sitter language initialization failed for {0}")]
    LanguageInit(&'static str),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The kind of import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// ES6 import statement: `import ... from 'module'`
    ES6,
    /// Re-export: `export { x } from 'module'`
    ReExport,
    /// CommonJS require: `const x = require('module')`
    CommonJS,
    /// Dynamic import: `import('module')`
    DynamicImport,
}

/// A single import found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The module specifier (e.g., "react", "./utils")
    pub source: String,
    /// The kind of import
    pub kind: ImportKind,
    /// Line number in the source file (1-indexed)
    pub line: usize,
}

/// Grammar flavour, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDialect {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl SourceDialect {
    /// Determine the dialect from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceDialect::JavaScript),
            "jsx" => Some(SourceDialect::Jsx),
            "ts" | "mts" | "cts" => Some(SourceDialect::TypeScript),
            "tsx" => Some(SourceDialect::Tsx),
            _ => None,
        }
    }

    /// Determine the dialect from a relative module path, defaulting to
    /// plain JavaScript.
    pub fn from_path(path: &str) -> Self {
        path.rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(SourceDialect::JavaScript)
    }
}

/// Extractor for JavaScript/TypeScript source files.
pub struct JavaScriptExtractor {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl JavaScriptExtractor {
    /// Create a new extractor with all three grammars loaded.
    pub fn new() -> AnalysisResult<Self> {
        let mut js_parser = Parser::new();
        js_parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|_| AnalysisError::LanguageInit("javascript"))?;

        let mut ts_parser = Parser::new();
        ts_parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|_| AnalysisError::LanguageInit("typescript"))?;

        let mut tsx_parser = Parser::new();
        tsx_parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
            .map_err(|_| AnalysisError::LanguageInit("tsx"))?;

        Ok(Self {
            js_parser,
            ts_parser,
            tsx_parser,
        })
    }

    fn parse(&mut self, source: &str, dialect: SourceDialect) -> Option<Tree> {
        let parser = match dialect {
            SourceDialect::JavaScript | SourceDialect::Jsx => &mut self.js_parser,
            SourceDialect::TypeScript => &mut self.ts_parser,
            SourceDialect::Tsx => &mut self.tsx_parser,
        };
        parser.parse(source, None)
    }

    /// Analyze source code and return its imports in source order.
    pub fn analyze_source(&mut self, source: &str, dialect: SourceDialect) -> Vec<Import> {
        match self.parse(source, dialect) {
            Some(tree) => extract_imports(&tree, source),
            None => Vec::new(),
        }
    }
}

impl ImportExtractor for JavaScriptExtractor {
    fn extract(&mut self, content: &str, path: &str) -> Module {
        let Some(tree) = self.parse(content, SourceDialect::from_path(path)) else {
            warn!(path, "tree-sitter produced no tree; recording module without imports");
            return Module::new(path);
        };

        let imports = extract_imports(&tree, content);
        for import in &imports {
            trace!(path, line = import.line, kind = ?import.kind, source = %import.source, "import");
        }

        Module::new(path)
            .with_imports(imports.into_iter().map(|i| i.source))
            .with_exports(extract_exports(&tree, content))
    }
}

/// Extract imports from a parsed tree.
fn extract_imports(tree: &Tree, source: &str) -> Vec<Import> {
    let mut imports = Vec::new();
    let mut cursor = tree.root_node().walk();
    visit_node(&mut cursor, source, &mut imports);
    imports
}

/// Recursively visit nodes to find imports.
fn visit_node(cursor: &mut TreeCursor, source: &str, imports: &mut Vec<Import>) {
    let node = cursor.node();

    match node.kind() {
        "import_statement" => {
            if let Some(import) = parse_sourced_statement(&node, source, ImportKind::ES6) {
                imports.push(import);
            }
        }
        "export_statement" => {
            if let Some(import) = parse_sourced_statement(&node, source, ImportKind::ReExport) {
                imports.push(import);
            }
        }
        "call_expression" => {
            if let Some(import) = parse_require_or_dynamic_import(&node, source) {
                imports.push(import);
            }
        }
        _ => {}
    }

    if cursor.goto_first_child() {
        loop {
            visit_node(cursor, source, imports);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

/// Parse `import ... from 'x'`, `import 'x'` or `export ... from 'x'`.
fn parse_sourced_statement(node: &Node, source: &str, kind: ImportKind) -> Option<Import> {
    let string = node.child_by_field_name("source")?;
    let module = extract_string_value(&string, source)?;
    if module.is_empty() {
        return None;
    }

    Some(Import {
        source: module,
        kind,
        line: node.start_position().row + 1,
    })
}

/// Parse `require('x')` or `import('x')`.
fn parse_require_or_dynamic_import(node: &Node, source: &str) -> Option<Import> {
    let func_node = node.child_by_field_name("function")?;
    let kind = match node_text(&func_node, source)? {
        "require" => ImportKind::CommonJS,
        "import" => ImportKind::DynamicImport,
        _ => return None,
    };

    let args_node = node.child_by_field_name("arguments")?;
    let mut args_cursor = args_node.walk();
    let string = args_node
        .children(&mut args_cursor)
        .find(|child| child.kind() == "string")?;

    Some(Import {
        source: extract_string_value(&string, source)?,
        kind,
        line: node.start_position().row + 1,
    })
}

/// Names declared by top-level `export` statements.
///
/// `export { a, b }` clauses and re-exports are not counted, only exported
/// declarations.
fn extract_exports(tree: &Tree, source: &str) -> Vec<String> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut exports = Vec::new();

    for statement in root.children(&mut cursor) {
        if statement.kind() != "export_statement" {
            continue;
        }
        let declaration = statement
            .child_by_field_name("declaration")
            .or_else(|| statement.child_by_field_name("value"));
        if let Some(declaration) = declaration {
            declared_names(&declaration, source, &mut exports);
        }
    }

    exports
}

fn declared_names(declaration: &Node, source: &str, names: &mut Vec<String>) {
    match declaration.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = declaration.walk();
            for declarator in declaration.children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = declarator.child_by_field_name("name") {
                    // destructuring patterns are skipped
                    if name.kind() == "identifier" {
                        if let Some(text) = node_text(&name, source) {
                            names.push(text.to_string());
                        }
                    }
                }
            }
        }
        _ => {
            if let Some(name) = declaration.child_by_field_name("name") {
                if let Some(text) = node_text(&name, source) {
                    names.push(text.to_string());
                }
            }
        }
    }
}

/// Extract the text content of a node.
fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Extract string value (removes quotes).
fn extract_string_value(node: &Node, source: &str) -> Option<String> {
    let text = node_text(node, source)?;
    let trimmed = text
        .trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`']);
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str, path: &str) -> Module {
        JavaScriptExtractor::new().unwrap().extract(source, path)
    }

    fn sources(source: &str) -> Vec<String> {
        extract(source, "src/test.js").imports
    }

    // ===== ES6 Import Tests =====

    #[test]
    fn test_default_import() {
        assert_eq!(sources("import React from 'react';"), vec!["react"]);
    }

    #[test]
    fn test_named_and_namespace_imports() {
        let source = r#"
import { useState, useEffect } from 'react';
import * as path from "path";
import Foo, { bar as baz } from './foo';
"#;
        assert_eq!(sources(source), vec!["react", "path", "./foo"]);
    }

    #[test]
    fn test_side_effect_import() {
        assert_eq!(sources("import './styles.css';"), vec!["./styles.css"]);
    }

    #[test]
    fn test_import_kinds_and_lines() {
        let mut extractor = JavaScriptExtractor::new().unwrap();
        let imports = extractor.analyze_source(
            "import a from './a';\nconst b = require('./b');\nexport * from './c';\nimport('./d');\n",
            SourceDialect::JavaScript,
        );

        let kinds: Vec<_> = imports.iter().map(|i| (i.kind, i.line)).collect();
        assert_eq!(
            kinds,
            vec![
                (ImportKind::ES6, 1),
                (ImportKind::CommonJS, 2),
                (ImportKind::ReExport, 3),
                (ImportKind::DynamicImport, 4),
            ]
        );
    }

    // ===== CommonJS Tests =====

    #[test]
    fn test_require() {
        let source = "const React = require('react');\nrequire('./polyfills');\n";
        assert_eq!(sources(source), vec!["react", "./polyfills"]);
    }

    #[test]
    fn test_nested_require_is_found() {
        let source = "function load() {\n  if (x) { return require('./lazy'); }\n}\n";
        assert_eq!(sources(source), vec!["./lazy"]);
    }

    #[test]
    fn test_other_calls_are_ignored() {
        assert!(sources("fetch('./data.json'); console.log('x');").is_empty());
    }

    // ===== Export Tests =====

    #[test]
    fn test_exported_declarations() {
        let source = r#"
export class Store {}
export function createStore() {}
export const a = 1, b = 2;
export let counter = 0;
export default function main() {}
const hidden = 3;
export { hidden };
"#;
        let module = extract(source, "src/store.js");
        assert_eq!(
            module.exports,
            vec!["Store", "createStore", "a", "b", "counter", "main"]
        );
    }

    #[test]
    fn test_typescript_exports() {
        let source = r#"
import type { FC } from 'react';
export interface Props { name: string }
export type Id = string;
export enum Color { Red }
"#;
        let module = extract(source, "src/types.ts");
        assert_eq!(module.imports, vec!["react"]);
        assert_eq!(module.exports, vec!["Props", "Id", "Color"]);
    }

    #[test]
    fn test_tsx_source() {
        let source = "import { Button } from './Button';\nexport const App = () => <Button />;\n";
        let module = extract(source, "src/App.tsx");
        assert_eq!(module.imports, vec!["./Button"]);
        assert_eq!(module.exports, vec!["App"]);
        assert_eq!(module.name, "App");
    }

    // ===== Error tolerance =====

    #[test]
    fn test_malformed_source_is_best_effort() {
        let source = "import a from './a';\nconst = = ;;; {{{\nimport b from './b';\n";
        let imports = sources(source);
        assert!(imports.contains(&"./a".to_string()));
    }

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(SourceDialect::from_path("a/b.tsx"), SourceDialect::Tsx);
        assert_eq!(SourceDialect::from_path("a/b.ts"), SourceDialect::TypeScript);
        assert_eq!(SourceDialect::from_path("a/b.jsx"), SourceDialect::Jsx);
        assert_eq!(SourceDialect::from_path("a/b"), SourceDialect::JavaScript);
    }
}
