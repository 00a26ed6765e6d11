//! Heuristic mapping of raw import strings onto scanned module paths.
//!
//! Handles the common cases (sibling and child files, parent-relative
//! imports, top-level local packages). Aliasing, package re-exports and
//! namespace packages are not modelled; anything unresolved is treated as
//! external and produces no edge.

use crate::analysis::{stem_of, Language};

use super::index::ModuleIndex;

/// Resolves `import`, written in the module at `from`, to a module path.
///
/// Returns `None` for external packages and for relative imports with no
/// matching file.
///
/// # Example
///
/// ```rust
/// use depscope::analysis::{Language, Module};
/// use depscope::graph::{resolve_import, ModuleIndex};
///
/// let modules = vec![Module::new("pkg/a.py"), Module::new("pkg/b.py")];
/// let index = ModuleIndex::new(&modules);
///
/// assert_eq!(resolve_import(".b", "pkg/a.py", Language::Python, &index), Some("pkg/b.py"));
/// assert_eq!(resolve_import("os", "pkg/a.py", Language::Python, &index), None);
/// ```
pub fn resolve_import<'a>(
    import: &str,
    from: &str,
    language: Language,
    index: &ModuleIndex<'a>,
) -> Option<&'a str> {
    if import.starts_with('.') {
        let (target, remainder) = match language {
            Language::Python => python_relative_target(import, from),
            _ => path_relative_target(import, from),
        };
        return match_relative(&target, &remainder, from, index);
    }

    let first = import
        .split(language.segment_separator())
        .next()
        .unwrap_or(import);
    index.by_stem(first)
}

/// `..core.base` in `pkg/sub/x.py` -> (`pkg/core/base`, `core.base`).
///
/// The first dot is the current package; every further dot climbs one
/// directory.
fn python_relative_target(import: &str, from: &str) -> (String, String) {
    let remainder = import.trim_start_matches('.');
    let dots = import.len() - remainder.len();

    let mut dir = parent_dir(from);
    for _ in 1..dots {
        dir = parent_dir(dir);
    }

    (join(dir, &remainder.replace('.', "/")), remainder.to_string())
}

/// `../lib/x` in `src/app/main.js` -> (`src/lib/x`, `lib/x`).
fn path_relative_target(import: &str, from: &str) -> (String, String) {
    let mut dir = parent_dir(from);
    let mut segments = import.split('/').peekable();

    while let Some(&segment) = segments.peek() {
        match segment {
            "." | "" => {}
            ".." => dir = parent_dir(dir),
            _ => break,
        }
        segments.next();
    }

    let remainder = segments.collect::<Vec<_>>().join("/");
    (join(dir, &remainder), remainder)
}

/// First module (scan order) matching `target`, never `from` itself.
///
/// A module that is exactly the target file (`target` plus one extension)
/// is preferred; otherwise the first path under the target prefix, or whose
/// stem equals `remainder`, wins.
fn match_relative<'a>(
    target: &str,
    remainder: &str,
    from: &str,
    index: &ModuleIndex<'a>,
) -> Option<&'a str> {
    let candidates = || index.paths().iter().copied().filter(move |p| *p != from);

    if let Some(exact) = candidates().find(|p| is_file_of(p, target)) {
        return Some(exact);
    }

    candidates().find(|p| {
        has_path_prefix(p, target) || (!remainder.is_empty() && stem_of(p) == remainder)
    })
}

/// `pkg/b.py` is the file of `pkg/b`; `pkg/b.test.py` and `pkg/b/c.py` are not.
fn is_file_of(path: &str, target: &str) -> bool {
    if target.is_empty() {
        return false;
    }
    path.strip_prefix(target).is_some_and(|rest| {
        rest.is_empty() || (rest.starts_with('.') && !rest[1..].contains(['.', '/']))
    })
}

/// Prefix match on a path boundary, so `pkg/b` does not match `pkg/bar.py`.
fn has_path_prefix(path: &str, target: &str) -> bool {
    if target.is_empty() {
        return true;
    }
    path.strip_prefix(target)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.') || rest.starts_with('/'))
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

fn join(dir: &str, rest: &str) -> String {
    match (dir.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => dir.to_string(),
        (false, false) => format!("{dir}/{rest}"),
    }
}
