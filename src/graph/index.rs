//! Read-only lookup table over the scanned module set.

use std::collections::HashMap;

use crate::analysis::Module;

/// Stem and path lookups built once per run, before any edge is resolved.
///
/// When two modules share a stem, the one scanned later wins the stem
/// entry. Path order is the scan order and is what relative-import matching
/// walks.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex<'a> {
    by_stem: HashMap<&'a str, &'a str>,
    paths: Vec<&'a str>,
}

impl<'a> ModuleIndex<'a> {
    /// Builds the index over `modules`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depscope::analysis::Module;
    /// use depscope::graph::ModuleIndex;
    ///
    /// let modules = vec![Module::new("pkg/a.py"), Module::new("b.py")];
    /// let index = ModuleIndex::new(&modules);
    /// assert_eq!(index.by_stem("a"), Some("pkg/a.py"));
    /// assert_eq!(index.by_stem("os"), None);
    /// ```
    pub fn new(modules: &'a [Module]) -> Self {
        let mut by_stem = HashMap::with_capacity(modules.len());
        let mut paths = Vec::with_capacity(modules.len());

        for module in modules {
            by_stem.insert(module.name.as_str(), module.path.as_str());
            paths.push(module.path.as_str());
        }

        Self { by_stem, paths }
    }

    /// Path of the module with the given stem.
    pub fn by_stem(&self, stem: &str) -> Option<&'a str> {
        self.by_stem.get(stem).copied()
    }

    /// All module paths in scan order.
    pub fn paths(&self) -> &[&'a str] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
