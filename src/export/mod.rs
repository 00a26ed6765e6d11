//! Report rendering for dependency analysis results.
//!
//! This module provides exporters for outputting the scanned modules, the
//! resolved graph and detected cycles in Markdown or JSON.

pub mod json;
pub mod markdown;

use crate::analysis::{Language, Module};
use crate::graph::{Cycle, CycleStrategy, DependencyGraph};
use std::collections::HashSet;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    #[default]
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Limits applied while rendering a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Node cap for the dependency diagram
    pub max_diagram_nodes: usize,
    /// How many cycles the Markdown report lists individually
    pub max_listed_cycles: usize,
    /// Minimum dependent count for a module to count as highly coupled
    pub coupling_threshold: usize,
    /// How many highly coupled modules are listed
    pub max_coupled_modules: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_diagram_nodes: 50,
            max_listed_cycles: 5,
            coupling_threshold: 5,
            max_coupled_modules: 10,
        }
    }
}

/// Per-module row of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    /// Relative module path
    pub path: String,
    /// File stem
    pub name: String,
    /// Raw import statements found in the file
    pub raw_imports: usize,
    /// Exported names found in the file
    pub exports: usize,
    /// Resolved in-repo modules this module imports (out-degree)
    pub dependencies: usize,
    /// Modules importing this one (in-degree)
    pub dependents: usize,
    /// Whether the module sits in a strongly connected cycle
    pub in_cycle: bool,
}

/// Data container for export operations.
///
/// Holds everything a report needs, computed once from the analysis results.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Scan root as given by the user
    pub root: String,
    /// Language that was scanned
    pub language: Language,
    /// Strategy the cycles were detected with
    pub cycle_strategy: CycleStrategy,
    /// One row per module, in scan order
    pub modules: Vec<ModuleSummary>,
    /// Resolved edges as `(from, to)` module paths, in graph order
    pub edges: Vec<(String, String)>,
    /// Detected circular dependencies
    pub cycles: Vec<Cycle>,
    /// Rendering limits
    pub options: ReportOptions,
}

impl ExportData {
    /// Create new export data from analysis results.
    pub fn new(
        root: impl Into<String>,
        language: Language,
        modules: &[Module],
        graph: &DependencyGraph,
        cycle_strategy: CycleStrategy,
        cycles: Vec<Cycle>,
    ) -> Self {
        let cyclic: HashSet<String> = graph.get_nodes_in_cycles();

        let modules = modules
            .iter()
            .map(|m| ModuleSummary {
                path: m.path.clone(),
                name: m.name.clone(),
                raw_imports: m.imports.len(),
                exports: m.exports.len(),
                dependencies: graph.out_degree(&m.path),
                dependents: graph.in_degree(&m.path),
                in_cycle: cyclic.contains(&m.path),
            })
            .collect();

        let edges = graph
            .edges()
            .into_iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();

        Self {
            root: root.into(),
            language,
            cycle_strategy,
            modules,
            edges,
            cycles,
            options: ReportOptions::default(),
        }
    }

    /// Replace the rendering limits.
    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of scanned modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Number of resolved module-to-module dependencies
    pub fn dependency_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of detected cycles
    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    /// Modules ordered by path, as listed in the module table.
    pub fn modules_by_path(&self) -> Vec<&ModuleSummary> {
        let mut modules: Vec<_> = self.modules.iter().collect();
        modules.sort_by(|a, b| a.path.cmp(&b.path));
        modules
    }

    /// Modules with at least `coupling_threshold` dependents, most depended
    /// on first, capped at `max_coupled_modules`. Ties keep scan order.
    pub fn highly_coupled(&self) -> Vec<&ModuleSummary> {
        let mut coupled: Vec<_> = self
            .modules
            .iter()
            .filter(|m| m.dependents >= self.options.coupling_threshold)
            .collect();
        coupled.sort_by(|a, b| b.dependents.cmp(&a.dependents));
        coupled.truncate(self.options.max_coupled_modules);
        coupled
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_degrees_for_simple_import() {
        let modules = vec![Module::new("x.py").with_imports(["y"]), Module::new("y.py")];
        let data = data_for(&modules);

        let x = &data.modules[0];
        let y = &data.modules[1];
        assert_eq!((x.dependencies, x.dependents), (1, 0));
        assert_eq!((y.dependencies, y.dependents), (0, 1));
        assert!(data.highly_coupled().is_empty());
    }

    #[test]
    fn test_highly_coupled_threshold_and_order() {
        let mut modules = hub_and_spokes(6);
        // a second, less coupled hub at exactly the threshold
        modules.push(Module::new("core.py"));
        for i in 0..5 {
            modules.push(Module::new(format!("user{i}.py")).with_imports(["core"]));
        }
        let data = data_for(&modules);

        let coupled: Vec<_> = data
            .highly_coupled()
            .iter()
            .map(|m| (m.name.as_str(), m.dependents))
            .collect();
        assert_eq!(coupled, vec![("hub", 6), ("core", 5)]);
    }

    #[test]
    fn test_highly_coupled_cap() {
        let data = data_for(&hub_and_spokes(6)).with_options(ReportOptions {
            coupling_threshold: 1,
            max_coupled_modules: 0,
            ..ReportOptions::default()
        });
        assert!(data.highly_coupled().is_empty());
    }

    #[test]
    fn test_empty_data() {
        let data = data_for(&[]);
        assert_eq!(data.module_count(), 0);
        assert_eq!(data.dependency_count(), 0);
        assert_eq!(data.cycle_count(), 0);
    }

    #[test]
    fn test_modules_by_path() {
        let modules = vec![Module::new("b.py"), Module::new("a/z.py"), Module::new("a.py")];
        let data = data_for(&modules);
        let paths: Vec<_> = data.modules_by_path().iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["a.py", "a/z.py", "b.py"]);
    }

    #[test]
    fn test_in_cycle_flag() {
        let modules = vec![
            Module::new("a.py").with_imports(["b"]),
            Module::new("b.py").with_imports(["a", "c"]),
            Module::new("c.py"),
        ];
        let data = data_for(&modules);
        let flags: Vec<_> = data.modules.iter().map(|m| m.in_cycle).collect();
        assert_eq!(flags, vec![true, true, false]);
    }
}
