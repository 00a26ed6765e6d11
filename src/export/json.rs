//! JSON export implementation.
//!
//! Exports dependency analysis results in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Scan metadata for JSON output.
#[derive(Serialize)]
struct JsonScan {
    root: String,
    language: String,
    cycle_strategy: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    modules: usize,
    dependencies: usize,
    circular_dependencies: usize,
}

/// Serializable module row for JSON output.
#[derive(Serialize)]
struct JsonModule {
    path: String,
    name: String,
    raw_imports: usize,
    exports: usize,
    imports: usize,
    dependents: usize,
    in_cycle: bool,
}

/// Serializable edge for JSON output.
#[derive(Serialize)]
struct JsonEdge {
    from: String,
    to: String,
}

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle {
    modules: Vec<String>,
    path: String,
}

/// Highly coupled module entry for JSON output.
#[derive(Serialize)]
struct JsonCoupled {
    path: String,
    dependents: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    scan: JsonScan,
    summary: JsonSummary,
    modules: Vec<JsonModule>,
    edges: Vec<JsonEdge>,
    circular_dependencies: Vec<JsonCycle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    highly_coupled: Vec<JsonCoupled>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let modules: Vec<JsonModule> = data
            .modules_by_path()
            .into_iter()
            .map(|m| JsonModule {
                path: m.path.clone(),
                name: m.name.clone(),
                raw_imports: m.raw_imports,
                exports: m.exports,
                imports: m.dependencies,
                dependents: m.dependents,
                in_cycle: m.in_cycle,
            })
            .collect();

        let edges: Vec<JsonEdge> = data
            .edges
            .iter()
            .map(|(from, to)| JsonEdge {
                from: from.clone(),
                to: to.clone(),
            })
            .collect();

        let circular_dependencies: Vec<JsonCycle> = data
            .cycles
            .iter()
            .map(|c| JsonCycle {
                modules: c.nodes.clone(),
                path: c.cycle_path(),
            })
            .collect();

        let highly_coupled: Vec<JsonCoupled> = data
            .highly_coupled()
            .into_iter()
            .map(|m| JsonCoupled {
                path: m.path.clone(),
                dependents: m.dependents,
            })
            .collect();

        let export = JsonExport {
            scan: JsonScan {
                root: data.root.clone(),
                language: data.language.to_string(),
                cycle_strategy: data.cycle_strategy.to_string(),
            },
            summary: JsonSummary {
                modules: data.module_count(),
                dependencies: data.dependency_count(),
                circular_dependencies: data.cycle_count(),
            },
            modules,
            edges,
            circular_dependencies,
            highly_coupled,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Module;
    use crate::export::test_support::{data_for, hub_and_spokes};

    fn render(data: &ExportData) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(data, &mut output).unwrap();
        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn test_json_export_basic() {
        let modules = vec![Module::new("x.py").with_imports(["y", "os"]), Module::new("y.py")];
        let parsed = render(&data_for(&modules));

        assert_eq!(parsed["scan"]["root"], "src");
        assert_eq!(parsed["scan"]["language"], "python");
        assert_eq!(parsed["scan"]["cycle_strategy"], "traversal");
        assert_eq!(parsed["summary"]["modules"], 2);
        assert_eq!(parsed["summary"]["dependencies"], 1);
        assert_eq!(parsed["summary"]["circular_dependencies"], 0);
    }

    #[test]
    fn test_json_export_modules_and_edges() {
        let modules = vec![Module::new("y.py"), Module::new("x.py").with_imports(["y", "os"])];
        let parsed = render(&data_for(&modules));

        let rows = parsed["modules"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["path"], "x.py");
        assert_eq!(rows[0]["raw_imports"], 2);
        assert_eq!(rows[0]["imports"], 1);
        assert_eq!(rows[1]["dependents"], 1);

        let edges = parsed["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0]["from"], "x.py");
        assert_eq!(edges[0]["to"], "y.py");
    }

    #[test]
    fn test_json_export_with_cycles() {
        let modules = vec![
            Module::new("a.py").with_imports(["b"]),
            Module::new("b.py").with_imports(["a"]),
        ];
        let parsed = render(&data_for(&modules));

        let cycles = parsed["circular_dependencies"].as_array().unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0]["path"], "a.py → b.py → a.py");
        assert_eq!(parsed["modules"][0]["in_cycle"], true);
    }

    #[test]
    fn test_json_export_highly_coupled() {
        let parsed = render(&data_for(&hub_and_spokes(5)));
        assert_eq!(parsed["highly_coupled"][0]["path"], "hub.py");
        assert_eq!(parsed["highly_coupled"][0]["dependents"], 5);

        let parsed = render(&data_for(&hub_and_spokes(4)));
        assert!(parsed.get("highly_coupled").is_none());
    }

    #[test]
    fn test_json_export_empty() {
        let parsed = render(&data_for(&[]));
        assert_eq!(parsed["summary"]["modules"], 0);
        assert!(parsed["modules"].as_array().unwrap().is_empty());
        assert!(parsed["circular_dependencies"].as_array().unwrap().is_empty());
    }
}
