//! Markdown export implementation.
//!
//! Renders the dependency report as Markdown, including a Mermaid diagram of
//! the module graph.

use super::{ExportData, Exporter};
use crate::analysis::stem_of;
use std::collections::HashMap;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Dependency Analysis Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Root:** `{}`", data.root)?;
        writeln!(writer, "**Language:** {}", data.language)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Modules | {} |", data.module_count())?;
        writeln!(writer, "| Dependencies | {} |", data.dependency_count())?;
        writeln!(writer, "| Circular Dependencies | {} |", data.cycle_count())?;
        writeln!(writer)?;

        if !data.cycles.is_empty() {
            write_cycles(data, writer)?;
        }

        writeln!(writer, "## Dependency Diagram")?;
        writeln!(writer)?;
        write_mermaid(data, writer)?;
        writeln!(writer)?;

        // Module table
        writeln!(writer, "## Modules")?;
        writeln!(writer)?;
        if data.modules.is_empty() {
            writeln!(writer, "_No modules found._")?;
        } else {
            writeln!(writer, "| Module | Imports | Dependents |")?;
            writeln!(writer, "|--------|---------|------------|")?;
            for module in data.modules_by_path() {
                writeln!(
                    writer,
                    "| `{}` | {} | {} |",
                    module.name, module.dependencies, module.dependents
                )?;
            }
        }
        writeln!(writer)?;

        let coupled = data.highly_coupled();
        if !coupled.is_empty() {
            writeln!(
                writer,
                "## Highly Coupled Modules (>= {} dependents)",
                data.options.coupling_threshold
            )?;
            writeln!(writer)?;
            for module in coupled {
                writeln!(
                    writer,
                    "- `{}` - imported by {} modules",
                    module.name, module.dependents
                )?;
            }
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by depscope*")?;

        Ok(())
    }
}

fn write_cycles<W: Write>(data: &ExportData, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "## Circular Dependencies")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "The following circular dependencies were detected ({} strategy):",
        data.cycle_strategy
    )?;
    writeln!(writer)?;

    let limit = data.options.max_listed_cycles;
    for (i, cycle) in data.cycles.iter().take(limit).enumerate() {
        writeln!(writer, "{}. `{}`", i + 1, cycle.stem_chain())?;
    }
    if data.cycles.len() > limit {
        writeln!(writer)?;
        writeln!(
            writer,
            "...and {} more circular dependencies",
            data.cycles.len() - limit
        )?;
    }
    writeln!(writer)
}

/// Writes the Mermaid `graph TD` block.
///
/// Edges are admitted in graph order while fewer than `max_diagram_nodes`
/// nodes have been seen, so a single edge may push the count one past the
/// cap. Node ids follow first-seen order.
fn write_mermaid<W: Write>(data: &ExportData, writer: &mut W) -> io::Result<()> {
    let max_nodes = data.options.max_diagram_nodes;
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    let mut edges: Vec<(usize, usize)> = Vec::new();

    for (from, to) in &data.edges {
        if order.len() >= max_nodes {
            break;
        }
        let from_id = node_id(&mut ids, &mut order, from);
        let to_id = node_id(&mut ids, &mut order, to);
        edges.push((from_id, to_id));
    }

    writeln!(writer, "```mermaid")?;
    writeln!(writer, "graph TD")?;
    for (id, path) in order.iter().enumerate() {
        writeln!(writer, "    N{}[{}]", id, stem_of(path))?;
    }
    for (from, to) in edges {
        writeln!(writer, "    N{} --> N{}", from, to)?;
    }
    writeln!(writer, "```")
}

fn node_id<'a>(ids: &mut HashMap<&'a str, usize>, order: &mut Vec<&'a str>, path: &'a str) -> usize {
    *ids.entry(path).or_insert_with(|| {
        order.push(path);
        order.len() - 1
    })
}
