//! Graphviz DOT visualization for the combined reachability graph.

use std::collections::HashSet;
use std::fmt::Write;

use crate::graph::Reachability;
use crate::store::NodeStore;

/// Generate a Graphviz DOT representation of the combined graph.
///
/// - reachable nodes are lightgreen, dead nodes lightcoral
/// - export-bound nodes are boxes, import-bound nodes are inverted houses
/// - roots get a bold border
pub fn generate_dot(store: &NodeStore, reachable: &Reachability) -> String {
    // ~90 bytes/node + ~40 bytes/edge + header/footer
    let estimated_capacity = (store.len() * 90) + (store.edge_count() * 40) + 150;
    let mut dot = String::with_capacity(estimated_capacity);

    if let Err(e) = write_dot_content(&mut dot, store, reachable) {
        tracing::error!(error = %e, "failed to generate DOT string");
        return "digraph metadce {\n}\n".to_string();
    }

    dot
}

fn write_dot_content(
    dot: &mut String,
    store: &NodeStore,
    reachable: &Reachability,
) -> std::fmt::Result {
    writeln!(dot, "digraph metadce {{")?;
    writeln!(dot, "  rankdir=LR;")?;
    writeln!(dot, "  node [shape=ellipse, style=filled, fontname=\"JetBrains Mono\"];")?;
    writeln!(dot)?;

    for node in store.iter() {
        let color = if reachable.contains(&node.name) {
            "lightgreen"
        } else {
            "lightcoral"
        };
        let shape = if node.export.is_some() {
            "box"
        } else if node.import.is_some() {
            "invhouse"
        } else {
            "ellipse"
        };
        let style = if node.root { "\"filled,bold\"" } else { "filled" };

        let mut label = escape(&node.name);
        if let Some(export) = &node.export {
            label.push_str(&format!("\\nexport {}", escape(export)));
        }
        if let Some(import) = &node.import {
            label.push_str(&format!("\\nimport {}", escape(&import.to_string())));
        }

        writeln!(
            dot,
            "  \"{}\" [label=\"{}\", shape={}, style={}, fillcolor={}];",
            escape(&node.name),
            label,
            shape,
            style,
            color
        )?;
    }

    writeln!(dot)?;

    let mut seen = HashSet::new();
    for node in store.iter() {
        for to in &node.reaches {
            if seen.insert((node.name.as_str(), to.as_str())) {
                writeln!(dot, "  \"{}\" -> \"{}\";", escape(&node.name), escape(to))?;
            }
        }
    }

    writeln!(dot, "}}")?;
    Ok(())
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
