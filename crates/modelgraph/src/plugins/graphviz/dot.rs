//! Graphviz DOT output with record-shaped model nodes

use crate::core::EdgeStyles;
use crate::graph::{Graph, Node};

/// Generate DOT source for a graph
///
/// Nodes are `record`s labelled `{ Name | col\ncol }`. Relationship edges
/// carry their kind's color and label; inheritance edges only a color.
pub fn to_dot(graph: &Graph, styles: &EdgeStyles) -> String {
    let mut output = String::new();

    output.push_str("digraph schema {\n");
    output.push_str("  node [shape=record];\n");

    if !graph.nodes().is_empty() {
        output.push('\n');
    }

    for node in graph.nodes() {
        output.push_str(&format!(
            "  {} [label=\"{}\"];\n",
            node.id,
            record_label(node)
        ));
    }

    if !graph.edges().is_empty() {
        output.push('\n');
    }

    for edge in graph.edges() {
        let mut attributes = vec![format!("color=\"{}\"", escape_quoted(styles.color(edge.kind)))];
        if edge.kind.is_labelable() {
            if let Some(label) = styles.label(edge.kind) {
                attributes.push(format!("label=\" {}\"", escape_quoted(label)));
            }
        }

        output.push_str(&format!(
            "  {} -> {} [{}];\n",
            edge.from,
            edge.to,
            attributes.join(", ")
        ));
    }

    output.push_str("}\n");
    output
}

/// Record label: title field, then one line per column
fn record_label(node: &Node) -> String {
    let columns: Vec<String> = node
        .column_lines()
        .iter()
        .map(|line| escape_record(line))
        .collect();

    if columns.is_empty() {
        format!("{{ {} | }}", escape_record(&node.name))
    } else {
        format!("{{ {} | {} }}", escape_record(&node.name), columns.join("\\n"))
    }
}

/// Escape text inside a record label field
fn escape_record(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '"' | '{' | '}' | '|' | '<' | '>' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a string for use inside a quoted DOT attribute
fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
