//! # Diagram Splitter
//!
//! Splits a flowchart source that is too dense for one slide into two
//! standalone flowcharts.
//!
//! The source is classified line by line ([`parse`]), an undirected graph
//! is built over every referenced node, the graph is cut in two
//! ([`partition`]), and each half is re-emitted from the original lines in
//! source order. Lines that are global to the diagram go into both halves.
//! Lines that index edges by position (`linkStyle`) and grouping
//! constructs (`subgraph`/`end`) are dropped.
//!
//! The whole pipeline uses ordered collections only, so splitting the same
//! source twice yields byte-identical output.

pub(crate) mod parse;
pub(crate) mod partition;

use std::collections::BTreeSet;

use self::parse::{LineKind, ParsedDiagram};
use self::partition::{bipartition, Graph};

/// Why a diagram source could not be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SplitRejection {
    #[error("only flowchart and graph diagrams can be split")]
    Unsupported,

    #[error("a diagram needs at least two nodes to be split")]
    TooFewNodes,

    #[error("one half of the split would contain neither nodes nor edges")]
    Degenerate,
}

/// Node and edge counts of a flowchart source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}

/// The two halves of a split diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSplit {
    pub first: String,
    pub second: String,
    pub first_nodes: Vec<String>,
    pub second_nodes: Vec<String>,
    /// Node duplicated into both halves to keep each one connected.
    pub hub: Option<String>,
}

/// Counts the nodes and edges of a flowchart source. `None` for sources
/// that are not flowcharts.
pub fn graph_stats(source: &str) -> Option<GraphStats> {
    let parsed = parse::parse(source).ok()?;
    let graph = build_graph(&parsed);
    Some(GraphStats {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
    })
}

/// Split a flowchart source into two standalone flowcharts.
pub fn split_diagram(source: &str) -> Result<DiagramSplit, SplitRejection> {
    let parsed = parse::parse(source)?;
    let graph = build_graph(&parsed);
    if graph.node_count() < 2 {
        return Err(SplitRejection::TooFewNodes);
    }

    let partition = bipartition(&graph);
    let first = emit(&parsed, &partition.first, true).ok_or(SplitRejection::Degenerate)?;
    let second = emit(&parsed, &partition.second, false).ok_or(SplitRejection::Degenerate)?;

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        first = partition.first.len(),
        second = partition.second.len(),
        hub = partition.hub.as_deref().unwrap_or("-"),
        "split diagram"
    );

    Ok(DiagramSplit {
        first,
        second,
        first_nodes: partition.first.into_iter().collect(),
        second_nodes: partition.second.into_iter().collect(),
        hub: partition.hub,
    })
}

fn build_graph(parsed: &ParsedDiagram<'_>) -> Graph {
    let mut graph = Graph::default();
    for line in parsed.body() {
        for id in line.kind.node_refs() {
            graph.add_node(id);
        }
        for (a, b) in line.kind.edge_pairs() {
            graph.add_edge(a, b);
        }
    }
    graph
}

/// Re-emit the lines belonging to `group`. `None` when the result would
/// hold no node or edge line.
fn emit(parsed: &ParsedDiagram<'_>, group: &BTreeSet<String>, keep_unknown: bool) -> Option<String> {
    let mut out: Vec<String> = parsed.preamble().map(|l| l.text.to_string()).collect();
    let mut has_graph_lines = false;

    for line in parsed.body() {
        match &line.kind {
            LineKind::Global => out.push(line.text.to_string()),
            LineKind::Node(id) | LineKind::NodeStyle(id) => {
                if group.contains(id) {
                    has_graph_lines |= matches!(line.kind, LineKind::Node(_));
                    out.push(line.text.to_string());
                }
            }
            LineKind::ClassAssign { indent, ids, class } => {
                let kept: Vec<&str> = ids
                    .iter()
                    .filter(|id| group.contains(*id))
                    .map(String::as_str)
                    .collect();
                if !kept.is_empty() {
                    out.push(format!("{indent}class {} {class}", kept.join(",")));
                }
            }
            LineKind::Edge(_) => {
                if line.kind.node_refs().iter().all(|id| group.contains(*id)) {
                    has_graph_lines = true;
                    out.push(line.text.to_string());
                }
            }
            LineKind::Unknown => {
                if keep_unknown {
                    out.push(line.text.to_string());
                }
            }
            LineKind::Dropped | LineKind::Preamble | LineKind::Header => {}
        }
    }

    if !has_graph_lines {
        return None;
    }
    let mut text = out.join("\n");
    text.push('\n');
    Some(text)
}
