//! Diagram splitting through the public API.

use pretty_assertions::assert_eq;

use deckfit::diagram::{graph_stats, split_diagram, SplitRejection};

fn star(leaves: usize) -> String {
    let mut src = String::from("flowchart LR\n");
    for i in 0..leaves {
        src.push_str(&format!("  core --> leaf{i}\n"));
    }
    src
}

fn edge_lines(part: &str) -> usize {
    part.lines().filter(|l| l.contains("-->")).count()
}

#[test]
fn test_star_halves_both_keep_the_hub() {
    for leaves in 4..=9 {
        let split = split_diagram(&star(leaves)).unwrap();
        assert_eq!(split.hub.as_deref(), Some("core"));
        for part in [&split.first, &split.second] {
            assert!(part.starts_with("flowchart LR\n"));
            assert!(part.contains("core"));
            assert!(edge_lines(part) >= 1);
        }
        assert_eq!(edge_lines(&split.first) + edge_lines(&split.second), leaves);
    }
}

#[test]
fn test_split_twice_is_byte_identical() {
    let src = "---\ntitle: Pipeline\n---\nflowchart TD\n  classDef slow fill:#fdd\n  fetch[Fetch] --> parse{Parse}\n  parse -->|ok| load\n  parse -- retry --> fetch\n  load --> report\n  audit --> report\n  style audit stroke:#f00\n  class fetch,audit slow\n";
    let a = split_diagram(src).unwrap();
    let b = split_diagram(src).unwrap();
    assert_eq!(a, b);
    assert!(a.first.starts_with("---\ntitle: Pipeline\n---\nflowchart TD\n"));
    assert!(a.second.starts_with("---\ntitle: Pipeline\n---\nflowchart TD\n"));
    assert!(a.first.contains("classDef slow") && a.second.contains("classDef slow"));
}

#[test]
fn test_disconnected_components_split_without_hub() {
    let src = "graph TD\n  a1 --> a2\n  a2 --> a3\n  b1 --> b2\n  b2 --> b3\n";
    let split = split_diagram(src).unwrap();
    assert_eq!(split.hub, None);
    assert_eq!(split.first, "graph TD\n  a1 --> a2\n  a2 --> a3\n");
    assert_eq!(split.second, "graph TD\n  b1 --> b2\n  b2 --> b3\n");
}

#[test]
fn test_non_flowcharts_are_rejected() {
    for src in ["sequenceDiagram\n  A->>B: hi\n", "pie\n  \"a\": 1\n", "classDiagram\n  A <|-- B\n"] {
        assert_eq!(split_diagram(src).unwrap_err(), SplitRejection::Unsupported);
        assert_eq!(graph_stats(src), None);
    }
}

#[test]
fn test_graph_stats_counts_grouped_edges() {
    let stats = graph_stats("flowchart LR\n  a & b --> c & d\n").unwrap();
    assert_eq!(stats.node_count, 4);
    assert_eq!(stats.edge_count, 4);
}
