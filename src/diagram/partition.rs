//! Balanced two-way partition of an undirected graph.
//!
//! Every collection is ordered (`BTreeMap`/`BTreeSet`), so the result
//! depends only on node identifiers and never on hash iteration order.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub(crate) struct Graph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
    edges: Vec<(String, String)>,
}

impl Graph {
    pub(crate) fn add_node(&mut self, id: &str) {
        self.adjacency.entry(id.to_string()).or_default();
    }

    pub(crate) fn add_edge(&mut self, a: &str, b: &str) {
        self.add_node(a);
        self.add_node(b);
        if a != b {
            if let Some(n) = self.adjacency.get_mut(a) {
                n.insert(b.to_string());
            }
            if let Some(n) = self.adjacency.get_mut(b) {
                n.insert(a.to_string());
            }
        }
        self.edges.push((a.to_string(), b.to_string()));
    }

    pub(crate) fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn degree(&self, id: &str) -> usize {
        self.adjacency.get(id).map_or(0, BTreeSet::len)
    }

    fn neighbors(&self, id: &str) -> impl Iterator<Item = &String> {
        self.adjacency.get(id).into_iter().flatten()
    }

    /// Breadth-first order from `start`, neighbors in identifier order.
    fn bfs(&self, start: &str) -> Vec<String> {
        let mut order = Vec::new();
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start.to_string());
        queue.push_back(start.to_string());
        while let Some(id) = queue.pop_front() {
            for next in self.neighbors(&id) {
                if seen.insert(next.clone()) {
                    queue.push_back(next.clone());
                }
            }
            order.push(id);
        }
        order
    }

    /// Connected components, each discovered from its smallest identifier.
    pub(crate) fn components(&self) -> Vec<BTreeSet<String>> {
        let mut assigned = BTreeSet::new();
        let mut components = Vec::new();
        for id in self.adjacency.keys() {
            if assigned.contains(id) {
                continue;
            }
            let component: BTreeSet<String> = self.bfs(id).into_iter().collect();
            assigned.extend(component.iter().cloned());
            components.push(component);
        }
        components
    }

    fn internal_edge_count(&self, group: &BTreeSet<String>) -> usize {
        self.edges
            .iter()
            .filter(|(a, b)| group.contains(a) && group.contains(b))
            .count()
    }

    /// Highest-degree node, ties broken by smallest identifier.
    fn hub(&self) -> Option<&String> {
        let mut best: Option<(&String, usize)> = None;
        for id in self.adjacency.keys() {
            let degree = self.degree(id);
            match best {
                Some((_, d)) if degree <= d => {}
                _ => best = Some((id, degree)),
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Two node groups plus the hub duplicated into both, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Partition {
    pub first: BTreeSet<String>,
    pub second: BTreeSet<String>,
    pub hub: Option<String>,
}

pub(crate) fn bipartition(graph: &Graph) -> Partition {
    let mut components = graph.components();
    // Largest first; equal sizes keep discovery order, which is by id.
    components.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut first = BTreeSet::new();
    let mut second = BTreeSet::new();
    for component in components {
        if second.len() < first.len() {
            second.extend(component);
        } else {
            first.extend(component);
        }
    }

    if second.is_empty() {
        // One connected component: claim half of it breadth-first.
        let Some(start) = graph.adjacency.keys().next() else {
            return Partition {
                first,
                second,
                hub: None,
            };
        };
        let order = graph.bfs(start);
        let claim = order.len().div_ceil(2);
        first = order[..claim].iter().cloned().collect();
        second = order[claim..].iter().cloned().collect();
    }

    let mut hub = None;
    if graph.internal_edge_count(&first) == 0 || graph.internal_edge_count(&second) == 0 {
        if let Some(h) = graph.hub() {
            first.insert(h.clone());
            second.insert(h.clone());
            hub = Some(h.clone());
        }
    }

    Partition { first, second, hub }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> Graph {
        let mut g = Graph::default();
        for (a, b) in edges {
            g.add_edge(a, b);
        }
        g
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_components_sorted_by_first_id() {
        let g = graph(&[("b", "c"), ("x", "y"), ("a", "b")]);
        let comps = g.components();
        assert_eq!(comps, vec![set(&["a", "b", "c"]), set(&["x", "y"])]);
    }

    #[test]
    fn test_components_bin_packed() {
        let g = graph(&[("a", "b"), ("b", "c"), ("d", "e"), ("f", "g")]);
        let p = bipartition(&g);
        assert_eq!(p.first, set(&["a", "b", "c"]));
        assert_eq!(p.second, set(&["d", "e", "f", "g"]));
        assert_eq!(p.hub, None);
    }

    #[test]
    fn test_single_component_split_by_bfs() {
        let g = graph(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "f")]);
        let p = bipartition(&g);
        assert_eq!(p.first, set(&["a", "b", "c"]));
        assert_eq!(p.second, set(&["d", "e", "f"]));
        assert_eq!(p.hub, None);
    }

    #[test]
    fn test_star_duplicates_hub() {
        let g = graph(&[("hub", "a"), ("hub", "b"), ("hub", "c"), ("hub", "d")]);
        let p = bipartition(&g);
        assert_eq!(p.hub.as_deref(), Some("hub"));
        assert!(p.first.contains("hub") && p.second.contains("hub"));
        assert!(g.internal_edge_count(&p.first) > 0);
        assert!(g.internal_edge_count(&p.second) > 0);
    }

    #[test]
    fn test_hub_ties_pick_smallest_id() {
        let g = graph(&[("m", "n"), ("a", "b")]);
        assert_eq!(g.hub().map(String::as_str), Some("a"));
    }
}
