use std::collections::HashSet;

use crate::model::ArchGraph;

pub fn edge_key(source: &str, target: &str) -> String {
    format!("{source}-{target}")
}

/// Emphasized nodes and edges. Empty means nothing is dimmed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet {
    pub nodes: HashSet<String>,
    pub edges: HashSet<String>,
}

impl HighlightSet {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges.contains(&edge_key(source, target))
    }

    /// Selection highlight: the node, every neighbor in either direction,
    /// and every edge touching it.
    pub fn neighborhood(graph: &ArchGraph, id: &str) -> Self {
        let mut set = Self::default();
        if !graph.contains(id) {
            return set;
        }
        set.nodes.insert(id.to_owned());
        for edge in graph.edges_touching(id) {
            set.nodes.insert(edge.source.clone());
            set.nodes.insert(edge.target.clone());
            set.edges.insert(edge_key(&edge.source, &edge.target));
        }
        set
    }

    /// The node plus the sources of its incoming edges.
    pub fn dependencies(graph: &ArchGraph, id: &str) -> Self {
        let mut set = Self::default();
        if !graph.contains(id) {
            return set;
        }
        set.nodes.insert(id.to_owned());
        for edge in graph.incoming(id) {
            set.nodes.insert(edge.source.clone());
            set.edges.insert(edge_key(&edge.source, &edge.target));
        }
        set
    }

    /// The node plus the targets of its outgoing edges.
    pub fn dependents(graph: &ArchGraph, id: &str) -> Self {
        let mut set = Self::default();
        if !graph.contains(id) {
            return set;
        }
        set.nodes.insert(id.to_owned());
        for edge in graph.outgoing(id) {
            set.nodes.insert(edge.target.clone());
            set.edges.insert(edge_key(&edge.source, &edge.target));
        }
        set
    }

    /// Exactly one edge and its two endpoints, replacing whatever was
    /// highlighted before.
    pub fn single_edge(source: &str, target: &str) -> Self {
        let mut set = Self::default();
        set.nodes.insert(source.to_owned());
        set.nodes.insert(target.to_owned());
        set.edges.insert(edge_key(source, target));
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphEdge, GraphNode, NodeKind};

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_owned(),
            kind: NodeKind::Module,
            name: id.to_owned(),
            path: None,
            depends_on: Vec::new(),
            imports: Vec::new(),
        }
    }

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            source: source.to_owned(),
            target: target.to_owned(),
            kind: "import".to_owned(),
        }
    }

    fn fixture() -> ArchGraph {
        ArchGraph::new(
            vec![node("a"), node("b"), node("n"), node("c"), node("x")],
            vec![edge("a", "n"), edge("b", "n"), edge("n", "c")],
        )
    }

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn dependencies_cover_incoming_sources_only() {
        let set = HighlightSet::dependencies(&fixture(), "n");
        assert_eq!(set.nodes, ids(&["n", "a", "b"]));
        assert_eq!(set.edges, ids(&["a-n", "b-n"]));
    }

    #[test]
    fn dependents_cover_outgoing_targets_only() {
        let set = HighlightSet::dependents(&fixture(), "n");
        assert_eq!(set.nodes, ids(&["n", "c"]));
        assert_eq!(set.edges, ids(&["n-c"]));
    }

    #[test]
    fn neighborhood_covers_both_directions() {
        let set = HighlightSet::neighborhood(&fixture(), "n");
        assert_eq!(set.nodes, ids(&["n", "a", "b", "c"]));
        assert_eq!(set.edges, ids(&["a-n", "b-n", "n-c"]));
        assert!(!set.contains_node("x"));
    }

    #[test]
    fn single_edge_replaces_a_wider_highlight() {
        let graph = fixture();
        let mut set = HighlightSet::neighborhood(&graph, "n");
        assert!(set.nodes.len() > 2);
        set = HighlightSet::single_edge("a", "n");
        assert_eq!(set.nodes, ids(&["a", "n"]));
        assert_eq!(set.edges, ids(&["a-n"]));
    }

    #[test]
    fn duplicate_parallel_edges_collapse_to_one_key() {
        let graph = ArchGraph::new(
            vec![node("a"), node("n")],
            vec![edge("a", "n"), edge("a", "n")],
        );
        let set = HighlightSet::neighborhood(&graph, "n");
        assert_eq!(set.edges.len(), 1);
        assert!(set.contains_edge("a", "n"));
    }

    #[test]
    fn unknown_node_yields_empty_set() {
        let set = HighlightSet::neighborhood(&fixture(), "ghost");
        assert!(set.is_empty());
    }
}
