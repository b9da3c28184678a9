use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Component,
    Module,
    Service,
    Library,
    External,
    #[default]
    Other,
}

impl NodeKind {
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "component" => Self::Component,
            "module" => Self::Module,
            "service" => Self::Service,
            "library" | "lib" => Self::Library,
            "external" | "vendor" => Self::External,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Module => "module",
            Self::Service => "service",
            Self::Library => "library",
            Self::External => "external",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub path: Option<String>,
    pub depends_on: Vec<String>,
    pub imports: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: String,
}

/// Nodes stay in document order; metadata-hint resolution ties break on the
/// first match in that order.
#[derive(Clone, Debug, Default)]
pub struct ArchGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
}

impl ArchGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.id.clone()).collect()
    }

    /// Edge list as node indices, for the layout engine.
    pub fn edge_index_pairs(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .filter_map(|edge| {
                let source = self.node_index(&edge.source)?;
                let target = self.node_index(&edge.target)?;
                Some((source, target))
            })
            .collect()
    }

    pub fn edges_touching<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges
            .iter()
            .filter(move |edge| edge.source == id || edge.target == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |edge| edge.target == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |edge| edge.source == id)
    }
}
