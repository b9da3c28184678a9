mod graph;
mod parse;

pub use graph::{ArchGraph, GraphEdge, GraphNode, NodeKind};
pub use parse::{load_graph_document, parse_graph_document};
