use std::collections::HashSet;
use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::util::display_label;

use super::{ArchGraph, GraphEdge, GraphNode, NodeKind};

#[derive(Debug, Default, Deserialize)]
struct RawGraphDocument {
    #[serde(default)]
    nodes: Vec<Value>,
    #[serde(default)]
    edges: Vec<Value>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default, alias = "label", alias = "title")]
    name: Option<String>,
    #[serde(default, alias = "filePath")]
    path: Option<String>,
    #[serde(default)]
    metadata: RawMetadata,
    #[serde(default, alias = "dependsOn")]
    depends_on: Vec<String>,
    #[serde(default)]
    imports: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default, alias = "dependsOn", alias = "dependencies")]
    depends_on: Vec<String>,
    #[serde(default, alias = "importPaths")]
    imports: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawEdge {
    #[serde(default, alias = "from")]
    source: Option<String>,
    #[serde(default, alias = "to")]
    target: Option<String>,
    #[serde(default)]
    kind: String,
}

pub fn load_graph_document(path: &str) -> Result<ArchGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read graph document at {path}"))?;
    Ok(parse_graph_document(&raw))
}

/// Malformed input degrades to an empty graph; individual bad entries are
/// skipped without discarding the rest of the document.
pub fn parse_graph_document(raw: &str) -> ArchGraph {
    let document = match serde_json::from_str::<RawGraphDocument>(raw) {
        Ok(document) => document,
        Err(error) => {
            log::warn!("invalid graph document, rendering an empty graph: {error}");
            return ArchGraph::default();
        }
    };

    let mut nodes = Vec::with_capacity(document.nodes.len());
    let mut seen_ids = HashSet::new();
    for value in &document.nodes {
        let Ok(raw_node) = RawNode::deserialize(value) else {
            log::debug!("skipping malformed node entry: {value}");
            continue;
        };
        let Some(id) = raw_node.id.filter(|id| !id.is_empty()) else {
            log::debug!("skipping node entry without an id");
            continue;
        };
        if !seen_ids.insert(id.clone()) {
            log::debug!("skipping duplicate node id {id}");
            continue;
        }

        let name = raw_node
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| display_label(&id).to_owned());
        let mut depends_on = raw_node.depends_on;
        depends_on.extend(raw_node.metadata.depends_on);
        let mut imports = raw_node.imports;
        imports.extend(raw_node.metadata.imports);

        nodes.push(GraphNode {
            kind: NodeKind::from_label(raw_node.kind.as_deref().unwrap_or_default()),
            name,
            path: raw_node.path.filter(|path| !path.is_empty()),
            depends_on,
            imports,
            id,
        });
    }

    if nodes.is_empty() {
        log::warn!("graph document contains no usable nodes");
        return ArchGraph::default();
    }

    let mut edges = Vec::with_capacity(document.edges.len());
    for value in &document.edges {
        let Ok(raw_edge) = RawEdge::deserialize(value) else {
            log::debug!("skipping malformed edge entry: {value}");
            continue;
        };
        let (Some(source), Some(target)) = (raw_edge.source, raw_edge.target) else {
            continue;
        };
        if !seen_ids.contains(&source) || !seen_ids.contains(&target) {
            log::debug!("dropping edge {source} -> {target}: unknown endpoint");
            continue;
        }
        edges.push(GraphEdge {
            source,
            target,
            kind: raw_edge.kind,
        });
    }

    ArchGraph::new(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nodes_edges_and_metadata_hints() {
        let graph = parse_graph_document(
            r#"{
                "nodes": [
                    {"id": "core/auth", "kind": "module", "path": "src/core/auth.ts",
                     "metadata": {"dependsOn": ["core/db"], "imports": ["src/core/db.ts"]}},
                    {"id": "core/db", "kind": "library", "name": "Database"}
                ],
                "edges": [
                    {"source": "core/auth", "target": "core/db", "kind": "import"}
                ]
            }"#,
        );

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let auth = graph.node("core/auth").unwrap();
        assert_eq!(auth.name, "auth");
        assert_eq!(auth.kind, NodeKind::Module);
        assert_eq!(auth.depends_on, ["core/db"]);
        assert_eq!(auth.imports, ["src/core/db.ts"]);
        assert_eq!(graph.node("core/db").unwrap().name, "Database");
    }

    #[test]
    fn invalid_json_yields_empty_graph() {
        let graph = parse_graph_document("not json at all");
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn missing_node_list_yields_empty_graph() {
        let graph = parse_graph_document(r#"{"edges": [{"source": "a", "target": "b"}]}"#);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn tolerates_malformed_entries_and_dangling_edges() {
        let graph = parse_graph_document(
            r#"{
                "nodes": [
                    "garbage",
                    {"kind": "module"},
                    {"id": "a"},
                    {"id": "a"},
                    {"id": "b"}
                ],
                "edges": [
                    {"source": "a", "target": "b"},
                    {"source": "a", "target": "ghost"},
                    {"source": "a"}
                ]
            }"#,
        );

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }
}
