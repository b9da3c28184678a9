use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use eframe::egui::{Pos2, Vec2};

use crate::model::ArchGraph;

use super::edge_geom::placed;
use super::highlight::{HighlightSet, edge_key};

pub const EXPANSION_RADIUS: f32 = 200.0;
/// How long the anchor keeps its "expanding" ring.
pub const EXPANDING_FLAG_SECS: f64 = 0.9;

#[derive(Clone, Debug, Default)]
pub struct ExpansionOutcome {
    /// Ids that received a position in this call.
    pub placed: Vec<String>,
    /// Every neighbor discovered, already placed or not.
    pub discovered: Vec<String>,
    pub highlight: HighlightSet,
}

/// Places the anchor's not-yet-placed neighbors on a circle around it and
/// returns the highlight covering the whole expansion. Neighbors come from
/// outgoing edges plus the node's dependency and import hints. Re-running on
/// the same anchor places nothing new.
pub fn expand_neighbors(
    graph: &ArchGraph,
    anchor_id: &str,
    positions: &mut HashMap<String, Pos2>,
) -> Option<ExpansionOutcome> {
    let anchor = placed(positions, anchor_id)?;
    let discovered = discover_neighbors(graph, anchor_id);

    let new_ids: Vec<String> = discovered
        .iter()
        .filter(|id| placed(positions, id).is_none())
        .cloned()
        .collect();

    let count = new_ids.len();
    // A single node lands to the right; a fan starts at the top and spreads
    // evenly around the full circle.
    let (start, step) = if count <= 1 {
        (0.0, 0.0)
    } else {
        (-PI * 0.5, TAU / count as f32)
    };
    for (slot, id) in new_ids.iter().enumerate() {
        let angle = start + slot as f32 * step;
        positions.insert(id.clone(), anchor + Vec2::angled(angle) * EXPANSION_RADIUS);
    }

    let mut highlight = HighlightSet::default();
    highlight.nodes.insert(anchor_id.to_owned());
    for id in &discovered {
        highlight.nodes.insert(id.clone());
    }
    for edge in graph.edges_touching(anchor_id) {
        let other = if edge.source == anchor_id {
            &edge.target
        } else {
            &edge.source
        };
        if discovered.iter().any(|id| id == other) {
            highlight.edges.insert(edge_key(&edge.source, &edge.target));
        }
    }

    Some(ExpansionOutcome {
        placed: new_ids,
        discovered,
        highlight,
    })
}

fn discover_neighbors(graph: &ArchGraph, anchor_id: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();

    for edge in graph.outgoing(anchor_id) {
        push_unique(&mut ids, anchor_id, edge.target.clone());
    }
    if let Some(node) = graph.node(anchor_id) {
        for hint in node.depends_on.iter().chain(&node.imports) {
            if let Some(id) = resolve_hint(graph, hint) {
                push_unique(&mut ids, anchor_id, id);
            }
        }
    }

    ids
}

fn push_unique(ids: &mut Vec<String>, anchor_id: &str, id: String) {
    if id != anchor_id && !ids.contains(&id) {
        ids.push(id);
    }
}

/// Maps a dependency or import hint to a node id: exact id, then exact name,
/// then path substring. Ambiguity resolves to the first node in document
/// order.
pub fn resolve_hint(graph: &ArchGraph, hint: &str) -> Option<String> {
    if graph.contains(hint) {
        return Some(hint.to_owned());
    }
    if let Some(node) = graph.nodes.iter().find(|node| node.name == hint) {
        return Some(node.id.clone());
    }
    graph
        .nodes
        .iter()
        .find(|node| {
            node.path
                .as_deref()
                .is_some_and(|path| path.contains(hint) || hint.contains(path))
        })
        .map(|node| node.id.clone())
}
