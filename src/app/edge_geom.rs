use std::collections::HashMap;

use eframe::egui::{Pos2, Vec2};

use crate::model::GraphEdge;

pub const NODE_WIDTH: f32 = 180.0;
pub const NODE_HEIGHT: f32 = 72.0;
// The arrowhead needs more clearance than the tail.
pub const SOURCE_PADDING: f32 = 4.0;
pub const TARGET_PADDING: f32 = 12.0;
pub const ARROW_LENGTH: f32 = 11.0;
pub const ARROW_SPREAD: f32 = 0.48;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
    pub start: Pos2,
    pub end: Pos2,
}

/// `(0,0)` is the unplaced sentinel, not a real coordinate.
pub fn placed(positions: &HashMap<String, Pos2>, id: &str) -> Option<Pos2> {
    positions.get(id).copied().filter(|p| *p != Pos2::ZERO)
}

/// Edges where both endpoints have real positions; anything touching an
/// unplaced node has no geometry to draw.
pub fn renderable_edges<'a>(
    edges: &'a [GraphEdge],
    positions: &'a HashMap<String, Pos2>,
) -> impl Iterator<Item = (&'a GraphEdge, Pos2, Pos2)> {
    edges.iter().filter_map(|edge| {
        let source = placed(positions, &edge.source)?;
        let target = placed(positions, &edge.target)?;
        Some((edge, source, target))
    })
}

/// Point where the ray from `center` toward `toward` exits the axis-aligned
/// node rectangle, pushed outward along the ray by `padding`.
pub fn rect_boundary_point(
    center: Pos2,
    toward: Pos2,
    half_width: f32,
    half_height: f32,
    padding: f32,
) -> Pos2 {
    let delta = toward - center;
    if delta == Vec2::ZERO {
        return center;
    }
    let scale_x = if delta.x.abs() > f32::EPSILON {
        half_width / delta.x.abs()
    } else {
        f32::INFINITY
    };
    let scale_y = if delta.y.abs() > f32::EPSILON {
        half_height / delta.y.abs()
    } else {
        f32::INFINITY
    };
    let t = scale_x.min(scale_y);
    center + delta * t + delta.normalized() * padding
}

/// Visible segment of an edge between two node rectangles, both clipped to
/// their borders plus padding. `None` when the centers coincide.
pub fn clip_edge(
    source_center: Pos2,
    target_center: Pos2,
    half_width: f32,
    half_height: f32,
) -> Option<EdgeSegment> {
    if source_center == target_center {
        return None;
    }
    Some(EdgeSegment {
        start: rect_boundary_point(
            source_center,
            target_center,
            half_width,
            half_height,
            SOURCE_PADDING,
        ),
        end: rect_boundary_point(
            target_center,
            source_center,
            half_width,
            half_height,
            TARGET_PADDING,
        ),
    })
}

/// Filled arrowhead triangle at the target end of a segment.
pub fn arrow_head(segment: &EdgeSegment, length: f32, spread: f32) -> [Pos2; 3] {
    let direction = segment.end - segment.start;
    let angle = direction.y.atan2(direction.x);
    let left = angle + std::f32::consts::PI - spread;
    let right = angle + std::f32::consts::PI + spread;
    [
        segment.end,
        segment.end + Vec2::angled(left) * length,
        segment.end + Vec2::angled(right) * length,
    ]
}

/// Distance from a point to a finite segment, for edge click tests.
pub fn point_segment_distance(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return (point - start).length();
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    (point - (start + segment * t)).length()
}
