use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

use clap::ValueEnum;
use eframe::egui::{Pos2, Vec2, pos2, vec2};

use crate::util::stable_pair;

/// Circular requests silently become donut above this node count so large
/// graphs keep readable per-ring spacing.
pub const DONUT_THRESHOLD: usize = 50;

const MIN_RING_ARC: f32 = 70.0;
const FORCE_ITERATIONS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutKind {
    Circular,
    Donut,
    Spiral,
    Force,
    Tree,
}

impl LayoutKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Circular => "circular",
            Self::Donut => "donut",
            Self::Spiral => "spiral",
            Self::Force => "force",
            Self::Tree => "tree",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutArea {
    pub width: f32,
    pub height: f32,
}

impl LayoutArea {
    pub fn center(self) -> Pos2 {
        pos2(self.width * 0.5, self.height * 0.5)
    }
}

/// Assigns one position per node id. Deterministic for a given input, never
/// emits the `(0,0)` unplaced sentinel, and never produces two identical
/// positions.
pub fn assign_positions(
    node_ids: &[String],
    edges: &[(usize, usize)],
    kind: LayoutKind,
    area: LayoutArea,
) -> HashMap<String, Pos2> {
    let effective = match kind {
        // Tree layout degrades to circular; this is the documented fallback,
        // not an error.
        LayoutKind::Tree => LayoutKind::Circular,
        other => other,
    };
    let effective = if effective == LayoutKind::Circular && node_ids.len() > DONUT_THRESHOLD {
        LayoutKind::Donut
    } else {
        effective
    };

    let mut positions = match effective {
        LayoutKind::Circular | LayoutKind::Tree => circular_positions(node_ids.len(), area),
        LayoutKind::Donut => donut_positions(node_ids.len(), area),
        LayoutKind::Spiral => spiral_positions(node_ids.len(), area),
        LayoutKind::Force => force_positions(node_ids, edges, area),
    };

    ensure_valid_positions(node_ids, &mut positions);

    node_ids
        .iter()
        .cloned()
        .zip(positions)
        .collect()
}

fn circular_positions(n: usize, area: LayoutArea) -> Vec<Pos2> {
    let center = area.center();
    let radius_x = area.width * 0.42;
    let radius_y = area.height * 0.42;

    (0..n)
        .map(|index| {
            let angle = (index as f32 / n.max(1) as f32) * TAU;
            center + vec2(angle.cos() * radius_x, angle.sin() * radius_y)
        })
        .collect()
}

fn donut_positions(n: usize, area: LayoutArea) -> Vec<Pos2> {
    let center = area.center();
    let min_extent = area.width.min(area.height).max(1.0);
    let base_radius = min_extent * 0.16;
    let ring_gap = min_extent * 0.12;

    let mut positions = Vec::with_capacity(n);
    let mut remaining = n;
    let mut ring = 0usize;
    while remaining > 0 {
        let radius = base_radius + ring as f32 * ring_gap;
        let capacity = ((TAU * radius / MIN_RING_ARC).floor() as usize).max(6);
        let count = remaining.min(capacity);
        let step = TAU / count as f32;
        // Half-step offset per ring keeps consecutive rings from lining up
        // radially.
        let start = ring as f32 * step * 0.5;

        for slot in 0..count {
            let angle = start + slot as f32 * step;
            positions.push(center + vec2(angle.cos(), angle.sin()) * radius);
        }

        remaining -= count;
        ring += 1;
    }

    positions
}

fn spiral_positions(n: usize, area: LayoutArea) -> Vec<Pos2> {
    let center = area.center();
    let min_extent = area.width.min(area.height).max(1.0);
    let angle_step = 0.55_f32;
    let inner_radius = min_extent * 0.03;
    let outer_radius = min_extent * 0.46;
    let total_angle = (n.saturating_sub(1) as f32 * angle_step).max(angle_step);
    let growth = (outer_radius - inner_radius) / total_angle;

    (0..n)
        .map(|index| {
            let angle = index as f32 * angle_step;
            let radius = inner_radius + growth * angle;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn force_positions(node_ids: &[String], edges: &[(usize, usize)], area: LayoutArea) -> Vec<Pos2> {
    let n = node_ids.len();
    if n == 0 {
        return Vec::new();
    }

    let center = area.center();
    let min_extent = area.width.min(area.height).max(1.0);
    let seed_radius = min_extent * 0.28;

    let mut offsets = node_ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let angle = (index as f32 / n as f32) * TAU;
            let (jx, jy) = stable_pair(id);
            let jitter = vec2(jx, jy) * min_extent * 0.06;
            vec2(angle.cos(), angle.sin()) * seed_radius + jitter
        })
        .collect::<Vec<_>>();

    if n == 1 {
        return vec![center + offsets[0]];
    }

    let k = ((area.width * area.height).max(1.0) / n as f32).sqrt().max(24.0);
    let ideal_edge = k * 1.4;
    let mut temperature = (k * 4.0).max(120.0);

    for _ in 0..FORCE_ITERATIONS {
        let mut disp = vec![Vec2::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = offsets[i] - offsets[j];
                let distance = delta.length().max(0.5);
                let direction = delta / distance;
                let force = (k * k) / distance;
                disp[i] += direction * force;
                disp[j] -= direction * force;
            }
        }

        for &(from, to) in edges {
            if from >= n || to >= n || from == to {
                continue;
            }
            let delta = offsets[from] - offsets[to];
            let distance = delta.length().max(0.5);
            let direction = delta / distance;
            let force = (distance - ideal_edge) * 0.12;
            disp[from] -= direction * force;
            disp[to] += direction * force;
        }

        for i in 0..n {
            disp[i] -= offsets[i] * 0.0015;
        }

        for i in 0..n {
            let d = disp[i];
            let length = d.length();
            if length > 0.0 {
                offsets[i] += d / length * length.min(temperature);
            }
        }

        temperature *= 0.94;
        if temperature < 0.5 {
            break;
        }
    }

    let half_width = (area.width * 0.5 - 1.0).max(1.0);
    let half_height = (area.height * 0.5 - 1.0).max(1.0);
    offsets
        .into_iter()
        .map(|offset| {
            center
                + vec2(
                    offset.x.clamp(-half_width, half_width),
                    offset.y.clamp(-half_height, half_height),
                )
        })
        .collect()
}

/// Shared post-pass: no sentinel `(0,0)` output, no two identical positions.
/// Nudges are derived from the node id so the result stays deterministic.
fn ensure_valid_positions(node_ids: &[String], positions: &mut [Pos2]) {
    let mut seen: HashSet<(u32, u32)> = HashSet::with_capacity(positions.len());

    for (id, position) in node_ids.iter().zip(positions.iter_mut()) {
        let (jx, jy) = stable_pair(id);
        let mut attempt = 0f32;
        loop {
            let key = (position.x.to_bits(), position.y.to_bits());
            if *position != Pos2::ZERO && !seen.contains(&key) {
                seen.insert(key);
                break;
            }
            attempt += 1.0;
            *position += vec2(jx * attempt + 0.37, jy * attempt + 0.61);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("node-{i}")).collect()
    }

    fn area() -> LayoutArea {
        LayoutArea {
            width: 1000.0,
            height: 1000.0,
        }
    }

    fn assert_complete_and_distinct(positions: &HashMap<String, Pos2>, node_ids: &[String]) {
        assert_eq!(positions.len(), node_ids.len());
        let mut seen = HashSet::new();
        for id in node_ids {
            let position = positions[id];
            assert_ne!(position, Pos2::ZERO, "{id} left at the unplaced sentinel");
            assert!(
                seen.insert((position.x.to_bits(), position.y.to_bits())),
                "duplicate position for {id}"
            );
        }
    }

    #[test]
    fn every_kind_places_every_node_exactly_once() {
        let node_ids = ids(23);
        let edges = vec![(0, 1), (1, 2), (2, 0), (3, 4)];
        for kind in [
            LayoutKind::Circular,
            LayoutKind::Donut,
            LayoutKind::Spiral,
            LayoutKind::Force,
            LayoutKind::Tree,
        ] {
            let positions = assign_positions(&node_ids, &edges, kind, area());
            assert_complete_and_distinct(&positions, &node_ids);
        }
    }

    #[test]
    fn layouts_are_deterministic() {
        let node_ids = ids(40);
        let edges = vec![(0, 5), (5, 11), (11, 30)];
        for kind in [LayoutKind::Circular, LayoutKind::Force, LayoutKind::Spiral] {
            let first = assign_positions(&node_ids, &edges, kind, area());
            let second = assign_positions(&node_ids, &edges, kind, area());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn circular_keeps_single_ring_at_or_below_threshold() {
        let node_ids = ids(DONUT_THRESHOLD);
        let positions = assign_positions(&node_ids, &[], LayoutKind::Circular, area());
        let center = area().center();

        let radii: HashSet<i64> = node_ids
            .iter()
            .map(|id| ((positions[id] - center).length() * 10.0).round() as i64)
            .collect();
        assert_eq!(radii.len(), 1, "expected a single circle radius");
    }

    #[test]
    fn circular_above_threshold_becomes_donut() {
        let node_ids = ids(DONUT_THRESHOLD + 10);
        let positions = assign_positions(&node_ids, &[], LayoutKind::Circular, area());
        let center = area().center();

        let radii: HashSet<i64> = node_ids
            .iter()
            .map(|id| ((positions[id] - center).length() * 10.0).round() as i64)
            .collect();
        assert!(radii.len() >= 2, "expected concentric rings, got one circle");
    }

    #[test]
    fn tree_falls_back_to_circular() {
        let node_ids = ids(12);
        let tree = assign_positions(&node_ids, &[], LayoutKind::Tree, area());
        let circular = assign_positions(&node_ids, &[], LayoutKind::Circular, area());
        assert_eq!(tree, circular);
    }

    #[test]
    fn spiral_radius_grows_with_input_order() {
        let node_ids = ids(20);
        let positions = assign_positions(&node_ids, &[], LayoutKind::Spiral, area());
        let center = area().center();

        let mut previous = -1.0f32;
        for id in &node_ids {
            let radius = (positions[id] - center).length();
            assert!(radius > previous, "spiral radius must grow outward");
            previous = radius;
        }
    }

    #[test]
    fn force_layout_stays_inside_area() {
        let node_ids = ids(30);
        let edges = vec![(0, 1), (2, 3), (4, 5), (0, 29)];
        let positions = assign_positions(&node_ids, &edges, LayoutKind::Force, area());
        for id in &node_ids {
            let position = positions[id];
            assert!((0.0..=1000.0).contains(&position.x));
            assert!((0.0..=1000.0).contains(&position.y));
        }
    }

    #[test]
    fn degenerate_area_still_yields_distinct_non_sentinel_positions() {
        let node_ids = ids(5);
        let positions = assign_positions(
            &node_ids,
            &[],
            LayoutKind::Circular,
            LayoutArea {
                width: 0.0,
                height: 0.0,
            },
        );
        assert_complete_and_distinct(&positions, &node_ids);
    }
}
