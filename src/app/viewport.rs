use eframe::egui::{Pos2, Vec2, pos2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;

/// Affine map from graph space to container-local screen space:
/// `screen = graph * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn to_screen(&self, graph: Pos2) -> Pos2 {
        pos2(
            graph.x * self.scale + self.translate.x,
            graph.y * self.scale + self.translate.y,
        )
    }

    pub fn to_graph(&self, screen: Pos2) -> Pos2 {
        pos2(
            (screen.x - self.translate.x) / self.scale,
            (screen.y - self.translate.y) / self.scale,
        )
    }

    /// Rescales while keeping the graph point under `pointer` fixed on
    /// screen.
    pub fn zoom_at(&mut self, pointer: Pos2, delta_scale: f32) {
        let new_scale = (self.scale + delta_scale).clamp(MIN_SCALE, MAX_SCALE);
        let factor = new_scale / self.scale;
        self.translate = pointer.to_vec2() - (pointer.to_vec2() - self.translate) * factor;
        self.scale = new_scale;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Centers `node` in a container of the given size at `target_scale`,
    /// regardless of the current transform.
    pub fn focus_on(&mut self, node: Pos2, target_scale: f32, container: Vec2) {
        self.scale = target_scale.clamp(MIN_SCALE, MAX_SCALE);
        self.translate = container * 0.5 - node.to_vec2() * self.scale;
    }

    /// Initial view: denser graphs start more zoomed out, and the virtual
    /// extent is centered in the container.
    pub fn reset(&mut self, node_count: usize, container: Vec2, extent: Vec2) {
        let scale = (1.05 - node_count as f32 / 240.0).clamp(0.18, 1.0);
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self.translate = (container - extent * self.scale) * 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    fn assert_pos_eq(a: Pos2, b: Pos2) {
        assert!((a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn screen_and_graph_conversions_round_trip() {
        let transform = ViewTransform {
            translate: vec2(130.0, -42.0),
            scale: 1.7,
        };
        let graph = pos2(250.0, 615.0);
        assert_pos_eq(transform.to_graph(transform.to_screen(graph)), graph);
    }

    #[test]
    fn zoom_at_keeps_pointer_location_fixed() {
        let pointers = [pos2(0.0, 0.0), pos2(640.0, 360.0), pos2(15.0, 890.0)];
        let deltas = [0.2, -0.3, 1.5, -4.0];

        for pointer in pointers {
            let mut transform = ViewTransform {
                translate: vec2(-80.0, 44.0),
                scale: 0.9,
            };
            for delta in deltas {
                let before = transform.to_graph(pointer);
                transform.zoom_at(pointer, delta);
                assert_pos_eq(transform.to_graph(pointer), before);
            }
        }
    }

    #[test]
    fn repeated_zoom_saturates_at_clamp_bounds() {
        let mut transform = ViewTransform::default();
        for _ in 0..100 {
            transform.zoom_at(pos2(400.0, 300.0), 0.2);
        }
        assert_eq!(transform.scale, MAX_SCALE);

        for _ in 0..100 {
            transform.zoom_at(pos2(400.0, 300.0), -0.2);
        }
        assert_eq!(transform.scale, MIN_SCALE);
    }

    #[test]
    fn pan_shifts_translate_only() {
        let mut transform = ViewTransform::default();
        transform.pan(vec2(25.0, -10.0));
        transform.pan(vec2(5.0, 4.0));
        assert_eq!(transform.translate, vec2(30.0, -6.0));
        assert_eq!(transform.scale, 1.0);
    }

    #[test]
    fn focus_maps_node_to_container_center() {
        let mut transform = ViewTransform {
            translate: vec2(999.0, -999.0),
            scale: 3.3,
        };
        let node = pos2(1200.0, 800.0);
        let container = vec2(1000.0, 700.0);
        transform.focus_on(node, 1.2, container);
        assert_pos_eq(transform.to_screen(node), pos2(500.0, 350.0));
        assert_eq!(transform.scale, 1.2);
    }

    #[test]
    fn reset_scale_decreases_with_node_count_and_stays_clamped() {
        let container = vec2(1200.0, 800.0);
        let extent = vec2(2400.0, 1600.0);

        let mut small = ViewTransform::default();
        small.reset(10, container, extent);
        let mut large = ViewTransform::default();
        large.reset(500, container, extent);

        assert!(small.scale > large.scale);
        assert!((MIN_SCALE..=MAX_SCALE).contains(&small.scale));
        assert!((MIN_SCALE..=MAX_SCALE).contains(&large.scale));

        // Extent center lands at container center.
        let extent_center = pos2(extent.x * 0.5, extent.y * 0.5);
        assert_pos_eq(small.to_screen(extent_center), pos2(600.0, 400.0));
    }
}
