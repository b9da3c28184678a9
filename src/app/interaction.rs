use eframe::egui::{Pos2, Rect, Vec2, pos2};

use super::viewport::ViewTransform;

pub const MENU_MARGIN: f32 = 8.0;
pub const EDGE_CLICK_DISTANCE: f32 = 6.0;

/// Exclusive pointer capture for the current gesture. Each state stores a
/// grab offset so the dragged thing tracks the pointer without jumping.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// `grab = pointer - translate` in screen space.
    PanningBackground { grab: Vec2 },
    /// `grab = pointer - node_position` in graph space, so the node tracks
    /// 1:1 under any zoom level.
    DraggingNode { id: String, grab: Vec2 },
    /// `grab = pointer - panel_position` in screen space.
    DraggingPanel { grab: Vec2 },
}

/// State change a pointer-move produces while a drag is active.
#[derive(Clone, Debug, PartialEq)]
pub enum DragUpdate {
    None,
    Pan { translate: Vec2 },
    MoveNode { id: String, position: Pos2 },
    MovePanel { position: Pos2 },
}

impl DragState {
    pub fn begin_background(pointer: Pos2, transform: &ViewTransform) -> Self {
        Self::PanningBackground {
            grab: pointer.to_vec2() - transform.translate,
        }
    }

    pub fn begin_node(
        id: String,
        pointer: Pos2,
        transform: &ViewTransform,
        node_position: Pos2,
    ) -> Self {
        Self::DraggingNode {
            id,
            grab: transform.to_graph(pointer) - node_position,
        }
    }

    pub fn begin_panel(pointer: Pos2, panel_position: Pos2) -> Self {
        Self::DraggingPanel {
            grab: pointer - panel_position,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn pointer_moved(&self, pointer: Pos2, transform: &ViewTransform) -> DragUpdate {
        match self {
            Self::Idle => DragUpdate::None,
            Self::PanningBackground { grab } => DragUpdate::Pan {
                translate: pointer.to_vec2() - *grab,
            },
            Self::DraggingNode { id, grab } => DragUpdate::MoveNode {
                id: id.clone(),
                position: transform.to_graph(pointer) - *grab,
            },
            Self::DraggingPanel { grab } => DragUpdate::MovePanel {
                position: pointer - *grab,
            },
        }
    }

    /// Pointer-up and pointer-leave both end the gesture here.
    pub fn release(&mut self) {
        *self = Self::Idle;
    }
}

/// Keeps a popup of `menu_size` fully inside `container`, with a margin on
/// the far edges.
pub fn clamp_menu_position(desired: Pos2, container: Rect, menu_size: Vec2) -> Pos2 {
    let max_x = (container.right() - menu_size.x - MENU_MARGIN).max(container.left());
    let max_y = (container.bottom() - menu_size.y - MENU_MARGIN).max(container.top());
    pos2(
        desired.x.clamp(container.left(), max_x),
        desired.y.clamp(container.top(), max_y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    #[test]
    fn background_pan_tracks_the_grab_point() {
        let mut transform = ViewTransform {
            translate: vec2(40.0, 60.0),
            scale: 1.5,
        };
        let drag = DragState::begin_background(pos2(100.0, 100.0), &transform);

        match drag.pointer_moved(pos2(130.0, 90.0), &transform) {
            DragUpdate::Pan { translate } => {
                assert_eq!(translate, vec2(70.0, 50.0));
                transform.translate = translate;
            }
            other => panic!("expected a pan, got {other:?}"),
        }
        assert_eq!(transform.scale, 1.5);
    }

    #[test]
    fn node_drag_tracks_one_to_one_in_graph_space() {
        for scale in [0.25, 1.0, 3.0] {
            let transform = ViewTransform {
                translate: vec2(-20.0, 35.0),
                scale,
            };
            let node = pos2(300.0, 200.0);
            let pointer_down = transform.to_screen(pos2(310.0, 190.0));
            let drag = DragState::begin_node("n".to_owned(), pointer_down, &transform, node);

            // Grab offset is zero movement at the down position.
            match drag.pointer_moved(pointer_down, &transform) {
                DragUpdate::MoveNode { position, .. } => {
                    assert!((position.x - node.x).abs() < 1e-3);
                    assert!((position.y - node.y).abs() < 1e-3);
                }
                other => panic!("expected a node move, got {other:?}"),
            }

            // A 100 px screen move translates to 100/scale graph units.
            let pointer_later = pointer_down + vec2(100.0, 0.0);
            match drag.pointer_moved(pointer_later, &transform) {
                DragUpdate::MoveNode { id, position } => {
                    assert_eq!(id, "n");
                    assert!((position.x - (node.x + 100.0 / scale)).abs() < 1e-2);
                    assert!((position.y - node.y).abs() < 1e-3);
                }
                other => panic!("expected a node move, got {other:?}"),
            }
        }
    }

    #[test]
    fn panel_drag_preserves_the_grab_offset() {
        let drag = DragState::begin_panel(pos2(50.0, 50.0), pos2(30.0, 44.0));
        match drag.pointer_moved(pos2(90.0, 20.0), &ViewTransform::default()) {
            DragUpdate::MovePanel { position } => assert_eq!(position, pos2(70.0, 14.0)),
            other => panic!("expected a panel move, got {other:?}"),
        }
    }

    #[test]
    fn release_returns_to_idle() {
        let mut drag = DragState::begin_background(pos2(0.0, 0.0), &ViewTransform::default());
        assert!(drag.is_active());
        drag.release();
        assert_eq!(drag, DragState::Idle);
        assert_eq!(
            drag.pointer_moved(pos2(10.0, 10.0), &ViewTransform::default()),
            DragUpdate::None
        );
    }

    #[test]
    fn menu_is_clamped_inside_the_container() {
        let container = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let menu = vec2(180.0, 150.0);

        let near_corner = clamp_menu_position(pos2(790.0, 590.0), container, menu);
        assert_eq!(near_corner, pos2(800.0 - 180.0 - MENU_MARGIN, 600.0 - 150.0 - MENU_MARGIN));

        let inside = clamp_menu_position(pos2(100.0, 120.0), container, menu);
        assert_eq!(inside, pos2(100.0, 120.0));

        let negative = clamp_menu_position(pos2(-50.0, -9.0), container, menu);
        assert_eq!(negative, pos2(0.0, 0.0));
    }
}
