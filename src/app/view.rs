use std::collections::HashSet;

use eframe::egui::{
    self, Align2, FontId, Painter, PointerButton, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2,
    pos2, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::edge_geom::{
    ARROW_LENGTH, ARROW_SPREAD, EdgeSegment, NODE_HEIGHT, NODE_WIDTH, arrow_head, clip_edge,
    placed, point_segment_distance, renderable_edges,
};
use super::highlight::HighlightSet;
use super::interaction::{DragState, DragUpdate, EDGE_CLICK_DISTANCE, clamp_menu_position};
use super::style::{self, Palette, dim_color};
use super::viewport::ViewTransform;
use super::{GRAPH_AREA, ViewModel};

const MENU_SIZE: Vec2 = vec2(200.0, 176.0);
const OVERLAY_SIZE: Vec2 = vec2(190.0, 86.0);
const OVERLAY_HEADER: f32 = 20.0;

enum MenuAction {
    OpenSource,
    RevealInTree,
    ExpandNeighbors,
    CopyPath,
    ShowDependencies,
    ShowDependents,
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.layout_dirty {
            self.relayout();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let palette = style::palette(self.theme);
        let now = ui.input(|input| input.time);

        if self.view_reset_pending {
            self.transform.reset(
                self.graph.node_count(),
                rect.size(),
                vec2(GRAPH_AREA.width, GRAPH_AREA.height),
            );
            self.view_reset_pending = false;
        }
        if let Some(id) = self.focus_request.take()
            && let Some(position) = placed(&self.positions, &id)
        {
            let target_scale = self.transform.scale.max(1.0);
            self.transform.focus_on(position, target_scale, rect.size());
        }

        draw_background(&painter, rect, &palette, &self.transform);
        self.handle_zoom(ui, rect, &response);

        // Everything below works in container-local coordinates; only the
        // painter needs absolute positions.
        let local_pointer = ui
            .input(|input| input.pointer.hover_pos())
            .map(|pointer| pointer - rect.min.to_vec2());

        let half_width = NODE_WIDTH * self.node_size * 0.5;
        let half_height = NODE_HEIGHT * self.node_size * 0.5;

        let hovered_node = if self.drag.is_active() {
            None
        } else {
            local_pointer.and_then(|pointer| self.node_at(pointer, half_width, half_height))
        };

        if hovered_node.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        if response.drag_started_by(PointerButton::Primary)
            && let Some(pointer) = response
                .interact_pointer_pos()
                .map(|pointer| pointer - rect.min.to_vec2())
        {
            let overlay_header = Rect::from_min_size(
                self.overlay_position,
                vec2(OVERLAY_SIZE.x, OVERLAY_HEADER),
            );
            self.drag = if overlay_header.contains(pointer) {
                DragState::begin_panel(pointer, self.overlay_position)
            } else if let Some(id) = hovered_node.clone() {
                let position = placed(&self.positions, &id).unwrap_or(Pos2::ZERO);
                DragState::begin_node(id, pointer, &self.transform, position)
            } else {
                DragState::begin_background(pointer, &self.transform)
            };
        }

        if self.drag.is_active() {
            if let Some(pointer) = local_pointer {
                match self.drag.pointer_moved(pointer, &self.transform) {
                    DragUpdate::Pan { translate } => self.transform.translate = translate,
                    DragUpdate::MoveNode { id, position } => {
                        self.positions.insert(id, position);
                    }
                    DragUpdate::MovePanel { position } => {
                        self.overlay_position = clamp_menu_position(
                            position,
                            Rect::from_min_size(Pos2::ZERO, rect.size()),
                            OVERLAY_SIZE,
                        );
                    }
                    DragUpdate::None => {}
                }
            }
            ui.ctx().request_repaint();
        }

        // Pointer-up anywhere or leaving the window ends the gesture.
        if ui.input(|input| input.pointer.any_released() || input.pointer.hover_pos().is_none()) {
            self.drag.release();
        }

        if response.clicked_by(PointerButton::Primary)
            && let Some(pointer) = local_pointer
        {
            if self.menu_node.is_some() {
                self.menu_node = None;
            } else if let Some(id) = hovered_node.clone() {
                self.select_node(&id);
            } else if let Some((source, target)) =
                self.edge_at(pointer, half_width, half_height)
            {
                self.selected = None;
                self.highlight = HighlightSet::single_edge(&source, &target);
            } else {
                self.clear_selection();
            }
        }

        if response.secondary_clicked()
            && let Some(pointer) = local_pointer
        {
            if let Some(id) = hovered_node.clone() {
                self.menu_node = Some(id);
                self.menu_position = clamp_menu_position(
                    pointer,
                    Rect::from_min_size(Pos2::ZERO, rect.size()),
                    MENU_SIZE,
                );
            } else {
                self.menu_node = None;
            }
        }

        if let Some(flag) = &self.expanding
            && now > flag.until
        {
            self.expanding = None;
        }

        self.paint_edges(&painter, rect, &palette, half_width, half_height);
        self.paint_nodes(&painter, rect, &palette, half_width, half_height);
        self.paint_expanding_ring(ui, &painter, rect, &palette, half_width, half_height);
        self.paint_tooltip(&painter, rect, &palette, hovered_node.as_deref(), half_width);
        self.paint_overlay(&painter, rect, &palette);
        self.show_context_menu(ui, rect, now);
    }

    fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let local = pointer - rect.min.to_vec2();
        self.transform
            .zoom_at(local, scroll * 0.0025 * self.transform.scale);
    }

    /// Topmost node under a container-local point. Later document entries
    /// draw later, so the reverse scan wins ties.
    fn node_at(&self, local: Pos2, half_width: f32, half_height: f32) -> Option<String> {
        let size = vec2(half_width, half_height) * 2.0 * self.transform.scale;
        self.graph.nodes.iter().rev().find_map(|node| {
            let center = placed(&self.positions, &node.id)?;
            let node_rect = Rect::from_center_size(self.transform.to_screen(center), size);
            node_rect.contains(local).then(|| node.id.clone())
        })
    }

    /// Closest rendered edge within click distance of a container-local
    /// point. Callers check nodes first; edges never win over a node hit.
    fn edge_at(&self, local: Pos2, half_width: f32, half_height: f32) -> Option<(String, String)> {
        let mut best: Option<(f32, (String, String))> = None;
        for (edge, source, target) in renderable_edges(&self.graph.edges, &self.positions) {
            let Some(segment) = clip_edge(source, target, half_width, half_height) else {
                continue;
            };
            let start = self.transform.to_screen(segment.start);
            let end = self.transform.to_screen(segment.end);
            let distance = point_segment_distance(local, start, end);
            if distance <= EDGE_CLICK_DISTANCE
                && best.as_ref().is_none_or(|(closest, _)| distance < *closest)
            {
                best = Some((distance, (edge.source.clone(), edge.target.clone())));
            }
        }
        best.map(|(_, pair)| pair)
    }

    fn search_matches(&self) -> HashSet<String> {
        let query = self.search.trim();
        if query.is_empty() {
            return HashSet::new();
        }
        let matcher = SkimMatcherV2::default();
        self.graph
            .nodes
            .iter()
            .filter(|node| {
                matcher.fuzzy_match(&node.name, query).is_some()
                    || matcher.fuzzy_match(&node.id, query).is_some()
            })
            .map(|node| node.id.clone())
            .collect()
    }

    fn paint_edges(
        &self,
        painter: &Painter,
        rect: Rect,
        palette: &Palette,
        half_width: f32,
        half_height: f32,
    ) {
        let highlight_active = !self.highlight.is_empty();
        let arrow_scale = self.transform.scale.clamp(0.5, 1.6);

        for (edge, source, target) in renderable_edges(&self.graph.edges, &self.positions) {
            let Some(segment) = clip_edge(source, target, half_width, half_height) else {
                continue;
            };
            let start = rect.min + self.transform.to_screen(segment.start).to_vec2();
            let end = rect.min + self.transform.to_screen(segment.end).to_vec2();
            if !rect.intersects(Rect::from_two_pos(start, end).expand(4.0)) {
                continue;
            }

            let emphasized = self.highlight.contains_edge(&edge.source, &edge.target);
            let color = if emphasized {
                palette.edge_highlight
            } else if highlight_active {
                dim_color(palette.edge, 0.35)
            } else {
                palette.edge
            };
            let width = if emphasized { 2.2 } else { 1.2 };

            painter.line_segment([start, end], Stroke::new(width, color));
            let wings = arrow_head(
                &EdgeSegment { start, end },
                ARROW_LENGTH * arrow_scale,
                ARROW_SPREAD,
            );
            painter.add(Shape::convex_polygon(wings.to_vec(), color, Stroke::NONE));
        }
    }

    fn paint_nodes(
        &self,
        painter: &Painter,
        rect: Rect,
        palette: &Palette,
        half_width: f32,
        half_height: f32,
    ) {
        let highlight_active = !self.highlight.is_empty();
        let search_matches = if highlight_active {
            HashSet::new()
        } else {
            self.search_matches()
        };
        let scale = self.transform.scale;
        let size = vec2(half_width, half_height) * 2.0 * scale;
        let name_font = FontId::proportional((13.0 * scale).clamp(9.0, 18.0));
        let kind_font = FontId::proportional((10.0 * scale).clamp(7.0, 14.0));
        let show_kind = scale > 0.45;

        for node in &self.graph.nodes {
            let Some(center) = placed(&self.positions, &node.id) else {
                continue;
            };
            let node_rect =
                Rect::from_center_size(rect.min + self.transform.to_screen(center).to_vec2(), size);
            if !rect.intersects(node_rect) {
                continue;
            }

            let node_style = style::node_style(node.kind, self.theme);
            let dimmed = highlight_active && !self.highlight.contains_node(&node.id);
            let fill = if dimmed {
                dim_color(node_style.fill, 0.35)
            } else {
                node_style.fill
            };
            let text = if dimmed {
                dim_color(node_style.text, 0.45)
            } else {
                node_style.text
            };

            let selected = self.selected.as_deref() == Some(node.id.as_str());
            let matched = search_matches.contains(&node.id);
            let (border, border_width) = if selected {
                (palette.selection, 2.4)
            } else if matched {
                (palette.selection, 1.6)
            } else if dimmed {
                (dim_color(node_style.stroke, 0.35), 1.0)
            } else {
                (node_style.stroke, 1.2)
            };

            painter.rect_filled(node_rect, 4.0, fill);
            let stroke = Stroke::new(border_width, border);
            painter.line_segment([node_rect.left_top(), node_rect.right_top()], stroke);
            painter.line_segment([node_rect.right_top(), node_rect.right_bottom()], stroke);
            painter.line_segment([node_rect.right_bottom(), node_rect.left_bottom()], stroke);
            painter.line_segment([node_rect.left_bottom(), node_rect.left_top()], stroke);

            painter.text(
                node_rect.center(),
                Align2::CENTER_CENTER,
                &node.name,
                name_font.clone(),
                text,
            );
            if show_kind {
                painter.text(
                    pos2(node_rect.center().x, node_rect.bottom() - 4.0),
                    Align2::CENTER_BOTTOM,
                    node_style.badge,
                    kind_font.clone(),
                    dim_color(text, 0.7),
                );
            }
        }
    }

    fn paint_expanding_ring(
        &self,
        ui: &Ui,
        painter: &Painter,
        rect: Rect,
        palette: &Palette,
        half_width: f32,
        half_height: f32,
    ) {
        let Some(flag) = &self.expanding else {
            return;
        };
        let Some(center) = placed(&self.positions, &flag.node_id) else {
            return;
        };
        let screen = rect.min + self.transform.to_screen(center).to_vec2();
        let radius = vec2(half_width, half_height).length() * self.transform.scale + 6.0;
        painter.circle_stroke(screen, radius, Stroke::new(2.0, palette.expanding_ring));
        ui.ctx().request_repaint();
    }

    fn paint_tooltip(
        &self,
        painter: &Painter,
        rect: Rect,
        palette: &Palette,
        hovered: Option<&str>,
        half_width: f32,
    ) {
        let Some(id) = hovered else {
            return;
        };
        // The context menu replaces the tooltip for its node.
        if self.menu_node.as_deref() == Some(id) {
            return;
        }
        let Some(node) = self.graph.node(id) else {
            return;
        };
        let Some(center) = placed(&self.positions, id) else {
            return;
        };

        let mut text = format!("{}\n{}", node.name, node.kind.label());
        if let Some(path) = &node.path {
            text.push('\n');
            text.push_str(path);
        }
        let galley = painter.layout_no_wrap(text, FontId::proportional(12.0), palette.tooltip_text);

        let screen = rect.min + self.transform.to_screen(center).to_vec2();
        let anchor = screen + vec2(half_width * self.transform.scale + 10.0, 0.0);
        let size = galley.size() + vec2(12.0, 10.0);
        let mut background = Rect::from_min_size(anchor, size);
        if background.right() > rect.right() {
            background = background
                .translate(vec2(-(size.x + half_width * self.transform.scale * 2.0 + 20.0), 0.0));
        }
        if background.bottom() > rect.bottom() {
            background = background.translate(vec2(0.0, rect.bottom() - background.bottom()));
        }

        painter.rect_filled(background, 4.0, palette.tooltip_fill);
        painter.galley(background.min + vec2(6.0, 5.0), galley, palette.tooltip_text);
    }

    /// Floating stats card; its header is a drag handle.
    fn paint_overlay(&self, painter: &Painter, rect: Rect, palette: &Palette) {
        let overlay = Rect::from_min_size(rect.min + self.overlay_position.to_vec2(), OVERLAY_SIZE);
        let header = Rect::from_min_size(overlay.min, vec2(OVERLAY_SIZE.x, OVERLAY_HEADER));

        painter.rect_filled(overlay, 4.0, palette.panel_fill);
        painter.rect_filled(header, 4.0, palette.panel_header);
        painter.text(
            header.left_center() + vec2(8.0, 0.0),
            Align2::LEFT_CENTER,
            "graph",
            FontId::proportional(11.0),
            palette.panel_text,
        );

        let lines = [
            format!("nodes: {}", self.graph.node_count()),
            format!("edges: {}", self.graph.edge_count()),
            format!("scale: {:.2}", self.transform.scale),
            format!("layout: {}", self.layout_kind.label()),
        ];
        for (index, line) in lines.iter().enumerate() {
            painter.text(
                overlay.min + vec2(8.0, OVERLAY_HEADER + 4.0 + index as f32 * 15.0),
                Align2::LEFT_TOP,
                line,
                FontId::proportional(11.0),
                palette.panel_text,
            );
        }
    }

    fn show_context_menu(&mut self, ui: &Ui, rect: Rect, now: f64) {
        let Some(menu_id) = self.menu_node.clone() else {
            return;
        };
        let Some(node) = self.graph.node(&menu_id) else {
            self.menu_node = None;
            return;
        };
        let title = node.name.clone();
        let path = node.path.clone();

        let mut action = None;
        egui::Area::new(egui::Id::new("node-context-menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(rect.min + self.menu_position.to_vec2())
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(MENU_SIZE.x - 16.0);
                    ui.label(egui::RichText::new(&title).strong());
                    ui.separator();
                    if ui.button("Open source").clicked() {
                        action = Some(MenuAction::OpenSource);
                    }
                    if ui.button("Reveal in file tree").clicked() {
                        action = Some(MenuAction::RevealInTree);
                    }
                    if ui.button("Copy import path").clicked() {
                        action = Some(MenuAction::CopyPath);
                    }
                    ui.separator();
                    if ui.button("Show dependencies").clicked() {
                        action = Some(MenuAction::ShowDependencies);
                    }
                    if ui.button("Show dependents").clicked() {
                        action = Some(MenuAction::ShowDependents);
                    }
                    if ui.button("Expand neighbors").clicked() {
                        action = Some(MenuAction::ExpandNeighbors);
                    }
                });
            });

        let Some(action) = action else {
            return;
        };
        self.menu_node = None;
        match action {
            MenuAction::OpenSource => self.notifier.open_source(&menu_id, path.as_deref()),
            MenuAction::RevealInTree => self.notifier.reveal_in_tree(&menu_id, path.as_deref()),
            MenuAction::ExpandNeighbors => self.expand_node(&menu_id, now),
            MenuAction::CopyPath => self.copy_import_path(ui.ctx(), &menu_id),
            MenuAction::ShowDependencies => self.show_dependencies(&menu_id),
            MenuAction::ShowDependents => self.show_dependents(&menu_id),
        }
    }

    pub(in crate::app) fn copy_import_path(&self, ctx: &egui::Context, id: &str) {
        match self.graph.node(id).and_then(|node| node.path.clone()) {
            Some(path) => ctx.copy_text(path),
            None => {
                // Fall back to the id so the clipboard still gets something
                // useful; the missing path is only worth a diagnostic.
                log::warn!("no source path recorded for {id}, copying the id instead");
                ctx.copy_text(id.to_owned());
            }
        }
    }
}

fn draw_background(painter: &Painter, rect: Rect, palette: &Palette, transform: &ViewTransform) {
    painter.rect_filled(rect, 0.0, palette.background);

    let step = (56.0 * transform.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + transform.translate;
    let stroke = Stroke::new(1.0, palette.grid_line);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}
