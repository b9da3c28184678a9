use std::collections::HashMap;

use eframe::egui::{self, Align, Context, Layout, Pos2, pos2};

use crate::layout::LayoutKind;
use crate::model::ArchGraph;

use super::super::highlight::HighlightSet;
use super::super::interaction::DragState;
use super::super::notify::LogNotifier;
use super::super::style::Theme;
use super::super::viewport::ViewTransform;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(
        graph: ArchGraph,
        layout_kind: LayoutKind,
        node_size: f32,
        theme: Theme,
    ) -> Self {
        Self {
            graph,
            layout_kind,
            node_size: node_size.clamp(0.5, 2.0),
            theme,
            positions: HashMap::new(),
            transform: ViewTransform::default(),
            highlight: HighlightSet::default(),
            selected: None,
            drag: DragState::Idle,
            search: String::new(),
            menu_node: None,
            menu_position: Pos2::ZERO,
            overlay_position: pos2(12.0, 12.0),
            expanding: None,
            focus_request: None,
            layout_dirty: true,
            view_reset_pending: true,
            notifier: Box::new(LogNotifier),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        graph_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("arch-lens");
                    ui.separator();
                    ui.label(format!("graph: {graph_path}"));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload graph"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Re-layout").clicked() {
                        self.layout_dirty = true;
                    }
                    if ui.button("Reset view").clicked() {
                        self.view_reset_pending = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if is_loading {
                            ui.spinner();
                            ui.label("reloading...");
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
