use eframe::egui::{self, RichText, Ui};

use crate::util::display_label;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.add_space(6.0);
        ui.heading("Details");

        let Some(selected_id) = self.selected.clone() else {
            ui.add_space(4.0);
            ui.label("Click a node to inspect it.");
            ui.label("Right-click opens the node actions menu.");
            return;
        };
        let Some(node) = self.graph.node(&selected_id) else {
            self.selected = None;
            return;
        };

        let name = node.name.clone();
        let kind = node.kind;
        let path = node.path.clone();
        let dependencies: Vec<String> = self
            .graph
            .incoming(&selected_id)
            .map(|edge| edge.source.clone())
            .collect();
        let dependents: Vec<String> = self
            .graph
            .outgoing(&selected_id)
            .map(|edge| edge.target.clone())
            .collect();

        ui.add_space(4.0);
        ui.label(RichText::new(&name).strong().size(16.0));
        ui.label(format!("kind: {}", kind.label()));
        ui.label(format!("id: {selected_id}"));
        if let Some(path) = &path {
            ui.label(format!("path: {path}"));
        }

        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            if ui.button("Focus").clicked() {
                self.focus_request = Some(selected_id.clone());
            }
            if ui.button("Show dependencies").clicked() {
                self.show_dependencies(&selected_id);
            }
            if ui.button("Show dependents").clicked() {
                self.show_dependents(&selected_id);
            }
        });
        ui.horizontal_wrapped(|ui| {
            if ui.button("Expand neighbors").clicked() {
                let now = ui.input(|input| input.time);
                self.expand_node(&selected_id, now);
            }
            if ui.button("Copy import path").clicked() {
                self.copy_import_path(ui.ctx(), &selected_id);
            }
        });
        ui.horizontal_wrapped(|ui| {
            if ui.button("Open source").clicked() {
                self.notifier.open_source(&selected_id, path.as_deref());
            }
            if ui.button("Reveal in file tree").clicked() {
                self.notifier.reveal_in_tree(&selected_id, path.as_deref());
            }
        });

        ui.add_space(10.0);
        ui.separator();

        let mut jump_to: Option<String> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.label(
                RichText::new(format!("Dependencies ({})", dependencies.len())).strong(),
            );
            if dependencies.is_empty() {
                ui.label("none");
            }
            for id in &dependencies {
                if ui.link(display_label(id)).clicked() {
                    jump_to = Some(id.clone());
                }
            }

            ui.add_space(8.0);
            ui.label(RichText::new(format!("Dependents ({})", dependents.len())).strong());
            if dependents.is_empty() {
                ui.label("none");
            }
            for id in &dependents {
                if ui.link(display_label(id)).clicked() {
                    jump_to = Some(id.clone());
                }
            }
        });

        if let Some(id) = jump_to {
            self.select_node(&id);
            self.focus_request = Some(id);
        }
    }
}
