use eframe::egui::{self, Ui};

use crate::layout::LayoutKind;

use super::super::ViewModel;
use super::super::style::Theme;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.add_space(6.0);
        ui.heading("Search");
        ui.text_edit_singleline(&mut self.search);
        if !self.search.trim().is_empty() && ui.small_button("clear").clicked() {
            self.search.clear();
        }

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Layout");
        ui.horizontal_wrapped(|ui| {
            for kind in [
                LayoutKind::Circular,
                LayoutKind::Donut,
                LayoutKind::Spiral,
                LayoutKind::Force,
                LayoutKind::Tree,
            ] {
                if ui
                    .selectable_value(&mut self.layout_kind, kind, kind.label())
                    .clicked()
                {
                    self.layout_dirty = true;
                }
            }
        });
        ui.add_space(10.0);
        ui.separator();
        ui.heading("Appearance");
        // Node size rescales footprints in place; no layout pass needed.
        ui.add(
            egui::Slider::new(&mut self.node_size, 0.5..=2.0)
                .text("node size")
                .fixed_decimals(2),
        );
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.theme, Theme::Dark, "dark");
            ui.selectable_value(&mut self.theme, Theme::Light, "light");
        });

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Highlight");
        if ui
            .add_enabled(!self.highlight.is_empty(), egui::Button::new("Clear highlight"))
            .clicked()
        {
            self.clear_selection();
        }
        ui.label(format!(
            "{} nodes, {} edges emphasized",
            self.highlight.nodes.len(),
            self.highlight.edges.len()
        ));
    }
}
