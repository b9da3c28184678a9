use clap::ValueEnum;
use eframe::egui::Color32;

use crate::model::NodeKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug)]
pub struct NodeStyle {
    pub fill: Color32,
    pub stroke: Color32,
    pub text: Color32,
    pub badge: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub background: Color32,
    pub grid_line: Color32,
    pub edge: Color32,
    pub edge_highlight: Color32,
    pub selection: Color32,
    pub expanding_ring: Color32,
    pub panel_fill: Color32,
    pub panel_header: Color32,
    pub panel_text: Color32,
    pub tooltip_fill: Color32,
    pub tooltip_text: Color32,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            background: Color32::from_rgb(19, 23, 29),
            grid_line: Color32::from_rgba_unmultiplied(60, 70, 80, 70),
            edge: Color32::from_rgba_unmultiplied(130, 140, 152, 170),
            edge_highlight: Color32::from_rgb(246, 206, 104),
            selection: Color32::from_rgb(245, 206, 93),
            expanding_ring: Color32::from_rgb(103, 196, 255),
            panel_fill: Color32::from_rgba_unmultiplied(15, 15, 15, 190),
            panel_header: Color32::from_rgba_unmultiplied(40, 48, 58, 220),
            panel_text: Color32::from_rgb(222, 226, 230),
            tooltip_fill: Color32::from_rgba_unmultiplied(15, 15, 15, 190),
            tooltip_text: Color32::from_rgb(222, 226, 230),
        },
        Theme::Light => Palette {
            background: Color32::from_rgb(246, 247, 249),
            grid_line: Color32::from_rgba_unmultiplied(150, 158, 168, 80),
            edge: Color32::from_rgba_unmultiplied(90, 100, 112, 190),
            edge_highlight: Color32::from_rgb(196, 128, 8),
            selection: Color32::from_rgb(180, 120, 10),
            expanding_ring: Color32::from_rgb(22, 118, 196),
            panel_fill: Color32::from_rgba_unmultiplied(255, 255, 255, 230),
            panel_header: Color32::from_rgba_unmultiplied(210, 216, 224, 240),
            panel_text: Color32::from_rgb(36, 40, 46),
            tooltip_fill: Color32::from_rgba_unmultiplied(255, 255, 255, 235),
            tooltip_text: Color32::from_rgb(36, 40, 46),
        },
    }
}

/// Total mapping: every kind gets a style, unknown kinds fall into `Other`.
pub fn node_style(kind: NodeKind, theme: Theme) -> NodeStyle {
    let (base, badge) = match kind {
        NodeKind::Component => (Color32::from_rgb(92, 156, 230), "component"),
        NodeKind::Module => (Color32::from_rgb(104, 186, 130), "module"),
        NodeKind::Service => (Color32::from_rgb(241, 146, 94), "service"),
        NodeKind::Library => (Color32::from_rgb(172, 136, 224), "library"),
        NodeKind::External => (Color32::from_rgb(148, 152, 160), "external"),
        NodeKind::Other => (Color32::from_rgb(120, 130, 142), "node"),
    };
    match theme {
        Theme::Dark => NodeStyle {
            fill: blend_color(base, Color32::from_rgb(24, 28, 34), 0.55),
            stroke: base,
            text: Color32::from_rgb(228, 232, 236),
            badge,
        },
        Theme::Light => NodeStyle {
            fill: blend_color(base, Color32::WHITE, 0.72),
            stroke: blend_color(base, Color32::BLACK, 0.25),
            text: Color32::from_rgb(32, 36, 42),
            badge,
        },
    }
}

pub fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_style_in_both_themes() {
        let kinds = [
            NodeKind::Component,
            NodeKind::Module,
            NodeKind::Service,
            NodeKind::Library,
            NodeKind::External,
            NodeKind::Other,
        ];
        for theme in [Theme::Dark, Theme::Light] {
            for kind in kinds {
                let style = node_style(kind, theme);
                assert_ne!(style.fill, style.text, "{kind:?} text must contrast fill");
                assert!(!style.badge.is_empty());
            }
        }
    }

    #[test]
    fn unknown_kind_labels_use_the_fallback_style() {
        let fallback = node_style(NodeKind::from_label("frobnicator"), Theme::Dark);
        let other = node_style(NodeKind::Other, Theme::Dark);
        assert_eq!(fallback.fill, other.fill);
    }

    #[test]
    fn dim_reduces_every_channel() {
        let color = Color32::from_rgb(200, 100, 50);
        let dimmed = dim_color(color, 0.4);
        assert!(dimmed.r() < color.r());
        assert!(dimmed.g() < color.g());
        assert!(dimmed.b() < color.b());
    }
}
