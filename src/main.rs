mod app;
mod layout;
mod model;
mod util;

use clap::Parser;

use crate::app::Theme;
use crate::layout::LayoutKind;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON graph document with node and edge lists.
    #[arg(long)]
    graph_path: String,

    #[arg(long, value_enum, default_value_t = LayoutKind::Force)]
    layout: LayoutKind,

    /// Uniform node size multiplier.
    #[arg(long, default_value_t = 1.0)]
    node_size: f32,

    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    theme: Theme,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "arch-lens",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ArchLensApp::new(
                cc,
                args.graph_path.clone(),
                args.layout,
                args.node_size,
                args.theme,
            )))
        }),
    )
}
