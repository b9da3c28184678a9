use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2};

use crate::layout::{LayoutArea, LayoutKind, assign_positions};
use crate::model::{ArchGraph, load_graph_document};

mod edge_geom;
mod expand;
mod highlight;
mod interaction;
mod notify;
mod style;
mod ui;
mod view;
mod viewport;

pub use style::Theme;

use expand::EXPANDING_FLAG_SECS;
use highlight::HighlightSet;
use interaction::DragState;
use notify::HostNotifier;
use viewport::ViewTransform;

/// Virtual extent the layout engine targets; the viewport maps it into
/// whatever window the canvas actually gets.
const GRAPH_AREA: LayoutArea = LayoutArea {
    width: 2400.0,
    height: 1600.0,
};

pub struct ArchLensApp {
    graph_path: String,
    layout_kind: LayoutKind,
    node_size: f32,
    theme: Theme,
    state: AppState,
    reload_rx: Option<Receiver<Result<ArchGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ArchGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: ArchGraph,
    layout_kind: LayoutKind,
    node_size: f32,
    theme: Theme,
    positions: HashMap<String, Pos2>,
    transform: ViewTransform,
    highlight: HighlightSet,
    selected: Option<String>,
    drag: DragState,
    search: String,
    menu_node: Option<String>,
    menu_position: Pos2,
    overlay_position: Pos2,
    expanding: Option<ExpandingFlag>,
    focus_request: Option<String>,
    layout_dirty: bool,
    view_reset_pending: bool,
    notifier: Box<dyn HostNotifier>,
}

struct ExpandingFlag {
    node_id: String,
    until: f64,
}

impl ArchLensApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        graph_path: String,
        layout_kind: LayoutKind,
        node_size: f32,
        theme: Theme,
    ) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            layout_kind,
            node_size,
            theme,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: String) -> Receiver<Result<ArchGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph_document(&graph_path).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }
}

impl eframe::App for ArchLensApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(
                            graph,
                            self.layout_kind,
                            self.node_size,
                            self.theme,
                        ))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading architecture graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load architecture graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.graph_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        // A reload refreshes the existing model in place so
                        // surviving nodes keep their positions and the camera
                        // stays put.
                        Ok(Ok(graph)) => model.apply_graph(graph),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn relayout(&mut self) {
        self.positions = assign_positions(
            &self.graph.node_ids(),
            &self.graph.edge_index_pairs(),
            self.layout_kind,
            GRAPH_AREA,
        );
        self.layout_dirty = false;
    }

    /// Swaps in a freshly loaded graph. Positions of surviving nodes are
    /// kept, everything that refers to a vanished node is dropped, and any
    /// id-set change invalidates the highlight and selection.
    fn apply_graph(&mut self, graph: ArchGraph) {
        let same_ids = self.graph.node_count() == graph.node_count()
            && graph.nodes.iter().all(|node| self.graph.contains(&node.id));

        self.positions.retain(|id, _| graph.contains(id));
        if !same_ids {
            self.highlight.clear();
            self.selected = None;
            self.menu_node = None;
            self.expanding = None;
            self.focus_request = None;
        }
        self.graph = graph;
        if self.positions.is_empty() {
            self.layout_dirty = true;
        }
    }

    fn select_node(&mut self, id: &str) {
        if !self.graph.contains(id) {
            return;
        }
        self.selected = Some(id.to_owned());
        self.highlight = HighlightSet::neighborhood(&self.graph, id);
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.highlight.clear();
    }

    fn show_dependencies(&mut self, id: &str) {
        self.highlight = HighlightSet::dependencies(&self.graph, id);
    }

    fn show_dependents(&mut self, id: &str) {
        self.highlight = HighlightSet::dependents(&self.graph, id);
    }

    /// Runs a neighbor expansion around `id` and raises the transient
    /// expanding marker until `now + EXPANDING_FLAG_SECS`.
    fn expand_node(&mut self, id: &str, now: f64) {
        self.notifier.expansion_requested(id);
        let Some(outcome) = expand::expand_neighbors(&self.graph, id, &mut self.positions) else {
            log::debug!("expansion skipped for {id}: node has no position yet");
            return;
        };
        if !outcome.placed.is_empty() {
            log::info!("expanded {id}: placed {} neighbors", outcome.placed.len());
        }
        self.highlight = outcome.highlight;
        self.expanding = Some(ExpandingFlag {
            node_id: id.to_owned(),
            until: now + EXPANDING_FLAG_SECS,
        });
    }
}
