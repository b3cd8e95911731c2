use eframe::egui;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::data::geometry::RegionCollection;
use crate::data::records::{RecordStore, TripStatus};
use crate::data::retriever::{DataRetriever, SourceId, SourcePayload};
use crate::error::DataError;
use crate::map::layer::RegionLayer;
use crate::map::map::Map;
use crate::session::Session;
use crate::ui::editor::EditorPanel;
use crate::ui::signin::SignInPanel;
use crate::ui::{sidebar, theme};

type SourceResult = (SourceId, Result<SourcePayload, DataError>);

#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    Map,
    SignIn,
}

/// Initialization state. Both sources must arrive before the first render;
/// either failure is terminal and only recoverable by restarting the app.
enum Phase {
    Loading,
    Ready,
    Failed(String),
}

pub struct App {
    config: Config,
    session: Session,
    view: View,
    phase: Phase,
    regions: Option<RegionCollection>,
    store: Option<RecordStore>,
    layer: Option<RegionLayer>,
    editor: EditorPanel,
    signin: SignInPanel,
    /// Region whose popup is currently open.
    popup_region: Option<String>,
    /// Set by the map widget on click, consumed each frame.
    clicked_region: Option<String>,
    receiver: mpsc::UnboundedReceiver<SourceResult>,
    /// Kept alive for the lifetime of the app so in-flight fetches finish.
    _runtime: tokio::runtime::Runtime,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        cc.egui_ctx.set_style(theme::dark_theme(&cc.egui_ctx));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("source-fetcher")
            .enable_all()
            .build()
            .expect("Unable to create runtime");
        let (sender, receiver) = mpsc::unbounded_channel();

        // Both sources load independently; the app leaves Loading only once
        // both have arrived (or flips to Failed on the first error).
        let retriever = DataRetriever::new();
        let sources = [
            (SourceId::Geometry, config.geojson_source.clone()),
            (SourceId::Records, config.visits_source.clone()),
        ];
        for (id, location) in sources {
            let retriever = retriever.clone();
            let sender = sender.clone();
            let requester = cc.egui_ctx.clone();
            runtime.spawn(async move {
                let result = match id {
                    SourceId::Geometry => retriever.fetch_geometry(&location).await,
                    SourceId::Records => retriever.fetch_records(&location).await,
                };
                if sender.send((id, result)).is_err() {
                    log::warn!("ui closed before the {id:?} source arrived");
                }
                requester.request_repaint();
            });
        }

        Self {
            config,
            session: Session::new(),
            view: View::Map,
            phase: Phase::Loading,
            regions: None,
            store: None,
            layer: None,
            editor: EditorPanel::default(),
            signin: SignInPanel::default(),
            popup_region: None,
            clicked_region: None,
            receiver,
            _runtime: runtime,
        }
    }

    fn drain_sources(&mut self) {
        while let Ok((id, result)) = self.receiver.try_recv() {
            match result {
                Ok(SourcePayload::Geometry(regions)) => {
                    log::info!("loaded {} regions", regions.len());
                    self.regions = Some(regions);
                }
                Ok(SourcePayload::Records(store)) => {
                    log::info!("loaded {} visit records", store.len());
                    self.store = Some(store);
                }
                Err(e) => {
                    log::error!("failed to load {id:?} source: {e}");
                    self.phase = Phase::Failed(e.to_string());
                }
            }
        }

        if matches!(self.phase, Phase::Loading) {
            if let (Some(regions), Some(store)) = (&self.regions, &self.store) {
                self.layer = Some(RegionLayer::build(regions, store));
                self.editor
                    .set_region_names(regions.names().map(str::to_string).collect());
                self.phase = Phase::Ready;
            }
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("VisitMap");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.session.is_signed_in() {
                        if ui.button("Sign out").clicked() {
                            self.session.sign_out();
                            // Full view reset: edits stay, affordances go.
                            self.editor.clear_fields();
                            self.popup_region = None;
                            self.view = View::Map;
                        }
                    } else if self.view == View::Map {
                        if ui.button("Sign in").clicked() {
                            self.view = View::SignIn;
                        }
                    }
                });
            });
        });
    }

    fn sign_in_view(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(320.0);
                ui.add_space(60.0);
                if self.signin.ui(ui, &mut self.session) {
                    self.view = View::Map;
                }
                if ui.small_button("Back to map").clicked() {
                    self.view = View::Map;
                }
            });
        });
    }

    fn map_view(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("side_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                if let Some(store) = &self.store {
                    sidebar::stats_ui(ui, store, self.config.tracking_start);
                }
                // Edit affordances are gated here by visibility; the editor
                // itself does not re-check the session.
                if self.session.is_signed_in() {
                    if let (Phase::Ready, Some(regions), Some(store)) =
                        (&self.phase, &self.regions, &mut self.store)
                    {
                        ui.separator();
                        let committed =
                            self.editor
                                .ui(ui, store, regions, &self.config.export_path);
                        if committed {
                            // Explicit refresh after a commit, the layer never
                            // observes the store on its own.
                            self.layer = Some(RegionLayer::build(regions, store));
                        }
                    }
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| match &self.phase {
            Phase::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            Phase::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(
                        egui::Color32::LIGHT_RED,
                        format!("Failed to load map data: {message}"),
                    );
                });
            }
            Phase::Ready => {
                ui.style_mut().debug.debug_on_hover = false;
                if let (Some(layer), Some(regions)) = (&self.layer, &self.regions) {
                    let size = ui.available_size();
                    let map = Map::new("visit_map", layer, regions, &mut self.clicked_region)
                        .viewport_size(size);
                    ui.add(map);
                }
            }
        });

        if let Some(name) = self.clicked_region.take() {
            self.popup_region = Some(name);
        }
        self.region_popup(ctx);
    }

    fn region_popup(&mut self, ctx: &egui::Context) {
        let Some(name) = self.popup_region.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new(name.clone())
            .id(egui::Id::new("region_popup"))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let record = self.store.as_ref().and_then(|s| s.lookup(&name));
                match record {
                    Some(record) => {
                        ui.label(format!("Status: {}", record.status.label()));
                        match record.status {
                            TripStatus::Visited => {
                                ui.label(format!("Visit count: {}", record.visit_count));
                                ui.label(format!(
                                    "Last visit: {}",
                                    or_na(&record.last_visit_date)
                                ));
                                let all = record.all_visit_dates.join(", ");
                                ui.label(format!("All visits: {}", or_na(&all)));
                            }
                            TripStatus::Planned => {
                                ui.label(format!(
                                    "Planned visit date: {}",
                                    or_na(&record.last_visit_date)
                                ));
                            }
                            TripStatus::NotVisited => {}
                        }
                    }
                    None => {
                        ui.label("No visit data recorded for this state.");
                    }
                }
                if self.session.is_signed_in() && ui.button("Edit State Data").clicked() {
                    if let Some(store) = &self.store {
                        self.editor.select_region(&name, store);
                    }
                }
            });
        if !open {
            self.popup_region = None;
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Test for f11 key, to toggle fullscreen
        if let Some(new_fullscreen) = ctx.input(|i| {
            if i.key_pressed(egui::Key::F11) {
                Some(!i.viewport().fullscreen.unwrap_or(false))
            } else {
                None
            }
        }) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(new_fullscreen));
            ctx.send_viewport_cmd(egui::ViewportCommand::Decorations(!new_fullscreen));
            ctx.send_viewport_cmd(egui::ViewportCommand::Maximized(!new_fullscreen));
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        }

        self.drain_sources();
        self.top_bar(ctx);

        match self.view {
            View::SignIn => self.sign_in_view(ctx),
            View::Map => self.map_view(ctx),
        }
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}
