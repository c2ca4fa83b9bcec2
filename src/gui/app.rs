//! NJ Library Explorer Main Application
//! Tab bar over the unified table, with background loading.

use super::tabs::{Choices, Tab, TabAction, TabPages};
use super::widgets::{ERROR_COLOR, INFO_COLOR, OK_COLOR};
use crate::charts::{chart_file_name, StaticChartRenderer, PNG_SIZE};
use crate::config::AppConfig;
use crate::data::{DataLoader, DatasetCache, UnifiedTable};
use crate::views::{export_file_name, DiscoveryView, HistoryView, RankView};
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{error, info, warn};

/// Dataset loading result from background thread
enum LoadResult {
    Complete(Arc<UnifiedTable>),
    Error(String),
}

/// Main application window.
pub struct ExplorerApp {
    config: AppConfig,
    cache: Arc<Mutex<DatasetCache>>,

    table: Option<Arc<UnifiedTable>>,
    choices: Choices,
    pages: TabPages,
    active_tab: Tab,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
    load_error: Option<String>,

    status: String,
    status_is_error: bool,
    last_export: Option<PathBuf>,
    show_about: bool,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let loader = DataLoader::new().with_year_validation(config.validate_year_tags);
        let mut app = Self {
            config,
            cache: Arc::new(Mutex::new(DatasetCache::new(loader))),
            table: None,
            choices: Choices::default(),
            pages: TabPages::default(),
            active_tab: Tab::Snapshot,
            load_rx: None,
            is_loading: false,
            load_error: None,
            status: "Ready".to_string(),
            status_is_error: false,
            last_export: None,
            show_about: false,
        };
        app.start_loading();
        app
    }

    /// Load (or fetch from cache) the data directory on a worker thread.
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }
        self.is_loading = true;
        self.set_status(
            format!("Loading {}...", self.config.data_dir.display()),
            false,
        );

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let cache = Arc::clone(&self.cache);
        let dir = self.config.data_dir.clone();
        thread::spawn(move || {
            let result = match cache.lock() {
                Ok(mut cache) => match cache.get_or_load(&dir) {
                    Ok(table) => LoadResult::Complete(table),
                    Err(e) => LoadResult::Error(e.to_string()),
                },
                Err(_) => LoadResult::Error("dataset cache is unavailable".to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(table)) => {
                let unchanged = self
                    .table
                    .as_ref()
                    .is_some_and(|current| Arc::ptr_eq(current, &table));
                if !unchanged {
                    self.choices = Choices::from_table(&table);
                    self.pages = TabPages::default();
                }
                self.set_status(
                    format!(
                        "Loaded {} records across {} years",
                        table.height(),
                        self.choices.years.len()
                    ),
                    false,
                );
                self.table = Some(table);
                self.load_error = None;
                self.is_loading = false;
            }
            Ok(LoadResult::Error(message)) => {
                error!(%message, "failed to load dataset");
                self.table = None;
                self.load_error = Some(message);
                self.is_loading = false;
                self.set_status("Load failed".to_string(), true);
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.is_loading = false;
                self.load_error = Some("loader thread stopped unexpectedly".to_string());
            }
        }
    }

    fn set_status(&mut self, status: String, is_error: bool) {
        self.status = status;
        self.status_is_error = is_error;
    }

    fn handle_action(&mut self, action: TabAction) {
        match action {
            TabAction::None => {}
            TabAction::ExportCsv(view) => self.handle_export_csv(&view),
            TabAction::SaveCsvAs(view) => self.handle_save_csv_as(&view),
            TabAction::SaveTrendPng(view) => self.handle_save_trend(&view),
            TabAction::SaveRankPng(view) => self.handle_save_rank(&view),
        }
    }

    fn handle_export_csv(&mut self, view: &DiscoveryView) {
        match view.write_csv(&self.config.export_dir) {
            Ok(path) => self.exported(path, format!("Exported {} rows", view.len())),
            Err(e) => self.export_failed("CSV export", &e.to_string()),
        }
    }

    fn handle_save_csv_as(&mut self, view: &DiscoveryView) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_directory(&self.config.export_dir)
            .set_file_name(export_file_name(&view.search))
            .save_file()
        else {
            return; // User cancelled
        };

        match view.write_csv_to(&path) {
            Ok(()) => self.exported(path, format!("Exported {} rows", view.len())),
            Err(e) => self.export_failed("CSV export", &e.to_string()),
        }
    }

    fn handle_save_trend(&mut self, view: &HistoryView) {
        let end_year = view.years.last().map(String::as_str).unwrap_or_default();
        let path = self
            .config
            .export_dir
            .join(chart_file_name("trend", &[&view.library, end_year]));
        match StaticChartRenderer::render_trend_png(view, &path, PNG_SIZE) {
            Ok(()) => self.exported(path, "Saved trend chart".to_string()),
            Err(e) => self.export_failed("Trend chart", &e.to_string()),
        }
    }

    fn handle_save_rank(&mut self, view: &RankView) {
        let path = self
            .config
            .export_dir
            .join(chart_file_name("rank", &[&view.metric, &view.year]));
        match StaticChartRenderer::render_rank_png(view, &path, PNG_SIZE) {
            Ok(()) => self.exported(path, "Saved leaderboard chart".to_string()),
            Err(e) => self.export_failed("Leaderboard chart", &e.to_string()),
        }
    }

    fn exported(&mut self, path: PathBuf, what: String) {
        info!(path = %path.display(), "{what}");
        self.set_status(format!("{what} to {}", path.display()), false);
        self.last_export = Some(path);
    }

    fn export_failed(&mut self, what: &str, message: &str) {
        warn!(%message, "{what} failed");
        self.set_status(format!("{what} failed: {message}"), true);
    }

    fn show_tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for tab in Tab::ALL {
                let text = RichText::new(tab.label()).size(15.0);
                let text = if self.active_tab == tab {
                    text.strong().color(Color32::from_rgb(128, 0, 0))
                } else {
                    text
                };
                if ui.selectable_label(self.active_tab == tab, text).clicked() {
                    self.active_tab = tab;
                }
            }
        });
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.is_loading {
                ui.spinner();
            }
            let color = if self.status_is_error {
                ERROR_COLOR
            } else if self.last_export.is_some() {
                OK_COLOR
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(color));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("About").clicked() {
                    self.show_about = true;
                }
                if ui
                    .add_enabled(!self.is_loading, egui::Button::new("⟳ Reload").small())
                    .clicked()
                {
                    self.start_loading();
                }
                if let Some(path) = &self.last_export {
                    if ui.small_button("📂 Open last export").clicked() {
                        if let Err(e) = open::that(path) {
                            warn!(error = %e, path = %path.display(), "could not open export");
                        }
                    }
                }
            });
        });
    }

    fn show_about_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("About This App")
            .open(&mut self.show_about)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label(
                    "Explore the New Jersey public library annual reports: a single \
                     library's snapshot, its trend over recent years, side-by-side \
                     comparisons, statewide rankings and a searchable export.",
                );
                ui.add_space(5.0);
                ui.label(format!("Data directory: {}", self.config.data_dir.display()));
                ui.label(format!("Exports: {}", self.config.export_dir.display()));
            });
    }

    fn show_active_tab(&mut self, ui: &mut egui::Ui, table: &UnifiedTable) -> TabAction {
        let pages = &mut self.pages;
        let choices = &self.choices;
        match self.active_tab {
            Tab::Snapshot => {
                pages.snapshot.show(ui, table, choices);
                TabAction::None
            }
            Tab::History => pages
                .history
                .show(ui, table, choices, self.config.trend_window),
            Tab::Compare => {
                pages.compare.show(ui, table, choices);
                TabAction::None
            }
            Tab::Rank => pages
                .rank
                .show(ui, table, choices, self.config.leaderboard_size),
            Tab::Discovery => pages.discovery.show(ui, table),
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📚 NJ Public Library Data Explorer")
                    .size(24.0)
                    .color(INFO_COLOR),
            );
            ui.add_space(5.0);
            if self.table.is_some() {
                self.show_tab_bar(ui);
                ui.add_space(3.0);
            }
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.show_status_bar(ui);
        });

        self.show_about_window(ctx);

        let mut action = TabAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.load_error {
                ui.label(
                    RichText::new(format!(
                        "An error occurred while loading the application: {message}"
                    ))
                    .color(ERROR_COLOR),
                );
                return;
            }
            let Some(table) = self.table.clone() else {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            };

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    action = self.show_active_tab(ui, &table);
                });
        });

        self.handle_action(action);
    }
}
