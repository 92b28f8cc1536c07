//! Dashboard Main Application
//! Main window with control panel and dashboard view.

use crate::config::Config;
use crate::data::{DashboardData, DataCache, DataProcessor, TableSort};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Data loading result from background thread
enum LoadResult {
    Complete(Arc<DashboardData>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: Config,
    cache: Arc<DataCache>,
    data: Option<Arc<DashboardData>>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    sort: TableSort,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config, cache: Arc<DataCache>) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.data_dir.clone()),
            config,
            cache,
            data: None,
            chart_viewer: ChartViewer::new(),
            sort: TableSort::default(),
            load_rx: None,
            is_loading: false,
        };
        app.start_load();
        app
    }

    /// Ask the cache for data on a background thread.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_status("Loading data...");

        let cache = Arc::clone(&self.cache);
        thread::spawn(move || {
            let result = match cache.get() {
                Ok(data) => LoadResult::Complete(data),
                Err(e) => {
                    tracing::error!(error = %e, "dashboard data load failed");
                    LoadResult::Error(e.to_string())
                }
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
            Ok(LoadResult::Complete(data)) => {
                let unchanged = self
                    .data
                    .as_ref()
                    .is_some_and(|current| Arc::ptr_eq(current, &data));
                if !unchanged {
                    self.control_panel.update_options(&data);
                    self.data = Some(data);
                }
                self.refresh_view();
                let status = self.loaded_status();
                self.control_panel.set_status(&status);
                self.is_loading = false;
            }
            Ok(LoadResult::Error(error)) => {
                self.control_panel.set_status(&format!("Error: {}", error));
                self.is_loading = false;
            }
            Err(_) => {
                // Still loading
                self.load_rx = Some(rx);
            }
        }
    }

    fn loaded_status(&self) -> String {
        match &self.data {
            Some(data) => format!(
                "Loaded {} campaigns, {} leads ({} load(s) this session)",
                data.campaigns.len(),
                data.leads.len(),
                self.cache.loads()
            ),
            None => "No data".to_string(),
        }
    }

    /// Rebuild the presentation for the current filters. Never reloads files.
    fn refresh_view(&mut self) {
        if let Some(data) = &self.data {
            let filters = self.control_panel.settings.filters();
            let view = DataProcessor::build_view(data, &filters, self.sort);
            self.chart_viewer.set_view(view);
        }
    }

    /// Point the dashboard at another folder of input files.
    fn handle_open_folder(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            tracing::info!(dir = %dir.display(), "switching data folder");
            self.cache = Arc::new(DataCache::new(self.config.sources_in(&dir)));
            self.control_panel.settings.data_dir = Some(dir);
            self.data = None;
            self.chart_viewer.clear();
            self.start_load();
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui, self.is_loading) {
                        ControlPanelAction::OpenFolder => self.handle_open_folder(),
                        ControlPanelAction::Reload => self.start_load(),
                        ControlPanelAction::FiltersChanged => self.refresh_view(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(column) = self.chart_viewer.show(ui, self.sort) {
                self.sort.toggle(column);
                self.refresh_view();
            }
        });
    }
}
