//! Chart Viewer Widget
//! Central scrollable panel: metric tiles, charts and the campaign table.

use crate::charts::ChartPlotter;
use crate::data::{DashboardView, SortColumn, TableSort};
use crate::gui::campaign_table::CampaignTable;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const TILE_WIDTH: f32 = 260.0;

/// Scrollable dashboard display area.
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<DashboardView>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    /// Draw the dashboard. Returns the table column the user asked to sort by.
    pub fn show(&self, ui: &mut egui::Ui, sort: TableSort) -> Option<SortColumn> {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return None;
        };

        let mut clicked = None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::section_title(ui, "📈 Key Metrics");
                ui.horizontal(|ui| {
                    Self::metric_tile(
                        ui,
                        "Qualified leads",
                        &view.summary.total_leads_display(),
                        "Leads that filled the forms on the Omoda and Jaecoo sites",
                    );
                    Self::metric_tile(
                        ui,
                        "Ad spend (Google)",
                        &view.summary.total_spend_display(),
                        "Total cost of the Google Ads campaigns",
                    );
                    Self::metric_tile(
                        ui,
                        "Average CPL (Google)",
                        &view.summary.average_cost_per_lead_display(),
                        "Ad spend divided by qualified leads",
                    );
                });
                ui.add_space(SECTION_SPACING);

                Self::section_title(ui, "🚗 Models by Origin");
                if view.models_by_origin.is_empty() {
                    Self::empty_hint(ui);
                } else {
                    ChartPlotter::draw_models_by_origin(ui, &view.models_by_origin);
                }
                ui.add_space(SECTION_SPACING);

                Self::section_title(ui, "📊 Daily Leads");
                if let Some(range) = view.selected_dates {
                    ui.label(
                        RichText::new(format!(
                            "{} - {}",
                            range.from.format("%d/%m/%Y"),
                            range.to.format("%d/%m/%Y")
                        ))
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                }
                if view.leads_per_day.is_empty() {
                    Self::empty_hint(ui);
                } else {
                    ChartPlotter::draw_leads_per_day(ui, &view.leads_per_day);
                }
                ui.add_space(SECTION_SPACING);

                Self::section_title(ui, "🏆 Campaign Ranking by Cost per Conversion");
                if view.ranking.is_empty() {
                    Self::empty_hint(ui);
                } else {
                    ChartPlotter::draw_ranking(ui, &view.ranking);
                }
                ui.add_space(SECTION_SPACING);

                Self::section_title(ui, "📋 Campaign Details (Google)");
                clicked = CampaignTable::show(ui, &view.table, sort);
            });

        clicked
    }

    fn section_title(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(6.0);
    }

    fn empty_hint(ui: &mut egui::Ui) {
        ui.label(RichText::new("Nothing to show for the current filters").italics());
    }

    fn metric_tile(ui: &mut egui::Ui, label: &str, value: &str, help: &str) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(100, 149, 237)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(TILE_WIDTH);
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(24.0).strong());
                })
                .response
                .on_hover_text(help);
            });
    }
}
