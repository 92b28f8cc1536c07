//! Control Panel Widget
//! Left side panel with data source actions and the dashboard filters.

use crate::data::{DashboardData, DataProcessor, DateRange, Filters, ALL_CAMPAIGNS};
use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Filter selections made by the user.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub data_dir: Option<PathBuf>,
    pub campaign: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl UserSettings {
    pub fn filters(&self) -> Filters {
        let campaign = (!self.campaign.is_empty() && self.campaign != ALL_CAMPAIGNS)
            .then(|| self.campaign.clone());
        let dates = match (self.date_from, self.date_to) {
            (Some(from), Some(to)) => Some(DateRange { from, to }),
            _ => None,
        };
        Filters { campaign, dates }
    }
}

/// Left side control panel with data source and filter controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub campaign_options: Vec<String>,
    pub lead_dates: Vec<NaiveDate>,
    pub status: String,
    pub has_data: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            campaign_options: vec![ALL_CAMPAIGNS.to_string()],
            lead_dates: Vec::new(),
            status: "Ready".to_string(),
            has_data: false,
        }
    }
}

impl ControlPanel {
    pub fn new(data_dir: PathBuf) -> Self {
        let mut panel = Self::default();
        panel.settings.data_dir = Some(data_dir);
        panel
    }

    /// Reset selectors after a (re)load: all campaigns, full date span.
    pub fn update_options(&mut self, data: &DashboardData) {
        self.campaign_options = DataProcessor::campaign_options(&data.campaigns);
        self.lead_dates = DataProcessor::leads_per_day(&data.leads)
            .into_iter()
            .map(|d| d.date)
            .collect();

        if !self.campaign_options.contains(&self.settings.campaign) {
            self.settings.campaign = ALL_CAMPAIGNS.to_string();
        }
        self.settings.date_from = self.lead_dates.first().copied();
        self.settings.date_to = self.lead_dates.last().copied();
        self.has_data = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, is_loading: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Campaign Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Ads & Leads Performance")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let dir_text = self
                    .settings
                    .data_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "No folder selected".to_string());
                ui.label(RichText::new(dir_text).size(12.0));

                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!is_loading, |ui| {
                        if ui.button("📂 Open folder").clicked() {
                            action = ControlPanelAction::OpenFolder;
                        }
                        if ui.button("🔄 Reload").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 180.0;

        ui.add_enabled_ui(self.has_data, |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Campaign:"));
                ComboBox::from_id_salt("campaign_filter")
                    .width(combo_width)
                    .selected_text(&self.settings.campaign)
                    .show_ui(ui, |ui| {
                        for option in &self.campaign_options {
                            if ui
                                .selectable_label(self.settings.campaign == *option, option)
                                .clicked()
                            {
                                self.settings.campaign = option.clone();
                                action = ControlPanelAction::FiltersChanged;
                            }
                        }
                    });
            });

            ui.add_space(5.0);

            if Self::date_combo(
                ui,
                "date_from",
                "From:",
                &self.lead_dates,
                &mut self.settings.date_from,
                label_width,
                combo_width,
            ) {
                if let (Some(from), Some(to)) = (self.settings.date_from, self.settings.date_to) {
                    if from > to {
                        self.settings.date_to = Some(from);
                    }
                }
                action = ControlPanelAction::FiltersChanged;
            }

            ui.add_space(5.0);

            if Self::date_combo(
                ui,
                "date_to",
                "To:",
                &self.lead_dates,
                &mut self.settings.date_to,
                label_width,
                combo_width,
            ) {
                if let (Some(from), Some(to)) = (self.settings.date_from, self.settings.date_to) {
                    if to < from {
                        self.settings.date_from = Some(to);
                    }
                }
                action = ControlPanelAction::FiltersChanged;
            }

            ui.add_space(8.0);
            if ui.small_button("Reset filters").clicked() {
                self.settings.campaign = ALL_CAMPAIGNS.to_string();
                self.settings.date_from = self.lead_dates.first().copied();
                self.settings.date_to = self.lead_dates.last().copied();
                action = ControlPanelAction::FiltersChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);

        if is_loading {
            ui.add(egui::Spinner::new());
        }

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Date selector over the days that have leads. Returns true on change.
    fn date_combo(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        dates: &[NaiveDate],
        selected: &mut Option<NaiveDate>,
        label_width: f32,
        combo_width: f32,
    ) -> bool {
        let mut changed = false;
        let selected_text = selected
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(combo_width)
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for date in dates {
                        let text = date.format("%d/%m/%Y").to_string();
                        if ui.selectable_label(*selected == Some(*date), text).clicked() {
                            *selected = Some(*date);
                            changed = true;
                        }
                    }
                });
        });

        changed
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenFolder,
    Reload,
    FiltersChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_to_filters() {
        let mut settings = UserSettings {
            campaign: ALL_CAMPAIGNS.to_string(),
            ..Default::default()
        };
        assert_eq!(settings.filters(), Filters::default());

        settings.campaign = "Search".to_string();
        settings.date_from = NaiveDate::from_ymd_opt(2024, 3, 1);
        settings.date_to = NaiveDate::from_ymd_opt(2024, 3, 5);
        let filters = settings.filters();
        assert_eq!(filters.campaign.as_deref(), Some("Search"));
        assert_eq!(
            filters.dates.map(|r| (r.from.to_string(), r.to.to_string())),
            Some(("2024-03-01".to_string(), "2024-03-05".to_string()))
        );
    }
}
