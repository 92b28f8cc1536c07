//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::data::{DailyLeads, ModelCount, Origin, RankedCampaign, VehicleModel};
use crate::format::format_currency;
use chrono::{Datelike, NaiveDate};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

pub const OMODA_COLOR: Color32 = Color32::from_rgb(31, 119, 180); // Blue
pub const JAECOO_COLOR: Color32 = Color32::from_rgb(255, 127, 14); // Orange
pub const SERIES_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
pub const RANKING_COLOR: Color32 = Color32::from_rgb(100, 149, 237);

const CHART_HEIGHT: f32 = 300.0;
const GROUP_BAR_WIDTH: f64 = 0.35;

/// Longest campaign label drawn under a ranking bar.
const MAX_LABEL_CHARS: usize = 18;

/// Draws the dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn model_color(model: VehicleModel) -> Color32 {
        match model {
            VehicleModel::OmodaE5 => OMODA_COLOR,
            VehicleModel::JaecooJ7 => JAECOO_COLOR,
            VehicleModel::Unspecified => Color32::GRAY,
        }
    }

    /// Bars for one model, placed beside the other models within each origin.
    pub fn grouped_bars(counts: &[ModelCount], model: VehicleModel, slot: usize) -> Vec<Bar> {
        let offset = (slot as f64 - 0.5) * GROUP_BAR_WIDTH;
        counts
            .iter()
            .filter(|c| c.model == model)
            .filter_map(|c| {
                let x = Origin::ALL.iter().position(|o| *o == c.origin)? as f64;
                Some(
                    Bar::new(x + offset, c.count as f64)
                        .width(GROUP_BAR_WIDTH)
                        .name(format!("{} - {}", c.origin, model)),
                )
            })
            .collect()
    }

    /// Grouped bar chart: lead interest per model in each origin.
    pub fn draw_models_by_origin(ui: &mut egui::Ui, counts: &[ModelCount]) {
        Plot::new("models_by_origin")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .allow_drag(false)
            .include_y(0.0)
            .x_axis_label("Origin")
            .y_axis_label("Leads")
            .x_axis_formatter(|mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                Origin::ALL
                    .get(idx as usize)
                    .map(|o| o.label().to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (slot, model) in [VehicleModel::OmodaE5, VehicleModel::JaecooJ7]
                    .into_iter()
                    .enumerate()
                {
                    let bars = Self::grouped_bars(counts, model, slot);
                    if bars.is_empty() {
                        continue;
                    }
                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(Self::model_color(model))
                            .name(model.label()),
                    );
                }
            });
    }

    /// Daily leads as a line. X is the day number so the axis can print dates.
    pub fn draw_leads_per_day(ui: &mut egui::Ui, series: &[DailyLeads]) {
        let points: Vec<[f64; 2]> = series
            .iter()
            .map(|d| [d.date.num_days_from_ce() as f64, d.leads as f64])
            .collect();

        Plot::new("leads_per_day")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Date")
            .y_axis_label("Leads")
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() != 0.0 {
                    return String::new();
                }
                NaiveDate::from_num_days_from_ce_opt(mark.value as i32)
                    .map(|d| d.format("%d/%m").to_string())
                    .unwrap_or_default()
            })
            .label_formatter(|_name, point| {
                let day = NaiveDate::from_num_days_from_ce_opt(point.x.round() as i32)
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_default();
                format!("{day}\n{} leads", point.y.round())
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(SERIES_COLOR)
                        .width(2.0)
                        .name("Leads"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.0)
                        .color(SERIES_COLOR),
                );
            });
    }

    /// Cost per conversion bars, cheapest first.
    pub fn draw_ranking(ui: &mut egui::Ui, ranking: &[RankedCampaign]) {
        let labels: Vec<String> = ranking.iter().map(|r| Self::short_label(&r.name)).collect();
        let bars: Vec<Bar> = ranking
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(i as f64, r.cost_per_conversion)
                    .width(0.6)
                    .name(&r.name)
            })
            .collect();

        Plot::new("campaign_ranking")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .allow_drag(false)
            .include_y(0.0)
            .x_axis_label("Campaign")
            .y_axis_label("Cost per conversion (R$)")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .label_formatter(|name, point| {
                format!("{name}\n{}", format_currency(point.y))
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(RANKING_COLOR));
            });
    }

    fn short_label(name: &str) -> String {
        if name.chars().count() <= MAX_LABEL_CHARS {
            name.to_string()
        } else {
            let cut: String = name.chars().take(MAX_LABEL_CHARS - 1).collect();
            format!("{cut}…")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_bars_sit_side_by_side() {
        let counts = vec![
            ModelCount { origin: Origin::Recreio, model: VehicleModel::OmodaE5, count: 4 },
            ModelCount { origin: Origin::Curitiba, model: VehicleModel::OmodaE5, count: 2 },
            ModelCount { origin: Origin::Curitiba, model: VehicleModel::JaecooJ7, count: 1 },
        ];

        let omoda = ChartPlotter::grouped_bars(&counts, VehicleModel::OmodaE5, 0);
        let jaecoo = ChartPlotter::grouped_bars(&counts, VehicleModel::JaecooJ7, 1);

        assert_eq!(omoda.len(), 2);
        assert_eq!(jaecoo.len(), 1);
        assert!((omoda[1].argument - (1.0 - 0.5 * GROUP_BAR_WIDTH)).abs() < 1e-9);
        assert!((jaecoo[0].argument - (1.0 + 0.5 * GROUP_BAR_WIDTH)).abs() < 1e-9);
        assert_eq!(jaecoo[0].value, 1.0);
    }

    #[test]
    fn test_short_label() {
        assert_eq!(ChartPlotter::short_label("Search"), "Search");
        let long = ChartPlotter::short_label("Performance Max - Omoda E5 Recreio");
        assert_eq!(long.chars().count(), MAX_LABEL_CHARS);
        assert!(long.ends_with('…'));
    }
}
