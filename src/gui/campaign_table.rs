//! Campaign detail table with clickable, sortable headers.

use crate::data::{SortColumn, TableRow, TableSort};
use egui::RichText;

pub struct CampaignTable;

impl CampaignTable {
    fn cells(row: &TableRow) -> [&str; 7] {
        [
            row.campaign.as_str(),
            row.impressions.as_str(),
            row.interactions.as_str(),
            row.interaction_rate.as_str(),
            row.cost.as_str(),
            row.conversions.as_str(),
            row.cost_per_conversion.as_str(),
        ]
    }

    fn header_text(column: SortColumn, sort: TableSort) -> String {
        match sort.column {
            Some(c) if c == column && sort.descending => format!("{} ⏷", column.header()),
            Some(c) if c == column => format!("{} ⏶", column.header()),
            _ => column.header().to_string(),
        }
    }

    /// Draw the table. Returns the column whose header was clicked.
    pub fn show(ui: &mut egui::Ui, rows: &[TableRow], sort: TableSort) -> Option<SortColumn> {
        let mut clicked = None;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("campaign_table")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for column in SortColumn::ALL {
                            let text = RichText::new(Self::header_text(column, sort))
                                .strong()
                                .size(12.0);
                            if ui
                                .add(egui::Label::new(text).sense(egui::Sense::click()))
                                .on_hover_text("Click to sort")
                                .clicked()
                            {
                                clicked = Some(column);
                            }
                        }
                        ui.end_row();

                        for row in rows {
                            for (i, cell) in Self::cells(row).into_iter().enumerate() {
                                let text = RichText::new(cell).size(12.0);
                                if i == 0 {
                                    ui.label(text);
                                } else {
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| ui.label(text),
                                    );
                                }
                            }
                            ui.end_row();
                        }
                    });

                if rows.is_empty() {
                    ui.label(RichText::new("No campaigns match the filter").italics());
                }
            });

        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_marks_active_sort() {
        let mut sort = TableSort::default();
        assert_eq!(CampaignTable::header_text(SortColumn::Cost, sort), "Cost");

        sort.toggle(SortColumn::Cost);
        assert_eq!(CampaignTable::header_text(SortColumn::Cost, sort), "Cost ⏶");
        assert_eq!(CampaignTable::header_text(SortColumn::Campaign, sort), "Campaign");

        sort.toggle(SortColumn::Cost);
        assert_eq!(CampaignTable::header_text(SortColumn::Cost, sort), "Cost ⏷");
    }
}
