//! Data Processor Module
//! Pure transformations from loaded records into chart- and table-ready shapes.

use super::loader::DashboardData;
use super::model::{CampaignRow, Lead, Origin, VehicleModel};
use crate::format::{format_currency, format_decimal, format_integer, format_percentage};
use crate::stats::{StatsCalculator, SummaryMetrics};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Label of the campaign selector entry that disables the filter.
pub const ALL_CAMPAIGNS: &str = "All campaigns";

/// Lead count for one (origin, model) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCount {
    pub origin: Origin,
    pub model: VehicleModel,
    pub count: usize,
}

/// Leads created on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyLeads {
    pub date: NaiveDate,
    pub leads: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCampaign {
    pub name: String,
    pub cost_per_conversion: f64,
    pub cost_per_conversion_display: String,
}

/// Display strings for one line of the detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub campaign: String,
    pub impressions: String,
    pub interactions: String,
    pub interaction_rate: String,
    pub cost: String,
    pub conversions: String,
    pub cost_per_conversion: String,
}

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// User-controlled filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    /// `None` shows every campaign in the table.
    pub campaign: Option<String>,
    /// `None` means the full span of lead dates.
    pub dates: Option<DateRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Campaign,
    Impressions,
    Interactions,
    InteractionRate,
    Cost,
    Conversions,
    CostPerConversion,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Campaign,
        SortColumn::Impressions,
        SortColumn::Interactions,
        SortColumn::InteractionRate,
        SortColumn::Cost,
        SortColumn::Conversions,
        SortColumn::CostPerConversion,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            SortColumn::Campaign => "Campaign",
            SortColumn::Impressions => "Impressions",
            SortColumn::Interactions => "Interactions",
            SortColumn::InteractionRate => "Interaction rate",
            SortColumn::Cost => "Cost",
            SortColumn::Conversions => "Conversions",
            SortColumn::CostPerConversion => "Cost/conv.",
        }
    }

    fn compare(&self, a: &CampaignRow, b: &CampaignRow) -> Ordering {
        let by_value = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        match self {
            SortColumn::Campaign => a.name.cmp(&b.name),
            SortColumn::Impressions => a.impressions.cmp(&b.impressions),
            SortColumn::Interactions => a.interactions.cmp(&b.interactions),
            SortColumn::InteractionRate => by_value(a.interaction_rate, b.interaction_rate),
            SortColumn::Cost => by_value(a.cost, b.cost),
            SortColumn::Conversions => by_value(a.conversions, b.conversions),
            SortColumn::CostPerConversion => {
                by_value(a.cost_per_conversion, b.cost_per_conversion)
            }
        }
    }
}

/// Table ordering. `None` column keeps report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSort {
    pub column: Option<SortColumn>,
    pub descending: bool,
}

impl TableSort {
    /// Header click: first click sorts ascending, second flips direction.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.descending = !self.descending;
        } else {
            self.column = Some(column);
            self.descending = false;
        }
    }
}

/// Everything the presentation layer renders for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub summary: SummaryMetrics,
    pub models_by_origin: Vec<ModelCount>,
    pub leads_per_day: Vec<DailyLeads>,
    pub ranking: Vec<RankedCampaign>,
    pub table: Vec<TableRow>,
    pub campaign_options: Vec<String>,
    pub date_span: Option<DateRange>,
    pub selected_dates: Option<DateRange>,
}

/// Handles grouping, ranking and table shaping.
pub struct DataProcessor;

impl DataProcessor {
    /// Earliest and latest lead dates.
    pub fn lead_date_span(leads: &[Lead]) -> Option<DateRange> {
        let from = leads.iter().map(|l| l.created_at.date()).min()?;
        let to = leads.iter().map(|l| l.created_at.date()).max()?;
        Some(DateRange { from, to })
    }

    /// Selector entries: the "all" entry, then distinct names in report order.
    pub fn campaign_options(campaigns: &[CampaignRow]) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(ALL_CAMPAIGNS.to_string())
            .chain(
                campaigns
                    .iter()
                    .filter(|c| seen.insert(c.name.as_str()))
                    .map(|c| c.name.clone()),
            )
            .collect()
    }

    /// Lead counts per (origin, model), leaving out unclassified leads.
    pub fn models_by_origin<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> Vec<ModelCount> {
        let mut counts: BTreeMap<(Origin, VehicleModel), usize> = BTreeMap::new();
        for lead in leads {
            let model = lead.model();
            if model == VehicleModel::Unspecified {
                continue;
            }
            *counts.entry((lead.origin, model)).or_default() += 1;
        }

        counts
            .into_iter()
            .map(|((origin, model), count)| ModelCount {
                origin,
                model,
                count,
            })
            .collect()
    }

    /// One entry per distinct creation date, chronological.
    pub fn leads_per_day<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> Vec<DailyLeads> {
        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for lead in leads {
            *counts.entry(lead.created_at.date()).or_default() += 1;
        }

        counts
            .into_iter()
            .map(|(date, leads)| DailyLeads { date, leads })
            .collect()
    }

    /// Cheapest cost per conversion first. Ties keep report order.
    pub fn rank_campaigns(campaigns: &[CampaignRow]) -> Vec<RankedCampaign> {
        let mut ranked: Vec<&CampaignRow> = campaigns.iter().collect();
        ranked.sort_by(|a, b| SortColumn::CostPerConversion.compare(a, b));

        ranked
            .into_iter()
            .map(|c| RankedCampaign {
                name: c.name.clone(),
                cost_per_conversion: c.cost_per_conversion,
                cost_per_conversion_display: format_currency(c.cost_per_conversion),
            })
            .collect()
    }

    pub fn table_row(campaign: &CampaignRow) -> TableRow {
        TableRow {
            campaign: campaign.name.clone(),
            impressions: format_integer(campaign.impressions),
            interactions: format_integer(campaign.interactions),
            interaction_rate: format_percentage(campaign.interaction_rate),
            cost: format_currency(campaign.cost),
            conversions: format_decimal(campaign.conversions),
            cost_per_conversion: format_currency(campaign.cost_per_conversion),
        }
    }

    /// Formatted detail table for the selected campaign (or all of them).
    pub fn detail_table(
        campaigns: &[CampaignRow],
        campaign: Option<&str>,
        sort: TableSort,
    ) -> Vec<TableRow> {
        let mut rows: Vec<&CampaignRow> = campaigns
            .iter()
            .filter(|c| campaign.map_or(true, |name| c.name == name))
            .collect();

        if let Some(column) = sort.column {
            rows.sort_by(|a, b| {
                let ord = column.compare(a, b);
                if sort.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        rows.into_iter().map(Self::table_row).collect()
    }

    /// Recompute the presentation for new filter or sort settings.
    pub fn build_view(data: &DashboardData, filters: &Filters, sort: TableSort) -> DashboardView {
        let date_span = Self::lead_date_span(&data.leads);
        let selected_dates = filters.dates.or(date_span);

        let in_range = |lead: &&Lead| {
            selected_dates.map_or(true, |range| range.contains(lead.created_at.date()))
        };

        DashboardView {
            summary: StatsCalculator::summary(&data.campaigns, &data.leads),
            models_by_origin: Self::models_by_origin(data.leads.iter().filter(in_range)),
            leads_per_day: Self::leads_per_day(data.leads.iter().filter(in_range)),
            ranking: Self::rank_campaigns(&data.campaigns),
            table: Self::detail_table(&data.campaigns, filters.campaign.as_deref(), sort),
            campaign_options: Self::campaign_options(&data.campaigns),
            date_span,
            selected_dates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn lead(ts: &str, name: &str, version: Option<&str>, origin: Origin) -> Lead {
        Lead {
            created_at: NaiveDateTime::parse_from_str(ts, "%d/%m/%Y %H:%M:%S").unwrap(),
            name: name.to_string(),
            email: format!("{}@exemplo.com", name.to_lowercase()),
            version: version.map(str::to_string),
            origin,
        }
    }

    fn campaign(name: &str, cost: f64, conversions: f64) -> CampaignRow {
        CampaignRow {
            name: name.to_string(),
            impressions: 1000,
            interactions: 50,
            interaction_rate: 5.0,
            cost,
            cost_per_conversion: StatsCalculator::cost_per(cost, conversions),
            conversions,
        }
    }

    fn sample() -> DashboardData {
        DashboardData {
            campaigns: vec![
                campaign("C", 300.0, 10.0),
                campaign("A", 100.0, 10.0),
                campaign("B", 50.0, 5.0),
            ],
            leads: vec![
                lead("02/03/2024 10:00:00", "Ana", Some("Omoda E5"), Origin::Recreio),
                lead("01/03/2024 23:59:59", "Bia", Some("jaecoo j7"), Origin::Recreio),
                lead("01/03/2024 08:00:00", "Caio", Some("OMODA"), Origin::Curitiba),
                lead("03/03/2024 12:00:00", "Duda", None, Origin::Curitiba),
                lead("03/03/2024 13:00:00", "Eva", Some("Omoda E5 EV"), Origin::Recreio),
            ],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_models_by_origin_skips_unspecified() {
        let data = sample();
        let counts = DataProcessor::models_by_origin(&data.leads);

        assert_eq!(
            counts,
            vec![
                ModelCount { origin: Origin::Recreio, model: VehicleModel::OmodaE5, count: 2 },
                ModelCount { origin: Origin::Recreio, model: VehicleModel::JaecooJ7, count: 1 },
                ModelCount { origin: Origin::Curitiba, model: VehicleModel::OmodaE5, count: 1 },
            ]
        );
    }

    #[test]
    fn test_leads_per_day_is_chronological() {
        let data = sample();
        let series = DataProcessor::leads_per_day(&data.leads);

        assert_eq!(
            series,
            vec![
                DailyLeads { date: date(2024, 3, 1), leads: 2 },
                DailyLeads { date: date(2024, 3, 2), leads: 1 },
                DailyLeads { date: date(2024, 3, 3), leads: 2 },
            ]
        );
    }

    #[test]
    fn test_ranking_ties_keep_report_order() {
        let data = sample();
        let ranking = DataProcessor::rank_campaigns(&data.campaigns);

        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(ranking[0].cost_per_conversion_display, "R$ 10,00");
        assert_eq!(ranking[1].cost_per_conversion_display, "R$ 10,00");
        assert_eq!(ranking[2].cost_per_conversion_display, "R$ 30,00");
    }

    #[test]
    fn test_end_to_end_equal_cost_per_conversion() {
        let campaigns = vec![campaign("A", 100.0, 10.0), campaign("B", 50.0, 5.0)];
        let ranking = DataProcessor::rank_campaigns(&campaigns);

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "A");
        assert_eq!(ranking[1].name, "B");
        assert!(ranking.iter().all(|r| r.cost_per_conversion_display == "R$ 10,00"));
    }

    #[test]
    fn test_campaign_options_are_distinct() {
        let mut campaigns = sample().campaigns;
        campaigns.push(campaign("A", 1.0, 1.0));

        assert_eq!(
            DataProcessor::campaign_options(&campaigns),
            vec![ALL_CAMPAIGNS, "C", "A", "B"]
        );
    }

    #[test]
    fn test_detail_table_filter_and_sort() {
        let data = sample();

        let only_b = DataProcessor::detail_table(&data.campaigns, Some("B"), TableSort::default());
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].cost, "R$ 50,00");
        assert_eq!(only_b[0].impressions, "1.000");
        assert_eq!(only_b[0].interaction_rate, "5,00%");
        assert_eq!(only_b[0].conversions, "5,00");

        let mut sort = TableSort::default();
        sort.toggle(SortColumn::Cost);
        let asc = DataProcessor::detail_table(&data.campaigns, None, sort);
        let names: Vec<&str> = asc.iter().map(|r| r.campaign.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);

        sort.toggle(SortColumn::Cost);
        let desc = DataProcessor::detail_table(&data.campaigns, None, sort);
        let names: Vec<&str> = desc.iter().map(|r| r.campaign.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_build_view_defaults_to_full_span() {
        let data = sample();
        let view = DataProcessor::build_view(&data, &Filters::default(), TableSort::default());

        let span = DateRange { from: date(2024, 3, 1), to: date(2024, 3, 3) };
        assert_eq!(view.date_span, Some(span));
        assert_eq!(view.selected_dates, Some(span));
        assert_eq!(view.leads_per_day.len(), 3);
        assert_eq!(view.table.len(), 3);
        assert_eq!(view.summary.total_leads, 5);
        assert_eq!(view.summary.total_spend_display(), "R$ 450,00");
        assert_eq!(view.summary.average_cost_per_lead_display(), "R$ 90,00");
    }

    #[test]
    fn test_build_view_date_filter_only_touches_lead_charts() {
        let data = sample();
        let filters = Filters {
            campaign: Some("A".to_string()),
            dates: Some(DateRange { from: date(2024, 3, 3), to: date(2024, 3, 3) }),
        };
        let view = DataProcessor::build_view(&data, &filters, TableSort::default());

        assert_eq!(view.leads_per_day, vec![DailyLeads { date: date(2024, 3, 3), leads: 2 }]);
        assert_eq!(
            view.models_by_origin,
            vec![ModelCount { origin: Origin::Recreio, model: VehicleModel::OmodaE5, count: 1 }]
        );
        assert_eq!(view.summary.total_leads, 5);
        assert_eq!(view.ranking.len(), 3);
        assert_eq!(view.table.len(), 1);
    }

    #[test]
    fn test_build_view_without_leads() {
        let data = DashboardData {
            campaigns: vec![campaign("A", 100.0, 10.0)],
            leads: Vec::new(),
        };
        let view = DataProcessor::build_view(&data, &Filters::default(), TableSort::default());

        assert_eq!(view.date_span, None);
        assert!(view.leads_per_day.is_empty());
        assert_eq!(view.summary.average_cost_per_lead, 0.0);
    }
}
