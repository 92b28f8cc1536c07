//! Statistics Calculator Module
//! Headline metrics shown in the dashboard tiles.

use crate::data::{CampaignRow, Lead};
use crate::format::{format_currency, format_integer};
use serde::Serialize;

/// Headline numbers for the whole loaded data set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_leads: usize,
    pub total_spend: f64,
    pub average_cost_per_lead: f64,
}

impl SummaryMetrics {
    pub fn total_leads_display(&self) -> String {
        format_integer(self.total_leads)
    }

    pub fn total_spend_display(&self) -> String {
        format_currency(self.total_spend)
    }

    pub fn average_cost_per_lead_display(&self) -> String {
        format_currency(self.average_cost_per_lead)
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Cost divided by a count, 0 when the count is 0.
    pub fn cost_per(cost: f64, count: f64) -> f64 {
        if count > 0.0 {
            cost / count
        } else {
            0.0
        }
    }

    pub fn total_spend(campaigns: &[CampaignRow]) -> f64 {
        campaigns.iter().map(|c| c.cost).sum()
    }

    pub fn summary(campaigns: &[CampaignRow], leads: &[Lead]) -> SummaryMetrics {
        let total_leads = leads.len();
        let total_spend = Self::total_spend(campaigns);

        SummaryMetrics {
            total_leads,
            total_spend,
            average_cost_per_lead: Self::cost_per(total_spend, total_leads as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(name: &str, cost: f64, conversions: f64) -> CampaignRow {
        CampaignRow {
            name: name.to_string(),
            impressions: 0,
            interactions: 0,
            interaction_rate: 0.0,
            cost,
            cost_per_conversion: StatsCalculator::cost_per(cost, conversions),
            conversions,
        }
    }

    #[test]
    fn test_summary_without_leads_has_zero_cpl() {
        let campaigns = vec![campaign("A", 100.0, 10.0), campaign("B", 50.0, 5.0)];
        let summary = StatsCalculator::summary(&campaigns, &[]);

        assert_eq!(summary.total_leads, 0);
        assert!((summary.total_spend - 150.0).abs() < 1e-9);
        assert_eq!(summary.average_cost_per_lead, 0.0);
        assert_eq!(summary.average_cost_per_lead_display(), "R$ 0,00");
        assert_eq!(summary.total_spend_display(), "R$ 150,00");
    }

    #[test]
    fn test_cost_per_guards_zero() {
        assert_eq!(StatsCalculator::cost_per(10.0, 0.0), 0.0);
        assert!((StatsCalculator::cost_per(100.0, 8.0) - 12.5).abs() < 1e-9);
    }
}
