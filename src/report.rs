//! Headless rendering of the dashboard as plain text or JSON.

use crate::config::OutputFormat;
use crate::data::{DashboardView, SortColumn, TableRow};
use anyhow::{Context, Result};
use std::fmt::Write;

pub fn render(view: &DashboardView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(view).context("Failed to serialize dashboard")
        }
        OutputFormat::Text => Ok(render_text(view)),
    }
}

fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "== Key metrics ==");
    let _ = writeln!(out, "Qualified leads:      {}", view.summary.total_leads_display());
    let _ = writeln!(out, "Ad spend (Google):    {}", view.summary.total_spend_display());
    let _ = writeln!(
        out,
        "Average CPL (Google): {}",
        view.summary.average_cost_per_lead_display()
    );

    let _ = writeln!(out, "\n== Models by origin ==");
    for entry in &view.models_by_origin {
        let _ = writeln!(out, "{:<10} {:<10} {}", entry.origin, entry.model, entry.count);
    }

    let _ = writeln!(out, "\n== Daily leads ==");
    for day in &view.leads_per_day {
        let _ = writeln!(out, "{}  {}", day.date.format("%d/%m/%Y"), day.leads);
    }

    let _ = writeln!(out, "\n== Ranking by cost per conversion ==");
    for (i, entry) in view.ranking.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {}  {}",
            i + 1,
            entry.name,
            entry.cost_per_conversion_display
        );
    }

    let _ = writeln!(out, "\n== Campaign details ==");
    let header: Vec<&str> = SortColumn::ALL.iter().map(|c| c.header()).collect();
    let _ = writeln!(out, "{}", header.join(" | "));
    for row in &view.table {
        let _ = writeln!(out, "{}", table_line(row));
    }

    out
}

fn table_line(row: &TableRow) -> String {
    [
        row.campaign.as_str(),
        row.impressions.as_str(),
        row.interactions.as_str(),
        row.interaction_rate.as_str(),
        row.cost.as_str(),
        row.conversions.as_str(),
        row.cost_per_conversion.as_str(),
    ]
    .join(" | ")
}
