//! Application configuration from the command line and environment.
//!
//! Every option can also come from an environment variable; a `.env` file in
//! the working directory is read first when present.
//!
//! - `DASHBOARD_DATA_DIR` - folder holding the input files (default: `.`)
//! - `DASHBOARD_CAMPAIGN_REPORT` - ads report file (default: `campaign_report.csv`)
//! - `DASHBOARD_LEADS_RECREIO` / `DASHBOARD_LEADS_CURITIBA` - lead exports
//! - `DASHBOARD_LOG_LEVEL` - fallback when `RUST_LOG` is unset (default: `info`)

use crate::data::{DataSources, DateRange, Filters, LeadSource, Origin};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "campaign_dashboard", version, about = "Campaign & lead performance dashboard")]
pub struct Config {
    /// Folder the input file names are resolved against
    #[arg(long, env = "DASHBOARD_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Google Ads campaign report (comma separated, two preamble lines)
    #[arg(long, env = "DASHBOARD_CAMPAIGN_REPORT", default_value = "campaign_report.csv")]
    pub campaign_report: PathBuf,

    /// Lead export of the Recreio site (semicolon separated)
    #[arg(long, env = "DASHBOARD_LEADS_RECREIO", default_value = "leads_recreio.csv")]
    pub leads_recreio: PathBuf,

    /// Lead export of the Curitiba site (semicolon separated)
    #[arg(long, env = "DASHBOARD_LEADS_CURITIBA", default_value = "leads_curitiba.csv")]
    pub leads_curitiba: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "DASHBOARD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Print the dashboard to stdout instead of opening the window
    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Restrict the detail table to one campaign
    #[arg(long)]
    pub campaign: Option<String>,

    /// First lead date (YYYY-MM-DD) for the lead charts
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last lead date (YYYY-MM-DD) for the lead charts
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl Config {
    /// Parse arguments after loading `.env`.
    pub fn load() -> Self {
        // A missing .env is fine.
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    /// Input files resolved against the configured data directory.
    pub fn sources(&self) -> DataSources {
        self.sources_in(&self.data_dir)
    }

    /// Input files resolved against another directory.
    pub fn sources_in(&self, dir: &Path) -> DataSources {
        DataSources {
            campaign_report: dir.join(&self.campaign_report),
            lead_files: vec![
                LeadSource {
                    origin: Origin::Recreio,
                    path: dir.join(&self.leads_recreio),
                },
                LeadSource {
                    origin: Origin::Curitiba,
                    path: dir.join(&self.leads_curitiba),
                },
            ],
        }
    }

    /// Filters requested on the command line. A lone bound is an error.
    pub fn filters(&self) -> Result<Filters> {
        let dates = match (self.from, self.to) {
            (Some(from), Some(to)) if from <= to => Some(DateRange { from, to }),
            (Some(from), Some(to)) => bail!("--from {from} is after --to {to}"),
            (None, None) => None,
            _ => bail!("--from and --to must be given together"),
        };
        Ok(Filters {
            campaign: self.campaign.clone(),
            dates,
        })
    }
}
