//! CSV Data Loader Module
//! Reads the ads report and the lead exports with Polars and turns them into
//! validated `CampaignRow` / `Lead` collections.

use super::model::{CampaignRow, Lead, Origin};
use super::normalize::{clean_integer, parse_canonical, parse_percentage, NumericError};
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lead export timestamp layout.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Title and date-range lines above the ads report header.
const REPORT_HEADER_OFFSET: usize = 2;

mod columns {
    pub const CAMPAIGN: &str = "Campanha";
    pub const COST: &str = "Custo";
    pub const COST_PER_CONVERSION: &str = "Custo/conv.";
    pub const CONVERSIONS: &str = "Conversões";
    pub const IMPRESSIONS: &str = "Impressões";
    pub const INTERACTIONS: &str = "Interações";
    pub const INTERACTION_RATE: &str = "Taxa de interação";

    pub const CREATED_AT: &str = "criado_em";
    pub const CUSTOMER_NAME: &str = "nome_cliente";
    pub const CUSTOMER_EMAIL: &str = "email_cliente";
    pub const VERSION: &str = "versao";
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Source file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Cannot inspect {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Column '{column}' missing in {}", file.display())]
    MissingColumn { column: String, file: PathBuf },
    #[error("{}, record {record}: invalid timestamp {value:?} (expected DD/MM/YYYY HH:MM:SS)", file.display())]
    InvalidTimestamp {
        file: PathBuf,
        record: usize,
        value: Option<String>,
    },
    #[error("{}, record {record}, column '{column}': {source}", file.display())]
    InvalidNumber {
        file: PathBuf,
        record: usize,
        column: String,
        #[source]
        source: NumericError,
    },
}

/// One lead export bound to the site it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSource {
    pub origin: Origin,
    pub path: PathBuf,
}

/// Locations of every input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub campaign_report: PathBuf,
    pub lead_files: Vec<LeadSource>,
}

impl DataSources {
    pub fn all_paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.campaign_report.as_path())
            .chain(self.lead_files.iter().map(|s| s.path.as_path()))
    }
}

/// Everything the dashboard needs, loaded once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub campaigns: Vec<CampaignRow>,
    pub leads: Vec<Lead>,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    sources: DataSources,
}

impl DataLoader {
    pub fn new(sources: DataSources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    /// Load and validate every source. Any structural problem aborts the load.
    pub fn load(&self) -> Result<DashboardData, LoaderError> {
        let campaigns = self.load_campaigns()?;

        let mut leads = Vec::new();
        for source in &self.sources.lead_files {
            leads.extend(Self::load_leads(source)?);
        }

        tracing::info!(
            campaigns = campaigns.len(),
            leads = leads.len(),
            "dashboard data loaded"
        );

        Ok(DashboardData { campaigns, leads })
    }

    /// Read a CSV with every column kept as text.
    fn read_csv(path: &Path, separator: u8, skip_rows: usize) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::MissingFile(path.to_path_buf()));
        }

        tracing::debug!(path = %path.display(), "reading csv");

        let df = LazyCsvReader::new(path)
            .with_separator(separator)
            .with_skip_rows(skip_rows)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_encoding(CsvEncoding::LossyUtf8)
            .with_truncate_ragged_lines(true)
            .finish()?
            .collect()?;

        Ok(df)
    }

    fn text_column<'a>(
        df: &'a DataFrame,
        name: &str,
        file: &Path,
    ) -> Result<&'a StringChunked, LoaderError> {
        let column = df.column(name).map_err(|_| LoaderError::MissingColumn {
            column: name.to_string(),
            file: file.to_path_buf(),
        })?;
        Ok(column.str()?)
    }

    /// Ads report: comma separated, header on the third line.
    fn load_campaigns(&self) -> Result<Vec<CampaignRow>, LoaderError> {
        let path = self.sources.campaign_report.as_path();
        let df = Self::read_csv(path, b',', REPORT_HEADER_OFFSET)?;

        let name = Self::text_column(&df, columns::CAMPAIGN, path)?;
        let cost = Self::text_column(&df, columns::COST, path)?;
        let cost_per_conv = Self::text_column(&df, columns::COST_PER_CONVERSION, path)?;
        let conversions = Self::text_column(&df, columns::CONVERSIONS, path)?;
        let impressions = Self::text_column(&df, columns::IMPRESSIONS, path)?;
        let interactions = Self::text_column(&df, columns::INTERACTIONS, path)?;
        let rate = Self::text_column(&df, columns::INTERACTION_RATE, path)?;

        let strict = |record: usize, column: &str, cell: Option<&str>| {
            parse_canonical(cell).map_err(|source| LoaderError::InvalidNumber {
                file: path.to_path_buf(),
                record,
                column: column.to_string(),
                source,
            })
        };

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let campaign = name.get(i);
            if !CampaignRow::is_campaign_name(campaign) {
                continue;
            }
            let record = i + 1;

            rows.push(CampaignRow {
                name: campaign.unwrap_or_default().to_string(),
                impressions: lenient_count(impressions.get(i), columns::IMPRESSIONS, record),
                interactions: lenient_count(interactions.get(i), columns::INTERACTIONS, record),
                interaction_rate: lenient_rate(rate.get(i), record),
                cost: strict(record, columns::COST, cost.get(i))?,
                cost_per_conversion: strict(
                    record,
                    columns::COST_PER_CONVERSION,
                    cost_per_conv.get(i),
                )?,
                conversions: strict(record, columns::CONVERSIONS, conversions.get(i))?,
            });
        }

        tracing::info!(
            path = %path.display(),
            read = df.height(),
            kept = rows.len(),
            "campaign report parsed"
        );

        Ok(rows)
    }

    /// Lead export: semicolon separated, tagged with its origin.
    fn load_leads(source: &LeadSource) -> Result<Vec<Lead>, LoaderError> {
        let path = source.path.as_path();
        let df = Self::read_csv(path, b';', 0)?;

        let created_at = Self::text_column(&df, columns::CREATED_AT, path)?;
        let name = Self::text_column(&df, columns::CUSTOMER_NAME, path)?;
        let email = Self::text_column(&df, columns::CUSTOMER_EMAIL, path)?;
        let version = Self::text_column(&df, columns::VERSION, path)?;

        let mut leads = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let raw_ts = created_at.get(i);
            let created_at = raw_ts
                .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok())
                .ok_or_else(|| LoaderError::InvalidTimestamp {
                    file: path.to_path_buf(),
                    record: i + 1,
                    value: raw_ts.map(str::to_string),
                })?;

            let lead = Lead {
                created_at,
                name: name.get(i).unwrap_or_default().to_string(),
                email: email.get(i).unwrap_or_default().to_string(),
                version: version.get(i).map(str::to_string),
                origin: source.origin,
            };

            if !lead.is_test_entry() {
                leads.push(lead);
            }
        }

        tracing::info!(
            path = %path.display(),
            origin = %source.origin,
            read = df.height(),
            kept = leads.len(),
            "lead export parsed"
        );

        Ok(leads)
    }
}

/// Counts fall back to 0 when a cell is unreadable.
fn lenient_count(cell: Option<&str>, column: &str, record: usize) -> u64 {
    let Some(raw) = cell else {
        return 0;
    };
    match clean_integer(raw).parse::<u64>() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(column, record, value = raw, "unreadable count, using 0");
            0
        }
    }
}

fn lenient_rate(cell: Option<&str>, record: usize) -> f64 {
    let Some(raw) = cell else {
        return 0.0;
    };
    parse_percentage(raw).unwrap_or_else(|| {
        tracing::warn!(
            column = columns::INTERACTION_RATE,
            record,
            value = raw,
            "unreadable rate, using 0"
        );
        0.0
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub const REPORT: &str = "\
Relatório da campanha
1 de março de 2024 - 31 de março de 2024
Campanha,Impressões,Interações,Taxa de interação,Custo,Conversões,Custo/conv.
Search Omoda,\"12.345\",\"1.234\",\"10,00%\",\"R$ 1.234,56\",\"10,00\",\"R$ 123,46\"
Display Jaecoo,500,25,\"5,00%\",\"R$ 50,00\",\"5,00\",\"R$ 10,00\"
None,0,0,\"0,00%\",\"R$ 0,00\",\"0,00\",\"R$ 0,00\"
,1,1,\"1,00%\",\"R$ 1,00\",\"1,00\",\"R$ 1,00\"
Total: Conta,12845,1259,\"9,80%\",\"R$ 1.284,56\",\"15,00\",\"R$ 85,64\"
";

    pub const RECREIO: &str = "\
criado_em;nome_cliente;email_cliente;versao
01/03/2024 09:15:00;Ana Souza;ana@exemplo.com;Omoda E5 EV
01/03/2024 18:40:10;Teste Silva;qa@exemplo.com;Omoda E5
02/03/2024 10:00:00;Bruno Lima;bruno@exemplo.com;Jaecoo J7 PHEV
";

    pub const CURITIBA: &str = "\
criado_em;nome_cliente;email_cliente;versao
02/03/2024 11:30:00;Carla Dias;carla@exemplo.com;JAECOO
03/03/2024 08:05:00;Diego Reis;diego.TESTE@exemplo.com;Omoda
04/03/2024 14:20:00;Elisa Melo;elisa@exemplo.com;
";

    /// Write the three fixtures into a fresh directory.
    pub fn fixture_dir() -> (TempDir, DataSources) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("report.csv"), REPORT).unwrap();
        fs::write(dir.path().join("recreio.csv"), RECREIO).unwrap();
        fs::write(dir.path().join("curitiba.csv"), CURITIBA).unwrap();

        let sources = DataSources {
            campaign_report: dir.path().join("report.csv"),
            lead_files: vec![
                LeadSource {
                    origin: Origin::Recreio,
                    path: dir.path().join("recreio.csv"),
                },
                LeadSource {
                    origin: Origin::Curitiba,
                    path: dir.path().join("curitiba.csv"),
                },
            ],
        };
        (dir, sources)
    }

    #[test]
    fn test_load_filters_campaign_rows() {
        let (_dir, sources) = fixture_dir();
        let data = DataLoader::new(sources).load().unwrap();

        let names: Vec<&str> = data.campaigns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Search Omoda", "Display Jaecoo"]);

        let search = &data.campaigns[0];
        assert_eq!(search.impressions, 12345);
        assert_eq!(search.interactions, 1234);
        assert!((search.interaction_rate - 10.0).abs() < 1e-9);
        assert!((search.cost - 1234.56).abs() < 1e-9);
        assert!((search.cost_per_conversion - 123.46).abs() < 1e-9);
        assert!((search.conversions - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_tags_and_filters_leads() {
        let (_dir, sources) = fixture_dir();
        let data = DataLoader::new(sources).load().unwrap();

        let names: Vec<&str> = data.leads.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Ana Souza", "Bruno Lima", "Carla Dias", "Elisa Melo"]);
        assert_eq!(data.leads[0].origin, Origin::Recreio);
        assert_eq!(data.leads[2].origin, Origin::Curitiba);
        assert_eq!(data.leads[3].version, None);
        assert_eq!(
            data.leads[0].created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-03-01 09:15:00"
        );
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let (dir, sources) = fixture_dir();
        fs::write(
            dir.path().join("curitiba.csv"),
            "criado_em;nome_cliente;email_cliente;versao\n2024-03-02 11:30;Carla;c@x.com;Omoda\n",
        )
        .unwrap();

        let err = DataLoader::new(sources).load().unwrap_err();
        assert!(matches!(err, LoaderError::InvalidTimestamp { record: 1, .. }));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let (dir, sources) = fixture_dir();
        fs::write(
            dir.path().join("recreio.csv"),
            "criado_em;nome_cliente;versao\n01/03/2024 09:15:00;Ana;Omoda\n",
        )
        .unwrap();

        let err = DataLoader::new(sources).load().unwrap_err();
        match err {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, "email_cliente"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let (dir, sources) = fixture_dir();
        fs::remove_file(dir.path().join("report.csv")).unwrap();

        let err = DataLoader::new(sources).load().unwrap_err();
        assert!(matches!(err, LoaderError::MissingFile(_)));
    }

    #[test]
    fn test_bad_cost_is_fatal() {
        let (dir, sources) = fixture_dir();
        let report = REPORT.replace("\"R$ 50,00\"", "abc");
        fs::write(dir.path().join("report.csv"), report).unwrap();

        let err = DataLoader::new(sources).load().unwrap_err();
        match err {
            LoaderError::InvalidNumber { column, record, .. } => {
                assert_eq!(column, "Custo");
                assert_eq!(record, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_cells_default_to_zero() {
        assert_eq!(lenient_count(None, "Impressões", 1), 0);
        assert_eq!(lenient_count(Some("n/d"), "Impressões", 1), 0);
        assert_eq!(lenient_count(Some("1.500"), "Impressões", 1), 1500);
        assert_eq!(lenient_rate(Some("--"), 1), 0.0);
        assert!((lenient_rate(Some("3,5%"), 1) - 3.5).abs() < 1e-9);
    }
}
