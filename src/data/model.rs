//! Domain records produced by the loader.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Case-insensitive marker of test submissions in lead exports.
pub const TEST_MARKER: &str = "teste";

/// Site a lead was captured from. Not present in the export files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Origin {
    Recreio,
    Curitiba,
}

impl Origin {
    pub const ALL: [Origin; 2] = [Origin::Recreio, Origin::Curitiba];

    pub fn label(&self) -> &'static str {
        match self {
            Origin::Recreio => "Recreio",
            Origin::Curitiba => "Curitiba",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Vehicle model a lead showed interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum VehicleModel {
    OmodaE5,
    JaecooJ7,
    Unspecified,
}

impl VehicleModel {
    /// Classification order. First match wins.
    const PRECEDENCE: [(VehicleModel, [&'static str; 2]); 2] = [
        (VehicleModel::OmodaE5, ["omoda e5", "omoda"]),
        (VehicleModel::JaecooJ7, ["jaecoo j7", "jaecoo"]),
    ];

    /// Classify a free-text version/trim string.
    pub fn classify(version: Option<&str>) -> VehicleModel {
        let Some(version) = version else {
            return VehicleModel::Unspecified;
        };
        let version = version.to_lowercase();

        Self::PRECEDENCE
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| version.contains(*n)))
            .map(|(model, _)| *model)
            .unwrap_or(VehicleModel::Unspecified)
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleModel::OmodaE5 => "Omoda E5",
            VehicleModel::JaecooJ7 => "Jaecoo J7",
            VehicleModel::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for VehicleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A qualified contact captured by one of the lead forms.
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub created_at: NaiveDateTime,
    pub name: String,
    pub email: String,
    pub version: Option<String>,
    pub origin: Origin,
}

impl Lead {
    /// True for submissions made while testing the forms.
    pub fn is_test_entry(&self) -> bool {
        contains_test_marker(&self.name) || contains_test_marker(&self.email)
    }

    pub fn model(&self) -> VehicleModel {
        VehicleModel::classify(self.version.as_deref())
    }
}

fn contains_test_marker(text: &str) -> bool {
    text.to_lowercase().contains(TEST_MARKER)
}

/// One advertising campaign line from the ads report.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRow {
    pub name: String,
    pub impressions: u64,
    pub interactions: u64,
    /// Percent units: 5.23 means 5,23%.
    pub interaction_rate: f64,
    pub cost: f64,
    pub cost_per_conversion: f64,
    pub conversions: f64,
}

impl CampaignRow {
    /// Footer, placeholder and blank rows are not campaigns.
    pub fn is_campaign_name(name: Option<&str>) -> bool {
        match name {
            None => false,
            Some(name) => {
                !name.trim().is_empty() && name != "None" && !name.contains("Total")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lead(name: &str, email: &str) -> Lead {
        Lead {
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            name: name.to_string(),
            email: email.to_string(),
            version: None,
            origin: Origin::Recreio,
        }
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(VehicleModel::classify(Some("OMODA E5 EV")), VehicleModel::OmodaE5);
        assert_eq!(VehicleModel::classify(Some("Jaecoo J7 PHEV")), VehicleModel::JaecooJ7);
        assert_eq!(
            VehicleModel::classify(Some("omoda vs jaecoo")),
            VehicleModel::OmodaE5
        );
        assert_eq!(VehicleModel::classify(Some("Tiggo 8")), VehicleModel::Unspecified);
        assert_eq!(VehicleModel::classify(None), VehicleModel::Unspecified);
    }

    #[test]
    fn test_test_entries() {
        assert!(lead("Teste Silva", "a@b.com").is_test_entry());
        assert!(lead("Ana", "TESTE@b.com").is_test_entry());
        assert!(lead("Ana", "contato+teste@b.com").is_test_entry());
        assert!(!lead("Ana Souza", "ana@b.com").is_test_entry());
        assert!(!lead("", "").is_test_entry());
    }

    #[test]
    fn test_campaign_name_rules() {
        assert!(CampaignRow::is_campaign_name(Some("Search - Omoda")));
        assert!(!CampaignRow::is_campaign_name(None));
        assert!(!CampaignRow::is_campaign_name(Some("")));
        assert!(!CampaignRow::is_campaign_name(Some("None")));
        assert!(!CampaignRow::is_campaign_name(Some("Total: Conta")));
    }
}
