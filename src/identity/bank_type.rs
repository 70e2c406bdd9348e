// src/identity/bank_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed bank-type taxonomy used in every output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankType {
    #[serde(rename = "Public Sector Banks")]
    PublicSector,
    #[serde(rename = "Private Sector Banks")]
    PrivateSector,
    #[serde(rename = "Foreign Banks")]
    Foreign,
    #[serde(rename = "Small Finance Banks")]
    SmallFinance,
    #[serde(rename = "Payments Banks")]
    Payments,
    #[serde(rename = "Regional Rural Banks")]
    RegionalRural,
    #[serde(rename = "Cooperative Banks")]
    Cooperative,
    #[serde(rename = "Local Area Banks")]
    LocalArea,
    #[serde(rename = "Development Banks")]
    Development,
    /// Neither the reference table, the sheet context nor the name heuristics placed the bank.
    #[serde(rename = "Unclassified")]
    Unclassified,
}

impl BankType {
    pub const CLASSIFIED: [BankType; 9] = [
        BankType::PublicSector,
        BankType::PrivateSector,
        BankType::Foreign,
        BankType::SmallFinance,
        BankType::Payments,
        BankType::RegionalRural,
        BankType::Cooperative,
        BankType::LocalArea,
        BankType::Development,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BankType::PublicSector => "Public Sector Banks",
            BankType::PrivateSector => "Private Sector Banks",
            BankType::Foreign => "Foreign Banks",
            BankType::SmallFinance => "Small Finance Banks",
            BankType::Payments => "Payments Banks",
            BankType::RegionalRural => "Regional Rural Banks",
            BankType::Cooperative => "Cooperative Banks",
            BankType::LocalArea => "Local Area Banks",
            BankType::Development => "Development Banks",
            BankType::Unclassified => "Unclassified",
        }
    }

    /// Parse a sheet label such as "Public Sector Banks" or "Co-operative Banks".
    /// Case, hyphens, "&"/"and" and a singular "Bank" are tolerated.
    pub fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .to_lowercase()
            .replace('&', " and ")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let key = key.strip_suffix('s').unwrap_or(&key);

        match key {
            "public sector bank" | "nationalised bank" | "nationalized bank" | "sbi group" => {
                Some(BankType::PublicSector)
            }
            "private sector bank" | "old private sector bank" | "new private sector bank" => {
                Some(BankType::PrivateSector)
            }
            "foreign bank" => Some(BankType::Foreign),
            "small finance bank" => Some(BankType::SmallFinance),
            "payments bank" | "payment bank" => Some(BankType::Payments),
            "regional rural bank" => Some(BankType::RegionalRural),
            "cooperative bank" | "urban cooperative bank" | "state cooperative bank" => {
                Some(BankType::Cooperative)
            }
            "local area bank" => Some(BankType::LocalArea),
            "development bank" | "all india financial institution" | "financial institution" => {
                Some(BankType::Development)
            }
            _ => None,
        }
    }
}

impl fmt::Display for BankType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
