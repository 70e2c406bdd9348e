// src/record/mod.rs
//
// Canonical output shapes. Field names on the wire are PascalCase and
// match what downstream consumers of the JSON files read.

pub mod infra;
pub mod metric;
pub mod tree;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub use infra::{
    CardPaymentsTransactions, CreditCardTransactions, DebitCardTransactions, InfraMetrics,
    Infrastructure, SiteSplit, VolumeValue,
};
pub use metric::Metric;
pub use tree::{Node, VALUE_KEY};

use crate::identity::BankType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankIdentity {
    #[serde(rename = "SerialNumber")]
    pub serial_number: Metric,
    #[serde(rename = "BankName")]
    pub bank_name: String,
    #[serde(rename = "BankShortName")]
    pub bank_short_name: String,
    #[serde(rename = "BankType")]
    pub bank_type: BankType,
}

/// One bank's row: identity fields followed by the feed's metric fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankRecord<M> {
    #[serde(flatten)]
    pub identity: BankIdentity,
    #[serde(flatten)]
    pub metrics: M,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfraDocument {
    pub banks: Vec<BankRecord<InfraMetrics>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<InfraMetrics>,
}

/// One named section of a multi-sheet workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub name: String,
    pub banks: Vec<BankRecord<Node>>,
    pub total: Option<Node>,
}

/// Sections serialize as `{ "<name>": [records...] }` in section order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionedDocument {
    pub sections: Vec<Section>,
}

impl SectionedDocument {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

impl Serialize for SectionedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &section.banks)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Infra(InfraDocument),
    Sections(SectionedDocument),
}

impl Document {
    pub fn bank_count(&self) -> usize {
        match self {
            Document::Infra(doc) => doc.banks.len(),
            Document::Sections(doc) => doc.sections.iter().map(|s| s.banks.len()).sum(),
        }
    }

    pub fn has_total(&self) -> bool {
        match self {
            Document::Infra(doc) => doc.total.is_some(),
            Document::Sections(doc) => doc.sections.iter().any(|s| s.total.is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> BankIdentity {
        BankIdentity {
            serial_number: Metric::Number(1.0),
            bank_name: "State Bank of India".into(),
            bank_short_name: "SBI".into(),
            bank_type: BankType::PublicSector,
        }
    }

    #[test]
    fn infra_record_flattens_identity_and_metrics() {
        let doc = InfraDocument {
            banks: vec![BankRecord {
                identity: identity(),
                metrics: InfraMetrics::default(),
            }],
            total: None,
        };
        let json = serde_json::to_value(&doc).unwrap();
        let bank = &json["banks"][0];
        assert_eq!(bank["SerialNumber"], 1);
        assert_eq!(bank["BankShortName"], "SBI");
        assert_eq!(bank["BankType"], "Public Sector Banks");
        assert_eq!(bank["Infrastructure"]["ATMs_CRMs"]["OnSite"], 0);
        assert!(json.get("total").is_none());
    }

    #[test]
    fn sections_serialize_as_named_arrays() {
        let mut metrics = Node::branch();
        metrics.insert(
            &["DigitalBankingMetrics".to_string(), "Count".to_string()],
            Metric::Number(4.0),
        );
        let doc = SectionedDocument {
            sections: vec![
                Section {
                    name: "NEFT".into(),
                    banks: vec![BankRecord {
                        identity: identity(),
                        metrics,
                    }],
                    total: None,
                },
                Section {
                    name: "RTGS".into(),
                    ..Default::default()
                },
            ],
        };
        let json = serde_json::to_string(&Document::Sections(doc)).unwrap();
        assert!(json.starts_with(r#"{"NEFT":[{"SerialNumber":1,"#));
        assert!(json.contains(r#""DigitalBankingMetrics":{"Count":4}"#));
        assert!(json.ends_with(r#""RTGS":[]}"#));
    }
}
