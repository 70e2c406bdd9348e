// src/identity/table.rs

use once_cell::sync::OnceCell;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::{collections::HashMap, fmt, fs, path::Path};
use tracing::{debug, warn};

use super::bank_type::BankType;
use super::heuristics::infer_bank_type;
use super::normalize::{clean_name, normalize_name};
use crate::error::{PipelineError, Result};
use crate::sheet::Cell;

static EMBEDDED_JSON: &str = include_str!("../../assets/bank_acronyms.json");
static EMBEDDED: OnceCell<ReferenceTable> = OnceCell::new();

/// One short code with its type and every spelling seen in source files.
#[derive(Debug, Clone)]
pub struct BankEntry {
    pub short_name: String,
    pub bank_type: BankType,
    pub known_full_names: Vec<String>,
    normalized: Vec<String>,
}

impl BankEntry {
    /// The name written to `BankName` for resolved banks.
    pub fn canonical_name(&self) -> &str {
        self.known_full_names
            .first()
            .map(String::as_str)
            .unwrap_or(&self.short_name)
    }
}

/// Outcome of a resolver lookup. Unmatched names carry the cleaned raw name
/// as both `short_name` and `full_name` and no bank type.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub short_name: String,
    pub full_name: String,
    pub bank_type: Option<BankType>,
    pub matched: bool,
}

impl Resolution {
    fn unmatched(cleaned: String) -> Self {
        Resolution {
            short_name: cleaned.clone(),
            full_name: cleaned,
            bank_type: None,
            matched: false,
        }
    }
}

/// Read-only short-code → {type, names} table, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<BankEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "bankType")]
    bank_type: BankType,
    #[serde(rename = "knownFullNames")]
    known_full_names: Vec<String>,
}

impl ReferenceTable {
    /// The table compiled into the binary, parsed on first use.
    pub fn embedded() -> Result<&'static ReferenceTable> {
        EMBEDDED.get_or_try_init(|| Self::from_json(EMBEDDED_JSON))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let table: ReferenceTable = serde_json::from_str(text)
            .map_err(|e| PipelineError::ReferenceTable(e.to_string()))?;
        debug!(entries = table.entries.len(), "loaded bank reference table");
        Ok(table)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    fn from_entries(raw: Vec<(String, RawEntry)>) -> std::result::Result<Self, String> {
        let mut entries = Vec::with_capacity(raw.len());
        let mut owners: HashMap<String, String> = HashMap::new();

        for (short_name, entry) in raw {
            let short_name = short_name.trim().to_string();
            if short_name.is_empty() {
                return Err("empty short name".into());
            }
            if entries.iter().any(|e: &BankEntry| e.short_name == short_name) {
                return Err(format!("duplicate short name `{}`", short_name));
            }

            let normalized: Vec<String> = entry
                .known_full_names
                .iter()
                .map(|n| normalize_name(n))
                .collect();
            for name in &normalized {
                match owners.get(name) {
                    Some(owner) if *owner != short_name => warn!(
                        name = %name,
                        first = %owner,
                        second = %short_name,
                        "alias listed under two short names; first entry wins"
                    ),
                    Some(_) => {}
                    None => {
                        owners.insert(name.clone(), short_name.clone());
                    }
                }
            }

            entries.push(BankEntry {
                short_name,
                bank_type: entry.bank_type,
                known_full_names: entry.known_full_names,
                normalized,
            });
        }

        Ok(ReferenceTable { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact match of normalized names, scanning entries in declaration order.
    pub fn lookup(&self, raw_name: &str) -> Option<&BankEntry> {
        let query = normalize_name(raw_name);
        if query.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| entry.normalized.iter().any(|n| *n == query))
    }

    /// Never fails: unknown names come back as their cleaned selves with `matched == false`.
    pub fn resolve(&self, raw_name: &str) -> Resolution {
        match self.lookup(raw_name) {
            Some(entry) => Resolution {
                short_name: entry.short_name.clone(),
                full_name: entry.canonical_name().to_string(),
                bank_type: Some(entry.bank_type),
                matched: true,
            },
            None => Resolution::unmatched(clean_name(raw_name)),
        }
    }

    /// Non-text cells resolve to an empty, unmatched name.
    pub fn resolve_cell(&self, cell: &Cell) -> Resolution {
        match cell {
            Cell::Text(s) => self.resolve(s),
            _ => Resolution::unmatched(String::new()),
        }
    }

    /// Table type when the name is known, otherwise the name heuristics.
    pub fn type_of(&self, raw_name: &str) -> BankType {
        self.lookup(raw_name)
            .map(|e| e.bank_type)
            .or_else(|| infer_bank_type(raw_name))
            .unwrap_or(BankType::Unclassified)
    }
}

impl<'de> Deserialize<'de> for ReferenceTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = Vec<(String, RawEntry)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of short name to {bankType, knownFullNames}")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, RawEntry>()? {
                    out.push((key, value));
                }
                Ok(out)
            }
        }

        let raw = deserializer.deserialize_map(TableVisitor)?;
        ReferenceTable::from_entries(raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sbi_table() -> ReferenceTable {
        ReferenceTable::from_json(
            r#"{
                "SBI": { "bankType": "Public Sector Banks", "knownFullNames": ["STATE BANK OF INDIA"] },
                "HDFC": { "bankType": "Private Sector Banks", "knownFullNames": ["HDFC Bank Limited"] }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_differently_cased_name() {
        let table = sbi_table();
        let res = table.resolve("State Bank Of India");
        assert_eq!(res.short_name, "SBI");
        assert!(res.matched);
        assert_eq!(res.full_name, "STATE BANK OF INDIA");
        assert_eq!(res.bank_type, Some(BankType::PublicSector));
    }

    #[test]
    fn suffix_spellings_match() {
        let table = sbi_table();
        assert_eq!(table.resolve("HDFC Bank Ltd.").short_name, "HDFC");
    }

    #[test]
    fn unknown_name_falls_back_to_cleaned_raw() {
        let table = sbi_table();
        let res = table.resolve("  XYZ NEW BANK LTD ");
        assert_eq!(res.short_name, "XYZ NEW BANK LTD");
        assert!(!res.matched);
        assert_eq!(res.bank_type, None);
    }

    #[test]
    fn resolve_is_total_over_inputs() {
        let table = sbi_table();
        for cell in [
            Cell::Empty,
            Cell::Number(7.0),
            Cell::Bool(true),
            Cell::text(""),
            Cell::text("!!!"),
        ] {
            let res = table.resolve_cell(&cell);
            assert!(!res.matched);
            assert!(res.short_name.len() <= 3);
        }
        assert_eq!(table.resolve_cell(&Cell::Number(7.0)).short_name, "");
    }

    #[test]
    fn first_entry_wins_on_shared_alias() {
        let table = ReferenceTable::from_json(
            r#"{
                "B": { "bankType": "Foreign Banks", "knownFullNames": ["Shared Bank"] },
                "A": { "bankType": "Private Sector Banks", "knownFullNames": ["Shared Bank Ltd", "SHARED BANK"] }
            }"#,
        )
        .unwrap();
        assert_eq!(table.resolve("shared bank").short_name, "B");
        assert_eq!(table.resolve("Shared Bank Limited").short_name, "A");
    }

    #[test]
    fn duplicate_short_name_is_rejected() {
        let err = ReferenceTable::from_json(
            r#"{
                "X": { "bankType": "Foreign Banks", "knownFullNames": ["One"] },
                "X": { "bankType": "Foreign Banks", "knownFullNames": ["Two"] }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::ReferenceTable(_)));
    }

    #[test]
    fn type_of_uses_table_then_heuristics() {
        let table = sbi_table();
        assert_eq!(table.type_of("state bank of india"), BankType::PublicSector);
        assert_eq!(
            table.type_of("Brand New Small Finance Bank"),
            BankType::SmallFinance
        );
        assert_eq!(table.type_of("Mystery Bank"), BankType::Unclassified);
    }

    #[test]
    fn embedded_table_loads() {
        let table = ReferenceTable::embedded().unwrap();
        assert!(table.len() > 50);
        assert_eq!(table.resolve("STATE BANK OF INDIA").short_name, "SBI");
        assert_eq!(table.resolve("Axis Bank Limited").short_name, "AXIS");
        assert_eq!(
            table.resolve("Paytm Payments Bank Ltd").bank_type,
            Some(BankType::Payments)
        );
    }
}
