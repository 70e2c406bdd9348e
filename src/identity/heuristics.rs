// src/identity/heuristics.rs

use super::bank_type::BankType;
use super::normalize::normalize_name;

/// Guess a bank type from words in its name. Used only when the reference
/// table has no entry for the bank and the sheet gave no bank-type header.
pub fn infer_bank_type(raw_name: &str) -> Option<BankType> {
    let name = normalize_name(raw_name);
    if name.is_empty() {
        return None;
    }
    let has = |needle: &str| name.contains(needle);

    if has("small finance bank") {
        Some(BankType::SmallFinance)
    } else if has("payments bank") || has("payment bank") {
        Some(BankType::Payments)
    } else if has("local area bank") {
        Some(BankType::LocalArea)
    } else if has("gramin") || has("grameen") || has("grama bank") || has("rural bank") {
        Some(BankType::RegionalRural)
    } else if has("cooperative") || has("co operative") || has("sahakari") {
        Some(BankType::Cooperative)
    } else if has("development bank") || has("exim") || has("nabard") || has("sidbi") {
        Some(BankType::Development)
    } else {
        None
    }
}
