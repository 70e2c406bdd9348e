// src/process/sentinel.rs
//
// Group labels the source sheets interleave with bank rows. Some labels are
// in both sets; the classifier checks sectors first.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::utils::label_key;

pub const SECTOR_LABELS: &[&str] = &[
    "All Banks",
    "Scheduled Commercial Banks",
    "Public Sector Banks",
    "Private Sector Banks",
    "Foreign Banks",
    "Small Finance Banks",
    "Payments Banks",
    "Payment Banks",
    "Regional Rural Banks",
    "Co-operative Banks",
    "Cooperative Banks",
    "Urban Co-operative Banks",
    "State Co-operative Banks",
    "Local Area Banks",
    "All India Financial Institutions",
    "Financial Institutions",
];

pub const BANK_TYPE_LABELS: &[&str] = &[
    "Public Sector Banks",
    "Nationalised Banks",
    "SBI Group",
    "Private Sector Banks",
    "Old Private Sector Banks",
    "New Private Sector Banks",
    "Foreign Banks",
    "Small Finance Banks",
    "Payments Banks",
    "Payment Banks",
    "Regional Rural Banks",
    "Co-operative Banks",
    "Cooperative Banks",
    "Urban Co-operative Banks",
    "State Co-operative Banks",
    "Local Area Banks",
    "Development Banks",
];

static SECTORS: Lazy<HashSet<String>> =
    Lazy::new(|| SECTOR_LABELS.iter().map(|l| label_key(l)).collect());
static BANK_TYPES: Lazy<HashSet<String>> =
    Lazy::new(|| BANK_TYPE_LABELS.iter().map(|l| label_key(l)).collect());

pub fn is_sector_label(text: &str) -> bool {
    SECTORS.contains(&label_key(text))
}

pub fn is_bank_type_label(text: &str) -> bool {
    BANK_TYPES.contains(&label_key(text))
}

pub fn is_sentinel(text: &str) -> bool {
    is_sector_label(text) || is_bank_type_label(text)
}
