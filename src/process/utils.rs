// src/process/utils.rs

use once_cell::sync::Lazy;
use regex::Regex;

static INDEX_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\|\s*\d+\s*$").expect("index-suffix pattern is valid"));

/// 1) Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// 2) Drop a trailing `| N` disambiguation index, e.g. `"Amount | 2"`.
pub fn strip_index_suffix(label: &str) -> &str {
    match INDEX_SUFFIX.find(label) {
        Some(m) => &label[..m.start()],
        None => label,
    }
}

/// 3) Case- and spacing-insensitive comparison key for sheet labels.
pub fn label_key(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

// Ordered: first match wins.
static KEY_ALIASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"^(no\.?|number)\s*(of)?\s*(transactions?|txns?)\b", "Count"),
        (r"^amount\b", "Amount"),
        (r"^volume\b", "Volume"),
        (r"^value\b", "Value"),
        (r"^active\s+customers?\b", "ActiveCustomers"),
        (r"^inward\s+credits?\b", "InwardCredits"),
        (r"^outward\s+debits?\b", "OutwardDebits"),
        (r"^on[\s-]*site\b", "OnSite"),
        (r"^off[\s-]*site\b", "OffSite"),
        (r"^card\s+payments?\s+transactions?\b", "CardPaymentsTransactions"),
        (r"^micro\s*atms?\b", "MicroATMs"),
        (r"^bharat\s*qr\b", "BharatQRCodes"),
        (r"^upi\s*qr\b", "UPIQRCodes"),
        (r"^credit\s+cards?\b", "CreditCards"),
        (r"^debit\s+cards?\b", "DebitCards"),
        (r"^(pos|point\s+of\s+sale)\b", "PoS"),
        (r"^online\b", "OnlineEcom"),
        (r"^others?\b", "Others"),
        (r"^cash\s+withdrawal\s+at\s+atms?\b", "CashWithdrawalATM"),
        (r"^cash\s+withdrawal\s+at\s+pos\b", "CashWithdrawalPoS"),
    ]
    .into_iter()
    .map(|(pattern, key)| {
        let re = Regex::new(&format!("(?i){pattern}")).expect("alias pattern is valid");
        (re, key)
    })
    .collect()
});

/// 4) Stable output key for one header segment: a known alias, otherwise the
/// label's alphanumeric words joined with `_`.
pub fn canonical_key(label: &str) -> String {
    let label = clean_str(strip_index_suffix(label));
    if let Some((_, key)) = KEY_ALIASES.iter().find(|(re, _)| re.is_match(&label)) {
        return (*key).to_string();
    }
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
