// src/identity/normalize.rs

/// Comparison key for bank names: lowercase, punctuation removed, whitespace
/// collapsed and legal suffixes folded (`limited`/`ltd` → `ltd`,
/// `corporation`/`corp` → `corp`, `company`/`co` → `co`).
pub fn normalize_name(raw: &str) -> String {
    let stripped: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    stripped
        .split_whitespace()
        .map(|token| match token {
            "limited" | "ltd" => "ltd",
            "corporation" | "corp" => "corp",
            "company" | "co" => "co",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display form of a raw bank name: whitespace collapsed and trailing
/// footnote markers (`*`, `#`, `@`, `$`, `^`) removed.
pub fn clean_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| matches!(c, '*' | '#' | '@' | '$' | '^'))
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_punctuation_and_suffixes() {
        assert_eq!(normalize_name("State Bank Of India"), "state bank of india");
        assert_eq!(normalize_name("  HDFC   Bank Ltd. "), "hdfc bank ltd");
        assert_eq!(normalize_name("HDFC BANK LIMITED"), "hdfc bank ltd");
        assert_eq!(
            normalize_name("American Express Banking Corp."),
            "american express banking corp"
        );
        assert_eq!(normalize_name("Foo Company"), "foo co");
        assert_eq!(normalize_name("Jammu & Kashmir Bank"), "jammu kashmir bank");
    }

    #[test]
    fn clean_strips_footnotes_and_spacing() {
        assert_eq!(clean_name("  XYZ  NEW BANK LTD* "), "XYZ NEW BANK LTD");
        assert_eq!(clean_name("Paytm Payments Bank Ltd #"), "Paytm Payments Bank Ltd");
        assert_eq!(clean_name(""), "");
    }
}
