// src/fetch/links.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::trace;
use url::Url;

static ANCHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

fn is_workbook_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path.ends_with(".xlsx") || path.ends_with(".xls")
}

/// Absolute `.xlsx`/`.xls` links on a listing page, first occurrence order.
/// Extensions are matched case-insensitively.
pub fn discover_workbook_links(html: &str, base: &Url) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    doc.select(&ANCHORS)
        .filter_map(|e| e.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|u| is_workbook_path(u.path()))
        .filter(|u| seen.insert(u.to_string()))
        .inspect(|u| trace!(url = %u, "workbook link"))
        .collect()
}

/// Last path segment of `url`, percent-decoded, used as the on-disk file name.
/// Segments that decode to a path separator or invalid UTF-8 are rejected.
pub fn file_name_for(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let name = urlencoding::decode(segment).ok()?.into_owned();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return None;
    }
    Some(name)
}
