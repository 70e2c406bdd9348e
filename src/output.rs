// src/output.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::layout::Period;
use crate::process::{FeedKind, ProcessedWorkbook};
use crate::record::Document;

pub const MANIFEST_FILE: &str = "manifest.json";

/// `{slug}_{YYYY}_{MM}.json`
pub fn output_file_name(feed: FeedKind, period: Period) -> String {
    format!("{}_{}.json", feed.slug(), period.key())
}

/// Serialize `value` pretty-printed to a hidden temp file in the same
/// directory, then rename it over `path`.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let mut tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    serde_json::to_writer_pretty(&mut tmp, value)
        .with_context(|| format!("serializing {}", file_name))?;
    tmp.write_all(b"\n")?;
    tmp.sync_all()?;
    drop(tmp);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(())
}

/// Write one document into `dir`, replacing any previous run's file.
pub fn write_document(
    dir: &Path,
    feed: FeedKind,
    period: Period,
    document: &Document,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(output_file_name(feed, period));
    write_json_atomic(&path, document)?;
    debug!(path = %path.display(), "document written");
    Ok(path)
}

/// One available document, as listed in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub feed: FeedKind,
    pub period: String,
    pub file: String,
    pub banks: usize,
    pub has_total: bool,
}

impl ManifestEntry {
    pub fn for_workbook(processed: &ProcessedWorkbook) -> Self {
        ManifestEntry {
            feed: processed.feed,
            period: processed.period.to_string(),
            file: output_file_name(processed.feed, processed.period),
            banks: processed.document.bank_count(),
            has_total: processed.document.has_total(),
        }
    }
}

/// Read, merge and write back `manifest.json` in `dir`.
///
/// Entries are keyed by output file name, so re-processing a period
/// replaces its entry. The result is sorted by feed, then period.
pub fn update_manifest(dir: &Path, new_entries: &[ManifestEntry]) -> Result<Vec<ManifestEntry>> {
    // 1) load existing entries, or start empty
    let path = dir.join(MANIFEST_FILE);
    let existing: Vec<ManifestEntry> = if path.exists() {
        let f = fs::File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(f).with_context(|| format!("parsing {}", path.display()))?
    } else {
        Vec::new()
    };

    // 2) merge by file name
    let mut by_file: BTreeMap<String, ManifestEntry> =
        existing.into_iter().map(|e| (e.file.clone(), e)).collect();
    for entry in new_entries {
        by_file.insert(entry.file.clone(), entry.clone());
    }

    // 3) sort and write
    let mut merged: Vec<ManifestEntry> = by_file.into_values().collect();
    merged.sort_by(|a, b| {
        (a.feed.slug(), a.period.as_str()).cmp(&(b.feed.slug(), b.period.as_str()))
    });
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    write_json_atomic(&path, &merged)?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::InfraDocument;
    use tempfile::tempdir;

    fn entry(feed: FeedKind, year: i32, month: u32, banks: usize) -> Result<ManifestEntry> {
        let period = Period::new(year, month)?;
        Ok(ManifestEntry {
            feed,
            period: period.to_string(),
            file: output_file_name(feed, period),
            banks,
            has_total: false,
        })
    }

    #[test]
    fn file_name_uses_slug_and_period_key() -> Result<()> {
        let period = Period::new(2023, 4)?;
        assert_eq!(output_file_name(FeedKind::AtmPosCard, period), "atm_pos_card_2023_04.json");
        assert_eq!(
            output_file_name(FeedKind::FundsTransfer, period),
            "funds_transfer_2023_04.json"
        );
        Ok(())
    }

    #[test]
    fn writes_document_and_leaves_no_temp_file() -> Result<()> {
        let dir = tempdir()?;
        let out_dir = dir.path().join("data");
        let period = Period::new(2024, 1)?;
        let doc = Document::Infra(InfraDocument::default());

        let path = write_document(&out_dir, FeedKind::AtmPosCard, period, &doc)?;
        let text = fs::read_to_string(&path)?;
        assert_eq!(serde_json::from_str::<serde_json::Value>(&text)?["banks"], serde_json::json!([]));
        assert!(text.ends_with('\n'));

        // second write replaces the first
        write_document(&out_dir, FeedKind::AtmPosCard, period, &doc)?;
        let names: Vec<String> = fs::read_dir(&out_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["atm_pos_card_2024_01.json".to_string()]);
        Ok(())
    }

    #[test]
    fn manifest_merges_and_sorts() -> Result<()> {
        let dir = tempdir()?;
        update_manifest(
            dir.path(),
            &[
                entry(FeedKind::FundsTransfer, 2023, 12, 50)?,
                entry(FeedKind::AtmPosCard, 2024, 2, 70)?,
            ],
        )?;
        let merged = update_manifest(
            dir.path(),
            &[
                entry(FeedKind::AtmPosCard, 2023, 11, 69)?,
                entry(FeedKind::AtmPosCard, 2024, 2, 71)?,
            ],
        )?;
        let files: Vec<&str> = merged.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(
            files,
            vec![
                "atm_pos_card_2023_11.json",
                "atm_pos_card_2024_02.json",
                "funds_transfer_2023_12.json"
            ]
        );
        assert_eq!(merged[1].banks, 71);

        let on_disk: Vec<ManifestEntry> =
            serde_json::from_str(&fs::read_to_string(dir.path().join(MANIFEST_FILE))?)?;
        assert_eq!(on_disk, merged);
        Ok(())
    }
}
