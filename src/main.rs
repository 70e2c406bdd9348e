use anyhow::{Context, Result};
use rayon::prelude::*;
use rbistats::{
    config::PipelineConfig,
    identity::ReferenceTable,
    layout::Period,
    output::{update_manifest, write_document, ManifestEntry},
    process::{self, FeedKind},
    PipelineError,
};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rbistats=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config + reference table ─────────────────────────────────
    let config = PipelineConfig::from_env()?;
    let owned_table;
    let table: &ReferenceTable = match &config.reference_table {
        Some(path) => {
            owned_table = ReferenceTable::from_path(path)
                .with_context(|| format!("loading reference table {}", path.display()))?;
            &owned_table
        }
        None => ReferenceTable::embedded()?,
    };
    info!(banks = table.len(), "reference table ready");
    fs::create_dir_all(&config.output_dir)?;

    // ─── 3) discover workbooks ───────────────────────────────────────
    let work = discover_inputs(&config)?;
    if work.is_empty() {
        warn!(input_dir = %config.input_dir.display(), "no workbooks found; exit");
        return Ok(ExitCode::SUCCESS);
    }
    info!("{} workbooks to process", work.len());

    // ─── 4) one file per rayon task ──────────────────────────────────
    let start = Instant::now();
    let results: Vec<(PathBuf, Result<ManifestEntry>)> = work
        .par_iter()
        .map(|(feed, path)| {
            let res = process_file(path, *feed, table, &config.output_dir);
            (path.clone(), res)
        })
        .collect();

    // ─── 5) manifest + summary ───────────────────────────────────────
    let mut written = Vec::new();
    let mut failures = 0usize;
    for (path, res) in results {
        match res {
            Ok(entry) => written.push(entry),
            Err(e) => {
                failures += 1;
                error!(file = %path.display(), "failed: {:#}", e);
            }
        }
    }
    if !written.is_empty() {
        let manifest = update_manifest(&config.output_dir, &written)?;
        info!(entries = manifest.len(), "manifest updated");
    }
    info!(
        ok = written.len(),
        failed = failures,
        elapsed = ?start.elapsed(),
        "all done"
    );

    Ok(if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Every `(feed, path)` matched by a configured source glob. A file matched
/// by two sources is processed once, as the first.
fn discover_inputs(config: &PipelineConfig) -> Result<Vec<(FeedKind, PathBuf)>> {
    let mut seen = HashSet::new();
    let mut work = Vec::new();
    for source in &config.sources {
        let pattern = config.input_dir.join(&source.pattern);
        let pattern = pattern.to_string_lossy();
        for entry in glob::glob(&pattern).with_context(|| format!("bad glob {pattern}"))? {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            if seen.insert(path.clone()) {
                work.push((source.kind, path));
            } else {
                warn!(file = %path.display(), feed = %source.kind, "already claimed by another source");
            }
        }
    }
    work.sort();
    Ok(work)
}

fn process_file(
    path: &Path,
    feed: FeedKind,
    table: &ReferenceTable,
    out_dir: &Path,
) -> Result<ManifestEntry> {
    // 1) period from the file name
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let period = Period::from_file_name(&name)
        .ok_or_else(|| PipelineError::UnknownPeriod(name.clone()))?;

    // 2) read + normalize
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let processed = process::process_workbook(bytes, &name, feed, period, table)?;

    // 3) write
    let out = write_document(out_dir, feed, period, &processed.document)?;
    info!(
        file = %name,
        output = %out.display(),
        banks = processed.stats.banks,
        total = processed.stats.total_seen,
        skipped = processed.stats.skipped_rows,
        unresolved = processed.stats.unresolved_names,
        "wrote document"
    );
    Ok(ManifestEntry::for_workbook(&processed))
}
