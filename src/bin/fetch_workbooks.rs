use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use rbistats::{
    config::{PipelineConfig, SourceConfig},
    fetch::{discover_workbook_links, file_name_for, HttpFetcher, ResourceFetcher},
};
use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};
use tokio::{
    sync::{mpsc, Semaphore},
    time::Instant,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

/// Workbook links on one source's listing page; none when it has no listing URL.
async fn list_source(fetcher: &HttpFetcher, source: &SourceConfig) -> Result<Vec<Url>> {
    let Some(listing) = source.listing_url.as_deref() else {
        return Ok(Vec::new());
    };
    let base = Url::parse(listing)?;
    let html = fetcher.fetch_page(listing).await?;
    let links = discover_workbook_links(&html, &base);
    info!(feed = %source.kind, listing, links = links.len(), "listing scraped");
    Ok(links)
}

/// Sibling temp path keeping the full file name, so `X.xls` and `X.xlsx`
/// never share one.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Write `bytes` next to `dest`, then rename into place. The temp file is
/// removed when either step fails.
async fn save_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = part_path(dest);
    let res = async {
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, dest)
            .await
            .with_context(|| format!("renaming into {}", dest.display()))
    }
    .await;
    if res.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    res
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rbistats=info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) config + client ──────────────────────────────────────────
    let config = PipelineConfig::from_env()?;
    fs::create_dir_all(&config.input_dir)?;
    let fetcher = Arc::new(HttpFetcher::new(config.retry)?);
    let concurrency = config.download_concurrency.max(1);

    // ─── 3) scrape listing pages ─────────────────────────────────────
    let listed: Vec<Result<Vec<Url>>> = stream::iter(&config.sources)
        .map(|source| {
            let fetcher = Arc::clone(&fetcher);
            async move { list_source(&fetcher, source).await }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut to_download: Vec<(Url, PathBuf)> = Vec::new();
    let mut failures = 0usize;
    for res in listed {
        match res {
            Ok(links) => {
                for url in links {
                    let Some(name) = file_name_for(&url) else {
                        warn!(%url, "link has no file name");
                        continue;
                    };
                    let dest = config.input_dir.join(name);
                    if dest.exists() {
                        continue;
                    }
                    if !to_download.iter().any(|(_, d)| *d == dest) {
                        to_download.push((url, dest));
                    }
                }
            }
            Err(e) => {
                failures += 1;
                error!("listing failed: {:#}", e);
            }
        }
    }

    if to_download.is_empty() {
        info!("no new workbooks; exit");
        return Ok(exit_code(failures));
    }
    info!("{} workbooks to download", to_download.len());

    // ─── 4) spawn downloader tasks ───────────────────────────────────
    let (tx, mut rx) = mpsc::channel::<Result<PathBuf, (String, String)>>(100);
    let sem = Arc::new(Semaphore::new(concurrency));
    let mut handles = Vec::with_capacity(to_download.len());

    for (url, dest) in to_download {
        let fetcher = Arc::clone(&fetcher);
        let tx = tx.clone();
        let sem = Arc::clone(&sem);

        handles.push(tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let start = Instant::now();
            let res = match fetcher.fetch_workbook(url.as_str()).await {
                Ok(bytes) => save_atomic(&dest, &bytes)
                    .await
                    .map(|_| dest.clone())
                    .map_err(|e| (url.to_string(), format!("{:#}", e))),
                Err(e) => Err((url.to_string(), format!("{:#}", e))),
            };
            if res.is_ok() {
                info!(file = %dest.display(), elapsed = ?start.elapsed(), "downloaded");
            }
            let _ = tx.send(res).await;
        }));
    }
    // drop the original sender so `rx.recv()` ends once all downloads complete
    drop(tx);

    // ─── 5) collect outcomes ─────────────────────────────────────────
    let mut downloaded = 0usize;
    while let Some(msg) = rx.recv().await {
        match msg {
            Ok(_) => downloaded += 1,
            Err((url, err)) => {
                failures += 1;
                error!("download error {}: {}", url, err);
            }
        }
    }
    for h in handles {
        let _ = h.await;
    }

    info!(downloaded, failed = failures, "all done");
    Ok(exit_code(failures))
}

fn exit_code(failures: usize) -> ExitCode {
    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_paths_keep_the_extension() {
        let xls = part_path(Path::new("workbooks/ATM_Dec_2023.xls"));
        let xlsx = part_path(Path::new("workbooks/ATM_Dec_2023.xlsx"));
        assert_eq!(xls, Path::new("workbooks/ATM_Dec_2023.xls.part"));
        assert_eq!(xlsx, Path::new("workbooks/ATM_Dec_2023.xlsx.part"));
        assert_ne!(xls, xlsx);
    }

    #[tokio::test]
    async fn saved_file_lands_without_leftovers() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let dest = dir.path().join("NEFT Dec 2023.xlsx");
        save_atomic(&dest, b"PK").await?;
        assert_eq!(fs::read(&dest)?, b"PK");
        assert!(!part_path(&dest).exists());
        Ok(())
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        // renaming a file over a non-empty directory fails
        let dest = dir.path().join("blocked.xlsx");
        fs::create_dir(&dest)?;
        fs::write(dest.join("keep"), b"x")?;
        assert!(save_atomic(&dest, b"PK").await.is_err());
        assert!(!part_path(&dest).exists());
        Ok(())
    }
}
