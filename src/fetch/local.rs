// src/fetch/local.rs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::ResourceFetcher;

/// Serves pages and workbooks from a directory. `file://` URLs are read
/// as-is; anything else is a path relative to `root`.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        match url.strip_prefix("file://") {
            Some(path) => PathBuf::from(path),
            None => self.root.join(Path::new(url.trim_start_matches('/'))),
        }
    }
}

impl ResourceFetcher for LocalFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let path = self.resolve(url);
        fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    }

    async fn fetch_workbook(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.resolve(url);
        fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::discover_workbook_links;
    use tempfile::tempdir;
    use url::Url;

    #[tokio::test]
    async fn serves_pages_and_workbooks_from_disk() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join("index.html"),
            r#"<a href="ATM_Mar_2024.xlsx">ATM</a>"#,
        )?;
        std::fs::write(dir.path().join("ATM_Mar_2024.xlsx"), b"PK\x03\x04")?;

        let fetcher = LocalFetcher::new(dir.path());
        let page = fetcher.fetch_page("index.html").await?;
        let base = Url::from_directory_path(dir.path())
            .map_err(|_| anyhow::anyhow!("temp dir is not absolute"))?;
        let links = discover_workbook_links(&page, &base);
        assert_eq!(links.len(), 1);

        let bytes = fetcher.fetch_workbook(links[0].as_str()).await?;
        assert_eq!(bytes, b"PK\x03\x04");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let fetcher = LocalFetcher::new("/nonexistent-rbistats");
        assert!(fetcher.fetch_workbook("nothing.xlsx").await.is_err());
    }
}
