// src/fetch/mod.rs
//
// Getting workbooks onto disk. The normalization pipeline never touches the
// network; only the downloader binary goes through a `ResourceFetcher`.

pub mod http;
pub mod links;
pub mod local;

use anyhow::Result;
use std::future::Future;

pub use http::HttpFetcher;
pub use links::{discover_workbook_links, file_name_for};
pub use local::LocalFetcher;

/// Source of listing pages and raw workbook bytes.
pub trait ResourceFetcher {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String>> + Send;

    fn fetch_workbook(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}
