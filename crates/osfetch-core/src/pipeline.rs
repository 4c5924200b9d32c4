//! Fetch -> extract -> metadata -> freshness, run once, in order.

use crate::config::OsfConfig;
use crate::error::Result;
use crate::extract::{self, Extracted};
use crate::fetch::{self, FetchOutcome};
use crate::freshness::{self, Freshness};
use crate::metadata;
use crate::progress::Progress;
use crate::resource::{ResourceCatalog, Resolved};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One pipeline invocation.
#[derive(Debug, Clone)]
pub struct Request {
    /// Catalog filename or raw resource key.
    pub target: String,
    /// Destination path; defaults to `./<filename or key>`.
    pub output: Option<PathBuf>,
    /// Unpack tarballs after download.
    pub extract: bool,
}

impl Request {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            output: None,
            extract: true,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct Report {
    pub resource: Resolved,
    pub download_path: PathBuf,
    pub fetch: FetchOutcome,
    /// None when the download was not a tarball or extraction was disabled.
    pub extracted: Option<Extracted>,
    /// File or directory the local timestamp was taken from.
    pub local_path: PathBuf,
    pub remote_updated: String,
    pub local_newest: SystemTime,
    pub freshness: Freshness,
}

/// Holds configuration for the stages; owns nothing across runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: OsfConfig,
    catalog: ResourceCatalog,
}

impl Pipeline {
    pub fn new(config: OsfConfig) -> Self {
        let catalog = ResourceCatalog::from_config(&config);
        Self { config, catalog }
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &OsfConfig {
        &self.config
    }

    pub fn resolve(&self, target: &str) -> Result<Resolved> {
        self.catalog.resolve(target)
    }

    /// Download only.
    pub fn download(
        &self,
        resource: &Resolved,
        dest: &Path,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<FetchOutcome> {
        let url = self.catalog.download_url(&resource.key);
        fetch::fetch_to_path(&url, dest, self.config.block_size_bytes, on_progress)
    }

    /// Remote `Updated` date only.
    pub fn remote_updated(&self, resource: &Resolved) -> Result<String> {
        let url = self.catalog.metadata_url(&resource.key);
        metadata::fetch_updated_date(&url)
    }

    /// Remote date vs the newest modification under `local`.
    pub fn compare_local(
        &self,
        resource: &Resolved,
        local: &Path,
    ) -> Result<(String, SystemTime, Freshness)> {
        let remote = self.remote_updated(resource)?;
        let newest = freshness::newest_mtime(local)?;
        let result = freshness::compare(&remote, newest, self.config.date_zone)?;
        Ok((remote, newest, result))
    }

    /// Runs every stage; the first failure ends the run and nothing is cleaned up.
    pub fn run(&self, request: &Request, on_progress: &mut dyn FnMut(Progress)) -> Result<Report> {
        let resource = self.resolve(&request.target)?;
        let download_path = request
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(".").join(resource.local_name()));

        tracing::info!(
            key = %resource.key,
            dest = %download_path.display(),
            "fetching resource"
        );
        let fetch = self.download(&resource, &download_path, on_progress)?;

        let extracted = if request.extract && extract::is_archive(&download_path) {
            Some(extract::extract_archive(&download_path)?)
        } else {
            None
        };
        let local_path = match &extracted {
            Some(e) => e.extracted_dir.clone(),
            None => download_path.clone(),
        };

        let (remote_updated, local_newest, freshness) =
            self.compare_local(&resource, &local_path)?;
        tracing::info!(
            newer = %freshness.newer(),
            seconds = freshness.magnitude_secs(),
            "freshness"
        );

        Ok(Report {
            resource,
            download_path,
            fetch,
            extracted,
            local_path,
            remote_updated,
            local_newest,
            freshness,
        })
    }
}
