use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::freshness::DateZone;

/// Size of each block written by the fetcher (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

pub const DEFAULT_BASE_URL: &str = "https://osf.io";
pub const DEFAULT_DOWNLOAD_TEMPLATE: &str = "{base}/{key}/download";
pub const DEFAULT_METADATA_TEMPLATE: &str = "{base}/{key}/metadata?format=datacite-json";

/// Global configuration loaded from `~/.config/osfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsfConfig {
    /// Base URL substituted for `{base}` in the templates.
    pub base_url: String,
    /// Download URL template; `{base}` and `{key}` are substituted.
    #[serde(default = "default_download_template")]
    pub download_url_template: String,
    /// Metadata URL template; must answer with DataCite JSON.
    #[serde(default = "default_metadata_template")]
    pub metadata_url_template: String,
    /// Bytes per block written to disk while downloading.
    #[serde(default = "default_block_size")]
    pub block_size_bytes: usize,
    /// Time zone used to place a remote calendar date at midnight.
    #[serde(default)]
    pub date_zone: DateZone,
    /// Filename -> resource key table.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

fn default_download_template() -> String {
    DEFAULT_DOWNLOAD_TEMPLATE.to_string()
}

fn default_metadata_template() -> String {
    DEFAULT_METADATA_TEMPLATE.to_string()
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

/// Data files of the plenoptic project, the stock example table.
fn default_files() -> BTreeMap<String, String> {
    [
        ("plenoptic-test-files.tar.gz", "q9kn8"),
        ("ssim_images.tar.gz", "j65tw"),
        ("ssim_analysis.mat", "ndtc7"),
        ("msssim_images.tar.gz", "5fuba"),
        ("MAD_results.tar.gz", "jwcsr"),
        (
            "portilla_simoncelli_matlab_test_vectors.tar.gz",
            "qtn5y",
        ),
        ("portilla_simoncelli_test_vectors.tar.gz", "8r2gq"),
        ("portilla_simoncelli_images.tar.gz", "eqr3t"),
        ("portilla_simoncelli_synthesize.npz", "a7p9r"),
        (
            "portilla_simoncelli_synthesize_torch_v1.12.0.npz",
            "gbv8e",
        ),
        ("portilla_simoncelli_synthesize_gpu.npz", "tn4y8"),
        ("portilla_simoncelli_scales.npz", "xhwv3"),
    ]
    .into_iter()
    .map(|(name, key)| (name.to_string(), key.to_string()))
    .collect()
}

impl Default for OsfConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            download_url_template: default_download_template(),
            metadata_url_template: default_metadata_template(),
            block_size_bytes: DEFAULT_BLOCK_SIZE,
            date_zone: DateZone::default(),
            files: default_files(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("osfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<OsfConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = OsfConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<OsfConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: OsfConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    if cfg.block_size_bytes == 0 {
        anyhow::bail!("block_size_bytes must be greater than zero");
    }
    Ok(cfg)
}
