//! Resource keys and the URLs built from them.

use crate::config::OsfConfig;
use crate::error::{OsfError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier of a file hosted on the OSF (the `{KEY}` in `https://osf.io/{KEY}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Validates that the key can be substituted into a URL path segment.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let valid = !key.is_empty()
            && !key
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '\\'));
        if !valid {
            return Err(OsfError::InvalidKey { key });
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A key resolved from user input, with the filename it is known by (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub key: ResourceKey,
    pub filename: Option<String>,
}

impl Resolved {
    /// Default local name: the catalog filename, or the bare key.
    pub fn local_name(&self) -> &str {
        self.filename.as_deref().unwrap_or(self.key.as_str())
    }
}

/// Filename -> key table plus the URL templates of the hosting service.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    base_url: String,
    download_template: String,
    metadata_template: String,
    files: BTreeMap<String, String>,
}

impl ResourceCatalog {
    pub fn from_config(cfg: &OsfConfig) -> Self {
        Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            download_template: cfg.download_url_template.clone(),
            metadata_template: cfg.metadata_url_template.clone(),
            files: cfg.files.clone(),
        }
    }

    /// Looks `target` up as a filename; anything not in the table is taken as a raw key.
    pub fn resolve(&self, target: &str) -> Result<Resolved> {
        match self.files.get(target) {
            Some(key) => Ok(Resolved {
                key: ResourceKey::new(key.clone())?,
                filename: Some(target.to_string()),
            }),
            None => Ok(Resolved {
                key: ResourceKey::new(target)?,
                filename: None,
            }),
        }
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn download_url(&self, key: &ResourceKey) -> String {
        self.expand(&self.download_template, key)
    }

    pub fn metadata_url(&self, key: &ResourceKey) -> String {
        self.expand(&self.metadata_template, key)
    }

    fn expand(&self, template: &str, key: &ResourceKey) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(key.as_str().as_bytes()).collect();
        template
            .replace("{base}", &self.base_url)
            .replace("{key}", &encoded)
    }
}
