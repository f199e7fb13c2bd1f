//! Generator configuration: the multi-portal config file and run options.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::emit::validate_portal_names;
use crate::error::{HsgenError, Result};
use crate::hubspot::DEFAULT_BASE_URL;
use crate::portal::PortalConfig;

/// Contents of the multi-portal JSON config file.
///
/// ```json
/// {
///   "outfolder": "src/generated",
///   "schemas": [
///     { "name": "production", "token": "pat-na1-..." },
///     { "name": "sandbox", "token": "pat-na1-..." }
///   ]
/// }
/// ```
///
/// `cache_dir`, `write_cache` and `interface_suffix` are optional. Unknown
/// keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub outfolder: PathBuf,
    pub schemas: Vec<PortalConfig>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub write_cache: bool,
    #[serde(default)]
    pub interface_suffix: Option<String>,
}

impl GeneratorConfig {
    /// Reads and validates a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| HsgenError::io(path, e))?;
        Self::from_json(&contents).map_err(|e| match e {
            HsgenError::Json { source, .. } => HsgenError::Json {
                context: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates config JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|source| HsgenError::Json {
            context: "config".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.outfolder.as_os_str().is_empty() {
            return Err(HsgenError::Config("`outfolder` must not be empty".to_string()));
        }
        if self.schemas.is_empty() {
            return Err(HsgenError::Config(
                "`schemas` must list at least one portal".to_string(),
            ));
        }
        if let Some(i) = self.schemas.iter().position(|p| p.name.trim().is_empty()) {
            return Err(HsgenError::Config(format!("schemas[{i}] has an empty name")));
        }
        validate_portal_names(self.schemas.iter().map(|p| p.name.as_str()))
    }

    /// Options from this file, layered under `overrides`.
    ///
    /// Values set on `overrides` win; unset ones fall back to the file.
    pub fn options(&self, overrides: GeneratorOptions) -> GeneratorOptions {
        let mut options = overrides;
        if options.cache_dir.is_none() {
            options.cache_dir = self.cache_dir.clone();
        }
        options.write_cache |= self.write_cache;
        if options.interface_suffix.is_empty()
            && let Some(suffix) = &self.interface_suffix
        {
            options.interface_suffix = suffix.clone();
        }
        options
    }
}

/// Settings shared by every portal in a run.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub base_url: String,
    /// Snapshot directory; snapshots are read from here when set.
    pub cache_dir: Option<PathBuf>,
    /// Write a snapshot after every fresh fetch. Needs `cache_dir`.
    pub write_cache: bool,
    pub interface_suffix: String,
    /// Per-request timeout; unset leaves the transport defaults in place.
    pub timeout: Option<Duration>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: None,
            write_cache: false,
            interface_suffix: String::new(),
            timeout: None,
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn write_cache(mut self, write_cache: bool) -> Self {
        self.write_cache = write_cache;
        self
    }

    pub fn interface_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.interface_suffix = suffix.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
