//! On-disk snapshots of fetched portal data.
//!
//! A snapshot is `<portal>_api.json` in the cache directory and holds the
//! schema list and association table exactly as fetched. When present it is
//! used instead of calling the API; there is no expiry.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::associations::AssociationTypes;
use crate::error::{HsgenError, Result};
use crate::hubspot::Schema;
use crate::output::write_atomic;

/// Fetched data for one portal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSnapshot {
    #[serde(default)]
    pub schemas: Vec<Schema>,
    #[serde(default)]
    pub association_types: AssociationTypes,
}

/// Path of the snapshot file for `portal` inside `cache_dir`.
pub fn snapshot_path(cache_dir: &Path, portal: &str) -> PathBuf {
    cache_dir.join(format!("{portal}_api.json"))
}

/// Reads the snapshot for `portal`, or `None` when no file exists.
///
/// ## Errors
///
/// An existing file that cannot be read or parsed is an error, not a miss.
pub fn read_snapshot(cache_dir: &Path, portal: &str) -> Result<Option<ApiSnapshot>> {
    let path = snapshot_path(cache_dir, portal);

    if !path.exists() {
        debug!(path = %path.display(), "No snapshot");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| HsgenError::io(&path, e))?;
    let snapshot: ApiSnapshot =
        serde_json::from_str(&contents).map_err(|source| HsgenError::Json {
            context: path.display().to_string(),
            source,
        })?;

    debug!(
        path = %path.display(),
        schemas = snapshot.schemas.len(),
        "Snapshot hit"
    );
    Ok(Some(snapshot))
}

/// Writes the snapshot for `portal`, replacing any previous one.
pub fn write_snapshot(cache_dir: &Path, portal: &str, snapshot: &ApiSnapshot) -> Result<PathBuf> {
    let path = snapshot_path(cache_dir, portal);
    let json = serde_json::to_string_pretty(snapshot).map_err(|source| HsgenError::Json {
        context: path.display().to_string(),
        source,
    })?;

    write_atomic(&path, &json)?;
    debug!(path = %path.display(), "Snapshot written");
    Ok(path)
}
