//! End-to-end generation: load portals, map, intersect, emit.
//!
//! Portals are loaded concurrently, one future per portal, each producing
//! its own [`PortalDefinition`]. Results are only combined once every load
//! has finished. The first failing load aborts the run.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::{info, warn};

use crate::associations::fetch_association_types;
use crate::cache::{ApiSnapshot, read_snapshot, write_snapshot};
use crate::config::{GeneratorConfig, GeneratorOptions};
use crate::emit::Emitter;
use crate::error::Result;
use crate::hubspot::HubspotClient;
use crate::intersect::intersect;
use crate::model::SchemaMapper;
use crate::portal::{PortalConfig, PortalDefinition, PortalModel};

async fn fetch_snapshot(portal: &PortalConfig, options: &GeneratorOptions) -> Result<ApiSnapshot> {
    let mut builder =
        HubspotClient::builder(portal.token.as_str()).base_url(options.base_url.as_str());
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build()?;

    info!(portal = %portal.name, "Getting schemas");
    let schemas = client.get_all_schemas().await?;
    info!(portal = %portal.name, schemas = schemas.len(), "Schemas retrieved");

    let association_types = fetch_association_types(&client, &schemas).await?;

    Ok(ApiSnapshot {
        schemas,
        association_types,
    })
}

async fn load_snapshot(portal: &PortalConfig, options: &GeneratorOptions) -> Result<ApiSnapshot> {
    if let Some(cache_dir) = &options.cache_dir
        && let Some(snapshot) = read_snapshot(cache_dir, &portal.name)?
    {
        info!(portal = %portal.name, "Loading API snapshot");
        return Ok(snapshot);
    }

    let snapshot = fetch_snapshot(portal, options).await?;

    match (&options.cache_dir, options.write_cache) {
        (Some(cache_dir), true) => {
            let path = write_snapshot(cache_dir, &portal.name, &snapshot)?;
            info!(portal = %portal.name, path = %path.display(), "Saved API snapshot");
        }
        (None, true) => {
            warn!(portal = %portal.name, "Snapshot writing requested without a cache directory");
        }
        _ => {}
    }

    Ok(snapshot)
}

/// Loads one portal from its snapshot or the API, then maps it.
///
/// Errors are tagged with the portal name.
pub async fn load_portal(
    portal: &PortalConfig,
    options: &GeneratorOptions,
) -> Result<PortalDefinition> {
    let snapshot = load_snapshot(portal, options)
        .await
        .map_err(|e| e.in_portal(&portal.name))?;

    let mapper = SchemaMapper::new().interface_suffix(options.interface_suffix.as_str());
    let model = PortalModel::from_schemas(&mapper, &snapshot.schemas, snapshot.association_types);

    info!(
        portal = %portal.name,
        objects = model.code.objects.len(),
        enums = model.code.enums.len(),
        "Portal loaded"
    );

    Ok(PortalDefinition {
        name: portal.name.clone(),
        schemas: snapshot.schemas,
        model,
    })
}

/// Loads every portal concurrently; results keep the input order.
pub async fn load_portals(
    portals: &[PortalConfig],
    options: &GeneratorOptions,
) -> Result<Vec<PortalDefinition>> {
    try_join_all(portals.iter().map(|portal| load_portal(portal, options))).await
}

/// Generates the combined single-portal file at `path`.
pub async fn generate_single(
    portal: &PortalConfig,
    path: &Path,
    options: &GeneratorOptions,
    emitter: &Emitter<'_>,
) -> Result<PathBuf> {
    let definition = load_portal(portal, options).await?;
    emitter.write_single(path, &definition.model)
}

/// Generates `shared.ts`, one file per portal and `client.ts` into the
/// config's output folder.
pub async fn generate_multi(
    config: &GeneratorConfig,
    options: &GeneratorOptions,
    emitter: &Emitter<'_>,
) -> Result<Vec<PathBuf>> {
    let portals = load_portals(&config.schemas, options).await?;

    let models: Vec<PortalModel> = portals.iter().map(|p| p.model.clone()).collect();
    let shared = intersect(&models);
    info!(
        portals = portals.len(),
        shared_objects = shared.code.objects.len(),
        "Shared definition computed"
    );

    let named: Vec<(&str, &PortalModel)> = portals
        .iter()
        .map(|p| (p.name.as_str(), &p.model))
        .collect();

    emitter.write_all(&config.outfolder, &named, &shared)
}
