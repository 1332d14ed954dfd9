//! CurseForge core API backend
//!
//! Endpoints used (all require the `x-api-key` header):
//! - `GET /v1/mods/{id}` — project metadata
//! - `GET /v1/mods/{id}/files` — builds, most recent first
//!
//! CurseForge wraps every payload in a `data` envelope and uses numeric
//! ids; both are flattened away here.

use super::{CatalogClient, ProjectInfo, ResolvedArtifact, parse, send};
use crate::error::Result;
use serde::Deserialize;

const CATALOG: &str = "CurseForge";

/// `modLoaderType` value for Fabric in the files query
const MOD_LOADER_FABRIC: &str = "4";

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct Mod {
    id: u64,
    name: String,
    slug: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct File {
    id: u64,
    file_name: String,
    /// Absent when the author opted out of third-party distribution
    download_url: Option<String>,
}

pub(super) fn lookup_project(
    client: &CatalogClient,
    identifier: &str,
) -> Result<Option<ProjectInfo>> {
    let api_key = client.curseforge_api_key()?.to_string();
    let url = format!("{}/v1/mods/{}", client.curseforge_base(), identifier);
    let request = client.request(&url).set("x-api-key", &api_key);

    let Some(response) = send(CATALOG, request)? else {
        return Ok(None);
    };
    let envelope: Envelope<Mod> = parse(CATALOG, response)?;
    Ok(Some(ProjectInfo {
        name: envelope.data.name,
        id: envelope.data.id.to_string(),
        slug: envelope.data.slug,
    }))
}

pub(super) fn resolve_latest(
    client: &CatalogClient,
    identifier: &str,
    game_version: &str,
) -> Result<Option<ResolvedArtifact>> {
    let api_key = client.curseforge_api_key()?.to_string();
    let url = format!("{}/v1/mods/{}/files", client.curseforge_base(), identifier);
    let request = client
        .request(&url)
        .set("x-api-key", &api_key)
        .query("gameVersion", game_version)
        .query("modLoaderType", MOD_LOADER_FABRIC);

    let Some(response) = send(CATALOG, request)? else {
        return Ok(None);
    };
    let envelope: Envelope<Vec<File>> = parse(CATALOG, response)?;

    let Some(file) = envelope.data.into_iter().next() else {
        return Ok(None);
    };
    // A file we cannot download is no build at all
    let Some(download_url) = file.download_url else {
        return Ok(None);
    };

    Ok(Some(ResolvedArtifact {
        version_id: file.id.to_string(),
        filename: file.file_name,
        download_url,
        game_version: game_version.to_string(),
    }))
}
