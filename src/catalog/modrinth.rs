//! Modrinth API v2 backend
//!
//! Endpoints used:
//! - `GET /project/{id|slug}` — project metadata
//! - `GET /project/{id|slug}/version` — builds, most recent first
//! - `GET /tag/game_version` — known Minecraft releases
//! - `GET /version_file/{sha1}` — identify a build from a file hash

use super::{CatalogClient, LOADER, ProjectInfo, ResolvedArtifact, VersionFileInfo, parse, send};
use crate::error::Result;
use serde::Deserialize;

const CATALOG: &str = "Modrinth";

#[derive(Deserialize)]
struct Project {
    title: String,
    id: String,
    slug: String,
}

#[derive(Deserialize)]
struct Version {
    id: String,
    files: Vec<VersionFile>,
}

#[derive(Deserialize)]
struct VersionFile {
    filename: String,
    url: String,
}

#[derive(Deserialize)]
struct GameVersion {
    version: String,
}

#[derive(Deserialize)]
struct VersionFileMatch {
    id: String,
    project_id: String,
    files: Vec<VersionFile>,
    #[serde(default)]
    game_versions: Vec<String>,
}

pub(super) fn lookup_project(
    client: &CatalogClient,
    identifier: &str,
) -> Result<Option<ProjectInfo>> {
    let url = format!("{}/project/{}", client.modrinth_base(), identifier);
    let Some(response) = send(CATALOG, client.request(&url))? else {
        return Ok(None);
    };
    let project: Project = parse(CATALOG, response)?;
    Ok(Some(ProjectInfo {
        name: project.title,
        id: project.id,
        slug: project.slug,
    }))
}

pub(super) fn resolve_latest(
    client: &CatalogClient,
    identifier: &str,
    game_version: &str,
) -> Result<Option<ResolvedArtifact>> {
    let url = format!("{}/project/{}/version", client.modrinth_base(), identifier);
    let request = client
        .request(&url)
        .query("game_versions", &format!("[\"{}\"]", game_version))
        .query("loaders", &format!("[\"{}\"]", LOADER));

    let Some(response) = send(CATALOG, request)? else {
        return Ok(None);
    };
    let versions: Vec<Version> = parse(CATALOG, response)?;

    // Most recent first; a listed version without files is unusable
    let Some(version) = versions.into_iter().next() else {
        return Ok(None);
    };
    let Some(file) = version.files.into_iter().next() else {
        return Ok(None);
    };

    Ok(Some(ResolvedArtifact {
        version_id: version.id,
        filename: file.filename,
        download_url: file.url,
        game_version: game_version.to_string(),
    }))
}

pub(super) fn version_exists(client: &CatalogClient, version: &str) -> Result<bool> {
    let url = format!("{}/tag/game_version", client.modrinth_base());
    let Some(response) = send(CATALOG, client.request(&url))? else {
        return Ok(false);
    };
    let known: Vec<GameVersion> = parse(CATALOG, response)?;
    Ok(known.iter().any(|v| v.version == version))
}

pub(super) fn lookup_version_file(
    client: &CatalogClient,
    sha1: &str,
) -> Result<Option<VersionFileInfo>> {
    let url = format!("{}/version_file/{}", client.modrinth_base(), sha1);
    let Some(response) = send(CATALOG, client.request(&url))? else {
        return Ok(None);
    };
    let matched: VersionFileMatch = parse(CATALOG, response)?;

    let (Some(file), Some(game_version)) = (
        matched.files.into_iter().next(),
        matched.game_versions.into_iter().next(),
    ) else {
        return Ok(None);
    };

    Ok(Some(VersionFileInfo {
        project_id: matched.project_id,
        version_id: matched.id,
        download_url: file.url,
        game_version,
    }))
}
