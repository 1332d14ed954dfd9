//! Resolution of mod references against the catalogs
//!
//! Two entry points: [`resolve_for_install`] when adding a new mod and
//! [`resolve_for_update`] when staging updates for installed records.
//! Both lean on the catalogs returning builds most-recent-first and take
//! the first candidate without any version comparison of their own.

use crate::catalog::{CatalogClient, ProjectInfo, ResolvedArtifact};
use crate::error::{Error, Result};
use crate::manifest::{ModRecord, ModSource, StagedUpdate};

/// Catalog-native lookup key for a known record: Modrinth resolves version
/// lists by slug, CurseForge only by numeric id.
fn lookup_key(source: ModSource, id: &str, slug: &str) -> String {
    match source {
        ModSource::Modrinth => slug.to_string(),
        ModSource::Curseforge => id.to_string(),
    }
}

/// Resolve a user-supplied identifier to project metadata plus the latest
/// build for `game_version`.
///
/// Fails with `ProjectNotFound` when the identifier matches nothing and
/// `NoCompatibleBuild` when the project exists but has no build for this
/// version.
pub fn resolve_for_install(
    client: &CatalogClient,
    source: ModSource,
    identifier: &str,
    game_version: &str,
) -> Result<(ProjectInfo, ResolvedArtifact)> {
    let project = client
        .lookup_project(source, identifier)?
        .ok_or_else(|| Error::ProjectNotFound {
            identifier: identifier.to_string(),
        })?;

    let key = lookup_key(source, &project.id, &project.slug);
    let artifact = client
        .resolve_latest(source, &key, game_version)?
        .ok_or_else(|| Error::NoCompatibleBuild {
            name: project.name.clone(),
            version: game_version.to_string(),
        })?;

    Ok((project, artifact))
}

/// Resolve the latest build of an installed record for `candidate_version`.
///
/// Returns `None` when the catalog has no build for that version, or when
/// the resolved build is exactly what is already installed (same version id
/// for the same Minecraft version) — nothing would change, so nothing is
/// staged.
pub fn resolve_for_update(
    client: &CatalogClient,
    record: &ModRecord,
    candidate_version: &str,
) -> Result<Option<StagedUpdate>> {
    let key = lookup_key(record.source, &record.mod_id, &record.mod_slug);
    let Some(artifact) = client.resolve_latest(record.source, &key, candidate_version)? else {
        return Ok(None);
    };

    if artifact.version_id == record.mod_version_id
        && candidate_version == record.current_version
    {
        return Ok(None);
    }

    Ok(Some(StagedUpdate {
        new_version_id: artifact.version_id,
        new_filename: artifact.filename,
        new_download_url: artifact.download_url,
        new_version: artifact.game_version,
    }))
}
