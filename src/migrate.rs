//! Server version migration
//!
//! Moving the whole installed set to a new Minecraft version. The one
//! dangerous case is partial coverage on a real version change: mods with
//! no build for the target would stay installed for the old version while
//! the manifest moves forward. That mixed-version state is disallowed, so
//! those mods are pruned — after explicit confirmation through the
//! injected prompt. A recheck against the already-stored version never
//! prunes anything.

use crate::catalog::CatalogClient;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::reconcile::{self, CommitReport};
use crate::{download, output};
use std::path::Path;

/// Outcome of a migration for per-mod reporting
#[derive(Debug, Default)]
pub struct MigrateReport {
    /// Mods removed because they had no build for the target version
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    pub failed: Vec<String>,
}

/// Reconcile against `target_version`, prune if required and confirmed,
/// then commit.
///
/// `confirm` is consulted exactly once, and only when the migration would
/// otherwise leave mods behind on the old version. Declining aborts with
/// `UpdateDeclined` before anything is removed or downloaded.
pub fn migrate(
    client: &CatalogClient,
    manifest: &mut Manifest,
    manifest_path: &Path,
    mods_dir: &Path,
    target_version: &str,
    confirm: &mut dyn FnMut(&str) -> bool,
) -> Result<MigrateReport> {
    client.ensure_version(target_version)?;

    reconcile::reconcile(client, manifest, manifest_path, target_version)?;

    let pending = manifest.pending_count();
    if pending == 0 {
        return Err(Error::NoPendingUpdates);
    }

    let mut report = MigrateReport::default();

    let version_changes = manifest.server_version.as_deref() != Some(target_version);
    if version_changes && pending < manifest.mods.len() {
        if !confirm(
            "Any mods that do not have pending updates will be removed. Do you want to proceed?",
        ) {
            return Err(Error::UpdateDeclined);
        }

        // full removal set first, then one rebuild of the collection
        let removed = manifest.remove_where(|record| record.update.is_none());
        for record in &removed {
            if let Err(err) = download::remove_artifact(mods_dir, &record.filename) {
                output::warning(&format!("could not remove {}: {}", record.filename, err));
            }
            report.removed.push(record.mod_name.clone());
        }
        // persist the prune before commit starts downloading; a crash
        // mid-commit must not resurrect records whose files are gone
        manifest.save(manifest_path)?;
    }

    let CommitReport { updated, failed } =
        reconcile::commit(manifest, manifest_path, mods_dir, target_version)?;
    report.updated = updated;
    report.failed = failed;
    Ok(report)
}
