//! The staged-update protocol
//!
//! Each installed record moves through `clean -> staged -> clean` states:
//! [`reconcile`] computes and stages candidate updates without touching
//! installed artifacts, [`commit`] later applies every staged update and
//! advances the stored server version. Staging is metadata only and always
//! re-derivable, so reconcile persists once at the end of the pass — a
//! mid-run crash loses the whole pass instead of leaving a partial mix.
//!
//! Failures local to one record (catalog hiccup, failed download) never
//! abort the batch; the record is reported and left for a retry.

use crate::catalog::CatalogClient;
use crate::download;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::{output, resolve};
use std::path::Path;

/// Per-mod outcome of a reconcile pass
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Mods that now hold a staged update
    pub updated: Vec<String>,
    /// Mods with nothing to change (including per-record lookup failures)
    pub unchanged: Vec<String>,
}

/// Per-mod outcome of a commit pass
#[derive(Debug, Default)]
pub struct CommitReport {
    pub updated: Vec<String>,
    /// Mods whose download failed; they keep their staged update
    pub failed: Vec<String>,
}

/// Stage the latest candidate build for every installed record against
/// `candidate_version`.
///
/// Records with no newer build (or no build at all) have any stale staged
/// data cleared, so re-running always reflects only the current catalog
/// state. The manifest is saved once after all records are processed.
pub fn reconcile(
    client: &CatalogClient,
    manifest: &mut Manifest,
    manifest_path: &Path,
    candidate_version: &str,
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();

    for record in &mut manifest.mods {
        match resolve::resolve_for_update(client, record, candidate_version) {
            Ok(Some(staged)) => {
                record.update = Some(staged);
                report.updated.push(record.mod_name.clone());
            }
            Ok(None) => {
                record.update = None;
                report.unchanged.push(record.mod_name.clone());
            }
            Err(err) => {
                output::warning(&format!("{}: {}", record.mod_name, err));
                record.update = None;
                report.unchanged.push(record.mod_name.clone());
            }
        }
    }

    manifest.save(manifest_path)?;
    Ok(report)
}

/// Apply every staged update: remove the old artifact, download the new
/// one, then swap the record's installed fields and clear staging.
///
/// The old file goes first so an interruption between download and field
/// swap cannot leave the manifest pointing at a file that was never
/// written. Version advancement is the very last mutation before the
/// single save: an interrupted commit keeps the pre-migration version and
/// a re-run of reconcile+commit is safe.
pub fn commit(
    manifest: &mut Manifest,
    manifest_path: &Path,
    mods_dir: &Path,
    target_version: &str,
) -> Result<CommitReport> {
    let mut report = CommitReport::default();

    for record in &mut manifest.mods {
        let Some(staged) = record.update.clone() else {
            continue;
        };

        if let Err(err) = download::remove_artifact(mods_dir, &record.filename) {
            output::warning(&format!(
                "could not remove old {}: {}",
                record.filename, err
            ));
        }

        match download::fetch(&staged.new_download_url, mods_dir, &staged.new_filename) {
            Ok(()) => {
                record.apply_staged();
                report.updated.push(record.mod_name.clone());
            }
            Err(err) => {
                // leave the update staged; a later pass re-downloads it
                output::warning(&format!("{}: {}", record.mod_name, err));
                report.failed.push(record.mod_name.clone());
            }
        }
    }

    manifest.server_version = Some(target_version.to_string());
    manifest.save(manifest_path)?;
    Ok(report)
}
