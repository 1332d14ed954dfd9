//! Import of untracked jars from the mods directory
//!
//! Jars that exist on disk but not in the manifest are identified by their
//! SHA1 hash through Modrinth's `version_file` endpoint and registered
//! under their existing filename. Independent of the update machinery;
//! only works for mods Modrinth knows about.

use crate::catalog::CatalogClient;
use crate::error::Result;
use crate::manifest::{Manifest, ModRecord, ModSource};
use crate::output;
use sha1::{Digest, Sha1};
use std::io::Read;
use std::path::Path;

/// Per-file outcome of an import scan
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub already_tracked: Vec<String>,
    pub unidentified: Vec<String>,
}

/// Scan `mods_dir` for `.jar` files and register any the manifest does not
/// already track. Saves once at the end when anything was imported.
pub fn import_untracked(
    client: &CatalogClient,
    manifest: &mut Manifest,
    manifest_path: &Path,
    mods_dir: &Path,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    if !mods_dir.exists() {
        output::info("no mods directory to scan");
        return Ok(report);
    }

    let mut entries: Vec<_> = std::fs::read_dir(mods_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "jar")
        })
        .collect();
    entries.sort();

    for path in entries {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        match import_one(client, manifest, &path, &filename) {
            Ok(Outcome::Imported(name)) => report.imported.push(name),
            Ok(Outcome::AlreadyTracked) => report.already_tracked.push(filename),
            Ok(Outcome::Unidentified) => report.unidentified.push(filename),
            Err(err) => {
                output::warning(&format!("{}: {}", filename, err));
                report.unidentified.push(filename);
            }
        }
    }

    if !report.imported.is_empty() {
        manifest.save(manifest_path)?;
    }
    Ok(report)
}

enum Outcome {
    Imported(String),
    AlreadyTracked,
    Unidentified,
}

fn import_one(
    client: &CatalogClient,
    manifest: &mut Manifest,
    path: &Path,
    filename: &str,
) -> Result<Outcome> {
    let hash = sha1_file(path)?;
    output::detail(&format!("{} -> sha1 {}", filename, hash));

    let Some(info) = client.lookup_version_file(&hash)? else {
        return Ok(Outcome::Unidentified);
    };

    if manifest.contains(&info.project_id) {
        return Ok(Outcome::AlreadyTracked);
    }

    let Some(project) = client.lookup_project(ModSource::Modrinth, &info.project_id)? else {
        return Ok(Outcome::Unidentified);
    };
    if manifest.contains(&project.slug) {
        return Ok(Outcome::AlreadyTracked);
    }

    let name = project.name.clone();
    manifest.add(ModRecord {
        mod_name: project.name,
        mod_slug: project.slug,
        mod_id: project.id,
        source: ModSource::Modrinth,
        mod_version_id: info.version_id,
        // the file keeps its on-disk name, which may differ from the
        // catalog's canonical filename for this build
        filename: filename.to_string(),
        download_url: info.download_url,
        current_version: info.game_version,
        update: None,
    })?;
    Ok(Outcome::Imported(name))
}

/// SHA1 of a file, streamed in chunks
fn sha1_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
