//! The local manifest of installed mods
//!
//! `mcmodman.json` lives in the working directory and is the single durable
//! record the tool operates on: the target server version, the optional
//! CurseForge API key, and one entry per installed mod. Every mutating
//! command round-trips through [`Manifest::load`] / [`Manifest::save`].
//!
//! ## Format
//!
//! ```json
//! {
//!   "server_version": "1.20.1",
//!   "mods": [
//!     {
//!       "mod_name": "Fabric API",
//!       "mod_slug": "fabric-api",
//!       "mod_id": "P7dR8mSH",
//!       "source": "modrinth",
//!       "mod_version_id": "abc123",
//!       "filename": "fabric-api-0.92.0.jar",
//!       "download_url": "https://cdn.modrinth.com/...",
//!       "current_version": "1.20.1"
//!     }
//!   ]
//! }
//! ```
//!
//! A record may additionally carry an `update` object: a staged replacement
//! computed by `check` but not yet applied by `update`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Manifest filename in the working directory
pub const MANIFEST_FILE: &str = "mcmodman.json";

/// Which remote catalog a mod was installed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModSource {
    Modrinth,
    Curseforge,
}

impl fmt::Display for ModSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modrinth => write!(f, "modrinth"),
            Self::Curseforge => write!(f, "curseforge"),
        }
    }
}

impl FromStr for ModSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "modrinth" => Ok(Self::Modrinth),
            "curseforge" => Ok(Self::Curseforge),
            _ => Err(Error::InvalidSource(s.to_string())),
        }
    }
}

/// A staged replacement artifact, computed but not yet applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedUpdate {
    pub new_version_id: String,
    pub new_filename: String,
    pub new_download_url: String,
    /// Minecraft version the replacement build targets
    pub new_version: String,
}

/// One installed mod artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModRecord {
    pub mod_name: String,
    pub mod_slug: String,
    pub mod_id: String,
    pub source: ModSource,
    /// Catalog-assigned id of the currently downloaded build
    pub mod_version_id: String,
    /// On-disk name under the mods directory
    pub filename: String,
    pub download_url: String,
    /// Minecraft version the installed build targets
    pub current_version: String,
    /// At most one staged update; setting always replaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<StagedUpdate>,
}

impl ModRecord {
    /// Users may supply either the catalog id or the slug
    pub fn matches(&self, identifier: &str) -> bool {
        self.mod_id == identifier || self.mod_slug == identifier
    }

    /// Replace the installed fields with the staged ones and clear staging.
    /// No-op when nothing is staged.
    pub fn apply_staged(&mut self) {
        if let Some(staged) = self.update.take() {
            self.mod_version_id = staged.new_version_id;
            self.filename = staged.new_filename;
            self.download_url = staged.new_download_url;
            self.current_version = staged.new_version;
        }
    }
}

/// The whole persisted document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curseforge_api_key: Option<String>,
    #[serde(default)]
    pub mods: Vec<ModRecord>,
}

impl Manifest {
    /// Load the manifest, returning an empty one if the file does not exist.
    ///
    /// A file that exists but fails to parse is fatal: silently starting
    /// over would orphan every tracked install.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_str(&content).map_err(|err| Error::ManifestCorrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Persist the manifest atomically: write a temp file next to the
    /// destination, then rename over it. A crash mid-save leaves the old
    /// document intact, never a truncated one.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
            None => tempfile::NamedTempFile::new_in(".")?,
        };

        let content = serde_json::to_string_pretty(self).map_err(|err| Error::ManifestCorrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    /// The configured server version, required before any resolution
    pub fn server_version(&self) -> Result<&str> {
        self.server_version
            .as_deref()
            .ok_or(Error::ServerVersionUnset)
    }

    pub fn find(&self, identifier: &str) -> Option<&ModRecord> {
        self.mods.iter().find(|m| m.matches(identifier))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.find(identifier).is_some()
    }

    /// Append a record, enforcing id/slug uniqueness across the collection
    pub fn add(&mut self, record: ModRecord) -> Result<()> {
        if self.contains(&record.mod_id) || self.contains(&record.mod_slug) {
            return Err(Error::AlreadyInstalled(record.mod_name));
        }
        self.mods.push(record);
        Ok(())
    }

    /// Remove every record matching the predicate, returning the removed
    /// records. Rebuilds the collection in one pass rather than deleting by
    /// index from the list being scanned.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<ModRecord>
    where
        F: FnMut(&ModRecord) -> bool,
    {
        let (removed, kept) = std::mem::take(&mut self.mods)
            .into_iter()
            .partition(|record| pred(record));
        self.mods = kept;
        removed
    }

    /// Records currently holding a staged update
    pub fn pending_count(&self) -> usize {
        self.mods.iter().filter(|m| m.update.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(slug: &str, id: &str) -> ModRecord {
        ModRecord {
            mod_name: slug.to_string(),
            mod_slug: slug.to_string(),
            mod_id: id.to_string(),
            source: ModSource::Modrinth,
            mod_version_id: "v1".to_string(),
            filename: format!("{}.jar", slug),
            download_url: format!("https://example.com/{}.jar", slug),
            current_version: "1.20.1".to_string(),
            update: None,
        }
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest::load(&dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(manifest.mods.is_empty());
        assert!(manifest.server_version.is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);

        let mut manifest = Manifest::default();
        manifest.server_version = Some("1.20.1".to_string());
        manifest.add(record("sodium", "AANobbMI")).unwrap();
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded.server_version.as_deref(), Some("1.20.1"));
        assert_eq!(loaded.mods.len(), 1);
        assert_eq!(loaded.mods[0].mod_slug, "sodium");
    }

    #[test]
    fn test_corrupt_manifest_is_fatal_not_reinitialized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "{\"mods\": [tru").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestCorrupt { .. }));
        // the broken file must still be there for the user to inspect
        assert!(path.exists());
    }

    #[test]
    fn test_save_replaces_not_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);

        let mut manifest = Manifest::default();
        manifest.add(record("lithium", "gvQqBUqZ")).unwrap();
        manifest.save(&path).unwrap();
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded.mods.len(), 1);
    }

    #[test]
    fn test_add_rejects_duplicate_id_or_slug() {
        let mut manifest = Manifest::default();
        manifest.add(record("sodium", "AANobbMI")).unwrap();

        // same slug, different id
        let err = manifest.add(record("sodium", "other")).unwrap_err();
        assert!(matches!(err, Error::AlreadyInstalled(_)));

        // same id, different slug
        let err = manifest.add(record("other", "AANobbMI")).unwrap_err();
        assert!(matches!(err, Error::AlreadyInstalled(_)));

        assert_eq!(manifest.mods.len(), 1);
    }

    #[test]
    fn test_find_matches_id_and_slug() {
        let mut manifest = Manifest::default();
        manifest.add(record("sodium", "AANobbMI")).unwrap();

        assert!(manifest.contains("sodium"));
        assert!(manifest.contains("AANobbMI"));
        assert!(!manifest.contains("lithium"));
    }

    #[test]
    fn test_remove_where_rebuilds_collection() {
        let mut manifest = Manifest::default();
        manifest.add(record("a", "1")).unwrap();
        manifest.add(record("b", "2")).unwrap();
        manifest.add(record("c", "3")).unwrap();
        manifest.mods[1].update = Some(StagedUpdate {
            new_version_id: "v2".to_string(),
            new_filename: "b-2.jar".to_string(),
            new_download_url: "https://example.com/b-2.jar".to_string(),
            new_version: "1.21".to_string(),
        });

        let removed = manifest.remove_where(|m| m.update.is_none());
        assert_eq!(removed.len(), 2);
        assert_eq!(manifest.mods.len(), 1);
        assert_eq!(manifest.mods[0].mod_slug, "b");
    }

    #[test]
    fn test_apply_staged_swaps_fields_and_clears() {
        let mut rec = record("sodium", "AANobbMI");
        rec.update = Some(StagedUpdate {
            new_version_id: "v2".to_string(),
            new_filename: "sodium-2.jar".to_string(),
            new_download_url: "https://example.com/sodium-2.jar".to_string(),
            new_version: "1.21".to_string(),
        });

        rec.apply_staged();
        assert_eq!(rec.mod_version_id, "v2");
        assert_eq!(rec.filename, "sodium-2.jar");
        assert_eq!(rec.current_version, "1.21");
        assert!(rec.update.is_none());
    }

    #[test]
    fn test_source_round_trip() {
        assert_eq!("modrinth".parse::<ModSource>().unwrap(), ModSource::Modrinth);
        assert_eq!(
            "CurseForge".parse::<ModSource>().unwrap(),
            ModSource::Curseforge
        );
        assert!("steam".parse::<ModSource>().is_err());

        let json = serde_json::to_string(&ModSource::Curseforge).unwrap();
        assert_eq!(json, "\"curseforge\"");
    }
}
