//! Catalog clients for the Modrinth and CurseForge APIs
//!
//! Both remote catalogs are normalized at this boundary into the shared
//! [`ResolvedArtifact`] / [`ProjectInfo`] shapes; nothing downstream ever
//! branches on source-specific JSON field names.
//!
//! "No build for this version" and "no such project" are ordinary outcomes
//! (`Ok(None)`), not errors. Transport failures and non-success statuses
//! other than 404 map to [`Error::CatalogUnreachable`].

mod curseforge;
mod modrinth;

use crate::error::{Error, Result};
use crate::manifest::ModSource;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Production API endpoints
pub const MODRINTH_API_BASE: &str = "https://api.modrinth.com/v2";
pub const CURSEFORGE_API_BASE: &str = "https://api.curseforge.com";

/// Default HTTP timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Builds are filtered to the Fabric loader on both catalogs
pub const LOADER: &str = "fabric";

/// The latest downloadable build of a mod for one Minecraft version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub version_id: String,
    pub filename: String,
    pub download_url: String,
    /// Minecraft version the build targets
    pub game_version: String,
}

/// Display metadata and the canonical id/slug pair for a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub id: String,
    pub slug: String,
}

/// A build identified from a file hash (Modrinth `version_file` endpoint)
#[derive(Debug, Clone)]
pub struct VersionFileInfo {
    pub project_id: String,
    pub version_id: String,
    pub download_url: String,
    pub game_version: String,
}

/// Read-only client over both catalogs.
///
/// Base URLs are constructor parameters so tests can point the client at a
/// mock server; the CurseForge key is explicit configuration, not ambient
/// process state.
pub struct CatalogClient {
    modrinth_base: String,
    curseforge_base: String,
    curseforge_api_key: Option<String>,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(curseforge_api_key: Option<String>) -> Self {
        Self::with_bases(MODRINTH_API_BASE, CURSEFORGE_API_BASE, curseforge_api_key)
    }

    /// Client against explicit base URLs (used by tests)
    pub fn with_bases(
        modrinth_base: impl Into<String>,
        curseforge_base: impl Into<String>,
        curseforge_api_key: Option<String>,
    ) -> Self {
        Self {
            modrinth_base: modrinth_base.into(),
            curseforge_base: curseforge_base.into(),
            curseforge_api_key,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Latest build of `identifier` for `game_version`, Fabric loader only.
    /// Trusts catalog ordering: always the first element of the returned
    /// version list, no independent recency comparison.
    pub fn resolve_latest(
        &self,
        source: ModSource,
        identifier: &str,
        game_version: &str,
    ) -> Result<Option<ResolvedArtifact>> {
        match source {
            ModSource::Modrinth => modrinth::resolve_latest(self, identifier, game_version),
            ModSource::Curseforge => curseforge::resolve_latest(self, identifier, game_version),
        }
    }

    /// Display name and canonical id/slug pair for a project
    pub fn lookup_project(
        &self,
        source: ModSource,
        identifier: &str,
    ) -> Result<Option<ProjectInfo>> {
        match source {
            ModSource::Modrinth => modrinth::lookup_project(self, identifier),
            ModSource::Curseforge => curseforge::lookup_project(self, identifier),
        }
    }

    /// Whether `version` appears in the catalog's known-release list
    pub fn version_exists(&self, version: &str) -> Result<bool> {
        modrinth::version_exists(self, version)
    }

    /// Validate a version string, aborting with `InvalidVersion` otherwise
    pub fn ensure_version(&self, version: &str) -> Result<()> {
        if self.version_exists(version)? {
            Ok(())
        } else {
            Err(Error::InvalidVersion(version.to_string()))
        }
    }

    /// Identify a downloaded file by its SHA1 hash (Modrinth only)
    pub fn lookup_version_file(&self, sha1: &str) -> Result<Option<VersionFileInfo>> {
        modrinth::lookup_version_file(self, sha1)
    }

    pub(crate) fn modrinth_base(&self) -> &str {
        &self.modrinth_base
    }

    pub(crate) fn curseforge_base(&self) -> &str {
        &self.curseforge_base
    }

    pub(crate) fn curseforge_api_key(&self) -> Result<&str> {
        self.curseforge_api_key.as_deref().ok_or(Error::ApiKeyUnset)
    }

    pub(crate) fn request(&self, url: &str) -> ureq::Request {
        ureq::get(url).timeout(self.timeout)
    }
}

/// Issue a request, mapping 404 to `None` and everything else non-success
/// to `CatalogUnreachable`.
pub(crate) fn send(
    catalog: &'static str,
    request: ureq::Request,
) -> Result<Option<ureq::Response>> {
    match request.call() {
        Ok(response) => Ok(Some(response)),
        Err(ureq::Error::Status(404, _)) => Ok(None),
        Err(ureq::Error::Status(code, _)) => Err(Error::CatalogUnreachable {
            catalog,
            reason: format!("HTTP {}", code),
        }),
        Err(err) => Err(Error::CatalogUnreachable {
            catalog,
            reason: err.to_string(),
        }),
    }
}

/// Deserialize a response body, treating malformed JSON as an unreachable
/// (misbehaving) catalog rather than corrupt local state.
pub(crate) fn parse<T: DeserializeOwned>(
    catalog: &'static str,
    response: ureq::Response,
) -> Result<T> {
    response.into_json().map_err(|err| Error::CatalogUnreachable {
        catalog,
        reason: format!("invalid response: {}", err),
    })
}
