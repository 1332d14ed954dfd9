//! Error taxonomy for mod management operations
//!
//! "No build for this version" and "no such record" are modeled as `Option`
//! at the call sites that expect them; this enum covers the outcomes that
//! abort an operation. Batch loops (check/update) catch per-record errors
//! and keep going, so only precondition failures stop a whole run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("'{0}' is not a valid Minecraft version")]
    InvalidVersion(String),

    #[error("server version not set; run `mcmodman set-version <version>` first")]
    ServerVersionUnset,

    #[error("CurseForge API key not set; run `mcmodman set-api-key <key>` first")]
    ApiKeyUnset,

    #[error("'{0}' is not a valid mod source (expected 'modrinth' or 'curseforge')")]
    InvalidSource(String),

    #[error("{catalog} request failed: {reason}")]
    CatalogUnreachable {
        catalog: &'static str,
        reason: String,
    },

    #[error("download failed: {reason}")]
    DownloadFailed { reason: String },

    #[error("'{identifier}' not found. Make sure the slug/ID is correct")]
    ProjectNotFound { identifier: String },

    #[error("no {name} build available for Minecraft {version}")]
    NoCompatibleBuild { name: String, version: String },

    #[error("'{0}' is already installed")]
    AlreadyInstalled(String),

    #[error("no installed mod matches '{0}'")]
    ModNotInstalled(String),

    #[error("there are no pending updates; run `mcmodman check <version>` first")]
    NoPendingUpdates,

    #[error("update cancelled")]
    UpdateDeclined,

    #[error("manifest {} is corrupt: {reason}", .path.display())]
    ManifestCorrupt { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
