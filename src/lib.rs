//! Minecraft server mod manager
//!
//! Tracks installed server mods from the Modrinth and CurseForge catalogs
//! in a local `mcmodman.json` manifest and keeps them synchronized with a
//! target Minecraft version.
//!
//! The update flow is two-phase: `check <version>` resolves every installed
//! mod against the catalogs and *stages* candidate updates in the manifest
//! without touching any installed file; `update <version>` applies the
//! staged updates, pruning mods that have no build for the new version
//! (with confirmation) so the installed set never mixes Minecraft versions.
//!
//! ```text
//! mcmodman add modrinth sodium,lithium
//! mcmodman check 1.21
//! mcmodman update 1.21
//! ```
//!
//! All operations are blocking and single-process; the manifest is written
//! atomically but not lock-protected.

pub mod catalog;
pub mod download;
pub mod error;
pub mod import;
pub mod manifest;
pub mod migrate;
pub mod output;
pub mod reconcile;
pub mod resolve;

pub use error::{Error, Result};
pub use manifest::{MANIFEST_FILE, Manifest, ModRecord, ModSource, StagedUpdate};
