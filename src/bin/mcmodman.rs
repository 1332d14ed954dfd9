//! mcmodman CLI - Minecraft server mod manager
//!
//! Usage:
//!   mcmodman add <source> <ids>      Install mods by id or slug (comma-separated)
//!   mcmodman check <version>         Stage available updates for a Minecraft version
//!   mcmodman update <version>        Apply staged updates, pruning incompatible mods
//!   mcmodman remove <id|slug>        Remove an installed mod
//!   mcmodman list                    List installed mods and the server version
//!   mcmodman set-version <version>   Set the target Minecraft server version
//!   mcmodman set-api-key <key>       Store the CurseForge API key
//!   mcmodman import                  Register untracked jars from the mods directory

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mcmodman::catalog::CatalogClient;
use mcmodman::manifest::{MANIFEST_FILE, Manifest, ModRecord, ModSource};
use mcmodman::{Error, download, import, migrate, output, reconcile, resolve};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mcmodman")]
#[command(about = "Manage Minecraft server mods from the Modrinth and CurseForge catalogs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server directory holding mcmodman.json and mods/
    #[arg(short, long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Show per-step detail output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install mods from a catalog
    Add {
        /// Catalog to install from: modrinth or curseforge
        source: String,

        /// Mod ids or slugs, comma-separated
        mods: String,
    },

    /// Check for updates against a Minecraft version and stage them
    Check {
        /// Minecraft version to check against
        version: String,
    },

    /// Apply staged updates and move the server to a Minecraft version
    Update {
        /// Minecraft version to move to
        version: String,
    },

    /// Remove an installed mod and its jar
    Remove {
        /// Mod id or slug
        identifier: String,
    },

    /// List installed mods
    List,

    /// Set the stored Minecraft server version
    SetVersion {
        /// Minecraft version, e.g. 1.21
        version: String,
    },

    /// Store the CurseForge API key
    SetApiKey {
        /// API key from the CurseForge developer console
        key: String,
    },

    /// Register untracked jars from the mods directory (Modrinth only)
    Import,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    output::set_verbose(cli.verbose);

    let manifest_path = cli.dir.join(MANIFEST_FILE);
    let mods_dir = cli.dir.join("mods");

    let first_run = !manifest_path.exists();
    let mut manifest = Manifest::load(&manifest_path)?;
    if first_run {
        manifest
            .save(&manifest_path)
            .with_context(|| format!("failed to create {}", manifest_path.display()))?;
        output::info(&format!("created {}", manifest_path.display()));
    }

    match cli.command {
        Commands::Add { source, mods } => {
            let source: ModSource = source.parse()?;
            let server_version = manifest.server_version()?.to_string();
            if source == ModSource::Curseforge {
                require_api_key(&manifest)?;
            }
            let client = CatalogClient::new(manifest.curseforge_api_key.clone());

            for identifier in mods.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if manifest.contains(identifier) {
                    output::skip(&format!("{} is already installed", identifier));
                    continue;
                }
                match add_one(
                    &client,
                    &mut manifest,
                    &manifest_path,
                    &mods_dir,
                    source,
                    identifier,
                    &server_version,
                ) {
                    Ok(name) => output::success(&format!("{} installed", name)),
                    Err(err) => output::warning(&format!("{}: {}", identifier, err)),
                }
            }
        }

        Commands::Check { version } => {
            manifest.server_version()?;
            require_api_key_for_curseforge_mods(&manifest)?;
            let client = CatalogClient::new(manifest.curseforge_api_key.clone());
            client.ensure_version(&version)?;

            let report =
                reconcile::reconcile(&client, &mut manifest, &manifest_path, &version)?;

            output::action("Updates available for:");
            print_names(&report.updated);
            output::action("No updates for:");
            print_names(&report.unchanged);
        }

        Commands::Update { version } => {
            manifest.server_version()?;
            require_api_key_for_curseforge_mods(&manifest)?;
            let client = CatalogClient::new(manifest.curseforge_api_key.clone());

            let mut confirm = prompt_yes_no;
            let report = migrate::migrate(
                &client,
                &mut manifest,
                &manifest_path,
                &mods_dir,
                &version,
                &mut confirm,
            )?;

            for name in &report.removed {
                output::info(&format!("{} removed (no build for {})", name, version));
            }
            for name in &report.updated {
                output::success(&format!("{} has been updated", name));
            }
            for name in &report.failed {
                output::warning(&format!("{} was not updated; run update again", name));
            }
            output::success(&format!("Server version is now {}", version));
        }

        Commands::Remove { identifier } => {
            let removed = manifest.remove_where(|record| record.matches(&identifier));
            if removed.is_empty() {
                return Err(Error::ModNotInstalled(identifier).into());
            }
            for record in &removed {
                download::remove_artifact(&mods_dir, &record.filename)?;
            }
            manifest.save(&manifest_path)?;
            for record in &removed {
                output::success(&format!("Successfully removed {}", record.mod_name));
            }
        }

        Commands::List => {
            match &manifest.server_version {
                Some(version) => output::info(&format!("Server version: {}", version)),
                None => output::info("Server version not set"),
            }
            output::action("Installed mods:");
            if manifest.mods.is_empty() {
                output::info("none");
            }
            for record in &manifest.mods {
                let status = match &record.update {
                    Some(update) => format!(
                        "{} ({}) -> update staged for {}",
                        record.current_version, record.source, update.new_version
                    ),
                    None => format!("{} ({})", record.current_version, record.source),
                };
                output::list_item(&record.mod_name, &status, record.update.is_some());
            }
        }

        Commands::SetVersion { version } => {
            let client = CatalogClient::new(manifest.curseforge_api_key.clone());
            client.ensure_version(&version)?;
            manifest.server_version = Some(version.clone());
            manifest.save(&manifest_path)?;
            output::success(&format!("Server version set to {}", version));
        }

        Commands::SetApiKey { key } => {
            manifest.curseforge_api_key = Some(key);
            manifest.save(&manifest_path)?;
            output::success("CurseForge API key saved");
        }

        Commands::Import => {
            let client = CatalogClient::new(manifest.curseforge_api_key.clone());
            let report =
                import::import_untracked(&client, &mut manifest, &manifest_path, &mods_dir)?;

            for name in &report.imported {
                output::success(&format!("{} has been imported", name));
            }
            for name in &report.already_tracked {
                output::skip(&format!("{} is already tracked", name));
            }
            for name in &report.unidentified {
                output::warning(&format!("could not identify {}", name));
            }
        }
    }

    Ok(())
}

/// Resolve, download, and register one mod
fn add_one(
    client: &CatalogClient,
    manifest: &mut Manifest,
    manifest_path: &Path,
    mods_dir: &Path,
    source: ModSource,
    identifier: &str,
    server_version: &str,
) -> mcmodman::Result<String> {
    let (project, artifact) =
        resolve::resolve_for_install(client, source, identifier, server_version)?;

    // the user may have supplied the slug while the record is stored under
    // the id, or vice versa
    if manifest.contains(&project.id) || manifest.contains(&project.slug) {
        return Err(Error::AlreadyInstalled(project.name));
    }

    download::fetch(&artifact.download_url, mods_dir, &artifact.filename)?;

    let name = project.name.clone();
    manifest.add(ModRecord {
        mod_name: project.name,
        mod_slug: project.slug,
        mod_id: project.id,
        source,
        mod_version_id: artifact.version_id,
        filename: artifact.filename,
        download_url: artifact.download_url,
        current_version: artifact.game_version,
        update: None,
    })?;
    manifest.save(manifest_path)?;
    Ok(name)
}

/// Batch operations touching CurseForge records need the key up front,
/// before any record is processed.
fn require_api_key_for_curseforge_mods(manifest: &Manifest) -> mcmodman::Result<()> {
    if manifest
        .mods
        .iter()
        .any(|record| record.source == ModSource::Curseforge)
    {
        require_api_key(manifest)?;
    }
    Ok(())
}

fn require_api_key(manifest: &Manifest) -> mcmodman::Result<()> {
    if manifest.curseforge_api_key.is_none() {
        return Err(Error::ApiKeyUnset);
    }
    Ok(())
}

fn print_names(names: &[String]) {
    if names.is_empty() {
        output::info("none");
    }
    for name in names {
        println!("  {}", name);
    }
}

/// Stdin confirmation for the destructive-pruning branch of update
fn prompt_yes_no(prompt: &str) -> bool {
    print!("{} (yes/no): ", prompt);
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("yes")
}
