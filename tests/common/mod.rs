//! Shared fixtures for the wiremock-backed integration tests
//!
//! One MockServer stands in for both catalogs: the client under test is
//! built with `CatalogClient::with_bases` pointing every base URL at it.

#![allow(dead_code)]

use mcmodman::manifest::{ModRecord, ModSource};
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";

/// Working directory with a mods/ subdirectory and a manifest path
pub fn test_env() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let mods_dir = dir.path().join("mods");
    std::fs::create_dir_all(&mods_dir).unwrap();
    let manifest_path = dir.path().join("mcmodman.json");
    (dir, manifest_path, mods_dir)
}

/// An installed Modrinth record whose download URLs point at the mock server
pub fn modrinth_record(
    server_uri: &str,
    slug: &str,
    version_id: &str,
    game_version: &str,
) -> ModRecord {
    let filename = format!("{}-{}.jar", slug, version_id);
    ModRecord {
        mod_name: slug.to_string(),
        mod_slug: slug.to_string(),
        mod_id: format!("id-{}", slug),
        source: ModSource::Modrinth,
        mod_version_id: version_id.to_string(),
        download_url: format!("{}/cdn/{}", server_uri, filename),
        filename,
        current_version: game_version.to_string(),
        update: None,
    }
}

/// Drop a placeholder jar into the mods directory for a record
pub fn write_jar(mods_dir: &Path, filename: &str) {
    std::fs::write(mods_dir.join(filename), b"jar-bytes").unwrap();
}

/// One element of a Modrinth version list
pub fn version_json(server_uri: &str, slug: &str, version_id: &str) -> serde_json::Value {
    let filename = format!("{}-{}.jar", slug, version_id);
    json!({
        "id": version_id,
        "files": [{
            "filename": filename,
            "url": format!("{}/cdn/{}", server_uri, filename),
        }]
    })
}

/// Mount the Modrinth version list for a project and game version
pub async fn mount_versions(
    server: &MockServer,
    slug: &str,
    game_version: &str,
    versions: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(format!("/project/{}/version", slug)))
        .and(query_param(
            "game_versions",
            format!("[\"{}\"]", game_version),
        ))
        .and(query_param("loaders", "[\"fabric\"]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(versions))
        .mount(server)
        .await;
}

/// Mount Modrinth project metadata
pub async fn mount_project(server: &MockServer, slug: &str, id: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/project/{}", slug)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": title,
            "id": id,
            "slug": slug,
        })))
        .mount(server)
        .await;
}

/// Mount the known game version list
pub async fn mount_game_versions(server: &MockServer, versions: &[&str]) {
    let body: Vec<_> = versions.iter().map(|v| json!({ "version": v })).collect();
    Mock::given(method("GET"))
        .and(path("/tag/game_version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve jar bytes from the fake CDN path
pub async fn mount_cdn(server: &MockServer, filename: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/cdn/{}", filename)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new-jar-bytes".to_vec()))
        .mount(server)
        .await;
}
