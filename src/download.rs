//! Artifact download into the mods directory
//!
//! Streams the response body to a temp file in the destination directory
//! and renames it into place, so a failed or interrupted download never
//! leaves a half-written jar under the final name.

use crate::error::{Error, Result};
use crate::output;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

/// Downloads use the same bounded timeout as catalog lookups
const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Download `url` into `mods_dir/filename`, creating the directory if
/// absent. Fails with `DownloadFailed` on any transport or status error.
pub fn fetch(url: &str, mods_dir: &Path, filename: &str) -> Result<()> {
    std::fs::create_dir_all(mods_dir)?;
    output::detail(&format!("downloading {}", filename));

    let response = ureq::get(url)
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .call()
        .map_err(|err| Error::DownloadFailed {
            reason: err.to_string(),
        })?;

    let pb = match response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        Some(len) => output::download_progress(len),
        None => output::spinner(&format!("downloading {}", filename)),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(mods_dir)?;
    let mut reader = response.into_reader();
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|err| {
            pb.finish_and_clear();
            Error::DownloadFailed {
                reason: format!("read error: {}", err),
            }
        })?;
        if bytes_read == 0 {
            break;
        }
        tmp.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
        pb.set_position(total_bytes);
    }

    pb.finish_and_clear();
    tmp.persist(mods_dir.join(filename)).map_err(|err| err.error)?;
    output::detail(&format!("downloaded {} ({} bytes)", filename, total_bytes));
    Ok(())
}

/// Delete a previously downloaded artifact. An already-missing file is
/// tolerated; the record pointing at it is being replaced or removed anyway.
pub fn remove_artifact(mods_dir: &Path, filename: &str) -> Result<()> {
    match std::fs::remove_file(mods_dir.join(filename)) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
