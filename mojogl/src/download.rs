////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Fetches `gl.xml` from the Khronos OpenGL-Registry.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;

pub const GL_XML_URL: &str = "https://raw.githubusercontent.com/KhronosGroup/OpenGL-Registry/main/xml/gl.xml";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to download {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to save {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Downloads the registry to `dest`.
///
/// An existing file is left alone unless `force` is set. Returns whether a download happened.
pub fn fetch_registry(dest: &Path, force: bool) -> Result<bool, DownloadError> {
    if dest.exists() && !force {
        info!("{} already exists, use --force to download it again", dest.display());
        return Ok(false);
    }

    info!("downloading {}", GL_XML_URL);
    let body = fetch(GL_XML_URL).map_err(|source| DownloadError::Request {
        url: GL_XML_URL.to_owned(),
        source,
    })?;

    save(dest, &body).map_err(|source| DownloadError::Write {
        path: dest.to_owned(),
        source,
    })?;
    info!("saved {} bytes to {}", body.len(), dest.display());

    Ok(true)
}

fn fetch(url: &str) -> reqwest::Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("mojogl/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    Ok(bytes.to_vec())
}

/// Writes `<dest>.part`, then renames it over `dest`.
fn save(dest: &Path, body: &[u8]) -> io::Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = dest.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, body)?;
    fs::rename(&tmp, dest)
}
