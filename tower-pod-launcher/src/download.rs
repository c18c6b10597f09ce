//! Interpreter acquisition
//!
//! The binary for a version/variant is downloaded once into the cache
//! directory and reused from there on every later run.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tempfile::NamedTempFile;
use tower_pod_utils::paths::ensure_dir;
use tower_pod_utils::{PodError, Result};
use tracing::{debug, info, warn};

use crate::platform::Platform;

/// Name of the interpreter inside the release archive
const BINARY_NAME: &str = "bb";

/// Tries per download, counting the first
const FETCH_ATTEMPTS: u32 = 2;

/// Where the binary for `version` is cached
pub fn binary_path(cache_dir: &Path, platform: &Platform, version: &str) -> PathBuf {
    cache_dir.join(format!("bb-{}-{}", platform.variant, version))
}

/// Release archive URL
pub fn archive_url(platform: &Platform, version: &str) -> String {
    format!(
        "https://github.com/babashka/babashka/releases/download/v{version}/babashka-{version}-{variant}{suffix}.tar.gz",
        version = version,
        variant = platform.variant,
        suffix = platform.suffix,
    )
}

/// Path to a cached executable, downloading it first if needed
pub async fn ensure_binary(cache_dir: &Path, platform: &Platform, version: &str) -> Result<PathBuf> {
    let binary = binary_path(cache_dir, platform, version);
    if binary.exists() {
        debug!(path = %binary.display(), "Using cached interpreter");
        return Ok(binary);
    }

    ensure_dir(cache_dir)?;
    let url = archive_url(platform, version);
    info!(%url, version, "Downloading interpreter");

    let tarball = tarball_path(&binary);
    let mut attempt = 1;
    loop {
        match fetch(&url, &tarball).await {
            Ok(()) => break,
            Err(e) if e.is_retryable() && attempt < FETCH_ATTEMPTS => {
                warn!(attempt, error = %e, "Download failed, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
    let extracted = extract_binary(&tarball, &binary);
    std::fs::remove_file(&tarball).map_err(|e| PodError::FileWrite {
        path: tarball.clone(),
        source: e,
    })?;
    extracted?;

    info!(path = %binary.display(), "Interpreter cached");
    Ok(binary)
}

/// `<binary>.tar.gz`
fn tarball_path(binary: &Path) -> PathBuf {
    let mut name = binary.as_os_str().to_owned();
    name.push(".tar.gz");
    PathBuf::from(name)
}

async fn fetch(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| PodError::download(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(PodError::download(format!("{} returned {}", url, status)));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PodError::download(e.to_string()))?;
    std::fs::write(dest, &bytes).map_err(|e| PodError::FileWrite {
        path: dest.to_path_buf(),
        source: e,
    })
}

/// Install the `bb` member of a gzipped tarball at `dest`
///
/// The member is unpacked into a temporary file beside `dest` and renamed
/// into place only once it is complete and executable, so a failed
/// extraction leaves nothing at `dest`.
pub fn extract_binary(tarball: &Path, dest: &Path) -> Result<()> {
    let file = File::open(tarball).map_err(|e| PodError::FileRead {
        path: tarball.to_path_buf(),
        source: e,
    })?;
    let mut archive = Archive::new(GzDecoder::new(file));

    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.path()?.as_os_str() != BINARY_NAME {
            continue;
        }

        let dir = dest
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir).map_err(|e| PodError::FileWrite {
            path: dir.to_path_buf(),
            source: e,
        })?;
        io::copy(&mut entry, staged.as_file_mut())?;
        make_executable(staged.path())?;

        staged.persist(dest).map_err(|e| PodError::FileWrite {
            path: dest.to_path_buf(),
            source: e.error,
        })?;
        return Ok(());
    }

    Err(PodError::download(format!(
        "archive {} has no '{}' member",
        tarball.display(),
        BINARY_NAME
    )))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::tempdir;

    const LINUX: Platform = Platform {
        variant: "linux-amd64",
        suffix: "-static",
    };

    fn write_tarball(path: &Path, members: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_binary_path() {
        assert_eq!(
            binary_path(Path::new("/cache"), &LINUX, "1.3.190"),
            PathBuf::from("/cache/bb-linux-amd64-1.3.190")
        );
    }

    #[test]
    fn test_tarball_path_keeps_version() {
        let binary = binary_path(Path::new("/cache"), &LINUX, "1.3.190");
        assert_eq!(
            tarball_path(&binary),
            PathBuf::from("/cache/bb-linux-amd64-1.3.190.tar.gz")
        );
    }

    #[test]
    fn test_archive_url() {
        assert_eq!(
            archive_url(&LINUX, "1.3.190"),
            "https://github.com/babashka/babashka/releases/download/v1.3.190/babashka-1.3.190-linux-amd64-static.tar.gz"
        );

        let mac = Platform::from_parts("darwin", "arm64").unwrap();
        assert!(archive_url(&mac, "1.0.0").ends_with("babashka-1.0.0-macos-aarch64.tar.gz"));
    }

    #[test]
    fn test_extract_binary() {
        let dir = tempdir().unwrap();
        let tarball = dir.path().join("bb.tar.gz");
        write_tarball(&tarball, &[("README", b"docs"), ("bb", b"#!/bin/sh\necho bb\n")]);

        let dest = dir.path().join("bb-out");
        extract_binary(&tarball, &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"#!/bin/sh\necho bb\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_truncated_archive_leaves_no_binary() {
        let dir = tempdir().unwrap();
        let tarball = dir.path().join("bb.tar.gz");
        let payload: Vec<u8> = (0..200_000u32).map(|i| (i * 7919 % 251) as u8).collect();
        write_tarball(&tarball, &[("bb", payload.as_slice())]);

        let full = std::fs::read(&tarball).unwrap();
        std::fs::write(&tarball, &full[..full.len() / 2]).unwrap();

        let dest = binary_path(dir.path(), &LINUX, "1.3.190");
        assert!(extract_binary(&tarball, &dest).is_err());

        // Nothing for a later run to mistake for a cached interpreter
        assert!(!dest.exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path != &tarball)
            .collect();
        assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
    }

    #[test]
    fn test_extract_missing_member() {
        let dir = tempdir().unwrap();
        let tarball = dir.path().join("bb.tar.gz");
        write_tarball(&tarball, &[("README", b"docs")]);

        let err = extract_binary(&tarball, &dir.path().join("bb-out")).unwrap_err();
        assert!(matches!(err, PodError::Download(_)));
    }

    #[tokio::test]
    async fn test_cached_binary_is_reused() {
        let dir = tempdir().unwrap();
        let cached = binary_path(dir.path(), &LINUX, "9.9.9");
        std::fs::write(&cached, b"cached").unwrap();

        // No network access happens when the binary is already present
        let path = ensure_binary(dir.path(), &LINUX, "9.9.9").await.unwrap();
        assert_eq!(path, cached);
    }
}
