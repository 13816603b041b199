//! One-time sops provisioning.
//!
//! The executable lives at `<tools_dir>/sops-<version>.<os>.<arch>`. When the
//! requested version is missing, older binaries for the same platform are
//! removed, the release asset is downloaded, and the file is marked
//! executable.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SecretsError};
use crate::platform::{sops_filename, Arch, Platform};

/// Where the sops binary for `version` lives on this host.
pub fn sops_path_at(tools_dir: &Path, version: &str) -> Result<PathBuf, SecretsError> {
    let name = sops_filename(version, Platform::current()?, Arch::current()?);
    Ok(tools_dir.join(name))
}

/// Ensure sops `version` is present in `tools_dir`, downloading it from
/// `<download_base>/<version>/<asset>` when needed. Returns the binary path.
pub fn install_sops(
    tools_dir: &Path,
    version: &str,
    download_base: &str,
) -> Result<PathBuf, SecretsError> {
    install_with(
        tools_dir,
        version,
        download_base,
        Platform::current()?,
        Arch::current()?,
        download,
    )
}

fn install_with<F>(
    tools_dir: &Path,
    version: &str,
    download_base: &str,
    platform: Platform,
    arch: Arch,
    fetch: F,
) -> Result<PathBuf, SecretsError>
where
    F: FnOnce(&str) -> Result<Vec<u8>, SecretsError>,
{
    let name = sops_filename(version, platform, arch);
    let target = tools_dir.join(&name);
    if target.is_file() {
        tracing::debug!(path = %target.display(), "sops already installed");
        return Ok(target);
    }

    std::fs::create_dir_all(tools_dir).map_err(|e| io_err(tools_dir, e))?;
    for stale in remove_stale(tools_dir, &name, platform, arch)? {
        tracing::info!("Removed old version: {}", stale.display());
    }

    let url = format!("{}/{version}/{name}", download_base.trim_end_matches('/'));
    tracing::info!("Downloading {url}...");
    let bytes = fetch(&url)?;

    let tmp = tools_dir.join(format!("{name}.download"));
    std::fs::write(&tmp, &bytes).map_err(|e| io_err(&tmp, e))?;
    set_executable(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, &target) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&target, e));
    }

    tracing::info!("Downloaded {name} successfully");
    Ok(target)
}

/// Delete `sops-*.<os>.<arch>` files other than `keep`.
fn remove_stale(
    tools_dir: &Path,
    keep: &str,
    platform: Platform,
    arch: Arch,
) -> Result<Vec<PathBuf>, SecretsError> {
    let suffix = format!(".{}.{}", platform.as_str(), arch.as_str());
    let mut removed = Vec::new();
    let entries = std::fs::read_dir(tools_dir).map_err(|e| io_err(tools_dir, e))?;
    for entry in entries.filter_map(|e| e.ok()) {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name == keep || !file_name.starts_with("sops-") || !file_name.ends_with(&suffix) {
            continue;
        }
        let path = entry.path();
        std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
        removed.push(path);
    }
    removed.sort();
    Ok(removed)
}

fn download(url: &str) -> Result<Vec<u8>, SecretsError> {
    let download_err = |message: String| SecretsError::Download {
        url: url.to_string(),
        message,
    };
    let response = ureq::get(url).call().map_err(|e| download_err(e.to_string()))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| download_err(e.to_string()))?;
    if bytes.is_empty() {
        return Err(download_err("empty response body".to_string()));
    }
    Ok(bytes)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), SecretsError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), SecretsError> {
    Ok(())
}
