//! `deckhand.yaml`: optional per-fleet configuration.
//!
//! The file lives at the fleet root. Every key is optional; a missing file
//! yields [`DeployConfig::default`]. Command-line flags override whatever
//! is loaded here before the config is handed to the collaborators.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up at the fleet root.
pub const CONFIG_FILE: &str = "deckhand.yaml";

/// Default directory (relative to the fleet root) for the sops binary and
/// the checksum store.
pub const DEFAULT_TOOLS_DIR: &str = ".deckhand";

pub const DEFAULT_SOPS_VERSION: &str = "v3.11.0";

pub const DEFAULT_SOPS_DOWNLOAD_BASE: &str = "https://github.com/getsops/sops/releases/download";

/// Resolved deployment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// Remote to fetch from.
    pub remote: String,
    /// Branch the checkout is reset to.
    pub branch: String,
    /// Container engine binary; bare names resolve through `PATH`.
    pub docker: PathBuf,
    pub sops_version: String,
    /// Explicit sops executable; when unset the provisioned binary inside
    /// `tools_dir` is used.
    pub sops: Option<PathBuf>,
    /// Relative values resolve against the fleet root.
    pub tools_dir: PathBuf,
    pub sops_download_base: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "main".to_string(),
            docker: PathBuf::from("docker"),
            sops_version: DEFAULT_SOPS_VERSION.to_string(),
            sops: None,
            tools_dir: PathBuf::from(DEFAULT_TOOLS_DIR),
            sops_download_base: DEFAULT_SOPS_DOWNLOAD_BASE.to_string(),
        }
    }
}

impl DeployConfig {
    /// Tools directory as an absolute-or-fleet-relative path.
    pub fn tools_dir_at(&self, fleet_root: &Path) -> PathBuf {
        if self.tools_dir.is_absolute() {
            self.tools_dir.clone()
        } else {
            fleet_root.join(&self.tools_dir)
        }
    }
}

/// `<fleet_root>/deckhand.yaml`: pure, no I/O.
pub fn config_path_at(fleet_root: &Path) -> PathBuf {
    fleet_root.join(CONFIG_FILE)
}

/// Load the fleet config, falling back to defaults when the file is absent.
pub fn load_at(fleet_root: &Path) -> Result<DeployConfig, ConfigError> {
    let path = config_path_at(fleet_root);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(DeployConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    // An empty file deserializes to unit, not a mapping.
    if contents.trim().is_empty() {
        return Ok(DeployConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}
