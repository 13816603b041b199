pub mod deploy;
pub mod encrypt;
pub mod install_sops;
pub mod plan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use deckhand_core::{config, DeployConfig};
use deckhand_secrets::sops_path_at;

/// Flags that override `deckhand.yaml`.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// sops executable to use instead of the provisioned one.
    #[arg(long)]
    pub sops: Option<PathBuf>,

    /// Remote to fetch from.
    #[arg(long)]
    pub remote: Option<String>,

    /// Branch to reset to.
    #[arg(long)]
    pub branch: Option<String>,
}

impl ConfigArgs {
    /// Load `<fleet_root>/deckhand.yaml` and apply flag overrides.
    pub fn resolve(&self, fleet_root: &Path) -> Result<DeployConfig> {
        let mut config = config::load_at(fleet_root)
            .with_context(|| format!("failed to load config for {}", fleet_root.display()))?;
        if let Some(sops) = &self.sops {
            config.sops = Some(sops.clone());
        }
        if let Some(remote) = &self.remote {
            config.remote = remote.clone();
        }
        if let Some(branch) = &self.branch {
            config.branch = branch.clone();
        }
        Ok(config)
    }
}

/// Explicit sops path if configured, else the provisioned binary location.
pub fn sops_binary(fleet_root: &Path, config: &DeployConfig) -> Result<PathBuf> {
    match &config.sops {
        Some(path) => Ok(path.clone()),
        None => match sops_path_at(&config.tools_dir_at(fleet_root), &config.sops_version) {
            Ok(path) => Ok(path),
            Err(err) => {
                tracing::warn!(error = %err, "falling back to `sops` from PATH");
                Ok(PathBuf::from("sops"))
            }
        },
    }
}
