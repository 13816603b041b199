//! `deckhand install-sops`: provision the pinned sops release.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use deckhand_core::config;
use deckhand_secrets::install_sops;

/// Arguments for `deckhand install-sops`.
#[derive(Args, Debug)]
pub struct InstallSopsArgs {
    /// Fleet root whose `deckhand.yaml` and tools directory to use.
    #[arg(long, default_value = ".")]
    pub fleet_root: PathBuf,

    /// Release to install instead of the configured one.
    #[arg(long)]
    pub sops_version: Option<String>,
}

impl InstallSopsArgs {
    pub fn run(self) -> Result<()> {
        let config = config::load_at(&self.fleet_root)
            .with_context(|| format!("failed to load config for {}", self.fleet_root.display()))?;
        let version = self.sops_version.unwrap_or(config.sops_version.clone());
        let tools_dir = config.tools_dir_at(&self.fleet_root);

        let path = install_sops(&tools_dir, &version, &config.sops_download_base)
            .with_context(|| format!("failed to install sops {version}"))?;
        println!("✓ sops {version} at {}", path.display());
        Ok(())
    }
}
