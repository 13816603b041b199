//! `deckhand encrypt <app>`: checksum-gated re-encryption of `.env`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use deckhand_core::{AppDir, SystemRunner};
use deckhand_secrets::{encrypt_app, install_sops, EncryptOutcome, Sops};

use super::ConfigArgs;

/// Arguments for `deckhand encrypt`.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Application directory name under the fleet root.
    pub app: String,

    /// Fleet root containing the application.
    #[arg(long, default_value = ".")]
    pub fleet_root: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl EncryptArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve(&self.fleet_root)?;
        let tools_dir = config.tools_dir_at(&self.fleet_root);

        let app = AppDir::new(self.fleet_root.join(&self.app));
        if !app.path().is_dir() {
            anyhow::bail!(
                "directory '{}' not found in {}",
                self.app,
                self.fleet_root.display()
            );
        }

        let binary = match &config.sops {
            Some(path) => path.clone(),
            None => install_sops(&tools_dir, &config.sops_version, &config.sops_download_base)
                .context("failed to provision sops")?,
        };
        let sops = Sops::new(binary, Arc::new(SystemRunner));

        match encrypt_app(&app, &tools_dir, &sops)
            .with_context(|| format!("failed to encrypt secrets for '{}'", self.app))?
        {
            EncryptOutcome::Encrypted { encrypted } => {
                println!("✓ encrypted {}", encrypted.display());
            }
            EncryptOutcome::Unchanged { env } => {
                println!("· {} unchanged, skipped", env.display());
            }
        }
        Ok(())
    }
}
