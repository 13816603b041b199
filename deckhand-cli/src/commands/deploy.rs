//! `deckhand deploy`: one full fleet run.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use deckhand_core::{CommandRunner, SystemRunner};
use deckhand_deploy::{DockerCompose, FleetDriver, GitCli};
use deckhand_secrets::Sops;

use super::{sops_binary, ConfigArgs};

/// Arguments for `deckhand deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Directory holding one subdirectory per application; also the
    /// repository checkout.
    pub fleet_root: PathBuf,

    /// Container engine binary (defaults to `docker` from config or PATH).
    pub engine: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl DeployArgs {
    pub fn run(self) -> Result<()> {
        let mut config = self.config.resolve(&self.fleet_root)?;
        if let Some(engine) = self.engine {
            config.docker = engine;
        }

        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
        let git = GitCli::from_config(&self.fleet_root, &config, runner.clone());
        let docker = DockerCompose::new(&config.docker, runner.clone());
        let sops = Sops::new(sops_binary(&self.fleet_root, &config)?, runner);

        FleetDriver::new(&git, &docker, &sops)
            .run(&self.fleet_root)
            .with_context(|| format!("deployment of {} aborted", self.fleet_root.display()))?;
        Ok(())
    }
}
