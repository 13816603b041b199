//! Container-engine collaborator.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use deckhand_core::{resolve_program, AppDir, CommandRunner, CommandSpec, ExecError};

/// The container operations the reconciler and fleet driver need. Project
/// operations run with the application directory as working directory.
pub trait ContainerEngine {
    /// Bring the project up detached, removing orphans, optionally
    /// rebuilding images first.
    fn up(&self, app: &AppDir, build: bool) -> Result<(), ExecError>;

    fn restart(&self, app: &AppDir) -> Result<(), ExecError>;

    /// Ids of the project's running containers.
    fn running_containers(&self, app: &AppDir) -> Result<Vec<String>, ExecError>;

    /// Remove all unused images system-wide.
    fn prune(&self, fleet_root: &Path) -> Result<(), ExecError>;
}

/// [`ContainerEngine`] implemented with `docker compose`.
#[derive(Clone)]
pub struct DockerCompose {
    binary: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl DockerCompose {
    pub fn new(binary: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary: resolve_program(binary),
            runner,
        }
    }

    fn compose(&self, app: &AppDir) -> CommandSpec {
        CommandSpec::new(&self.binary, app.path()).arg("compose")
    }
}

impl ContainerEngine for DockerCompose {
    fn up(&self, app: &AppDir, build: bool) -> Result<(), ExecError> {
        let mut spec = self.compose(app).args(["up", "-d"]);
        if build {
            spec = spec.arg("--build");
        }
        self.runner.run(&spec.arg("--remove-orphans"))
    }

    fn restart(&self, app: &AppDir) -> Result<(), ExecError> {
        self.runner.run(&self.compose(app).arg("restart"))
    }

    fn running_containers(&self, app: &AppDir) -> Result<Vec<String>, ExecError> {
        let out = self.runner.capture(&self.compose(app).args(["ps", "-q"]))?;
        Ok(out
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }

    fn prune(&self, fleet_root: &Path) -> Result<(), ExecError> {
        let spec = CommandSpec::new(&self.binary, fleet_root).args(["system", "prune", "-af"]);
        self.runner.run(&spec)
    }
}
