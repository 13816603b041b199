//! Version-control collaborator.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use deckhand_core::{CommandRunner, CommandSpec, DeployConfig, ExecError, RevisionId};

/// The repository operations the deploy engine needs.
pub trait Vcs {
    /// Identifier of the checked-out revision.
    fn current_revision(&self) -> Result<RevisionId, ExecError>;

    /// Fetch the configured remote branch.
    fn fetch(&self) -> Result<(), ExecError>;

    /// Hard-reset the checkout to the fetched remote branch, discarding local
    /// modifications.
    fn reset_hard(&self) -> Result<(), ExecError>;

    /// Paths under `scope` that differ between `from` and `to`, repository
    /// relative, in diff order.
    fn changed_paths(
        &self,
        from: &RevisionId,
        to: &RevisionId,
        scope: &Path,
    ) -> Result<Vec<String>, ExecError>;

    /// `true` when a nested-checkout manifest sits at the repository root.
    fn has_submodules(&self) -> bool;

    /// Initialise and update nested checkouts recursively.
    fn update_submodules(&self) -> Result<(), ExecError>;
}

/// [`Vcs`] implemented with the `git` command line, run from the repository
/// root.
#[derive(Clone)]
pub struct GitCli {
    repo: PathBuf,
    remote: String,
    branch: String,
    runner: Arc<dyn CommandRunner>,
}

impl GitCli {
    pub fn new(
        repo: impl Into<PathBuf>,
        remote: impl Into<String>,
        branch: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            repo: repo.into(),
            remote: remote.into(),
            branch: branch.into(),
            runner,
        }
    }

    pub fn from_config(
        repo: impl Into<PathBuf>,
        config: &DeployConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self::new(repo, config.remote.clone(), config.branch.clone(), runner)
    }

    /// `<remote>/<branch>`, the ref a hard reset targets.
    pub fn remote_ref(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    fn git(&self) -> CommandSpec {
        CommandSpec::new("git", &self.repo)
    }
}

impl Vcs for GitCli {
    fn current_revision(&self) -> Result<RevisionId, ExecError> {
        let out = self.runner.capture(&self.git().args(["rev-parse", "HEAD"]))?;
        Ok(RevisionId::from(out))
    }

    fn fetch(&self) -> Result<(), ExecError> {
        let spec = self
            .git()
            .arg("fetch")
            .arg(&self.remote)
            .arg(&self.branch);
        self.runner.run(&spec)
    }

    fn reset_hard(&self) -> Result<(), ExecError> {
        self.runner
            .run(&self.git().args(["reset", "--hard"]).arg(self.remote_ref()))
    }

    fn changed_paths(
        &self,
        from: &RevisionId,
        to: &RevisionId,
        scope: &Path,
    ) -> Result<Vec<String>, ExecError> {
        // Unquoted output keeps non-ASCII names usable for segment matching.
        let spec = self
            .git()
            .args(["-c", "core.quotePath=false", "diff", "--name-only"])
            .arg(&from.0)
            .arg(&to.0)
            .arg("--")
            .arg(scope);
        let out = self.runner.capture(&spec)?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn has_submodules(&self) -> bool {
        self.repo.join(".gitmodules").is_file()
    }

    fn update_submodules(&self) -> Result<(), ExecError> {
        self.runner
            .run(&self.git().args(["submodule", "update", "--init", "--recursive"]))
    }
}
