//! Revision tracking: capture, update, and per-application diffs.

use deckhand_core::{AppDir, RevisionId, RevisionPair};

use crate::error::DeployError;
use crate::git::Vcs;

/// Wraps a [`Vcs`] with the failure policy of a fleet run: update failures
/// are fatal, diff failures collapse to "nothing changed".
pub struct RevisionTracker<'a> {
    vcs: &'a dyn Vcs,
}

impl<'a> RevisionTracker<'a> {
    pub fn new(vcs: &'a dyn Vcs) -> Self {
        Self { vcs }
    }

    pub fn capture_before(&self) -> Result<RevisionId, DeployError> {
        self.capture("rev-parse (before)")
    }

    pub fn capture_after(&self) -> Result<RevisionId, DeployError> {
        self.capture("rev-parse (after)")
    }

    fn capture(&self, step: &'static str) -> Result<RevisionId, DeployError> {
        self.vcs
            .current_revision()
            .map_err(|source| DeployError::Update { step, source })
    }

    /// Fetch and hard-reset to the remote branch, then update nested
    /// checkouts when a manifest exists.
    pub fn update_to_latest(&self) -> Result<(), DeployError> {
        self.vcs
            .fetch()
            .map_err(|source| DeployError::Update {
                step: "fetch",
                source,
            })?;
        self.vcs
            .reset_hard()
            .map_err(|source| DeployError::Update {
                step: "reset",
                source,
            })?;
        if self.vcs.has_submodules() {
            tracing::info!(">> Updating submodules...");
            self.vcs
                .update_submodules()
                .map_err(|source| DeployError::Update {
                    step: "submodule update",
                    source,
                })?;
        }
        Ok(())
    }

    /// Capture, update, capture again.
    pub fn update(&self) -> Result<RevisionPair, DeployError> {
        tracing::info!(">> Updating repository...");
        let previous = self.capture_before()?;
        self.update_to_latest()?;
        let current = self.capture_after()?;
        let revisions = RevisionPair::new(previous, current);
        if revisions.is_unchanged() {
            tracing::info!("   Already at {}", revisions.current);
        } else {
            tracing::info!("   {} -> {}", revisions.previous, revisions.current);
        }
        Ok(revisions)
    }

    /// Paths changed under `app` between the pair. Any failure is logged and
    /// reported as an empty set so the application is skipped.
    pub fn changed_paths(&self, revisions: &RevisionPair, app: &AppDir) -> Vec<String> {
        match self
            .vcs
            .changed_paths(&revisions.previous, &revisions.current, app.path())
        {
            Ok(paths) => paths,
            Err(err) => {
                tracing::warn!(app = %app, error = %err, "diff failed, treating as unchanged");
                Vec::new()
            }
        }
    }
}
