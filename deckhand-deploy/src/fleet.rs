//! Fleet driver: one deployment run over every application directory.
//!
//! ```text
//! UPDATE -> DISCOVER -> for each app {
//!     DIFF -> (SKIP if empty) -> CLASSIFY -> SYNC_SECRETS -> RECONCILE
//! } -> CLEANUP
//! ```
//!
//! Only UPDATE and DISCOVER failures abort the run. Per-application failures
//! are logged and recorded in the [`FleetReport`]; CLEANUP always runs once
//! and its failure is a warning.

use std::path::Path;

use serde::Serialize;

use deckhand_core::{
    classify, AppDir, BuildVerdict, ReconcileAction, RunContext,
};
use deckhand_secrets::Decryptor;

use crate::docker::ContainerEngine;
use crate::error::DeployError;
use crate::git::Vcs;
use crate::reconcile::Reconciler;
use crate::revision::RevisionTracker;
use crate::secrets::{SecretAction, SecretSynchronizer};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Per-application stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStage {
    SyncSecrets,
    Reconcile,
}

impl std::fmt::Display for AppStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SyncSecrets => f.write_str("secret sync"),
            Self::Reconcile => f.write_str("reconcile"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AppOutcome {
    /// Empty change set; no engine commands issued.
    Skipped,
    Reconciled {
        verdict: BuildVerdict,
        secrets: SecretAction,
        action: ReconcileAction,
    },
    Failed { stage: AppStage, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppReport {
    pub app: AppDir,
    pub changed: Vec<String>,
    pub outcome: AppOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "error", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Done,
    Failed(String),
}

/// Everything a completed (non-fatal) run did.
#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub context: RunContext,
    pub apps: Vec<AppReport>,
    pub cleanup: CleanupOutcome,
}

impl FleetReport {
    pub fn processed(&self) -> usize {
        self.count(|o| matches!(o, AppOutcome::Reconciled { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, AppOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, AppOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&AppOutcome) -> bool) -> usize {
        self.apps.iter().filter(|a| pred(&a.outcome)).count()
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Immediate subdirectories of `fleet_root` that directly contain
/// [`deckhand_core::COMPOSE_FILE`], sorted by path. Nothing deeper is inspected.
pub fn discover(fleet_root: &Path) -> Result<Vec<AppDir>, DeployError> {
    let fleet_root_err = |source| DeployError::FleetRoot {
        path: fleet_root.to_path_buf(),
        source,
    };
    let mut apps: Vec<AppDir> = std::fs::read_dir(fleet_root)
        .map_err(fleet_root_err)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .map(AppDir::new)
        .filter(|app| app.compose_file().is_file())
        .collect();
    apps.sort();
    Ok(apps)
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Sequential, single-threaded fleet run over explicit collaborators.
pub struct FleetDriver<'a> {
    vcs: &'a dyn Vcs,
    engine: &'a dyn ContainerEngine,
    decryptor: &'a dyn Decryptor,
}

impl<'a> FleetDriver<'a> {
    pub fn new(
        vcs: &'a dyn Vcs,
        engine: &'a dyn ContainerEngine,
        decryptor: &'a dyn Decryptor,
    ) -> Self {
        Self {
            vcs,
            engine,
            decryptor,
        }
    }

    /// Run the full pipeline. `Err` only for fatal failures.
    pub fn run(&self, fleet_root: &Path) -> Result<FleetReport, DeployError> {
        tracing::info!("--- Starting Deployment ---");

        let fleet_root =
            std::fs::canonicalize(fleet_root).map_err(|source| DeployError::FleetRoot {
                path: fleet_root.to_path_buf(),
                source,
            })?;

        let tracker = RevisionTracker::new(self.vcs);
        let revisions = tracker.update()?;
        let ctx = RunContext {
            fleet_root,
            revisions,
        };

        let apps = discover(&ctx.fleet_root)?;
        if apps.is_empty() {
            tracing::info!(">> No compose files found. Nothing to do.");
        }

        let reports = apps
            .into_iter()
            .map(|app| self.process_app(&tracker, &ctx, app))
            .collect();

        let cleanup = self.cleanup(&ctx);
        let report = FleetReport {
            context: ctx,
            apps: reports,
            cleanup,
        };
        tracing::info!(
            "{} processed, {} skipped, {} failed",
            report.processed(),
            report.skipped(),
            report.failed()
        );
        tracing::info!("--- Deployment Complete ---");
        Ok(report)
    }

    fn process_app(&self, tracker: &RevisionTracker<'_>, ctx: &RunContext, app: AppDir) -> AppReport {
        tracing::info!(">> Processing app: {app}");

        let changed = tracker.changed_paths(&ctx.revisions, &app);
        if changed.is_empty() {
            tracing::info!("   [No changes] Skipping {app}");
            return AppReport {
                app,
                changed,
                outcome: AppOutcome::Skipped,
            };
        }

        let verdict = classify(&changed);
        let outcome = match self.apply(&app, &changed, verdict) {
            Ok(outcome) => outcome,
            Err((stage, err)) => {
                tracing::error!(app = %app, error = %err, "ERROR: {stage} failed");
                AppOutcome::Failed {
                    stage,
                    error: err.to_string(),
                }
            }
        };
        AppReport {
            app,
            changed,
            outcome,
        }
    }

    fn apply(
        &self,
        app: &AppDir,
        changed: &[String],
        verdict: BuildVerdict,
    ) -> Result<AppOutcome, (AppStage, DeployError)> {
        let secrets = SecretSynchronizer::new(self.decryptor)
            .sync(app, changed)
            .map_err(|e| (AppStage::SyncSecrets, e))?;
        let action = Reconciler::new(self.engine)
            .reconcile(app, verdict)
            .map_err(|e| (AppStage::Reconcile, e))?;
        Ok(AppOutcome::Reconciled {
            verdict,
            secrets,
            action,
        })
    }

    fn cleanup(&self, ctx: &RunContext) -> CleanupOutcome {
        tracing::info!(">> Pruning system...");
        match self.engine.prune(&ctx.fleet_root) {
            Ok(()) => CleanupOutcome::Done,
            Err(err) => {
                tracing::warn!(error = %err, "WARNING: system prune failed");
                CleanupOutcome::Failed(err.to_string())
            }
        }
    }
}
