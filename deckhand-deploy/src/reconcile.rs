//! Drive one application's containers to the running state.
//!
//! | verdict | running? | action |
//! |---|---|---|
//! | build required | any | `up --build` |
//! | runtime only | yes | `restart` |
//! | runtime only | no / query failed | `up` |

use deckhand_core::{AppDir, BuildVerdict, ReconcileAction};

use crate::docker::ContainerEngine;
use crate::error::DeployError;

pub struct Reconciler<'a> {
    engine: &'a dyn ContainerEngine,
}

impl<'a> Reconciler<'a> {
    pub fn new(engine: &'a dyn ContainerEngine) -> Self {
        Self { engine }
    }

    /// Issue exactly one engine action for `app` and report which.
    pub fn reconcile(
        &self,
        app: &AppDir,
        verdict: BuildVerdict,
    ) -> Result<ReconcileAction, DeployError> {
        if verdict.build_required() {
            tracing::info!("   [Build-relevant changes] Rebuilding and deploying {app}...");
            self.engine
                .up(app, true)
                .map_err(|source| DeployError::Engine {
                    operation: "up --build",
                    source,
                })?;
            return Ok(ReconcileAction::Rebuild);
        }

        tracing::info!("   [Runtime-only changes] Checking {app}...");
        if self.is_running(app) {
            tracing::info!("   Restarting...");
            self.engine
                .restart(app)
                .map_err(|source| DeployError::Engine {
                    operation: "restart",
                    source,
                })?;
            Ok(ReconcileAction::Restart)
        } else {
            tracing::info!("   Creating (up)...");
            self.engine
                .up(app, false)
                .map_err(|source| DeployError::Engine {
                    operation: "up",
                    source,
                })?;
            Ok(ReconcileAction::Create)
        }
    }

    /// A failed query counts as "nothing running".
    fn is_running(&self, app: &AppDir) -> bool {
        match self.engine.running_containers(app) {
            Ok(ids) => !ids.is_empty(),
            Err(err) => {
                tracing::warn!(app = %app, error = %err, "container query failed, assuming none running");
                false
            }
        }
    }
}
