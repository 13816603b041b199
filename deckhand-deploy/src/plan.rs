//! Read-only plan: what a deploy between two revisions would do.
//!
//! No fetch, reset, container or decryption command is issued.

use std::path::Path;

use serde::Serialize;

use deckhand_core::{classify, BuildVerdict, RevisionPair};

use crate::error::DeployError;
use crate::fleet::discover;
use crate::git::Vcs;
use crate::revision::RevisionTracker;
use crate::secrets::{self, SecretAction};

/// Container action implied by a verdict, before the running state is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannedAction {
    Skip,
    Rebuild,
    RestartOrCreate,
}

impl std::fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Skip => "skip",
            Self::Rebuild => "rebuild",
            Self::RestartOrCreate => "restart-or-create",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppPlan {
    pub app: String,
    pub changed: Vec<String>,
    pub verdict: Option<BuildVerdict>,
    pub action: PlannedAction,
    pub secrets: SecretAction,
}

/// Plan every application under `fleet_root` for `revisions`.
pub fn plan(
    vcs: &dyn Vcs,
    fleet_root: &Path,
    revisions: &RevisionPair,
) -> Result<Vec<AppPlan>, DeployError> {
    let fleet_root = std::fs::canonicalize(fleet_root).map_err(|source| DeployError::FleetRoot {
        path: fleet_root.to_path_buf(),
        source,
    })?;
    let tracker = RevisionTracker::new(vcs);

    let plans = discover(&fleet_root)?
        .into_iter()
        .map(|app| {
            let changed = tracker.changed_paths(revisions, &app);
            if changed.is_empty() {
                return AppPlan {
                    app: app.name(),
                    changed,
                    verdict: None,
                    action: PlannedAction::Skip,
                    secrets: SecretAction::None,
                };
            }
            let verdict = classify(&changed);
            let action = match verdict {
                BuildVerdict::BuildRequired => PlannedAction::Rebuild,
                BuildVerdict::RuntimeOnly => PlannedAction::RestartOrCreate,
            };
            AppPlan {
                app: app.name(),
                secrets: secrets::decide(&app, &changed),
                changed,
                verdict: Some(verdict),
                action,
            }
        })
        .collect();
    Ok(plans)
}
