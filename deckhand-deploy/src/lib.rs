//! # deckhand-deploy
//!
//! The change-classification and reconciliation engine.
//!
//! [`FleetDriver::run`] updates the checkout, discovers application
//! directories, and for each one diffs, classifies, syncs secrets and
//! reconciles containers before a final global cleanup. [`plan::plan`] runs
//! the same diff and classification without touching anything.
//!
//! External systems sit behind [`Vcs`], [`ContainerEngine`] and
//! [`deckhand_secrets::Decryptor`]; [`GitCli`] and [`DockerCompose`] are the
//! command-line implementations.

pub mod docker;
pub mod error;
pub mod fleet;
pub mod git;
pub mod plan;
pub mod reconcile;
pub mod revision;
pub mod secrets;

#[cfg(test)]
mod test_support;

pub use docker::{ContainerEngine, DockerCompose};
pub use error::DeployError;
pub use fleet::{discover, AppOutcome, AppReport, AppStage, CleanupOutcome, FleetDriver, FleetReport};
pub use git::{GitCli, Vcs};
pub use plan::{plan, AppPlan, PlannedAction};
pub use reconcile::Reconciler;
pub use revision::RevisionTracker;
pub use secrets::{SecretAction, SecretSynchronizer};
