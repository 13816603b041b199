//! Deckhand core library: domain types, change classification, config,
//! and the blocking command runner every external collaborator goes through.
//!
//! Public API surface:
//! - [`types`]: revision ids, application dirs, verdicts, run context
//! - [`classify`]: the pure change classifier
//! - [`config`]: `deckhand.yaml` loading
//! - [`exec`]: [`CommandRunner`] and its process-backed implementation
//! - [`error`]: [`ConfigError`], [`ExecError`]

pub mod classify;
pub mod config;
pub mod error;
pub mod exec;
pub mod types;

pub use classify::classify;
pub use config::DeployConfig;
pub use error::{ConfigError, ExecError};
pub use exec::{resolve_program, CommandRunner, CommandSpec, SystemRunner};
pub use types::{
    AppDir, BuildVerdict, ReconcileAction, RevisionId, RevisionPair, RunContext, COMPOSE_FILE,
    DECRYPTED_ENV, ENCRYPTED_ENV,
};
