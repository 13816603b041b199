//! Error types for deckhand-deploy.

use std::path::PathBuf;

use thiserror::Error;

use deckhand_core::ExecError;
use deckhand_secrets::SecretsError;

/// Errors surfaced by the deploy engine.
///
/// `Update` and `FleetRoot` abort a run. Everything else is scoped to one
/// application and ends up in that application's report entry.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Repository update failed; the checkout is not safe to deploy from.
    #[error("repository update failed at `{step}`: {source}")]
    Update {
        step: &'static str,
        #[source]
        source: ExecError,
    },

    /// The fleet root could not be resolved or listed.
    #[error("cannot read fleet root {path}: {source}")]
    FleetRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A container engine action failed.
    #[error("container engine `{operation}` failed: {source}")]
    Engine {
        operation: &'static str,
        #[source]
        source: ExecError,
    },

    #[error(transparent)]
    Secrets(#[from] SecretsError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`DeployError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DeployError {
    DeployError::Io {
        path: path.into(),
        source,
    }
}
