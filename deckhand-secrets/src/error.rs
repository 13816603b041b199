//! Error types for deckhand-secrets.

use std::path::PathBuf;

use thiserror::Error;

use deckhand_core::ExecError;

/// All errors that can arise from secret-bundle operations.
#[derive(Debug, Error)]
pub enum SecretsError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (checksum store).
    #[error("checksum store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// sops ran and failed, or could not be started.
    #[error("sops error: {0}")]
    Exec(#[from] ExecError),

    #[error("sops executable not found at {path}; run `deckhand install-sops` first")]
    SopsMissing { path: PathBuf },

    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("no sops release for platform {os}/{arch}")]
    UnsupportedPlatform {
        os: &'static str,
        arch: &'static str,
    },

    #[error("application directory not found: {path}")]
    AppNotFound { path: PathBuf },

    #[error("no .env file found in {path}")]
    MissingEnv { path: PathBuf },
}

/// Convenience constructor for [`SecretsError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SecretsError {
    SecretsError::Io {
        path: path.into(),
        source,
    }
}
