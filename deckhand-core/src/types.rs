//! Domain types shared by every deckhand crate.
//!
//! All path fields use `PathBuf`; revision identifiers are opaque strings
//! handed back by the version-control collaborator.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Marker file identifying an application directory.
pub const COMPOSE_FILE: &str = "compose.yaml";

/// Encrypted secret bundle inside an application directory.
pub const ENCRYPTED_ENV: &str = ".env.enc";

/// Decrypted runtime environment read by the container engine.
pub const DECRYPTED_ENV: &str = ".env";

// ---------------------------------------------------------------------------
// Revisions
// ---------------------------------------------------------------------------

/// A version-control revision identifier (a commit hash for git).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RevisionId(pub String);

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RevisionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RevisionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Checkout state captured before and after the repository update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionPair {
    pub previous: RevisionId,
    pub current: RevisionId,
}

impl RevisionPair {
    pub fn new(previous: RevisionId, current: RevisionId) -> Self {
        Self { previous, current }
    }

    /// `true` when the update did not move the checkout.
    pub fn is_unchanged(&self) -> bool {
        self.previous == self.current
    }
}

/// Values produced by the update stage and read by every per-application
/// stage of a single fleet run.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    /// Canonical fleet root; also the repository working directory.
    pub fleet_root: PathBuf,
    pub revisions: RevisionPair,
}

// ---------------------------------------------------------------------------
// Application directory
// ---------------------------------------------------------------------------

/// A deployable unit: a directory directly containing [`COMPOSE_FILE`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AppDir {
    path: PathBuf,
}

impl AppDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used in log lines and reports.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn compose_file(&self) -> PathBuf {
        self.path.join(COMPOSE_FILE)
    }

    pub fn encrypted_env(&self) -> PathBuf {
        self.path.join(ENCRYPTED_ENV)
    }

    pub fn decrypted_env(&self) -> PathBuf {
        self.path.join(DECRYPTED_ENV)
    }
}

impl fmt::Display for AppDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.display().fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Verdicts and actions
// ---------------------------------------------------------------------------

/// Whether a change set invalidates the application's images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildVerdict {
    BuildRequired,
    RuntimeOnly,
}

impl BuildVerdict {
    pub fn build_required(self) -> bool {
        matches!(self, Self::BuildRequired)
    }
}

impl fmt::Display for BuildVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BuildRequired => "build-required",
            Self::RuntimeOnly => "runtime-only",
        };
        f.write_str(s)
    }
}

/// The container-engine action the reconciler issued for an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    /// `up` with a forced image rebuild.
    Rebuild,
    /// `restart` of an already running project.
    Restart,
    /// `up` without rebuild for a project with nothing running.
    Create,
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rebuild => "rebuild",
            Self::Restart => "restart",
            Self::Create => "create",
        };
        f.write_str(s)
    }
}
