//! `sops` wrapper.
//!
//! Both directions use the dotenv input/output format and pass absolute
//! input and output paths. The working directory is the directory holding
//! the sops executable, so `.sops.yaml` lookup and relative paths never
//! depend on which application is being processed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use deckhand_core::{resolve_program, CommandRunner, CommandSpec};

use crate::error::{io_err, SecretsError};

/// Decrypts a secret bundle into its plaintext sibling.
pub trait Decryptor {
    fn decrypt(&self, encrypted: &Path, output: &Path) -> Result<(), SecretsError>;
}

/// A provisioned (or `PATH`-resolved) sops executable.
#[derive(Clone)]
pub struct Sops {
    binary: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for Sops {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sops").field("binary", &self.binary).finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    fn flag(self) -> &'static str {
        match self {
            Self::Encrypt => "--encrypt",
            Self::Decrypt => "--decrypt",
        }
    }
}

impl Sops {
    /// A relative `binary` path is anchored to the current directory, since
    /// sops runs from its own install directory.
    pub fn new(binary: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary: resolve_program(binary),
            runner,
        }
    }

    /// Encrypt a plaintext dotenv file to `output`.
    pub fn encrypt(&self, plaintext: &Path, output: &Path) -> Result<(), SecretsError> {
        self.transform(Direction::Encrypt, plaintext, output)
    }

    fn transform(
        &self,
        direction: Direction,
        input: &Path,
        output: &Path,
    ) -> Result<(), SecretsError> {
        self.ensure_present()?;
        let spec = self.command(direction, &absolute(input)?, &absolute(output)?);
        // Captured so sops diagnostics end up in the returned error.
        self.runner.capture(&spec)?;
        Ok(())
    }

    fn command(&self, direction: Direction, input: &Path, output: &Path) -> CommandSpec {
        CommandSpec::new(&self.binary, self.working_dir(input))
            .args(["--input-type", "dotenv", "--output-type", "dotenv", "--output"])
            .arg(output)
            .arg(direction.flag())
            .arg(input)
    }

    fn working_dir(&self, input: &Path) -> PathBuf {
        match self.binary.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            // Bare program name resolved through PATH.
            _ => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("/")),
        }
    }

    /// A path-like binary must exist; a bare name is left to `PATH`.
    fn ensure_present(&self) -> Result<(), SecretsError> {
        let path_like = self.binary.components().count() > 1;
        if path_like && !self.binary.exists() {
            return Err(SecretsError::SopsMissing {
                path: self.binary.clone(),
            });
        }
        Ok(())
    }
}

impl Decryptor for Sops {
    fn decrypt(&self, encrypted: &Path, output: &Path) -> Result<(), SecretsError> {
        self.transform(Direction::Decrypt, encrypted, output)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, SecretsError> {
    std::path::absolute(path).map_err(|e| io_err(path, e))
}
