//! Secret synchronisation for one application directory.
//!
//! Keeps `<app>/.env` consistent with `<app>/.env.enc`:
//! - `.env.enc` absent: `.env` is removed if present.
//! - `.env.enc` present and listed as changed: decrypt over `.env`.
//! - `.env.enc` present and unchanged: leave `.env` alone.
//!
//! `.env.enc` itself is never touched.

use std::io::ErrorKind;

use serde::Serialize;

use deckhand_core::{AppDir, ENCRYPTED_ENV};
use deckhand_secrets::Decryptor;

use crate::error::{io_err, DeployError};

/// What secret sync does (or did) for an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretAction {
    None,
    Decrypt,
    RemoveStale,
}

/// Decide the secret action from on-disk state and the changed-file set.
/// Reads the filesystem, never writes it.
pub fn decide<S: AsRef<str>>(app: &AppDir, changed_paths: &[S]) -> SecretAction {
    if !app.encrypted_env().exists() {
        if app.decrypted_env().exists() {
            return SecretAction::RemoveStale;
        }
        return SecretAction::None;
    }
    if changed_paths
        .iter()
        .any(|p| p.as_ref().trim().ends_with(ENCRYPTED_ENV))
    {
        SecretAction::Decrypt
    } else {
        SecretAction::None
    }
}

pub struct SecretSynchronizer<'a> {
    decryptor: &'a dyn Decryptor,
}

impl<'a> SecretSynchronizer<'a> {
    pub fn new(decryptor: &'a dyn Decryptor) -> Self {
        Self { decryptor }
    }

    /// Apply [`decide`]'s verdict. Decryption failures propagate to the
    /// caller.
    pub fn sync<S: AsRef<str>>(
        &self,
        app: &AppDir,
        changed_paths: &[S],
    ) -> Result<SecretAction, DeployError> {
        let action = decide(app, changed_paths);
        match action {
            SecretAction::None => {}
            SecretAction::RemoveStale => {
                let dec = app.decrypted_env();
                match std::fs::remove_file(&dec) {
                    Ok(()) => tracing::info!("   Removed stale {}", dec.display()),
                    Err(err) if err.kind() == ErrorKind::NotFound => {}
                    Err(err) => return Err(io_err(&dec, err)),
                }
            }
            SecretAction::Decrypt => {
                tracing::info!("   Decrypting {}", app.encrypted_env().display());
                self.decryptor
                    .decrypt(&app.encrypted_env(), &app.decrypted_env())?;
            }
        }
        Ok(action)
    }
}
