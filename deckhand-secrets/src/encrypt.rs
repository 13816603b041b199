//! Checksum-gated encryption of an application's `.env`.
//!
//! 1. Resolve `<app>/.env` to an absolute path (the store key).
//! 2. SHA-256 the plaintext.
//! 3. Load the checksum store.
//! 4. Skip when the digest matches and `.env.enc` exists.
//! 5. Encrypt with sops.
//! 6. Record the digest and save the store.
//!
//! A failed encryption leaves the store untouched.

use std::path::PathBuf;

use chrono::Utc;

use deckhand_core::AppDir;

use crate::error::{io_err, SecretsError};
use crate::{hash_store, sops::Sops};

/// Outcome of [`encrypt_app`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptOutcome {
    /// `.env.enc` was (re)written.
    Encrypted { encrypted: PathBuf },
    /// Digest unchanged and `.env.enc` present.
    Unchanged { env: PathBuf },
}

/// Encrypt `<app>/.env` to `<app>/.env.enc` if it changed since the last run.
pub fn encrypt_app(
    app: &AppDir,
    tools_dir: &std::path::Path,
    sops: &Sops,
) -> Result<EncryptOutcome, SecretsError> {
    if !app.path().is_dir() {
        return Err(SecretsError::AppNotFound {
            path: app.path().to_path_buf(),
        });
    }
    let env = app.decrypted_env();
    if !env.is_file() {
        return Err(SecretsError::MissingEnv {
            path: app.path().to_path_buf(),
        });
    }
    let env = std::fs::canonicalize(&env).map_err(|e| io_err(&env, e))?;
    let encrypted = app.encrypted_env();

    let key = env.to_string_lossy().to_string();
    let digest = hash_store::hash_file(&env)?;
    let mut store = hash_store::load_at(tools_dir)?;

    if !store.is_stale(&key, &digest) && encrypted.exists() {
        tracing::info!("Skipped {} - no changes detected", env.display());
        return Ok(EncryptOutcome::Unchanged { env });
    }

    sops.encrypt(&env, &encrypted)?;
    tracing::info!("Encrypted {} successfully", encrypted.display());

    store.files.insert(key, digest);
    store.updated_at = Utc::now();
    hash_store::save_at(tools_dir, &store)?;

    Ok(EncryptOutcome::Encrypted { encrypted })
}
