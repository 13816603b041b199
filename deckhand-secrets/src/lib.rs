//! # deckhand-secrets
//!
//! Secret-bundle tooling: the `sops` wrapper used for both decryption at
//! deploy time and encryption by operators, the checksum store that gates
//! re-encryption, and provisioning of the sops executable itself.

pub mod encrypt;
pub mod error;
pub mod hash_store;
pub mod install;
pub mod platform;
pub mod sops;

pub use encrypt::{encrypt_app, EncryptOutcome};
pub use error::SecretsError;
pub use install::{install_sops, sops_path_at};
pub use sops::{Decryptor, Sops};
