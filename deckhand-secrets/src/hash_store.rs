//! Checksum store: SHA-256 change tracking for plaintext `.env` files.
//!
//! Persists a [`ChecksumStoreFile`] JSON document at
//! `<tools_dir>/.env_checksums.json`, keyed by absolute `.env` path.
//! Writes go through a `.tmp` file and a rename.
//!
//! Older tooling wrote a flat `{ "<path>": "<hex>" }` object; loading accepts
//! that shape and the next save rewrites it in the structured form.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{io_err, SecretsError};

pub const STORE_FILE: &str = ".env_checksums.json";

/// Maps absolute `.env` path strings to their last encrypted SHA-256 digest.
pub type ChecksumMap = HashMap<String, String>;

/// On-disk checksum store payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecksumStoreFile {
    pub updated_at: DateTime<Utc>,
    pub files: ChecksumMap,
}

impl ChecksumStoreFile {
    fn empty() -> Self {
        Self {
            updated_at: Utc::now(),
            files: HashMap::new(),
        }
    }

    /// `true` when `digest` differs from (or is missing for) `key`.
    pub fn is_stale(&self, key: &str, digest: &str) -> bool {
        self.files.get(key).map(String::as_str) != Some(digest)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoreCompat {
    Structured(StructuredCompat),
    Legacy(ChecksumMap),
}

#[derive(Debug, Deserialize)]
struct StructuredCompat {
    updated_at: Option<DateTime<Utc>>,
    files: ChecksumMap,
}

/// `<tools_dir>/.env_checksums.json`
pub fn store_path_at(tools_dir: &Path) -> PathBuf {
    tools_dir.join(STORE_FILE)
}

/// Load the checksum store. Returns an empty store if the file does not exist.
pub fn load_at(tools_dir: &Path) -> Result<ChecksumStoreFile, SecretsError> {
    let path = store_path_at(tools_dir);
    if !path.exists() {
        return Ok(ChecksumStoreFile::empty());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    match serde_json::from_str::<StoreCompat>(&contents)? {
        StoreCompat::Structured(store) => Ok(ChecksumStoreFile {
            updated_at: store.updated_at.unwrap_or_else(Utc::now),
            files: store.files,
        }),
        StoreCompat::Legacy(files) => Ok(ChecksumStoreFile {
            updated_at: Utc::now(),
            files,
        }),
    }
}

/// Save the checksum store: write `<path>.tmp`, then rename over `<path>`.
pub fn save_at(tools_dir: &Path, store: &ChecksumStoreFile) -> Result<(), SecretsError> {
    std::fs::create_dir_all(tools_dir).map_err(|e| io_err(tools_dir, e))?;

    let path = store_path_at(tools_dir);
    let json = serde_json::to_string_pretty(store)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    Ok(())
}

/// SHA-256 hex digest of a file's raw bytes.
pub fn hash_file(path: &Path) -> Result<String, SecretsError> {
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
