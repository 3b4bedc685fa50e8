// ABOUTME: Read-only credential table backed by a JSON file.
// ABOUTME: Verifies username/password pairs and hands out the matching access keys.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read credentials file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse credentials file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Object storage access keys handed to an authorized uploader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessKeys {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,

    #[serde(rename = "AccessKeySecret")]
    pub access_key_secret: String,
}

/// One entry of the credentials file. Field names mirror the file format.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialEntry {
    #[serde(rename = "UserName")]
    pub username: String,

    #[serde(rename = "Password")]
    pub password: String,

    #[serde(flatten)]
    pub access: AccessKeys,
}

/// The credential table, loaded once and never mutated.
///
/// Lookups require an exact match on both username and password; there is
/// no hashing and no write path. The file is small and operator-managed.
#[derive(Debug)]
pub struct CredentialStore {
    entries: Vec<CredentialEntry>,
}

impl CredentialStore {
    /// Parse a JSON array of credential entries.
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let entries = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Load the credential file from disk.
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let content = std::fs::read_to_string(path).map_err(|source| CredentialError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Check a username/password pair. Returns the entry's access keys on a
    /// match, `None` otherwise.
    pub fn verify(&self, username: &str, password: &str) -> Option<&AccessKeys> {
        self.entries
            .iter()
            .find(|entry| entry.username == username && entry.password == password)
            .map(|entry| &entry.access)
    }
}
