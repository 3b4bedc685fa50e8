// ABOUTME: Upload authorization for the deployment artifact bucket.
// ABOUTME: Credentials are checked before the object key; a grant carries the access keys.

mod credentials;

pub use credentials::{AccessKeys, CredentialEntry, CredentialError, CredentialStore};

use crate::types::{ObjectKey, ObjectKeyError};
use chrono::{DateTime, Utc};
use snafu::Snafu;

/// Why an upload was refused.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum GateError {
    #[snafu(display("authentication failed for user {username}"))]
    Unauthorized { username: String },

    #[snafu(display("invalid object key format: {source}"))]
    InvalidKey { source: ObjectKeyError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateErrorKind {
    /// The username/password pair did not match any credential entry.
    Unauthorized,
    /// Credentials were fine but the object key is malformed.
    InvalidKey,
}

impl GateError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> GateErrorKind {
        match self {
            GateError::Unauthorized { .. } => GateErrorKind::Unauthorized,
            GateError::InvalidKey { .. } => GateErrorKind::InvalidKey,
        }
    }
}

/// Everything an authorized upload needs: the destination and the keys to
/// reach it. Issuing a grant is as far as this module goes; moving bytes is
/// someone else's job.
#[derive(Debug, Clone)]
pub struct UploadGrant {
    pub bucket: String,
    pub key: ObjectKey,
    pub access: AccessKeys,
    pub issued_at: DateTime<Utc>,
}

/// Authorizes uploads against the credential table and key format rules.
///
/// Checks run in a fixed order: credentials first, then the key. A caller
/// with bad credentials learns nothing about key validity.
pub struct TransferGate {
    store: CredentialStore,
    bucket: String,
}

impl TransferGate {
    pub fn new(store: CredentialStore, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn authorize_upload(
        &self,
        username: &str,
        password: &str,
        key: &str,
    ) -> Result<UploadGrant, GateError> {
        let Some(access) = self.store.verify(username, password) else {
            tracing::warn!(username, "upload refused: authentication failed");
            return Err(GateError::Unauthorized {
                username: username.to_string(),
            });
        };

        let key = ObjectKey::new(key).map_err(|source| GateError::InvalidKey { source })?;

        Ok(UploadGrant {
            bucket: self.bucket.clone(),
            key,
            access: access.clone(),
            issued_at: Utc::now(),
        })
    }
}
