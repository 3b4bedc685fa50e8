// ABOUTME: Grant command implementation.
// ABOUTME: Verifies upload credentials and prints the resulting grant.

use vigla::config::Config;
use vigla::error::{Error, Result};
use vigla::transfer::{CredentialStore, TransferGate};

/// The password never travels through argv; it comes from this variable.
const PASSWORD_ENV: &str = "VIGLA_PASSWORD";

pub fn grant(config: Config, username: &str, key: &str) -> Result<()> {
    let transfer = config
        .transfer
        .ok_or_else(|| Error::InvalidConfig("missing transfer section".to_string()))?;

    let password = std::env::var(PASSWORD_ENV)
        .map_err(|_| Error::MissingEnvVar(PASSWORD_ENV.to_string()))?;

    let store = CredentialStore::load(&transfer.credentials_file)?;
    let gate = TransferGate::new(store, transfer.bucket);

    let grant = gate.authorize_upload(username, &password, key)?;

    // The secret key stays out of the output.
    println!("bucket: {}", grant.bucket);
    println!("key: {}", grant.key);
    println!("access-key-id: {}", grant.access.access_key_id);
    println!("issued-at: {}", grant.issued_at.to_rfc3339());

    Ok(())
}
