// ABOUTME: Application-wide error types for vigla.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid container name: {0}")]
    InvalidContainerName(#[from] crate::types::ContainerNameError),

    #[error("SSH error: {0}")]
    Ssh(#[from] crate::ssh::Error),

    #[error("log stream error: {0}")]
    Stream(#[from] crate::logs::StreamError),

    #[error("upload authorization error: {0}")]
    Gate(#[from] crate::transfer::GateError),

    #[error("credential store error: {0}")]
    Credentials(#[from] crate::transfer::CredentialError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
