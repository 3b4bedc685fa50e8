// ABOUTME: Validated Docker container name.
// ABOUTME: Rejects anything outside Docker's name alphabet before it reaches a remote command.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerNameError {
    #[error("container name cannot be empty")]
    Empty,

    #[error("container name exceeds maximum length of 255 characters")]
    TooLong,

    #[error("container name must start with an alphanumeric character, got '{0}'")]
    InvalidStart(char),

    #[error("invalid character in container name: '{0}'")]
    InvalidChar(char),
}

/// A container name that is safe to interpolate into a remote command.
///
/// Names follow Docker's own rule: `[a-zA-Z0-9][a-zA-Z0-9_.-]*`. Everything
/// else is rejected at construction, so shell metacharacters never make it
/// into a command string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: impl Into<String>) -> Result<Self, ContainerNameError> {
        let value = value.into();

        let Some(first) = value.chars().next() else {
            return Err(ContainerNameError::Empty);
        };

        if value.len() > 255 {
            return Err(ContainerNameError::TooLong);
        }

        if !first.is_ascii_alphanumeric() {
            return Err(ContainerNameError::InvalidStart(first));
        }

        for c in value.chars().skip(1) {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '.' && c != '-' {
                return Err(ContainerNameError::InvalidChar(c));
            }
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContainerName {
    type Err = ContainerNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
