// ABOUTME: Validated object storage key.
// ABOUTME: Keys are slash-separated paths of a restricted character set.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectKeyError {
    #[error("object key cannot be empty")]
    Empty,

    #[error("object key cannot contain an empty path segment")]
    EmptySegment,

    #[error("invalid character in object key: '{0}'")]
    InvalidChar(char),
}

/// An object storage key such as `deployments/2024/build.tar.gz`.
///
/// Segments are separated by `/` and may only contain ASCII alphanumerics,
/// `.`, `_`, and `-`. A leading, trailing, or doubled slash makes a segment
/// empty and is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(value: impl Into<String>) -> Result<Self, ObjectKeyError> {
        let value = value.into();

        if value.is_empty() {
            return Err(ObjectKeyError::Empty);
        }

        for segment in value.split('/') {
            if segment.is_empty() {
                return Err(ObjectKeyError::EmptySegment);
            }
            for c in segment.chars() {
                if !c.is_ascii_alphanumeric() && c != '.' && c != '_' && c != '-' {
                    return Err(ObjectKeyError::InvalidChar(c));
                }
            }
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectKey {
    type Err = ObjectKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
