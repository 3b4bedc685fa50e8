// ABOUTME: SSH-specific error types.
// ABOUTME: Covers session establishment and mid-stream interruption failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Any failure before the command's output streams exist: TCP dial,
    /// handshake, password rejection, channel open, or exec dispatch.
    /// Callers cannot tell a transport failure from a bad password; both
    /// surface here with only the message differing.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The session ended mid-stream for a reason other than a requested
    /// close, e.g. the transport dropped without an EOF.
    #[error("session interrupted: {0}")]
    Interrupted(String),

    #[error("command timed out after {0:?}")]
    CommandTimeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
