// ABOUTME: SSH client module for remote command sessions.
// ABOUTME: Password authentication only; host keys are deliberately not verified.

mod client;
mod error;
mod remote;

#[cfg(test)]
pub(crate) mod script;

pub use client::{OutputStream, Session, SessionConfig, SessionGuard};
pub use error::{Error, Result};
pub use remote::{Remote, SshRemote};
