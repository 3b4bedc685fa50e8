// ABOUTME: Remote execution seam for log retrieval and streaming.
// ABOUTME: Production opens real SSH sessions; tests substitute scripted ones.

use super::client::{Session, SessionConfig};
use super::error::Result;
use async_trait::async_trait;

/// Something that can run a command on a remote host and hand back the
/// session for it. One session per command.
#[async_trait]
pub trait Remote: Send + Sync {
    async fn open(&self, command: &str) -> Result<Session>;
}

#[async_trait]
impl<T: Remote> Remote for std::sync::Arc<T> {
    async fn open(&self, command: &str) -> Result<Session> {
        (**self).open(command).await
    }
}

/// The production `Remote`: opens an SSH session per command.
pub struct SshRemote {
    config: SessionConfig,
}

impl SshRemote {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Remote for SshRemote {
    async fn open(&self, command: &str) -> Result<Session> {
        Session::open(&self.config, command).await
    }
}
