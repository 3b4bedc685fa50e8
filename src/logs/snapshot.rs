// ABOUTME: Snapshot retrieval of the most recent deployment log on a remote host.
// ABOUTME: Two commands per call: discover the newest log file, then fetch its content.

use crate::ssh::{Error, OutputStream, Remote, Result};
use std::time::Duration;

/// Returned instead of log content when the log directory has no entries.
/// Consumers match on this exact text; never reword it.
pub const NO_LOG_FILE: &str = "No log file found.";

/// Retrieves the newest deployment log from a directory of `*.txt` files.
///
/// Discovery and fetch each run on their own session. The result is
/// operator-facing text: real content, the missing-log sentinel, or an
/// `Error:` line, all delivered as an ordinary `Ok` value. Only failing to
/// open a session is an `Err`.
pub struct DeploymentLogs<R: Remote> {
    remote: R,
    dir: String,
    command_timeout: Option<Duration>,
}

impl<R: Remote> DeploymentLogs<R> {
    pub fn new(remote: R, dir: impl Into<String>) -> Self {
        Self {
            remote,
            dir: dir.into(),
            command_timeout: None,
        }
    }

    /// Bound each remote command's drain. Off by default; a stalled command
    /// then blocks the caller indefinitely.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Fetch the content of the most recent deployment log.
    pub async fn latest(&self) -> Result<String> {
        let discover = format!("ls -t {}/*.txt | head -n 1", self.dir);
        let listing = self.run(&discover).await?;

        if let Some(message) = listing.failure {
            return Ok(format!("Error: {message}"));
        }

        let candidate = listing.stdout.lines().next().unwrap_or("").trim();
        let stderr = listing.stderr.trim();

        if candidate.is_empty() && stderr.is_empty() {
            return Ok(NO_LOG_FILE.to_string());
        }
        if !stderr.is_empty() {
            return Ok(format!("Error: {stderr}"));
        }

        let fetched = self.run(&format!("cat {candidate}")).await?;

        // The fetch command's stderr is deliberately not consulted: a file
        // that vanishes between the two commands yields empty content, not
        // an error.
        let mut content = fetched.stdout;
        if let Some(message) = fetched.failure {
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str("Error: ");
            content.push_str(&message);
        }
        Ok(content)
    }

    /// Run one command and drain both of its streams to completion.
    async fn run(&self, command: &str) -> Result<Drained> {
        let session = self.remote.open(command).await?;
        let (stdout, stderr, guard) = session.into_parts();

        // Both directions drain together: with bounded stream buffers,
        // draining one direction to completion while the other backs up can
        // wedge the session.
        let drain_both = async { tokio::join!(drain(stdout), drain(stderr)) };

        let ((stdout, stdout_failure), (stderr, stderr_failure)) = match self.command_timeout {
            Some(limit) => match tokio::time::timeout(limit, drain_both).await {
                Ok(drained) => drained,
                Err(_) => {
                    guard.close().await;
                    return Err(Error::CommandTimeout(limit));
                }
            },
            None => drain_both.await,
        };

        guard.close().await;

        Ok(Drained {
            stdout,
            stderr,
            failure: stdout_failure.or(stderr_failure),
        })
    }
}

/// Fully drained output of one command.
struct Drained {
    stdout: String,
    stderr: String,
    /// First read failure on either direction, if any. Already-read text is
    /// kept alongside it.
    failure: Option<String>,
}

async fn drain(mut stream: OutputStream) -> (String, Option<String>) {
    let mut text = String::new();
    while let Some(chunk) = stream.recv().await {
        match chunk {
            Ok(bytes) => text.push_str(&String::from_utf8_lossy(&bytes)),
            Err(e) => return (text, Some(e.to_string())),
        }
    }
    (text, None)
}
