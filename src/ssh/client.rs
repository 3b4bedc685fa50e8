// ABOUTME: SSH session management using russh.
// ABOUTME: One transport and one exec channel per command, with a pump task feeding byte streams.

use super::error::{Error, Result};
use bytes::Bytes;
use russh::client::{self, Handle, Msg};
use russh::keys::ssh_key;
use russh::{Channel, ChannelMsg, Disconnect};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};

/// Buffered chunks per output direction before the pump blocks.
pub(crate) const STREAM_BUFFER: usize = 32;

/// How long `SessionGuard::close` waits for teardown to finish.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Configuration for establishing an SSH session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remote host to connect to.
    pub host: String,
    /// SSH port (default: 22).
    pub port: u16,
    /// Username for password authentication.
    pub user: String,
    /// Password for authentication. Password is the only supported method.
    pub password: String,
}

impl SessionConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 22,
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// SSH client handler for russh.
///
/// Accepts any server key. The hosts this tool talks to are provisioned
/// dynamically and their keys are not tracked, so host key verification is
/// switched off, the same as `StrictHostKeyChecking=no`.
struct ClientHandler;

impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Ordered byte chunks from one output direction of a remote command.
///
/// The stream ends (`None`) when the command finishes or the session is
/// closed. A non-deliberate interruption is delivered as a final `Err` item
/// before the end.
pub struct OutputStream {
    rx: mpsc::Receiver<Result<Bytes>>,
}

impl OutputStream {
    pub async fn recv(&mut self) -> Option<Result<Bytes>> {
        self.rx.recv().await
    }
}

/// Owner of a session's close signal.
///
/// `close` requests teardown and waits for it to finish. Dropping the guard
/// requests teardown as well, so an abandoned session never outlives its
/// owner.
pub struct SessionGuard {
    stop: Option<oneshot::Sender<()>>,
    done: watch::Receiver<bool>,
}

impl SessionGuard {
    /// Close the session: the channel goes first, then the transport.
    /// Waits up to a short grace period for the teardown to complete.
    /// Closing an already-finished session is a no-op.
    pub async fn close(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = tokio::time::timeout(CLOSE_GRACE, self.done.wait_for(|finished| *finished)).await;
    }
}

/// An SSH session running exactly one remote command.
///
/// The transport and channel are owned by a background pump task; the
/// session handed to the caller is the consumer side: two output streams
/// and the close guard.
pub struct Session {
    stdout: OutputStream,
    stderr: OutputStream,
    guard: SessionGuard,
}

impl Session {
    /// Connect, authenticate with a password, and start `command`.
    ///
    /// The command string is sent verbatim; nothing is quoted or escaped on
    /// the way out. Callers own input safety through validated types.
    pub async fn open(config: &SessionConfig, command: &str) -> Result<Self> {
        // Default config carries no inactivity timeout: a followed log may
        // sit idle between lines for arbitrarily long.
        let russh_config = client::Config::default();

        let mut handle = client::connect(
            Arc::new(russh_config),
            (config.host.as_str(), config.port),
            ClientHandler,
        )
        .await
        .map_err(|e| {
            if e.to_string().contains("Connection refused") {
                Error::Connection(format!(
                    "connection refused to {}:{}",
                    config.host, config.port
                ))
            } else {
                Error::Connection(e.to_string())
            }
        })?;

        let auth = handle
            .authenticate_password(&config.user, &config.password)
            .await
            .map_err(|e| Error::Connection(format!("authentication exchange failed: {}", e)))?;
        if !auth.success() {
            return Err(Error::Connection(format!(
                "authentication failed for user {}",
                config.user
            )));
        }

        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(|e| Error::Connection(format!("failed to open channel: {}", e)))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::Connection(format!("failed to start command: {}", e)))?;

        tracing::debug!(host = %config.host, %command, "remote command started");

        let (stdout_tx, stdout_rx) = mpsc::channel(STREAM_BUFFER);
        let (stderr_tx, stderr_rx) = mpsc::channel(STREAM_BUFFER);
        let (stop_tx, stop_rx) = oneshot::channel();
        let (done_tx, done_rx) = watch::channel(false);

        tokio::spawn(pump(channel, handle, stdout_tx, stderr_tx, stop_rx, done_tx));

        Ok(Self {
            stdout: OutputStream { rx: stdout_rx },
            stderr: OutputStream { rx: stderr_rx },
            guard: SessionGuard {
                stop: Some(stop_tx),
                done: done_rx,
            },
        })
    }

    /// Split into the stdout stream, the stderr stream, and the close guard.
    pub fn into_parts(self) -> (OutputStream, OutputStream, SessionGuard) {
        (self.stdout, self.stderr, self.guard)
    }

    #[cfg(test)]
    pub(crate) fn from_channels(
        stdout: mpsc::Receiver<Result<Bytes>>,
        stderr: mpsc::Receiver<Result<Bytes>>,
        stop: oneshot::Sender<()>,
        done: watch::Receiver<bool>,
    ) -> Self {
        Self {
            stdout: OutputStream { rx: stdout },
            stderr: OutputStream { rx: stderr },
            guard: SessionGuard {
                stop: Some(stop),
                done,
            },
        }
    }
}

/// Route channel messages into the per-direction streams, then tear the
/// session down. Teardown runs here exactly once on every exit path.
async fn pump(
    mut channel: Channel<Msg>,
    handle: Handle<ClientHandler>,
    stdout_tx: mpsc::Sender<Result<Bytes>>,
    stderr_tx: mpsc::Sender<Result<Bytes>>,
    mut stop_rx: oneshot::Receiver<()>,
    done_tx: watch::Sender<bool>,
) {
    let mut got_eof = false;
    let mut got_exit = false;
    let mut deliberate = false;
    let mut abnormal = false;

    loop {
        tokio::select! {
            // Fires on an explicit close request and when the guard is
            // dropped; both count as a deliberate close.
            _ = &mut stop_rx => {
                deliberate = true;
                break;
            }
            msg = channel.wait() => {
                match msg {
                    Some(ChannelMsg::Data { data }) => {
                        let _ = stdout_tx.send(Ok(Bytes::copy_from_slice(&data))).await;
                    }
                    Some(ChannelMsg::ExtendedData { data, ext }) => {
                        if ext == 1 {
                            // stderr
                            let _ = stderr_tx.send(Ok(Bytes::copy_from_slice(&data))).await;
                        }
                    }
                    Some(ChannelMsg::ExitStatus { exit_status }) => {
                        got_exit = true;
                        tracing::debug!(exit_status, "remote command exited");
                        if got_eof {
                            break;
                        }
                    }
                    Some(ChannelMsg::Eof) => {
                        got_eof = true;
                        if got_exit {
                            break;
                        }
                    }
                    Some(ChannelMsg::Close) => {
                        break;
                    }
                    Some(_) => {}
                    None => {
                        abnormal = !got_eof;
                        break;
                    }
                }
            }
        }
    }

    if abnormal && !deliberate {
        tracing::warn!("session ended before command output completed");
        let _ = stdout_tx
            .send(Err(Error::Interrupted(
                "session ended before command output completed".to_string(),
            )))
            .await;
        let _ = stderr_tx
            .send(Err(Error::Interrupted(
                "session ended before command output completed".to_string(),
            )))
            .await;
    }

    // End both streams before tearing down the transport.
    drop(stdout_tx);
    drop(stderr_tx);

    // Channel first, then transport.
    drop(channel);
    let _ = handle
        .disconnect(Disconnect::ByApplication, "", "en")
        .await;
    tracing::debug!("session closed");

    let _ = done_tx.send(true);
}
