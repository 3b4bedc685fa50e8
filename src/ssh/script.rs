// ABOUTME: Scripted sessions for exercising retrievers and streamers without a server.
// ABOUTME: Feeds canned output through the same channel wiring as a real session.

use super::client::{STREAM_BUFFER, Session};
use super::error::{Error, Result};
use super::remote::Remote;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot, watch};

/// One scripted item on an output direction.
pub(crate) enum ScriptItem {
    /// Raw bytes delivered as a chunk.
    Chunk(&'static str),
    /// A read failure after the preceding chunks.
    Fail(&'static str),
}

impl ScriptItem {
    fn into_payload(self) -> Result<Bytes> {
        match self {
            ScriptItem::Chunk(text) => Ok(Bytes::from_static(text.as_bytes())),
            ScriptItem::Fail(message) => Err(Error::Interrupted(message.to_string())),
        }
    }
}

/// Output for one scripted session.
#[derive(Default)]
pub(crate) struct SessionScript {
    pub stdout: Vec<ScriptItem>,
    pub stderr: Vec<ScriptItem>,
    /// Keep the streams open after the scripted output until the session is
    /// closed, like a followed command that produces nothing further.
    pub hold_open: bool,
}

impl SessionScript {
    pub fn with_stdout(text: &'static str) -> Self {
        Self {
            stdout: vec![ScriptItem::Chunk(text)],
            ..Default::default()
        }
    }
}

/// What the next `open` call should do.
pub(crate) enum Script {
    /// Fail the open with a connection error.
    Refuse(&'static str),
    /// Hand out a session that plays this script.
    Run(SessionScript),
}

/// A `Remote` that replays scripted sessions in order and records every
/// command and close for assertions.
pub(crate) struct ScriptedRemote {
    scripts: Mutex<VecDeque<Script>>,
    commands: Mutex<Vec<String>>,
    closes: Arc<AtomicUsize>,
}

impl ScriptedRemote {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            commands: Mutex::new(Vec::new()),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Commands opened so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// How many sessions have been closed (explicitly or by guard drop).
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Remote for ScriptedRemote {
    async fn open(&self, command: &str) -> Result<Session> {
        self.commands.lock().unwrap().push(command.to_string());

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no session scripted for command: {command}"));

        match script {
            Script::Refuse(message) => Err(Error::Connection(message.to_string())),
            Script::Run(session) => Ok(play(session, Arc::clone(&self.closes))),
        }
    }
}

/// Wire up a session whose output comes from the script. A single feeder
/// task sends stdout items before stderr items, the same serialized order a
/// real channel message queue has.
fn play(script: SessionScript, closes: Arc<AtomicUsize>) -> Session {
    let (stdout_tx, stdout_rx) = mpsc::channel(STREAM_BUFFER);
    let (stderr_tx, stderr_rx) = mpsc::channel(STREAM_BUFFER);
    let (stop_tx, stop_rx) = oneshot::channel();
    let (done_tx, done_rx) = watch::channel(false);
    let (release_tx, release_rx) = watch::channel(false);

    let feeder = tokio::spawn(feed(script, stdout_tx, stderr_tx, release_rx));

    tokio::spawn(async move {
        let _ = stop_rx.await;
        closes.fetch_add(1, Ordering::SeqCst);
        let _ = release_tx.send(true);
        let _ = feeder.await;
        let _ = done_tx.send(true);
    });

    Session::from_channels(stdout_rx, stderr_rx, stop_tx, done_rx)
}

async fn feed(
    script: SessionScript,
    stdout_tx: mpsc::Sender<Result<Bytes>>,
    stderr_tx: mpsc::Sender<Result<Bytes>>,
    mut release: watch::Receiver<bool>,
) {
    for item in script.stdout {
        if stdout_tx.send(item.into_payload()).await.is_err() {
            return;
        }
    }
    for item in script.stderr {
        if stderr_tx.send(item.into_payload()).await.is_err() {
            return;
        }
    }
    if script.hold_open {
        let _ = release.wait_for(|closing| *closing).await;
    }
}
