// ABOUTME: Event types and channel halves for delivering live log lines.
// ABOUTME: The sink side pushes lines and closes exactly once; the feed side consumes.

use crate::ssh;
use chrono::{DateTime, Utc};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Buffered events between the relay workers and the consumer.
const FEED_BUFFER: usize = 256;

/// Which remote output direction a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Stdout,
    Stderr,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Stdout => write!(f, "stdout"),
            LogSource::Stderr => write!(f, "stderr"),
        }
    }
}

/// One log line with its direction and arrival time.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub content: String,
    pub source: LogSource,
    pub received_at: DateTime<Utc>,
}

impl LogLine {
    pub(crate) fn new(content: String, source: LogSource) -> Self {
        Self {
            content,
            source,
            received_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StreamError {
    /// The session for the followed command could not be opened. Read
    /// failures after a successful open travel inline as `Error:` lines
    /// instead.
    #[error("failed to open log stream: {0}")]
    Open(#[from] ssh::Error),
}

/// What a log feed delivers. Exactly one `Closed` arrives per feed, always
/// last.
#[derive(Debug)]
pub enum LogEvent {
    Line(LogLine),
    Closed(Result<(), StreamError>),
}

/// Producer half of a feed. Cloned across the relay workers.
#[derive(Clone)]
pub(crate) struct Sink {
    tx: mpsc::Sender<LogEvent>,
    closed: Arc<AtomicBool>,
}

impl Sink {
    /// Deliver a line. Returns false once the consumer is gone or the feed
    /// has been completed, so callers can stop relaying.
    pub async fn push(&self, line: LogLine) -> bool {
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }
        self.tx.send(LogEvent::Line(line)).await.is_ok()
    }

    /// Complete the feed. Only the first call delivers a `Closed` event;
    /// later calls are no-ops.
    pub async fn close(&self, result: Result<(), StreamError>) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.tx.send(LogEvent::Closed(result)).await;
    }
}

/// Consumer half of a feed.
///
/// `stop` requests the underlying session be closed; dropping the feed does
/// the same. Remaining buffered events stay readable after a stop until the
/// final `Closed` arrives.
pub struct LogFeed {
    rx: mpsc::Receiver<LogEvent>,
    stop: Option<oneshot::Sender<()>>,
}

impl LogFeed {
    pub async fn next(&mut self) -> Option<LogEvent> {
        self.rx.recv().await
    }

    /// Ask the stream to shut down. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

impl futures::Stream for LogFeed {
    type Item = LogEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Create a connected sink/feed pair plus the stop signal the supervisor
/// listens on. The signal fires on `LogFeed::stop` and on feed drop.
pub(crate) fn feed_pair() -> (Sink, LogFeed, oneshot::Receiver<()>) {
    let (tx, rx) = mpsc::channel(FEED_BUFFER);
    let (stop_tx, stop_rx) = oneshot::channel();

    let sink = Sink {
        tx,
        closed: Arc::new(AtomicBool::new(false)),
    };
    let feed = LogFeed {
        rx,
        stop: Some(stop_tx),
    };

    (sink, feed, stop_rx)
}
