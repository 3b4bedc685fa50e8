// ABOUTME: Live container log streaming over a followed remote command.
// ABOUTME: One relay worker per output direction; failures in one direction never stop the other.

use super::lines::LineBuffer;
use super::sink::{LogFeed, LogLine, LogSource, Sink, StreamError, feed_pair};
use crate::ssh::{OutputStream, Remote};
use crate::types::ContainerName;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Streams `docker logs -f` output for containers on the remote host.
pub struct ContainerLogs<R: Remote> {
    remote: Arc<R>,
}

impl<R: Remote + 'static> ContainerLogs<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote: Arc::new(remote),
        }
    }

    /// Start following a container's logs.
    ///
    /// Returns the feed immediately; connecting happens in the background.
    /// If the session cannot be opened, the feed's only event is
    /// `Closed(Err(..))`. Dropping the feed (or calling `stop`) closes the
    /// session, which ends both relay loops.
    pub fn follow(&self, container: &ContainerName) -> LogFeed {
        let command = format!("docker logs -f {container}");
        let (sink, feed, stop) = feed_pair();

        tokio::spawn(run_follow(Arc::clone(&self.remote), command, sink, stop));

        feed
    }
}

async fn run_follow<R: Remote>(
    remote: Arc<R>,
    command: String,
    sink: Sink,
    mut stop: oneshot::Receiver<()>,
) {
    tracing::debug!(%command, "starting log follow");

    let session = tokio::select! {
        // Consumer went away while we were still connecting.
        _ = &mut stop => return,
        opened = remote.open(&command) => match opened {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("log follow failed to open: {e}");
                sink.close(Err(StreamError::Open(e))).await;
                return;
            }
        },
    };

    let (stdout, stderr, guard) = session.into_parts();

    // Close the session when the consumer stops or drops the feed. The
    // closed session ends both streams, which the relays read as ordinary
    // termination.
    let closer = tokio::spawn(async move {
        let _ = stop.await;
        guard.close().await;
    });

    let out = tokio::spawn(relay(stdout, LogSource::Stdout, sink.clone()));
    let err = tokio::spawn(relay(stderr, LogSource::Stderr, sink.clone()));
    let _ = out.await;
    let _ = err.await;

    // One completion, after both directions are finished, whatever happened
    // to either of them on the way.
    sink.close(Ok(())).await;

    // Streams ended on their own: reap the closer. Dropping its guard still
    // requests teardown, so a naturally-ended session is not leaked.
    closer.abort();
}

/// Relay one direction's chunks as parsed lines until the stream ends.
///
/// A read failure is rendered as a single inline `Error:` line and ends
/// only this direction.
async fn relay(mut stream: OutputStream, source: LogSource, sink: Sink) {
    let mut lines = LineBuffer::new();

    while let Some(chunk) = stream.recv().await {
        match chunk {
            Ok(bytes) => {
                for line in lines.push(&bytes) {
                    if !sink.push(LogLine::new(line, source)).await {
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::warn!("{source} read failed: {e}");
                let _ = sink.push(LogLine::new(format!("Error: {e}"), source)).await;
                return;
            }
        }
    }

    if let Some(rest) = lines.finish() {
        let _ = sink.push(LogLine::new(rest, source)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::sink::LogEvent;
    use crate::ssh::script::{Script, ScriptItem, ScriptedRemote, SessionScript};
    use std::time::Duration;

    fn name(value: &str) -> ContainerName {
        ContainerName::new(value).unwrap()
    }

    fn streamer(scripts: Vec<Script>) -> (ContainerLogs<Arc<ScriptedRemote>>, Arc<ScriptedRemote>) {
        let remote = Arc::new(ScriptedRemote::new(scripts));
        (ContainerLogs::new(Arc::clone(&remote)), remote)
    }

    async fn collect(feed: &mut LogFeed) -> Vec<LogEvent> {
        let mut events = Vec::new();
        while let Some(event) = feed.next().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn stdout_lines_arrive_in_order_then_complete() {
        let (logs, remote) = streamer(vec![Script::Run(SessionScript {
            stdout: vec![ScriptItem::Chunk("L1\n"), ScriptItem::Chunk("L2\n")],
            ..Default::default()
        })]);

        let mut feed = logs.follow(&name("web-1"));
        let events = collect(&mut feed).await;

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], LogEvent::Line(l) if l.content == "L1" && l.source == LogSource::Stdout));
        assert!(matches!(&events[1], LogEvent::Line(l) if l.content == "L2"));
        assert!(matches!(&events[2], LogEvent::Closed(Ok(()))));
        assert_eq!(remote.commands(), vec!["docker logs -f web-1".to_string()]);
    }

    #[tokio::test]
    async fn lines_from_both_directions_arrive() {
        let (logs, _remote) = streamer(vec![Script::Run(SessionScript {
            stdout: vec![ScriptItem::Chunk("out line\n")],
            stderr: vec![ScriptItem::Chunk("err line\n")],
            ..Default::default()
        })]);

        let mut feed = logs.follow(&name("web-1"));
        let events = collect(&mut feed).await;

        assert_eq!(events.len(), 3);
        assert!(matches!(events.last(), Some(LogEvent::Closed(Ok(())))));

        let lines: Vec<(String, LogSource)> = events
            .iter()
            .filter_map(|event| match event {
                LogEvent::Line(l) => Some((l.content.clone(), l.source)),
                LogEvent::Closed(_) => None,
            })
            .collect();
        assert!(lines.contains(&("out line".to_string(), LogSource::Stdout)));
        assert!(lines.contains(&("err line".to_string(), LogSource::Stderr)));
    }

    #[tokio::test]
    async fn open_failure_completes_the_feed_with_an_error() {
        let (logs, remote) = streamer(vec![Script::Refuse("no route to host")]);

        let mut feed = logs.follow(&name("web-1"));
        let events = collect(&mut feed).await;

        assert_eq!(events.len(), 1, "no line events before the failure");
        assert!(matches!(
            &events[0],
            LogEvent::Closed(Err(StreamError::Open(_)))
        ));
        assert_eq!(remote.closes(), 0);
    }

    #[tokio::test]
    async fn stopping_the_feed_closes_the_session() {
        let (logs, remote) = streamer(vec![Script::Run(SessionScript {
            stdout: vec![ScriptItem::Chunk("tick\n")],
            hold_open: true,
            ..Default::default()
        })]);

        let mut feed = logs.follow(&name("worker"));

        assert!(matches!(feed.next().await, Some(LogEvent::Line(l)) if l.content == "tick"));

        feed.stop();
        assert!(matches!(feed.next().await, Some(LogEvent::Closed(Ok(())))));
        assert!(feed.next().await.is_none());
        assert_eq!(remote.closes(), 1);
    }

    #[tokio::test]
    async fn dropping_the_feed_closes_the_session() {
        let (logs, remote) = streamer(vec![Script::Run(SessionScript {
            stdout: vec![ScriptItem::Chunk("up\n")],
            hold_open: true,
            ..Default::default()
        })]);

        let mut feed = logs.follow(&name("worker"));
        assert!(matches!(feed.next().await, Some(LogEvent::Line(_))));

        drop(feed);

        for _ in 0..100 {
            if remote.closes() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(remote.closes(), 1);
    }

    #[tokio::test]
    async fn failed_direction_does_not_stop_the_other() {
        let (logs, remote) = streamer(vec![Script::Run(SessionScript {
            stdout: vec![ScriptItem::Chunk("a\n"), ScriptItem::Fail("connection reset")],
            stderr: vec![ScriptItem::Chunk("b\n")],
            hold_open: true,
            ..Default::default()
        })]);

        let mut feed = logs.follow(&name("web-1"));

        let mut lines = Vec::new();
        while lines.len() < 3 {
            match feed.next().await {
                Some(LogEvent::Line(l)) => lines.push((l.content, l.source)),
                other => panic!("expected a line event, got {other:?}"),
            }
        }

        assert!(lines.contains(&("a".to_string(), LogSource::Stdout)));
        assert!(lines.contains(&(
            "Error: session interrupted: connection reset".to_string(),
            LogSource::Stdout
        )));
        assert!(
            lines.contains(&("b".to_string(), LogSource::Stderr)),
            "healthy direction must keep delivering"
        );

        feed.stop();
        assert!(matches!(feed.next().await, Some(LogEvent::Closed(Ok(())))));
        assert_eq!(remote.closes(), 1);
    }

    #[tokio::test]
    async fn trailing_partial_line_is_delivered_at_end() {
        let (logs, _remote) = streamer(vec![Script::Run(SessionScript {
            stdout: vec![ScriptItem::Chunk("done\nno newline at end")],
            ..Default::default()
        })]);

        let mut feed = logs.follow(&name("web-1"));
        let events = collect(&mut feed).await;

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], LogEvent::Line(l) if l.content == "done"));
        assert!(matches!(&events[1], LogEvent::Line(l) if l.content == "no newline at end"));
        assert!(matches!(&events[2], LogEvent::Closed(Ok(()))));
    }
}
