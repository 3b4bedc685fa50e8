// ABOUTME: Tail command implementation.
// ABOUTME: Streams container logs line by line until Ctrl-C.

use vigla::config::Config;
use vigla::error::Result;
use vigla::logs::{ContainerLogs, LogEvent, LogLine};
use vigla::ssh::SshRemote;
use vigla::types::ContainerName;

pub async fn tail(config: Config, container: &str) -> Result<()> {
    let container = ContainerName::new(container)?;

    let session_config = config.remote.resolve()?;
    let streamer = ContainerLogs::new(SshRemote::new(session_config));
    let mut feed = streamer.follow(&container);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                feed.stop();
                break;
            }
            event = feed.next() => match event {
                Some(LogEvent::Line(line)) => print_line(&line),
                Some(LogEvent::Closed(result)) => return result.map_err(Into::into),
                None => return Ok(()),
            }
        }
    }

    // Drain whatever was already buffered when the stop request landed.
    while let Some(event) = feed.next().await {
        match event {
            LogEvent::Line(line) => print_line(&line),
            LogEvent::Closed(result) => return result.map_err(Into::into),
        }
    }

    Ok(())
}

fn print_line(line: &LogLine) {
    println!("[{}] {}", line.source, line.content);
}
