// ABOUTME: Deployment log retrieval and live container log streaming.
// ABOUTME: Snapshot fetches run to completion; live follows deliver lines until cancelled.

mod lines;
mod sink;
mod snapshot;
mod stream;

pub use sink::{LogEvent, LogFeed, LogLine, LogSource, StreamError};
pub use snapshot::{DeploymentLogs, NO_LOG_FILE};
pub use stream::ContainerLogs;
