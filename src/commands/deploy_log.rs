// ABOUTME: Deploy-log command implementation.
// ABOUTME: Fetches and prints the newest deployment log from the remote host.

use vigla::config::Config;
use vigla::error::Result;
use vigla::logs::DeploymentLogs;
use vigla::ssh::SshRemote;

pub async fn deploy_log(config: Config) -> Result<()> {
    let session_config = config.remote.resolve()?;
    let remote = SshRemote::new(session_config);

    let mut retriever = DeploymentLogs::new(remote, &config.deploy_logs.dir);
    if let Some(timeout) = config.deploy_logs.command_timeout {
        retriever = retriever.command_timeout(timeout);
    }

    let content = retriever.latest().await?;
    if content.ends_with('\n') {
        print!("{content}");
    } else {
        println!("{content}");
    }

    Ok(())
}
