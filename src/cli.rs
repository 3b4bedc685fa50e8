// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vigla")]
#[command(about = "Deployment log retrieval and live container log streaming over SSH")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (discovered in the working directory when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the newest deployment log from the remote host
    DeployLog,

    /// Follow a container's logs until interrupted
    Tail {
        /// Name of the container to follow
        container: String,
    },

    /// Verify upload credentials and print a grant for an object key.
    /// Reads the password from the VIGLA_PASSWORD environment variable.
    Grant {
        /// Username in the credential store
        username: String,

        /// Destination object key within the bucket
        key: String,
    },
}
