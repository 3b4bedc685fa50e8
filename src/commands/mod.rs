// ABOUTME: Command module aggregator for the vigla CLI.
// ABOUTME: Re-exports deploy-log, tail, and grant command handlers.

mod deploy_log;
mod grant;
mod tail;

pub use deploy_log::deploy_log;
pub use grant::grant;
pub use tail::tail;
