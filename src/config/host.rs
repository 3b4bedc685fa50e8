// ABOUTME: Remote host configuration for the SSH session.
// ABOUTME: Host, username, and password resolve through EnvValue before connecting.

use crate::config::EnvValue;
use crate::error::Result;
use crate::ssh::SessionConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    pub host: EnvValue,

    #[serde(default = "default_port")]
    pub port: u16,

    pub username: EnvValue,

    pub password: EnvValue,
}

fn default_port() -> u16 {
    22
}

impl HostConfig {
    /// Resolves env-sourced fields into a concrete session config.
    pub fn resolve(&self) -> Result<SessionConfig> {
        let host = self.host.resolve()?;
        let username = self.username.resolve()?;
        let password = self.password.resolve()?;

        Ok(SessionConfig::new(host, username, password).port(self.port))
    }
}
