// ABOUTME: SSH trust bootstrapping for the Podman machine connection.
// ABOUTME: Agent key registration, known_hosts lookup and one-shot host key seeding.

use super::client::{Session, SessionConfig};
use super::error::{Error, Result};
use crate::process::{LogSink, ProcessOutcome};
use async_trait::async_trait;
#[cfg(unix)]
use russh::keys::agent::client::AgentClient;
use russh::keys::known_hosts::{known_host_keys, known_host_keys_path};
use russh::keys::{load_secret_key, ssh_key};
use std::path::{Path, PathBuf};

/// Operations needed to make an SSH endpoint usable without prompts.
#[async_trait]
pub trait HostTrust: Send + Sync {
    /// Add the private key at `identity` to the running SSH agent.
    async fn register_identity(&self, identity: &Path) -> Result<()>;

    /// Whether known_hosts already holds a key for `[host]:port`.
    fn is_known_host(&self, host: &str, port: u16) -> Result<bool>;

    /// Open one connection that accepts and records the host key, run `exit`, and disconnect.
    async fn seed_known_host(
        &self,
        host: &str,
        port: u16,
        user: &str,
        identity: &Path,
        sink: &dyn LogSink,
    ) -> Result<ProcessOutcome>;
}

/// HostTrust backed by the user's SSH agent and known_hosts file.
#[derive(Debug, Clone, Default)]
pub struct SshTrust {
    known_hosts_path: Option<PathBuf>,
}

impl SshTrust {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific known_hosts file instead of ~/.ssh/known_hosts.
    pub fn with_known_hosts(path: impl Into<PathBuf>) -> Self {
        Self {
            known_hosts_path: Some(path.into()),
        }
    }
}

#[async_trait]
impl HostTrust for SshTrust {
    async fn register_identity(&self, identity: &Path) -> Result<()> {
        let key = load_secret_key(identity, None).map_err(|e| Error::KeyLoadFailed {
            path: identity.to_path_buf(),
            reason: e.to_string(),
        })?;

        add_to_agent(identity, &key).await?;

        tracing::debug!(identity = %identity.display(), "identity added to SSH agent");
        Ok(())
    }

    fn is_known_host(&self, host: &str, port: u16) -> Result<bool> {
        let keys = match &self.known_hosts_path {
            Some(path) => known_host_keys_path(host, port, path),
            None => known_host_keys(host, port),
        }
        .map_err(|e| Error::KnownHosts(e.to_string()))?;

        Ok(!keys.is_empty())
    }

    async fn seed_known_host(
        &self,
        host: &str,
        port: u16,
        user: &str,
        identity: &Path,
        sink: &dyn LogSink,
    ) -> Result<ProcessOutcome> {
        let config = SessionConfig::new(host, user, identity)
            .port(port)
            .trust_on_first_use(true)
            .known_hosts_path(self.known_hosts_path.clone());

        let session = Session::connect(config).await?;
        let outcome = session.exec_streaming("exit", sink).await?;

        if let Err(e) = session.disconnect().await {
            tracing::debug!("SSH disconnect after bootstrap failed: {}", e);
        }

        Ok(outcome)
    }
}

#[cfg(unix)]
async fn add_to_agent(identity: &Path, key: &ssh_key::PrivateKey) -> Result<()> {
    let mut agent = AgentClient::connect_env()
        .await
        .map_err(|e| Error::AgentUnavailable(e.to_string()))?;

    agent
        .add_identity(key, &[])
        .await
        .map_err(|e| Error::AgentRejected {
            path: identity.to_path_buf(),
            reason: e.to_string(),
        })
}

#[cfg(not(unix))]
async fn add_to_agent(_identity: &Path, _key: &ssh_key::PrivateKey) -> Result<()> {
    Err(Error::AgentUnavailable(
        "SSH agent sockets are only supported on Unix hosts".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_host_in_empty_known_hosts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("known_hosts");
        std::fs::write(&path, "").unwrap();

        let trust = SshTrust::with_known_hosts(&path);
        assert!(!trust.is_known_host("127.0.0.1", 55123).unwrap());
    }

    #[test]
    fn finds_bracketed_host_with_port() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("known_hosts");
        std::fs::write(
            &path,
            "[127.0.0.1]:55123 ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIJdD7y3aLq454yWBdwLWbieU1ebz9/cu7/QEXn9OIeZJ\n",
        )
        .unwrap();

        let trust = SshTrust::with_known_hosts(&path);
        assert!(trust.is_known_host("127.0.0.1", 55123).unwrap());
        assert!(!trust.is_known_host("127.0.0.1", 2222).unwrap());
    }
}
