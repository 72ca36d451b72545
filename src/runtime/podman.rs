// ABOUTME: Podman connection bootstrap for Linux hosts and macOS Podman machines.
// ABOUTME: Resolves the API socket and performs one-time SSH trust setup for the VM.

use super::configure::ConfigurationResult;
use super::error::{
    AgentRegistrationSnafu, ConfigureError, PodmanConnectionListSnafu, PodmanSocketQuerySnafu,
    PodmanSocketServiceSnafu,
};
use crate::diagnostics::{Diagnostics, Warning};
use crate::process::{CommandRunner, LogSink};
use crate::ssh::HostTrust;
use snafu::ResultExt;
use std::path::PathBuf;
use url::Url;

const PODMAN: &str = "podman";
const SYSTEMCTL: &str = "systemctl";
const DEFAULT_SSH_PORT: u16 = 22;

/// Ask Podman for its API socket and make sure the user socket unit is running.
///
/// Both commands are required; either failing aborts the command.
pub(super) async fn configure_system_socket(
    runner: &dyn CommandRunner,
) -> Result<ConfigurationResult, ConfigureError> {
    let info = runner
        .output(PODMAN, &["info", "-f", "{{.Host.RemoteSocket.Path}}"])
        .await
        .and_then(|output| output.check(PODMAN))
        .context(PodmanSocketQuerySnafu)?;

    runner
        .output(SYSTEMCTL, &["--user", "start", "podman.socket"])
        .await
        .and_then(|output| output.check(SYSTEMCTL))
        .context(PodmanSocketServiceSnafu)?;

    let socket_path = info.stdout.trim();
    tracing::debug!(socket_path, "resolved Podman socket");

    Ok(ConfigurationResult::remote_socket(format!(
        "unix://{socket_path}"
    )))
}

/// Root-mode connection to a Podman machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConnection {
    pub uri: Url,
    pub identity: PathBuf,
}

impl MachineConnection {
    pub fn host(&self) -> &str {
        self.uri.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> u16 {
        self.uri.port().unwrap_or(DEFAULT_SSH_PORT)
    }

    pub fn user(&self) -> &str {
        self.uri.username()
    }
}

/// Why a connection listing could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionParseError {
    #[error("no root Podman machine connection found")]
    NoRootConnection,

    #[error("invalid Podman machine connection {0:?}")]
    Malformed(String),
}

/// Pick the root-mode connection from `podman system connection ls` output.
///
/// Each line is `"<uri> <identity>"`, quotes included. The first line that
/// mentions `root` wins.
pub fn parse_root_connection(listing: &str) -> Result<MachineConnection, ConnectionParseError> {
    let line = listing
        .lines()
        .map(unquote)
        .find(|line| line.contains("root"))
        .ok_or(ConnectionParseError::NoRootConnection)?;

    let malformed = || ConnectionParseError::Malformed(line.to_string());

    let (uri, identity) = line.split_once(' ').ok_or_else(malformed)?;
    let identity = identity.trim();
    let uri = Url::parse(uri).map_err(|_| malformed())?;

    let has_host = uri.host_str().is_some_and(|h| !h.is_empty());
    if uri.scheme().is_empty() || !has_host || uri.username().is_empty() || identity.is_empty() {
        return Err(malformed());
    }

    Ok(MachineConnection {
        uri,
        identity: PathBuf::from(identity),
    })
}

fn unquote(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix('"').unwrap_or(line);
    line.strip_suffix('"').unwrap_or(line)
}

/// Make the root Podman machine connection usable by pack.
///
/// Registers the machine key with ssh-agent and, on first use, records the
/// VM's host key by connecting once.
pub(super) async fn configure_machine(
    runner: &dyn CommandRunner,
    trust: &dyn HostTrust,
    sink: &dyn LogSink,
    diag: &mut Diagnostics,
) -> Result<ConfigurationResult, ConfigureError> {
    let listing = runner
        .output(
            PODMAN,
            &["system", "connection", "ls", "--format=\"{{.URI}} {{.Identity}}\""],
        )
        .await
        .and_then(|output| output.check(PODMAN))
        .context(PodmanConnectionListSnafu)?;

    let connection = match parse_root_connection(&listing.stdout) {
        Ok(connection) => connection,
        Err(e) => {
            diag.warn(Warning::podman_connection(format!(
                "Failed configuring podman: {e}"
            )));
            return Ok(ConfigurationResult::empty());
        }
    };

    tracing::debug!(uri = %connection.uri, identity = %connection.identity.display(), "using Podman machine connection");

    trust
        .register_identity(&connection.identity)
        .await
        .context(AgentRegistrationSnafu)?;

    let (host, port) = (connection.host(), connection.port());
    let known = trust.is_known_host(host, port).unwrap_or_else(|e| {
        tracing::debug!("known_hosts lookup failed, treating host as unknown: {}", e);
        false
    });

    if !known {
        tracing::info!("adding [{}]:{} to known_hosts", host, port);
        match trust
            .seed_known_host(host, port, connection.user(), &connection.identity, sink)
            .await
        {
            Ok(outcome) if outcome.success() => {}
            Ok(outcome) => {
                diag.warn(Warning::ssh_bootstrap(format!(
                    "SSH to the Podman machine exited with code {}: {}",
                    outcome.exit_code,
                    outcome.stderr.trim()
                )));
                return Ok(ConfigurationResult::empty());
            }
            Err(e) => {
                diag.warn(Warning::ssh_bootstrap(format!(
                    "SSH to the Podman machine failed: {e}"
                )));
                return Ok(ConfigurationResult::empty());
            }
        }
    }

    Ok(ConfigurationResult::remote_socket(connection.uri.to_string()))
}
