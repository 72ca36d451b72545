// ABOUTME: Runtime configuration error types with SNAFU pattern.
// ABOUTME: Only fatal failures surface here; recoverable ones go to Diagnostics.

use snafu::Snafu;

use crate::process::ProcessError;

/// Fatal failure while preparing a runtime connection.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigureError {
    #[snafu(display("failed to query the Podman remote socket path: {source}"))]
    PodmanSocketQuery { source: ProcessError },

    #[snafu(display("failed to start the Podman socket service: {source}"))]
    PodmanSocketService { source: ProcessError },

    #[snafu(display("failed to list Podman system connections: {source}"))]
    PodmanConnectionList { source: ProcessError },

    #[snafu(display("failed to register the Podman machine identity with ssh-agent: {source}"))]
    AgentRegistration { source: crate::ssh::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureErrorKind {
    /// A Podman CLI call failed.
    PodmanCommand,
    /// The service manager could not start the socket unit.
    SocketService,
    /// The SSH agent refused or was unreachable.
    SshAgent,
}

impl ConfigureError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ConfigureErrorKind {
        match self {
            ConfigureError::PodmanSocketQuery { .. }
            | ConfigureError::PodmanConnectionList { .. } => ConfigureErrorKind::PodmanCommand,
            ConfigureError::PodmanSocketService { .. } => ConfigureErrorKind::SocketService,
            ConfigureError::AgentRegistration { .. } => ConfigureErrorKind::SshAgent,
        }
    }
}
