// ABOUTME: Diagnostics accumulator for non-fatal failures during a command.
// ABOUTME: Collects problems that must be reported but should not abort the command.

/// Collects non-fatal warnings during a command.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning. It is shown to the user when the command finishes.
    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a command.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// No configuration strategy exists for the runtime on this host.
    pub fn unsupported_target(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnsupportedTarget,
            message: message.into(),
        }
    }

    /// Podman machine connection could not be resolved.
    pub fn podman_connection(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PodmanConnection,
            message: message.into(),
        }
    }

    /// Seeding the SSH known-hosts entry failed.
    pub fn ssh_bootstrap(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SshBootstrap,
            message: message.into(),
        }
    }

    /// A cloned repository could not be removed from the cache.
    pub fn cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Cleanup,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Runtime/OS/architecture combination has no configuration strategy.
    UnsupportedTarget,
    /// No usable root-mode Podman machine connection.
    PodmanConnection,
    /// SSH trust bootstrap against the Podman machine failed.
    SshBootstrap,
    /// Failed to remove a temporary clone.
    Cleanup,
}
