// ABOUTME: Runtime type definitions for Docker and Podman.
// ABOUTME: Includes the RuntimeType enum and the fixed priority list used for selection.

use nonempty::{NonEmpty, nonempty};
use serde::{Deserialize, Serialize};

/// The container runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl RuntimeType {
    /// Name of the executable probed on `PATH`.
    pub fn binary_name(&self) -> &'static str {
        match self {
            RuntimeType::Docker => "docker",
            RuntimeType::Podman => "podman",
        }
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Runtimes this tool knows how to configure, most preferred first.
///
/// Used both as the discovery candidate list and as the tie-breaking order
/// when the user has not picked a runtime.
pub fn runtime_priority() -> NonEmpty<RuntimeType> {
    nonempty![RuntimeType::Podman, RuntimeType::Docker]
}
