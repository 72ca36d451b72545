// ABOUTME: Per-platform runtime configuration producing DOCKER_HOST and pack flags.
// ABOUTME: Dispatches on (runtime, os, arch) through a fixed strategy table.

use super::error::ConfigureError;
use super::podman;
use super::target::{Arch, Os, Target};
use super::types::RuntimeType;
use crate::diagnostics::{Diagnostics, Warning};
use crate::process::{CommandRunner, LogSink};
use crate::ssh::HostTrust;
use std::collections::HashMap;

pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";
pub const DOCKER_HOST_FLAG: &str = "--docker-host";
pub const DOCKER_HOST_INHERIT: &str = "inherit";

/// Environment and extra pack flags needed to reach the chosen runtime.
///
/// The remote-socket flags only exist together with a `DOCKER_HOST` value,
/// so both are derived from the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationResult {
    docker_host: Option<String>,
}

impl ConfigurationResult {
    /// No extra environment, no extra flags.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Point pack at `docker_host` via `DOCKER_HOST` and `--docker-host inherit`.
    pub fn remote_socket(docker_host: impl Into<String>) -> Self {
        Self {
            docker_host: Some(docker_host.into()),
        }
    }

    pub fn docker_host(&self) -> Option<&str> {
        self.docker_host.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.docker_host.is_none()
    }

    /// Variables to overlay on the delegated process environment.
    pub fn envs(&self) -> HashMap<String, String> {
        self.docker_host
            .iter()
            .map(|host| (DOCKER_HOST_ENV.to_string(), host.clone()))
            .collect()
    }

    /// Flags appended after every user flag on the delegated command line.
    pub fn flags(&self) -> Vec<String> {
        match self.docker_host {
            Some(_) => vec![DOCKER_HOST_FLAG.to_string(), DOCKER_HOST_INHERIT.to_string()],
            None => Vec::new(),
        }
    }
}

/// How a runtime is made reachable on a given platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Default socket is already reachable.
    Passthrough,
    /// Rootless Podman socket activated through systemd.
    PodmanSystemSocket,
    /// Podman machine VM reached over SSH.
    PodmanMachine,
}

type StrategyKey = (RuntimeType, Os, Arch);

const STRATEGIES: &[(StrategyKey, Strategy)] = &[
    ((RuntimeType::Docker, Os::Darwin, Arch::Arm64), Strategy::Passthrough),
    ((RuntimeType::Docker, Os::Darwin, Arch::X64), Strategy::Passthrough),
    ((RuntimeType::Docker, Os::Linux, Arch::X64), Strategy::Passthrough),
    ((RuntimeType::Docker, Os::Linux, Arch::Arm64), Strategy::Passthrough),
    ((RuntimeType::Podman, Os::Linux, Arch::X64), Strategy::PodmanSystemSocket),
    ((RuntimeType::Podman, Os::Linux, Arch::Arm64), Strategy::PodmanSystemSocket),
    ((RuntimeType::Podman, Os::Darwin, Arch::Arm64), Strategy::PodmanMachine),
    ((RuntimeType::Podman, Os::Darwin, Arch::X64), Strategy::PodmanMachine),
];

/// Look up the strategy for an exact (runtime, os, arch) match.
pub fn strategy_for(runtime: RuntimeType, target: &Target) -> Option<Strategy> {
    let key = (runtime, target.os, target.arch);
    STRATEGIES
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, strategy)| *strategy)
}

/// Prepares the connection between pack and a container runtime.
pub struct Configurator<'a> {
    runner: &'a dyn CommandRunner,
    trust: &'a dyn HostTrust,
    sink: &'a dyn LogSink,
}

impl<'a> Configurator<'a> {
    pub fn new(runner: &'a dyn CommandRunner, trust: &'a dyn HostTrust, sink: &'a dyn LogSink) -> Self {
        Self {
            runner,
            trust,
            sink,
        }
    }

    /// Configure `runtime` for `target`.
    ///
    /// Recoverable problems are recorded in `diag` and yield an empty result;
    /// only failures that make the runtime unusable are returned as errors.
    pub async fn configure(
        &self,
        runtime: RuntimeType,
        target: &Target,
        diag: &mut Diagnostics,
    ) -> Result<ConfigurationResult, ConfigureError> {
        let Some(strategy) = strategy_for(runtime, target) else {
            diag.warn(Warning::unsupported_target(format!(
                "Building apps with paicku using {} on {} is not yet supported",
                runtime, target
            )));
            return Ok(ConfigurationResult::empty());
        };

        tracing::debug!(%runtime, %target, ?strategy, "configuring container runtime");

        match strategy {
            Strategy::Passthrough => Ok(ConfigurationResult::empty()),
            Strategy::PodmanSystemSocket => podman::configure_system_socket(self.runner).await,
            Strategy::PodmanMachine => {
                podman::configure_machine(self.runner, self.trust, self.sink, diag).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_no_env_or_flags() {
        let result = ConfigurationResult::empty();
        assert!(result.is_empty());
        assert!(result.envs().is_empty());
        assert!(result.flags().is_empty());
    }

    #[test]
    fn remote_socket_pairs_env_with_flags() {
        let result = ConfigurationResult::remote_socket("unix:///run/podman/podman.sock");
        assert_eq!(
            result.envs().get(DOCKER_HOST_ENV).map(String::as_str),
            Some("unix:///run/podman/podman.sock")
        );
        assert_eq!(result.flags(), vec!["--docker-host", "inherit"]);
    }

    #[test]
    fn architectures_share_strategies() {
        for arch in [Arch::X64, Arch::Arm64] {
            assert_eq!(
                strategy_for(RuntimeType::Podman, &Target::new(arch, Os::Darwin)),
                Some(Strategy::PodmanMachine)
            );
            assert_eq!(
                strategy_for(RuntimeType::Podman, &Target::new(arch, Os::Linux)),
                Some(Strategy::PodmanSystemSocket)
            );
            assert_eq!(
                strategy_for(RuntimeType::Docker, &Target::new(arch, Os::Linux)),
                Some(Strategy::Passthrough)
            );
        }
    }

    #[test]
    fn windows_and_exotic_arches_have_no_strategy() {
        assert_eq!(
            strategy_for(RuntimeType::Docker, &Target::new(Arch::X64, Os::Windows)),
            None
        );
        assert_eq!(
            strategy_for(RuntimeType::Podman, &Target::new(Arch::S390x, Os::Linux)),
            None
        );
    }
}
