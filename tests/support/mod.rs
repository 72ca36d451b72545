// ABOUTME: Test support utilities.
// ABOUTME: Scripted command runner, fake SSH trust, recording log sink and tracing setup.

#![allow(dead_code)]

use async_trait::async_trait;
use paicku::process::{CommandOutput, CommandRunner, LogSink, ProcessError, ProcessOutcome};
use paicku::ssh::{self, HostTrust};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("paicku=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Collects every chunk forwarded to it.
#[derive(Default)]
pub struct RecordingSink {
    chunks: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn text(&self) -> String {
        self.chunks.lock().concat()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, chunk: &str) {
        self.chunks.lock().push(chunk.to_string());
    }
}

/// CommandRunner that answers from a script keyed by the full command line.
///
/// Unscripted commands fail to spawn, as if the program were missing.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, command: &str, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandOutput {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn output(
        &self,
        program: &str,
        args: &[&str],
    ) -> paicku::process::Result<CommandOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().push(line.clone());

        self.responses
            .get(&line)
            .cloned()
            .ok_or_else(|| ProcessError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
            })
    }
}

/// HostTrust double with configurable outcomes.
pub struct FakeTrust {
    known: bool,
    agent_available: bool,
    seed_exit_code: Option<i32>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeTrust {
    fn default() -> Self {
        Self {
            known: false,
            agent_available: true,
            seed_exit_code: Some(0),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeTrust {
    /// The host key is already in known_hosts.
    pub fn known() -> Self {
        Self {
            known: true,
            ..Self::default()
        }
    }

    /// No ssh-agent to register the identity with.
    pub fn without_agent() -> Self {
        Self {
            agent_available: false,
            ..Self::default()
        }
    }

    /// Seeding connects and `exit` returns `code`.
    pub fn seed_exit(code: i32) -> Self {
        Self {
            seed_exit_code: Some(code),
            ..Self::default()
        }
    }

    /// Seeding cannot connect at all.
    pub fn seed_unreachable() -> Self {
        Self {
            seed_exit_code: None,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl HostTrust for FakeTrust {
    async fn register_identity(&self, identity: &Path) -> ssh::Result<()> {
        self.calls
            .lock()
            .push(format!("register {}", identity.display()));
        if self.agent_available {
            Ok(())
        } else {
            Err(ssh::Error::AgentUnavailable("SSH_AUTH_SOCK not set".into()))
        }
    }

    fn is_known_host(&self, host: &str, port: u16) -> ssh::Result<bool> {
        self.calls.lock().push(format!("lookup [{host}]:{port}"));
        Ok(self.known)
    }

    async fn seed_known_host(
        &self,
        host: &str,
        port: u16,
        user: &str,
        _identity: &Path,
        sink: &dyn LogSink,
    ) -> ssh::Result<ProcessOutcome> {
        self.calls.lock().push(format!("seed {user}@{host}:{port}"));
        match self.seed_exit_code {
            Some(0) => {
                sink.log("connected\n");
                Ok(ProcessOutcome {
                    exit_code: 0,
                    stderr: String::new(),
                })
            }
            Some(code) => Ok(ProcessOutcome {
                exit_code: code,
                stderr: "Permission denied (publickey)".to_string(),
            }),
            None => Err(ssh::Error::Connection("connection refused".into())),
        }
    }
}

/// Write an executable shell script named `name` into `dir`.
#[cfg(unix)]
pub fn write_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
