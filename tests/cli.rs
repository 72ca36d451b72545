// ABOUTME: Integration tests for the paicku CLI commands.
// ABOUTME: Runs the binary against a pre-provisioned fake pack that echoes its argv.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;

fn paicku_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("paicku"))
}

#[test]
fn help_shows_commands() {
    paicku_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("sbom"))
        .stdout(predicate::str::contains("builder"));
}

#[test]
fn build_help_lists_container_runtime() {
    paicku_cmd()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--container-runtime"))
        .stdout(predicate::str::contains("podman"));
}

#[cfg(unix)]
mod with_fake_pack {
    use super::*;
    use support::write_executable;
    use tempfile::TempDir;

    /// Cache dir holding a fake pack, a settings file and a bin dir for PATH.
    struct Sandbox {
        root: TempDir,
    }

    impl Sandbox {
        fn new(pack_body: &str) -> Self {
            let root = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(root.path().join("cache")).unwrap();
            std::fs::create_dir_all(root.path().join("bin")).unwrap();
            std::fs::create_dir_all(root.path().join("work")).unwrap();
            std::fs::write(root.path().join("settings.yml"), "").unwrap();
            write_executable(&root.path().join("cache"), "pack", pack_body);
            Self { root }
        }

        fn bin(&self) -> std::path::PathBuf {
            self.root.path().join("bin")
        }

        fn cmd(&self, path: &std::ffi::OsStr) -> Command {
            let mut cmd = paicku_cmd();
            cmd.current_dir(self.root.path().join("work"))
                .env("PAICKU_CONFIG", self.root.path().join("settings.yml"))
                .env("PAICKU_CACHE_DIR", self.root.path().join("cache"))
                .env("PATH", path)
                .env_remove("RUST_LOG");
            cmd
        }

        fn path_with_system(&self) -> std::ffi::OsString {
            let system = std::env::var_os("PATH").unwrap_or_default();
            std::env::join_paths(
                std::iter::once(self.bin()).chain(std::env::split_paths(&system)),
            )
            .unwrap()
        }
    }

    #[test]
    fn inspect_forwards_argv_to_pack() {
        let sandbox = Sandbox::new("echo \"$@\"");
        sandbox
            .cmd(sandbox.bin().as_os_str())
            .args(["inspect", "buildpacksio/pack", "--bom"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "inspect buildpacksio/pack --bom --output human-readable",
            ));
    }

    #[test]
    fn builder_suggest_forwards_global_flags() {
        let sandbox = Sandbox::new("echo \"$@\"");
        sandbox
            .cmd(sandbox.bin().as_os_str())
            .args(["builder", "suggest", "--no-color", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""event":"output""#))
            .stdout(predicate::str::contains("builder suggest --no-color"));
    }

    #[test]
    fn pack_exit_code_and_stderr_are_propagated() {
        let sandbox = Sandbox::new("echo boom >&2\nexit 3");
        sandbox
            .cmd(sandbox.bin().as_os_str())
            .args(["sbom", "download", "img"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("boom"));
    }

    #[test]
    fn build_with_missing_explicit_runtime_fails() {
        let sandbox = Sandbox::new("echo \"$@\"");
        sandbox
            .cmd(sandbox.bin().as_os_str())
            .args(["build", "app", "--container-runtime", "podman"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("podman is not installed"));
    }

    #[test]
    fn build_without_any_runtime_fails() {
        let sandbox = Sandbox::new("echo \"$@\"");
        sandbox
            .cmd(sandbox.bin().as_os_str())
            .args(["build", "app"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("no available container runtime"));
    }

    #[test]
    fn build_with_docker_applies_defaults() {
        let sandbox = Sandbox::new("echo \"$@\"");
        write_executable(&sandbox.bin(), "docker", "exit 0");

        sandbox
            .cmd(&sandbox.path_with_system())
            .args(["build", "my-app", "--container-runtime", "docker", "-t", "extra:1"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "build my-app --builder paketocommunity/builder-ubi8-base",
            ))
            .stdout(predicate::str::contains("--tag extra:1"))
            .stdout(predicate::str::contains("container-runtime").not())
            .stderr(predicate::str::contains("You haven't specified a builder"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn build_prefers_podman_and_hands_its_socket_to_pack() {
        let sandbox = Sandbox::new("echo \"ARGS: $@\"\necho \"HOST: $DOCKER_HOST\"");
        write_executable(&sandbox.bin(), "docker", "exit 0");
        write_executable(
            &sandbox.bin(),
            "podman",
            "echo /run/user/1000/podman/podman.sock",
        );
        write_executable(&sandbox.bin(), "systemctl", "exit 0");

        sandbox
            .cmd(sandbox.bin().as_os_str())
            .env_remove("DOCKER_HOST")
            .args(["build", "img", "-t", "x:1", "--timestamps"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "--tag x:1 --timestamps --docker-host inherit\n",
            ))
            .stdout(predicate::str::contains(
                "HOST: unix:///run/user/1000/podman/podman.sock",
            ))
            .stderr(predicate::str::contains(
                "You haven't specified a container runtime, using the: podman",
            ));
    }
}
