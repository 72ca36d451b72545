// ABOUTME: Integration tests for the streaming process runner.
// ABOUTME: Exercises stdout forwarding, stderr buffering, exit codes and the env overlay.

#![cfg(unix)]

mod support;

use paicku::process::{self, ProcessError};
use std::collections::HashMap;
use std::path::Path;
use support::RecordingSink;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[tokio::test]
async fn stdout_reaches_sink_and_success_is_reported() {
    support::init_tracing();
    let sink = RecordingSink::default();

    let outcome = process::run(Path::new("sh"), &sh("printf A"), &HashMap::new(), &sink)
        .await
        .unwrap();

    assert!(outcome.success());
    assert_eq!(sink.text(), "A");
    assert!(outcome.stderr.is_empty());
}

#[tokio::test]
async fn stderr_is_buffered_with_exit_code() {
    let sink = RecordingSink::default();

    let outcome = process::run(
        Path::new("sh"),
        &sh("printf B >&2; exit 2"),
        &HashMap::new(),
        &sink,
    )
    .await
    .unwrap();

    assert_eq!(outcome.exit_code, 2);
    assert_eq!(outcome.stderr, "B");
    assert_eq!(sink.text(), "");

    let err = outcome.into_result("sh").unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(matches!(err, ProcessError::NonZeroExit { ref stderr, .. } if stderr == "B"));
}

#[tokio::test]
async fn env_overlay_is_visible_to_child_only() {
    let sink = RecordingSink::default();
    let envs = HashMap::from([(
        "DOCKER_HOST".to_string(),
        "unix:///run/podman/podman.sock".to_string(),
    )]);

    process::run(Path::new("sh"), &sh("printf \"$DOCKER_HOST\""), &envs, &sink)
        .await
        .unwrap();

    assert_eq!(sink.text(), "unix:///run/podman/podman.sock");
    assert_ne!(
        std::env::var("DOCKER_HOST").ok().as_deref(),
        Some("unix:///run/podman/podman.sock")
    );
}

#[tokio::test]
async fn interleaved_streams_do_not_deadlock() {
    let sink = RecordingSink::default();
    // More than a pipe buffer on both streams
    let script = "i=0; while [ $i -lt 2000 ]; do echo out-line-$i; echo err-line-$i >&2; i=$((i+1)); done";

    let outcome = process::run(Path::new("sh"), &sh(script), &HashMap::new(), &sink)
        .await
        .unwrap();

    assert!(outcome.success());
    assert_eq!(sink.text().lines().count(), 2000);
    assert_eq!(outcome.stderr.lines().count(), 2000);
}

#[tokio::test]
async fn missing_executable_is_a_spawn_error() {
    let sink = RecordingSink::default();
    let err = process::run(
        Path::new("/nonexistent/pack"),
        &[],
        &HashMap::new(),
        &sink,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ProcessError::Spawn { .. }));
    assert_eq!(err.exit_code(), 1);
}
