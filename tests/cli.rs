//! Runs the `pivot` binary end to end.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Start `pivot` with an isolated config dir and a stdin pipe that stays open.
fn pivot(config_home: &Path, args: &[&str]) -> Child {
    Command::new(env!("CARGO_BIN_EXE_pivot"))
        .args(args)
        .env("HOME", config_home)
        .env("XDG_CONFIG_HOME", config_home)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn wait_with_deadline(child: &mut Child, deadline: Duration) -> Option<std::process::ExitStatus> {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    let _ = child.kill();
    let _ = child.wait();
    None
}

#[test]
fn simulate_exits_while_stdin_is_open() {
    let home = TempDir::new().unwrap();
    let mut child = pivot(home.path(), &["simulate", "--seconds", "0.3", "--tick-ms", "10"]);
    // Held so the pipe is never closed from this end.
    let _stdin = child.stdin.take();

    let status = wait_with_deadline(&mut child, Duration::from_secs(10))
        .expect("pivot kept running after the simulation ended");
    assert!(status.success());
}

#[test]
fn replay_prints_final_label_while_stdin_is_open() {
    let home = TempDir::new().unwrap();
    let recording = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/crates/pivot-motion/tests/data/upright_turn.txt"
    );
    let mut child = pivot(home.path(), &["replay", recording, "--tick-ms", "1"]);
    let _stdin = child.stdin.take();

    let status = wait_with_deadline(&mut child, Duration::from_secs(10))
        .expect("pivot kept running after the recording ended");
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().last(), Some("1 rotation right"));
}

#[test]
fn first_run_seeds_the_config_file() {
    let home = TempDir::new().unwrap();
    let mut child = pivot(home.path(), &["simulate", "--seconds", "0"]);
    let _stdin = child.stdin.take();

    let status = wait_with_deadline(&mut child, Duration::from_secs(10))
        .expect("pivot kept running with nothing to simulate");
    assert!(status.success());
    assert!(home.path().join("pivot/config.toml").exists());
}
