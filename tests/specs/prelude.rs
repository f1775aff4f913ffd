//! Test helpers for black-box `pm0`/`pm0d` specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

use assert_cmd::cargo::cargo_bin;

const READY_TIMEOUT: Duration = Duration::from_secs(5);

/// A running `pm0d` instance bound to a throwaway data root and port,
/// killed when dropped.
pub struct Daemon {
    child: Child,
    home: tempfile::TempDir,
    addr: String,
}

impl Daemon {
    pub fn start() -> Self {
        Self::start_with_env(&[])
    }

    pub fn start_with_env(extra_env: &[(&str, &str)]) -> Self {
        let home = tempfile::tempdir().expect("tempdir");
        let addr = format!("127.0.0.1:{}", pick_port());
        Self::spawn_at(home, addr, extra_env)
    }

    /// Start a daemon against a pre-existing home directory and fixed
    /// address, for scenarios that kill and relaunch against the same
    /// persisted state.
    pub fn start_at(home: tempfile::TempDir, addr: String) -> Self {
        Self::spawn_at(home, addr, &[])
    }

    fn spawn_at(home: tempfile::TempDir, addr: String, extra_env: &[(&str, &str)]) -> Self {
        let mut cmd = Command::new(cargo_bin("pm0d"));
        cmd.env("PM0_HOME", home.path())
            .env("PM0_DAEMON_ADDR", &addr)
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        for (key, value) in extra_env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().expect("spawn pm0d");
        wait_for_ready(&mut child);

        Self { child, home, addr }
    }

    /// A `pm0` CLI command pre-wired to talk to this daemon.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("pm0"));
        cmd.env("PM0_HOME", self.home.path());
        cmd.env("PM0_DAEMON_ADDR", &self.addr);
        cmd
    }

    pub fn home_path(&self) -> &std::path::Path {
        self.home.path()
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    /// Kill this daemon and hand back its home directory and address so a
    /// fresh daemon can be relaunched against the same persisted state.
    pub fn into_home(mut self) -> (tempfile::TempDir, String) {
        self.kill();
        let home = std::mem::replace(&mut self.home, tempfile::tempdir().expect("tempdir"));
        (home, self.addr.clone())
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn wait_for_ready(child: &mut Child) {
    let stdout = child.stdout.take().expect("piped stdout");
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        let _ = reader.read_line(&mut line);
        let _ = tx.send(line);
    });

    match rx.recv_timeout(READY_TIMEOUT) {
        Ok(line) if line.trim() == "READY" => {}
        Ok(other) => panic!("pm0d printed unexpected startup line: {other:?}"),
        Err(_) => panic!("pm0d did not print READY within {READY_TIMEOUT:?}"),
    }
}

/// Bind an ephemeral port and immediately release it so `pm0d` can bind
/// the same one; good enough for single-threaded test isolation.
fn pick_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .expect("local addr")
        .port()
}

pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn wait_until(mut predicate: impl FnMut() -> bool, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    loop {
        if predicate() {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}
