#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use crate::prelude::{stdout_of, wait_until, Daemon};

#[test]
fn logs_tail_returns_recent_lines_in_order() {
    let daemon = Daemon::start();

    daemon
        .cli()
        .args([
            "start",
            "--name",
            "chatty",
            "/bin/sh",
            "-c",
            "for i in 1 2 3 4 5; do echo line-$i; done; sleep 5",
        ])
        .output()
        .expect("pm0 start runs");

    assert!(wait_until(
        || {
            let out = daemon
                .cli()
                .args(["logs", "chatty", "--lines", "10"])
                .output()
                .unwrap();
            stdout_of(&out).contains("line-5")
        },
        Duration::from_secs(3)
    ));

    let out = daemon
        .cli()
        .args(["logs", "chatty", "--lines", "2"])
        .output()
        .expect("pm0 logs runs");
    let text = stdout_of(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["line-4", "line-5"]);
}

#[test]
fn logs_clear_truncates_so_next_tail_is_empty() {
    let daemon = Daemon::start();

    daemon
        .cli()
        .args(["start", "--name", "noisy", "/bin/sh", "-c", "echo hello; sleep 5"])
        .output()
        .expect("pm0 start runs");

    assert!(wait_until(
        || {
            let out = daemon
                .cli()
                .args(["logs", "noisy", "--lines", "10"])
                .output()
                .unwrap();
            stdout_of(&out).contains("hello")
        },
        Duration::from_secs(3)
    ));

    let clear = daemon
        .cli()
        .args(["logs-clear", "noisy"])
        .output()
        .expect("pm0 logs-clear runs");
    assert!(clear.status.success());

    let out = daemon
        .cli()
        .args(["logs", "noisy", "--lines", "10"])
        .output()
        .expect("pm0 logs runs");
    assert!(stdout_of(&out).trim().is_empty());
}
