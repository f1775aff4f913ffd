#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use crate::prelude::{stdout_of, wait_until, Daemon};

#[test]
fn failing_unit_is_auto_restarted_and_counts_the_restart() {
    let daemon = Daemon::start_with_env(&[("PM0_RESTART_DELAY_MS", "200")]);

    let start = daemon
        .cli()
        .args(["start", "--name", "flaky", "/bin/false"])
        .output()
        .expect("pm0 start runs");
    assert!(start.status.success(), "{}", stdout_of(&start));

    let restarted = wait_until(
        || {
            let out = daemon.cli().arg("list").output().unwrap();
            let text = stdout_of(&out);
            text.lines()
                .find(|l| l.contains("flaky"))
                .map(|l| !l.contains("restarts=0"))
                .unwrap_or(false)
        },
        Duration::from_secs(5),
    );
    assert!(restarted, "expected flaky unit to accumulate at least one restart");
}

#[test]
fn clean_exit_is_not_treated_as_failure_and_is_not_restarted() {
    let daemon = Daemon::start_with_env(&[("PM0_RESTART_DELAY_MS", "200")]);

    daemon
        .cli()
        .args(["start", "--name", "quitter", "/bin/sleep", "0"])
        .output()
        .expect("pm0 start runs");

    // Give the watcher a moment to observe the first natural exit, then
    // confirm it never flips back to RUNNING once settled as STOPPED/EXITED.
    std::thread::sleep(Duration::from_millis(600));

    let steady = wait_until(
        || {
            let out = daemon.cli().arg("list").output().unwrap();
            let text = stdout_of(&out);
            text.lines()
                .find(|l| l.contains("quitter"))
                .map(|l| !l.contains("RUNNING"))
                .unwrap_or(false)
        },
        Duration::from_secs(3),
    );
    assert!(steady, "unit that exits cleanly must not be treated as failed");
}
