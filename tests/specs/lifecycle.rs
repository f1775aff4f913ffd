#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use crate::prelude::{stdout_of, wait_until, Daemon};

#[test]
fn start_then_stop_roundtrip() {
    let mut daemon = Daemon::start();

    let output = daemon
        .cli()
        .args(["start", "--name", "sleeper", "/bin/sleep", "30"])
        .output()
        .expect("pm0 start runs");
    assert!(output.status.success(), "{}", stdout_of(&output));
    let start_line = stdout_of(&output);
    assert!(start_line.contains("sleeper"));
    assert!(start_line.contains("RUNNING"));

    let list = daemon.cli().arg("list").output().expect("pm0 list runs");
    assert!(stdout_of(&list).contains("sleeper"));

    let stop = daemon
        .cli()
        .args(["stop", "sleeper"])
        .output()
        .expect("pm0 stop runs");
    assert!(stop.status.success());
    assert!(stdout_of(&stop).contains("STOPPED"));

    daemon.kill();
}

#[test]
fn unit_survives_daemon_restart_with_same_id_and_fresh_started_at() {
    let daemon = Daemon::start();

    let start = daemon
        .cli()
        .args(["start", "--name", "w", "/bin/sleep", "30"])
        .output()
        .expect("pm0 start runs");
    let first_line = stdout_of(&start);
    let first_id = first_line.split_whitespace().next().unwrap().to_string();
    let first_started_at = first_line
        .split("started_at=")
        .nth(1)
        .unwrap()
        .trim()
        .to_string();

    let (home, addr) = daemon.into_home();
    // A couple of seconds so a fresh `started_at` is distinguishable.
    std::thread::sleep(Duration::from_secs(2));
    let daemon2 = Daemon::start_at(home, addr);

    let list = daemon2.cli().arg("list").output().expect("pm0 list runs");
    let text = stdout_of(&list);
    assert!(text.contains(&first_id));
    assert!(text.contains('w'));
    assert!(text.contains("RUNNING"));
    assert!(!text.contains(&first_started_at));
}

#[test]
fn bulk_delete_all_except_leaves_the_excepted_unit_running() {
    let daemon = Daemon::start();

    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let out = daemon
            .cli()
            .args(["start", "--name", name, "/bin/sleep", "30"])
            .output()
            .expect("pm0 start runs");
        let id = stdout_of(&out).split_whitespace().next().unwrap().to_string();
        ids.push((name, id));
    }
    let keep_id = ids[1].1.clone();

    let delete = daemon
        .cli()
        .args(["delete", "all", "--except", &keep_id])
        .output()
        .expect("pm0 delete all runs");
    assert!(delete.status.success());

    let list = daemon.cli().arg("list").output().expect("pm0 list runs");
    let text = stdout_of(&list);
    assert!(text.contains('b'));
    assert!(!text.contains(" a "));
    assert!(!text.contains(" c "));

    assert!(wait_until(
        || {
            let out = daemon.cli().arg("list").output().unwrap();
            stdout_of(&out).lines().count() == 1
        },
        Duration::from_secs(2)
    ));
}
