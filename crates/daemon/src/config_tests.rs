use super::*;
use serial_test::serial;

#[test]
#[serial]
fn load_uses_pm0_home_override() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("PM0_HOME", dir.path());
    let config = Config::load().unwrap();
    std::env::remove_var("PM0_HOME");

    assert_eq!(config.data_root, dir.path());
    assert_eq!(config.db_path, dir.path().join("pm0_daemon.db"));
    assert_eq!(config.logs_dir, dir.path().join("logs"));
}

#[test]
fn unit_log_path_is_under_logs_dir() {
    let config = Config {
        data_root: "/home/u/.pm0".into(),
        db_path: "/home/u/.pm0/pm0_daemon.db".into(),
        logs_dir: "/home/u/.pm0/logs".into(),
        log_path: "/home/u/.pm0/daemon.log".into(),
        lock_path: "/home/u/.pm0/daemon.pid".into(),
        rpc_addr: "127.0.0.1:7777".into(),
    };
    assert_eq!(config.unit_log_path(42), std::path::PathBuf::from("/home/u/.pm0/logs/42.log"));
}
