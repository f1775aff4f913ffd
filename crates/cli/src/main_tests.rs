use super::*;

fn unit(id: u64, name: &str) -> UnitWire {
    UnitWire {
        id,
        name: name.to_string(),
        pid: Some(100 + id as u32),
        status: 0,
        restarts_count: 0,
        started_at: 1_700_000_000,
    }
}

#[test]
fn resolve_id_accepts_numeric_id() {
    let units = vec![unit(1, "web"), unit(2, "worker")];
    assert_eq!(resolve_id("2", &units), Ok(2));
}

#[test]
fn resolve_id_accepts_name() {
    let units = vec![unit(1, "web"), unit(2, "worker")];
    assert_eq!(resolve_id("worker", &units), Ok(2));
}

#[test]
fn resolve_id_rejects_unknown_id() {
    let units = vec![unit(1, "web")];
    assert!(resolve_id("99", &units).is_err());
}

#[test]
fn resolve_id_rejects_unknown_name() {
    let units = vec![unit(1, "web")];
    assert!(resolve_id("ghost", &units).is_err());
}

#[test]
fn resolve_ids_maps_every_target() {
    let units = vec![unit(1, "web"), unit(2, "worker")];
    assert_eq!(resolve_ids(&["web".to_string(), "2".to_string()], &units), Ok(vec![1, 2]));
}

#[test]
fn status_name_covers_all_wire_codes() {
    assert_eq!(status_name(0), "RUNNING");
    assert_eq!(status_name(1), "EXITED");
    assert_eq!(status_name(2), "FAILED");
    assert_eq!(status_name(3), "STOPPED");
}

#[test]
fn format_unit_renders_none_for_missing_pid() {
    let mut u = unit(5, "idle");
    u.pid = None;
    u.status = 1;
    assert!(format_unit(&u).contains("pid=None"));
}
