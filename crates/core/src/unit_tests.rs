use super::*;

fn model(env: &[&str]) -> UnitModel {
    let mut m = UnitModel::new(
        "w".into(),
        "/tmp".into(),
        "/bin/sh".into(),
        vec!["-c".into(), "sleep 100".into()],
        env.iter().map(|s| s.to_string()).collect(),
    );
    m.id = 1;
    m
}

#[test]
fn command_string_joins_bin_and_args() {
    let m = model(&[]);
    assert_eq!(m.command_string(), "/bin/sh -c sleep 100");
}

#[test]
fn command_string_with_no_args() {
    let m = UnitModel::new("w".into(), "/tmp".into(), "/bin/true".into(), vec![], vec![]);
    assert_eq!(m.command_string(), "/bin/true");
}

#[test]
fn env_pairs_parses_key_value() {
    let m = model(&["A=1", "B=two"]);
    assert_eq!(
        m.env_pairs(),
        vec![("A".to_string(), "1".to_string()), ("B".to_string(), "two".to_string())]
    );
}

#[test]
fn env_pairs_skips_malformed_entries() {
    let m = model(&["NOEQUALS"]);
    assert!(m.env_pairs().is_empty());
}

#[test]
fn merge_env_adds_new_key() {
    let mut m = model(&["A=1"]);
    m.merge_env(&["B=2".to_string()]);
    assert_eq!(m.env_pairs(), vec![("A".into(), "1".into()), ("B".into(), "2".into())]);
}

#[test]
fn merge_env_replaces_existing_key() {
    let mut m = model(&["A=1"]);
    m.merge_env(&["A=2".to_string()]);
    assert_eq!(m.env_pairs(), vec![("A".into(), "2".into())]);
}

#[test]
fn merge_env_empty_value_deletes_key() {
    let mut m = model(&["A=1", "B=2"]);
    m.merge_env(&["A=".to_string()]);
    assert_eq!(m.env_pairs(), vec![("B".into(), "2".into())]);
}

#[test]
fn merge_env_splits_on_first_equals_only() {
    let mut m = model(&[]);
    m.merge_env(&["URL=http://a=b".to_string()]);
    assert_eq!(m.env_pairs(), vec![("URL".into(), "http://a=b".into())]);
}
