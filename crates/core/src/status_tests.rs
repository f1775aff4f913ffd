use super::*;

#[yare::parameterized(
    running_not_exited       = { None,     false, UnitStatus::Running },
    exited_zero               = { Some(0),  false, UnitStatus::Exited },
    exited_nonzero            = { Some(1),  false, UnitStatus::Failed },
    exited_large_code         = { Some(127),false, UnitStatus::Failed },
    signaled                  = { Some(-1), false, UnitStatus::Stopped },
    explicit_stop_not_exited  = { None,     true,  UnitStatus::Stopped },
    explicit_stop_and_exited  = { Some(0),  true,  UnitStatus::Stopped },
    stop_wins_over_failure    = { Some(1),  true,  UnitStatus::Stopped },
)]
fn derive(exit_code: Option<i32>, stopped: bool, expected: UnitStatus) {
    assert_eq!(UnitStatus::derive(exit_code, stopped), expected);
}

#[test]
fn wire_discriminants_match_spec() {
    assert_eq!(UnitStatus::Running as u32, 0);
    assert_eq!(UnitStatus::Exited as u32, 1);
    assert_eq!(UnitStatus::Failed as u32, 2);
    assert_eq!(UnitStatus::Stopped as u32, 3);
}
