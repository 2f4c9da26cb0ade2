#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("PLANNER_CONFIG")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_reports_next_occurrence() {
    run_cli(
        "today 2024-03-01\nadd 1 2024-01-01 home Change filters\nrecur 1 annual month=6\nnext 1\nquit\n",
    )
    .success()
    .stdout(str_contains("Task 1 repeats annual in June."))
    .stdout(str_contains("Next occurrence of 1: 2024-06-01"));
}

#[test]
fn cli_rejects_invalid_recurrence() {
    run_cli("add 1 2024-01-01 - Walk dog\nrecur 1 weekly days=9\nquit\n")
        .success()
        .stdout(str_contains("daysOfWeek entry 9 is outside 0-6"));
}

#[test]
fn cli_delete_command_removes_task() {
    run_cli("add 1 2024-01-01 - TaskA\nadd 2 2024-01-02 - TaskB\ndelete 2\ndelete 2\nquit\n")
        .success()
        .stdout(str_contains("Deleted task 2."))
        .stdout(str_contains("Task 2 not found."));
}

#[test]
fn cli_upcoming_and_plan_views() {
    let script = "today 2024-02-01\n\
        add trash 2024-01-01 - Take out trash\n\
        recur trash weekly days=2\n\
        add hvac 2024-01-15 - Replace HVAC filter\n\
        recur hvac quarterly\n\
        upcoming\n\
        plan\n\
        quit\n";
    let assert = run_cli(script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("| 2024-02-06 | trash"), "{output}");
    assert!(output.contains("== Next Month (March 2024) =="), "{output}");
    assert!(output.contains("== April (April 2024) =="), "{output}");
    assert!(output.contains("2024-04-15  hvac  Replace HVAC filter"), "{output}");
}

#[test]
fn cli_done_reschedules_recurring_tasks() {
    run_cli(
        "today 2024-01-20\nadd hvac 2024-01-15 - Replace filter\nrecur hvac quarterly\ndone hvac\nadd x 2024-01-20 - One off\ndone x\nquit\n",
    )
    .success()
    .stdout(str_contains("Task hvac rescheduled to 2024-04-15."))
    .stdout(str_contains("Task x completed."));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "add 1 2024-01-01 - TaskPersist\nsave json {}\nadd 2 2024-01-01 - Temp\nload json {}\nlist\nquit\n",
        path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        output.contains("Tasks loaded from"),
        "expected output to mention load completion"
    );
    let after_reload = output
        .split("Tasks loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("TaskPersist"));
    assert!(
        !after_reload.contains("Temp"),
        "temporary task should not appear after reload:\n{}",
        after_reload
    );
}

#[test]
fn cli_save_and_load_csv_keeps_recurrence() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "today 2024-03-01\nadd 1 2024-01-01 - Flip mattress\nrecur 1 seasonal months=3,9\nsave csv {}\ndelete 1\nload csv {}\nnext 1\nquit\n",
        path, path
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Next occurrence of 1: 2024-09-01"));
}

#[test]
fn cli_plan_rejects_oversized_boards() {
    run_cli("plan 4294967295\nplan 2\nquit\n")
        .success()
        .stdout(str_contains("At most 120 months can be planned"))
        .stdout(str_contains("== Next Month"));
}
