use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("shellkit").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Interactive shell"))
        .stdout(predicate::str::contains("--escape-timeout-ms"));
}

#[test]
fn test_invalid_flag_value() {
    let mut cmd = Command::cargo_bin("shellkit").unwrap();
    cmd.args(["--history-size", "many"]);

    cmd.assert().failure().stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_piped_commands_run() {
    let mut cmd = Command::cargo_bin("shellkit").unwrap();
    cmd.write_stdin("echo piped-hello\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("piped-hello"));
}

#[test]
fn test_exit_code_is_propagated() {
    let mut cmd = Command::cargo_bin("shellkit").unwrap();
    cmd.write_stdin("exit 3\n");

    cmd.assert().code(3);
}

#[test]
fn test_unknown_command_reports_and_continues() {
    let mut cmd = Command::cargo_bin("shellkit").unwrap();
    cmd.write_stdin("shellkit-no-such-command-xyz\necho after\n");

    cmd.assert()
        .code(0)
        .stdout(predicate::str::contains("after"))
        .stderr(predicate::str::contains("command not found"));
}

#[test]
fn test_cd_changes_directory_for_later_commands() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("marker.txt"), "").unwrap();

    let mut cmd = Command::cargo_bin("shellkit").unwrap();
    cmd.write_stdin(format!("cd {}\nls\n", temp_dir.path().display()));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("marker.txt"));
}

#[test]
fn test_debug_log_written_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("debug.log");

    let mut cmd = Command::cargo_bin("shellkit").unwrap();
    cmd.env("SHELLKIT_DEBUG", "1")
        .env("SHELLKIT_DEBUG_FILE", &log_path)
        .write_stdin("exit 0\n");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("debug log enabled"));

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("shell started"), "{log}");
}
