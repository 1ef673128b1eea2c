//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("TALLY_CHAR_LIMIT")
        .env_remove("TALLY_EXCLUDE_SPACES")
        .env_remove("TALLY_QUIET_PERIOD_MS");
    cmd
}

/// Run with `--json`, feeding `stdin`, and parse stdout.
fn json_output(args: &[&str], stdin: &str) -> Value {
    let output = cmd()
        .args(args)
        .arg("--json")
        .write_stdin(stdin)
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn long_help_lists_environment_variables() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("TALLY_CHAR_LIMIT"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let json = json_output(&["info"], "");
    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["config"]["quiet_period_ms"], 400);
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}

// =============================================================================
// Stats Command
// =============================================================================

#[test]
fn stats_counts_stdin() {
    let json = json_output(&["stats"], "Hello world. How are you?");
    assert_eq!(json["metrics"]["char_count"], 25);
    assert_eq!(json["metrics"]["word_count"], 5);
    assert_eq!(json["metrics"]["sentence_count"], 2);
    assert_eq!(json["metrics"]["reading_time_minutes"], 1);
    assert_eq!(json["limit"]["status"], "unlimited");
}

#[test]
fn stats_exclude_spaces_skips_whitespace() {
    let json = json_output(&["stats", "--exclude-spaces"], "Hello world");
    assert_eq!(json["metrics"]["char_count"], 10);
    assert_eq!(json["exclude_spaces"], true);
}

#[test]
fn stats_reads_file_argument() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("input.txt");
    std::fs::write(&path, "Hello, HELLO!").unwrap();

    let json = json_output(&["stats", path.to_str().unwrap()], "");
    assert_eq!(json["density"]["state"], "populated");
    assert_eq!(json["density"]["entries"][0]["letter"], "L");
    assert_eq!(json["density"]["entries"][0]["percentage"], 40.0);
}

#[test]
fn stats_text_output_has_labels() {
    cmd()
        .arg("stats")
        .write_stdin("One two three.")
        .assert()
        .success()
        .stdout(predicate::str::contains("Characters"))
        .stdout(predicate::str::contains("Reading time"))
        .stdout(predicate::str::contains("Letter density"));
}

#[test]
fn stats_blank_input_shows_empty_density() {
    cmd()
        .arg("stats")
        .write_stdin("   ")
        .assert()
        .success()
        .stdout(predicate::str::contains("No characters found"));
}

#[test]
fn stats_fails_when_limit_reached() {
    cmd()
        .args(["stats", "--limit", "11"])
        .write_stdin("Hello world")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Limit reached! You've typed 11 characters out of 11.",
        ));
}

#[test]
fn stats_within_limit_succeeds() {
    let json = json_output(&["stats", "--limit", "50"], "Hello world");
    assert_eq!(json["limit"]["status"], "within");
    assert_eq!(json["limit"]["limit"], 50);
}

#[test]
fn stats_non_numeric_limit_means_no_limit() {
    let json = json_output(&["stats", "--limit", "abc"], "Hello world");
    assert_eq!(json["limit"]["status"], "unlimited");
}

#[test]
fn stats_json_reports_reached_limit_without_failing() {
    let json = json_output(&["stats", "--limit", "5"], "Hello world");
    assert_eq!(json["limit"]["status"], "reached");
}

#[test]
fn stats_missing_file_fails() {
    cmd()
        .args(["stats", "/nonexistent/tally/input.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// =============================================================================
// Density Command
// =============================================================================

#[test]
fn density_shows_top_five_with_more_flag() {
    let json = json_output(&["density"], "abcdefg");
    assert_eq!(json["entries"].as_array().unwrap().len(), 5);
    assert_eq!(json["has_more"], true);
}

#[test]
fn density_all_letters_shows_everything() {
    let json = json_output(&["density", "--all-letters"], "abcdefg");
    assert_eq!(json["entries"].as_array().unwrap().len(), 7);
    assert_eq!(json["has_more"], true);
}

#[test]
fn density_text_output_shows_hint() {
    cmd()
        .arg("density")
        .write_stdin("abcdefg")
        .assert()
        .success()
        .stdout(predicate::str::contains("more letters available"));
}

// =============================================================================
// Watch Command
// =============================================================================

/// Run `watch --json` and parse each output line.
fn watch_events(args: &[&str], stdin: &str) -> Vec<Value> {
    let output = cmd()
        .args(["watch", "--json", "--quiet-period", "20"])
        .args(args)
        .write_stdin(stdin)
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("invalid JSON line"))
        .collect()
}

#[test]
fn watch_settles_after_input_closes() {
    let events = watch_events(&[], "Hello world\n");
    let last = events.last().expect("at least one update");
    assert_eq!(last["kind"], "settled");
    assert_eq!(last["metrics"]["char_count"], 12);
    assert_eq!(last["metrics"]["word_count"], 2);
}

#[test]
fn watch_theme_toggle_emits_redisplay() {
    let events = watch_events(&[], ":theme\n");
    assert_eq!(events[0]["kind"], "redisplay");
    assert_eq!(events[0]["flags"]["light_theme"], true);
}

#[test]
fn watch_rejects_lines_over_limit() {
    cmd()
        .args(["watch", "--json", "--quiet-period", "20", "--limit", "5"])
        .write_stdin("Hello world\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("line rejected"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    // arg_required_else_help makes clap print help to stderr and exit 2
    cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure();
}
