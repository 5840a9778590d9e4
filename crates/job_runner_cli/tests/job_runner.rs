pub mod common;

use std::fs::read_to_string;
use std::path::PathBuf;

use assert_cmd::Command;
use indoc::indoc;
use predicates::prelude::*;
use tempfile::tempdir;

use crate::common::{placement, scenario, write_scenario};

fn command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_job_runner_cli"))
}

#[test]
fn runs_job_to_completion() {
    // given
    let temp_dir = tempdir().unwrap();
    let scenario_path = write_scenario(
        &temp_dir,
        &scenario(
            vec![placement("R1", "P1", 5.0, 10.0), placement("R2", "P1", 10.0, 10.0)],
            vec![],
        ),
    );

    // and
    let expected_output = indoc! {"
        Job loaded. job: job_1
        Job state changed. state: Loaded
        Job state changed. state: Running
        Board processing started. board: board_1
        Part processing started. board: board_1, placement: R1
        Part picked. board: board_1, placement: R1
        Part placed. board: board_1, placement: R1, pose: (x: 5.000, y: 10.000, z: 0.500, rotation: 0.000)
        Part processing completed. board: board_1, placement: R1
        Status. Processed 1 of 2 placements. placed: 1, skipped: 0
        Part processing started. board: board_1, placement: R2
        Part picked. board: board_1, placement: R2
        Part placed. board: board_1, placement: R2, pose: (x: 10.000, y: 10.000, z: 0.500, rotation: 0.000)
        Part processing completed. board: board_1, placement: R2
        Status. Processed 2 of 2 placements. placed: 2, skipped: 0
        Job state changed. state: Stopped
        Job finished. state: Stopped, placed: 2, skipped: 0, total: 2
    "};

    // when
    let assert = command()
        .args(["--scenario", scenario_path.to_str().unwrap()])
        .assert();

    // then
    assert
        .success()
        .stdout(expected_output);
}

#[test]
fn skips_failed_pick_when_requested() {
    // given
    let temp_dir = tempdir().unwrap();
    let scenario_path = write_scenario(
        &temp_dir,
        &scenario(
            vec![placement("R1", "P1", 5.0, 10.0), placement("R2", "P1", 10.0, 10.0)],
            vec![false],
        ),
    );

    // when
    let assert = command()
        .args(["--scenario", scenario_path.to_str().unwrap(), "--on-pick-failure", "skip"])
        .assert();

    // then
    assert
        .success()
        .stdout(predicate::str::contains("Part skipped. board: board_1, placement: R1"))
        .stdout(predicate::str::contains(
            "Job finished. state: Stopped, placed: 1, skipped: 1, total: 2",
        ));
}

#[test]
fn retries_failed_picks_by_default() {
    // given
    let temp_dir = tempdir().unwrap();
    let scenario_path = write_scenario(
        &temp_dir,
        &scenario(vec![placement("R1", "P1", 5.0, 10.0)], vec![false, false]),
    );

    // when
    let assert = command()
        .args(["--scenario", scenario_path.to_str().unwrap()])
        .assert();

    // then
    assert
        .success()
        .stdout(predicate::str::contains("Part skipped").not())
        .stdout(predicate::str::contains(
            "Job finished. state: Stopped, placed: 1, skipped: 0, total: 1",
        ));
}

#[test]
fn max_pick_attempts_from_command_line() {
    // given
    let temp_dir = tempdir().unwrap();
    let scenario_path = write_scenario(
        &temp_dir,
        &scenario(vec![placement("R1", "P1", 5.0, 10.0)], vec![false, false]),
    );

    // when
    let assert = command()
        .args([
            "--scenario",
            scenario_path.to_str().unwrap(),
            "--max-pick-attempts",
            "2",
        ])
        .assert();

    // then
    assert
        .success()
        .stdout(predicate::str::contains(
            "Job finished. state: Stopped, placed: 0, skipped: 1, total: 1",
        ));
}

#[test]
fn aborts_on_failed_pick_when_requested() {
    // given
    let temp_dir = tempdir().unwrap();
    let scenario_path = write_scenario(
        &temp_dir,
        &scenario(
            vec![placement("R1", "P1", 5.0, 10.0), placement("R2", "P1", 10.0, 10.0)],
            vec![false],
        ),
    );

    // when
    let assert = command()
        .args(["--scenario", scenario_path.to_str().unwrap(), "--on-pick-failure", "abort"])
        .assert();

    // then
    assert
        .failure()
        .stdout(predicate::str::contains("Job encountered error. error: PickError"))
        .stdout(predicate::str::contains("Job state changed. state: Error"))
        .stdout(predicate::str::contains("Part placed").not())
        .stderr(predicate::str::contains("Job failed"));
}

#[test]
fn rejects_invalid_job() {
    // given
    let temp_dir = tempdir().unwrap();
    let scenario_path = write_scenario(
        &temp_dir,
        &scenario(
            vec![placement("R1", "P1", 5.0, 10.0), placement("R2", "P9", 10.0, 10.0)],
            vec![],
        ),
    );

    // when
    let assert = command()
        .args(["--scenario", scenario_path.to_str().unwrap()])
        .assert();

    // then
    assert
        .failure()
        .stdout(predicate::str::contains("Job loaded").not())
        .stderr(predicate::str::contains("Unknown part. placement: R2, part: P9"));
}

#[test]
fn missing_scenario_file() {
    // given
    let temp_dir = tempdir().unwrap();
    let mut scenario_path = PathBuf::from(temp_dir.path());
    scenario_path.push("missing.json");

    // when
    let assert = command()
        .args(["--scenario", scenario_path.to_str().unwrap()])
        .assert();

    // then
    assert
        .failure()
        .stderr(predicate::str::contains("Unable to open scenario"));
}

#[test]
fn writes_trace_log() {
    // given
    let temp_dir = tempdir().unwrap();
    let scenario_path = write_scenario(&temp_dir, &scenario(vec![placement("R1", "P1", 5.0, 10.0)], vec![]));

    let mut trace_log_path = PathBuf::from(temp_dir.path());
    trace_log_path.push("trace.log");

    // when
    let assert = command()
        .args([
            "--scenario",
            scenario_path.to_str().unwrap(),
            "--trace",
            trace_log_path.to_str().unwrap(),
        ])
        .assert();

    // then
    assert.success();

    let trace_content = read_to_string(&trace_log_path).unwrap();
    assert!(trace_content.contains("Job loaded. job: job_1, placements: 1"));
    assert!(trace_content.contains("Placed. placement: R1"));
}

#[test]
fn arguments_from_file() {
    // given
    let temp_dir = tempdir().unwrap();
    let scenario_path = write_scenario(&temp_dir, &scenario(vec![placement("R1", "P1", 5.0, 10.0)], vec![false]));

    let mut args_path = PathBuf::from(temp_dir.path());
    args_path.push("args.txt");
    std::fs::write(
        &args_path,
        format!(
            "--scenario\n{}\n--on-pick-failure\nskip\n",
            scenario_path.to_str().unwrap()
        ),
    )
    .unwrap();

    // when
    let assert = command()
        .arg(format!("@{}", args_path.to_str().unwrap()))
        .assert();

    // then
    assert
        .success()
        .stdout(predicate::str::contains(
            "Job finished. state: Stopped, placed: 0, skipped: 1, total: 1",
        ));
}
