//! Integration tests for the expenses engine CLI.
//!
//! These tests run the actual binaries and verify output against expected
//! text files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given ledger file and return stdout
fn run_engine(input_file: &str) -> String {
    let mut cmd = Command::cargo_bin("expenses-engine").unwrap();
    let assert = cmd.arg(input_file).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Normalize output for comparison (trim whitespace, drop empty lines)
fn normalize(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn assert_matches_expected(sample: &str, expected: &str) {
    let output = run_engine(&test_data_path(sample));
    let expected = fs::read_to_string(test_data_path(expected)).unwrap();
    assert_eq!(normalize(&output), normalize(&expected));
}

#[test]
fn test_sample_household() {
    assert_matches_expected("sample_household.ledger", "expected_household.txt");
}

#[test]
fn test_sample_two_person() {
    assert_matches_expected("sample_two_person.ledger", "expected_two_person.txt");
}

#[test]
fn test_sample_gap_fill_produces_no_debt() {
    assert_matches_expected("sample_gap_fill.ledger", "expected_gap_fill.txt");
}

#[test]
fn test_sample_rounding_tip() {
    assert_matches_expected("sample_rounding.ledger", "expected_rounding.txt");
}

#[test]
fn test_reads_stdin_without_argument() {
    let mut cmd = Command::cargo_bin("expenses-engine").unwrap();
    cmd.write_stdin(
        "START 2024-01-01 alice\n\
         START 2024-01-01 bob\n\
         BUY 2024-01-15 bob 7.00 detergent\n",
    )
    .assert()
    .success()
    .stdout("alice owes bob 3.50€\n");
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("expenses-engine").unwrap();
    cmd.arg("nonexistent.ledger")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_unrecognized_operation_is_fatal() {
    let mut cmd = Command::cargo_bin("expenses-engine").unwrap();
    cmd.write_stdin("LEND 2024-01-01 alice 5.00\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unrecognized operation"));
}

#[test]
fn test_unknown_person_is_fatal_with_line_number() {
    let mut cmd = Command::cargo_bin("expenses-engine").unwrap();
    cmd.write_stdin(
        "START 2024-01-01 alice\n\
         TRANSFER 2024-01-02 alice bob 5.00\n",
    )
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("line 2").and(predicate::str::contains("bob")));
}

#[test]
fn test_purchase_with_nobody_obligated_is_fatal() {
    let mut cmd = Command::cargo_bin("expenses-engine").unwrap();
    cmd.write_stdin(
        "START 2024-01-01 alice\n\
         STOP 2024-01-10 alice\n\
         BUY 2024-01-15 alice 10.00\n",
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("nobody is obligated"));
}

#[test]
fn test_debug_logging_does_not_change_output() {
    let plain = {
        let mut cmd = Command::cargo_bin("expenses-engine").unwrap();
        let assert = cmd
            .arg(test_data_path("sample_household.ledger"))
            .assert()
            .success();
        assert.get_output().stdout.clone()
    };

    let mut cmd = Command::cargo_bin("expenses-engine").unwrap();
    let assert = cmd
        .arg(test_data_path("sample_household.ledger"))
        .env("RUST_LOG", "debug")
        .assert()
        .success();
    assert_eq!(assert.get_output().stdout, plain);
}

// ==================== ledger-insert ====================

#[test]
fn test_insert_in_chronological_position() {
    let mut cmd = Command::cargo_bin("ledger-insert").unwrap();
    cmd.arg("PAY 2024-01-15 alice 9.00 2024-01-01 2024-01-14")
        .write_stdin(
            "START 2024-01-01 alice\n\
             BUY 2024-02-01 alice 5.00\n",
        )
        .assert()
        .success()
        .stdout(
            "START 2024-01-01 alice\n\
             PAY 2024-01-15 alice 9.00 2024-01-01 2024-01-14\n\
             BUY 2024-02-01 alice 5.00\n",
        );
}

#[test]
fn test_insert_appends_when_latest() {
    let mut cmd = Command::cargo_bin("ledger-insert").unwrap();
    cmd.arg("STOP 2024-03-01 alice")
        .write_stdin("START 2024-01-01 alice\n")
        .assert()
        .success()
        .stdout(
            "START 2024-01-01 alice\n\
             STOP 2024-03-01 alice\n",
        );
}

#[test]
fn test_insert_passes_comments_through() {
    let mut cmd = Command::cargo_bin("ledger-insert").unwrap();
    cmd.arg("BUY 2024-01-02 alice 1.00")
        .write_stdin(
            "# header comment\n\
             \n\
             START 2024-01-01 alice\n\
             START 2024-01-05 bob\n",
        )
        .assert()
        .success()
        .stdout(
            "# header comment\n\
             \n\
             START 2024-01-01 alice\n\
             BUY 2024-01-02 alice 1.00\n\
             START 2024-01-05 bob\n",
        );
}

#[test]
fn test_insert_without_argument_fails() {
    let mut cmd = Command::cargo_bin("ledger-insert").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("usage"));
}
