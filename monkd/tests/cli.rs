//! End-to-end tests that drive the built `monkd` binary directly, the way
//! a user invokes it from a shell.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn source_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp source file");
    write!(file, "{contents}").expect("write temp source file");
    file
}

#[test]
fn run_prints_the_value_of_the_final_statement() {
    let file = source_file("let a = 5; let b = 10; a + b;");

    Command::cargo_bin("monkd")
        .unwrap()
        .arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("15"));
}

#[test]
fn run_on_the_vm_engine_matches_the_evaluator() {
    let file = source_file("let add = fn(a, b) { a + b }; add(2, 3);");

    Command::cargo_bin("monkd")
        .unwrap()
        .args(["--engine", "vm", "run"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));
}

#[test]
fn run_reports_parse_errors_on_stderr_and_fails() {
    let file = source_file("let = 5;");

    Command::cargo_bin("monkd")
        .unwrap()
        .arg("run")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));
}

#[test]
fn run_rejects_a_missing_file() {
    Command::cargo_bin("monkd")
        .unwrap()
        .arg("run")
        .arg("/no/such/file.monk")
        .assert()
        .failure();
}
