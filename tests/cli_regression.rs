// Regression tests: run the caselist binary against throwaway unit test trees.
// Requires: assert_cmd, predicates, tempfile crates in [dev-dependencies]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn caselist(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("caselist").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn default_root_is_src_unittests() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/unittests/foo_unittest.cc", "TEST_CASE(\"Foo\", \"Bar\")\n");
    write(dir.path(), "other/ignored.cc", "TEST_CASE(\"Not\", \"Scanned\")\n");

    caselist(&dir)
        .assert()
        .success()
        .stdout("\"Foo Bar\" \"\"\n");
}

#[test]
fn sections_replace_the_bare_case_line() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/unittests/foo_unittest.cc",
        "TEST_CASE(\"Foo\", \"Bar\")\n{\n    SECTION(\"One\")\n    {\n    }\n    SECTION(\"Two\")\n    {\n    }\n}\n",
    );

    caselist(&dir)
        .assert()
        .success()
        .stdout("\"Foo Bar\" \"One\"\n\"Foo Bar\" \"Two\"\n");
}

#[test]
fn hidden_directories_are_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/unittests/.git/stale.cc", "TEST_CASE(\"Hidden\", \"Case\")\n");
    write(dir.path(), "src/unittests/.backup.cc", "TEST_CASE(\"Hidden\", \"File\")\n");
    write(dir.path(), "src/unittests/real.cc", "TEST_CASE(\"Real\", \"Case\")\n");

    caselist(&dir)
        .assert()
        .success()
        .stdout("\"Real Case\" \"\"\n");
}

#[test]
fn malformed_declaration_fails_with_diagnostic_on_stdout() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/unittests/a_good.cc",
        "TEST_CASE(\"Good\", \"Case\")\n",
    );
    write(
        dir.path(),
        "src/unittests/b_bad.cc",
        "TEST_CASE(\"Bad\\\"Name\", \"X\")\nTEST_CASE(\"After\", \"Bad\")\n",
    );

    caselist(&dir).assert().failure().code(1).stdout(
        contains("\"Good Case\" \"\"")
            .and(contains("malformed test case declaration"))
            .and(contains("b_bad.cc:1"))
            .and(contains("After Bad").not()),
    );
}

#[test]
fn malformed_section_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/unittests/bad.cc",
        "TEST_CASE(\"Foo\", \"Bar\")\n    SECTION(\"trailing\"); // comment\n",
    );

    caselist(&dir)
        .assert()
        .failure()
        .stdout(contains("malformed section declaration").and(contains("caselist::malformed_section")));
}

#[test]
fn explicit_root_extension_and_json_format() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "suite/a.cpp", "TEST_CASE(\"A\", \"B\")\n  SECTION(\"s\")\n");
    write(dir.path(), "suite/b.cc", "TEST_CASE(\"Not\", \"Selected\")\n");

    caselist(&dir)
        .args(["suite", "--extension", "cpp", "--format", "json"])
        .assert()
        .success()
        .stdout("{\"test_case\":\"A B\",\"section\":\"s\"}\n");
}

#[test]
fn missing_root_fails() {
    let dir = TempDir::new().unwrap();

    caselist(&dir)
        .assert()
        .failure()
        .stdout(contains("failed to walk directory"));
}

#[test]
fn output_is_identical_across_runs() {
    let dir = TempDir::new().unwrap();
    for (rel, body) in [
        ("src/unittests/z.cc", "TEST_CASE(\"Z\", \"z\")\nSECTION(\"one\")\n"),
        ("src/unittests/m/x.cc", "TEST_CASE(\"X\", \"x\")\n"),
        ("src/unittests/a.cc", "TEST_CASE(\"A\", \"a\")\nTEST_CASE(\"A2\", \"a\")\n"),
    ] {
        write(dir.path(), rel, body);
    }

    let first = caselist(&dir).assert().success().get_output().stdout.clone();
    let second = caselist(&dir).assert().success().get_output().stdout.clone();
    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(first).unwrap(),
        "\"A a\" \"\"\n\"A2 a\" \"\"\n\"X x\" \"\"\n\"Z z\" \"one\"\n"
    );
}

#[cfg(unix)]
#[test]
fn walk_error_keeps_earlier_output() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/unittests/a.cc", "TEST_CASE(\"A\", \"a\")\n");
    fs::create_dir_all(dir.path().join("src/unittests/z")).unwrap();
    std::os::unix::fs::symlink("..", dir.path().join("src/unittests/z/loop")).unwrap();

    caselist(&dir).assert().failure().code(1).stdout(
        predicates::str::starts_with("\"A a\" \"\"\n").and(contains("failed to walk directory")),
    );
}

