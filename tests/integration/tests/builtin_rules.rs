//! Integration tests for the built-in rules
//!
//! Runs the solint binary over fixture contracts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/solidity")
}

fn solint_cmd() -> Command {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("Failed to find workspace root");
    let bin_path = workspace_root.join("target/debug/solint");
    Command::new(bin_path)
}

mod valid_cases {
    use super::*;

    #[test]
    fn allows_sized_integers() {
        let fixture = fixtures_dir().join("valid_sized_uint.sol");

        solint_cmd()
            .arg("lint")
            .arg(&fixture)
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }

    #[test]
    fn allows_field_differing_only_in_case() {
        let fixture = fixtures_dir().join("valid_case_mismatch.sol");

        solint_cmd()
            .arg("lint")
            .arg(&fixture)
            .assert()
            .success()
            .stdout(predicate::str::contains("no-shadowing-field").not());
    }
}

mod invalid_cases {
    use super::*;

    #[test]
    fn detects_unsized_uint() {
        let fixture = fixtures_dir().join("invalid_unsized_uint.sol");

        solint_cmd()
            .arg("lint")
            .arg(&fixture)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "4:5 warning [no-unsized-uint]: Use uint256 directly.",
            ));
    }

    #[test]
    fn detects_shadowing_field() {
        let fixture = fixtures_dir().join("invalid_shadowing_field.sol");

        solint_cmd()
            .arg("lint")
            .arg(&fixture)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "4:13 warning [no-shadowing-field]: Fields should have a different name than the parent struct.",
            ));
    }

    #[test]
    fn unsatisfiable_pragma_falls_back_to_default_version() {
        let fixture = fixtures_dir().join("unsatisfiable_pragma.sol");

        solint_cmd()
            .arg("lint")
            .arg(&fixture)
            .assert()
            .success()
            .stdout(predicate::str::contains("[no-unsized-uint]"));
    }
}

mod whole_directory {
    use super::*;

    #[test]
    fn lints_every_fixture() {
        solint_cmd()
            .arg("lint")
            .arg(fixtures_dir())
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 5 files, found 3 issues"));
    }
}
