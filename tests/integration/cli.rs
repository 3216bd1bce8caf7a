//! CLI surface tests: flag validation and informational flags that bypass
//! the pipeline entirely.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_version_flag_bypasses_pipeline() -> Result<()> {
    let project = TestProject::new()?;

    let output = project.run_tryout(&["--version"])?;
    assert!(output.success);
    assert!(output.stdout.contains(env!("CARGO_PKG_VERSION")));
    assert!(project.swift_calls().is_empty());
    Ok(())
}

#[test]
fn test_help_describes_dependencies_argument() -> Result<()> {
    let project = TestProject::new()?;

    let output = project.run_tryout(&["--help"])?;
    assert!(output.success);
    assert!(output.stdout.contains("DEPENDENCY"));
    assert!(output.stdout.contains("--force"));
    assert!(output.stdout.contains("--skip-open"));
    Ok(())
}

#[test]
fn test_verbose_and_quiet_are_mutually_exclusive() -> Result<()> {
    let project = TestProject::new()?;

    let output = project.run_tryout(&["--verbose", "--quiet", "x"])?;
    assert!(!output.success);
    assert!(project.swift_calls().is_empty());
    Ok(())
}

#[test]
fn test_unrecognizable_dependency_token_is_reported() {
    Command::cargo_bin("tryout")
        .unwrap()
        .arg("definitely-not-a-url-or-path")
        .env("TRYOUT_NO_PROGRESS", "1")
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid dependency specification"));
}

#[test]
fn test_unknown_platform_is_rejected() -> Result<()> {
    let project = TestProject::new()?;

    let output = project.run_tryout(&["x", "--platform", "watchos"])?;
    assert!(!output.success);
    assert!(project.swift_calls().is_empty());
    Ok(())
}
