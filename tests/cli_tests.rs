//! Command line behaviour of the `release_bundler` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

mod common;

fn bundler(dir: &std::path::Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("release_bundler").unwrap();
    cmd.current_dir(dir)
        .env_remove("DEBUG")
        .env_remove("FEATURES")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_arguments_lists_stages_and_configuration() {
    let tmp = TempDir::new().unwrap();

    bundler(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("binary"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("DEBUG"))
        .stdout(predicate::str::contains("FEATURES"));
}

#[test]
fn help_command_needs_no_manifest() {
    let tmp = TempDir::new().unwrap();

    bundler(tmp.path())
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dmg"));
}

#[test]
fn clean_on_empty_directory_succeeds() {
    let tmp = TempDir::new().unwrap();

    bundler(tmp.path()).arg("clean").assert().success();
}

#[test]
fn clean_removes_only_the_selected_mode() {
    let tmp = TempDir::new().unwrap();
    common::write_file(&tmp.path().join("target/release/osx/Demo.dmg"), "dmg");
    common::write_file(&tmp.path().join("target/debug/demo"), "bin");

    bundler(tmp.path()).arg("clean").assert().success();

    assert!(!tmp.path().join("target/release").exists());
    assert!(tmp.path().join("target/debug/demo").exists());

    bundler(tmp.path())
        .arg("clean")
        .env("DEBUG", "1")
        .assert()
        .success();
    assert!(!tmp.path().join("target/debug").exists());
}

#[test]
fn failed_clean_is_reported_even_when_quiet() {
    let tmp = TempDir::new().unwrap();
    // A file where the release directory should be cannot be removed as a tree.
    common::write_file(&tmp.path().join("target/release"), "not a directory");

    bundler(tmp.path())
        .args(["clean", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::contains("could not remove"));
}

#[test]
fn empty_feature_set_is_a_usage_error() {
    let tmp = TempDir::new().unwrap();

    bundler(tmp.path())
        .args(["binary", "--features", ""])
        .assert()
        .code(2);
}

#[test]
fn stage_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();

    bundler(tmp.path())
        .arg("binary")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cargo.toml"));
}

#[cfg(unix)]
mod with_stub_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn stub(bin: &Path, name: &str, script: &str) {
        let path = bin.join(name);
        common::write_file(&path, &format!("#!/bin/sh\n{script}\n"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Project plus stub `cargo`, `hdiutil` and `open` in `bin/`.
    fn setup(hdiutil: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        common::write_project(&project);

        let bin = tmp.path().join("bin");
        stub(
            &bin,
            "cargo",
            "mkdir -p target/release && printf placeholder > target/release/demo",
        );
        stub(&bin, "hdiutil", hdiutil);
        stub(&bin, "open", "exit 0");
        tmp
    }

    fn run(tmp: &TempDir, command: &str) -> assert_cmd::assert::Assert {
        let path = format!("{}:/usr/bin:/bin", tmp.path().join("bin").display());
        bundler(&tmp.path().join("project"))
            .arg(command)
            .env("PATH", path)
            .assert()
    }

    #[test]
    fn install_builds_bundles_packs_and_opens() {
        let tmp = setup(r#"for last; do :; done; printf dmg > "$last""#);

        run(&tmp, "install")
            .success()
            .stdout(predicate::str::contains("Created 'Demo.app'"));

        let release = tmp.path().join("project/target/release");
        assert_eq!(
            std::fs::read_to_string(release.join("osx/Demo.app/Contents/MacOS/demo")).unwrap(),
            "placeholder"
        );
        assert!(release.join("osx/Demo.app/Contents/Info.plist").is_file());
        assert!(release.join("osx/Demo.dmg").is_file());
    }

    #[test]
    fn packaging_failure_reports_stage_and_tool_output() {
        let tmp = setup("echo 'hdiutil: create failed - Resource busy' >&2; exit 1");

        run(&tmp, "install")
            .code(1)
            .stderr(predicate::str::contains("stage `dmg` failed"))
            .stderr(predicate::str::contains(
                "hdiutil: create failed - Resource busy",
            ));

        assert!(!tmp.path().join("project/target/release/osx/Demo.dmg").exists());
    }
}
