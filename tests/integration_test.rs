// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::Repository as Git2Repo;

const BIN: &str = env!("CARGO_BIN_EXE_module-release");

fn write_project(dir: &Path) {
    fs::copy(
        "tests/fixtures/module/module.json",
        dir.join("module.json"),
    )
    .unwrap();
    fs::write(
        dir.join("release.toml"),
        "repository = \"https://github.com/owner/my-module\"\n\
         raw_url = \"https://raw.githubusercontent.com/owner/my-module\"\n",
    )
    .unwrap();
}

fn init_git(dir: &Path) -> Git2Repo {
    let repo = Git2Repo::init(dir).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Release Bot").unwrap();
        config.set_str("user.email", "release@example.com").unwrap();
    }
    {
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("module.json")).unwrap();
        index.add_path(Path::new("release.toml")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();
    }
    repo
}

#[test]
fn test_help() {
    let output = Command::new(BIN).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("module-release"));
    assert!(stdout.contains("publish"));
}

#[test]
fn test_version_flag() {
    let output = Command::new(BIN).arg("--version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_update_command() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = Command::new(BIN)
        .args(["update", "patch", "-C"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "{:?}", output);
    let manifest = fs::read_to_string(dir.path().join("module.json")).unwrap();
    assert!(manifest.contains("\"version\": \"1.4.10\""));
    assert!(manifest.contains("/releases/download/v1.4.10/module.zip"));
}

#[test]
fn test_update_invalid_argument_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let output = Command::new(BIN)
        .args(["update", "bogus", "-C"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Incorrect version argument"));
}

#[test]
fn test_publish_creates_commit_and_tag() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    let repo = init_git(dir.path());

    let output = Command::new(BIN)
        .args(["publish", "minor", "--yes", "-C"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("version bump v1.5.0"));

    let tag_ref = repo.find_reference("refs/tags/v1.5.0").unwrap();
    let tag = tag_ref.peel_to_tag().unwrap();
    assert_eq!(tag.message(), Some("Updated to 1.5.0"));
    assert_eq!(tag.target_id(), head.id());
}

#[test]
fn test_publish_dry_run_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    let repo = init_git(dir.path());

    let output = Command::new(BIN)
        .args(["publish", "major", "--dry-run", "-C"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    assert!(repo.find_reference("refs/tags/v2.0.0").is_err());
    let manifest = fs::read_to_string(dir.path().join("module.json")).unwrap();
    assert!(manifest.contains("\"version\": \"1.4.9\""));
}
