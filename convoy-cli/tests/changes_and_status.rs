//! Binary-level tests for `convoy changes` and `convoy status`.

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .arg("-c")
        .arg("commit.gpgsign=false")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run git");
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

fn init_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "user.email", "convoy@test.invalid"]);
    git(dir, &["config", "user.name", "convoy-tests"]);
}

fn commit_all(dir: &Path, message: &str) -> String {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

#[test]
fn changes_lists_changed_directories_with_status() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let repo = TempDir::new().expect("repo");
    init_repo(repo.path());

    let svc = repo.path().join("svc");
    std::fs::create_dir_all(&svc).expect("mkdir");
    std::fs::write(svc.join("deploy.yaml"), "image: app:1\n").expect("write");
    std::fs::write(svc.join("app.kube"), "[Kube]\nYaml=deploy.yaml\n").expect("write");
    let baseline = commit_all(repo.path(), "add svc");

    std::fs::write(svc.join("deploy.yaml"), "image: app:2\n").expect("write");
    let web = repo.path().join("web");
    std::fs::create_dir_all(&web).expect("mkdir");
    std::fs::write(web.join("pod.yml"), "image: web:1\n").expect("write");
    commit_all(repo.path(), "bump app, add web");

    Command::cargo_bin("convoy")
        .expect("binary")
        .args(["changes", &baseline, "--repo"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("modified").and(predicate::str::contains("svc")))
        .stdout(predicate::str::contains("added").and(predicate::str::contains("web")));
}

#[test]
fn changes_reports_when_nothing_changed() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let repo = TempDir::new().expect("repo");
    init_repo(repo.path());
    std::fs::write(repo.path().join("README.md"), "convoy\n").expect("write");
    commit_all(repo.path(), "initial");

    Command::cargo_bin("convoy")
        .expect("binary")
        .args(["changes", "HEAD", "HEAD", "--repo"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No directory changes"));
}

#[test]
fn changes_rejects_a_directory_that_is_not_a_repository() {
    let dir = TempDir::new().expect("dir");

    Command::cargo_bin("convoy")
        .expect("binary")
        .args(["changes", "HEAD", "--repo"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open repository"));
}

#[test]
fn status_reports_when_no_units_are_declared() {
    let dir = TempDir::new().expect("dir");
    std::fs::create_dir_all(dir.path().join("empty-service")).expect("mkdir");

    Command::cargo_bin("convoy")
        .expect("binary")
        .args(["status", "--repo"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No unit declarations"));
}
