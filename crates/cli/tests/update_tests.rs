//! End-to-end tests for `dot update` against a temporary home directory.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

struct TestEnv {
  _temp: TempDir,
  home: PathBuf,
  base: PathBuf,
}

impl TestEnv {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let home = fs::canonicalize(temp.path()).unwrap();
    let base = home.join(".dotfiles");
    fs::create_dir_all(&base).unwrap();
    Self { _temp: temp, home, base }
  }

  /// Write an empty file at `base/relative`.
  fn env_file(&self, relative: &str) {
    let path = self.base.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
  }

  fn dot(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("dot");
    cmd
      .arg("--base-dir")
      .arg(&self.base)
      .arg("--home-dir")
      .arg(&self.home)
      .env_remove("RUST_LOG");
    cmd
  }

  fn link_of(&self, relative: &str) -> PathBuf {
    fs::read_link(self.home.join(relative)).unwrap()
  }

  fn created_links(&self) -> String {
    fs::read_to_string(self.base.join(".created-links")).unwrap()
  }
}

fn no_entry(path: &Path) -> bool {
  fs::symlink_metadata(path).is_err()
}

#[test]
fn links_single_owner_directory_whole() {
  let env = TestEnv::new();
  env.env_file("base/.zsh/aliases");
  env.env_file("base/.zsh/functions");

  env
    .dot()
    .arg("update")
    .assert()
    .success()
    .stdout(predicate::str::contains("LINK"))
    .stdout(predicate::str::contains("Applied 1 change(s)"));

  assert_eq!(env.link_of(".zsh"), env.base.join("base/.zsh"));
  assert_eq!(
    env.created_links(),
    format!(
      "{} -> {}\n",
      env.home.join(".zsh").display(),
      env.base.join("base/.zsh").display()
    )
  );
}

#[test]
fn shared_directory_is_created_and_files_linked() {
  let env = TestEnv::new();
  env.env_file("base/.zsh/conf.d/aliases");
  env.env_file("develop/.zsh/conf.d/git-completions");

  env
    .dot()
    .arg("update")
    .assert()
    .success()
    .stdout(predicate::str::contains("MKDIR"));

  assert!(env.home.join(".zsh/conf.d").is_dir());
  assert_eq!(
    env.link_of(".zsh/conf.d/aliases"),
    env.base.join("base/.zsh/conf.d/aliases")
  );
  assert_eq!(
    env.link_of(".zsh/conf.d/git-completions"),
    env.base.join("develop/.zsh/conf.d/git-completions")
  );
}

#[test]
fn second_run_reports_nothing_to_do() {
  let env = TestEnv::new();
  env.env_file("base/.vimrc");

  env.dot().arg("update").assert().success();
  env
    .dot()
    .arg("update")
    .assert()
    .success()
    .stdout(predicate::str::contains("Everything is already linked."));

  env
    .dot()
    .arg("-v")
    .arg("update")
    .assert()
    .success()
    .stdout(predicate::str::contains("INFO"))
    .stdout(predicate::str::contains("already exists"));
}

#[test]
fn dry_run_changes_nothing() {
  let env = TestEnv::new();
  env.env_file("base/.vimrc");

  env
    .dot()
    .arg("update")
    .arg("--dry")
    .assert()
    .success()
    .stdout(predicate::str::contains("Dry run"))
    .stdout(predicate::str::contains("will be created"));

  assert!(no_entry(&env.home.join(".vimrc")));
  assert!(no_entry(&env.base.join(".created-links")));
}

#[test]
fn conflicts_are_reported_without_failing() {
  let env = TestEnv::new();
  env.env_file("base/.gitconfig");
  env.env_file("work/.gitconfig");
  env.env_file("base/.bashrc");
  fs::write(env.home.join(".bashrc"), "# mine").unwrap();

  env
    .dot()
    .arg("update")
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "File .gitconfig exists in more than one environment: base, work",
    ))
    .stdout(predicate::str::contains("already exists, can't make symlink instead of it."));

  assert_eq!(fs::read_to_string(env.home.join(".bashrc")).unwrap(), "# mine");
}

#[test]
fn stale_links_are_removed() {
  let env = TestEnv::new();
  env.env_file("zsh/.zsh/aliases");
  env.env_file("zsh/.zshrc");

  env.dot().arg("update").assert().success();
  assert_eq!(env.link_of(".zshrc"), env.base.join("zsh/.zshrc"));

  fs::remove_file(env.base.join("zsh/.zshrc")).unwrap();

  env
    .dot()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("Stale links: 1"));

  env
    .dot()
    .arg("update")
    .assert()
    .success()
    .stdout(predicate::str::contains("RM"));

  assert!(no_entry(&env.home.join(".zshrc")));
  assert!(!env.created_links().contains(".zshrc"));
}

#[test]
fn foreign_symlink_is_left_alone() {
  let env = TestEnv::new();
  env.env_file("base/.tmux.conf");
  let elsewhere = env.home.join("elsewhere.conf");
  fs::write(&elsewhere, "").unwrap();
  symlink(&elsewhere, env.home.join(".tmux.conf")).unwrap();

  env
    .dot()
    .arg("update")
    .assert()
    .success()
    .stdout(predicate::str::contains("please remove it manually"));

  assert_eq!(env.link_of(".tmux.conf"), elsewhere);
}

#[test]
fn json_report_lists_entries() {
  let env = TestEnv::new();
  env.env_file("base/.vimrc");

  let output = env.dot().arg("update").arg("--dry").arg("--json").output().unwrap();
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["dry_run"], true);
  assert_eq!(value["environments"], serde_json::json!(["base"]));
  assert_eq!(value["entries"][0]["kind"], "link");
}
