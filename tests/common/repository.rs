//! Git repository management and setup utilities
//!
//! Provides functions for creating test repositories with a trunk branch and
//! a detached stack of commits on top of it, plus a `heady` command whose
//! settings and state live in a temporary config directory.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test repository setup result. Both temporary directories must be kept
/// alive for the duration of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub config_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Get the repository path as a reference
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `heady` running inside the repository with the test settings
    pub fn heady(&self) -> anyhow::Result<Command> {
        let mut cmd = Command::cargo_bin("heady")?;
        cmd.current_dir(&self.path)
            .env("XDG_CONFIG_HOME", self.config_dir.path())
            .env_remove("RUST_LOG");
        Ok(cmd)
    }

    /// Run git in the repository and return its trimmed stdout
    pub fn git(&self, args: &[&str]) -> anyhow::Result<String> {
        git(&self.path, args)
    }

    pub fn rev_parse(&self, rev: &str) -> anyhow::Result<String> {
        self.git(&["rev-parse", rev])
    }

    /// Commit a new file on top of HEAD and return the new SHA
    pub fn commit(&self, message: &str) -> anyhow::Result<String> {
        let name = format!("{}.txt", message.lines().next().unwrap_or("file").replace(' ', "_"));
        fs::write(self.path.join(&name), format!("{message}\n"))?;
        self.git(&["add", &name])?;
        self.git(&["commit", "-q", "-m", message])?;
        self.rev_parse("HEAD")
    }

    pub fn checkout(&self, rev: &str) -> anyhow::Result<()> {
        self.git(&["checkout", "-q", "--detach", rev])?;
        Ok(())
    }
}

/// Run git in `repo_path`, failing on a non-zero exit status
pub fn git(repo_path: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git").args(args).current_dir(repo_path).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets up a fresh git repository with an initial commit on `main`
///
/// HEAD is left detached on `main` so new commits form a stack instead of
/// advancing the trunk branch.
pub fn setup_test_repo() -> anyhow::Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let config_dir = TempDir::new()?;
    let path = temp_dir.path().to_path_buf();

    git(&path, &["init", "-q"])?;
    git(&path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;

    // Trunk is the local `main` branch
    let settings_dir = config_dir.path().join("heady");
    fs::create_dir_all(&settings_dir)?;
    fs::write(
        settings_dir.join("config.json"),
        r#"{ "trunk_refs": ["main"], "remote": "origin" }"#,
    )?;

    let repo = TestRepo {
        temp_dir,
        config_dir,
        path,
    };
    repo.commit("Initial commit")?;
    repo.checkout("main")?;
    Ok(repo)
}

/// Same as [`setup_test_repo`] with an `origin` remote configured
pub fn setup_test_repo_with_remote() -> anyhow::Result<TestRepo> {
    let repo = setup_test_repo()?;
    repo.git(&["remote", "add", "origin", "git@github.com:acme/widgets.git"])?;
    Ok(repo)
}
