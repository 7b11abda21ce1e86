//! Git repository operations behind the [`Vcs`] capability trait.
//!
//! This module provides [`GitRepo`], the production adapter. Reads (commit
//! lookup, revision walks, reflog, branches, status) go through the `git2`
//! library. Mutations that must behave exactly like the user's own git
//! (cherry-pick, amend, push, reflog-tagged HEAD updates) run the `git` CLI in
//! the repository's working directory.
//!
//! # Public API
//! - [`GitRepo`]: Main interface for git repository operations
//!
//! # Key Features
//! - **Revision queries**: rev-list style ancestor ranges and merge bases
//! - **Reflog access**: HEAD reflog entries, newest first
//! - **Tagged navigation**: checkouts that write `heady visit:` / `heady move:` reflog messages
//! - **Restack primitives**: cherry-pick with automatic abort on conflict, message amend, push

use crate::core::{
    error::{HeadyError, Result},
    vcs::{BranchHead, Commit, ReflogEntry, Vcs},
};
use chrono::{DateTime, TimeZone, Utc};
use git2::{build::CheckoutBuilder, BranchType, ErrorCode, Oid, Repository, StatusOptions};
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }

    /// Execute a git command in the repository's working directory
    fn execute_git_command(&self, args: &[&str]) -> Result<String> {
        let workdir = self.workdir()?;
        let command = args.first().copied().unwrap_or_default();

        log::debug!("Running git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(HeadyError::Io)?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(HeadyError::git_command(command, error_msg.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| HeadyError::git_command("status", "Repository has no working directory"))
    }

    pub fn get_repo_path(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    pub fn get_repository(&self) -> &Repository {
        &self.repo
    }

    fn to_commit(commit: &git2::Commit) -> Commit {
        Commit {
            sha: commit.id().to_string(),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            time: to_datetime(commit.time().seconds()),
        }
    }

    fn resolve_oid(&self, rev: &str) -> Result<Oid> {
        self.repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|_| HeadyError::reference_not_found(rev))
    }

    fn update_head(&self, sha: &str, message: &str) -> Result<()> {
        self.execute_git_command(&["update-ref", "--no-deref", "-m", message, "HEAD", sha])?;
        Ok(())
    }
}

fn to_datetime(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().unwrap_or_default()
}

impl Vcs for GitRepo {
    fn resolve(&self, rev: &str) -> Result<Commit> {
        let oid = self.resolve_oid(rev)?;
        let commit = self.repo.find_commit(oid)?;
        Ok(Self::to_commit(&commit))
    }

    fn ancestor_range(&self, include: &[String], exclude: &[String]) -> Result<Vec<String>> {
        let mut walk = self.repo.revwalk()?;
        for rev in include {
            walk.push(self.resolve_oid(rev)?)?;
        }
        for rev in exclude {
            walk.hide(self.resolve_oid(rev)?)?;
        }

        let mut shas = Vec::new();
        for oid in walk {
            shas.push(oid?.to_string());
        }
        Ok(shas)
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        let a = self.resolve_oid(a)?;
        let b = self.resolve_oid(b)?;
        match self.repo.merge_base(a, b) {
            Ok(oid) => Ok(Some(oid.to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn reflog(&self, refname: &str) -> Result<Vec<ReflogEntry>> {
        let reflog = self.repo.reflog(refname)?;
        Ok(reflog
            .iter()
            .map(|entry| ReflogEntry {
                old_sha: entry.id_old().to_string(),
                new_sha: entry.id_new().to_string(),
                message: entry.message().unwrap_or("").to_string(),
                time: to_datetime(entry.committer().when().seconds()),
            })
            .collect())
    }

    fn branches(&self) -> Result<Vec<BranchHead>> {
        let mut heads = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let Some(name) = branch.name()? else {
                log::warn!("Skipping branch with a non UTF-8 name");
                continue;
            };
            let name = name.to_string();
            let commit = branch.get().peel_to_commit()?;
            heads.push(BranchHead {
                name,
                sha: commit.id().to_string(),
            });
        }
        heads.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(heads)
    }

    fn remote_branch(&self, name: &str) -> Result<Option<Commit>> {
        match self.repo.find_reference(&format!("refs/remotes/{name}")) {
            Ok(reference) => {
                let commit = reference.peel_to_commit()?;
                Ok(Some(Self::to_commit(&commit)))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(found) => Ok(Some(found.url().unwrap_or("").to_string())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) if e.code() == ErrorCode::InvalidSpec => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false);
        opts.include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(!statuses.is_empty())
    }

    fn checkout(&mut self, sha: &str, message: &str) -> Result<()> {
        let oid = self.resolve_oid(sha)?;
        let commit = self.repo.find_commit(oid)?;
        self.repo
            .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().force()))?;
        self.update_head(&oid.to_string(), message)
    }

    fn set_head(&mut self, sha: &str, message: &str) -> Result<()> {
        let oid = self.resolve_oid(sha)?;
        self.update_head(&oid.to_string(), message)
    }

    fn cherry_pick(&mut self, sha: &str) -> Result<Commit> {
        let pick = ["cherry-pick", "--allow-empty", "--keep-redundant-commits", sha];
        if let Err(e) = self.execute_git_command(&pick) {
            log::warn!("Cherry-pick of {sha} failed, aborting it");
            if let Err(abort_err) = self.execute_git_command(&["cherry-pick", "--abort"]) {
                log::warn!("cherry-pick --abort failed: {abort_err}");
            }
            return Err(e);
        }
        self.head()
    }

    fn amend_head_message(&mut self, message: &str) -> Result<Commit> {
        self.execute_git_command(&[
            "commit",
            "--amend",
            "--allow-empty",
            "--no-verify",
            "-m",
            message,
        ])?;
        self.head()
    }

    fn push(&mut self, remote: &str, refspecs: &[String]) -> Result<()> {
        let mut args = vec!["push", "--force-with-lease", "--no-verify", remote];
        args.extend(refspecs.iter().map(String::as_str));
        self.execute_git_command(&args)?;
        Ok(())
    }
}
