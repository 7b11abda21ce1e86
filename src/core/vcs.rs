//! The version-control capability interface.
//!
//! Everything heady does is pure logic over what this trait returns. The tree
//! builder, merge tracker and restack engine are generic over [`Vcs`] so they can
//! run against the git-backed [`GitRepo`](crate::core::git::GitRepo) or the
//! in-memory [`MemoryVcs`](crate::core::memory::MemoryVcs).

use crate::core::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An immutable commit as heady consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub sha: String,
    pub parents: Vec<String>,
    pub message: String,
    pub time: DateTime<Utc>,
}

impl Commit {
    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Only the first parent is followed for stack purposes
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    pub fn short_sha(&self) -> &str {
        &self.sha[..self.sha.len().min(8)]
    }
}

/// One entry of a reference log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflogEntry {
    pub old_sha: String,
    pub new_sha: String,
    pub message: String,
    pub time: DateTime<Utc>,
}

/// A local branch and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchHead {
    pub name: String,
    pub sha: String,
}

pub trait Vcs {
    /// Resolve any revision expression to a commit.
    /// Fails with `ReferenceNotFound` when it does not resolve.
    fn resolve(&self, rev: &str) -> Result<Commit>;

    /// Commits reachable from any of `include` but from none of `exclude`.
    fn ancestor_range(&self, include: &[String], exclude: &[String]) -> Result<Vec<String>>;

    /// Nearest common ancestor, `None` when the histories are unrelated.
    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>>;

    /// Reference log of `refname`, newest entry first.
    fn reflog(&self, refname: &str) -> Result<Vec<ReflogEntry>>;

    fn branches(&self) -> Result<Vec<BranchHead>>;

    /// Commit of `refs/remotes/<name>`, `None` when the remote branch is absent.
    fn remote_branch(&self, name: &str) -> Result<Option<Commit>>;

    /// URL of a configured remote, `None` when no such remote exists.
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    fn is_dirty(&self) -> Result<bool>;

    /// Check out `sha` (detached), writing `message` to the HEAD reflog.
    fn checkout(&mut self, sha: &str, message: &str) -> Result<()>;

    /// Point HEAD at `sha` with a reflog `message`, leaving the working tree alone.
    fn set_head(&mut self, sha: &str, message: &str) -> Result<()>;

    /// Re-apply `sha` on top of HEAD; returns the new HEAD commit.
    /// A failed pick is aborted before the error is returned.
    fn cherry_pick(&mut self, sha: &str) -> Result<Commit>;

    /// Replace the message of the HEAD commit; returns the amended commit.
    fn amend_head_message(&mut self, message: &str) -> Result<Commit>;

    /// Push `<sha>:refs/heads/<branch>` refspecs in one round trip.
    fn push(&mut self, remote: &str, refspecs: &[String]) -> Result<()>;

    fn head(&self) -> Result<Commit> {
        self.resolve("HEAD")
    }

    /// `ancestor` is reachable from `descendant` (or equal to it).
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let missing =
            self.ancestor_range(&[ancestor.to_string()], &[descendant.to_string()])?;
        Ok(missing.is_empty())
    }
}
