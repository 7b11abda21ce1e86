//! Upstream associations between stack commits and remote branches.

use crate::core::{
    error::{HeadyError, Result},
    vcs::{Commit, Vcs},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A parsed `<remote>/<branch>` upstream reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRef {
    pub remote: String,
    pub branch: String,
}

impl UpstreamRef {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        match input.split_once('/') {
            Some((remote, branch)) if !remote.is_empty() && !branch.is_empty() => Ok(Self {
                remote: remote.to_string(),
                branch: branch.to_string(),
            }),
            _ => Err(HeadyError::malformed_upstream_ref(input)),
        }
    }

    pub fn name(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }
}

/// How the remote branch relates to the local commit carrying the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamState {
    Missing,
    InSync,
    LocalNewer,
    RemoteNewer,
}

impl UpstreamState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamState::Missing => "missing",
            UpstreamState::InSync => "in sync",
            UpstreamState::LocalNewer => "local newer",
            UpstreamState::RemoteNewer => "remote newer",
        }
    }
}

/// An upstream trailer value plus the current state of that remote branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Upstream {
    pub name: String,
    pub remote_sha: Option<String>,
    pub remote_commit_time: Option<DateTime<Utc>>,
}

impl Upstream {
    /// Look the named remote branch up through the adapter.
    pub fn lookup<V: Vcs>(vcs: &V, name: &str) -> Result<Self> {
        let remote = vcs.remote_branch(name)?;
        Ok(Self {
            name: name.to_string(),
            remote_sha: remote.as_ref().map(|c| c.sha.clone()),
            remote_commit_time: remote.map(|c| c.time),
        })
    }

    pub fn state(&self, local: &Commit) -> UpstreamState {
        match (&self.remote_sha, self.remote_commit_time) {
            (None, _) => UpstreamState::Missing,
            (Some(sha), _) if *sha == local.sha => UpstreamState::InSync,
            (Some(_), Some(remote_time)) if remote_time > local.time => {
                UpstreamState::RemoteNewer
            }
            (Some(_), _) => UpstreamState::LocalNewer,
        }
    }

    /// Branch part of the name when it belongs to `remote`.
    pub fn branch_on(&self, remote: &str) -> Option<&str> {
        self.name
            .strip_prefix(remote)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|branch| !branch.is_empty())
    }
}
