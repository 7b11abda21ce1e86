//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`HeadyError`] which covers every user-facing failure of
//! heady operations. It uses `thiserror` for ergonomic error definitions and
//! includes constructors for the common failure scenarios.
//!
//! # Public API
//! - [`HeadyError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, HeadyError>`
//!
//! # Error Categories
//! - **Resolution**: unknown revisions, unresolvable trunk references
//! - **Guards**: trunk, HEAD, visibility and working tree violations
//! - **Metadata**: ambiguous upstreams, relabeling, malformed upstream refs
//! - **Infrastructure**: git2, `git` CLI, I/O and JSON failures

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for heady
#[derive(Error, Debug)]
pub enum HeadyError {
    // Repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("git {command} failed: {message}")]
    GitCommand { command: String, message: String },

    #[error("Unable to find any trunk reference from {refs}")]
    NoTrunkReferences { refs: String },

    // Resolution and guard errors
    #[error("Reference not found: {reference}")]
    ReferenceNotFound { reference: String },

    #[error("Can not {action} {rev} because it is in trunk")]
    TrunkViolation { rev: String, action: String },

    #[error("Can not hide {rev} because it would hide HEAD")]
    HeadViolation { rev: String },

    #[error("{rev} is not visible in the tree")]
    NotInTree { rev: String },

    #[error("Can't move while the working tree has uncommitted changes")]
    DirtyWorkingTree,

    #[error("Can not move {source_rev} onto {dest}: the destination is inside the moved subtree")]
    MoveIntoSubtree { source_rev: String, dest: String },

    #[error("{message}")]
    Navigation { message: String },

    // Metadata errors
    #[error("{message}")]
    Ambiguity { message: String },

    #[error("{rev} is already labeled {label}")]
    AlreadyLabeled { rev: String, label: String },

    #[error("Remote {remote} is not configured in this repository")]
    RemoteNotConfigured { remote: String },

    #[error("Malformed upstream reference '{input}'. Use the form <remote>/<branch>")]
    MalformedUpstreamRef { input: String },

    #[error("{rev} has no associated upstream branches")]
    NoUpstream { rev: String },

    #[error("Can not unhide {} because not hidden", .revs.join(", "))]
    NotHidden { revs: Vec<String> },

    // Restack errors
    #[error(
        "Cherry-pick of {sha} failed: {message}. Not moved: {}",
        .pending.join(", ")
    )]
    CherryPickFailed {
        sha: String,
        pending: Vec<String>,
        message: String,
    },

    // Store errors
    #[error("Corrupt entry in '{path}': {line}")]
    CorruptStore { path: PathBuf, line: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using HeadyError
pub type Result<T> = std::result::Result<T, HeadyError>;

impl HeadyError {
    /// Create a reference not found error
    pub fn reference_not_found(reference: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            reference: reference.into(),
        }
    }

    /// Create a trunk violation error for the given action ("hide", "move", ...)
    pub fn trunk_violation(rev: impl Into<String>, action: impl Into<String>) -> Self {
        Self::TrunkViolation {
            rev: rev.into(),
            action: action.into(),
        }
    }

    pub fn head_violation(rev: impl Into<String>) -> Self {
        Self::HeadViolation { rev: rev.into() }
    }

    pub fn not_in_tree(rev: impl Into<String>) -> Self {
        Self::NotInTree { rev: rev.into() }
    }

    pub fn navigation(message: impl Into<String>) -> Self {
        Self::Navigation {
            message: message.into(),
        }
    }

    pub fn ambiguity(message: impl Into<String>) -> Self {
        Self::Ambiguity {
            message: message.into(),
        }
    }

    pub fn remote_not_configured(remote: impl Into<String>) -> Self {
        Self::RemoteNotConfigured {
            remote: remote.into(),
        }
    }

    pub fn malformed_upstream_ref(input: impl Into<String>) -> Self {
        Self::MalformedUpstreamRef {
            input: input.into(),
        }
    }

    /// Create a git command error from the command name and its stderr
    pub fn git_command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GitCommand {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn corrupt_store(path: impl Into<PathBuf>, line: impl Into<String>) -> Self {
        Self::CorruptStore {
            path: path.into(),
            line: line.into(),
        }
    }
}
