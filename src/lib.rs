//! Heady - a stacked-commit workflow manager on top of git.
//!
//! Heady keeps many in-flight, dependent commits navigable as a tree. It hides
//! and unhides subtrees, restacks subtrees onto new parents, tracks the remote
//! branch each commit is meant for and notices when that branch has landed in
//! trunk.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module:
//! - The [`Vcs`] capability trait with the git-backed [`GitRepo`] and the
//!   in-memory [`MemoryVcs`]
//! - [`build_tree`] and the [`HeadyTree`] it produces
//! - The operations over a [`HeadyRepo`] session (hide, move, fixup, ...)
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    build_tree, CommitNode, ConfigStore, GitRepo, HeadyError, HeadyRepo, HeadyTree, MemoryVcs,
    Result, Settings, TreeOptions, Upstream, Vcs,
};
