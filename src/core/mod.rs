//! Core functionality for heady.
//!
//! Everything here is pure logic over the [`Vcs`] capability trait except the
//! git-backed adapter itself and the small output helpers.

pub mod annotate;
pub mod command_init;
pub mod config;
pub mod dirs;
pub mod error;
pub mod git;
pub mod hiding;
pub mod links;
pub mod memory;
pub mod merged;
pub mod navigate;
pub mod output;
pub mod push;
pub mod render;
pub mod repo;
pub mod restack;
pub mod store;
pub mod trailers;
pub mod tree;
pub mod upstream;
pub mod vcs;

// === Error handling ===
pub use error::{HeadyError, Result};

// === Version control ===
// The capability trait, its value types and both adapters
pub use git::GitRepo;
pub use memory::MemoryVcs;
pub use vcs::{BranchHead, Commit, ReflogEntry, Vcs};

// === Session and persisted state ===
pub use command_init::{CommandInit, GlobalOptions};
pub use config::Settings;
pub use repo::HeadyRepo;
pub use store::ConfigStore;

// === Visibility tree ===
pub use tree::{build_tree, collect_subtree_shas, CommitNode, HeadyTree, TreeOptions};
pub use upstream::{Upstream, UpstreamRef, UpstreamState};

// === Operations ===
pub use annotate::{attach_label, attach_upstream, UpstreamOutcome};
pub use hiding::{auto_hide, hide_subtrees, unhide_revs, AutoHideReport};
pub use links::pr_links;
pub use navigate::{goto, GotoTarget};
pub use push::{plan_push, push_commits};
pub use restack::{fixup, move_subtree, restack, AmendOutcome, FixupOutcome, MovedCommit};

// === Output formatting ===
pub use output::{print_error, print_info, print_section, print_success};
pub use render::render_tree;
