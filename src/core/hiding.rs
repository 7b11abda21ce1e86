//! Hide and unhide subtrees of the stack.
//!
//! Hiding a commit hides everything above it in the visible tree. The hide-list
//! is a plain set of SHAs, so hiding is idempotent and unhiding restores exactly
//! what was listed.

use crate::core::{
    error::{HeadyError, Result},
    repo::HeadyRepo,
    tree::collect_subtree_shas,
    vcs::Vcs,
};
use std::collections::BTreeSet;

/// What an autohide pass did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AutoHideReport {
    pub hidden: BTreeSet<String>,
    /// Merged commits left visible because HEAD sits on or above them
    pub skipped: BTreeSet<String>,
}

/// Hide the subtrees rooted at `revs`; returns the SHAs newly added to the list.
///
/// Every rev is validated before the list is touched.
pub fn hide_subtrees<V: Vcs>(repo: &HeadyRepo<V>, revs: &[String]) -> Result<BTreeSet<String>> {
    let mut roots = Vec::new();
    for rev in revs {
        let commit = repo.resolve(rev)?;
        if repo.is_in_trunk(rev)? {
            return Err(HeadyError::trunk_violation(rev, "hide"));
        }
        if repo.vcs.is_ancestor(&commit.sha, "HEAD")? {
            return Err(HeadyError::head_violation(rev));
        }
        roots.push(commit.sha);
    }

    let tree = repo.build_tree()?;
    let mut to_hide = BTreeSet::new();
    for sha in &roots {
        match tree.commit_nodes.get(sha) {
            Some(node) => to_hide.extend(collect_subtree_shas(&tree, node)),
            None => log::warn!("Did not find {sha} in the visible tree, skipping it"),
        }
    }

    let already_hidden = repo.store.read_hide_list()?;
    let new: BTreeSet<String> = to_hide.difference(&already_hidden).cloned().collect();
    repo.store.append_to_hide_list(&new)?;
    log::debug!("Hid {} commits", new.len());
    Ok(new)
}

/// Remove `revs` from the hide-list.
///
/// Revs that were hidden are removed even when others were not; the ones that
/// were not hidden are reported afterwards as `NotHidden`.
pub fn unhide_revs<V: Vcs>(repo: &HeadyRepo<V>, revs: &[String]) -> Result<BTreeSet<String>> {
    let mut hide_list = repo.store.read_hide_list()?;
    let mut unhidden = BTreeSet::new();
    let mut not_hidden = Vec::new();
    for rev in revs {
        let sha = repo.resolve(rev)?.sha;
        if hide_list.remove(&sha) {
            unhidden.insert(sha);
        } else {
            not_hidden.push(rev.clone());
        }
    }

    repo.store.replace_hide_list(&hide_list)?;
    if !not_hidden.is_empty() {
        return Err(HeadyError::NotHidden { revs: not_hidden });
    }
    Ok(unhidden)
}

/// Hide every visible stack commit whose upstream already landed in trunk.
pub fn auto_hide<V: Vcs>(repo: &HeadyRepo<V>) -> Result<AutoHideReport> {
    let tree = repo.build_tree()?;
    let mut report = AutoHideReport::default();

    for node in tree.commit_nodes.values() {
        if node.is_hidden || !node.is_merged() {
            continue;
        }
        if repo.vcs.is_ancestor(node.sha(), "HEAD")? {
            log::warn!(
                "Not hiding merged commit {} because HEAD is on top of it",
                node.commit.short_sha()
            );
            report.skipped.insert(node.sha().to_string());
        } else {
            report.hidden.insert(node.sha().to_string());
        }
    }

    let already_hidden = repo.store.read_hide_list()?;
    let new: Vec<&String> = report.hidden.difference(&already_hidden).collect();
    repo.store.append_to_hide_list(new)?;
    Ok(report)
}
