//! Detection of upstream branches that already landed in trunk.
//!
//! Landed commits keep their `upstream:` trailers, so a scan of recent trunk
//! history tells us which upstream names are done. Stack commits carrying one of
//! those names are safe to discard.

use crate::core::{error::Result, trailers, vcs::{Commit, Vcs}};
use std::collections::BTreeMap;

/// Map upstream name -> trunk SHAs carrying it.
///
/// Walks trunk history from each trunk reference back to (but excluding) the
/// first parent of `oldest_trunk_commit`. Trunk references usually share most
/// of their history, so each later walk also stops at the earlier tips and no
/// commit is read twice.
pub fn collect_merged_upstreams<V: Vcs>(
    vcs: &V,
    trunk_refs: &[String],
    oldest_trunk_commit: &Commit,
) -> Result<BTreeMap<String, Vec<String>>> {
    let mut exclude: Vec<String> = oldest_trunk_commit
        .first_parent()
        .map(|p| vec![p.to_string()])
        .unwrap_or_default();

    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut visited = 0usize;
    for trunk_ref in trunk_refs {
        for sha in vcs.ancestor_range(std::slice::from_ref(trunk_ref), &exclude)? {
            visited += 1;
            let commit = vcs.resolve(&sha)?;
            for name in trailers::upstreams(&commit.message) {
                merged.entry(name).or_default().push(sha.clone());
            }
        }
        exclude.push(trunk_ref.clone());
    }

    log::debug!(
        "Scanned {visited} trunk commits, {} upstreams merged",
        merged.len()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::MemoryVcs;
    use crate::core::tree::{build_tree, TreeOptions};
    use chrono::Duration;

    #[test]
    fn test_collects_upstreams_after_boundary_only() -> Result<()> {
        let mut vcs = MemoryVcs::new();
        let ancient = vcs.add_root("ancient\n\nupstream: origin/ancient\n");
        let fork = vcs.add_commit(&[&ancient], "fork point");
        let landed = vcs.add_commit(&[&fork], "Feature X\n\nupstream: origin/feature-x\n");
        vcs.set_remote_branch("origin/main", &landed);

        let fork_commit = vcs.resolve(&fork)?;
        let merged = collect_merged_upstreams(&vcs, &["origin/main".to_string()], &fork_commit)?;

        assert_eq!(merged.get("origin/feature-x"), Some(&vec![landed]));
        assert!(!merged.contains_key("origin/ancient"));
        Ok(())
    }

    #[test]
    fn test_shared_trunk_history_is_visited_once() -> Result<()> {
        let mut vcs = MemoryVcs::new();
        let root = vcs.add_root("root");
        let shared = vcs.add_commit(&[&root], "Shared\n\nupstream: origin/shared\n");
        let stable = vcs.add_commit(&[&shared], "stable only");
        vcs.set_remote_branch("origin/main", &shared);
        vcs.set_remote_branch("origin/stable", &stable);

        let root_commit = vcs.resolve(&root)?;
        let trunks = vec!["origin/main".to_string(), "origin/stable".to_string()];
        let merged = collect_merged_upstreams(&vcs, &trunks, &root_commit)?;

        assert_eq!(merged["origin/shared"], vec![shared]);
        Ok(())
    }

    #[test]
    fn test_build_tree_marks_merged_stack_commit() -> Result<()> {
        let mut vcs = MemoryVcs::new();
        let root = vcs.add_root("root");
        let base = vcs.add_commit(&[&root], "base");
        vcs.set_remote_branch("origin/main", &base);
        vcs.visit(&base);
        let stack = vcs.commit_on_head("Feature X\n\nupstream: origin/feature-x\n");
        let landed = vcs.add_commit(&[&base], "Feature X (#12)\n\nupstream: origin/feature-x\n");
        vcs.set_remote_branch("origin/main", &landed);

        let tree = build_tree(
            &vcs,
            &TreeOptions {
                trunk_refs: vec!["origin/main".to_string()],
                hide_list: Default::default(),
                reflog_window: Duration::days(14),
                now: vcs.now(),
            },
        )?;

        let node = &tree.commit_nodes[&stack];
        assert!(node.is_merged());
        assert_eq!(
            node.merged_upstream_shas,
            [landed].into_iter().collect()
        );
        Ok(())
    }
}
