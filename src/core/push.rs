//! Pushing every upstream of a subtree in one round trip.

use crate::core::{
    error::{HeadyError, Result},
    repo::HeadyRepo,
    tree::{CommitNode, HeadyTree},
    vcs::Vcs,
};

/// `<sha>:refs/heads/<branch>` refspecs for every node under `root` (itself
/// included) whose upstreams point at `remote`, parents before children.
pub fn plan_push(tree: &HeadyTree, root: &CommitNode, remote: &str) -> Vec<String> {
    let mut refspecs = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        for upstream in &node.upstreams {
            match upstream.branch_on(remote) {
                Some(branch) => refspecs.push(format!("{}:refs/heads/{branch}", node.sha())),
                None => log::debug!(
                    "Skipping upstream {} of {}: not on {remote}",
                    upstream.name,
                    node.commit.short_sha()
                ),
            }
        }
        let children: Vec<&CommitNode> = tree.children(node).collect();
        stack.extend(children.into_iter().rev());
    }
    refspecs
}

/// Push the subtree rooted at `rev` to `remote`; returns the refspecs pushed.
pub fn push_commits<V: Vcs>(
    repo: &mut HeadyRepo<V>,
    remote: &str,
    rev: &str,
) -> Result<Vec<String>> {
    let commit = repo.resolve(rev)?;
    let tree = repo.build_tree()?;
    let Some(root) = tree.commit_nodes.get(&commit.sha) else {
        return Err(HeadyError::not_in_tree(rev));
    };
    repo.ensure_remote(remote)?;

    let refspecs = plan_push(&tree, root, remote);
    if refspecs.is_empty() {
        log::debug!("Nothing under {rev} has an upstream on {remote}");
        return Ok(refspecs);
    }
    repo.vcs.push(remote, &refspecs)?;
    Ok(refspecs)
}
