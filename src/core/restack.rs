//! The restack engine: re-applying commit subtrees onto new parents.
//!
//! Every relocation is a cherry-pick followed by two HEAD reflog entries, one
//! visiting the source commit and one moving to the new commit tagged
//! `heady move: <source>`. The tree builder reads those entries back to mark the
//! source superseded, so the reflog is the only record of where a commit went.
//!
//! Subtrees are walked depth-first with an explicit work stack. Each entry
//! carries the new parent it must land on, so siblings are picked onto the same
//! parent instead of onto each other.

use crate::core::{
    error::{HeadyError, Result},
    repo::HeadyRepo,
    tree::{collect_subtree_shas, HeadyTree, MOVE_TOKEN, VISIT_TOKEN},
    vcs::{Commit, Vcs},
};

/// A commit relocated by a restack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedCommit {
    pub source: String,
    pub new: String,
}

/// Result of an amend followed by a restack of the former children.
#[derive(Debug)]
pub struct AmendOutcome {
    pub amended: Commit,
    pub moved: Vec<MovedCommit>,
}

#[derive(Debug)]
pub enum FixupOutcome {
    NoAmendHistory { head: String },
    NoChildren { head: String },
    Restacked { head: String, moved: Vec<MovedCommit> },
}

/// Fail fast when the working tree has uncommitted changes.
pub fn ensure_clean<V: Vcs>(vcs: &V) -> Result<()> {
    if vcs.is_dirty()? {
        return Err(HeadyError::DirtyWorkingTree);
    }
    Ok(())
}

/// Check out `sha`, tagging the reflog entry as a heady navigation.
pub fn visit<V: Vcs>(vcs: &mut V, sha: &str) -> Result<()> {
    ensure_clean(vcs)?;
    vcs.checkout(sha, &format!("{VISIT_TOKEN} {sha}"))
}

fn record_move<V: Vcs>(vcs: &mut V, source: &str, new: &str) -> Result<()> {
    log::debug!("Record move {source} to {new}");
    vcs.set_head(source, &format!("{VISIT_TOKEN} {source}"))?;
    vcs.set_head(new, &format!("{MOVE_TOKEN} {source}"))
}

/// `sha` and its descendants in the tree, parents before children.
fn subtree_preorder(tree: &HeadyTree, sha: &str) -> Vec<String> {
    let mut order = Vec::new();
    let mut stack = vec![sha.to_string()];
    while let Some(current) = stack.pop() {
        if let Some(node) = tree.commit_nodes.get(&current) {
            stack.extend(node.children.iter().rev().cloned());
        }
        order.push(current);
    }
    order
}

/// Cherry-pick every subtree rooted at `sources` onto `base`.
///
/// Children are taken from `tree`, the snapshot built before any mutation.
/// On a failed pick the adapter has already aborted it; the error lists the
/// failing commit followed by everything that was still queued.
pub fn restack<V: Vcs>(
    vcs: &mut V,
    tree: &HeadyTree,
    sources: &[String],
    base: &str,
) -> Result<Vec<MovedCommit>> {
    let mut stack: Vec<(String, String)> = sources
        .iter()
        .rev()
        .map(|source| (source.clone(), base.to_string()))
        .collect();
    let mut moved = Vec::new();

    while let Some((source, parent)) = stack.pop() {
        visit(vcs, &parent)?;
        log::debug!("Cherry pick {source} onto {parent}");

        let new_commit = match vcs.cherry_pick(&source) {
            Ok(commit) => commit,
            Err(e) => {
                let mut pending = subtree_preorder(tree, &source);
                for (queued, _) in stack.iter().rev() {
                    pending.extend(subtree_preorder(tree, queued));
                }
                return Err(HeadyError::CherryPickFailed {
                    sha: source,
                    pending,
                    message: e.to_string(),
                });
            }
        };
        record_move(vcs, &source, &new_commit.sha)?;

        if let Some(node) = tree.commit_nodes.get(&source) {
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|child| (child.clone(), new_commit.sha.clone())),
            );
        }
        moved.push(MovedCommit {
            source,
            new: new_commit.sha,
        });
    }

    Ok(moved)
}

/// Move the subtree rooted at `source` so that it sits on top of `dest`.
pub fn move_subtree<V: Vcs>(
    repo: &mut HeadyRepo<V>,
    source: &str,
    dest: &str,
) -> Result<Vec<MovedCommit>> {
    let source_commit = repo.resolve(source)?;
    let dest_commit = repo.resolve(dest)?;
    if repo.is_in_trunk(source)? {
        return Err(HeadyError::trunk_violation(source, "move"));
    }

    let tree = repo.build_tree()?;
    let Some(node) = tree.commit_nodes.get(&source_commit.sha) else {
        return Err(HeadyError::not_in_tree(source));
    };
    if collect_subtree_shas(&tree, node).contains(&dest_commit.sha) {
        return Err(HeadyError::MoveIntoSubtree {
            source_rev: source.to_string(),
            dest: dest.to_string(),
        });
    }

    restack(&mut repo.vcs, &tree, &[source_commit.sha], &dest_commit.sha)
}

/// Rewrite the message of `target`, restack its children onto the rewritten
/// commit and leave HEAD on it.
pub fn amend_and_restack<V: Vcs>(
    vcs: &mut V,
    tree: &HeadyTree,
    target: &str,
    message: &str,
) -> Result<AmendOutcome> {
    visit(vcs, target)?;
    let amended = vcs.amend_head_message(message)?;
    log::debug!("Amended {target} into {}", amended.sha);

    let children = tree
        .commit_nodes
        .get(target)
        .map(|node| node.children.clone())
        .unwrap_or_default();
    let moved = restack(vcs, tree, &children, &amended.sha)?;
    visit(vcs, &amended.sha)?;

    Ok(AmendOutcome { amended, moved })
}

/// Re-attach the stack that sat on top of the pre-amend versions of HEAD.
pub fn fixup<V: Vcs>(repo: &mut HeadyRepo<V>) -> Result<FixupOutcome> {
    let tree = repo.build_tree()?;
    let head = repo.vcs.head()?.sha;

    let Some(first_source) = tree.amend_source_map.get(&head) else {
        return Ok(FixupOutcome::NoAmendHistory { head });
    };

    let mut children: Vec<String> = Vec::new();
    let mut seen = vec![head.clone()];
    let mut source = Some(first_source.clone());
    while let Some(sha) = source.take() {
        if seen.contains(&sha) {
            break;
        }
        if let Some(node) = tree.commit_nodes.get(&sha) {
            for child in tree.children(node) {
                let wanted = !child.is_hidden && child.sha() != head;
                if wanted && !children.iter().any(|c| c == child.sha()) {
                    children.push(child.sha().to_string());
                }
            }
        }
        source = tree.amend_source_map.get(&sha).cloned();
        seen.push(sha);
    }

    if children.is_empty() {
        return Ok(FixupOutcome::NoChildren { head });
    }

    let moved = restack(&mut repo.vcs, &tree, &children, &head)?;
    visit(&mut repo.vcs, &head)?;
    Ok(FixupOutcome::Restacked { head, moved })
}
