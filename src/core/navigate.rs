//! Moving HEAD around the stack using tree directions.

use crate::core::{
    error::{HeadyError, Result},
    repo::HeadyRepo,
    restack::visit,
    tree::{CommitNode, HeadyTree},
    vcs::Vcs,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GotoTarget {
    /// The only child of HEAD
    Next,
    /// The first parent of HEAD
    Prev,
    /// The end of HEAD's stack, as long as it does not fork
    Tip,
    /// The single visible commit carrying this upstream
    Upstream(String),
}

impl GotoTarget {
    pub fn name(&self) -> &'static str {
        match self {
            GotoTarget::Next => "next",
            GotoTarget::Prev => "prev",
            GotoTarget::Tip => "tip",
            GotoTarget::Upstream(_) => "upstream",
        }
    }
}

fn only_child<'a>(
    tree: &'a HeadyTree,
    node: &'a CommitNode,
    target: &GotoTarget,
) -> Result<Option<&'a CommitNode>> {
    let mut children = tree.children(node);
    match (children.next(), children.next()) {
        (None, _) => Ok(None),
        (Some(child), None) => Ok(Some(child)),
        (Some(_), Some(_)) => Err(HeadyError::navigation(format!(
            "Can't 'goto {}' from a node with more than one child in the tree",
            target.name()
        ))),
    }
}

/// Resolve `target` against the current tree and check it out.
/// Returns the SHA HEAD now points at.
pub fn goto<V: Vcs>(repo: &mut HeadyRepo<V>, target: &GotoTarget) -> Result<String> {
    let tree = repo.build_tree()?;

    let dest = match target {
        GotoTarget::Upstream(name) => match tree
            .visible_upstream_shas
            .get(name)
            .map(Vec::as_slice)
        {
            None | Some([]) => {
                return Err(HeadyError::ambiguity(format!(
                    "No visible commits marked with upstream {name} found"
                )))
            }
            Some([sha]) => sha.clone(),
            Some(shas) => {
                return Err(HeadyError::ambiguity(format!(
                    "Found multiple visible commits marked with {name}. \
                     Hide all but one and try again: {}",
                    shas.join(", ")
                )))
            }
        },
        GotoTarget::Prev => {
            let head = repo.vcs.head()?;
            match head.first_parent() {
                Some(parent) => parent.to_string(),
                None => return Err(HeadyError::navigation("Can't 'goto prev' from a root commit")),
            }
        }
        GotoTarget::Next | GotoTarget::Tip => {
            let head = repo.vcs.head()?;
            let Some(mut node) = tree.node(&head.sha) else {
                return Err(HeadyError::not_in_tree("HEAD"));
            };
            if *target == GotoTarget::Next {
                match only_child(&tree, node, target)? {
                    Some(child) => child.sha().to_string(),
                    None => {
                        return Err(HeadyError::navigation(
                            "Can't 'goto next' from a node without a child",
                        ))
                    }
                }
            } else {
                while let Some(child) = only_child(&tree, node, target)? {
                    node = child;
                }
                node.sha().to_string()
            }
        }
    };

    log::debug!("goto {} resolved to {dest}", target.name());
    visit(&mut repo.vcs, &dest)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repo::test_support::{session, trunk_vcs};
    use tempfile::TempDir;

    #[test]
    fn test_next_prev_and_tip() -> Result<()> {
        let (mut vcs, trunk) = trunk_vcs();
        let a = vcs.commit_on_head("A");
        let b = vcs.commit_on_head("B");
        let c = vcs.commit_on_head("C");
        vcs.visit(&a);
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        assert_eq!(goto(&mut repo, &GotoTarget::Next)?, b);
        assert_eq!(goto(&mut repo, &GotoTarget::Tip)?, c);
        assert_eq!(goto(&mut repo, &GotoTarget::Prev)?, b);
        goto(&mut repo, &GotoTarget::Prev)?;
        assert_eq!(goto(&mut repo, &GotoTarget::Prev)?, trunk);
        // From the trunk root the whole stack is one line
        assert_eq!(goto(&mut repo, &GotoTarget::Tip)?, c);
        Ok(())
    }

    #[test]
    fn test_next_on_fork_is_refused() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        let a = vcs.commit_on_head("A");
        vcs.commit_on_head("B");
        vcs.visit(&a);
        vcs.commit_on_head("C");
        vcs.visit(&a);
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        assert!(matches!(
            goto(&mut repo, &GotoTarget::Next),
            Err(HeadyError::Navigation { .. })
        ));
        assert!(matches!(
            goto(&mut repo, &GotoTarget::Tip),
            Err(HeadyError::Navigation { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_next_without_child() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        vcs.commit_on_head("A");
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        match goto(&mut repo, &GotoTarget::Next) {
            Err(HeadyError::Navigation { message }) => assert!(message.contains("without a child")),
            other => panic!("expected Navigation error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_goto_upstream() -> Result<()> {
        let (mut vcs, trunk) = trunk_vcs();
        let a = vcs.commit_on_head("A\n\nupstream: origin/feat\n");
        vcs.visit(&trunk);
        vcs.commit_on_head("B\n\nupstream: origin/dup\n");
        vcs.visit(&trunk);
        vcs.commit_on_head("C\n\nupstream: origin/dup\n");
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        assert_eq!(goto(&mut repo, &GotoTarget::Upstream("origin/feat".into()))?, a);
        assert!(matches!(
            goto(&mut repo, &GotoTarget::Upstream("origin/dup".into())),
            Err(HeadyError::Ambiguity { .. })
        ));
        assert!(matches!(
            goto(&mut repo, &GotoTarget::Upstream("origin/none".into())),
            Err(HeadyError::Ambiguity { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_dirty_tree_blocks_goto() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        vcs.commit_on_head("A");
        vcs.set_dirty(true);
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        assert!(matches!(
            goto(&mut repo, &GotoTarget::Prev),
            Err(HeadyError::DirtyWorkingTree)
        ));
        Ok(())
    }
}
