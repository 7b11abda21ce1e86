//! Attaching `heady_label:` and `upstream:` trailers to stack commits.
//!
//! Both go through the same path: validate the target, append the trailer to
//! its message with an amend, then restack the pre-amend children onto the
//! amended commit.

use crate::core::{
    error::{HeadyError, Result},
    repo::HeadyRepo,
    restack::{amend_and_restack, ensure_clean, AmendOutcome},
    trailers::{append_trailer, LABEL_KEY, UPSTREAM_KEY},
    tree::HeadyTree,
    upstream::UpstreamRef,
    vcs::{Commit, Vcs},
};

#[derive(Debug)]
pub enum UpstreamOutcome {
    /// The commit already carried this upstream; nothing was rewritten.
    AlreadyAttached { sha: String },
    Attached(AmendOutcome),
}

/// Resolve `rev` and check it is a visible, non-trunk commit.
fn annotation_target<V: Vcs>(
    repo: &HeadyRepo<V>,
    rev: &str,
    action: &str,
) -> Result<(HeadyTree, Commit)> {
    let commit = repo.resolve(rev)?;
    if repo.is_in_trunk(rev)? {
        return Err(HeadyError::trunk_violation(rev, action));
    }
    let tree = repo.build_tree()?;
    match tree.commit_nodes.get(&commit.sha) {
        Some(node) if !node.is_hidden => Ok((tree, commit)),
        _ => Err(HeadyError::not_in_tree(rev)),
    }
}

/// Label `rev` with the next `<prefix>-<n>` label.
pub fn attach_label<V: Vcs>(
    repo: &mut HeadyRepo<V>,
    rev: &str,
    prefix: Option<&str>,
) -> Result<(String, AmendOutcome)> {
    let (tree, commit) = annotation_target(repo, rev, "label")?;
    if let Some(existing) = tree.commit_nodes[&commit.sha].labels.first() {
        return Err(HeadyError::AlreadyLabeled {
            rev: rev.to_string(),
            label: existing.clone(),
        });
    }
    // Checked here so a dirty tree does not burn a label number
    ensure_clean(&repo.vcs)?;

    let prefix = prefix.unwrap_or(&repo.label_prefix).to_string();
    let label = repo.store.acquire_next_label(&prefix)?;
    log::debug!("Labeling {} as {label}", commit.sha);

    let message = append_trailer(&commit.message, LABEL_KEY, &label);
    let outcome = amend_and_restack(&mut repo.vcs, &tree, &commit.sha, &message)?;
    Ok((label, outcome))
}

/// Associate `rev` with the remote branch `upstream_ref` (`<remote>/<branch>`).
pub fn attach_upstream<V: Vcs>(
    repo: &mut HeadyRepo<V>,
    upstream_ref: &str,
    rev: &str,
) -> Result<UpstreamOutcome> {
    let upstream = UpstreamRef::parse(upstream_ref)?;
    repo.ensure_remote(&upstream.remote)?;

    let (tree, commit) = annotation_target(repo, rev, "add upstream to")?;
    let name = upstream.name();
    if tree.commit_nodes[&commit.sha].has_upstream(&name) {
        return Ok(UpstreamOutcome::AlreadyAttached { sha: commit.sha });
    }

    let others: Vec<&String> = tree
        .visible_upstream_shas
        .get(&name)
        .map(|shas| shas.iter().filter(|sha| **sha != commit.sha).collect())
        .unwrap_or_default();
    if !others.is_empty() {
        let others: Vec<&str> = others.iter().map(|sha| sha.as_str()).collect();
        return Err(HeadyError::ambiguity(format!(
            "Upstream {name} is already carried by visible commit(s) {}. Hide them first",
            others.join(", ")
        )));
    }

    let message = append_trailer(&commit.message, UPSTREAM_KEY, &name);
    let outcome = amend_and_restack(&mut repo.vcs, &tree, &commit.sha, &message)?;
    Ok(UpstreamOutcome::Attached(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repo::test_support::{session, trunk_vcs};
    use crate::core::trailers;
    use tempfile::TempDir;

    #[test]
    fn test_attach_upstream_amends_and_restacks() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        let a = vcs.commit_on_head("A");
        let b = vcs.commit_on_head("B");
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        let UpstreamOutcome::Attached(outcome) = attach_upstream(&mut repo, "origin/feat-a", &a)?
        else {
            panic!("expected the upstream to be attached");
        };
        assert_eq!(
            trailers::upstreams(&outcome.amended.message),
            vec!["origin/feat-a"]
        );
        assert_eq!(outcome.moved[0].source, b);
        assert_eq!(repo.vcs.head_sha(), Some(outcome.amended.sha.as_str()));
        Ok(())
    }

    #[test]
    fn test_attach_existing_upstream_is_noop() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        let a = vcs.commit_on_head("A\n\nupstream: origin/feat-a\n");
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        let outcome = attach_upstream(&mut repo, "origin/feat-a", "HEAD")?;
        assert!(matches!(outcome, UpstreamOutcome::AlreadyAttached { sha } if sha == a));
        assert_eq!(repo.vcs.head_sha(), Some(a.as_str()));
        Ok(())
    }

    #[test]
    fn test_attach_upstream_carried_elsewhere_is_ambiguous() -> Result<()> {
        let (mut vcs, trunk) = trunk_vcs();
        vcs.commit_on_head("A\n\nupstream: origin/feat\n");
        vcs.visit(&trunk);
        let b = vcs.commit_on_head("B");
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        assert!(matches!(
            attach_upstream(&mut repo, "origin/feat", &b),
            Err(HeadyError::Ambiguity { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_attach_upstream_validation_order() -> Result<()> {
        let (mut vcs, trunk) = trunk_vcs();
        vcs.commit_on_head("A");
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        assert!(matches!(
            attach_upstream(&mut repo, "feature", "HEAD"),
            Err(HeadyError::MalformedUpstreamRef { .. })
        ));
        assert!(matches!(
            attach_upstream(&mut repo, "fork/feature", "HEAD"),
            Err(HeadyError::RemoteNotConfigured { .. })
        ));
        assert!(matches!(
            attach_upstream(&mut repo, "origin/feature", &trunk),
            Err(HeadyError::TrunkViolation { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_attach_label_uses_counter() -> Result<()> {
        let (mut vcs, trunk) = trunk_vcs();
        let a = vcs.commit_on_head("A");
        vcs.visit(&trunk);
        let b = vcs.commit_on_head("B");
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        let (first, outcome) = attach_label(&mut repo, &a, None)?;
        assert_eq!(first, "heady-1");
        assert_eq!(trailers::labels(&outcome.amended.message), vec!["heady-1"]);

        let (second, _) = attach_label(&mut repo, &b, Some("fix"))?;
        assert_eq!(second, "fix-1");
        Ok(())
    }

    #[test]
    fn test_relabel_is_rejected() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        vcs.commit_on_head("A\n\nheady_label: heady-7\n");
        let temp_dir = TempDir::new()?;
        let mut repo = session(vcs, &temp_dir);

        match attach_label(&mut repo, "HEAD", None) {
            Err(HeadyError::AlreadyLabeled { label, .. }) => assert_eq!(label, "heady-7"),
            other => panic!("expected AlreadyLabeled, got {other:?}"),
        }
        Ok(())
    }
}
