//! GitHub compare links for opening stacked pull requests.

use crate::core::{
    error::{HeadyError, Result},
    repo::HeadyRepo,
    vcs::Vcs,
};

/// Web URL (`https://host/owner/repo`) of a GitHub-style remote URL.
///
/// Accepts `git@host:owner/repo.git`, `ssh://git@host/owner/repo.git` and
/// `https://host/owner/repo(.git)`.
pub fn web_url(remote_url: &str) -> Option<String> {
    let url = remote_url.trim().trim_end_matches('/');
    let web = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    let (host, path) = if let Some(rest) = web {
        rest.split_once('/')?
    } else if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, host)| host);
        rest.split_once('/')?
    } else {
        let (user_host, path) = url.split_once(':')?;
        (user_host.split_once('@').map_or(user_host, |(_, host)| host), path)
    };

    let host = host.rsplit_once('@').map_or(host, |(_, host)| host);
    let path = path.trim_end_matches(".git");
    if host.is_empty() || path.split('/').filter(|part| !part.is_empty()).count() < 2 {
        return None;
    }
    Some(format!("https://{host}/{path}"))
}

/// Compare links for opening a pull request for `rev`, one per upstream.
///
/// A commit sitting directly on trunk targets the default branch. A commit
/// stacked on another one targets its parent's upstream branches.
pub fn pr_links<V: Vcs>(repo: &HeadyRepo<V>, rev: &str) -> Result<Vec<String>> {
    let commit = repo.resolve(rev)?;
    let tree = repo.build_tree()?;
    let Some(node) = tree.commit_nodes.get(&commit.sha) else {
        return Err(HeadyError::not_in_tree(rev));
    };
    if node.upstreams.is_empty() {
        return Err(HeadyError::NoUpstream {
            rev: rev.to_string(),
        });
    }

    let remote_url = repo.ensure_remote(&repo.remote)?;
    let base_url = web_url(&remote_url).ok_or_else(|| {
        HeadyError::git_command(
            "remote",
            format!("Can not derive a web URL from {remote_url}"),
        )
    })?;

    let branches: Vec<&str> = node
        .upstreams
        .iter()
        .filter_map(|u| u.branch_on(&repo.remote))
        .collect();

    let Some(parent) = commit.first_parent() else {
        return Err(HeadyError::navigation(format!("{rev} has no parent to compare against")));
    };
    if repo.is_in_trunk(parent)? {
        return Ok(branches
            .iter()
            .map(|branch| format!("{base_url}/compare/{branch}?expand=1"))
            .collect());
    }

    let parent_node = tree
        .commit_nodes
        .get(parent)
        .ok_or_else(|| HeadyError::not_in_tree(parent))?;
    let bases: Vec<&str> = parent_node
        .upstreams
        .iter()
        .filter_map(|u| u.branch_on(&repo.remote))
        .collect();
    if bases.is_empty() {
        return Err(HeadyError::NoUpstream {
            rev: parent.to_string(),
        });
    }

    let mut links = Vec::new();
    for branch in &branches {
        for base in &bases {
            links.push(format!("{base_url}/compare/{base}...{branch}?expand=1"));
        }
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repo::test_support::{session, trunk_vcs};
    use tempfile::TempDir;

    #[test]
    fn test_web_url_forms() {
        let expected = Some("https://github.com/acme/widgets".to_string());
        assert_eq!(web_url("git@github.com:acme/widgets.git"), expected);
        assert_eq!(web_url("https://github.com/acme/widgets.git"), expected);
        assert_eq!(web_url("https://github.com/acme/widgets"), expected);
        assert_eq!(web_url("ssh://git@github.com/acme/widgets.git"), expected);
        assert_eq!(web_url("/srv/git/widgets.git"), None);
    }

    #[test]
    fn test_pr_link_on_trunk() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        vcs.commit_on_head("A\n\nupstream: origin/feat-a\n");
        let temp_dir = TempDir::new()?;
        let repo = session(vcs, &temp_dir);

        assert_eq!(
            pr_links(&repo, "HEAD")?,
            vec!["https://github.com/acme/widgets/compare/feat-a?expand=1"]
        );
        Ok(())
    }

    #[test]
    fn test_pr_link_stacked_on_parent_upstream() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        vcs.commit_on_head("A\n\nupstream: origin/feat-a\n");
        vcs.commit_on_head("B\n\nupstream: origin/feat-b\n");
        let temp_dir = TempDir::new()?;
        let repo = session(vcs, &temp_dir);

        assert_eq!(
            pr_links(&repo, "HEAD")?,
            vec!["https://github.com/acme/widgets/compare/feat-a...feat-b?expand=1"]
        );
        Ok(())
    }

    #[test]
    fn test_pr_without_upstream() -> Result<()> {
        let (mut vcs, _) = trunk_vcs();
        vcs.commit_on_head("A");
        let temp_dir = TempDir::new()?;
        let repo = session(vcs, &temp_dir);

        assert!(matches!(
            pr_links(&repo, "HEAD"),
            Err(HeadyError::NoUpstream { .. })
        ));
        Ok(())
    }
}
