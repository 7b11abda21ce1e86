//! Visibility tree construction.
//!
//! [`build_tree`] turns the current repository state into a [`HeadyTree`]: a
//! forest of [`CommitNode`]s covering every commit reachable from an
//! interesting tip but not from any trunk reference. Trunk-side parents become
//! the roots of the forest.
//!
//! Tips come from two places:
//! 1. The HEAD reflog, newest first, up to the recency window. Reflog entries
//!    also tell us which commits were superseded: `commit (amend):` entries
//!    supersede their old SHA, `heady move: <sha>` entries supersede `<sha>`.
//! 2. Every local branch head.
//!
//! Hidden, amended-away and moved-away commits are never tips. They only show
//! up (flagged hidden) when something visible still sits on top of them.

use crate::core::{
    error::Result,
    merged::collect_merged_upstreams,
    trailers,
    upstream::Upstream,
    vcs::{Commit, ReflogEntry, Vcs},
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const AMEND_PREFIX: &str = "commit (amend):";
pub const MOVE_TOKEN: &str = "heady move:";
pub const VISIT_TOKEN: &str = "heady visit:";

#[derive(Debug, Clone, Serialize)]
pub struct CommitNode {
    pub commit: Commit,
    /// SHAs of the child nodes, oldest first. Children always live in `commit_nodes`.
    pub children: Vec<String>,
    pub is_hidden: bool,
    pub in_trunk: bool,
    pub upstreams: BTreeSet<Upstream>,
    pub labels: Vec<String>,
    pub merged_upstream_shas: BTreeSet<String>,
    pub refs: BTreeSet<String>,
}

impl CommitNode {
    pub fn sha(&self) -> &str {
        &self.commit.sha
    }

    pub fn is_merged(&self) -> bool {
        !self.merged_upstream_shas.is_empty()
    }

    pub fn has_upstream(&self, name: &str) -> bool {
        self.upstreams.iter().any(|u| u.name == name)
    }
}

#[derive(Debug, Default, Serialize)]
pub struct HeadyTree {
    /// Non-trunk commits by SHA
    pub commit_nodes: BTreeMap<String, CommitNode>,
    /// Trunk-side roots, newest first
    pub trunk_nodes: Vec<CommitNode>,
    /// Non-trunk commits without any parent; they root their own stacks
    pub orphan_roots: Vec<String>,
    /// Amended SHA -> the SHA it replaced
    pub amend_source_map: BTreeMap<String, String>,
    /// Upstream name -> visible commits carrying it
    pub visible_upstream_shas: BTreeMap<String, Vec<String>>,
}

impl HeadyTree {
    /// Node for `sha`, looking at stack commits first, then trunk roots
    pub fn node(&self, sha: &str) -> Option<&CommitNode> {
        self.commit_nodes
            .get(sha)
            .or_else(|| self.trunk_nodes.iter().find(|n| n.sha() == sha))
    }

    pub fn children<'a>(&'a self, node: &'a CommitNode) -> impl Iterator<Item = &'a CommitNode> {
        node.children
            .iter()
            .filter_map(move |sha| self.commit_nodes.get(sha))
    }

    pub fn oldest_trunk_node(&self) -> Option<&CommitNode> {
        self.trunk_nodes.last()
    }
}

/// Inputs to [`build_tree`] besides the adapter itself.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub trunk_refs: Vec<String>,
    pub hide_list: BTreeSet<String>,
    pub reflog_window: Duration,
    pub now: DateTime<Utc>,
}

/// What the reflog walk found.
#[derive(Debug, Default, PartialEq)]
pub struct ReflogScan {
    pub tips: BTreeSet<String>,
    pub amend_source_map: BTreeMap<String, String>,
    pub superseded: BTreeSet<String>,
}

/// SHA named by a `heady move: <sha>` reflog message
pub fn parse_move_source(message: &str) -> Option<&str> {
    let (_, rest) = message.split_once(MOVE_TOKEN)?;
    rest.split_whitespace().next()
}

/// Walk reflog entries (newest first) until the recency window is exceeded.
///
/// Supersession only applies to entries older than the amend or move that
/// caused it, so checking out a moved-away commit again revives it as a tip.
pub fn scan_reflog(
    entries: &[ReflogEntry],
    hide_list: &BTreeSet<String>,
    window: Duration,
    now: DateTime<Utc>,
) -> ReflogScan {
    let mut scan = ReflogScan::default();

    for entry in entries {
        if now - entry.time > window {
            log::debug!("Reflog walk stopped at {} (outside window)", entry.new_sha);
            break;
        }
        if !hide_list.contains(&entry.new_sha) && !scan.superseded.contains(&entry.new_sha) {
            scan.tips.insert(entry.new_sha.clone());
        }

        if entry.message.starts_with(AMEND_PREFIX) {
            scan.amend_source_map
                .insert(entry.new_sha.clone(), entry.old_sha.clone());
            scan.superseded.insert(entry.old_sha.clone());
        } else if let Some(source) = parse_move_source(&entry.message) {
            scan.superseded.insert(source.to_string());
        }
    }

    scan
}

struct NodeFactory<'a, V: Vcs> {
    vcs: &'a V,
    hide_list: &'a BTreeSet<String>,
    superseded: &'a BTreeSet<String>,
    refs: &'a BTreeMap<String, BTreeSet<String>>,
    upstream_cache: HashMap<String, Upstream>,
}

impl<V: Vcs> NodeFactory<'_, V> {
    fn make(&mut self, commit: Commit, in_trunk: bool) -> Result<CommitNode> {
        let mut upstreams = BTreeSet::new();
        for name in trailers::upstreams(&commit.message) {
            if !self.upstream_cache.contains_key(&name) {
                let upstream = Upstream::lookup(self.vcs, &name)?;
                self.upstream_cache.insert(name.clone(), upstream);
            }
            upstreams.insert(self.upstream_cache[&name].clone());
        }

        Ok(CommitNode {
            is_hidden: self.hide_list.contains(&commit.sha)
                || self.superseded.contains(&commit.sha),
            in_trunk,
            upstreams,
            labels: trailers::labels(&commit.message),
            merged_upstream_shas: BTreeSet::new(),
            refs: self.refs.get(&commit.sha).cloned().unwrap_or_default(),
            children: Vec::new(),
            commit,
        })
    }
}

pub fn build_tree<V: Vcs>(vcs: &V, options: &TreeOptions) -> Result<HeadyTree> {
    // Trunk references must all resolve
    let mut trunk_shas = Vec::new();
    for trunk_ref in &options.trunk_refs {
        trunk_shas.push(vcs.resolve(trunk_ref)?.sha);
    }

    let reflog = vcs.reflog("HEAD")?;
    let scan = scan_reflog(&reflog, &options.hide_list, options.reflog_window, options.now);
    let mut tips = scan.tips.clone();
    log::debug!("Found {} tips in the reflog", tips.len());

    let mut refs: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for branch in vcs.branches()? {
        if !options.hide_list.contains(&branch.sha) {
            tips.insert(branch.sha.clone());
        }
        refs.entry(branch.sha).or_default().insert(branch.name);
    }
    for (trunk_ref, sha) in options.trunk_refs.iter().zip(&trunk_shas) {
        refs.entry(sha.clone()).or_default().insert(trunk_ref.clone());
    }

    let tips = filter_related_tips(vcs, tips, &trunk_shas)?;

    let branch_shas = if tips.is_empty() {
        Vec::new()
    } else {
        vcs.ancestor_range(&tips, &trunk_shas)?
    };
    log::debug!("{} commits outside trunk", branch_shas.len());

    let mut factory = NodeFactory {
        vcs,
        hide_list: &options.hide_list,
        superseded: &scan.superseded,
        refs: &refs,
        upstream_cache: HashMap::new(),
    };

    let mut commit_nodes = BTreeMap::new();
    for sha in &branch_shas {
        let commit = vcs.resolve(sha)?;
        commit_nodes.insert(sha.clone(), factory.make(commit, false)?);
    }

    let mut trunk_nodes: BTreeMap<String, CommitNode> = BTreeMap::new();
    for sha in &trunk_shas {
        if !trunk_nodes.contains_key(sha) {
            let commit = vcs.resolve(sha)?;
            trunk_nodes.insert(sha.clone(), factory.make(commit, true)?);
        }
    }

    // Link each node under the owner of its first parent
    let mut orphan_roots = Vec::new();
    let links: Vec<(String, Option<String>)> = commit_nodes
        .values()
        .map(|n: &CommitNode| (n.commit.sha.clone(), n.commit.first_parent().map(str::to_string)))
        .collect();
    for (sha, parent) in links {
        let Some(parent) = parent else {
            orphan_roots.push(sha);
            continue;
        };
        if let Some(parent_node) = commit_nodes.get_mut(&parent) {
            parent_node.children.push(sha);
            continue;
        }
        if !trunk_nodes.contains_key(&parent) {
            let commit = vcs.resolve(&parent)?;
            trunk_nodes.insert(parent.clone(), factory.make(commit, true)?);
        }
        if let Some(trunk_node) = trunk_nodes.get_mut(&parent) {
            trunk_node.children.push(sha);
        }
    }

    let times: HashMap<String, DateTime<Utc>> = commit_nodes
        .values()
        .map(|n| (n.commit.sha.clone(), n.commit.time))
        .collect();
    let by_time = |a: &String, b: &String| times[a].cmp(&times[b]).then_with(|| a.cmp(b));
    for node in commit_nodes.values_mut() {
        node.children.sort_by(by_time);
    }
    let mut trunk_nodes: Vec<CommitNode> = trunk_nodes.into_values().collect();
    for node in &mut trunk_nodes {
        node.children.sort_by(by_time);
    }
    trunk_nodes.sort_by(|a, b| {
        b.commit
            .time
            .cmp(&a.commit.time)
            .then_with(|| b.commit.sha.cmp(&a.commit.sha))
    });

    let mut tree = HeadyTree {
        commit_nodes,
        trunk_nodes,
        orphan_roots,
        amend_source_map: scan.amend_source_map,
        visible_upstream_shas: BTreeMap::new(),
    };

    annotate_merged(vcs, &mut tree, &options.trunk_refs)?;

    for node in tree.commit_nodes.values().filter(|n| !n.is_hidden) {
        for upstream in &node.upstreams {
            tree.visible_upstream_shas
                .entry(upstream.name.clone())
                .or_default()
                .push(node.commit.sha.clone());
        }
    }

    Ok(tree)
}

/// Drop tips sharing no history with any trunk reference
fn filter_related_tips<V: Vcs>(
    vcs: &V,
    tips: BTreeSet<String>,
    trunk_shas: &[String],
) -> Result<Vec<String>> {
    let mut related = Vec::new();
    for tip in tips {
        if vcs.resolve(&tip).is_err() {
            log::debug!("Skipping tip {tip}: no longer in the repository");
            continue;
        }
        let mut has_base = false;
        for trunk in trunk_shas {
            if vcs.merge_base(&tip, trunk)?.is_some() {
                has_base = true;
                break;
            }
        }
        if has_base {
            related.push(tip);
        } else {
            log::warn!("Skipping {tip}: it has no common ancestor with any trunk reference");
        }
    }
    Ok(related)
}

fn annotate_merged<V: Vcs>(vcs: &V, tree: &mut HeadyTree, trunk_refs: &[String]) -> Result<()> {
    if tree.commit_nodes.is_empty() {
        return Ok(());
    }
    let Some(oldest) = tree.oldest_trunk_node() else {
        return Ok(());
    };
    let merged = collect_merged_upstreams(vcs, trunk_refs, &oldest.commit)?;

    for node in tree.commit_nodes.values_mut() {
        let shas: Vec<String> = node
            .upstreams
            .iter()
            .filter_map(|u| merged.get(&u.name))
            .flatten()
            .cloned()
            .collect();
        node.merged_upstream_shas.extend(shas);
    }
    Ok(())
}

/// `node` and every node below it
pub fn collect_subtree_shas(tree: &HeadyTree, node: &CommitNode) -> BTreeSet<String> {
    let mut dest = BTreeSet::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if !dest.insert(current.commit.sha.clone()) {
            continue;
        }
        stack.extend(tree.children(current));
    }
    dest
}
