//! In-memory [`Vcs`] implementation.
//!
//! Holds a commit DAG, branch and remote refs, a HEAD reflog and a clock.
//! The tree builder and restack engine run against it in tests exactly as they
//! run against a real repository.

use crate::core::{
    error::{HeadyError, Result},
    vcs::{BranchHead, Commit, ReflogEntry, Vcs},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

pub struct MemoryVcs {
    commits: HashMap<String, Commit>,
    branches: BTreeMap<String, String>,
    remote_branches: BTreeMap<String, String>,
    remotes: BTreeMap<String, String>,
    head: Option<String>,
    reflog: Vec<ReflogEntry>,
    clock: DateTime<Utc>,
    dirty: bool,
    conflicts: HashSet<String>,
    pushes: Vec<(String, Vec<String>)>,
    counter: u64,
}

impl Default for MemoryVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVcs {
    pub fn new() -> Self {
        Self {
            commits: HashMap::new(),
            branches: BTreeMap::new(),
            remote_branches: BTreeMap::new(),
            remotes: BTreeMap::new(),
            head: None,
            reflog: Vec::new(),
            clock: Utc
                .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
                .single()
                .unwrap_or_default(),
            dirty: false,
            conflicts: HashSet::new(),
            pushes: Vec::new(),
            counter: 0,
        }
    }

    /// Current time of the repository clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn advance_clock(&mut self, by: Duration) {
        self.clock += by;
    }

    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::minutes(1);
        self.clock
    }

    /// Create a commit without touching HEAD or the reflog.
    pub fn add_commit<S: AsRef<str>>(&mut self, parents: &[S], message: &str) -> String {
        let parents: Vec<&str> = parents.iter().map(AsRef::as_ref).collect();
        self.counter += 1;
        let time = self.tick();
        let sha = format!(
            "{:x}",
            md5::compute(format!("{}:{}:{}", self.counter, parents.join(","), message))
        );
        self.commits.insert(
            sha.clone(),
            Commit {
                sha: sha.clone(),
                parents: parents.iter().map(|p| p.to_string()).collect(),
                message: message.to_string(),
                time,
            },
        );
        sha
    }

    /// Create a parentless commit
    pub fn add_root(&mut self, message: &str) -> String {
        self.add_commit::<&str>(&[], message)
    }

    /// Commit on top of HEAD the way `git commit` does, reflog included.
    pub fn commit_on_head(&mut self, message: &str) -> String {
        let parent = self.head.clone();
        let parents: Vec<&str> = parent.iter().map(String::as_str).collect();
        let sha = self.add_commit(&parents, message);
        let summary = message.lines().next().unwrap_or("").to_string();
        self.move_head(&sha, &format!("commit: {summary}"));
        sha
    }

    /// Plain checkout as a user would do it outside heady.
    pub fn visit(&mut self, sha: &str) {
        self.move_head(sha, &format!("checkout: moving to {sha}"));
    }

    pub fn set_branch(&mut self, name: &str, sha: &str) {
        self.branches.insert(name.to_string(), sha.to_string());
    }

    pub fn set_remote_branch(&mut self, name: &str, sha: &str) {
        self.remote_branches.insert(name.to_string(), sha.to_string());
    }

    pub fn add_remote(&mut self, name: &str, url: &str) {
        self.remotes.insert(name.to_string(), url.to_string());
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Make every later cherry-pick of `sha` fail with a conflict.
    pub fn fail_cherry_pick(&mut self, sha: &str) {
        self.conflicts.insert(sha.to_string());
    }

    pub fn pushes(&self) -> &[(String, Vec<String>)] {
        &self.pushes
    }

    pub fn head_sha(&self) -> Option<&str> {
        self.head.as_deref()
    }

    pub fn commit(&self, sha: &str) -> Option<&Commit> {
        self.commits.get(sha)
    }

    /// Every commit whose first parent is `sha`, oldest first.
    pub fn children_of(&self, sha: &str) -> Vec<&Commit> {
        let mut children: Vec<&Commit> = self
            .commits
            .values()
            .filter(|c| c.first_parent() == Some(sha))
            .collect();
        children.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.sha.cmp(&b.sha)));
        children
    }

    fn move_head(&mut self, sha: &str, message: &str) {
        let time = self.tick();
        let old_sha = self.head.clone().unwrap_or_else(|| "0".repeat(40));
        self.reflog.insert(
            0,
            ReflogEntry {
                old_sha,
                new_sha: sha.to_string(),
                message: message.to_string(),
                time,
            },
        );
        self.head = Some(sha.to_string());
    }

    fn lookup(&self, rev: &str) -> Option<String> {
        let rev = rev
            .strip_prefix("refs/heads/")
            .or_else(|| rev.strip_prefix("refs/remotes/"))
            .unwrap_or(rev);
        if rev == "HEAD" {
            return self.head.clone();
        }
        if self.commits.contains_key(rev) {
            return Some(rev.to_string());
        }
        self.branches
            .get(rev)
            .or_else(|| self.remote_branches.get(rev))
            .cloned()
    }

    fn closure(&self, starts: &[String]) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        for start in starts {
            queue.push_back(self.resolve(start)?.sha);
        }
        while let Some(sha) = queue.pop_front() {
            if !seen.insert(sha.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&sha) {
                queue.extend(commit.parents.iter().cloned());
                order.push(sha);
            }
        }
        Ok(order)
    }
}

impl Vcs for MemoryVcs {
    fn resolve(&self, rev: &str) -> Result<Commit> {
        self.lookup(rev)
            .and_then(|sha| self.commits.get(&sha).cloned())
            .ok_or_else(|| HeadyError::reference_not_found(rev))
    }

    fn ancestor_range(&self, include: &[String], exclude: &[String]) -> Result<Vec<String>> {
        let excluded: HashSet<String> = self.closure(exclude)?.into_iter().collect();
        let mut range: Vec<String> = self
            .closure(include)?
            .into_iter()
            .filter(|sha| !excluded.contains(sha))
            .collect();
        range.sort_by(|a, b| self.commits[b].time.cmp(&self.commits[a].time).then(a.cmp(b)));
        Ok(range)
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        let b_ancestors: HashSet<String> =
            self.closure(&[b.to_string()])?.into_iter().collect();
        Ok(self
            .closure(&[a.to_string()])?
            .into_iter()
            .find(|sha| b_ancestors.contains(sha)))
    }

    fn reflog(&self, refname: &str) -> Result<Vec<ReflogEntry>> {
        if refname == "HEAD" {
            Ok(self.reflog.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn branches(&self) -> Result<Vec<BranchHead>> {
        Ok(self
            .branches
            .iter()
            .map(|(name, sha)| BranchHead {
                name: name.clone(),
                sha: sha.clone(),
            })
            .collect())
    }

    fn remote_branch(&self, name: &str) -> Result<Option<Commit>> {
        Ok(self
            .remote_branches
            .get(name)
            .and_then(|sha| self.commits.get(sha))
            .cloned())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn checkout(&mut self, sha: &str, message: &str) -> Result<()> {
        let sha = self.resolve(sha)?.sha;
        self.move_head(&sha, message);
        Ok(())
    }

    fn set_head(&mut self, sha: &str, message: &str) -> Result<()> {
        self.checkout(sha, message)
    }

    fn cherry_pick(&mut self, sha: &str) -> Result<Commit> {
        let source = self.resolve(sha)?;
        if self.conflicts.contains(&source.sha) {
            return Err(HeadyError::git_command(
                "cherry-pick",
                format!("could not apply {}", source.short_sha()),
            ));
        }
        let head = self.head()?.sha;
        let new_sha = self.add_commit(&[head.as_str()], &source.message);
        self.move_head(&new_sha, &format!("cherry-pick: {}", source.summary()));
        self.resolve(&new_sha)
    }

    fn amend_head_message(&mut self, message: &str) -> Result<Commit> {
        let head = self.head()?;
        let parents: Vec<&str> = head.parents.iter().map(String::as_str).collect();
        let new_sha = self.add_commit(&parents, message);
        let summary = message.lines().next().unwrap_or("").to_string();
        self.move_head(&new_sha, &format!("commit (amend): {summary}"));
        self.resolve(&new_sha)
    }

    fn push(&mut self, remote: &str, refspecs: &[String]) -> Result<()> {
        if !self.remotes.contains_key(remote) {
            return Err(HeadyError::remote_not_configured(remote));
        }
        self.pushes.push((remote.to_string(), refspecs.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestor_range_excludes_trunk_history() {
        let mut vcs = MemoryVcs::new();
        let root = vcs.add_root("root");
        let trunk = vcs.add_commit(&[&root], "trunk");
        let a = vcs.add_commit(&[&trunk], "a");
        let b = vcs.add_commit(&[&a], "b");
        vcs.set_branch("main", &trunk);

        let range = vcs
            .ancestor_range(&[b.clone()], &["main".to_string()])
            .unwrap();
        assert_eq!(range, vec![b, a.clone()]);
        assert!(vcs.is_ancestor(&root, &a).unwrap());
        assert!(!vcs.is_ancestor(&a, "main").unwrap());
    }

    #[test]
    fn test_merge_base_of_unrelated_histories() {
        let mut vcs = MemoryVcs::new();
        let one = vcs.add_root("one");
        let other = vcs.add_root("other");
        assert_eq!(vcs.merge_base(&one, &other).unwrap(), None);
        let child = vcs.add_commit(&[&one], "child");
        assert_eq!(vcs.merge_base(&child, &one).unwrap(), Some(one));
    }

    #[test]
    fn test_commit_on_head_writes_reflog_newest_first() {
        let mut vcs = MemoryVcs::new();
        let first = vcs.commit_on_head("first");
        let second = vcs.commit_on_head("second");
        let reflog = vcs.reflog("HEAD").unwrap();
        assert_eq!(reflog[0].new_sha, second);
        assert_eq!(reflog[0].old_sha, first);
        assert_eq!(reflog[0].message, "commit: second");
        assert_eq!(vcs.head().unwrap().parents, vec![first]);
    }

    #[test]
    fn test_unknown_reference() {
        let vcs = MemoryVcs::new();
        assert!(matches!(
            vcs.resolve("nope"),
            Err(HeadyError::ReferenceNotFound { .. })
        ));
    }
}
