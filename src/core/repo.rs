//! A heady session over one repository.
//!
//! [`HeadyRepo`] bundles the VCS adapter with everything the operations need
//! besides it: the trunk references that actually resolve, the default remote,
//! the per-repository [`ConfigStore`] and the tree-building parameters.

use crate::core::{
    error::{HeadyError, Result},
    store::ConfigStore,
    tree::{build_tree, HeadyTree, TreeOptions},
    vcs::{Commit, Vcs},
};
use chrono::{DateTime, Duration, Utc};

pub struct HeadyRepo<V: Vcs> {
    pub vcs: V,
    pub trunk_refs: Vec<String>,
    pub remote: String,
    pub label_prefix: String,
    pub store: ConfigStore,
    pub reflog_window: Duration,
    now: Option<DateTime<Utc>>,
}

impl<V: Vcs> HeadyRepo<V> {
    /// Open a session, keeping only the trunk references that resolve.
    pub fn new(
        vcs: V,
        trunk_refs: &[String],
        remote: impl Into<String>,
        store: ConfigStore,
    ) -> Result<Self> {
        let mut resolved = Vec::new();
        for trunk_ref in trunk_refs {
            match vcs.resolve(trunk_ref) {
                Ok(_) => resolved.push(trunk_ref.clone()),
                Err(HeadyError::ReferenceNotFound { .. }) => {
                    log::warn!("Trunk reference {trunk_ref} does not resolve, ignoring it");
                }
                Err(e) => return Err(e),
            }
        }
        if resolved.is_empty() {
            return Err(HeadyError::NoTrunkReferences {
                refs: trunk_refs.join(", "),
            });
        }
        log::debug!("Using trunk references: {}", resolved.join(", "));

        Ok(Self {
            vcs,
            trunk_refs: resolved,
            remote: remote.into(),
            label_prefix: "heady".to_string(),
            store,
            reflog_window: Duration::days(14),
            now: None,
        })
    }

    pub fn with_reflog_window(mut self, window: Duration) -> Self {
        self.reflog_window = window;
        self
    }

    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    /// Pin the clock used for the reflog recency window.
    pub fn at_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Build the visibility tree from the current repository state.
    pub fn build_tree(&self) -> Result<HeadyTree> {
        let options = TreeOptions {
            trunk_refs: self.trunk_refs.clone(),
            hide_list: self.store.read_hide_list()?,
            reflog_window: self.reflog_window,
            now: self.now.unwrap_or_else(Utc::now),
        };
        build_tree(&self.vcs, &options)
    }

    pub fn resolve(&self, rev: &str) -> Result<Commit> {
        self.vcs.resolve(rev)
    }

    /// `rev` is an ancestor of (or equal to) any trunk reference.
    pub fn is_in_trunk(&self, rev: &str) -> Result<bool> {
        for trunk_ref in &self.trunk_refs {
            if self.vcs.is_ancestor(rev, trunk_ref)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Fail when `remote` is not configured.
    pub fn ensure_remote(&self, remote: &str) -> Result<String> {
        self.vcs
            .remote_url(remote)?
            .ok_or_else(|| HeadyError::remote_not_configured(remote))
    }
}
