//! Centralized initialization shared by every subcommand.
//!
//! Each command needs the same setup before it can do anything:
//! 1. **Settings**: load (or create) `config.json` from the config directory
//! 2. **Repository discovery**: walk upward from `--repo` or the cwd
//! 3. **State store**: the per-repository hide-list and label counters
//! 4. **Trunk resolution**: keep only the trunk references that resolve
//!
//! Flags given on the command line override the settings file.

use crate::core::{
    config::Settings,
    error::{HeadyError, Result},
    git::GitRepo,
    repo::HeadyRepo,
    store::ConfigStore,
};
use std::env;
use std::path::PathBuf;

/// Flags accepted by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub repo: Option<PathBuf>,
    /// Comma-separated trunk references
    pub trunk: Option<String>,
    pub remote: Option<String>,
}

impl GlobalOptions {
    fn trunk_refs(&self) -> Option<Vec<String>> {
        self.trunk.as_ref().map(|trunk| {
            trunk
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

pub struct CommandInit;

impl CommandInit {
    /// Open a heady session over the repository the flags point at.
    pub fn initialize(options: &GlobalOptions) -> Result<HeadyRepo<GitRepo>> {
        let settings = Settings::load_or_create()?;
        Self::initialize_with(options, settings)
    }

    pub fn initialize_with(
        options: &GlobalOptions,
        settings: Settings,
    ) -> Result<HeadyRepo<GitRepo>> {
        let start = match &options.repo {
            Some(path) => path.clone(),
            None => env::current_dir()?,
        };
        let git_repo = GitRepo::open(&start).map_err(|_| HeadyError::NotInGitRepo)?;
        let store = ConfigStore::for_repo(git_repo.get_repository().path())?;
        log::debug!("Using state directory {}", store.dir().display());

        let trunk_refs = options.trunk_refs().unwrap_or(settings.trunk_refs.clone());
        let remote = options.remote.clone().unwrap_or(settings.remote.clone());

        Ok(HeadyRepo::new(git_repo, &trunk_refs, remote, store)?
            .with_reflog_window(settings.reflog_window())
            .with_label_prefix(settings.label_prefix))
    }
}
