//! Persisted per-repository state: the hide-list and the label counters.
//!
//! A [`ConfigStore`] is built once per invocation and handed to whatever needs
//! persisted state. Both files are flat text so they stay easy to inspect and
//! edit by hand:
//!
//! - `hidelist`: one commit SHA per line
//! - `labels`: one `<prefix> <last number>` pair per line

use crate::core::dirs::get_repo_state_directory;
use crate::core::error::{HeadyError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const HIDE_LIST_FILE: &str = "hidelist";
const LABELS_FILE: &str = "labels";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Store scoped to the repository whose git dir is `git_dir`
    pub fn for_repo(git_dir: &Path) -> Result<Self> {
        Ok(Self::at(get_repo_state_directory(git_dir)?))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `name` inside the store, created empty when missing
    fn ensure_file(&self, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        if !path.exists() {
            log::debug!("Creating empty store file: {}", path.display());
            fs::write(&path, "")?;
        }
        Ok(path)
    }

    pub fn read_hide_list(&self) -> Result<BTreeSet<String>> {
        let path = self.ensure_file(HIDE_LIST_FILE)?;
        let content = fs::read_to_string(&path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn append_to_hide_list<'a>(
        &self,
        shas: impl IntoIterator<Item = &'a String>,
    ) -> Result<()> {
        let path = self.ensure_file(HIDE_LIST_FILE)?;
        let mut file = OpenOptions::new().append(true).open(&path)?;
        for sha in shas {
            writeln!(file, "{sha}")?;
        }
        Ok(())
    }

    pub fn replace_hide_list<'a>(&self, shas: impl IntoIterator<Item = &'a String>) -> Result<()> {
        let path = self.ensure_file(HIDE_LIST_FILE)?;
        let content: String = shas.into_iter().map(|sha| format!("{sha}\n")).collect();
        fs::write(&path, content)?;
        Ok(())
    }

    /// Next label for `prefix` (`<prefix>-<n>`), persisting the new counter
    pub fn acquire_next_label(&self, prefix: &str) -> Result<String> {
        let path = self.ensure_file(LABELS_FILE)?;
        let mut counters = read_counters(&path)?;

        let next = counters.get(prefix).copied().unwrap_or(0) + 1;
        counters.insert(prefix.to_string(), next);

        let content: String = counters
            .iter()
            .map(|(label, number)| format!("{label} {number}\n"))
            .collect();
        fs::write(&path, content)?;

        Ok(format!("{prefix}-{next}"))
    }
}

fn read_counters(path: &Path) -> Result<BTreeMap<String, u64>> {
    let mut counters = BTreeMap::new();
    for line in fs::read_to_string(path)?.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let (Some(prefix), Some(number), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(HeadyError::corrupt_store(path, line));
        };
        let number = number
            .parse::<u64>()
            .map_err(|_| HeadyError::corrupt_store(path, line))?;
        counters.insert(prefix.to_string(), number);
    }
    Ok(counters)
}
