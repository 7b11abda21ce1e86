use crate::core::error::HeadyError;
use std::path::{Path, PathBuf};

pub fn get_config_directory() -> Result<PathBuf, HeadyError> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => {
            std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config"))
        },
        "macos" => {
            dirs::home_dir()
                .unwrap_or_default()
                .join("Library/Application Support")
        },
        "windows" => {
            dirs::config_dir().unwrap_or_default()
        },
        _ => dirs::config_dir().unwrap_or_default(),
    };

    Ok(base.join("heady"))
}

/// Per-repository state directory, keyed by a hash of the repository's git dir
pub fn get_repo_state_directory(git_dir: &Path) -> Result<PathBuf, HeadyError> {
    let resolved = git_dir.canonicalize().unwrap_or_else(|_| git_dir.to_path_buf());
    let repo_hash = format!("{:x}", md5::compute(resolved.to_string_lossy().as_bytes()));

    log::debug!("get_repo_state_directory: git_dir = {resolved:?}, hash = {repo_hash}");

    Ok(get_config_directory()?.join("repos").join(repo_hash))
}
