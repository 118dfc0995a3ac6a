//! Default locations for the base directory, the home directory and the
//! files dotfiler keeps inside the base directory.
//!
//! Everything here is driven by environment variables so tests and the CLI
//! can redirect a run without touching the real home directory:
//!
//! - `HOME` (`USERPROFILE` on Windows) - the tree symlinks are installed into
//! - `DOTFILER_BASE` - the directory holding the environments
//!   (defaults to `~/.dotfiles`)

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{BASE_DIR_ENV, CREATED_LINKS_FILENAME, DEFAULT_BASE_DIR_NAME, IGNORE_FILENAME};

#[derive(Debug, Error)]
pub enum PathsError {
  #[error("cannot determine home directory: {0} is not set")]
  HomeNotSet(&'static str),
}

#[cfg(windows)]
const HOME_ENV: &str = "USERPROFILE";

#[cfg(not(windows))]
const HOME_ENV: &str = "HOME";

/// Returns the user's home directory.
pub fn home_dir() -> Result<PathBuf, PathsError> {
  std::env::var_os(HOME_ENV)
    .filter(|value| !value.is_empty())
    .map(PathBuf::from)
    .ok_or(PathsError::HomeNotSet(HOME_ENV))
}

/// Returns the directory holding the environments.
///
/// `DOTFILER_BASE` takes precedence over `<home>/.dotfiles`.
pub fn base_dir() -> Result<PathBuf, PathsError> {
  if let Some(base) = base_dir_from_env() {
    return Ok(base);
  }
  Ok(home_dir()?.join(DEFAULT_BASE_DIR_NAME))
}

/// Like [`base_dir`], defaulting to `<home>/.dotfiles` for an explicit home.
pub fn base_dir_for(home: &Path) -> PathBuf {
  base_dir_from_env().unwrap_or_else(|| home.join(DEFAULT_BASE_DIR_NAME))
}

fn base_dir_from_env() -> Option<PathBuf> {
  std::env::var_os(BASE_DIR_ENV)
    .filter(|value| !value.is_empty())
    .map(PathBuf::from)
}

/// Path of the created-links record for a base directory.
pub fn created_links_path(base_dir: &Path) -> PathBuf {
  base_dir.join(CREATED_LINKS_FILENAME)
}

/// Path of the ignore-pattern file for a base directory.
pub fn ignore_file_path(base_dir: &Path) -> PathBuf {
  base_dir.join(IGNORE_FILENAME)
}
