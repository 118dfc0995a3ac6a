mod status;
mod update;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use dotfiler_lib::paths;

pub use status::cmd_status;
pub use update::cmd_update;

/// Canonical base and home directories for a run.
#[derive(Debug)]
pub struct Dirs {
  pub base: PathBuf,
  pub home: PathBuf,
}

/// Resolve the directories from flags, falling back to the environment.
///
/// Both are canonicalized so that a symlink on the way to the home directory
/// is not mistaken for a symlinked parent of every target.
pub fn resolve_dirs(base: Option<PathBuf>, home: Option<PathBuf>) -> Result<Dirs> {
  let base = match (base, &home) {
    (Some(base), _) => base,
    (None, Some(home)) => paths::base_dir_for(home),
    (None, None) => paths::base_dir()?,
  };
  let home = match home {
    Some(home) => home,
    None => paths::home_dir()?,
  };

  let dirs = Dirs {
    base: canonical(&base, "base")?,
    home: canonical(&home, "home")?,
  };
  debug!(base = %dirs.base.display(), home = %dirs.home.display(), "resolved directories");
  Ok(dirs)
}

fn canonical(path: &Path, what: &str) -> Result<PathBuf> {
  dunce::canonicalize(path).with_context(|| format!("{} directory {} does not exist", what, path.display()))
}
