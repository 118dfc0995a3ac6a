//! Environments and the files they contribute.
//!
//! An environment is a directory directly under the base directory. Every
//! file below it is a candidate for linking into the home directory, minus
//! `.git` directories and the names matched by `<base>/.dotignore`.
//!
//! # Ignore File
//!
//! One regular expression per line, matched case-insensitively against the
//! whole file name. Empty lines and lines starting with `#` are skipped.
//!
//! ```text
//! # editor leftovers
//! .*\.swp
//! README\.md
//! ```

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::consts::{IGNORED_DIRS, IGNORED_ENVS};
use crate::paths::ignore_file_path;
use crate::tree::ListingEntry;

/// Errors that can occur when enumerating environments.
#[derive(Debug, Error)]
pub enum EnvError {
  #[error("failed to read base directory {path}: {source}")]
  ReadBase {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read ignore file {path}: {source}")]
  ReadIgnore {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid pattern in {path}: {source}")]
  InvalidIgnorePattern {
    path: PathBuf,
    #[source]
    source: regex::Error,
  },

  #[error("failed to walk environment {environment}: {source}")]
  Walk {
    environment: String,
    #[source]
    source: walkdir::Error,
  },
}

/// Names of the environments under `base_dir`, sorted.
pub fn discover_environments(base_dir: &Path) -> Result<Vec<String>, EnvError> {
  let read_err = |source| EnvError::ReadBase {
    path: base_dir.to_path_buf(),
    source,
  };

  let mut environments = Vec::new();
  for entry in fs::read_dir(base_dir).map_err(read_err)? {
    let entry = entry.map_err(read_err)?;
    let Ok(name) = entry.file_name().into_string() else {
      warn!(path = %entry.path().display(), "skipping environment with non UTF-8 name");
      continue;
    };
    if IGNORED_ENVS.contains(&name.as_str()) || !entry.path().is_dir() {
      continue;
    }
    environments.push(name);
  }
  environments.sort();

  debug!(base = %base_dir.display(), ?environments, "discovered environments");
  Ok(environments)
}

/// Patterns from `<base>/.dotignore`; none when the file is absent.
pub fn load_ignore_patterns(base_dir: &Path) -> Result<Vec<String>, EnvError> {
  let path = ignore_file_path(base_dir);
  let content = match fs::read_to_string(&path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(EnvError::ReadIgnore { path, source: e }),
  };

  Ok(
    content
      .lines()
      .map(str::trim_end)
      .filter(|line| !line.is_empty() && !line.starts_with('#'))
      .map(String::from)
      .collect(),
  )
}

/// Whole-name, case-insensitive matcher over a list of ignore patterns.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
  regex: Option<Regex>,
}

impl IgnoreMatcher {
  pub fn new(patterns: &[String]) -> Result<Self, regex::Error> {
    if patterns.is_empty() {
      return Ok(Self::default());
    }
    let regex = RegexBuilder::new(&format!("^({})$", patterns.join("|")))
      .case_insensitive(true)
      .build()?;
    Ok(Self { regex: Some(regex) })
  }

  /// Build the matcher for `base_dir` from its ignore file.
  pub fn load(base_dir: &Path) -> Result<Self, EnvError> {
    let patterns = load_ignore_patterns(base_dir)?;
    Self::new(&patterns).map_err(|source| EnvError::InvalidIgnorePattern {
      path: ignore_file_path(base_dir),
      source,
    })
  }

  pub fn is_ignored(&self, file_name: &str) -> bool {
    self.regex.as_ref().is_some_and(|regex| regex.is_match(file_name))
  }
}

/// Every file of every environment, relative to its environment root.
///
/// Symlinked directories inside an environment are not descended into and
/// are not listed.
pub fn list_environment_files(
  base_dir: &Path,
  environments: &[String],
  ignore: &IgnoreMatcher,
) -> Result<Vec<ListingEntry>, EnvError> {
  let mut listing = Vec::new();

  for environment in environments {
    let root = base_dir.join(environment);
    let walker = WalkDir::new(&root)
      .follow_links(false)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| {
        !(entry.file_type().is_dir() && entry.file_name().to_str().is_some_and(|name| IGNORED_DIRS.contains(&name)))
      });

    let mut count = 0;
    for entry in walker {
      let entry = entry.map_err(|source| EnvError::Walk {
        environment: environment.clone(),
        source,
      })?;
      let file_type = entry.file_type();
      if file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir()) {
        continue;
      }

      let Some(name) = entry.file_name().to_str() else {
        warn!(path = %entry.path().display(), "skipping file with non UTF-8 name");
        continue;
      };
      if ignore.is_ignored(name) {
        debug!(path = %entry.path().display(), "ignored");
        continue;
      }

      let Some(relative) = relative_slash_path(&root, entry.path()) else {
        warn!(path = %entry.path().display(), "skipping file with non UTF-8 path");
        continue;
      };
      listing.push(ListingEntry::new(environment.as_str(), relative));
      count += 1;
    }
    debug!(environment = %environment, files = count, "listed environment");
  }

  Ok(listing)
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
  let relative = path.strip_prefix(root).ok()?;
  let mut segments = Vec::new();
  for component in relative.components() {
    match component {
      Component::Normal(name) => segments.push(name.to_str()?),
      _ => return None,
    }
  }
  Some(segments.join("/"))
}
