//! Record of the symlinks dotfiler has created.
//!
//! After every successful apply the full `target -> source` mapping is written
//! to `<base>/.created-links`. The next run reads it back to find links whose
//! source has since disappeared from its environment.
//!
//! # File Format
//!
//! ```text
//! /home/art/.vimrc -> /home/art/.dotfiles/base/.vimrc
//! /home/art/.zsh -> /home/art/.dotfiles/base/.zsh
//! ```
//!
//! One link per line, sorted by target.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

const SEPARATOR: &str = " -> ";

/// Errors that can occur when reading or writing the created-links record.
#[derive(Debug, Error)]
pub enum LinksError {
  /// Failed to read the record file.
  #[error("failed to read created links from {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to write the record file.
  #[error("failed to write created links to {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// A line is not of the form `target -> source`.
  #[error("malformed created links entry on line {line}: {content:?}")]
  Parse { line: usize, content: String },
}

/// Mapping from link path (target) to the environment file it points at (source).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CreatedLinks {
  links: BTreeMap<PathBuf, PathBuf>,
}

impl CreatedLinks {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.links.len()
  }

  pub fn is_empty(&self) -> bool {
    self.links.is_empty()
  }

  /// Source recorded for a link target.
  pub fn get(&self, target: &Path) -> Option<&Path> {
    self.links.get(target).map(PathBuf::as_path)
  }

  /// Iterate `(target, source)` pairs sorted by target.
  pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
    self.links.iter().map(|(target, source)| (target.as_path(), source.as_path()))
  }

  pub fn record(&mut self, target: impl Into<PathBuf>, source: impl Into<PathBuf>) {
    self.links.insert(target.into(), source.into());
  }

  pub fn forget(&mut self, target: &Path) -> Option<PathBuf> {
    self.links.remove(target)
  }

  /// Parse the textual record. Blank lines are skipped.
  pub fn parse(text: &str) -> Result<Self, LinksError> {
    let mut links = BTreeMap::new();
    for (idx, line) in text.lines().enumerate() {
      let line = line.trim();
      if line.is_empty() {
        continue;
      }
      let (target, source) = line
        .split_once(SEPARATOR)
        .filter(|(target, source)| !target.is_empty() && !source.is_empty())
        .ok_or_else(|| LinksError::Parse {
          line: idx + 1,
          content: line.to_string(),
        })?;
      links.insert(PathBuf::from(target.trim()), PathBuf::from(source.trim()));
    }
    Ok(Self { links })
  }

  /// Render the record, one `target -> source` line per link.
  pub fn to_text(&self) -> String {
    let mut out = String::new();
    for (target, source) in &self.links {
      out.push_str(&target.display().to_string());
      out.push_str(SEPARATOR);
      out.push_str(&source.display().to_string());
      out.push('\n');
    }
    out
  }

  /// Load the record from `path`.
  ///
  /// A missing file is an empty record (nothing was linked yet).
  pub fn load(path: &Path) -> Result<Self, LinksError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "created links file not found");
        return Ok(Self::new());
      }
      Err(e) => {
        return Err(LinksError::Read {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    let links = Self::parse(&content)?;
    info!(path = %path.display(), count = links.len(), "loaded created links");
    Ok(links)
  }

  /// Save the record to `path`.
  ///
  /// Writes to a temporary file in the same directory, then renames it over
  /// the old record so an interrupted run never leaves a truncated file.
  pub fn save(&self, path: &Path) -> Result<(), LinksError> {
    let write_err = |source: io::Error| LinksError::Write {
      path: path.to_path_buf(),
      source,
    };

    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(self.to_text().as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), count = self.len(), "saved created links");
    Ok(())
  }
}
