//! Test utilities for dotfiler-lib.
//!
//! [`FakeFs`] is an in-memory [`Filesystem`] described by a small text
//! format, one entry per line:
//!
//! ```text
//! /home/art/.zsh/                                   # directory
//! /home/art/.zsh/aliases                            # file
//! /home/art/.zshrc -> /home/art/.dotfiles/base/.zshrc   # symlink
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Parent directories
//! are not implied; the planner only ever asks about the paths it cares about.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs::Filesystem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeEntry {
  pub is_dir: bool,
  pub link: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct FakeFs {
  entries: RefCell<BTreeMap<PathBuf, FakeEntry>>,
}

impl FakeFs {
  pub fn parse(text: &str) -> Self {
    let mut entries = BTreeMap::new();
    for line in text.lines().map(str::trim) {
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      let (path, link) = match line.split_once("->") {
        Some((path, target)) => (path.trim(), Some(PathBuf::from(target.trim()))),
        None => (line, None),
      };
      let is_dir = path.ends_with('/');
      let path = path.trim_end_matches('/');
      entries.insert(PathBuf::from(path), FakeEntry { is_dir, link });
    }
    Self {
      entries: RefCell::new(entries),
    }
  }

  /// Snapshot of every entry, sorted by path.
  pub fn entries(&self) -> BTreeMap<PathBuf, FakeEntry> {
    self.entries.borrow().clone()
  }

  fn link_of(&self, path: &Path) -> Option<PathBuf> {
    self.entries.borrow().get(path).and_then(|entry| entry.link.clone())
  }
}

fn components(path: &Path) -> Vec<OsString> {
  path.components().map(|c| c.as_os_str().to_os_string()).collect()
}

impl Filesystem for FakeFs {
  fn exists(&self, path: &Path) -> bool {
    self.entries.borrow().contains_key(path)
  }

  fn is_symlink(&self, path: &Path) -> bool {
    self.link_of(path).is_some()
  }

  fn symlink_target(&self, path: &Path) -> Option<PathBuf> {
    self.link_of(path)
  }

  fn realpath(&self, path: &Path) -> PathBuf {
    let mut parts = components(path);
    let mut idx = 1;
    let mut hops = 0;
    while idx <= parts.len() && hops < 40 {
      let prefix: PathBuf = parts[..idx].iter().collect();
      match self.link_of(&prefix) {
        Some(target) => {
          hops += 1;
          let replacement = components(&target);
          let replaced = replacement.len();
          parts.splice(..idx, replacement);
          idx = replaced + 1;
        }
        None => idx += 1,
      }
    }
    parts.iter().collect()
  }

  fn mkdir(&self, path: &Path) -> io::Result<()> {
    if self.exists(path) {
      return Err(io::Error::new(io::ErrorKind::AlreadyExists, path.display().to_string()));
    }
    if let Some(parent) = path.parent() {
      if parent.parent().is_some() && !self.exists(parent) {
        return Err(io::Error::new(io::ErrorKind::NotFound, parent.display().to_string()));
      }
    }
    self.entries.borrow_mut().insert(
      path.to_path_buf(),
      FakeEntry {
        is_dir: true,
        link: None,
      },
    );
    Ok(())
  }

  fn symlink(&self, source: &Path, target: &Path) -> io::Result<()> {
    if self.exists(target) {
      return Err(io::Error::new(io::ErrorKind::AlreadyExists, target.display().to_string()));
    }
    self.entries.borrow_mut().insert(
      target.to_path_buf(),
      FakeEntry {
        is_dir: false,
        link: Some(source.to_path_buf()),
      },
    );
    Ok(())
  }

  fn rm(&self, path: &Path) -> io::Result<()> {
    let has_children = self
      .entries
      .borrow()
      .keys()
      .any(|other| other != path && other.starts_with(path));
    let is_real_dir = self
      .entries
      .borrow()
      .get(path)
      .map(|entry| entry.is_dir && entry.link.is_none())
      .unwrap_or(false);
    if is_real_dir && has_children {
      return Err(io::Error::other(format!("directory not empty: {}", path.display())));
    }
    match self.entries.borrow_mut().remove(path) {
      Some(_) => Ok(()),
      None => Err(io::Error::new(io::ErrorKind::NotFound, path.display().to_string())),
    }
  }
}

#[test]
fn fake_realpath_follows_file_link() {
  let fs = FakeFs::parse("/home/art/.zsh/alias -> /home/art/.dotfiles/base/.zsh/alias");
  assert_eq!(
    fs.realpath(Path::new("/home/art/.zsh/alias")),
    PathBuf::from("/home/art/.dotfiles/base/.zsh/alias")
  );
}

#[test]
fn fake_realpath_follows_dir_link() {
  let fs = FakeFs::parse(
    "
    /home/art/.zsh/ -> /home/art/.dotfiles/zsh/.zsh
    /home/art/.zsh/the-file
    ",
  );
  assert_eq!(
    fs.realpath(Path::new("/home/art/.zsh/the-file")),
    PathBuf::from("/home/art/.dotfiles/zsh/.zsh/the-file")
  );
}
