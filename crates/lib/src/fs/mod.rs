//! Filesystem capability used by the planner and the executors.
//!
//! The planner never touches the disk directly. It asks a [`Filesystem`]
//! implementation a handful of questions (does a path exist, is it a symlink,
//! where does it point, what does it resolve to) and, during apply, asks it to
//! perform three primitive mutations.
//!
//! # Submodules
//!
//! - [`real`] - the implementation backed by `std::fs`
//! - [`virtual_fs`] - an in-memory overlay simulating not-yet-applied actions

pub mod real;
pub mod virtual_fs;

use std::io;
use std::path::{Path, PathBuf};

pub use real::RealFs;
pub use virtual_fs::VirtualFs;

/// Minimal query and mutation surface over a filesystem.
pub trait Filesystem {
  /// Lexical existence: true for a symlink even when its target is missing.
  fn exists(&self, path: &Path) -> bool;

  fn is_symlink(&self, path: &Path) -> bool;

  /// The stored target of a symlink, `None` when `path` is not a symlink.
  fn symlink_target(&self, path: &Path) -> Option<PathBuf>;

  /// Resolve every symlink along `path`, intermediate directories included.
  ///
  /// Components that do not exist are kept as they are, so this never fails.
  fn realpath(&self, path: &Path) -> PathBuf;

  /// Create a single directory. The parent must exist.
  fn mkdir(&self, path: &Path) -> io::Result<()>;

  /// Create `target` as a symlink pointing to `source`.
  fn symlink(&self, source: &Path, target: &Path) -> io::Result<()>;

  /// Remove a single entry: a symlink, a file or an empty directory.
  fn rm(&self, path: &Path) -> io::Result<()>;
}
