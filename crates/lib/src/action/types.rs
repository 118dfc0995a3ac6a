use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A single step of a plan.
///
/// Actions are plain data: the planner produces them, executors consume them
/// in order. Two equal actions are never part of the same plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
  /// Create a directory. Its parent exists by the time this runs.
  Mkdir(PathBuf),
  /// Create `target` as a symlink to `source`.
  Link { source: PathBuf, target: PathBuf },
  /// Remove a symlink (or an empty directory).
  Rm(PathBuf),
  /// `target` already resolves to `source`; nothing to do.
  AlreadyLinked { source: PathBuf, target: PathBuf },
  /// The path cannot be handled automatically.
  Error(PlanError),
}

impl Action {
  pub fn kind(&self) -> ActionKind {
    match self {
      Action::Mkdir(_) => ActionKind::Mkdir,
      Action::Link { .. } => ActionKind::Link,
      Action::Rm(_) => ActionKind::Rm,
      Action::AlreadyLinked { .. } => ActionKind::AlreadyLinked,
      Action::Error(_) => ActionKind::Error,
    }
  }

}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Action::Mkdir(path) => write!(f, "mkdir {}", path.display()),
      Action::Link { source, target } => write!(f, "link {} -> {}", target.display(), source.display()),
      Action::Rm(path) => write!(f, "rm {}", path.display()),
      Action::AlreadyLinked { source, target } => {
        write!(f, "already-linked {} -> {}", target.display(), source.display())
      }
      Action::Error(err) => write!(f, "error {}", err),
    }
  }
}

/// Discriminant of an [`Action`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
  Mkdir,
  Link,
  Rm,
  AlreadyLinked,
  Error,
}

impl ActionKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ActionKind::Mkdir => "mkdir",
      ActionKind::Link => "link",
      ActionKind::Rm => "rm",
      ActionKind::AlreadyLinked => "already-linked",
      ActionKind::Error => "error",
    }
  }

  /// True for kinds that change the filesystem when applied.
  pub fn is_mutation(&self) -> bool {
    matches!(self, ActionKind::Mkdir | ActionKind::Link | ActionKind::Rm)
  }

  /// Short console label.
  pub fn label(&self) -> &'static str {
    match self {
      ActionKind::Mkdir => "MKDIR",
      ActionKind::Link => "LINK",
      ActionKind::Rm => "RM",
      ActionKind::AlreadyLinked => "INFO",
      ActionKind::Error => "ERROR",
    }
  }
}

impl fmt::Display for ActionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Conditions the planner refuses to resolve on its own.
///
/// These never abort planning; each one becomes an [`Action::Error`] and the
/// walk moves on to the next path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum PlanError {
  /// The same relative path is provided by several environments.
  #[error("File {path} exists in more than one environment: {}", .environments.join(", "))]
  OwnershipConflict { path: String, environments: Vec<String> },

  /// The target is a symlink pointing outside the base directory.
  #[error(
    "File {} is a symlink to {}, please remove it manually if you really want to replace it.",
    .target.display(),
    .points_to.display()
  )]
  UnmanagedSymlink { target: PathBuf, points_to: PathBuf },

  /// A parent of the target is a symlink pointing outside the base directory.
  #[error(
    "Intermediate directory {} is a symlink to {}, please remove it manually.",
    .dir.display(),
    .points_to.display()
  )]
  UnmanagedIntermediateSymlink { dir: PathBuf, points_to: PathBuf },

  /// The target is a real file or directory that cannot be split further.
  #[error("File {} already exists, can't make symlink instead of it.", .target.display())]
  OccupiedByForeignFile { target: PathBuf },
}
