//! Turning a merged tree into an ordered list of actions.
//!
//! The planner walks the link units of a tree depth-first and decides, for
//! each one, whether to link it, leave it alone, descend into it, or report a
//! conflict. Decisions are simulated on a [`VirtualFs`] so that a directory
//! replaced for one unit is seen as replaced by every later unit.
//!
//! Planning never fails: conflicts become [`Action::Error`] entries and the
//! walk continues with the next unit.
//!
//! # Submodules
//!
//! - [`stale`] - removal of recorded links whose source disappeared

pub mod stale;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::action::{Action, PlanError};
use crate::fs::{Filesystem, VirtualFs};
use crate::tree::{LinkUnit, Node, link_units};

pub use stale::stale_link_removals;

/// Plan the actions that install `tree` from `base_dir` into `home_dir`.
///
/// `fs` is only read; every simulated change stays in an overlay.
pub fn create_install_actions<F: Filesystem + ?Sized>(
  base_dir: &Path,
  home_dir: &Path,
  tree: &[Node],
  fs: &F,
) -> Vec<Action> {
  create_install_actions_after(Vec::new(), base_dir, home_dir, tree, fs)
}

/// Like [`create_install_actions`], with `prior` actions at the head of the
/// plan.
///
/// Each prior action is applied to the overlay before the walk, so a target
/// already removed by a stale-link `Rm` is seen as absent and never removed
/// twice.
pub fn create_install_actions_after<F: Filesystem + ?Sized>(
  prior: Vec<Action>,
  base_dir: &Path,
  home_dir: &Path,
  tree: &[Node],
  fs: &F,
) -> Vec<Action> {
  let mut planner = Planner::new(base_dir, home_dir, fs);
  for action in prior {
    planner.push(action);
  }
  for unit in link_units(tree) {
    planner.plan_unit(&unit);
  }
  debug!(count = planner.actions.len(), "planned install actions");
  planner.actions
}

/// How a unit's target looks right now, as seen through the overlay.
#[derive(Debug)]
struct TargetState {
  exists: bool,
  /// Stored target of the symlink at `target`, made absolute.
  points_to: Option<PathBuf>,
  /// `target` resolves to `source`.
  already_linked: bool,
  /// The parent of `target` resolves somewhere else.
  in_symlinked_directory: bool,
}

/// Planning context: the overlay, the emitted actions, and the set used to
/// keep them unique.
struct Planner<'a, F: Filesystem + ?Sized> {
  base_dir: &'a Path,
  home_dir: &'a Path,
  vfs: VirtualFs<'a, F>,
  actions: Vec<Action>,
  seen: HashSet<Action>,
}

impl<'a, F: Filesystem + ?Sized> Planner<'a, F> {
  fn new(base_dir: &'a Path, home_dir: &'a Path, fs: &'a F) -> Self {
    Self {
      base_dir,
      home_dir,
      vfs: VirtualFs::new(fs),
      actions: Vec::new(),
      seen: HashSet::new(),
    }
  }

  /// Apply a mutating action to the overlay and append it unless an equal
  /// action was emitted before.
  fn push(&mut self, action: Action) {
    match &action {
      Action::Mkdir(path) => self.vfs.mkdir(path),
      Action::Link { source, target } => self.vfs.link(source, target),
      Action::Rm(path) => self.vfs.rm(path),
      Action::AlreadyLinked { .. } | Action::Error(_) => {}
    }

    if self.seen.contains(&action) {
      debug!(action = %action, "skipping duplicate action");
      return;
    }
    debug!(action = %action, "planned");
    self.seen.insert(action.clone());
    self.actions.push(action);
  }

  fn plan_unit(&mut self, unit: &LinkUnit<'_>) {
    if unit.environments.len() > 1 {
      self.push(Action::Error(PlanError::OwnershipConflict {
        path: unit.display_path(),
        environments: unit.environments.iter().cloned().collect(),
      }));
      return;
    }
    let Some(environment) = unit.environments.iter().next() else {
      return;
    };

    let source = join_segments(&self.base_dir.join(environment), &unit.path);
    let target = join_segments(self.home_dir, &unit.path);
    let state = self.inspect(&source, &target);
    debug!(
      path = %unit.display_path(),
      environment = %environment,
      exists = state.exists,
      already_linked = state.already_linked,
      in_symlinked_directory = state.in_symlinked_directory,
      "inspected target"
    );

    if state.already_linked && !state.in_symlinked_directory {
      self.push(Action::AlreadyLinked { source, target });
      return;
    }

    if let Some(points_to) = &state.points_to {
      if !self.inside_base(points_to) {
        self.push(Action::Error(PlanError::UnmanagedSymlink {
          target,
          points_to: points_to.clone(),
        }));
        return;
      }
    }

    let to_other_dotfile = state.points_to.as_ref().is_some_and(|points_to| *points_to != source);
    if !state.exists || to_other_dotfile || state.in_symlinked_directory {
      self.link_with_parents(unit, source, target, to_other_dotfile);
      return;
    }

    if state.points_to.is_some() {
      // stored target is the source itself, the source just resolves elsewhere
      self.push(Action::AlreadyLinked { source, target });
      return;
    }

    let alternatives = unit.alternatives();
    if alternatives.is_empty() {
      self.push(Action::Error(PlanError::OccupiedByForeignFile { target }));
      return;
    }
    debug!(path = %unit.display_path(), count = alternatives.len(), "target occupied, descending");
    for alternative in &alternatives {
      self.plan_unit(alternative);
    }
  }

  fn inspect(&self, source: &Path, target: &Path) -> TargetState {
    let exists = self.vfs.exists(target);
    let points_to = self
      .vfs
      .symlink_target(target)
      .map(|stored| absolutize(target, stored));
    let already_linked = exists && self.vfs.realpath(target) == source;
    let in_symlinked_directory = match target.parent() {
      Some(dir) => self.vfs.realpath(dir) != dir,
      None => false,
    };
    TargetState {
      exists,
      points_to,
      already_linked,
      in_symlinked_directory,
    }
  }

  /// Make sure every directory between `home_dir` and `target` is a real
  /// directory, then link. Nothing is emitted when an ancestor is a symlink
  /// this tool does not manage.
  fn link_with_parents(&mut self, unit: &LinkUnit<'_>, source: PathBuf, target: PathBuf, replace_target: bool) {
    let ancestors: Vec<PathBuf> = (1..unit.path.len())
      .map(|depth| join_segments(self.home_dir, &unit.path[..depth]))
      .collect();

    for dir in ancestors.iter().rev() {
      if let Some(points_to) = self.vfs.symlink_target(dir) {
        let points_to = absolutize(dir, points_to);
        if !self.inside_base(&points_to) {
          self.push(Action::Error(PlanError::UnmanagedIntermediateSymlink {
            dir: dir.clone(),
            points_to,
          }));
          return;
        }
      }
    }

    let mut mkdirs = Vec::new();
    for dir in ancestors {
      if !self.vfs.exists(&dir) {
        mkdirs.push(Action::Mkdir(dir));
      } else if self.vfs.is_symlink(&dir) {
        self.push(Action::Rm(dir.clone()));
        self.push(Action::Mkdir(dir));
      }
    }
    for mkdir in mkdirs {
      self.push(mkdir);
    }

    if replace_target {
      self.push(Action::Rm(target.clone()));
    }
    self.push(Action::Link { source, target });
  }

  fn inside_base(&self, path: &Path) -> bool {
    path.starts_with(self.base_dir)
  }
}

fn join_segments(root: &Path, segments: &[String]) -> PathBuf {
  let mut path = root.to_path_buf();
  for segment in segments {
    path.push(segment);
  }
  path
}

/// Relative symlink targets are relative to the link's directory.
fn absolutize(link: &Path, stored: PathBuf) -> PathBuf {
  if stored.is_absolute() {
    return stored;
  }
  match link.parent() {
    Some(dir) => dir.join(stored),
    None => stored,
  }
}
