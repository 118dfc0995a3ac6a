//! Executing a plan.
//!
//! Two executors consume the same action list in order:
//!
//! - the real executor calls the [`Filesystem`] mutators for `Mkdir`, `Link`
//!   and `Rm`, and keeps the created-links record in step with what it did
//! - the dry executor touches nothing and describes each action in the
//!   future tense
//!
//! Both produce an [`ExecutionReport`] with one entry per action. Plan errors
//! are reported, not raised; only a failing mutation stops a real run.

pub mod types;

use tracing::{debug, error, info};

use crate::action::Action;
use crate::fs::Filesystem;
use crate::links::CreatedLinks;

pub use types::{ExecuteError, ExecutionMode, ExecutionReport, ReportEntry};

/// Run `actions` in `mode`, starting from the `links` recorded so far.
pub fn execute<F: Filesystem + ?Sized>(
  actions: &[Action],
  links: CreatedLinks,
  fs: &F,
  mode: ExecutionMode,
) -> Result<ExecutionReport, ExecuteError> {
  match mode {
    ExecutionMode::Real => execute_real(actions, links, fs),
    ExecutionMode::Dry => Ok(forecast(actions, links)),
  }
}

/// Apply every action to `fs`.
///
/// Stops at the first failing mutation; earlier actions stay applied.
pub fn execute_real<F: Filesystem + ?Sized>(
  actions: &[Action],
  mut links: CreatedLinks,
  fs: &F,
) -> Result<ExecutionReport, ExecuteError> {
  info!(count = actions.len(), "applying actions");
  let mut entries = Vec::with_capacity(actions.len());

  for action in actions {
    let io_err = |source| ExecuteError::Io {
      action: action.clone(),
      source,
    };

    let message = match action {
      Action::Mkdir(path) => {
        fs.mkdir(path).map_err(io_err)?;
        info!(path = %path.display(), "created directory");
        format!("Directory {} was created.", path.display())
      }
      Action::Link { source, target } => {
        fs.symlink(source, target).map_err(io_err)?;
        links.record(target, source);
        info!(target = %target.display(), source = %source.display(), "created symlink");
        format!("Symlink from {} to {} was created", target.display(), source.display())
      }
      Action::Rm(path) => {
        fs.rm(path).map_err(io_err)?;
        links.forget(path);
        info!(path = %path.display(), "removed symlink");
        format!("Symlink {} was removed.", path.display())
      }
      Action::AlreadyLinked { source, target } => {
        debug!(target = %target.display(), source = %source.display(), "already linked");
        format!("Symlink from {} to {} already exists", target.display(), source.display())
      }
      Action::Error(err) => {
        error!("{}", err);
        err.to_string()
      }
    };
    entries.push(ReportEntry::new(action.kind(), message));
  }

  Ok(ExecutionReport { entries, links })
}

/// Describe every action without touching the filesystem.
pub fn forecast(actions: &[Action], links: CreatedLinks) -> ExecutionReport {
  info!(count = actions.len(), "dry run - not applying actions");

  let entries = actions
    .iter()
    .map(|action| {
      let message = match action {
        Action::Mkdir(path) => format!("Directory {} will be created", path.display()),
        Action::Link { source, target } => {
          format!("Symlink from {} to {} will be created", target.display(), source.display())
        }
        Action::Rm(path) => format!("Symlink {} will be removed.", path.display()),
        Action::AlreadyLinked { source, target } => {
          format!("Symlink from {} to {} already exists", target.display(), source.display())
        }
        Action::Error(err) => err.to_string(),
      };
      ReportEntry::new(action.kind(), message)
    })
    .collect();

  ExecutionReport { entries, links }
}
