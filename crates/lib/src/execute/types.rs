//! Types for applying or forecasting a plan.

use serde::Serialize;
use thiserror::Error;

use crate::action::{Action, ActionKind};
use crate::links::CreatedLinks;

/// Whether a plan touches the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
  /// Invoke the filesystem mutators.
  #[default]
  Real,
  /// Only describe what would happen.
  Dry,
}

/// One human-readable line of an execution report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
  pub kind: ActionKind,
  pub message: String,
}

impl ReportEntry {
  pub fn new(kind: ActionKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
    }
  }
}

/// Outcome of running a plan through an executor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionReport {
  /// One entry per action, in plan order.
  pub entries: Vec<ReportEntry>,
  /// The created-links record after the run. Unchanged in dry runs.
  #[serde(skip)]
  pub links: CreatedLinks,
}

impl ExecutionReport {
  /// Entries of a given kind, in order.
  pub fn entries_of(&self, kind: ActionKind) -> impl Iterator<Item = &ReportEntry> {
    self.entries.iter().filter(move |entry| entry.kind == kind)
  }

  pub fn count(&self, kind: ActionKind) -> usize {
    self.entries_of(kind).count()
  }

  pub fn has_errors(&self) -> bool {
    self.count(ActionKind::Error) > 0
  }

  /// Number of entries that changed (or would change) the filesystem.
  pub fn changes(&self) -> usize {
    self.entries.iter().filter(|entry| entry.kind.is_mutation()).count()
  }
}

/// Errors that stop a real apply.
///
/// Actions before the failing one have already been applied.
#[derive(Debug, Error)]
pub enum ExecuteError {
  #[error("failed to {action}: {source}")]
  Io {
    action: Action,
    #[source]
    source: std::io::Error,
  },
}
