//! Update orchestration.
//!
//! This module provides the core logic for the `dot update` command:
//!
//! 1. list environments and their files, build the merged tree
//! 2. load the created-links record and plan removal of stale links
//! 3. plan the install actions against the current filesystem
//! 4. run the plan through the real or the dry executor
//! 5. save the updated record (real runs only)

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::action::Action;
use crate::env::{EnvError, IgnoreMatcher, discover_environments, list_environment_files};
use crate::execute::{ExecuteError, ExecutionMode, ExecutionReport, execute};
use crate::fs::Filesystem;
use crate::links::{CreatedLinks, LinksError};
use crate::paths::created_links_path;
use crate::plan::{create_install_actions_after, stale_link_removals};
use crate::tree::build_tree;

/// Options for the update operation.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
  /// Directory holding the environments.
  pub base_dir: PathBuf,
  /// Directory the links are installed into.
  pub home_dir: PathBuf,
  /// If true, describe the plan without touching the filesystem or the record.
  pub dry_run: bool,
}

/// Result of a successful update.
#[derive(Debug)]
pub struct UpdateOutcome {
  pub environments: Vec<String>,
  /// The plan that was executed, stale removals first.
  pub actions: Vec<Action>,
  pub report: ExecutionReport,
}

/// Errors that can occur during update.
#[derive(Debug, Error)]
pub enum UpdateError {
  #[error(transparent)]
  Env(#[from] EnvError),

  #[error(transparent)]
  Links(#[from] LinksError),

  #[error(transparent)]
  Execute(#[from] ExecuteError),
}

/// Plan an update without executing it.
pub fn plan_update<F: Filesystem + ?Sized>(
  base_dir: &Path,
  home_dir: &Path,
  environments: &[String],
  links: &CreatedLinks,
  fs: &F,
) -> Result<Vec<Action>, UpdateError> {
  let ignore = IgnoreMatcher::load(base_dir)?;
  let listing = list_environment_files(base_dir, environments, &ignore)?;
  let tree = build_tree(listing);

  let removals = stale_link_removals(links, fs);
  info!(count = removals.len(), "planned stale link removals");
  Ok(create_install_actions_after(removals, base_dir, home_dir, &tree, fs))
}

/// Run a full update.
///
/// The record is rewritten only after every action of a real run succeeded.
pub fn run_update<F: Filesystem + ?Sized>(options: &UpdateOptions, fs: &F) -> Result<UpdateOutcome, UpdateError> {
  info!(
    base = %options.base_dir.display(),
    home = %options.home_dir.display(),
    dry_run = options.dry_run,
    "starting update"
  );

  let environments = discover_environments(&options.base_dir)?;
  let links_path = created_links_path(&options.base_dir);
  let links = CreatedLinks::load(&links_path)?;

  let actions = plan_update(&options.base_dir, &options.home_dir, &environments, &links, fs)?;

  let mode = if options.dry_run {
    ExecutionMode::Dry
  } else {
    ExecutionMode::Real
  };
  let report = execute(&actions, links, fs, mode)?;

  if options.dry_run {
    info!("dry run - not saving created links");
  } else {
    report.links.save(&links_path)?;
  }

  info!(
    actions = actions.len(),
    changes = report.changes(),
    errors = report.has_errors(),
    "update complete"
  );

  Ok(UpdateOutcome {
    environments,
    actions,
    report,
  })
}
