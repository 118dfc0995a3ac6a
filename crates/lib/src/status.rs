//! Read-only summary of a base directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::action::Action;
use crate::env::discover_environments;
use crate::fs::Filesystem;
use crate::links::CreatedLinks;
use crate::paths::created_links_path;
use crate::plan::stale_link_removals;
use crate::update::UpdateError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
  pub base_dir: PathBuf,
  pub environments: Vec<String>,
  pub recorded_links: usize,
  /// Recorded links whose source is gone; the next update removes them.
  pub stale_links: Vec<PathBuf>,
}

pub fn status<F: Filesystem + ?Sized>(base_dir: &Path, fs: &F) -> Result<StatusReport, UpdateError> {
  let environments = discover_environments(base_dir)?;
  let links = CreatedLinks::load(&created_links_path(base_dir))?;
  let stale_links = stale_link_removals(&links, fs)
    .into_iter()
    .filter_map(|action| match action {
      Action::Rm(path) => Some(path),
      _ => None,
    })
    .collect();

  Ok(StatusReport {
    base_dir: base_dir.to_path_buf(),
    environments,
    recorded_links: links.len(),
    stale_links,
  })
}
