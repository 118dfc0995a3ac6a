//! Status command implementation.
//!
//! Displays the environments found in the base directory and the state of the
//! created-links record.

use anyhow::{Context, Result};

use dotfiler_lib::fs::RealFs;
use dotfiler_lib::status::status;

use super::Dirs;
use crate::output::{print_info, print_json, print_stat, print_success, symbols};

pub fn cmd_status(dirs: &Dirs, verbose: bool, json: bool) -> Result<()> {
  let report = status(&dirs.base, &RealFs).context("Failed to read status")?;

  if json {
    return print_json(&report);
  }

  print_success(&format!("Base directory: {}", report.base_dir.display()));
  if verbose {
    print_stat("Home", &dirs.home.display().to_string());
  }
  let environments = if report.environments.is_empty() {
    "(none)".to_string()
  } else {
    report.environments.join(", ")
  };
  print_stat("Environments", &environments);
  print_stat("Recorded links", &report.recorded_links.to_string());
  print_stat("Stale links", &report.stale_links.len().to_string());

  if !report.stale_links.is_empty() {
    println!();
    for path in &report.stale_links {
      println!("  {} {}", symbols::REMOVE, path.display());
    }
    println!();
    print_info("Run 'dot update' to remove stale links.");
  }

  Ok(())
}
