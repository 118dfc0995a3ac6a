//! Implementation of the `dot update` command.
//!
//! Plans the links for every environment under the base directory and either
//! applies them or, with `--dry`, prints what would be done.

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use dotfiler_lib::action::ActionKind;
use dotfiler_lib::fs::RealFs;
use dotfiler_lib::update::{UpdateOptions, run_update};

use super::Dirs;
use crate::output::{print_action, print_json, print_stat, print_success, print_warning};

/// Execute the update command.
///
/// Already-linked paths are only listed with `verbose`. Planning conflicts
/// are printed but do not fail the command.
pub fn cmd_update(dirs: &Dirs, dry_run: bool, verbose: bool, json: bool) -> Result<()> {
  let options = UpdateOptions {
    base_dir: dirs.base.clone(),
    home_dir: dirs.home.clone(),
    dry_run,
  };

  let outcome = run_update(&options, &RealFs).context("Failed to update dotfiles")?;
  let report = &outcome.report;

  if json {
    let json_output = serde_json::json!({
      "dry_run": dry_run,
      "environments": outcome.environments,
      "entries": report.entries,
    });
    return print_json(&json_output);
  }

  if dry_run {
    println!(
      "{}",
      "Dry run - no changes written".if_supports_color(Stream::Stdout, |s| s.yellow())
    );
  }

  for entry in &report.entries {
    if entry.kind == ActionKind::AlreadyLinked && !verbose {
      continue;
    }
    print_action(entry);
  }

  let errors = report.count(ActionKind::Error);
  if report.changes() == 0 && errors == 0 {
    print_success("Everything is already linked.");
    return Ok(());
  }

  println!();
  let verb = if dry_run { "Would apply" } else { "Applied" };
  print_success(&format!("{} {} change(s)", verb, report.changes()));
  print_stat("Already linked", &report.count(ActionKind::AlreadyLinked).to_string());
  if errors > 0 {
    print_warning(&format!("{} path(s) need manual attention", errors));
  }

  Ok(())
}
