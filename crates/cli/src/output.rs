//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, one tagged line per reported action, and JSON output.

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

use dotfiler_lib::action::ActionKind;
use dotfiler_lib::execute::ReportEntry;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const REMOVE: &str = "-";
}

/// Width of the action tag column.
const TAG_WIDTH: usize = 5;

/// The padded tag printed in front of an action message.
pub fn action_tag(kind: ActionKind) -> String {
  format!("{:<width$}", kind.label(), width = TAG_WIDTH)
}

/// Print one report entry. Filesystem changes are magenta, already-linked
/// paths green and conflicts red.
pub fn print_action(entry: &ReportEntry) {
  let tag = action_tag(entry.kind);
  let tag = match entry.kind {
    ActionKind::Mkdir | ActionKind::Link | ActionKind::Rm => {
      tag.if_supports_color(Stream::Stdout, |s| s.magenta()).to_string()
    }
    ActionKind::AlreadyLinked => tag.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    ActionKind::Error => tag.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
  };
  println!("{} {}", tag, entry.message);
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
