mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::print_error;

/// dot - keep a home directory symlinked to dotfile environments
#[derive(Parser)]
#[command(name = "dot")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Directory holding the environments [default: $DOTFILER_BASE or ~/.dotfiles]
  #[arg(long, global = true, value_name = "DIR")]
  base_dir: Option<PathBuf>,

  /// Directory the links are installed into [default: $HOME]
  #[arg(long, global = true, value_name = "DIR")]
  home_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Link every environment file into the home directory
  Update {
    /// Show what would be done without changing anything
    #[arg(long)]
    dry: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show environments and recorded links
  Status {
    /// Print the status as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Update { dry, json } => {
      let dirs = cmd::resolve_dirs(cli.base_dir, cli.home_dir)?;
      cmd::cmd_update(&dirs, dry, cli.verbose, json)
    }
    Commands::Status { json } => {
      let dirs = cmd::resolve_dirs(cli.base_dir, cli.home_dir)?;
      cmd::cmd_status(&dirs, cli.verbose, json)
    }
  }
}
