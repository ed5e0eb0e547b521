mod commands;
mod core;
mod recon;
mod remote;
mod report;
mod utils;

use clap::{Parser, Subcommand};
use core::config::Settings;
use core::error::{ReconError, ResultExt, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Cross-check a release's Jira scope against the commits on its branch
#[derive(Parser)]
#[command(name = "release-recon")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Log debug output to stderr
  #[arg(short, long, global = true, conflicts_with = "quiet")]
  verbose: bool,

  /// Only log warnings and errors
  #[arg(short, long, global = true)]
  quiet: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Reconcile the release scope with the branch commits and print the report
  Report {
    #[command(flatten)]
    settings: Settings,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Also write the JSON report to this file
    #[arg(long)]
    output: Option<PathBuf>,
  },

  /// List tracker versions and the one the current branch resolves to
  Versions {
    #[command(flatten)]
    settings: Settings,
    /// Output versions in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);
  let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
  let red = anstyle::Color::Ansi(anstyle::AnsiColor::Red);

  clap::builder::Styles::styled()
    .usage(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .header(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .literal(anstyle::Style::new().fg_color(Some(green)))
    .invalid(anstyle::Style::new().bold().fg_color(Some(red)))
    .error(anstyle::Style::new().bold().fg_color(Some(red)))
    .valid(anstyle::Style::new().bold().underline().fg_color(Some(green)))
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// RUST_LOG wins over -v/-q
fn init_tracing(verbose: bool, quiet: bool) {
  let default_level = if verbose {
    "debug"
  } else if quiet {
    "warn"
  } else {
    "info"
  };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("release_recon={}", default_level)));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose, cli.quiet);

  let search_root = match std::env::current_dir().context("Failed to get current directory") {
    Ok(dir) => dir,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Report { settings, json, output } => core::context::ReconContext::build(settings, &search_root)
      .and_then(|ctx| commands::run_report(&ctx, json, output.as_deref())),
    Commands::Versions { settings, json } => core::context::ReconContext::build(settings, &search_root)
      .and_then(|ctx| commands::run_versions(&ctx, json)),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ReconError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
