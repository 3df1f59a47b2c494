mod commands;
mod core;
mod release;
mod ui;

use clap::{Args, Parser, Subcommand};
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult, print_error};
use crate::release::RunOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Package Eclipse-style features into versioned, zipped release artifacts
#[derive(Parser)]
#[command(name = "feature-release")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Configuration file (default: release.toml, .release.toml or .config/release.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Show debug diagnostics on stderr (RUST_LOG is honored otherwise)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Build, collect, document and zip every configured variant (default)
  Run(RunArgs),

  /// Print the feature version read from the descriptor
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Write a release.toml with the built-in defaults
  Init {
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },
}

#[derive(Args, Default)]
struct RunArgs {
  /// Only release this variant (repeatable)
  #[arg(long = "variant", value_name = "LABEL")]
  variants: Vec<String>,

  /// Date written to the README (default: today)
  #[arg(long, value_parser = commands::run::parse_release_date)]
  date: Option<String>,

  /// Remove existing release directories and archives before collecting
  #[arg(long)]
  clean: bool,

  /// Show the build commands and paths without running anything
  #[arg(long)]
  dry_run: bool,

  /// Print the release summary as JSON on stdout
  #[arg(long)]
  json: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .with_target(false)
    .try_init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let command = cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default()));
  let config = cli.config.as_deref();

  let result = match command {
    // init runs before any configuration exists
    Commands::Init { force } => commands::run_init(&root, force),
    Commands::Run(args) => load_context(&root, config).and_then(|ctx| {
      let options = RunOptions {
        variants: args.variants,
        date: args.date,
        clean: args.clean,
        dry_run: args.dry_run,
      };
      commands::run_release(&ctx, options, args.json)
    }),
    Commands::Version { json } => load_context(&root, config).and_then(|ctx| commands::run_version(&ctx, json)),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn load_context(root: &Path, config: Option<&Path>) -> ReleaseResult<ReleaseContext> {
  let ctx = ReleaseContext::build(root, config)?;
  tracing::debug!(root = %ctx.root.display(), config = ?ctx.config_path, "release context ready");
  Ok(ctx)
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
