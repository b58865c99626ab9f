use clap::{ArgAction, Parser, Subcommand};
use foldersort::cli::{SortCommand, run_cli_with_config};
use foldersort::output::OutputFormatter;
use foldersort::SortMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "foldersort", version, about = "Sort a directory into type or month folders, and undo it")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Sort files into category folders (Images, Documents, ...)
    Type(SortArgs),
    /// Sort files into "<Month> <Year>" folders by modification time
    Date(SortArgs),
    /// Sort files into "<Month> <Year>/<Category>" folders
    All(SortArgs),
    /// Undo the most recent sort of a directory
    Undo(UndoArgs),
}

#[derive(clap::Args)]
struct SortArgs {
    /// Directory to sort
    #[arg(value_hint = clap::ValueHint::DirPath)]
    dir: PathBuf,

    /// Show what would be moved without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Filter configuration file (TOML)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Print a JSON report
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct UndoArgs {
    /// Directory whose last sort should be undone
    #[arg(value_hint = clap::ValueHint::DirPath)]
    dir: PathBuf,

    /// Print a JSON report
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let sort = |mode: SortMode, args: SortArgs| {
        let command = SortCommand::Sort {
            mode,
            dry_run: args.dry_run,
            json: args.json,
        };
        (command, args.dir, args.config)
    };

    let (command, dir, config) = match cli.command {
        Command::Type(args) => sort(SortMode::Type, args),
        Command::Date(args) => sort(SortMode::Date, args),
        Command::All(args) => sort(SortMode::All, args),
        Command::Undo(args) => (SortCommand::Undo { json: args.json }, args.dir, None),
    };

    if let Err(e) = run_cli_with_config(command, &dir, config.as_deref()) {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
