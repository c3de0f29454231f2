/// Inspection tool for the gitview configuration.
/// It runs the same load sequence as the viewer: built-in defaults or
/// the system file, the user file, GITVIEW_DIFF_OPTS and the repository's
/// git configuration, and then shows or exports the result. A single file
/// can also be checked on its own before it is installed.
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gitview_config::builders::reporter::{ExportFormat, Section};
use gitview_config::utils;

#[derive(Parser)]
#[command(name = "gitview-config")]
#[command(about = "Check, show and export the gitview configuration")]
struct Cli {
    /// Log file discovery and every configuration command
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Do not read the repository's git configuration
    #[arg(long, global = true)]
    no_git: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a single configuration file and report its errors
    Check { path: String },
    /// Print the resolved settings
    Show {
        #[arg(value_enum, default_value_t = Section::All)]
        section: Section,
        /// Revision and diff flags, as given to the viewer
        #[arg(last = true)]
        flags: Vec<String>,
    },
    /// Write the resolved settings to a file
    Export {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Toml)]
        format: ExportFormat,
        /// Revision and diff flags, as given to the viewer
        #[arg(last = true)]
        flags: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let read_git = !cli.no_git;
    match cli.command {
        Commands::Check { path } => utils::check_file(&path),
        Commands::Show { section, flags } => utils::show_settings(section, &flags, read_git),
        Commands::Export { path, format, flags } => utils::export_settings(&path, format, &flags, read_git),
    }
}
