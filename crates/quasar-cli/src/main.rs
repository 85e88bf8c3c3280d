//! Quasar Command-Line Interface
//!
//! The main entry point for the `quasar` tool.
//!
//! ```text
//! quasar parse bell.qasm
//! quasar parse -I ./include --format json circuit.qasm
//! quasar gates
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod resolver;

use commands::{gates, parse, version};

/// Quasar - OpenQASM 2 front end
#[derive(Parser)]
#[command(name = "quasar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// How `quasar parse` prints the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Register sizes and per-gate counts
    Summary,
    /// The full circuit as JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an OpenQASM 2.0 file
    Parse {
        /// Input file
        input: PathBuf,

        /// Directory searched for include files (repeatable)
        #[arg(
            short = 'I',
            long = "include-dir",
            env = "QUASAR_INCLUDE_PATH",
            value_delimiter = ':'
        )]
        include_dirs: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// Do not fall back to the built-in qelib1.inc
        #[arg(long)]
        no_builtin_qelib1: bool,
    },

    /// List the primitive gate table
    Gates,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Parse {
            input,
            include_dirs,
            format,
            no_builtin_qelib1,
        } => parse::execute(&input, &include_dirs, format, !no_builtin_qelib1),

        Commands::Gates => {
            gates::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
