//! retrace CLI - steppable simulators for classic search algorithms
//!
//! This CLI provides a unified interface for:
//! - Running alpha-beta pruning over a described or generated game tree
//! - Solving AND/OR graphs with AO*
//! - Exporting step traces and tree snapshots for analysis

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "retrace")]
#[command(version, about = "Reversible simulators for classic search algorithms", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run alpha-beta pruning step by step over a game tree
    Minimax(retrace::cli::commands::minimax::MinimaxArgs),

    /// Solve an AND/OR graph with AO*
    Andor(retrace::cli::commands::andor::AndorArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Minimax(args) => retrace::cli::commands::minimax::execute(args),
        Commands::Andor(args) => retrace::cli::commands::andor::execute(args),
    }
}
