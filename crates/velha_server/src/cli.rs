//! Command-line interface for velha.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use velha_tictactoe::Difficulty;

/// Velha - tic-tac-toe relay server and terminal player
#[derive(Parser, Debug)]
#[command(name = "velha")]
#[command(about = "Tic-tac-toe matchmaking server and terminal game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the matchmaking relay server
    Serve {
        /// Port to bind to (overrides PORT and the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides VELHA_HOST and the config file)
        #[arg(long)]
        host: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Play against the computer in the terminal
    Play {
        /// Computer strength: easy, medium or hard
        #[arg(short, long, default_value = "hard")]
        difficulty: Difficulty,

        /// Milliseconds to wait before the computer replies
        #[arg(long, default_value = "600")]
        delay_ms: u64,

        /// Directory for the score file
        #[arg(long, default_value = ".")]
        scores_dir: PathBuf,
    },
}
