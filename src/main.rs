//! # Main — CLI Entry Point
//!
//! Parses arguments, sets up logging and the rayon pool, opens the store and
//! routes each subcommand to its runner in [`cli`].
//!
//! ## Subcommands
//!
//! `solve` and `compare` run searches (every solution found is registered for
//! recognition and every run is timed). `submit` checks a player's board and
//! credits them. `auto` prints a random solution. `list`, `status`, `times`
//! and `reset` inspect or clear stored state.
//!
//! ## Global Options
//!
//! - `--database-url` / `QUEENS_DATABASE_URL`: SQLite database (created on
//!   first use).
//! - `--memory`: use a throwaway in-memory store instead.
//! - `--board-size` / `QUEENS_BOARD_SIZE`: board size (default 8).
//! - `--threads`: rayon thread pool size (default: all cores).
//! - `LOG_FORMAT=json` for JSON logs, `RUST_LOG` for filtering.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use queenhunt::board::BOARD_SIZE;
use queenhunt::search::Strategy;

#[derive(Parser)]
#[command(
    name = "queenhunt",
    about = "Solve, time and recognize Eight Queens solutions"
)]
struct Cli {
    /// SQLite database URL (or set QUEENS_DATABASE_URL env var)
    #[arg(long, env = "QUEENS_DATABASE_URL", default_value = "sqlite://queenhunt.db")]
    database_url: String,

    /// Keep all state in memory for this invocation only
    #[arg(long)]
    memory: bool,

    /// Board size (the classic puzzle is 8)
    #[arg(long, env = "QUEENS_BOARD_SIZE", default_value_t = BOARD_SIZE)]
    board_size: usize,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate every solution with one strategy and register them
    Solve {
        /// sequential or threaded
        #[arg(long, default_value = "sequential")]
        strategy: Strategy,
    },
    /// Time both strategies and report the faster one
    Compare {
        /// Repeat each strategy this many times and average
        #[arg(long, default_value_t = 1)]
        runs: u32,
    },
    /// Submit a board as a solution, e.g. "0,4,7,5,2,6,1,3"
    Submit {
        /// Name to credit the solution to
        #[arg(long)]
        player: String,
        /// One column per row: "[0, 4, 7, 5, 2, 6, 1, 3]", "0,4,7,5,2,6,1,3" or "0 4 7 5 2 6 1 3"
        board: String,
    },
    /// Print a random solution
    Auto {
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List stored solutions and who recognized them
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show how many solutions have been recognized
    Status,
    /// Show the latest recorded time of each strategy
    Times,
    /// Mark every solution unrecognized again
    Reset,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for machine-readable logs, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Auto { seed } => cli::run_auto(cli.board_size, *seed),
        Commands::Solve { strategy } => cli::run_solve(&cli::open_engine(&cli)?, *strategy),
        Commands::Compare { runs } => cli::run_compare(&cli::open_engine(&cli)?, *runs),
        Commands::Submit { player, board } => {
            cli::run_submit(&cli::open_engine(&cli)?, player, board)
        }
        Commands::List { json } => cli::run_list(&cli::open_engine(&cli)?, *json),
        Commands::Status => cli::run_status(&cli::open_engine(&cli)?),
        Commands::Times => cli::run_times(&cli::open_engine(&cli)?),
        Commands::Reset => cli::run_reset(&cli::open_engine(&cli)?),
    }
}
