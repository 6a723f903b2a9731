//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. One runner per
//! subcommand, plus store selection and rayon configuration. Runners print
//! user-facing results to stdout; diagnostics go through `tracing` to stderr.

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{info, warn};

use queenhunt::board::Board;
use queenhunt::db::DbStore;
use queenhunt::search::{self, Strategy};
use queenhunt::store::{MemoryStore, Store};
use queenhunt::timing::Comparison;
use queenhunt::Engine;

use super::Cli;

// ── Setup ───────────────────────────────────────────────────────

/// Open the configured store and wrap it in an [`Engine`].
pub fn open_engine(cli: &Cli) -> Result<Engine> {
    let store: Arc<dyn Store> = if cli.memory {
        info!("using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        let store = DbStore::open(&cli.database_url)
            .with_context(|| format!("failed to open database {}", cli.database_url))?;
        info!(database_url = %cli.database_url, "database connected");
        Arc::new(store)
    };
    Ok(Engine::new(store, cli.board_size)?)
}

pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}

fn surface_failures(strategy: Strategy, failures: usize) -> Result<()> {
    if failures > 0 {
        bail!(
            "{} search finished but {} persistence operation(s) failed",
            strategy,
            failures
        );
    }
    Ok(())
}

// ── Searches ────────────────────────────────────────────────────

pub fn run_solve(engine: &Engine, strategy: Strategy) -> Result<()> {
    let report = engine.run_search(strategy, engine.board_size())?;
    println!(
        "{} search found {} solutions in {:.6} seconds ({} new, {} already stored)",
        strategy,
        report.count(),
        report.elapsed.as_secs_f64(),
        report.inserted,
        report.rediscovered
    );
    surface_failures(strategy, report.failures.len())
}

/// Time both strategies `runs` times each and report the averages. The
/// ledger keeps the most recent single run of each.
pub fn run_compare(engine: &Engine, runs: u32) -> Result<()> {
    if runs == 0 {
        bail!("--runs must be at least 1");
    }
    let size = engine.board_size();
    let mut totals = [0.0f64; 2];
    let mut failures = 0;
    let mut count = 0;

    for run in 0..runs {
        let sequential = engine.run_search(Strategy::Sequential, size)?;
        let threaded = engine.run_search(Strategy::Threaded, size)?;
        if sequential.solution_set() != threaded.solution_set() {
            bail!("sequential and threaded searches disagree on run {}", run + 1);
        }
        totals[0] += sequential.elapsed.as_secs_f64();
        totals[1] += threaded.elapsed.as_secs_f64();
        count = sequential.count();
        failures += sequential.failures.len() + threaded.failures.len();
    }

    let cmp = Comparison::new(totals[0] / runs as f64, totals[1] / runs as f64);
    if runs > 1 {
        println!("Average of {} runs, {} solutions each", runs, count);
    } else {
        println!("{} solutions", count);
    }
    println!("Sequential Time: {:.6} seconds", cmp.sequential_secs);
    println!("Threaded Time: {:.6} seconds", cmp.threaded_secs);
    println!("Best Algorithm: {}", cmp.winner);
    if let Some(speedup) = cmp.speedup() {
        info!(speedup = format_args!("{:.2}", speedup), "comparison complete");
    }
    if failures > 0 {
        bail!("comparison finished but {} persistence operation(s) failed", failures);
    }
    Ok(())
}

// ── Players ─────────────────────────────────────────────────────

pub fn run_submit(engine: &Engine, player: &str, board: &str) -> Result<()> {
    let candidate: Board = board.parse()?;
    let outcome = engine.submit_candidate(candidate.cells(), player)?;
    println!("{}", candidate.render());
    println!("{}", outcome.message());

    if outcome.is_success() && engine.are_all_recognized()? {
        println!("All solutions recognized! Resetting...");
        engine.reset_all()?;
    }
    Ok(())
}

pub fn run_auto(board_size: usize, seed: Option<u64>) -> Result<()> {
    search::check_board_size(board_size)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let Some(board) = search::random_solution(board_size, &mut rng) else {
        bail!("no solution exists for a {0}x{0} board", board_size);
    };
    println!("{}", board.render());
    println!("{}", board);
    Ok(())
}

// ── Inspection ──────────────────────────────────────────────────

pub fn run_list(engine: &Engine, json: bool) -> Result<()> {
    let records = engine.list_recognition_records()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No stored solutions found.");
        return Ok(());
    }
    for record in &records {
        match &record.recognized_by {
            Some(by) if record.recognized => println!("{}  recognized by {}", record.encoding, by),
            _ => println!("{}  -", record.encoding),
        }
    }
    Ok(())
}

pub fn run_status(engine: &Engine) -> Result<()> {
    let (recognized, total) = engine.book().tally()?;
    println!("Recognized: {}/{}", recognized, total);
    if total > 0 && recognized == total {
        println!("All solutions recognized!");
    }
    Ok(())
}

pub fn run_times(engine: &Engine) -> Result<()> {
    let timings = engine.timings()?;
    if timings.is_empty() {
        println!("No recorded times.");
    }
    for entry in &timings {
        println!(
            "{} Time: {:.6} seconds (recorded {})",
            entry.strategy,
            entry.elapsed_secs,
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    if let Some(cmp) = engine.comparison()? {
        println!("Best Algorithm: {}", cmp.winner);
    }
    Ok(())
}

pub fn run_reset(engine: &Engine) -> Result<()> {
    let touched = engine.reset_all()?;
    println!("Reset {} solutions.", touched);
    Ok(())
}
