use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lemin::{read_farm_with_max_ants, MAX_ANTS};

/// Route every ant of a lem-in farm from start to end.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Farm description to read
    file: PathBuf,

    /// Largest ant count accepted
    #[arg(long, default_value_t = MAX_ANTS)]
    max_ants: usize,

    /// Print only the moves, not the farm
    #[arg(short, long)]
    quiet: bool,

    /// Log solver progress unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let fallback = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();

    let farm = read_farm_with_max_ants(&args.file, args.max_ants)
        .with_context(|| format!("failed to load farm from {}", args.file.display()))?;
    info!(rooms = farm.room_count(), ants = farm.ants(), "farm loaded");

    let plan = farm.solve().context("failed to route ants")?;
    info!(turns = plan.turns().len(), moves = plan.move_count(), "routed");

    if !args.quiet {
        print!("{}", farm);
    }
    print!("{}", plan);

    Ok(())
}
