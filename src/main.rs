use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reversi_puzzles::{
    GeneratorConfig, Puzzle, PuzzleGenerator, Side, puzzles_from_json, puzzles_to_json,
};

/// Generate Othello endgame puzzles with unique best moves.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of puzzles to generate
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,
    /// Minimum number of empty squares
    #[arg(long, default_value_t = 4)]
    min_empty: u8,
    /// Maximum number of empty squares
    #[arg(long, default_value_t = 10)]
    max_empty: u8,
    /// Side to move (B or W); auto-detected when omitted
    #[arg(long)]
    side: Option<Side>,
    /// Attempts per puzzle before giving up on it
    #[arg(long, default_value_t = 50)]
    attempts: u32,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
    /// Write puzzles as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print puzzles in the labelled board format
    #[arg(long)]
    pretty: bool,
    /// Load puzzles from a JSON file instead of generating
    #[arg(long)]
    load: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let puzzles = match &args.load {
        Some(path) => load(path)?,
        None => generate(&args)?,
    };

    for (i, puzzle) in puzzles.iter().enumerate() {
        if args.pretty {
            println!("\nPuzzle {}\n{}\n{puzzle}\n", i + 1, "=".repeat(50));
        } else {
            println!("Puzzle {}\n{}\n", i + 1, puzzle.summary());
        }
    }

    if let Some(path) = &args.output {
        fs::write(path, puzzles_to_json(&puzzles)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(count = puzzles.len(), path = %path.display(), "exported puzzles");
    }

    Ok(())
}

fn load(path: &Path) -> Result<Vec<Puzzle>> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let puzzles = puzzles_from_json(&json).with_context(|| format!("loading {}", path.display()))?;
    info!(count = puzzles.len(), path = %path.display(), "loaded puzzles");
    Ok(puzzles)
}

fn generate(args: &Args) -> Result<Vec<Puzzle>> {
    let config = GeneratorConfig {
        min_empty: args.min_empty,
        max_empty: args.max_empty,
        side_to_move: args.side,
        max_attempts: args.attempts,
        ..GeneratorConfig::default()
    };
    let mut generator = match args.seed {
        Some(seed) => PuzzleGenerator::from_seed(config, seed)?,
        None => PuzzleGenerator::from_entropy(config)?,
    };

    let requested = args.count as usize;
    info!(requested, config = ?generator.config(), "generating puzzles");
    let puzzles = generator.generate_batch(requested);

    if puzzles.is_empty() {
        bail!("failed to generate any puzzles; try a wider empty-square window");
    }
    if puzzles.len() < requested {
        warn!(produced = puzzles.len(), requested, "generated fewer puzzles than requested");
    }
    Ok(puzzles)
}
