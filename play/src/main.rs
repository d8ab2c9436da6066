use std::io;

use anyhow::Context;
use bombbox_core::{BoxCount, GameConfig};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

use session::{GameEnd, OutputMode, Session, SessionOptions, ThinkDelay};

mod render;
mod session;

/// Open the boxes one by one, or make the machine do it. Fewer bombs wins.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Number of boxes in the row
    #[arg(long, default_value_t = GameConfig::default().total_boxes)]
    boxes: BoxCount,

    /// Number of bombs hidden among the boxes, must be fewer than the boxes
    #[arg(long, default_value_t = GameConfig::default().total_bombs)]
    bombs: BoxCount,

    /// Seed for the session, every game draws its board seed from it. Random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Shortest pause before a machine move, in milliseconds
    #[arg(long, default_value_t = 500)]
    think_min_ms: u64,

    /// Longest pause before a machine move, in milliseconds
    #[arg(long, default_value_t = 2000)]
    think_max_ms: u64,

    /// Print one JSON snapshot per state change instead of the text board
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

fn clock_seed() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let seed = cli.seed.unwrap_or_else(clock_seed);
    log::info!("seeding session with {}", seed);

    let options = SessionOptions {
        think: ThinkDelay::from_millis(cli.think_min_ms, cli.think_max_ms),
        mode: if cli.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        },
        seed,
    };
    // validated by the session, which re-prompts on a bad configuration
    let config = GameConfig::new_unchecked(cli.boxes, cli.bombs);

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let games = Session::new(stdin, stdout, options)
        .run(config)
        .context("game session failed")?;

    let finished = games
        .iter()
        .filter(|end| matches!(end, GameEnd::Finished(_)))
        .count();
    log::info!("session over, {} of {} games finished", finished, games.len());
    Ok(())
}
