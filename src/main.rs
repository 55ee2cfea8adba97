//! Headless match-3 runner (default binary).
//!
//! Plays the campaign's current level by always taking the first valid swap
//! the engine suggests, logging every move. A won level advances the
//! campaign; with `--all-levels` play continues until a level is lost or the
//! last one is won. There is no renderer: boards are printed as grids of
//! color ids.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use match3::core::{Campaign, GameConfig, MemoryProgressStore, Session, SessionStatus};

#[derive(Debug, Parser)]
#[command(name = "match3", about = "Autoplay a match-3 level")]
struct Args {
    /// JSON game config (levels, scoring, retry limits)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level index to start from
    #[arg(long, default_value_t = 0)]
    level: usize,

    /// Board seed; omit for a clock-seeded board
    #[arg(long)]
    seed: Option<u32>,

    /// Stop after this many resolved swaps even if the level is not over
    #[arg(long, default_value_t = 200)]
    max_moves: u32,

    /// Keep playing the following levels after a win
    #[arg(long)]
    all_levels: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut campaign = Campaign::new(config, MemoryProgressStore::with_level(args.level))?;
    loop {
        let session = play_level(&campaign, args.seed, args.max_moves)?;
        let Some(next) = campaign.finish_session(&session) else {
            break;
        };
        if next == session.level() {
            println!("Campaign complete");
            break;
        }
        println!("Progress saved: level {}", next + 1);
        if !args.all_levels {
            break;
        }
    }
    Ok(())
}

fn play_level(
    campaign: &Campaign<MemoryProgressStore>,
    seed: Option<u32>,
    max_moves: u32,
) -> Result<Session> {
    let mut session = campaign.start_session(seed)?;
    info!(
        level = session.level() + 1,
        of = campaign.level_count(),
        seed = session.board().seed(),
        target = session.target_score(),
        moves = session.moves_left(),
        "level started"
    );
    print!("{}", session.board().grid());

    let mut played = 0;
    while !session.is_over() && played < max_moves {
        let Some((a, b)) = session.board().find_valid_swap() else {
            // Unreachable while the engine keeps its playability guarantee.
            anyhow::bail!("board has no valid swap");
        };
        let outcome = session.try_swap(a, b)?;
        played += 1;
        info!(
            %a,
            %b,
            cleared = outcome.cleared,
            cascades = outcome.cascades,
            reshuffled = outcome.reshuffled,
            score = session.score(),
            moves_left = session.moves_left(),
            "move"
        );
    }

    println!();
    print!("{}", session.board().grid());
    match session.status() {
        SessionStatus::Won => println!("Won with {} points", session.score()),
        SessionStatus::Lost => println!(
            "Lost: {} of {} points",
            session.score(),
            session.target_score()
        ),
        SessionStatus::Playing => println!(
            "Stopped after {played} moves with {} points",
            session.score()
        ),
    }
    Ok(session)
}
