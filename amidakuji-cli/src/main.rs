mod render;
mod terminal;
mod workers;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use amidakuji_game::{BoardConfig, Game, SharedGame, debug_enabled};
use render::usage_text;
use terminal::RawModeGuard;
use workers::{SessionEnd, SessionOptions, run_session};

#[derive(Debug, Parser)]
#[command(name = "amidakuji", version)]
#[command(about = "Slide the rails of a ghost-leg board until the path reaches its goal")]
struct Args {}

fn main() -> Result<()> {
    env_logger::init();
    let _args = Args::parse();

    announce_banner();
    println!("{}", usage_text());
    println!();

    let seed = rand::random::<u64>();
    log::info!("puzzle seed {seed:#018x}");
    let game = Game::generate(seed, BoardConfig::default_config())
        .context("generating the puzzle board")?;

    wait_for_enter()?;

    let shared = Arc::new(SharedGame::new(game));
    let end = {
        let _raw = RawModeGuard::enter().context("entering raw terminal mode")?;
        run_session(Arc::clone(&shared), SessionOptions::new(debug_enabled()))?
    };

    match end {
        SessionEnd::Complete => {
            announce_completion(&shared);
            Ok(())
        }
        SessionEnd::Quit => {
            println!("{}", "Puzzle abandoned.".yellow());
            std::process::exit(1);
        }
    }
}

fn announce_banner() {
    println!("{}", "Amidakuji".bright_cyan().bold());
    println!("{}", "=========".cyan());
}

fn wait_for_enter() -> Result<()> {
    print!("{}", "Press Enter to start...".bold());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("waiting for Enter")?;
    Ok(())
}

fn announce_completion(shared: &SharedGame) {
    let game = shared.lock();
    println!();
    println!("{}", "Puzzle complete!".bright_green().bold());
    println!(
        "Reached track {} in {}s with {} checkpoint regeneration(s).",
        game.board().end_track,
        shared.elapsed_secs(),
        game.regenerations()
    );
}
