//! The four session workers: input, clock, game loop and renderer.
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use amidakuji_game::SharedGame;
use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event};

use crate::render::compose_frame;
use crate::terminal::{Command, map_key, present};

const CLOCK_INTERVAL: Duration = Duration::from_millis(500);
const GAME_LOOP_PAUSE: Duration = Duration::from_millis(1);
const RENDER_POLL: Duration = Duration::from_millis(5);

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Complete,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub debug: bool,
    /// Redraw on every clock tick; only the debug panel shows the clock.
    pub clock_marks_dirty: bool,
}

impl SessionOptions {
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self {
            debug,
            clock_marks_dirty: true,
        }
    }
}

/// Run the session until the puzzle completes or the player quits.
///
/// Input and clock workers are detached; they end with the process.
///
/// # Errors
///
/// Returns an error if a worker cannot be spawned or the renderer fails.
pub fn run_session(shared: Arc<SharedGame>, options: SessionOptions) -> Result<SessionEnd> {
    let quit = Arc::new(AtomicBool::new(false));
    shared.lock().start();
    shared.mark_dirty();

    spawn_input(Arc::clone(&shared), Arc::clone(&quit))?;
    spawn_clock(Arc::clone(&shared), options)?;
    spawn_game_loop(Arc::clone(&shared), Arc::clone(&quit))?;

    let renderer = thread::Builder::new()
        .name("render".into())
        .spawn(move || render_loop(&shared, &quit, options.debug))
        .context("spawning render worker")?;
    renderer
        .join()
        .map_err(|_| anyhow!("render worker panicked"))?
        .context("drawing the board")
}

fn spawn_input(shared: Arc<SharedGame>, quit: Arc<AtomicBool>) -> Result<()> {
    thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            loop {
                match event::read() {
                    Ok(Event::Key(key)) => match map_key(key) {
                        Some(Command::Game(input)) => shared.apply_input(input),
                        Some(Command::Quit) => {
                            quit.store(true, Ordering::Release);
                            break;
                        }
                        None => {}
                    },
                    Ok(Event::Resize(..)) => shared.mark_dirty(),
                    Ok(_) => {}
                    Err(err) => {
                        log::error!("reading terminal input failed: {err}");
                        quit.store(true, Ordering::Release);
                        break;
                    }
                }
            }
        })
        .context("spawning input worker")?;
    Ok(())
}

fn spawn_clock(shared: Arc<SharedGame>, options: SessionOptions) -> Result<()> {
    thread::Builder::new()
        .name("clock".into())
        .spawn(move || {
            let started = Instant::now();
            loop {
                thread::sleep(CLOCK_INTERVAL);
                shared.set_elapsed_secs(started.elapsed().as_secs());
                if options.clock_marks_dirty {
                    shared.mark_dirty();
                }
            }
        })
        .context("spawning clock worker")?;
    Ok(())
}

fn spawn_game_loop(shared: Arc<SharedGame>, quit: Arc<AtomicBool>) -> Result<()> {
    thread::Builder::new()
        .name("game-loop".into())
        .spawn(move || {
            while !quit.load(Ordering::Acquire) {
                if shared.tick().completed {
                    break;
                }
                thread::sleep(GAME_LOOP_PAUSE);
            }
        })
        .context("spawning game-loop worker")?;
    Ok(())
}

fn render_loop(shared: &SharedGame, quit: &AtomicBool, debug: bool) -> io::Result<SessionEnd> {
    let mut stdout = io::stdout();
    loop {
        if quit.load(Ordering::Acquire) {
            return Ok(SessionEnd::Quit);
        }
        if !shared.take_dirty() {
            thread::sleep(RENDER_POLL);
            continue;
        }
        let (frame, complete) = {
            let game = shared.lock();
            (
                compose_frame(&game, shared.elapsed_secs(), debug),
                game.is_complete(),
            )
        };
        present(&mut stdout, &frame)?;
        if complete {
            return Ok(SessionEnd::Complete);
        }
    }
}
