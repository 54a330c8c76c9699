//! Thread-shared game handle for front-ends that run input, clock, game loop
//! and rendering on separate workers.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::game::{Game, TickOutcome};
use crate::input::InputEvent;

/// A [`Game`] behind one lock plus a lock-free redraw flag and clock.
#[derive(Debug)]
pub struct SharedGame {
    game: Mutex<Game>,
    dirty: AtomicBool,
    elapsed_secs: AtomicU64,
}

impl SharedGame {
    #[must_use]
    pub fn new(game: Game) -> Self {
        Self {
            game: Mutex::new(game),
            dirty: AtomicBool::new(true),
            elapsed_secs: AtomicU64::new(0),
        }
    }

    /// Lock the game. A worker that panicked mid-update leaves a board that is
    /// still internally consistent, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clear the redraw flag, returning whether it was set.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn set_elapsed_secs(&self, secs: u64) {
        self.elapsed_secs.store(secs, Ordering::Relaxed);
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs.load(Ordering::Relaxed)
    }

    /// Apply input under the lock and flag a redraw when warranted.
    pub fn apply_input(&self, event: InputEvent) {
        if self.lock().apply_input(event) {
            self.mark_dirty();
        }
    }

    /// Tick under the lock with the shared clock.
    pub fn tick(&self) -> TickOutcome {
        let outcome = self.lock().tick(self.elapsed_secs());
        if outcome.needs_redraw() {
            self.mark_dirty();
        }
        outcome
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lock().is_complete()
    }
}
