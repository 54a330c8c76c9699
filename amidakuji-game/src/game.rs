//! Puzzle lifecycle: generation, live input, ticking and checkpoint
//! regeneration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, OffsetSource, Offsets, RailId};
use crate::checkpoints::place_checkpoints;
use crate::config::BoardConfig;
use crate::constants::{
    LOG_CHECKPOINT_TIMER, LOG_CHECKPOINT_TRIGGER, LOG_LAYOUT_REGENERATED, LOG_PUZZLE_COMPLETE,
    LOG_PUZZLE_READY, LOG_PUZZLE_TRIVIAL, RAIL_COUNT, TRACK_COUNT,
};
use crate::generator::{GenerationError, generate_rails};
use crate::input::{InputEvent, InputState};
use crate::rng::RngBundle;
use crate::scoring::{Score, score};
use crate::solver::{SolveError, solve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Board construction in progress; [`Game::generate`] only returns
    /// games past this phase.
    Generating,
    Ready,
    Running,
    CheckpointRegenerating,
    Complete,
}

/// Why checkpoints were rebuilt during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegenerationCause {
    /// The live path crossed a trigger checkpoint.
    Trigger,
    /// The elapsed-time interval rolled over.
    Timer,
}

/// What a single [`Game::tick`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub score_changed: bool,
    pub regenerated: Option<RegenerationCause>,
    /// This tick moved the game into [`GamePhase::Complete`].
    pub completed: bool,
}

impl TickOutcome {
    /// Whether a front-end needs to redraw.
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.score_changed || self.regenerated.is_some() || self.completed
    }
}

/// One puzzle instance and the player's interaction with it.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    cfg: BoardConfig,
    rng: RngBundle,
    phase: GamePhase,
    input: InputState,
    score: Score,
    /// Live offsets moved since the last tick.
    moved: bool,
    timer_window: u64,
    regenerations: u32,
}

impl Game {
    /// Generate a fresh, solvable, non-trivial puzzle from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Config`] for an invalid configuration,
    /// [`GenerationError::RailBudgetExceeded`] when the coherence cap cannot
    /// be met, and [`GenerationError::LayoutBudgetExceeded`] when no layout in
    /// `cfg.layout_attempt_limit` tries yields a usable puzzle.
    pub fn generate(seed: u64, cfg: BoardConfig) -> Result<Self, GenerationError> {
        Self::generate_with(seed, cfg, draw_layout)
    }

    fn generate_with<F>(seed: u64, cfg: BoardConfig, mut draw: F) -> Result<Self, GenerationError>
    where
        F: FnMut(&RngBundle, &BoardConfig) -> Result<Board, GenerationError>,
    {
        cfg.validate()?;
        let rng = RngBundle::from_user_seed(seed);
        for layout in 1..=cfg.layout_attempt_limit {
            let mut board = draw(&rng, &cfg)?;
            match accept_layout(&mut board, &rng, &cfg) {
                Ok(initial) => {
                    log::info!(
                        target: LOG_PUZZLE_READY,
                        "seed {seed:#018x}: track {} -> track {} after {layout} layout(s)",
                        board.start_track,
                        board.end_track
                    );
                    return Ok(Self::assemble(board, cfg, rng, initial));
                }
                Err(LayoutRejection::Unsolvable(err)) => log::debug!(
                    target: LOG_LAYOUT_REGENERATED,
                    "layout {layout}: {err}; regenerating"
                ),
                Err(LayoutRejection::Trivial) => log::debug!(
                    target: LOG_PUZZLE_TRIVIAL,
                    "layout {layout} already complete at zero offsets; regenerating"
                ),
            }
        }
        Err(GenerationError::LayoutBudgetExceeded {
            attempts: cfg.layout_attempt_limit,
        })
    }

    /// Wrap an already solved board, e.g. a hand-built test fixture.
    ///
    /// `seed` only drives later checkpoint regeneration.
    #[must_use]
    pub fn from_board(board: Board, cfg: BoardConfig, seed: u64) -> Self {
        let initial = score(&board, cfg.progress_policy);
        Self::assemble(board, cfg, RngBundle::from_user_seed(seed), initial)
    }

    fn assemble(mut board: Board, cfg: BoardConfig, rng: RngBundle, score: Score) -> Self {
        let input = InputState::default();
        board.set_live_offsets(input.logical(&cfg));
        Self {
            board,
            cfg,
            rng,
            phase: GamePhase::Ready,
            input,
            score,
            moved: true,
            timer_window: 0,
            regenerations: 0,
        }
    }

    /// Leave [`GamePhase::Ready`] and begin accepting ticks.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Running;
        }
    }

    /// Apply one input event; returns whether a redraw is warranted.
    ///
    /// Ignored once the puzzle is complete.
    pub fn apply_input(&mut self, event: InputEvent) -> bool {
        if self.phase == GamePhase::Complete {
            return false;
        }
        if self.input.apply(event, &self.cfg) {
            self.board.set_live_offsets(self.input.logical(&self.cfg));
            self.moved = true;
        }
        // Selection and sub-step physical nudges still change the status panel.
        true
    }

    /// Re-score the live path and fire any due checkpoint regeneration.
    pub fn tick(&mut self, elapsed_secs: u64) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.phase != GamePhase::Running {
            return outcome;
        }
        let moved = std::mem::take(&mut self.moved);
        let mut current = score(&self.board, self.cfg.progress_policy);

        if current.complete {
            log::info!(
                target: LOG_PUZZLE_COMPLETE,
                "puzzle complete after {} checkpoint regeneration(s)",
                self.regenerations
            );
            self.phase = GamePhase::Complete;
            outcome.completed = true;
        } else if moved && current.trigger_crossed {
            log::info!(target: LOG_CHECKPOINT_TRIGGER, "trigger checkpoint crossed");
            current = self.regenerate_checkpoints();
            outcome.regenerated = Some(RegenerationCause::Trigger);
        } else if self.timer_due(elapsed_secs) {
            log::info!(target: LOG_CHECKPOINT_TIMER, "timer rolled over at {elapsed_secs}s");
            current = self.regenerate_checkpoints();
            outcome.regenerated = Some(RegenerationCause::Timer);
        }

        outcome.score_changed = current != self.score;
        self.score = current;
        outcome
    }

    fn timer_due(&mut self, elapsed_secs: u64) -> bool {
        let Some(interval) = self.cfg.time_trigger_secs.filter(|secs| *secs > 0) else {
            return false;
        };
        let window = elapsed_secs / interval;
        if window > self.timer_window {
            self.timer_window = window;
            return true;
        }
        false
    }

    fn regenerate_checkpoints(&mut self) -> Score {
        self.phase = GamePhase::CheckpointRegenerating;
        place_checkpoints(&mut self.board, &self.rng, &self.cfg);
        self.regenerations = self.regenerations.saturating_add(1);
        self.phase = GamePhase::Running;
        score(&self.board, self.cfg.progress_policy)
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub const fn score(&self) -> &Score {
        &self.score
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.phase, GamePhase::Complete)
    }

    #[must_use]
    pub const fn selected_rail(&self) -> RailId {
        self.input.selected
    }

    #[must_use]
    pub const fn physical_offsets(&self) -> &[f32; RAIL_COUNT] {
        &self.input.physical
    }

    #[must_use]
    pub fn live_offsets(&self) -> Offsets {
        self.board.offsets(OffsetSource::Live)
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Checkpoint rebuilds since the puzzle started.
    #[must_use]
    pub const fn regenerations(&self) -> u32 {
        self.regenerations
    }
}

/// Why a drawn layout was thrown away during generation.
#[derive(Debug, Error, PartialEq)]
enum LayoutRejection {
    #[error(transparent)]
    Unsolvable(#[from] SolveError),
    #[error("puzzle already complete at zero offsets")]
    Trivial,
}

/// Draw fresh rails plus start and end tracks.
fn draw_layout(rng: &RngBundle, cfg: &BoardConfig) -> Result<Board, GenerationError> {
    let bars = generate_rails(rng, cfg)?;
    let mut stream = rng.board();
    let start = stream.index_below(TRACK_COUNT);
    let end = stream.index_below(TRACK_COUNT);
    Ok(Board::new(bars, start, end))
}

/// Solve `board` and place its checkpoints, returning the score at zero
/// live offsets.
fn accept_layout(
    board: &mut Board,
    rng: &RngBundle,
    cfg: &BoardConfig,
) -> Result<Score, LayoutRejection> {
    solve(board, rng, cfg)?;
    place_checkpoints(board, rng, cfg);
    let initial = score(board, cfg.progress_policy);
    if initial.complete {
        return Err(LayoutRejection::Trivial);
    }
    Ok(initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TrackId;
    use crate::constants::{CHECKPOINT_COUNT, MAXIMUM_OFFSET};
    use crate::tracer::trace_board;

    /// Rungless board whose checkpoints all sit on track 2.
    fn straight_game(end_track: TrackId, cfg: BoardConfig) -> Game {
        let mut board = Board::new([0; RAIL_COUNT], 2, end_track);
        board.reference_path = trace_board(&board, OffsetSource::Reference, true)
            .history
            .unwrap();
        let spacing = BoardConfig::checkpoint_spacing();
        for k in 1..=CHECKPOINT_COUNT {
            board.tracks[2].set_checkpoint(k * spacing);
        }
        Game::from_board(board, cfg, 17)
    }

    #[test]
    fn generated_game_is_ready_and_incomplete() {
        let game = Game::generate(2024, BoardConfig::default()).unwrap();
        assert_eq!(game.phase(), GamePhase::Ready);
        assert!(game.board().is_solved());
        assert_eq!(
            game.board().checkpoint_total(),
            u32::try_from(CHECKPOINT_COUNT).unwrap()
        );
        assert!(!game.score().complete);
        assert_eq!(game.live_offsets(), [0; RAIL_COUNT]);
        assert_eq!(game.seed(), 2024);
    }

    #[test]
    fn generation_is_seed_stable() {
        let one = Game::generate(55, BoardConfig::default()).unwrap();
        let two = Game::generate(55, BoardConfig::default()).unwrap();
        assert_eq!(one.board(), two.board());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = BoardConfig {
            rail_bar_probability: -0.1,
            ..BoardConfig::default()
        };
        assert!(matches!(
            Game::generate(1, cfg),
            Err(GenerationError::Config(_))
        ));
    }

    #[test]
    fn rungless_layout_is_rejected_as_trivial() {
        // Every offset keeps the token on track 2, so the checkpoints land on
        // the zero-offset path.
        let cfg = BoardConfig::default();
        let rng = RngBundle::from_user_seed(3);
        let mut board = Board::new([0; RAIL_COUNT], 2, 2);
        assert_eq!(
            accept_layout(&mut board, &rng, &cfg),
            Err(LayoutRejection::Trivial)
        );
    }

    #[test]
    fn rejected_layouts_are_redrawn() {
        let cfg = BoardConfig {
            solver_attempt_limit: 500,
            ..BoardConfig::default()
        };
        let mut draws = 0;
        let game = Game::generate_with(5, cfg, |rng, cfg| {
            draws += 1;
            match draws {
                1 => Ok(Board::new([0; RAIL_COUNT], 0, 3)),
                2 => Ok(Board::new([0; RAIL_COUNT], 2, 2)),
                _ => draw_layout(rng, cfg),
            }
        })
        .unwrap();
        assert!(draws >= 3);
        assert_eq!(game.phase(), GamePhase::Ready);
        assert!(game.board().is_solved());
        assert!(!game.score().complete);
    }

    #[test]
    fn unsolvable_layouts_exhaust_the_layout_budget() {
        let cfg = BoardConfig {
            solver_attempt_limit: 50,
            layout_attempt_limit: 1,
            ..BoardConfig::default()
        };
        let result = Game::generate_with(5, cfg, |_, _| Ok(Board::new([0; RAIL_COUNT], 0, 3)));
        assert_eq!(
            result.unwrap_err(),
            GenerationError::LayoutBudgetExceeded { attempts: 1 }
        );
    }

    #[test]
    fn tick_before_start_is_inert() {
        let mut game = straight_game(2, BoardConfig::default());
        assert_eq!(game.tick(0), TickOutcome::default());
        assert_eq!(game.phase(), GamePhase::Ready);
    }

    #[test]
    fn completion_freezes_input() {
        let mut game = straight_game(2, BoardConfig::default());
        game.start();
        let outcome = game.tick(0);
        assert!(outcome.completed);
        assert!(game.is_complete());
        assert!(!game.apply_input(InputEvent::Raise));
        assert_eq!(game.live_offsets(), [0; RAIL_COUNT]);
        assert_eq!(game.tick(1), TickOutcome::default());
    }

    #[test]
    fn input_moves_selected_rail() {
        let mut game = straight_game(3, BoardConfig::default());
        game.start();
        assert!(game.apply_input(InputEvent::NextRail));
        for _ in 0..40 {
            game.apply_input(InputEvent::Raise);
        }
        assert_eq!(game.selected_rail(), 1);
        assert_eq!(game.live_offsets(), [0, MAXIMUM_OFFSET, 0, 0]);
    }

    #[test]
    fn crossed_trigger_regenerates_once_per_move() {
        let mut game = straight_game(3, BoardConfig::default());
        game.board.tracks[2].trigger_checkpoints = 1 << BoardConfig::checkpoint_spacing();
        game.start();
        let outcome = game.tick(0);
        assert_eq!(outcome.regenerated, Some(RegenerationCause::Trigger));
        assert_eq!(game.regenerations(), 1);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(
            game.board().checkpoint_total(),
            u32::try_from(CHECKPOINT_COUNT).unwrap()
        );
        assert_eq!(game.tick(0).regenerated, None);
    }

    #[test]
    fn timer_regenerates_on_each_interval() {
        let cfg = BoardConfig {
            time_trigger_secs: Some(30),
            trigger_probability: 0.0,
            ..BoardConfig::default()
        };
        let mut game = straight_game(3, cfg);
        game.start();
        assert_eq!(game.tick(10).regenerated, None);
        assert_eq!(game.tick(30).regenerated, Some(RegenerationCause::Timer));
        assert_eq!(game.tick(45).regenerated, None);
        assert_eq!(game.tick(61).regenerated, Some(RegenerationCause::Timer));
        assert_eq!(game.regenerations(), 2);
    }
}
