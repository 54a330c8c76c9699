//! Board dimensions and tuning constants for the Amidakuji engine.
//!
//! Board geometry is fixed at compile time: one puzzle board, not an
//! arbitrary graph. Tuning values that may change between builds live in
//! [`crate::config::BoardConfig`] instead, with the defaults below.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "AMIDAKUJI_DEBUG_LOGS";
pub(crate) const LOG_RAIL_REDRAW: &str = "log.generator.rail-redraw";
pub(crate) const LOG_SOLVER_ACCEPTED: &str = "log.solver.accepted";
pub(crate) const LOG_SOLVER_EXHAUSTED: &str = "log.solver.exhausted";
pub(crate) const LOG_LAYOUT_REGENERATED: &str = "log.generator.layout-regenerated";
pub(crate) const LOG_PUZZLE_TRIVIAL: &str = "log.puzzle.trivial";
pub(crate) const LOG_PUZZLE_READY: &str = "log.puzzle.ready";
pub(crate) const LOG_CHECKPOINT_TRIGGER: &str = "log.checkpoint.trigger";
pub(crate) const LOG_CHECKPOINT_TIMER: &str = "log.checkpoint.timer";
pub(crate) const LOG_PUZZLE_COMPLETE: &str = "log.puzzle.complete";

// Board geometry -----------------------------------------------------------
/// Number of sliding rails.
pub const RAIL_COUNT: usize = 4;
/// Rails partition the board into one more track than there are rails.
pub const TRACK_COUNT: usize = RAIL_COUNT + 1;
/// Rungs carried by each rail.
pub const BAR_COUNT: usize = 16;
/// Traversal steps across the board. The interleaved layout gives every
/// bar slot two positions, one per rail parity.
pub const POSITION_COUNT: usize = 2 * BAR_COUNT;
/// Checkpoints stamped along the reference path.
pub const CHECKPOINT_COUNT: usize = 4;
/// Largest logical rail offset; at this offset the rail has slid off-board.
pub const MAXIMUM_OFFSET: usize = BAR_COUNT;

/// Bitmap of active rungs on one rail, bit `i` = rung `i`.
pub type BarMask = u16;
/// Bitmap over traversal positions on one track, bit `p` = position `p`.
pub type PositionMask = u32;

const _: () = assert!(BAR_COUNT <= BarMask::BITS as usize);
const _: () = assert!(POSITION_COUNT <= PositionMask::BITS as usize);
const _: () = assert!(POSITION_COUNT > CHECKPOINT_COUNT);

// Generation tuning --------------------------------------------------------
pub(crate) const RAIL_BAR_PROBABILITY: f32 = 0.5;
pub(crate) const MAXIMUM_COHERENCE: f32 = 3.693;
pub(crate) const GENERATION_ATTEMPT_LIMIT: u32 = 10_000;
pub(crate) const SOLVER_ATTEMPT_LIMIT: u32 = 100_000;
pub(crate) const LAYOUT_ATTEMPT_LIMIT: u32 = 64;

// Checkpoint tuning --------------------------------------------------------
pub(crate) const TRIGGER_PROBABILITY: f32 = 0.3;
pub(crate) const SCATTER_PROBABILITY: f32 = 0.3;

// Input tuning -------------------------------------------------------------
pub(crate) const PHYSICAL_STEP: f32 = 0.3;
pub(crate) const MAXIMUM_PHYSICAL_OFFSET: f32 = 10.0;

/// Whether verbose debug output was requested through the environment.
#[must_use]
pub fn debug_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}
