//! Constructive search for offsets that route the start track to the end.
use thiserror::Error;

use crate::board::{Board, Offsets, TrackId, TrackPath};
use crate::config::BoardConfig;
use crate::constants::{
    BAR_COUNT, LOG_SOLVER_ACCEPTED, LOG_SOLVER_EXHAUSTED, POSITION_COUNT, RAIL_COUNT,
};
use crate::rng::RngBundle;
use crate::tracer::trace;

/// Accepted reference offsets and the path they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub offsets: Offsets,
    pub path: TrackPath,
    /// Candidates drawn before one was accepted.
    pub attempts: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("no offsets route track {start} to track {end} after {attempts} candidates")]
    Exhausted {
        start: TrackId,
        end: TrackId,
        attempts: u32,
    },
}

/// Sample candidate offsets until one carries `board.start_track` to
/// `board.end_track`. Reads only the rung bitmaps.
///
/// # Errors
///
/// Returns [`SolveError::Exhausted`] after `cfg.solver_attempt_limit`
/// rejected candidates.
pub fn find_admissible_offsets(
    board: &Board,
    rng: &RngBundle,
    cfg: &BoardConfig,
) -> Result<Solution, SolveError> {
    let bars = board.bars();
    let mut stream = rng.solver();
    for attempt in 1..=cfg.solver_attempt_limit {
        let mut offsets = [0; RAIL_COUNT];
        for offset in &mut offsets {
            *offset = stream.index_below(BAR_COUNT);
        }
        if trace(bars, offsets, board.start_track, POSITION_COUNT, false).final_track
            != board.end_track
        {
            continue;
        }
        let path = trace(bars, offsets, board.start_track, POSITION_COUNT, true)
            .history
            .unwrap_or_default();
        return Ok(Solution {
            offsets,
            path,
            attempts: attempt,
        });
    }
    log::warn!(
        target: LOG_SOLVER_EXHAUSTED,
        "track {} never reached track {} in {} candidates",
        board.start_track,
        board.end_track,
        cfg.solver_attempt_limit
    );
    Err(SolveError::Exhausted {
        start: board.start_track,
        end: board.end_track,
        attempts: cfg.solver_attempt_limit,
    })
}

/// Solve `board` in place, storing reference offsets and the reference path.
///
/// # Errors
///
/// See [`find_admissible_offsets`].
pub fn solve(board: &mut Board, rng: &RngBundle, cfg: &BoardConfig) -> Result<(), SolveError> {
    let solution = find_admissible_offsets(board, rng, cfg)?;
    log::debug!(
        target: LOG_SOLVER_ACCEPTED,
        "offsets {:?} accepted after {} candidates",
        solution.offsets,
        solution.attempts
    );
    board.set_reference_offsets(solution.offsets);
    board.reference_path = solution.path;
    Ok(())
}
