//! Progress and completion scoring of the live path.
use serde::{Deserialize, Serialize};

use crate::board::{Board, OffsetSource, TrackId, TrackPath};
use crate::config::{BoardConfig, ProgressPolicy};
use crate::constants::{CHECKPOINT_COUNT, POSITION_COUNT};
use crate::numbers::{clamp_unit, ratio_f32};
use crate::tracer::trace_board;

/// Snapshot of how the live path relates to the checkpoints and reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub final_track: TrackId,
    /// Checkpoints the live path crosses, in any order.
    pub achieved: usize,
    /// Checkpoints matched consecutively in spacing order.
    pub in_order: usize,
    /// Normalised progress in `[0, 1]`.
    pub progress: f32,
    pub complete: bool,
    /// The live path crosses at least one trigger checkpoint.
    pub trigger_crossed: bool,
}

impl Score {
    /// Whether this score reflects a win: end track reached with every
    /// checkpoint crossed.
    #[must_use]
    pub const fn is_win(final_track: TrackId, end_track: TrackId, achieved: usize) -> bool {
        final_track == end_track && achieved >= CHECKPOINT_COUNT
    }
}

/// Trace the live offsets and score them against the board.
#[must_use]
pub fn score(board: &Board, policy: ProgressPolicy) -> Score {
    let live = trace_board(board, OffsetSource::Live, true);
    let history = live.history.unwrap_or_default();
    let final_track = live.final_track;

    let mut achieved = 0;
    let mut trigger_crossed = false;
    for (position, track) in history.iter().enumerate() {
        let cell = &board.tracks[*track];
        if cell.has_checkpoint(position) {
            achieved += 1;
        }
        trigger_crossed |= cell.has_trigger(position);
    }

    let in_order = ordered_checkpoints(board, &history);
    let progress = match policy {
        ProgressPolicy::CheckpointWindow => {
            window_progress(board, &history, final_track, in_order)
        }
        ProgressPolicy::CheckpointRatio => clamp_unit(ratio_f32(achieved, CHECKPOINT_COUNT)),
    };

    Score {
        final_track,
        achieved,
        in_order,
        progress,
        complete: Score::is_win(final_track, board.end_track, achieved),
        trigger_crossed,
    }
}

/// Count checkpoints matched at consecutive spacing multiples, stopping at
/// the first expected checkpoint the live path misses.
fn ordered_checkpoints(board: &Board, history: &TrackPath) -> usize {
    let spacing = BoardConfig::checkpoint_spacing();
    let mut latest = 0;
    for (position, track) in history.iter().enumerate() {
        if (latest + 1) * spacing != position {
            continue;
        }
        if !board.tracks[*track].has_checkpoint(position) {
            break;
        }
        latest += 1;
    }
    latest
}

fn window_progress(board: &Board, history: &TrackPath, final_track: TrackId, latest: usize) -> f32 {
    if latest == 0 {
        return 0.0;
    }
    let spacing = BoardConfig::checkpoint_spacing();
    let live_at = |position: usize| history.get(position).copied().or(Some(final_track));
    let reference_at = |position: usize| {
        board
            .reference_track(position)
            .or_else(|| (position == POSITION_COUNT).then_some(board.end_track))
    };

    let boundary = if latest < CHECKPOINT_COUNT {
        (latest + 1) * spacing
    } else {
        POSITION_COUNT
    };
    let mut position = latest * spacing;
    while position < boundary {
        let next = position + 1;
        if reference_at(next).is_none() || live_at(next) != reference_at(next) {
            break;
        }
        position = next;
    }

    let remaining = boundary - position;
    if remaining == 0 && latest < CHECKPOINT_COUNT {
        return 0.0;
    }
    // The final window runs from the last checkpoint to the board end.
    let window = boundary - latest * spacing;
    clamp_unit(1.0 - ratio_f32(remaining, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAIL_COUNT;

    /// Board with no rungs: every path stays on its start track.
    fn straight_board(checkpoint_track: TrackId) -> Board {
        let mut board = Board::new([0; RAIL_COUNT], 2, 2);
        let reference = trace_board(&board, OffsetSource::Reference, true);
        board.reference_path = reference.history.unwrap();
        let spacing = BoardConfig::checkpoint_spacing();
        for k in 1..=CHECKPOINT_COUNT {
            board.tracks[checkpoint_track].set_checkpoint(k * spacing);
        }
        board
    }

    #[test]
    fn following_reference_completes_with_full_progress() {
        let board = straight_board(2);
        let result = score(&board, ProgressPolicy::CheckpointWindow);
        assert_eq!(result.achieved, CHECKPOINT_COUNT);
        assert_eq!(result.in_order, CHECKPOINT_COUNT);
        assert!(result.complete);
        assert!((result.progress - 1.0).abs() < f32::EPSILON);
        assert!(!result.trigger_crossed);
    }

    #[test]
    fn missed_checkpoints_score_zero() {
        let board = straight_board(3);
        let result = score(&board, ProgressPolicy::CheckpointWindow);
        assert_eq!(result.achieved, 0);
        assert_eq!(result.in_order, 0);
        assert!(result.progress.abs() < f32::EPSILON);
        assert!(!result.complete);
    }

    #[test]
    fn end_track_alone_is_not_a_win() {
        let mut board = straight_board(2);
        board.tracks[2].checkpoints &= !(1 << (2 * BoardConfig::checkpoint_spacing()));
        let result = score(&board, ProgressPolicy::CheckpointWindow);
        assert_eq!(result.final_track, board.end_track);
        assert_eq!(result.achieved, CHECKPOINT_COUNT - 1);
        assert_eq!(result.in_order, 1);
        assert!(!result.complete);
        // Anchored at checkpoint one, walked to the boundary of a missing
        // checkpoint: no headway counts.
        assert!(result.progress.abs() < f32::EPSILON);
    }

    #[test]
    fn ratio_policy_counts_crossed_checkpoints() {
        let mut board = straight_board(2);
        board.tracks[2].checkpoints &= !(1 << BoardConfig::checkpoint_spacing());
        let result = score(&board, ProgressPolicy::CheckpointRatio);
        assert_eq!(result.in_order, 0);
        assert!((result.progress - 0.75).abs() < 1e-6);
    }

    #[test]
    fn diverging_live_path_reports_partial_window() {
        // One rung on rail 2 at slot 5 (position 11) pulls the live path off
        // track 2 while the reference, shifted off-board, stays put.
        let mut board = straight_board(2);
        board.rails[2].active_bars = 1 << 5;
        board.set_reference_offsets([0, 0, crate::constants::MAXIMUM_OFFSET, 0]);
        let result = score(&board, ProgressPolicy::CheckpointWindow);
        assert_eq!(result.in_order, 1);
        assert!(!result.complete);
        // Walk from 7 stays synced through position 11, diverging at 12.
        let expected = 1.0 - ratio_f32(14 - 11, BoardConfig::checkpoint_spacing());
        assert!((result.progress - expected).abs() < 1e-6);
    }

    #[test]
    fn diverging_after_last_checkpoint_scores_zero_headway() {
        // A rung on rail 1 at position 28 pulls the live path onto track 1
        // right after checkpoint four; the reference slides it off-board.
        let mut board = straight_board(2);
        board.rails[1].active_bars = 1 << 14;
        board.set_reference_offsets([0, crate::constants::MAXIMUM_OFFSET, 0, 0]);
        let result = score(&board, ProgressPolicy::CheckpointWindow);
        assert_eq!(result.final_track, 1);
        assert_eq!(result.in_order, CHECKPOINT_COUNT);
        assert!(!result.complete);
        assert!(result.progress.abs() < f32::EPSILON);
    }

    #[test]
    fn trigger_on_live_path_is_reported() {
        let mut board = straight_board(2);
        board.tracks[2].trigger_checkpoints = 1 << BoardConfig::checkpoint_spacing();
        assert!(score(&board, ProgressPolicy::CheckpointWindow).trigger_crossed);
    }
}
