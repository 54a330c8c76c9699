//! Deterministic traversal of a token through the rung layout.
//!
//! Rungs are interleaved: rail `r` only has a rung slot at positions whose
//! parity differs from its own, and two consecutive positions share one
//! physical bar slot (`position / 2`). For a token on track `t` the two
//! bordering rails (`t - 1` and `t`) have opposite parity, so at most one of
//! them can switch the token at any position.

use crate::board::{Board, OffsetSource, Offsets, RailId, TrackId, TrackPath};
use crate::constants::{BAR_COUNT, BarMask, POSITION_COUNT, RAIL_COUNT};

/// Whether `rail` has a rung slot at `position` under the interleaved layout.
#[must_use]
pub const fn has_rung_slot(rail: RailId, position: usize) -> bool {
    ((rail & 1) ^ (position & 1)) == 1
}

/// Local bar index a rail shifted by `offset` presents at `position`.
#[must_use]
pub fn local_bar(offset: usize, position: usize) -> Option<usize> {
    (position / 2)
        .checked_sub(offset)
        .filter(|local| *local < BAR_COUNT)
}

fn rung_active(bars: BarMask, offset: usize, position: usize) -> bool {
    local_bar(offset, position).is_some_and(|local| bars & (1 << local) != 0)
}

/// Step-at-a-time walker over the board for one offset snapshot.
///
/// Holds copies of the bitmaps and offsets, so it never observes later
/// mutation of the board it was created from.
#[derive(Debug, Clone)]
pub struct PathWalker {
    bars: [BarMask; RAIL_COUNT],
    offsets: Offsets,
    track: TrackId,
    position: usize,
}

impl PathWalker {
    #[must_use]
    pub const fn new(bars: [BarMask; RAIL_COUNT], offsets: Offsets, start: TrackId) -> Self {
        Self {
            bars,
            offsets,
            track: start,
            position: 0,
        }
    }

    /// Walker over `board` reading the offsets named by `source`.
    #[must_use]
    pub fn on_board(board: &Board, source: OffsetSource) -> Self {
        Self::new(board.bars(), board.offsets(source), board.start_track)
    }

    /// Track currently occupied.
    #[must_use]
    pub const fn track(&self) -> TrackId {
        self.track
    }

    /// Next position to be crossed; equals the number of steps taken.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Cross the current position, switching track if an eligible rung is
    /// active, and return the track occupied afterwards.
    pub fn step(&mut self) -> TrackId {
        let position = self.position;
        let right = Some(self.track).filter(|rail| *rail < RAIL_COUNT);
        let left = self.track.checked_sub(1).filter(|rail| *rail < RAIL_COUNT);
        let right_eligible = right.filter(|rail| has_rung_slot(*rail, position));
        let left_eligible = left.filter(|rail| has_rung_slot(*rail, position));
        debug_assert!(
            right_eligible.is_none() || left_eligible.is_none(),
            "both rails bordering track {} claim position {position}",
            self.track
        );

        if let Some(rail) = right_eligible
            && rung_active(self.bars[rail], self.offsets[rail], position)
        {
            self.track += 1;
        } else if let Some(rail) = left_eligible
            && rung_active(self.bars[rail], self.offsets[rail], position)
        {
            self.track -= 1;
        }
        self.position += 1;
        self.track
    }
}

/// Outcome of a full traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub final_track: TrackId,
    /// `history[p]` is the track occupied on arrival at position `p`.
    pub history: Option<TrackPath>,
}

/// Thread a token from `start` for `steps` positions.
#[must_use]
pub fn trace(
    bars: [BarMask; RAIL_COUNT],
    offsets: Offsets,
    start: TrackId,
    steps: usize,
    record_history: bool,
) -> Trace {
    let mut walker = PathWalker::new(bars, offsets, start);
    let mut history = record_history.then(TrackPath::new);
    for _ in 0..steps {
        if let Some(history) = history.as_mut() {
            history.push(walker.track());
        }
        walker.step();
    }
    Trace {
        final_track: walker.track(),
        history,
    }
}

/// Trace the whole board with the offsets named by `source`.
#[must_use]
pub fn trace_board(board: &Board, source: OffsetSource, record_history: bool) -> Trace {
    trace(
        board.bars(),
        board.offsets(source),
        board.start_track,
        POSITION_COUNT,
        record_history,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TRACK_COUNT;

    #[test]
    fn rung_slots_alternate_by_rail_parity() {
        assert!(has_rung_slot(0, 1));
        assert!(!has_rung_slot(0, 0));
        assert!(has_rung_slot(1, 0));
        assert!(!has_rung_slot(1, 1));
        for track in 1..RAIL_COUNT {
            for position in 0..POSITION_COUNT {
                assert_ne!(
                    has_rung_slot(track - 1, position),
                    has_rung_slot(track, position),
                    "neighbours of track {track} must alternate at {position}"
                );
            }
        }
    }

    #[test]
    fn local_bar_respects_offset_window() {
        assert_eq!(local_bar(0, 0), Some(0));
        assert_eq!(local_bar(0, 31), Some(15));
        assert_eq!(local_bar(3, 5), None);
        assert_eq!(local_bar(3, 6), Some(0));
        assert_eq!(local_bar(16, 31), None);
    }

    #[test]
    fn empty_board_keeps_token_on_start_track() {
        for start in 0..TRACK_COUNT {
            let result = trace([0; RAIL_COUNT], [0; RAIL_COUNT], start, POSITION_COUNT, true);
            assert_eq!(result.final_track, start);
            let history = result.history.expect("history requested");
            assert_eq!(history.len(), POSITION_COUNT);
            assert!(history.iter().all(|track| *track == start));
        }
    }

    #[test]
    fn single_rung_switches_once() {
        // Rail 0 bar 0 sits at position 1 (rail 0 is even, so odd positions).
        let bars = [0b1, 0, 0, 0];
        let result = trace(bars, [0; RAIL_COUNT], 0, POSITION_COUNT, true);
        assert_eq!(result.final_track, 1);
        let history = result.history.unwrap();
        assert_eq!(history[0], 0);
        assert_eq!(history[1], 0);
        assert_eq!(history[2], 1);

        let from_right = trace(bars, [0; RAIL_COUNT], 1, POSITION_COUNT, false);
        assert_eq!(from_right.final_track, 0);
        assert!(from_right.history.is_none());
    }

    #[test]
    fn offset_moves_rung_later_on_the_board() {
        let bars = [0b1, 0, 0, 0];
        let result = trace(bars, [4, 0, 0, 0], 0, POSITION_COUNT, true);
        let history = result.history.unwrap();
        // Bar 0 shifted by 4 slots lands on position 9.
        assert_eq!(history[9], 0);
        assert_eq!(history[10], 1);
        assert_eq!(result.final_track, 1);
    }

    #[test]
    fn rail_slid_off_board_has_no_effect() {
        let bars = [BarMask::MAX, 0, 0, 0];
        let result = trace(bars, [BAR_COUNT, 0, 0, 0], 0, POSITION_COUNT, false);
        assert_eq!(result.final_track, 0);
    }

    #[test]
    fn fully_wired_rails_zigzag_between_neighbours() {
        let bars = [BarMask::MAX; RAIL_COUNT];
        let result = trace(bars, [0; RAIL_COUNT], 0, 4, true);
        // Position 0: track 0's right rail (0) has no slot, nothing to the left.
        // Position 1: rail 0 active -> track 1.
        // Position 2: track 1's right rail (1) active -> track 2.
        // Position 3: track 2's right rail (2) active -> track 3.
        assert_eq!(result.history.unwrap().as_slice(), &[0, 0, 1, 2]);
        assert_eq!(result.final_track, 3);
    }

    #[test]
    fn trace_is_deterministic() {
        let bars = [0b1010_0110_0101_1001, 0b0110_1001, 0b1111_0000_1010, 0b0101_0101];
        let offsets = [2, 0, 5, 9];
        let one = trace(bars, offsets, 3, POSITION_COUNT, true);
        let two = trace(bars, offsets, 3, POSITION_COUNT, true);
        assert_eq!(one, two);
    }

    #[test]
    fn walker_tracks_position_and_stays_in_bounds() {
        let bars = [BarMask::MAX; RAIL_COUNT];
        let mut walker = PathWalker::new(bars, [0; RAIL_COUNT], TRACK_COUNT - 1);
        for expected in 1..=POSITION_COUNT {
            let track = walker.step();
            assert!(track < TRACK_COUNT);
            assert_eq!(walker.position(), expected);
        }
    }
}
