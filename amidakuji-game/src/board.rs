//! Rails, tracks and the board state they aggregate.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{BAR_COUNT, BarMask, POSITION_COUNT, PositionMask, RAIL_COUNT, TRACK_COUNT};

/// Index of a track, `0..TRACK_COUNT`.
pub type TrackId = usize;
/// Index of a rail, `0..RAIL_COUNT`. Rail `i` separates tracks `i` and `i + 1`.
pub type RailId = usize;
/// One offset per rail.
pub type Offsets = [usize; RAIL_COUNT];
/// Track occupied at each traversal position.
pub type TrackPath = SmallVec<[TrackId; POSITION_COUNT]>;

/// A sliding rail carrying [`BAR_COUNT`] rungs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rail {
    /// Bit `i` set when rung `i` connects the two tracks this rail separates.
    pub active_bars: BarMask,
    /// Live, player-controlled offset.
    pub offset: usize,
    /// Offset the solver settled on while constructing the reference path.
    pub reference_offset: usize,
}

impl Rail {
    #[must_use]
    pub const fn with_bars(active_bars: BarMask) -> Self {
        Self {
            active_bars,
            offset: 0,
            reference_offset: 0,
        }
    }

    #[must_use]
    pub const fn is_bar_active(&self, bar: usize) -> bool {
        bar < BAR_COUNT && self.active_bars & (1 << bar) != 0
    }

    #[must_use]
    pub const fn active_bar_count(&self) -> u32 {
        self.active_bars.count_ones()
    }
}

/// Checkpoint bitmaps for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Track {
    pub checkpoints: PositionMask,
    /// Always a subset of `checkpoints`.
    pub trigger_checkpoints: PositionMask,
}

impl Track {
    #[must_use]
    pub const fn has_checkpoint(&self, position: usize) -> bool {
        position < POSITION_COUNT && self.checkpoints & (1 << position) != 0
    }

    #[must_use]
    pub const fn has_trigger(&self, position: usize) -> bool {
        position < POSITION_COUNT && self.trigger_checkpoints & (1 << position) != 0
    }

    pub fn set_checkpoint(&mut self, position: usize) {
        if position < POSITION_COUNT {
            self.checkpoints |= 1 << position;
        }
    }

    pub fn clear(&mut self) {
        self.checkpoints = 0;
        self.trigger_checkpoints = 0;
    }
}

/// Which offsets a traversal reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetSource {
    /// The player's offsets.
    Live,
    /// The solver's accepted offsets.
    Reference,
}

/// A single puzzle board: rung layout, checkpoints, start/end and the
/// solver's reference path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub rails: [Rail; RAIL_COUNT],
    pub tracks: [Track; TRACK_COUNT],
    pub start_track: TrackId,
    pub end_track: TrackId,
    /// `reference_path[p]` is the track the reference traversal occupies
    /// when it reaches position `p`. Empty until the solver runs.
    pub reference_path: TrackPath,
}

impl Board {
    /// Build an unsolved board from rung bitmaps.
    ///
    /// # Panics
    ///
    /// Panics when either track lies outside `0..TRACK_COUNT`.
    #[must_use]
    pub fn new(bars: [BarMask; RAIL_COUNT], start_track: TrackId, end_track: TrackId) -> Self {
        assert!(start_track < TRACK_COUNT, "start track out of range");
        assert!(end_track < TRACK_COUNT, "end track out of range");
        Self {
            rails: bars.map(Rail::with_bars),
            tracks: [Track::default(); TRACK_COUNT],
            start_track,
            end_track,
            reference_path: TrackPath::new(),
        }
    }

    #[must_use]
    pub fn bars(&self) -> [BarMask; RAIL_COUNT] {
        self.rails.map(|rail| rail.active_bars)
    }

    #[must_use]
    pub fn offsets(&self, source: OffsetSource) -> Offsets {
        match source {
            OffsetSource::Live => self.rails.map(|rail| rail.offset),
            OffsetSource::Reference => self.rails.map(|rail| rail.reference_offset),
        }
    }

    pub fn set_live_offsets(&mut self, offsets: Offsets) {
        for (rail, offset) in self.rails.iter_mut().zip(offsets) {
            rail.offset = offset;
        }
    }

    pub fn set_reference_offsets(&mut self, offsets: Offsets) {
        for (rail, offset) in self.rails.iter_mut().zip(offsets) {
            rail.reference_offset = offset;
        }
    }

    /// Whether the solver has produced a reference path.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.reference_path.len() == POSITION_COUNT
    }

    /// Track on the reference path at `position`, if solved.
    #[must_use]
    pub fn reference_track(&self, position: usize) -> Option<TrackId> {
        self.reference_path.get(position).copied()
    }

    /// Total checkpoint bits across every track.
    #[must_use]
    pub fn checkpoint_total(&self) -> u32 {
        self.tracks.iter().map(|t| t.checkpoints.count_ones()).sum()
    }

    /// Total trigger bits across every track.
    #[must_use]
    pub fn trigger_total(&self) -> u32 {
        self.tracks
            .iter()
            .map(|t| t.trigger_checkpoints.count_ones())
            .sum()
    }

    pub fn clear_checkpoints(&mut self) {
        for track in &mut self.tracks {
            track.clear();
        }
    }
}
