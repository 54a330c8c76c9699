//! Terminal-agnostic render model: one glyph per board cell.
//!
//! The grid is drawn transposed: each track and rail becomes a row and
//! traversal positions run left to right, so a track segment is a
//! horizontal [`Icon::Bar`] and an active rung a vertical [`Icon::Dash`].
use serde::{Deserialize, Serialize};

use crate::board::{Board, OffsetSource, RailId, TrackId};
use crate::constants::{POSITION_COUNT, RAIL_COUNT, TRACK_COUNT};
use crate::tracer::{has_rung_slot, local_bar};

/// Rows in the grid: tracks interleaved with the rails between them.
pub const GRID_ROWS: usize = RAIL_COUNT + TRACK_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    Space,
    Bar,
    Dash,
}

impl Icon {
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Space => ' ',
            Self::Bar => '-',
            Self::Dash => '|',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    White,
    Red,
    Green,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Glyph {
    pub icon: Icon,
    pub tone: Tone,
}

impl Glyph {
    pub const BLANK: Self = Self::new(Icon::Space, Tone::White);

    #[must_use]
    pub const fn new(icon: Icon, tone: Tone) -> Self {
        Self { icon, tone }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Paint the solver's reference path; a debugging aid that gives the
    /// answer away.
    pub highlight_reference: bool,
}

/// What a grid row depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Track(TrackId),
    Rail(RailId),
}

/// Row-major glyph grid of [`GRID_ROWS`] by [`POSITION_COUNT`] cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderGrid {
    cells: [[Glyph; POSITION_COUNT]; GRID_ROWS],
}

impl RenderGrid {
    #[must_use]
    pub fn rows(&self) -> &[[Glyph; POSITION_COUNT]; GRID_ROWS] {
        &self.cells
    }

    #[must_use]
    pub fn cell(&self, row: usize, position: usize) -> Option<Glyph> {
        self.cells.get(row)?.get(position).copied()
    }

    /// Row `2i` is track `i`, row `2i + 1` is rail `i`.
    #[must_use]
    pub const fn row_kind(row: usize) -> RowKind {
        if row % 2 == 0 {
            RowKind::Track(row / 2)
        } else {
            RowKind::Rail(row / 2)
        }
    }
}

/// Glyph for track `track` at `position`.
#[must_use]
pub fn track_glyph(
    board: &Board,
    track: TrackId,
    position: usize,
    options: RenderOptions,
) -> Glyph {
    let cell = &board.tracks[track];
    let tone = if options.highlight_reference && board.reference_track(position) == Some(track) {
        Tone::Blue
    } else if cell.has_trigger(position) {
        Tone::Red
    } else if cell.has_checkpoint(position) {
        Tone::Green
    } else {
        Tone::White
    };
    Glyph::new(Icon::Bar, tone)
}

/// Glyph for rail `rail` at `position` under the live offsets.
#[must_use]
pub fn rail_glyph(board: &Board, rail: RailId, position: usize) -> Glyph {
    if !has_rung_slot(rail, position) {
        return Glyph::BLANK;
    }
    let offset = board.offsets(OffsetSource::Live)[rail];
    let active =
        local_bar(offset, position).is_some_and(|bar| board.rails[rail].is_bar_active(bar));
    if active {
        Glyph::new(Icon::Dash, Tone::White)
    } else {
        Glyph::BLANK
    }
}

#[must_use]
pub fn render_grid(board: &Board, options: RenderOptions) -> RenderGrid {
    let mut cells = [[Glyph::BLANK; POSITION_COUNT]; GRID_ROWS];
    for (row, glyphs) in cells.iter_mut().enumerate() {
        for (position, glyph) in glyphs.iter_mut().enumerate() {
            *glyph = match RenderGrid::row_kind(row) {
                RowKind::Track(track) => track_glyph(board, track, position, options),
                RowKind::Rail(rail) => rail_glyph(board, rail, position),
            };
        }
    }
    RenderGrid { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::trace_board;

    fn board() -> Board {
        let mut board = Board::new([0b1, 0, 0, 0], 0, 1);
        board.reference_path = trace_board(&board, OffsetSource::Reference, true)
            .history
            .unwrap();
        board.tracks[1].set_checkpoint(7);
        board.tracks[1].set_checkpoint(14);
        board.tracks[1].trigger_checkpoints = 1 << 14;
        board
    }

    #[test]
    fn grid_interleaves_tracks_and_rails() {
        assert_eq!(RenderGrid::row_kind(0), RowKind::Track(0));
        assert_eq!(RenderGrid::row_kind(1), RowKind::Rail(0));
        assert_eq!(RenderGrid::row_kind(GRID_ROWS - 1), RowKind::Track(RAIL_COUNT));
        let grid = render_grid(&board(), RenderOptions::default());
        assert_eq!(grid.rows().len(), GRID_ROWS);
        assert!(grid.cell(GRID_ROWS, 0).is_none());
    }

    #[test]
    fn rail_rows_show_active_rungs_only_in_their_slots() {
        let board = board();
        assert_eq!(rail_glyph(&board, 0, 1).icon, Icon::Dash);
        assert_eq!(rail_glyph(&board, 0, 0), Glyph::BLANK);
        assert_eq!(rail_glyph(&board, 0, 3), Glyph::BLANK);
        assert_eq!(rail_glyph(&board, 1, 0), Glyph::BLANK);
    }

    #[test]
    fn track_tones_follow_priority() {
        let board = board();
        let plain = RenderOptions::default();
        assert_eq!(track_glyph(&board, 1, 7, plain).tone, Tone::Green);
        assert_eq!(track_glyph(&board, 1, 14, plain).tone, Tone::Red);
        assert_eq!(track_glyph(&board, 1, 20, plain).tone, Tone::White);

        let reveal = RenderOptions {
            highlight_reference: true,
        };
        // The reference path sits on track 1 from position 2 onwards.
        assert_eq!(track_glyph(&board, 1, 14, reveal).tone, Tone::Blue);
        assert_eq!(track_glyph(&board, 0, 0, reveal).tone, Tone::Blue);
        assert_eq!(track_glyph(&board, 0, 5, reveal).tone, Tone::White);
    }

    #[test]
    fn symbols_match_transposed_layout() {
        assert_eq!(Icon::Bar.symbol(), '-');
        assert_eq!(Icon::Dash.symbol(), '|');
        assert_eq!(Icon::Space.symbol(), ' ');
    }
}
