//! Frame composition: colored board grid plus the status panel.
use std::fmt::Write as _;

use amidakuji_game::numbers::usize_to_f32;
use amidakuji_game::{
    CHECKPOINT_COUNT, Game, Glyph, RenderGrid, RenderOptions, RowKind, Tone, render_grid,
};
use colored::{ColoredString, Colorize};

const LINE_END: &str = "\r\n";
const PROGRESS_WIDTH: usize = 20;

fn paint(glyph: Glyph) -> ColoredString {
    let symbol = glyph.icon.symbol().to_string();
    match glyph.tone {
        Tone::White => symbol.white(),
        Tone::Red => symbol.red().bold(),
        Tone::Green => symbol.green().bold(),
        Tone::Blue => symbol.blue().bold(),
    }
}

/// Compose one full frame. `debug` adds the clock, physical offsets and the
/// reference-path highlight.
#[must_use]
pub fn compose_frame(game: &Game, elapsed_secs: u64, debug: bool) -> String {
    let options = RenderOptions {
        highlight_reference: debug,
    };
    let grid = render_grid(game.board(), options);
    let board = game.board();
    let mut frame = String::new();

    for (row, glyphs) in grid.rows().iter().enumerate() {
        let label = match RenderGrid::row_kind(row) {
            RowKind::Track(track) if track == board.start_track && track == board.end_track => {
                format!("S{track}E")
            }
            RowKind::Track(track) if track == board.start_track => format!("S{track} "),
            RowKind::Track(track) if track == board.end_track => format!(" {track}E"),
            RowKind::Track(track) => format!(" {track} "),
            RowKind::Rail(rail) if rail == game.selected_rail() => ">> ".to_string(),
            RowKind::Rail(_) => "   ".to_string(),
        };
        frame.push_str(&label);
        for glyph in glyphs {
            let _ = write!(frame, "{}", paint(*glyph));
        }
        frame.push_str(LINE_END);
    }

    frame.push_str(LINE_END);
    let score = game.score();
    let _ = write!(
        frame,
        "rail {}  offsets {:?}{LINE_END}",
        game.selected_rail(),
        game.live_offsets()
    );
    let _ = write!(
        frame,
        "checkpoints {}/{CHECKPOINT_COUNT}  progress {}{LINE_END}",
        score.achieved,
        progress_bar(score.progress)
    );
    if debug {
        let _ = write!(
            frame,
            "{} {elapsed_secs}s  physical {:.1?}  regenerations {}{LINE_END}",
            "[debug]".dimmed(),
            game.physical_offsets(),
            game.regenerations()
        );
    }
    frame
}

fn progress_bar(progress: f32) -> String {
    let filled = (0..PROGRESS_WIDTH)
        .take_while(|cell| progress * usize_to_f32(PROGRESS_WIDTH) >= usize_to_f32(cell + 1))
        .count();
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(PROGRESS_WIDTH - filled),
        progress * 100.0
    )
}

/// Static instructions shown before the game starts.
#[must_use]
pub fn usage_text() -> String {
    [
        "Slide the rails so the token travels from S to E,".to_string(),
        "crossing every green checkpoint on the way.".to_string(),
        "Red checkpoints reshuffle the checkpoints when crossed.".to_string(),
        String::new(),
        format!("  {}  select rail", "left/right, h/l".bold()),
        format!("  {}     slide rail", "up/down, k/j".bold()),
        format!("  {}              redraw", "r".bold()),
        format!("  {}       quit", "q, Esc, ^C".bold()),
    ]
    .join("\n")
}
