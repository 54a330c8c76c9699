//! Raw terminal handling and key mapping.
use std::io::{self, Write};

use amidakuji_game::InputEvent;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{ExecutableCommand, QueueableCommand};

/// What a key press asks of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(InputEvent),
    /// Raw mode swallows Ctrl-C, so quitting needs its own key.
    Quit,
}

/// Map a key event to a command; releases and unbound keys map to `None`.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    let event = match key.code {
        KeyCode::Right | KeyCode::Char('l' | 'd') => InputEvent::NextRail,
        KeyCode::Left | KeyCode::Char('h' | 'a') => InputEvent::PreviousRail,
        KeyCode::Up | KeyCode::Char('k' | 'w') => InputEvent::Raise,
        KeyCode::Down | KeyCode::Char('j' | 's') => InputEvent::Lower,
        KeyCode::Char('r') => InputEvent::Refresh,
        KeyCode::Esc | KeyCode::Char('q') => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Game(event))
}

/// Keeps the terminal in raw mode with a hidden cursor until dropped.
pub struct RawModeGuard;

impl RawModeGuard {
    /// # Errors
    ///
    /// Returns an error if the terminal refuses raw mode.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        io::stdout().execute(Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = io::stdout().execute(Show);
        if let Err(err) = terminal::disable_raw_mode() {
            log::warn!("failed to restore terminal mode: {err}");
        }
    }
}

/// Clear the screen and home the cursor, then write `frame`.
///
/// # Errors
///
/// Propagates terminal write failures.
pub fn present(out: &mut impl Write, frame: &str) -> io::Result<()> {
    out.queue(Clear(ClearType::All))?;
    out.queue(MoveTo(0, 0))?;
    out.write_all(frame.as_bytes())?;
    out.flush()
}
