//! Player input: rail selection and physical-to-logical offset mapping.
use serde::{Deserialize, Serialize};

use crate::board::{Offsets, RailId};
use crate::config::BoardConfig;
use crate::constants::{BAR_COUNT, MAXIMUM_OFFSET, RAIL_COUNT};
use crate::numbers::{floor_f32_to_usize, usize_to_f32};

/// Logical input events the front-end delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    NextRail,
    PreviousRail,
    /// Slide the selected rail one step further along the board.
    Raise,
    /// Slide the selected rail one step back toward zero.
    Lower,
    /// Force a redraw; no state change.
    Refresh,
}

/// Selected rail plus the continuous offset of every rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub selected: RailId,
    pub physical: [f32; RAIL_COUNT],
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            selected: 0,
            physical: [0.0; RAIL_COUNT],
        }
    }
}

impl InputState {
    /// Apply `event`; returns whether any rail offset changed.
    pub fn apply(&mut self, event: InputEvent, cfg: &BoardConfig) -> bool {
        match event {
            InputEvent::NextRail => {
                self.selected = (self.selected + 1).min(RAIL_COUNT - 1);
                false
            }
            InputEvent::PreviousRail => {
                self.selected = self.selected.saturating_sub(1);
                false
            }
            InputEvent::Raise => self.nudge(cfg.physical_step, cfg),
            InputEvent::Lower => self.nudge(-cfg.physical_step, cfg),
            InputEvent::Refresh => false,
        }
    }

    fn nudge(&mut self, delta: f32, cfg: &BoardConfig) -> bool {
        let before = self.logical(cfg);
        let slot = &mut self.physical[self.selected];
        *slot = (*slot + delta).clamp(0.0, cfg.maximum_physical_offset);
        self.logical(cfg) != before
    }

    /// Logical offset of every rail.
    #[must_use]
    pub fn logical(&self, cfg: &BoardConfig) -> Offsets {
        self.physical.map(|physical| logical_offset(physical, cfg))
    }
}

/// Map a physical offset onto `0..=MAXIMUM_OFFSET`.
#[must_use]
pub fn logical_offset(physical: f32, cfg: &BoardConfig) -> usize {
    let per_bar = cfg.maximum_physical_offset / usize_to_f32(BAR_COUNT);
    floor_f32_to_usize(physical / per_bar).min(MAXIMUM_OFFSET)
}
