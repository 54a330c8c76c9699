//! Rung bitmap generation under the coherence cap.
use thiserror::Error;

use crate::board::RailId;
use crate::config::{BoardConfig, ConfigError};
use crate::constants::{BAR_COUNT, BarMask, LOG_RAIL_REDRAW, RAIL_COUNT};
use crate::numbers::usize_to_f32;
use crate::rng::RngBundle;

/// Local density of a rail's active rungs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coherence {
    /// Fewer than two active rungs; treated as infinitely dense and never
    /// below any cap.
    Unbounded,
    /// Sum of `1 / gap` over every pair of neighbouring active rungs.
    Finite(f32),
}

impl Coherence {
    /// Whether this coherence lies strictly under `cap`.
    #[must_use]
    pub fn is_below(self, cap: f32) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Finite(value) => value < cap,
        }
    }
}

/// Coherence of one rung bitmap.
#[must_use]
pub fn coherence(bars: BarMask) -> Coherence {
    if bars.count_ones() < 2 {
        return Coherence::Unbounded;
    }
    let mut total = 0.0_f32;
    let mut previous: Option<usize> = None;
    for bar in (0..BAR_COUNT).filter(|bar| bars & (1 << bar) != 0) {
        if let Some(prev) = previous {
            total += 1.0 / usize_to_f32(bar - prev);
        }
        previous = Some(bar);
    }
    Coherence::Finite(total)
}

/// Errors raised while building a puzzle.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    #[error(
        "rail {rail} exceeded {attempts} redraws; bar probability and coherence cap are infeasible"
    )]
    RailBudgetExceeded { rail: RailId, attempts: u32 },
    #[error("no solvable puzzle after {attempts} layouts")]
    LayoutBudgetExceeded { attempts: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Draw one rail's bitmap, redrawing until it satisfies the coherence cap.
///
/// # Errors
///
/// Returns [`GenerationError::RailBudgetExceeded`] when no acceptable bitmap
/// appears within `cfg.generation_attempt_limit` draws.
pub fn generate_rail(
    rail: RailId,
    rng: &RngBundle,
    cfg: &BoardConfig,
) -> Result<BarMask, GenerationError> {
    let mut stream = rng.layout();
    for attempt in 1..=cfg.generation_attempt_limit {
        let mut bars: BarMask = 0;
        for bar in 0..BAR_COUNT {
            if stream.chance(cfg.rail_bar_probability) {
                bars |= 1 << bar;
            }
        }
        if coherence(bars).is_below(cfg.maximum_coherence) {
            if attempt > 1 {
                log::debug!(
                    target: LOG_RAIL_REDRAW,
                    "rail {rail} accepted after {attempt} draws"
                );
            }
            return Ok(bars);
        }
    }
    Err(GenerationError::RailBudgetExceeded {
        rail,
        attempts: cfg.generation_attempt_limit,
    })
}

/// Draw every rail's bitmap in rail order.
///
/// # Errors
///
/// Propagates the first rail that exhausts its redraw budget.
pub fn generate_rails(
    rng: &RngBundle,
    cfg: &BoardConfig,
) -> Result<[BarMask; RAIL_COUNT], GenerationError> {
    let mut rails = [0; RAIL_COUNT];
    for (rail, bars) in rails.iter_mut().enumerate() {
        *bars = generate_rail(rail, rng, cfg)?;
    }
    Ok(rails)
}
