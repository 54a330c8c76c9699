//! Board tuning configuration and strategy selection.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CHECKPOINT_COUNT, GENERATION_ATTEMPT_LIMIT, LAYOUT_ATTEMPT_LIMIT, MAXIMUM_COHERENCE,
    MAXIMUM_PHYSICAL_OFFSET, PHYSICAL_STEP, POSITION_COUNT, RAIL_BAR_PROBABILITY,
    SCATTER_PROBABILITY, SOLVER_ATTEMPT_LIMIT, TRIGGER_PROBABILITY,
};

const DEFAULT_BOARD_DATA: &str = include_str!("../assets/board.json");

/// How checkpoints are laid out on the tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointPolicy {
    /// Exactly [`CHECKPOINT_COUNT`] checkpoints stamped along the reference path.
    #[default]
    SingleSet,
    /// Every track position independently becomes a checkpoint.
    ///
    /// No solvability guarantee: the scattered set may not contain a route
    /// through enough checkpoints to finish.
    Scattered,
}

/// How the live path's progress fraction is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPolicy {
    /// Headway through the current checkpoint window, anchored at the last
    /// checkpoint matched in order.
    #[default]
    CheckpointWindow,
    /// Fraction of all checkpoints crossed by the live path.
    CheckpointRatio,
}

/// Errors raised when board configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between {min:.3} and {max:.3} (got {value:.3})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
    #[error("board of {positions} positions cannot space {checkpoints} checkpoints")]
    SpacingTooSmall { positions: usize, checkpoints: usize },
}

/// Tuning values for puzzle generation, checkpoints and input mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "BoardConfig::default_rail_bar_probability")]
    pub rail_bar_probability: f32,
    #[serde(default = "BoardConfig::default_maximum_coherence")]
    pub maximum_coherence: f32,
    #[serde(default = "BoardConfig::default_generation_attempt_limit")]
    pub generation_attempt_limit: u32,
    #[serde(default = "BoardConfig::default_solver_attempt_limit")]
    pub solver_attempt_limit: u32,
    #[serde(default = "BoardConfig::default_layout_attempt_limit")]
    pub layout_attempt_limit: u32,
    #[serde(default = "BoardConfig::default_trigger_probability")]
    pub trigger_probability: f32,
    #[serde(default = "BoardConfig::default_scatter_probability")]
    pub scatter_probability: f32,
    /// Regenerate checkpoints every this many seconds; disabled when `None`.
    #[serde(default)]
    pub time_trigger_secs: Option<u64>,
    #[serde(default)]
    pub checkpoint_policy: CheckpointPolicy,
    #[serde(default)]
    pub progress_policy: ProgressPolicy,
    #[serde(default = "BoardConfig::default_physical_step")]
    pub physical_step: f32,
    #[serde(default = "BoardConfig::default_maximum_physical_offset")]
    pub maximum_physical_offset: f32,
}

impl BoardConfig {
    const fn default_rail_bar_probability() -> f32 {
        RAIL_BAR_PROBABILITY
    }

    const fn default_maximum_coherence() -> f32 {
        MAXIMUM_COHERENCE
    }

    const fn default_generation_attempt_limit() -> u32 {
        GENERATION_ATTEMPT_LIMIT
    }

    const fn default_solver_attempt_limit() -> u32 {
        SOLVER_ATTEMPT_LIMIT
    }

    const fn default_layout_attempt_limit() -> u32 {
        LAYOUT_ATTEMPT_LIMIT
    }

    const fn default_trigger_probability() -> f32 {
        TRIGGER_PROBABILITY
    }

    const fn default_scatter_probability() -> f32 {
        SCATTER_PROBABILITY
    }

    const fn default_physical_step() -> f32 {
        PHYSICAL_STEP
    }

    const fn default_maximum_physical_offset() -> f32 {
        MAXIMUM_PHYSICAL_OFFSET
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_BOARD_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_config() -> Self {
        Self::load_from_static()
    }

    /// Distance in positions between consecutive checkpoints.
    ///
    /// One position is held back so the last checkpoint never lands on the
    /// board's final position.
    #[must_use]
    pub const fn checkpoint_spacing() -> usize {
        (POSITION_COUNT - 1) / CHECKPOINT_COUNT
    }

    /// Validate probability ranges, caps and attempt limits.
    ///
    /// # Errors
    ///
    /// Returns the first invariant the configuration violates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_probability("rail_bar_probability", self.rail_bar_probability)?;
        validate_probability("trigger_probability", self.trigger_probability)?;
        validate_probability("scatter_probability", self.scatter_probability)?;
        if !(self.maximum_coherence > 0.0 && self.maximum_coherence.is_finite()) {
            return Err(ConfigError::RangeViolation {
                field: "maximum_coherence",
                min: f32::MIN_POSITIVE,
                max: f32::MAX,
                value: self.maximum_coherence,
            });
        }
        if self.generation_attempt_limit == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "generation_attempt_limit",
            });
        }
        if self.solver_attempt_limit == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "solver_attempt_limit",
            });
        }
        if self.layout_attempt_limit == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "layout_attempt_limit",
            });
        }
        if self.time_trigger_secs == Some(0) {
            return Err(ConfigError::ZeroLimit {
                field: "time_trigger_secs",
            });
        }
        if !(self.maximum_physical_offset > 0.0 && self.maximum_physical_offset.is_finite()) {
            return Err(ConfigError::RangeViolation {
                field: "maximum_physical_offset",
                min: f32::MIN_POSITIVE,
                max: f32::MAX,
                value: self.maximum_physical_offset,
            });
        }
        if !(self.physical_step > 0.0 && self.physical_step <= self.maximum_physical_offset) {
            return Err(ConfigError::RangeViolation {
                field: "physical_step",
                min: f32::MIN_POSITIVE,
                max: self.maximum_physical_offset,
                value: self.physical_step,
            });
        }
        if Self::checkpoint_spacing() == 0 {
            return Err(ConfigError::SpacingTooSmall {
                positions: POSITION_COUNT,
                checkpoints: CHECKPOINT_COUNT,
            });
        }
        Ok(())
    }
}

fn validate_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        });
    }
    Ok(())
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rail_bar_probability: Self::default_rail_bar_probability(),
            maximum_coherence: Self::default_maximum_coherence(),
            generation_attempt_limit: Self::default_generation_attempt_limit(),
            solver_attempt_limit: Self::default_solver_attempt_limit(),
            layout_attempt_limit: Self::default_layout_attempt_limit(),
            trigger_probability: Self::default_trigger_probability(),
            scatter_probability: Self::default_scatter_probability(),
            time_trigger_secs: None,
            checkpoint_policy: CheckpointPolicy::default(),
            progress_policy: ProgressPolicy::default(),
            physical_step: Self::default_physical_step(),
            maximum_physical_offset: Self::default_maximum_physical_offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_config_matches_defaults() {
        let cfg = BoardConfig::load_from_static();
        let defaults = BoardConfig::default();
        assert!((cfg.rail_bar_probability - defaults.rail_bar_probability).abs() < 1e-6);
        assert!((cfg.maximum_coherence - defaults.maximum_coherence).abs() < 1e-6);
        assert!((cfg.trigger_probability - defaults.trigger_probability).abs() < 1e-6);
        assert!((cfg.physical_step - defaults.physical_step).abs() < 1e-6);
        assert_eq!(cfg.generation_attempt_limit, defaults.generation_attempt_limit);
        assert_eq!(cfg.time_trigger_secs, None);
        assert_eq!(cfg.checkpoint_policy, CheckpointPolicy::SingleSet);
        assert_eq!(cfg.progress_policy, ProgressPolicy::CheckpointWindow);
        assert!(BoardConfig::default_config().validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: BoardConfig =
            serde_json::from_str(r#"{ "progress_policy": "checkpoint_ratio" }"#).unwrap();
        assert_eq!(cfg.progress_policy, ProgressPolicy::CheckpointRatio);
        assert_eq!(cfg.checkpoint_policy, CheckpointPolicy::SingleSet);
        assert!((cfg.maximum_coherence - MAXIMUM_COHERENCE).abs() < f32::EPSILON);
    }

    #[test]
    fn spacing_keeps_last_checkpoint_off_final_position() {
        let spacing = BoardConfig::checkpoint_spacing();
        assert_eq!(spacing, 7);
        assert!(spacing * CHECKPOINT_COUNT < POSITION_COUNT);
        assert!(spacing * (CHECKPOINT_COUNT + 1) >= POSITION_COUNT);
    }

    #[test]
    fn validate_rejects_out_of_range_probability() {
        let cfg = BoardConfig {
            trigger_probability: 1.5,
            ..BoardConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "trigger_probability",
                min: 0.0,
                max: 1.0,
                value: 1.5,
            })
        );
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let cfg = BoardConfig {
            solver_attempt_limit: 0,
            ..BoardConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroLimit {
                field: "solver_attempt_limit"
            })
        );
        let cfg = BoardConfig {
            time_trigger_secs: Some(0),
            ..BoardConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_coherence_cap() {
        let cfg = BoardConfig {
            maximum_coherence: 0.0,
            ..BoardConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RangeViolation {
                field: "maximum_coherence",
                ..
            })
        ));
    }
}
