//! Amidakuji Puzzle Engine
//!
//! Platform-agnostic core for the ghost-leg sliding-rail puzzle: rung
//! generation, path tracing, the reference solver, checkpoint placement and
//! scoring. This crate performs no terminal I/O.

pub mod board;
pub mod checkpoints;
pub mod config;
pub mod constants;
pub mod game;
pub mod generator;
pub mod input;
pub mod numbers;
pub mod render;
pub mod rng;
pub mod scoring;
pub mod shared;
pub mod solver;
pub mod tracer;

// Re-export commonly used types
pub use board::{Board, OffsetSource, Offsets, Rail, RailId, Track, TrackId, TrackPath};
pub use checkpoints::{
    place_checkpoints, scatter_checkpoints, stamp_reference_checkpoints, thin_triggers,
};
pub use config::{BoardConfig, CheckpointPolicy, ConfigError, ProgressPolicy};
pub use constants::{
    BAR_COUNT, BarMask, CHECKPOINT_COUNT, MAXIMUM_OFFSET, POSITION_COUNT, PositionMask,
    RAIL_COUNT, TRACK_COUNT, debug_enabled,
};
pub use game::{Game, GamePhase, RegenerationCause, TickOutcome};
pub use generator::{Coherence, GenerationError, coherence, generate_rail, generate_rails};
pub use input::{InputEvent, InputState, logical_offset};
pub use render::{GRID_ROWS, Glyph, Icon, RenderGrid, RenderOptions, RowKind, Tone, render_grid};
pub use rng::{CountingRng, RngBundle};
pub use scoring::{Score, score};
pub use shared::SharedGame;
pub use solver::{Solution, SolveError, find_admissible_offsets, solve};
pub use tracer::{PathWalker, Trace, has_rung_slot, trace, trace_board};
