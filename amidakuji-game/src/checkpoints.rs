//! Checkpoint placement and trigger thinning.
use crate::board::{Board, OffsetSource};
use crate::config::{BoardConfig, CheckpointPolicy};
use crate::constants::{POSITION_COUNT, PositionMask};
use crate::rng::RngBundle;
use crate::tracer::PathWalker;

/// Rebuild every checkpoint and trigger bit according to `cfg.checkpoint_policy`.
///
/// Prior bits are always cleared first; this is never an incremental update.
pub fn place_checkpoints(board: &mut Board, rng: &RngBundle, cfg: &BoardConfig) {
    board.clear_checkpoints();
    match cfg.checkpoint_policy {
        CheckpointPolicy::SingleSet => stamp_reference_checkpoints(board),
        CheckpointPolicy::Scattered => scatter_checkpoints(board, rng, cfg.scatter_probability),
    }
    thin_triggers(board, rng, cfg.trigger_probability);
}

/// Replay the reference offsets and mark each spacing multiple on the track
/// the reference traversal occupies there.
pub fn stamp_reference_checkpoints(board: &mut Board) {
    let spacing = BoardConfig::checkpoint_spacing();
    let mut walker = PathWalker::on_board(board, OffsetSource::Reference);
    while walker.position() < POSITION_COUNT {
        let track = walker.step();
        let position = walker.position();
        if position % spacing == 0 && position < POSITION_COUNT {
            board.tracks[track].set_checkpoint(position);
        }
    }
}

/// Mark every (track, position) cell independently with `probability`.
pub fn scatter_checkpoints(board: &mut Board, rng: &RngBundle, probability: f32) {
    let mut stream = rng.checkpoint();
    for track in &mut board.tracks {
        for position in 0..POSITION_COUNT {
            if stream.chance(probability) {
                track.set_checkpoint(position);
            }
        }
    }
}

/// Resample triggers as an independent thinning of the current checkpoints.
pub fn thin_triggers(board: &mut Board, rng: &RngBundle, probability: f32) {
    let mut stream = rng.checkpoint();
    for track in &mut board.tracks {
        let mut triggers: PositionMask = 0;
        for position in (0..POSITION_COUNT).filter(|p| track.has_checkpoint(*p)) {
            if stream.chance(probability) {
                triggers |= 1 << position;
            }
        }
        track.trigger_checkpoints = triggers & track.checkpoints;
    }
}
