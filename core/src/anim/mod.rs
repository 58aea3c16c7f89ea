//! Animation: easing, choreography sequencing, and frame rendering

pub mod ease;
pub mod renderer;
pub mod sequencer;

pub use renderer::{
    render_frame, write_frames, CombatantSprites, NullTextPainter, SceneAssets, TextPainter,
};
pub use sequencer::{sequence, FrameInstruction, SequencedAnimation, Sequencer};
