//! Audio: cue timeline, procedural synthesis, and mixing
//!
//! The sequencer records frame-indexed cues; the synthesizers produce
//! stereo buffers at their native rates; the mixer resamples everything to
//! one rate, loops the bed for the full job duration, and places each cue
//! at its sample-accurate offset.

pub mod buffer;
pub mod cue;
pub mod mixer;
pub mod osc;
pub mod synth;

pub use buffer::StereoBuffer;
pub use cue::{Cue, CueKind, CueTimeline};
pub use mixer::{mix, resample, write_wav, CuePalette};
pub use synth::{bed_track, call_effect, hit_effect, miss_effect};
