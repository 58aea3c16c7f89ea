//! Duelreel Core - Battle video pipeline
//!
//! This crate turns two seed strings into a rendered duel: procedurally
//! derived combatants fight a turn-based battle, the outcome is choreographed
//! into fixed-rate frame instructions, frames are composited to PNG, and a
//! procedural soundtrack is synthesized and mixed sample-accurately against
//! the animation's cue timeline.
//!
//! # Architecture
//!
//! - [`combat`] - Stats, moves, damage, and the battle state machine
//! - [`anim`] - Easing, choreography sequencing, frame rendering
//! - [`audio`] - Cue timeline, synthesizers, resampling mixer
//! - [`assets`] - Generative-backend contract, sprite fix-up, upload hand-off
//! - [`pipeline`] - End-to-end job orchestration

pub mod anim;
pub mod assets;
pub mod audio;
pub mod combat;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod rng;

pub use config::{AnimTiming, AudioConfig, PipelineConfig};
pub use error::{JobError, JobResult};
pub use pipeline::{run_job, JobOutput, JobSpec};

// Re-export the pieces the CLI and external backends wire together.
pub use anim::renderer::{NullTextPainter, TextPainter};
pub use assets::placeholder::PlaceholderBackend;
pub use assets::upload::{CredentialStore, UploadBackend, UploadMetadata};
pub use assets::AssetBackend;
