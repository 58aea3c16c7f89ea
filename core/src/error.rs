//! Job-level error types
//!
//! A job is a single battle-to-video pipeline run. Every fallible stage maps
//! into [`JobError`]; the outer scheduler logs a failed job and moves on to
//! the next scheduled run (no retry, no partial resume).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    /// The asset backend returned a missing, empty, or malformed payload.
    /// Fatal to the current job; never retried inline.
    #[error("asset generation failed: {0}")]
    AssetGeneration(String),

    /// An optional external credential or setting is absent. Disables only
    /// the dependent stage (e.g. upload); rendering and mixing proceed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Filesystem write failure. Fatal, aborts the job.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encode/decode failure from the image pipeline. Fatal.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// WAV export failure. Fatal.
    #[error("audio write error: {0}")]
    AudioWrite(#[from] hound::Error),

    /// The duel crossed the defensive turn cap without a faint. Unreachable
    /// for accuracy >= 50 and minimum damage 1, but guards the loop if the
    /// accuracy bounds are ever relaxed.
    #[error("battle exceeded {0} turns without a faint")]
    BattleStalled(u32),
}

pub type JobResult<T> = Result<T, JobError>;
