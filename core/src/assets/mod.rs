//! External asset generation interface
//!
//! The generative backend (prompt -> image / structured JSON) is an opaque
//! external collaborator. The core only defines the contract, validates
//! payloads, and adapts raw sprites for the renderer.

pub mod orientation;
pub mod placeholder;
pub mod upload;

use image::RgbaImage;
use serde::Deserialize;

use crate::combat::MoveSpec;
use crate::error::{JobError, JobResult};

/// Structured identity payload the backend must return for one combatant.
/// Deserialization enforces the required fields; anything missing or
/// malformed fails the job.
#[derive(Debug, Clone, Deserialize)]
pub struct CombatantIdentity {
    pub name: String,
    /// One-line flavor text, used in upload metadata.
    pub flavor: String,
    pub moves: [MoveSpec; 2],
}

/// The generative asset service. Calls block the whole job until they
/// return; failures are fatal to the job and never retried inline.
pub trait AssetBackend: Send + Sync {
    /// Generate an image for `prompt` at `size` pixels (square for
    /// sprites). Must fail rather than return an empty payload.
    fn generate_image(&self, prompt: &str, size: u32, transparent: bool) -> JobResult<Vec<u8>>;

    /// Generate the structured identity payload for `prompt`.
    fn generate_structured(&self, prompt: &str) -> JobResult<CombatantIdentity>;
}

/// Validate a raw JSON identity payload.
pub fn parse_identity(json: &str) -> JobResult<CombatantIdentity> {
    let identity: CombatantIdentity = serde_json::from_str(json)
        .map_err(|e| JobError::AssetGeneration(format!("identity payload: {e}")))?;
    if identity.name.trim().is_empty() {
        return Err(JobError::AssetGeneration("identity payload: empty name".into()));
    }
    Ok(identity)
}

/// Decode backend image bytes, rejecting empty payloads.
pub fn decode_sprite(bytes: &[u8]) -> JobResult<RgbaImage> {
    if bytes.is_empty() {
        return Err(JobError::AssetGeneration("empty image payload".into()));
    }
    let img = image::load_from_memory(bytes)
        .map_err(|e| JobError::AssetGeneration(format!("undecodable image payload: {e}")))?;
    Ok(img.to_rgba8())
}

/// Scale a sprite to fit a `size` x `size` square, preserving aspect ratio
/// and centering on a transparent canvas.
pub fn fit_square(img: &RgbaImage, size: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let scale = (size as f32 / w as f32).min(size as f32 / h as f32);
    let sw = ((w as f32 * scale) as u32).max(1);
    let sh = ((h as f32 * scale) as u32).max(1);
    let scaled = image::imageops::resize(img, sw, sh, image::imageops::FilterType::Triangle);
    let mut out = RgbaImage::from_pixel(size, size, image::Rgba([0, 0, 0, 0]));
    image::imageops::overlay(
        &mut out,
        &scaled,
        ((size - sw) / 2) as i64,
        ((size - sh) / 2) as i64,
    );
    out
}
