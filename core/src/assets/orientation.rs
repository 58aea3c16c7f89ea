//! Sprite facing fix-up
//!
//! Generated sprites sometimes come out facing the wrong way. This adapter
//! sits between the backend and the renderer: it estimates facing from the
//! opaque-pixel density of the two horizontal halves and mirrors the image
//! when the estimate disagrees with the side's required facing. A
//! generation-imperfection workaround, not core logic.

use image::RgbaImage;

/// Required facing: side A faces right, side B faces left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Opaque-pixel counts of the left and right halves.
fn half_densities(img: &RgbaImage) -> (u64, u64) {
    let (w, _) = img.dimensions();
    let mid = w / 2;
    let mut left = 0u64;
    let mut right = 0u64;
    for (x, _, px) in img.enumerate_pixels() {
        if px[3] > 32 {
            if x < mid {
                left += 1;
            } else {
                right += 1;
            }
        }
    }
    (left, right)
}

/// Estimate which way the sprite faces. Creature sprites taper toward the
/// head, so the sparser half is treated as the facing side. Returns `None`
/// when the halves are too balanced to call.
pub fn detect_facing(img: &RgbaImage) -> Option<Facing> {
    let (left, right) = half_densities(img);
    let total = left + right;
    if total == 0 {
        return None;
    }
    // Within 4% of balanced: ambiguous, leave the sprite alone.
    let diff = left.abs_diff(right);
    if diff * 25 < total {
        return None;
    }
    Some(if left < right {
        Facing::Left
    } else {
        Facing::Right
    })
}

/// Mirror the sprite if its detected facing disagrees with `required`.
pub fn ensure_facing(img: RgbaImage, required: Facing) -> RgbaImage {
    match detect_facing(&img) {
        Some(actual) if actual != required => image::imageops::flip_horizontal(&img),
        _ => img,
    }
}
