//! Offline placeholder backend
//!
//! A procedural stand-in for the generative service: flat-shaded creature
//! sprites and a gradient backdrop, with identities derived from the
//! prompt hash. Lets the whole pipeline run (and be tested) without a
//! remote backend; real deployments swap in a service-backed
//! [`AssetBackend`](super::AssetBackend).

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use xxhash_rust::xxh3::xxh3_64;

use crate::combat::moves::{MoveSpec, ACCURACY_MAX, ACCURACY_MIN, POWER_MAX, POWER_MIN};
use crate::combat::types::Element;
use crate::combat::Category;
use crate::error::{JobError, JobResult};

use super::{AssetBackend, CombatantIdentity};

const NAME_HEADS: &[&str] = &[
    "Cinder", "Brack", "Vol", "Umbra", "Gale", "Thorn", "Frost", "Ember", "Mire", "Sol",
];
const NAME_TAILS: &[&str] = &[
    "maw", "wing", "fang", "hide", "claw", "tail", "horn", "shade", "pelt", "gaze",
];
const MOVE_HEADS: &[&str] = &[
    "Ember", "Tidal", "Stone", "Static", "Hollow", "Glacial", "Verdant", "Feral",
];
const MOVE_TAILS: &[&str] = &[
    "Fang", "Burst", "Lance", "Veil", "Crash", "Howl", "Coil", "Spike",
];

/// Procedural asset backend keyed entirely off prompt hashes, so repeated
/// prompts yield repeated assets.
pub struct PlaceholderBackend;

fn prompt_rng(prompt: &str) -> Pcg32 {
    Pcg32::seed_from_u64(xxh3_64(prompt.as_bytes()))
}

impl AssetBackend for PlaceholderBackend {
    fn generate_image(&self, prompt: &str, size: u32, transparent: bool) -> JobResult<Vec<u8>> {
        let mut rng = prompt_rng(prompt);
        let img = if transparent {
            creature_sprite(size, &mut rng)
        } else {
            backdrop(size, size * 9 / 16, &mut rng)
        };
        encode_png(&img)
    }

    fn generate_structured(&self, prompt: &str) -> JobResult<CombatantIdentity> {
        let mut rng = prompt_rng(prompt);
        let name = format!(
            "{}{}",
            NAME_HEADS.choose(&mut rng).unwrap(),
            NAME_TAILS.choose(&mut rng).unwrap()
        );
        let roll_move = |rng: &mut Pcg32| {
            let element = *Element::ALL.as_slice().choose(rng).unwrap();
            MoveSpec {
                name: format!(
                    "{} {}",
                    MOVE_HEADS.choose(rng).unwrap(),
                    MOVE_TAILS.choose(rng).unwrap()
                ),
                element,
                category: if rng.random_range(0..2) == 0 {
                    Category::Physical
                } else {
                    Category::Special
                },
                power: rng.random_range(POWER_MIN..=POWER_MAX),
                accuracy: rng.random_range(ACCURACY_MIN..=ACCURACY_MAX),
            }
        };
        let moves = [roll_move(&mut rng), roll_move(&mut rng)];
        Ok(CombatantIdentity {
            flavor: format!("{name}, conjured from the seed \"{prompt}\"."),
            name,
            moves,
        })
    }
}

fn encode_png(img: &RgbaImage) -> JobResult<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| JobError::AssetGeneration(format!("png encode: {e}")))?;
    Ok(bytes)
}

/// Flat-shaded creature: body ellipse, offset head, single eye. The head
/// offset gives the sprite an unambiguous facing for the orientation
/// adapter.
fn creature_sprite(size: u32, rng: &mut Pcg32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let body = [
        rng.random_range(60..220),
        rng.random_range(60..220),
        rng.random_range(60..220),
        255,
    ];
    let s = size as f32;
    let (bx, by, brx, bry) = (s * 0.42, s * 0.62, s * 0.34, s * 0.26);
    let (hx, hy, hr) = (s * 0.68, s * 0.38, s * 0.18);

    for (x, y, px) in img.enumerate_pixels_mut() {
        let (xf, yf) = (x as f32, y as f32);
        let in_body =
            ((xf - bx) / brx).powi(2) + ((yf - by) / bry).powi(2) <= 1.0;
        let in_head = (xf - hx).powi(2) + (yf - hy).powi(2) <= hr * hr;
        if in_body || in_head {
            *px = Rgba(body);
        }
        let eye = (xf - (hx + hr * 0.35)).powi(2) + (yf - hy).powi(2) <= (hr * 0.18).powi(2);
        if eye {
            *px = Rgba([20, 20, 24, 255]);
        }
    }
    img
}

/// Vertical sky gradient with a darker ground band.
fn backdrop(width: u32, height: u32, rng: &mut Pcg32) -> RgbaImage {
    let top = [
        rng.random_range(30..90),
        rng.random_range(40..110),
        rng.random_range(80..160),
    ];
    let bottom = [
        rng.random_range(120..200),
        rng.random_range(100..180),
        rng.random_range(120..220),
    ];
    let ground_y = height * 4 / 5;
    let mut img = RgbaImage::new(width, height.max(1));
    for (_, y, px) in img.enumerate_pixels_mut() {
        if y >= ground_y {
            *px = Rgba([58, 72, 48, 255]);
        } else {
            let t = y as f32 / ground_y.max(1) as f32;
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
            *px = Rgba([
                mix(top[0], bottom[0]),
                mix(top[1], bottom[1]),
                mix(top[2], bottom[2]),
                255,
            ]);
        }
    }
    img
}

/// Effect sprite for a move element: a soft-edged tinted orb. Effect art is
/// always procedural, even with a real generative backend.
pub fn effect_sprite(element: Element, size: u32) -> RgbaImage {
    let color = element.color();
    let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let c = size as f32 / 2.0;
    let r = c * 0.9;
    for (x, y, px) in img.enumerate_pixels_mut() {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
        if d <= r {
            let fade = 1.0 - (d / r).powi(2);
            *px = Rgba([color[0], color[1], color[2], (fade * 255.0) as u8]);
        }
    }
    img
}
