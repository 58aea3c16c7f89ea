//! Frame renderer
//!
//! Consumes sequencer instructions and produces one composited image per
//! tick: background, sprites, effect, bars and popup on the working canvas;
//! crop to the camera window; panel and banner in screen space; then scale
//! to the output resolution with aspect preserved, padding the remainder
//! with the averaged border color of the source frame.

use std::collections::HashMap;
use std::path::Path;

use image::{Rgba, RgbaImage};
use tracing::{debug, info};

use crate::combat::{Element, Side};
use crate::config::PipelineConfig;
use crate::error::JobResult;

use super::sequencer::{CropRect, FrameInstruction, Pose, SpriteState};

/// Glyph drawing is an external collaborator; the core only positions text.
/// Implementations rasterize `text` at `(x, y)` (top-left) with the given
/// pixel height and RGBA color.
pub trait TextPainter {
    fn paint(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, height: u32, color: [u8; 4]);
}

/// Painter that draws nothing. Keeps the pipeline runnable when no font
/// stack is wired in.
pub struct NullTextPainter;

impl TextPainter for NullTextPainter {
    fn paint(&self, _: &mut RgbaImage, _: &str, _: i32, _: i32, _: u32, _: [u8; 4]) {}
}

/// Sprite pair for one combatant: base pose and victory pose, pre-scaled to
/// the configured sprite height.
pub struct CombatantSprites {
    pub base: RgbaImage,
    pub alt: RgbaImage,
}

impl CombatantSprites {
    fn for_pose(&self, pose: Pose) -> &RgbaImage {
        match pose {
            Pose::Base => &self.base,
            Pose::Alt => &self.alt,
        }
    }
}

/// Everything the renderer composites. Produced by the asset stage.
pub struct SceneAssets {
    /// Canvas-sized background.
    pub background: RgbaImage,
    pub a: CombatantSprites,
    pub b: CombatantSprites,
    /// Effect sprite per move element.
    pub effects: HashMap<Element, RgbaImage>,
}

/// Composite one instruction into a finished output-resolution frame.
pub fn render_frame(
    cfg: &PipelineConfig,
    assets: &SceneAssets,
    instr: &FrameInstruction,
    painter: &dyn TextPainter,
) -> RgbaImage {
    let mut canvas = assets.background.clone();

    draw_sprite(&mut canvas, assets.a.for_pose(instr.a.pose), &instr.a);
    draw_sprite(&mut canvas, assets.b.for_pose(instr.b.pose), &instr.b);

    if let Some(effect) = &instr.effect {
        if let Some(img) = assets.effects.get(&effect.element) {
            overlay_with_opacity(
                &mut canvas,
                img,
                effect.x as i32 - img.width() as i32 / 2,
                effect.y as i32 - img.height() as i32 / 2,
                1.0,
            );
        }
    }

    draw_bars(cfg, &mut canvas, instr);

    if let Some(popup) = &instr.popup {
        let color = [255, 70, 60, (popup.alpha * 255.0) as u8];
        painter.paint(&mut canvas, &popup.text, popup.x as i32, popup.y as i32, 42, color);
    }

    let mut cropped = crop(&canvas, &instr.camera);

    if let Some(panel) = &instr.panel {
        draw_panel(cfg, &mut cropped, &panel.title, &panel.lines, painter);
    }
    if let Some(banner) = &instr.banner {
        draw_banner(&mut cropped, banner, painter);
    }

    fit_to_output(cfg, &cropped)
}

/// Render every instruction and write a sequential, zero-padded, gapless
/// numbered PNG series into `dir`. Returns the frame count.
pub fn write_frames(
    cfg: &PipelineConfig,
    assets: &SceneAssets,
    frames: &[FrameInstruction],
    painter: &dyn TextPainter,
    dir: &Path,
) -> JobResult<u32> {
    std::fs::create_dir_all(dir)?;
    for instr in frames {
        let frame = render_frame(cfg, assets, instr, painter);
        let path = dir.join(format!("frame_{:06}.png", instr.frame_index));
        frame.save(&path)?;
        if instr.frame_index % 100 == 0 {
            debug!(frame = instr.frame_index, "rendered");
        }
    }
    info!(count = frames.len(), dir = %dir.display(), "frame series written");
    Ok(frames.len() as u32)
}

// ---- compositing primitives ---------------------------------------------

fn draw_sprite(canvas: &mut RgbaImage, img: &RgbaImage, state: &SpriteState) {
    if !state.visible || state.opacity <= 0.0 {
        return;
    }
    overlay_with_opacity(canvas, img, state.x as i32, state.y as i32, state.opacity);
}

/// Source-over blend of `src` onto `canvas` at `(x, y)` with a global
/// opacity multiplier on the source alpha.
pub fn overlay_with_opacity(canvas: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32, opacity: f32) {
    let (cw, ch) = canvas.dimensions();
    for (sx, sy, px) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;
        if dx < 0 || dy < 0 || dx >= cw as i32 || dy >= ch as i32 {
            continue;
        }
        let alpha = px[3] as f32 / 255.0 * opacity.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            continue;
        }
        let dst = canvas.get_pixel_mut(dx as u32, dy as u32);
        for c in 0..3 {
            dst[c] = (px[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha)).round() as u8;
        }
        let da = dst[3] as f32 / 255.0;
        dst[3] = ((alpha + da * (1.0 - alpha)) * 255.0).round() as u8;
    }
}

/// Fill an axis-aligned rectangle with an alpha-blended color.
pub fn fill_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: [u8; 4]) {
    let (cw, ch) = canvas.dimensions();
    let alpha = color[3] as f32 / 255.0;
    for dy in y.max(0)..(y + h as i32).min(ch as i32) {
        for dx in x.max(0)..(x + w as i32).min(cw as i32) {
            let dst = canvas.get_pixel_mut(dx as u32, dy as u32);
            for c in 0..3 {
                dst[c] = (color[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha)).round() as u8;
            }
            dst[3] = 255;
        }
    }
}

/// Crop the canvas to the camera rectangle, clamped to the canvas bounds.
fn crop(canvas: &RgbaImage, rect: &CropRect) -> RgbaImage {
    let (cw, ch) = canvas.dimensions();
    let w = (rect.w.round() as u32).clamp(1, cw);
    let h = (rect.h.round() as u32).clamp(1, ch);
    let x = (rect.x.round().max(0.0) as u32).min(cw - w);
    let y = (rect.y.round().max(0.0) as u32).min(ch - h);
    image::imageops::crop_imm(canvas, x, y, w, h).to_image()
}

fn draw_bars(cfg: &PipelineConfig, canvas: &mut RgbaImage, instr: &FrameInstruction) {
    let size = cfg.sprite_height as f32;
    for side in [Side::A, Side::B] {
        let bar = &instr.bars[side.index()];
        if !bar.visible {
            continue;
        }
        let sprite = match side {
            Side::A => &instr.a,
            Side::B => &instr.b,
        };
        const BAR_W: u32 = 180;
        const BAR_H: u32 = 16;
        let x = (sprite.x + (size - BAR_W as f32) / 2.0) as i32;
        let y = (sprite.y - 36.0) as i32;

        // Backplate, then fill proportional to shown HP.
        fill_rect(canvas, x - 2, y - 2, BAR_W + 4, BAR_H + 4, [20, 20, 24, 220]);
        let frac = (bar.shown_hp / bar.max_hp).clamp(0.0, 1.0);
        let fill = (frac * BAR_W as f32) as u32;
        let color = hp_color(frac);
        if fill > 0 {
            fill_rect(canvas, x, y, fill, BAR_H, color);
        }
    }
}

/// Green above 50%, yellow above 20%, red below.
fn hp_color(frac: f32) -> [u8; 4] {
    if frac > 0.5 {
        [88, 200, 80, 255]
    } else if frac > 0.2 {
        [236, 200, 60, 255]
    } else {
        [224, 68, 54, 255]
    }
}

fn draw_panel(
    cfg: &PipelineConfig,
    cropped: &mut RgbaImage,
    title: &str,
    lines: &[String],
    painter: &dyn TextPainter,
) {
    let (w, h) = cropped.dimensions();
    let panel_h = (cfg.panel_height_frac * h as f32) as u32;
    fill_rect(cropped, 0, 0, w, panel_h, [16, 18, 28, 210]);

    let title_h = (panel_h / 4).max(10);
    let line_h = (panel_h / 8).max(8);
    let margin = (w / 40) as i32;
    painter.paint(cropped, title, margin, margin / 2, title_h, [255, 255, 255, 255]);
    let mut y = margin / 2 + title_h as i32 + 4;
    for line in lines {
        painter.paint(cropped, line, margin, y, line_h, [220, 224, 232, 255]);
        y += line_h as i32 + 2;
    }
}

fn draw_banner(cropped: &mut RgbaImage, text: &str, painter: &dyn TextPainter) {
    let (w, h) = cropped.dimensions();
    let banner_h = h / 7;
    let y = (h / 14) as i32;
    fill_rect(cropped, 0, y, w, banner_h, [16, 18, 28, 225]);
    let text_h = banner_h * 3 / 5;
    // Rough horizontal centering; exact metrics are the painter's concern.
    let x = (w / 2) as i32 - (text.len() as i32 * text_h as i32) / 4;
    painter.paint(cropped, text, x.max(0), y + (banner_h - text_h) as i32 / 2, text_h, [
        255, 228, 120, 255,
    ]);
}

/// Average color of the frame's border pixels, used as letterbox fill so
/// the padding bars blend with the scene.
fn border_average(img: &RgbaImage) -> Rgba<u8> {
    let (w, h) = img.dimensions();
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    let mut add = |px: &Rgba<u8>| {
        for c in 0..3 {
            sum[c] += px[c] as u64;
        }
        count += 1;
    };
    for x in 0..w {
        add(img.get_pixel(x, 0));
        add(img.get_pixel(x, h - 1));
    }
    for y in 1..h.saturating_sub(1) {
        add(img.get_pixel(0, y));
        add(img.get_pixel(w - 1, y));
    }
    if count == 0 {
        return Rgba([0, 0, 0, 255]);
    }
    Rgba([
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
        255,
    ])
}

/// Scale to fit the output resolution preserving aspect ratio; pad the
/// remainder with the averaged border color.
fn fit_to_output(cfg: &PipelineConfig, frame: &RgbaImage) -> RgbaImage {
    let (fw, fh) = frame.dimensions();
    let (ow, oh) = (cfg.output_width, cfg.output_height);

    let scale = (ow as f32 / fw as f32).min(oh as f32 / fh as f32);
    let sw = ((fw as f32 * scale) as u32).max(1);
    let sh = ((fh as f32 * scale) as u32).max(1);

    let scaled = image::imageops::resize(frame, sw, sh, image::imageops::FilterType::Triangle);
    let fill = border_average(frame);

    let mut out = RgbaImage::from_pixel(ow, oh, fill);
    let x = (ow - sw) / 2;
    let y = (oh - sh) / 2;
    image::imageops::overlay(&mut out, &scaled, x as i64, y as i64);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::sequencer::{BarState, CropRect, EffectState};

    fn cfg() -> PipelineConfig {
        PipelineConfig {
            canvas_width: 320,
            canvas_height: 180,
            output_width: 160,
            output_height: 284,
            sprite_height: 64,
            ..PipelineConfig::default()
        }
    }

    fn assets(cfg: &PipelineConfig) -> SceneAssets {
        let solid = |color: [u8; 4], size: u32| RgbaImage::from_pixel(size, size, Rgba(color));
        let pair = |color: [u8; 4]| CombatantSprites {
            base: solid(color, cfg.sprite_height),
            alt: solid(color, cfg.sprite_height),
        };
        let mut effects = HashMap::new();
        effects.insert(Element::Fire, solid([255, 120, 0, 255], 24));
        SceneAssets {
            background: RgbaImage::from_pixel(
                cfg.canvas_width,
                cfg.canvas_height,
                Rgba([40, 44, 60, 255]),
            ),
            a: pair([200, 40, 40, 255]),
            b: pair([40, 40, 200, 255]),
            effects,
        }
    }

    fn instruction(cfg: &PipelineConfig) -> FrameInstruction {
        let sprite = |x: f32| SpriteState {
            x,
            y: 90.0,
            visible: true,
            opacity: 1.0,
            pose: Pose::Base,
        };
        FrameInstruction {
            frame_index: 0,
            a: sprite(20.0),
            b: sprite(230.0),
            effect: Some(EffectState {
                x: 160.0,
                y: 100.0,
                element: Element::Fire,
            }),
            camera: CropRect {
                x: 0.0,
                y: 0.0,
                w: cfg.canvas_width as f32,
                h: cfg.canvas_height as f32,
            },
            panel: None,
            bars: [
                BarState {
                    visible: true,
                    shown_hp: 150.0,
                    max_hp: 300.0,
                },
                BarState {
                    visible: false,
                    shown_hp: 300.0,
                    max_hp: 300.0,
                },
            ],
            popup: None,
            banner: None,
        }
    }

    #[test]
    fn rendered_frame_has_output_resolution() {
        let cfg = cfg();
        let frame = render_frame(&cfg, &assets(&cfg), &instruction(&cfg), &NullTextPainter);
        assert_eq!(frame.dimensions(), (cfg.output_width, cfg.output_height));
    }

    #[test]
    fn padding_uses_border_average() {
        let cfg = cfg();
        // Uniform background with no sprites: padding must equal it.
        let mut instr = instruction(&cfg);
        instr.a.visible = false;
        instr.b.visible = false;
        instr.effect = None;
        instr.bars[0].visible = false;
        let frame = render_frame(&cfg, &assets(&cfg), &instr, &NullTextPainter);
        // Top-left pixel is padding (wide source in a tall output).
        assert_eq!(*frame.get_pixel(0, 0), Rgba([40, 44, 60, 255]));
    }

    #[test]
    fn invisible_sprites_are_not_drawn() {
        let cfg = cfg();
        let mut instr = instruction(&cfg);
        instr.effect = None;
        instr.bars[0].visible = false;
        instr.b.visible = false;
        let with_b = {
            let mut i = instr.clone();
            i.b.visible = true;
            render_frame(&cfg, &assets(&cfg), &i, &NullTextPainter)
        };
        let without_b = render_frame(&cfg, &assets(&cfg), &instr, &NullTextPainter);
        assert_ne!(with_b.as_raw(), without_b.as_raw());
    }

    #[test]
    fn opacity_fades_blend_toward_background() {
        let mut canvas = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]));
        let sprite = RgbaImage::from_pixel(8, 8, Rgba([200, 200, 200, 255]));
        overlay_with_opacity(&mut canvas, &sprite, 0, 0, 0.5);
        let px = canvas.get_pixel(2, 2);
        assert_eq!(px[0], 100);
        // Outside the sprite footprint untouched.
        assert_eq!(*canvas.get_pixel(12, 12), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn crop_clamps_to_canvas_bounds() {
        let canvas = RgbaImage::from_pixel(100, 50, Rgba([9, 9, 9, 255]));
        let out = crop(
            &canvas,
            &CropRect {
                x: 80.0,
                y: 40.0,
                w: 40.0,
                h: 40.0,
            },
        );
        assert_eq!(out.dimensions(), (40, 40));
    }

    #[test]
    fn write_frames_emits_gapless_numbered_series() {
        let cfg = cfg();
        let a = assets(&cfg);
        let frames: Vec<FrameInstruction> = (0..3)
            .map(|i| {
                let mut instr = instruction(&cfg);
                instr.frame_index = i;
                instr
            })
            .collect();
        let dir = tempfile::tempdir().unwrap();
        let count = write_frames(&cfg, &a, &frames, &NullTextPainter, dir.path()).unwrap();
        assert_eq!(count, 3);
        for i in 0..3 {
            assert!(dir.path().join(format!("frame_{i:06}.png")).is_file());
        }
        assert!(!dir.path().join("frame_000003.png").exists());
    }
}
