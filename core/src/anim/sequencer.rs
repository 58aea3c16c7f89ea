//! Animation sequencer
//!
//! Converts the ordered battle event log plus the fixed timing constants
//! into one rendering instruction per tick. Every phase appends
//! instructions with `frame_index = previous + 1`, starting at 0; audio
//! cues are recorded as frames are emitted, so cue times are derived from
//! frame indices and inherit their monotonicity.

use crate::audio::cue::{CueKind, CueTimeline};
use crate::combat::{BattleEvent, BattleOutcome, Category, Combatant, Side};
use crate::config::PipelineConfig;
use tracing::debug;

use super::ease::{ease_in_out_cubic, ease_out_cubic, lerp, phase_t};

/// Which of the two generated poses a sprite shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Base,
    /// Victory pose, used by the winner during the victory phase.
    Alt,
}

/// Per-tick state of one combatant sprite. Coordinates are the top-left
/// corner on the working canvas.
#[derive(Debug, Clone, Copy)]
pub struct SpriteState {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
    pub opacity: f32,
    pub pose: Pose,
}

/// Effect sprite (projectile/impact) state for one tick.
#[derive(Debug, Clone, Copy)]
pub struct EffectState {
    pub x: f32,
    pub y: f32,
    pub element: crate::combat::Element,
}

/// Camera crop window in working-canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Stat reveal panel contents.
#[derive(Debug, Clone, PartialEq)]
pub struct StatPanel {
    pub side: Side,
    pub title: String,
    pub lines: Vec<String>,
}

/// HP bar state for one side.
#[derive(Debug, Clone, Copy)]
pub struct BarState {
    pub visible: bool,
    /// Currently displayed HP (interpolated during bar animation).
    pub shown_hp: f32,
    pub max_hp: f32,
}

/// Floating damage label.
#[derive(Debug, Clone, PartialEq)]
pub struct DamagePopup {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

/// One renderable tick. `frame_index` is strictly the previous
/// instruction's index + 1, starting at 0.
#[derive(Debug, Clone)]
pub struct FrameInstruction {
    pub frame_index: u32,
    pub a: SpriteState,
    pub b: SpriteState,
    pub effect: Option<EffectState>,
    pub camera: CropRect,
    pub panel: Option<StatPanel>,
    pub bars: [BarState; 2],
    pub popup: Option<DamagePopup>,
    pub banner: Option<String>,
}

/// Sequencer output: the full instruction list and the cue timeline
/// populated alongside it.
#[derive(Debug)]
pub struct SequencedAnimation {
    pub frames: Vec<FrameInstruction>,
    pub cues: CueTimeline,
}

impl SequencedAnimation {
    /// Total duration in seconds at the configured frame rate.
    pub fn duration_secs(&self, frame_rate: u32) -> f64 {
        self.frames.len() as f64 / frame_rate as f64
    }
}

struct Scene {
    a: SpriteState,
    b: SpriteState,
    effect: Option<EffectState>,
    camera: CropRect,
    panel: Option<StatPanel>,
    bars: [BarState; 2],
    popup: Option<DamagePopup>,
    banner: Option<String>,
}

/// Drives phase-by-phase emission. Holds the mutable scene state that each
/// emitted instruction snapshots.
pub struct Sequencer<'a> {
    cfg: &'a PipelineConfig,
    sides: &'a [Combatant; 2],
    frames: Vec<FrameInstruction>,
    cues: CueTimeline,
    scene: Scene,
}

impl<'a> Sequencer<'a> {
    pub fn new(cfg: &'a PipelineConfig, sides: &'a [Combatant; 2]) -> Sequencer<'a> {
        let full = CropRect {
            x: 0.0,
            y: 0.0,
            w: cfg.canvas_width as f32,
            h: cfg.canvas_height as f32,
        };
        let ground = Self::ground_y(cfg);
        let offscreen = |side: Side| SpriteState {
            x: Self::offscreen_x(cfg, side),
            y: ground,
            visible: true,
            opacity: 1.0,
            pose: Pose::Base,
        };
        let bar = |c: &Combatant| BarState {
            visible: false,
            shown_hp: c.stats.hp as f32,
            max_hp: c.stats.hp as f32,
        };
        Sequencer {
            cfg,
            sides,
            frames: Vec::new(),
            cues: CueTimeline::new(),
            scene: Scene {
                a: offscreen(Side::A),
                b: offscreen(Side::B),
                effect: None,
                camera: full,
                panel: None,
                bars: [bar(&sides[0]), bar(&sides[1])],
                popup: None,
                banner: None,
            },
        }
    }

    /// Consume the battle outcome and produce the full animation.
    pub fn run(mut self, outcome: &BattleOutcome) -> SequencedAnimation {
        for event in &outcome.events {
            match *event {
                BattleEvent::EntranceDone(side) => self.entrance(side),
                BattleEvent::RevealDone(side) => self.reveal(side),
                BattleEvent::AttackResolved {
                    attacker,
                    move_index,
                    hit,
                    damage,
                } => self.attack(attacker, move_index, hit, damage),
                BattleEvent::Fainted(side) => self.resolution_and_victory(side),
            }
        }
        debug!(
            frames = self.frames.len(),
            cues = self.cues.len(),
            "sequencing complete"
        );
        SequencedAnimation {
            frames: self.frames,
            cues: self.cues,
        }
    }

    // ---- geometry -------------------------------------------------------

    fn sprite_size(&self) -> f32 {
        self.cfg.sprite_height as f32
    }

    fn ground_y(cfg: &PipelineConfig) -> f32 {
        cfg.canvas_height as f32 - cfg.sprite_height as f32 - 60.0
    }

    fn offscreen_x(cfg: &PipelineConfig, side: Side) -> f32 {
        match side {
            Side::A => -(cfg.sprite_height as f32),
            Side::B => cfg.canvas_width as f32,
        }
    }

    fn home_x(&self, side: Side) -> f32 {
        match side {
            Side::A => self.cfg.home_inset as f32,
            Side::B => {
                self.cfg.canvas_width as f32 - self.cfg.home_inset as f32 - self.sprite_size()
            }
        }
    }

    fn sprite(&mut self, side: Side) -> &mut SpriteState {
        match side {
            Side::A => &mut self.scene.a,
            Side::B => &mut self.scene.b,
        }
    }

    fn sprite_ref(&self, side: Side) -> &SpriteState {
        match side {
            Side::A => &self.scene.a,
            Side::B => &self.scene.b,
        }
    }

    /// Camera crop for a zoom level focused on a sprite, with the crop
    /// center solved so the stat panel (top `panel_height_frac` of the
    /// cropped frame) never overlaps the sprite.
    fn solve_crop(&self, zoom: f32, focus: Side, clear_panel: bool) -> CropRect {
        let cw = self.cfg.canvas_width as f32;
        let ch = self.cfg.canvas_height as f32;
        let w = cw / zoom;
        let h = ch / zoom;

        let s = self.sprite_ref(focus);
        let cx = s.x + self.sprite_size() / 2.0;
        let cy = s.y + self.sprite_size() / 2.0;

        let x = (cx - w / 2.0).clamp(0.0, cw - w);
        let mut y = cy - h / 2.0;
        if clear_panel {
            // Minimal top clearance: the panel's bottom edge in crop space
            // must sit above the sprite's top edge.
            let max_y = s.y - self.cfg.panel_height_frac * h;
            y = y.min(max_y);
        }
        let y = y.clamp(0.0, ch - h);
        CropRect { x, y, w, h }
    }

    fn full_frame(&self) -> CropRect {
        CropRect {
            x: 0.0,
            y: 0.0,
            w: self.cfg.canvas_width as f32,
            h: self.cfg.canvas_height as f32,
        }
    }

    // ---- emission -------------------------------------------------------

    /// Snapshot the scene as the next instruction. The index is always the
    /// current frame count, which keeps the sequence gapless by
    /// construction.
    fn emit(&mut self) {
        self.frames.push(FrameInstruction {
            frame_index: self.frames.len() as u32,
            a: self.scene.a,
            b: self.scene.b,
            effect: self.scene.effect,
            camera: self.scene.camera,
            panel: self.scene.panel.clone(),
            bars: self.scene.bars,
            popup: self.scene.popup.clone(),
            banner: self.scene.banner.clone(),
        });
    }

    /// Record a cue timed at the frame about to be emitted.
    fn record_cue(&mut self, kind: CueKind) {
        let time = self.frames.len() as f64 / self.cfg.frame_rate as f64;
        self.cues.push(kind, time);
    }

    // ---- phases ---------------------------------------------------------

    fn entrance(&mut self, side: Side) {
        let frames = self.cfg.timing.entrance_frames;
        let from = Self::offscreen_x(self.cfg, side);
        let to = self.home_x(side);
        for f in 0..frames {
            let t = ease_out_cubic(phase_t(f, frames));
            self.sprite(side).x = lerp(from, to, t);
            self.emit();
        }
        self.sprite(side).x = to;
    }

    fn reveal(&mut self, side: Side) {
        let t = &self.cfg.timing;
        let (zoom_in, hold, zoom_out, max_zoom) = (
            t.zoom_in_frames,
            t.zoom_hold_frames,
            t.zoom_out_frames,
            t.max_zoom,
        );

        self.scene.panel = Some(self.stat_panel(side));
        self.record_cue(match side {
            Side::A => CueKind::RevealA,
            Side::B => CueKind::RevealB,
        });

        for f in 0..zoom_in {
            let zoom = lerp(1.0, max_zoom, ease_in_out_cubic(phase_t(f, zoom_in)));
            self.scene.camera = self.solve_crop(zoom, side, true);
            self.emit();
        }
        for _ in 0..hold {
            self.scene.camera = self.solve_crop(max_zoom, side, true);
            self.emit();
        }
        self.scene.panel = None;
        for f in 0..zoom_out {
            let zoom = lerp(max_zoom, 1.0, ease_in_out_cubic(phase_t(f, zoom_out)));
            self.scene.camera = self.solve_crop(zoom, side, false);
            self.emit();
        }
        self.scene.camera = self.full_frame();
        self.scene.bars[side.index()].visible = true;
    }

    fn stat_panel(&self, side: Side) -> StatPanel {
        let c = &self.sides[side.index()];
        let elements = c
            .elements
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(" / ");
        StatPanel {
            side,
            title: c.name.clone(),
            lines: vec![
                elements,
                format!("HP {}   SPD {}", c.stats.hp, c.stats.speed),
                format!("ATK {}   DEF {}", c.stats.atk, c.stats.def),
                format!("SP.A {}   SP.D {}", c.stats.sp_atk, c.stats.sp_def),
                format!("{} / {}", c.moves[0].name, c.moves[1].name),
            ],
        }
    }

    fn attack(&mut self, attacker: Side, move_index: usize, hit: bool, damage: Option<i32>) {
        let mv = &self.sides[attacker.index()].moves[move_index];
        let (category, element) = (mv.category, mv.element);
        let t = self.cfg.timing.clone();
        let defender = attacker.opponent();
        let size = self.sprite_size();

        let home = self.home_x(attacker);
        let defender_x = self.sprite_ref(defender).x;
        let defender_center = defender_x + size / 2.0;
        let effect_y = self.sprite_ref(defender).y + size * 0.4;

        // Launch point of the effect sprite: the attacker's leading edge.
        let leading_edge = |attacker_x: f32| match attacker {
            Side::A => attacker_x + size,
            Side::B => attacker_x,
        };

        match category {
            Category::Physical => {
                // Approach: ease toward the defender, stopping short.
                let melee_gap = 40.0;
                let contact = match attacker {
                    Side::A => defender_x - size - melee_gap,
                    Side::B => defender_x + size + melee_gap,
                };
                for f in 0..t.approach_frames {
                    let e = ease_in_out_cubic(phase_t(f, t.approach_frames));
                    self.sprite(attacker).x = lerp(home, contact, e);
                    self.emit();
                }
                // High-speed effect traversal across the remaining gap.
                let from = leading_edge(contact);
                self.projectile(from, defender_center, effect_y, element, t.projectile_frames, hit);
                // Retreat.
                for f in 0..t.retreat_frames {
                    let e = ease_in_out_cubic(phase_t(f, t.retreat_frames));
                    self.sprite(attacker).x = lerp(contact, home, e);
                    self.emit();
                }
                self.sprite(attacker).x = home;
            }
            Category::Special => {
                // Both combatants stay put; the effect crosses the full
                // inter-combatant distance.
                let from = leading_edge(home);
                self.projectile(
                    from,
                    defender_center,
                    effect_y,
                    element,
                    t.special_projectile_frames,
                    hit,
                );
            }
        }

        if hit {
            let dmg = damage.unwrap_or(0);
            self.hit_aftermath(defender, dmg);
        } else {
            // Short neutral hold; no HP or bar change.
            for _ in 0..t.miss_hold_frames {
                self.emit();
            }
        }
    }

    /// Animate the effect sprite from `from_x` to `to_x` and record the
    /// hit-or-miss cue at the arrival tick.
    fn projectile(
        &mut self,
        from_x: f32,
        to_x: f32,
        y: f32,
        element: crate::combat::Element,
        frames: u32,
        hit: bool,
    ) {
        let frames = frames.max(1);
        for f in 0..frames {
            let e = ease_in_out_cubic(phase_t(f, frames));
            let x = lerp(from_x, to_x, e);
            self.scene.effect = Some(EffectState { x, y, element });
            if f == frames - 1 {
                self.record_cue(if hit { CueKind::Hit } else { CueKind::Miss });
            }
            self.emit();
        }
        self.scene.effect = None;
    }

    fn hit_aftermath(&mut self, defender: Side, dmg: i32) {
        let t = self.cfg.timing.clone();
        let size = self.sprite_size();

        // Blink: toggle visibility at a fixed sub-interval.
        let interval = t.blink_interval.max(1);
        for f in 0..t.blink_frames {
            self.sprite(defender).visible = (f / interval) % 2 == 0;
            self.emit();
        }
        self.sprite(defender).visible = true;

        // Bar interpolation with a rising, fading damage label.
        let old = self.scene.bars[defender.index()].shown_hp;
        let new = (old - dmg as f32).max(0.0);
        let head_x = self.sprite_ref(defender).x + size / 2.0;
        let head_y = self.sprite_ref(defender).y;
        for f in 0..t.bar_frames {
            let p = phase_t(f, t.bar_frames);
            self.scene.bars[defender.index()].shown_hp = lerp(old, new, p);
            self.scene.popup = Some(DamagePopup {
                text: format!("-{dmg}"),
                x: head_x,
                y: head_y - 60.0 * p,
                alpha: 1.0 - p,
            });
            self.emit();
        }
        self.scene.bars[defender.index()].shown_hp = new;
        self.scene.popup = None;
    }

    fn resolution_and_victory(&mut self, loser: Side) {
        let t = self.cfg.timing.clone();
        let winner = loser.opponent();

        // Loser fades out linearly and is never drawn again.
        for f in 0..t.faint_fade_frames {
            self.sprite(loser).opacity = 1.0 - phase_t(f, t.faint_fade_frames);
            self.emit();
        }
        {
            let s = self.sprite(loser);
            s.visible = false;
            s.opacity = 0.0;
        }

        // Camera zooms onto the winner's alternate pose.
        self.sprite(winner).pose = Pose::Alt;
        for f in 0..t.victory_zoom_frames {
            let zoom = lerp(
                1.0,
                t.max_zoom,
                ease_in_out_cubic(phase_t(f, t.victory_zoom_frames)),
            );
            self.scene.camera = self.solve_crop(zoom, winner, false);
            self.emit();
        }
        for _ in 0..t.victory_hold_frames {
            self.emit();
        }

        // Banner pinned near the top with the outcome text.
        self.scene.banner = Some(format!(
            "{} WINS!",
            self.sides[winner.index()].name.to_uppercase()
        ));
        for _ in 0..t.banner_frames {
            self.emit();
        }
    }
}

/// Convenience wrapper: sequence a finished battle.
pub fn sequence(
    cfg: &PipelineConfig,
    sides: &[Combatant; 2],
    outcome: &BattleOutcome,
) -> SequencedAnimation {
    Sequencer::new(cfg, sides).run(outcome)
}
