//! Pipeline configuration
//!
//! One immutable configuration object is built at job start and passed
//! explicitly through every component. Nothing in the pipeline reads timing
//! or sizing constants from module-level state.

/// Full pipeline configuration for one job.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Output frame rate in frames per second.
    pub frame_rate: u32,
    /// Working canvas size; the scene is composed at this resolution.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Final output resolution. The cropped canvas is scaled to fit while
    /// preserving aspect ratio; the remainder is padded.
    pub output_width: u32,
    pub output_height: u32,
    /// Height combat sprites are scaled to on the working canvas.
    pub sprite_height: u32,
    /// Horizontal inset of each combatant's home position from its edge.
    pub home_inset: u32,
    /// Fraction of the (cropped) frame height the stat panel occupies.
    pub panel_height_frac: f32,
    /// Battle level used by the damage formula.
    pub level: i32,
    /// Defensive turn cap for the duel loop.
    pub max_turns: u32,
    pub timing: AnimTiming,
    pub audio: AudioConfig,
}

/// Frame counts for every animation phase. All values are ticks at
/// [`PipelineConfig::frame_rate`].
#[derive(Debug, Clone)]
pub struct AnimTiming {
    /// Sprite entrance ease-in from off-screen.
    pub entrance_frames: u32,
    /// Reveal camera zoom-in, hold, and zoom-out.
    pub zoom_in_frames: u32,
    pub zoom_hold_frames: u32,
    pub zoom_out_frames: u32,
    /// Maximum reveal zoom factor (1.0 = full frame).
    pub max_zoom: f32,
    /// Physical-move approach and retreat.
    pub approach_frames: u32,
    pub retreat_frames: u32,
    /// Effect-sprite traversal across the remaining gap (physical) —
    /// special moves traverse the full distance over a longer count.
    pub projectile_frames: u32,
    pub special_projectile_frames: u32,
    /// Defender blink on hit: total ticks and visibility toggle interval.
    pub blink_frames: u32,
    pub blink_interval: u32,
    /// HP bar old -> new interpolation.
    pub bar_frames: u32,
    /// Neutral hold after a miss.
    pub miss_hold_frames: u32,
    /// Loser opacity ramp to zero.
    pub faint_fade_frames: u32,
    /// Victory camera zoom, hold, and banner display.
    pub victory_zoom_frames: u32,
    pub victory_hold_frames: u32,
    pub banner_frames: u32,
}

/// Sample rates and gain staging for the audio subsystem.
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Rate everything is resampled to before mixing.
    pub target_rate: u32,
    /// Native synthesis rate of the looped bed track.
    pub bed_rate: u32,
    /// Native synthesis rate of the cue effects.
    pub fx_rate: u32,
    /// Gain applied to the looped bed.
    pub bed_gain: f32,
    /// Global attenuation applied to every cue on top of its base gain.
    pub fx_gain: f32,
    /// Per-kind base gains.
    pub reveal_gain: f32,
    pub hit_gain: f32,
    pub miss_gain: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            canvas_width: 1280,
            canvas_height: 720,
            output_width: 1080,
            output_height: 1920,
            sprite_height: 280,
            home_inset: 150,
            panel_height_frac: 0.22,
            level: 50,
            max_turns: 1000,
            timing: AnimTiming::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Default for AnimTiming {
    fn default() -> Self {
        Self {
            entrance_frames: 45,
            zoom_in_frames: 20,
            zoom_hold_frames: 40,
            zoom_out_frames: 20,
            max_zoom: 1.8,
            approach_frames: 18,
            retreat_frames: 18,
            projectile_frames: 6,
            special_projectile_frames: 14,
            blink_frames: 24,
            blink_interval: 4,
            bar_frames: 30,
            miss_hold_frames: 20,
            faint_fade_frames: 30,
            victory_zoom_frames: 25,
            victory_hold_frames: 45,
            banner_frames: 75,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            target_rate: 44_100,
            bed_rate: 32_000,
            fx_rate: 44_100,
            bed_gain: 0.55,
            fx_gain: 0.85,
            reveal_gain: 0.9,
            hit_gain: 1.0,
            miss_gain: 0.75,
        }
    }
}
