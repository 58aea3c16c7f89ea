//! Job orchestration
//!
//! One job: two seed strings in, a frame directory plus a mixed WAV out.
//! Asset setup for the two sides runs in parallel; everything downstream of
//! the battle simulation is deterministic given the job PRNG.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::info;

use crate::anim::renderer::{write_frames, CombatantSprites, SceneAssets, TextPainter};
use crate::anim::sequencer::sequence;
use crate::assets::orientation::{ensure_facing, Facing};
use crate::assets::placeholder::effect_sprite;
use crate::assets::{decode_sprite, fit_square, AssetBackend, CombatantIdentity};
use crate::audio::mixer::{mix, write_wav, CuePalette};
use crate::audio::synth::{bed_track, call_effect, hit_effect, miss_effect};
use crate::combat::simulator::simulate;
use crate::combat::stats::{derive_elements, derive_stats, Combatant};
use crate::combat::types::Element;
use crate::combat::Move;
use crate::config::PipelineConfig;
use crate::error::JobResult;
use crate::rng::job_rng;

/// One duel job: the two combatant seed strings plus the entropy word that
/// perturbs the job PRNG, and where the outputs go.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub seed_a: String,
    pub seed_b: String,
    /// Fixed for reproducible jobs, fresh-random for variety.
    pub entropy: u64,
    pub out_dir: PathBuf,
}

/// Where a finished job landed.
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub frames_dir: PathBuf,
    pub audio_path: PathBuf,
    pub frame_count: u32,
    pub winner_name: String,
}

/// Everything derived for one side before the battle starts.
struct SidePrep {
    combatant: Combatant,
    sprites: CombatantSprites,
    identity: CombatantIdentity,
}

/// Effect size relative to the sprite.
const EFFECT_FRAC: f32 = 0.45;

fn prepare_side(
    backend: &dyn AssetBackend,
    cfg: &PipelineConfig,
    seed: &str,
    facing: Facing,
) -> JobResult<SidePrep> {
    let identity = backend.generate_structured(&identity_prompt(seed))?;
    let elements = derive_elements(seed);
    let stats = derive_stats(seed);
    let moves = [
        Move::from_spec(identity.moves[0].clone()),
        Move::from_spec(identity.moves[1].clone()),
    ];

    let sprite_for = |pose: &str| -> JobResult<image::RgbaImage> {
        let bytes = backend.generate_image(
            &sprite_prompt(&identity.name, &identity.flavor, pose),
            cfg.sprite_height,
            true,
        )?;
        let sprite = ensure_facing(decode_sprite(&bytes)?, facing);
        Ok(fit_square(&sprite, cfg.sprite_height))
    };
    let sprites = CombatantSprites {
        base: sprite_for("ready stance")?,
        alt: sprite_for("triumphant pose")?,
    };

    let combatant = Combatant::new(identity.name.clone(), elements, stats, moves);
    info!(
        name = %combatant.name,
        elements = ?combatant.elements,
        hp = combatant.stats.hp,
        "side prepared"
    );
    Ok(SidePrep {
        combatant,
        sprites,
        identity,
    })
}

fn identity_prompt(seed: &str) -> String {
    format!("battle creature identity for theme: {seed}")
}

fn sprite_prompt(name: &str, flavor: &str, pose: &str) -> String {
    format!("full-body side view of {name}, {pose}. {flavor}")
}

fn background_prompt(a: &CombatantIdentity, b: &CombatantIdentity) -> String {
    format!("arena backdrop for a duel between {} and {}", a.name, b.name)
}

/// Run one job end to end: assets, battle, choreography, frames, audio.
///
/// Frames land in `out_dir/frames/`, the mixed track in `out_dir/audio.wav`.
pub fn run_job(
    cfg: &PipelineConfig,
    backend: &dyn AssetBackend,
    painter: &dyn TextPainter,
    spec: &JobSpec,
) -> JobResult<JobOutput> {
    info!(seed_a = %spec.seed_a, seed_b = %spec.seed_b, "job start");

    // The two sides are independent until the battle starts.
    let (prep_a, prep_b) = rayon::join(
        || prepare_side(backend, cfg, &spec.seed_a, Facing::Right),
        || prepare_side(backend, cfg, &spec.seed_b, Facing::Left),
    );
    let (prep_a, prep_b) = (prep_a?, prep_b?);

    let bg_bytes = backend.generate_image(
        &background_prompt(&prep_a.identity, &prep_b.identity),
        cfg.canvas_width,
        false,
    )?;
    let background = image::imageops::resize(
        &decode_sprite(&bg_bytes)?,
        cfg.canvas_width,
        cfg.canvas_height,
        image::imageops::FilterType::Triangle,
    );

    let effect_size = (cfg.sprite_height as f32 * EFFECT_FRAC) as u32;
    let mut effects: HashMap<Element, image::RgbaImage> = HashMap::new();
    for side in [&prep_a.combatant, &prep_b.combatant] {
        for mv in &side.moves {
            effects
                .entry(mv.element)
                .or_insert_with(|| effect_sprite(mv.element, effect_size));
        }
    }

    let mut rng = job_rng(&spec.seed_a, &spec.seed_b, spec.entropy);
    let mut sides = [prep_a.combatant, prep_b.combatant];
    let outcome = simulate(&mut sides, cfg.max_turns, cfg.level, &mut rng)?;
    let winner_name = sides[outcome.winner.index()].name.clone();
    info!(winner = %winner_name, turns = outcome.turns, "battle resolved");

    let anim = sequence(cfg, &sides, &outcome);
    let duration = anim.duration_secs(cfg.frame_rate);

    let assets = SceneAssets {
        background,
        a: prep_a.sprites,
        b: prep_b.sprites,
        effects,
    };
    let frames_dir = spec.out_dir.join("frames");
    let frame_count = write_frames(cfg, &assets, &anim.frames, painter, &frames_dir)?;
    info!(frame_count, secs = duration, "frames written");

    let audio_cfg = &cfg.audio;
    let bed = bed_track(audio_cfg, &mut rng);
    let palette = CuePalette {
        reveal_a: call_effect(audio_cfg, &mut rng),
        reveal_b: call_effect(audio_cfg, &mut rng),
        hit: hit_effect(audio_cfg, &mut rng),
        miss: miss_effect(audio_cfg, &mut rng),
    };
    let track = mix(duration, &bed, &palette, &anim.cues, audio_cfg);

    let audio_path = spec.out_dir.join("audio.wav");
    write_wav(&track, &audio_path)?;
    info!(path = %audio_path.display(), "audio written");

    Ok(JobOutput {
        frames_dir,
        audio_path,
        frame_count,
        winner_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::renderer::NullTextPainter;
    use crate::assets::placeholder::PlaceholderBackend;
    use crate::config::AnimTiming;

    /// Short phase timings so the end-to-end test stays fast.
    fn quick_config() -> PipelineConfig {
        PipelineConfig {
            canvas_width: 320,
            canvas_height: 180,
            output_width: 270,
            output_height: 480,
            sprite_height: 64,
            home_inset: 40,
            timing: AnimTiming {
                entrance_frames: 4,
                zoom_in_frames: 2,
                zoom_hold_frames: 2,
                zoom_out_frames: 2,
                approach_frames: 3,
                retreat_frames: 3,
                projectile_frames: 2,
                special_projectile_frames: 3,
                blink_frames: 4,
                blink_interval: 2,
                bar_frames: 3,
                miss_hold_frames: 2,
                faint_fade_frames: 3,
                victory_zoom_frames: 2,
                victory_hold_frames: 2,
                banner_frames: 3,
                ..AnimTiming::default()
            },
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn run_job_produces_frames_and_audio() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = quick_config();
        let spec = JobSpec {
            seed_a: "ember fox".into(),
            seed_b: "river eel".into(),
            entropy: 7,
            out_dir: dir.path().to_path_buf(),
        };
        let out = run_job(&cfg, &PlaceholderBackend, &NullTextPainter, &spec).unwrap();

        assert!(out.frame_count > 0);
        assert!(out.frames_dir.join("frame_000000.png").exists());
        assert!(out.audio_path.exists());
        assert!(!out.winner_name.is_empty());

        let reader = hound::WavReader::open(&out.audio_path).unwrap();
        let spec_read = reader.spec();
        assert_eq!(spec_read.channels, 2);
        assert_eq!(spec_read.sample_rate, cfg.audio.target_rate);
        // Track covers the whole animation.
        let frames_len = reader.duration() as f64 / spec_read.sample_rate as f64;
        let anim_len = out.frame_count as f64 / cfg.frame_rate as f64;
        assert!(frames_len >= anim_len - 1e-6);
    }

    #[test]
    fn identical_specs_reproduce_the_same_battle() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let cfg = quick_config();
        let mut spec = JobSpec {
            seed_a: "ash wolf".into(),
            seed_b: "glass crab".into(),
            entropy: 11,
            out_dir: dir_a.path().to_path_buf(),
        };
        let first = run_job(&cfg, &PlaceholderBackend, &NullTextPainter, &spec).unwrap();
        spec.out_dir = dir_b.path().to_path_buf();
        let second = run_job(&cfg, &PlaceholderBackend, &NullTextPainter, &spec).unwrap();

        assert_eq!(first.frame_count, second.frame_count);
        assert_eq!(first.winner_name, second.winner_name);
    }
}
