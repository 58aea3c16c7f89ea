//! Procedural audio synthesis
//!
//! Pure generators for the music bed and the three cue effects. Each call
//! draws fresh randomness from the job PRNG and returns a peak-normalized
//! stereo buffer at its own native rate with short edge fades; the mixer
//! handles rate conversion and placement.

use rand::Rng;
use std::f32::consts::TAU;
use tracing::debug;

use crate::config::AudioConfig;

use super::buffer::StereoBuffer;
use super::osc::{first_difference, tone, tone_with_freq, white_noise, Waveform};

const PEAK: f32 = 0.95;

// ---- envelope helpers ----------------------------------------------------

/// Exponential decay: sample i is scaled by exp(-k * t).
fn apply_exp_decay(samples: &mut [f32], sample_rate: u32, k: f32) {
    for (i, s) in samples.iter_mut().enumerate() {
        let t = i as f32 / sample_rate as f32;
        *s *= (-k * t).exp();
    }
}

/// Linear attack and release ramps, fractions of the total length.
fn apply_attack_release(samples: &mut [f32], attack_frac: f32, release_frac: f32) {
    let n = samples.len();
    if n == 0 {
        return;
    }
    let attack = ((n as f32 * attack_frac) as usize).max(1);
    let release = ((n as f32 * release_frac) as usize).max(1);
    for i in 0..n {
        let mut g = 1.0f32;
        if i < attack {
            g *= i as f32 / attack as f32;
        }
        if i >= n - release {
            g *= (n - 1 - i) as f32 / release as f32;
        }
        samples[i] *= g;
    }
}

fn midi_to_freq(midi: i32) -> f32 {
    440.0 * 2.0f32.powf((midi - 69) as f32 / 12.0)
}

// ---- bed track -----------------------------------------------------------

/// Scale interval sets the bed picks from, in semitones above the root.
const SCALES: [&[i32]; 3] = [
    &[0, 3, 5, 7, 10],     // minor pentatonic
    &[0, 2, 4, 7, 9],      // major pentatonic
    &[0, 2, 3, 5, 7, 8, 10], // natural minor
];

/// Synthesize the looping music bed: a sustained triangle-partial pad over
/// a four-chord progression, a square bass line, a sparse swing-gated
/// melody, and a kick/snare/hat pattern on the beat grid.
pub fn bed_track(cfg: &AudioConfig, rng: &mut impl Rng) -> StereoBuffer {
    let rate = cfg.bed_rate;
    let tempo = rng.random_range(84..=116) as f32;
    let beat = 60.0 / tempo;
    let root_midi = rng.random_range(45..=52);
    let scale = SCALES[rng.random_range(0..SCALES.len())];

    const BARS: usize = 8;
    const BEATS_PER_BAR: usize = 4;
    const CHORDS: usize = 4;
    let bar = beat * BEATS_PER_BAR as f32;
    let chord_dur = bar * (BARS / CHORDS) as f32;
    let total = bar * BARS as f32;

    // Four-chord progression over scale-degree roots; always open on the
    // tonic.
    let mut degrees = [0usize; CHORDS];
    for d in degrees.iter_mut().skip(1) {
        *d = rng.random_range(0..scale.len());
    }

    debug!(tempo, root_midi, ?degrees, "bed parameters");

    let mut out = StereoBuffer::silent(rate, (total * rate as f32) as usize);

    // Pad: triangle partials (root, fifth, octave) per chord, widened by a
    // detuned copy on the opposite side.
    for (ci, &deg) in degrees.iter().enumerate() {
        let chord_root = root_midi + 12 + scale[deg];
        let offset = ((ci as f32 * chord_dur) * rate as f32) as usize;
        for (pan, detune) in [(-0.35f32, 0.0f32), (0.35, 3.0)] {
            for (interval, amp) in [(0, 0.5f32), (7, 0.35), (12, 0.25)] {
                let freq = midi_to_freq(chord_root + interval) + detune;
                let mut part = tone(Waveform::Triangle, freq, chord_dur, rate);
                apply_attack_release(&mut part, 0.1, 0.15);
                out.add_mono_panned(offset, &part, amp * 0.5, pan);
            }
        }
    }

    // Bass: square pulses on every beat, root an octave down, with a
    // repeating accent pattern.
    let accents = [1.0f32, 0.55, 0.8, 0.55];
    let bass_freq = midi_to_freq(root_midi);
    for b in 0..(BARS * BEATS_PER_BAR) {
        let chord = (b / (BEATS_PER_BAR * BARS / CHORDS)).min(CHORDS - 1);
        let freq = bass_freq * 2.0f32.powf(scale[degrees[chord]] as f32 / 12.0);
        let mut pulse = tone(Waveform::Square, freq, beat * 0.45, rate);
        apply_attack_release(&mut pulse, 0.02, 0.5);
        let offset = ((b as f32 * beat) * rate as f32) as usize;
        out.add_mono_panned(offset, &pulse, 0.28 * accents[b % 4], 0.0);
    }

    // Melody: sparse notes on the eighth grid, gated by a swing envelope
    // (long on-beats, short off-beats).
    let eighth = beat / 2.0;
    for slot in 0..(BARS * BEATS_PER_BAR * 2) {
        if rng.random_range(0.0..1.0) > 0.35 {
            continue;
        }
        let semitone = scale[rng.random_range(0..scale.len())];
        let freq = midi_to_freq(root_midi + 24 + semitone);
        let gate = if slot % 2 == 0 { 0.58 } else { 0.30 };
        let mut note = tone(Waveform::Sine, freq, eighth * gate, rate);
        apply_attack_release(&mut note, 0.1, 0.4);
        let offset = ((slot as f32 * eighth) * rate as f32) as usize;
        out.add_mono_panned(offset, &note, 0.22, 0.25);
    }

    // Percussion on the beat grid: kick on 1 and 3, snare on 2 and 4, hat
    // on every eighth.
    let kick = {
        let mut s = tone_with_freq(Waveform::Sine, 0.12, rate, |t| 110.0 * (45.0f32 / 110.0).powf(t));
        apply_exp_decay(&mut s, rate, 18.0);
        s
    };
    let snare = {
        let mut noise = white_noise(0.09, rate, rng);
        apply_exp_decay(&mut noise, rate, 28.0);
        let mut body = tone(Waveform::Triangle, 180.0, 0.09, rate);
        apply_exp_decay(&mut body, rate, 30.0);
        for (n, b) in noise.iter_mut().zip(body.iter()) {
            *n = *n * 0.7 + b * 0.3;
        }
        noise
    };
    let hat = {
        let mut s = first_difference(&white_noise(0.03, rate, rng));
        apply_exp_decay(&mut s, rate, 60.0);
        s
    };
    for b in 0..(BARS * BEATS_PER_BAR) {
        let offset = ((b as f32 * beat) * rate as f32) as usize;
        match b % 4 {
            0 | 2 => out.add_mono_panned(offset, &kick, 0.5, 0.0),
            _ => out.add_mono_panned(offset, &snare, 0.32, 0.0),
        }
        for half in 0..2 {
            let h_offset = offset + ((half as f32 * eighth) * rate as f32) as usize;
            out.add_mono_panned(h_offset, &hat, 0.14, 0.15);
        }
    }

    out.samples.truncate((total * rate as f32) as usize);
    out.normalize_to(PEAK);
    out.edge_fade(0.01);
    out
}

// ---- cue effects ---------------------------------------------------------

/// A combatant's call: 2-3 pitch-swept chirps with vibrato. Each call draws
/// a fresh oscillator shape and glide, so the two sides sound distinct.
pub fn call_effect(cfg: &AudioConfig, rng: &mut impl Rng) -> StereoBuffer {
    let rate = cfg.fx_rate;
    let chirps = rng.random_range(2..=3);
    let waveform = Waveform::pick(rng);

    let mut out = StereoBuffer::silent(rate, 0);
    let mut offset = 0usize;
    for _ in 0..chirps {
        let start: f32 = rng.random_range(400.0..1400.0);
        let ratio: f32 = rng.random_range(0.5..2.0);
        let end = (start * ratio).clamp(150.0, 3200.0);
        let dur: f32 = rng.random_range(0.12..0.22);
        let vib_rate: f32 = rng.random_range(18.0..36.0);
        let vib_depth: f32 = rng.random_range(0.01..0.05);

        // Geometric glide start -> end with vibrato on top.
        let mut chirp = tone_with_freq(waveform, dur, rate, |t| {
            let glide = start * (end / start).powf(t);
            glide * (1.0 + vib_depth * (TAU * vib_rate * t * dur).sin())
        });
        apply_attack_release(&mut chirp, 0.12, 0.35);
        out.add_mono_panned(offset, &chirp, 1.0, 0.0);

        let gap: f32 = rng.random_range(0.03..0.07);
        offset += ((dur + gap) * rate as f32) as usize;
    }

    out.normalize_to(PEAK);
    out.edge_fade(0.004);
    out
}

/// Impact: exponentially pitch-swept tone plus decaying broadband noise,
/// with an optional harmonic ring.
pub fn hit_effect(cfg: &AudioConfig, rng: &mut impl Rng) -> StereoBuffer {
    let rate = cfg.fx_rate;
    let dur = 0.35f32;

    let start: f32 = rng.random_range(700.0..1100.0);
    let end: f32 = rng.random_range(90.0..160.0);
    let mut sweep = tone_with_freq(Waveform::Square, dur, rate, |t| start * (end / start).powf(t));
    apply_exp_decay(&mut sweep, rate, 12.0);

    let mut noise = white_noise(dur, rate, rng);
    apply_exp_decay(&mut noise, rate, 18.0);

    let mut out = StereoBuffer::silent(rate, (dur * rate as f32) as usize);
    out.add_mono_panned(0, &sweep, 0.6, 0.0);
    out.add_mono_panned(0, &noise, 0.5, 0.0);

    // Ring: a few decaying harmonic partials, half the time.
    if rng.random_range(0..2) == 0 {
        let f0: f32 = rng.random_range(400.0..900.0);
        for (mult, amp) in [(1.0f32, 0.30f32), (1.5, 0.18), (2.2, 0.12)] {
            let mut partial = tone(Waveform::Sine, f0 * mult, dur, rate);
            apply_exp_decay(&mut partial, rate, 8.0);
            out.add_mono_panned(0, &partial, amp, 0.0);
        }
    }

    out.normalize_to(PEAK);
    out.edge_fade(0.003);
    out
}

/// Whiff: high-pass-filtered noise with a short decaying tonal swish.
pub fn miss_effect(cfg: &AudioConfig, rng: &mut impl Rng) -> StereoBuffer {
    let rate = cfg.fx_rate;
    let dur = 0.3f32;

    let mut swish = first_difference(&white_noise(dur, rate, rng));
    apply_exp_decay(&mut swish, rate, 14.0);

    let start: f32 = rng.random_range(1000.0..1500.0);
    let mut tonal = tone_with_freq(Waveform::Sine, dur * 0.6, rate, |t| start * 0.6f32.powf(t));
    apply_exp_decay(&mut tonal, rate, 10.0);

    let mut out = StereoBuffer::silent(rate, (dur * rate as f32) as usize);
    out.add_mono_panned(0, &swish, 0.8, 0.0);
    out.add_mono_panned(0, &tonal, 0.25, 0.0);

    out.normalize_to(PEAK);
    out.edge_fade(0.003);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn cfg() -> AudioConfig {
        AudioConfig::default()
    }

    fn peak(buf: &StereoBuffer) -> f32 {
        buf.samples
            .iter()
            .flat_map(|s| s.iter())
            .fold(0.0f32, |a, &b| a.max(b.abs()))
    }

    #[test]
    fn bed_track_is_normalized_and_non_trivial() {
        let mut rng = Pcg32::seed_from_u64(21);
        let bed = bed_track(&cfg(), &mut rng);
        assert_eq!(bed.sample_rate, cfg().bed_rate);
        assert!(bed.duration_secs() > 5.0, "bed too short to loop musically");
        let p = peak(&bed);
        assert!((p - PEAK).abs() < 1e-3, "peak {p}");
        // Edge fades: endpoints silent.
        assert_eq!(bed.samples[0], [0.0, 0.0]);
    }

    #[test]
    fn effects_are_normalized_and_bounded() {
        let c = cfg();
        let mut rng = Pcg32::seed_from_u64(5);
        for buf in [
            call_effect(&c, &mut rng),
            hit_effect(&c, &mut rng),
            miss_effect(&c, &mut rng),
        ] {
            assert_eq!(buf.sample_rate, c.fx_rate);
            assert!(!buf.is_empty());
            let p = peak(&buf);
            assert!(p <= 1.0 && p > 0.5, "peak {p}");
        }
    }

    #[test]
    fn call_effects_differ_between_draws() {
        let c = cfg();
        let mut rng = Pcg32::seed_from_u64(13);
        let a = call_effect(&c, &mut rng);
        let b = call_effect(&c, &mut rng);
        assert!(a.len() != b.len() || a.samples != b.samples);
    }

    #[test]
    fn hit_effect_decays_toward_silence() {
        let c = cfg();
        let mut rng = Pcg32::seed_from_u64(3);
        let buf = hit_effect(&c, &mut rng);
        let n = buf.len();
        let head: f32 = buf.samples[..n / 8].iter().map(|s| s[0].abs()).sum();
        let tail: f32 = buf.samples[n * 7 / 8..].iter().map(|s| s[0].abs()).sum();
        assert!(head > tail * 4.0, "head {head} tail {tail}");
    }
}
