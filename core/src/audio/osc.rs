//! Oscillators and noise sources
//!
//! Mono sample generators the synthesizers build from. Frequency-varying
//! tones use a phase accumulator so glides stay click-free.

use rand::Rng;
use std::f32::consts::TAU;

/// Oscillator waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at `phase` (radians).
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * (phase / TAU).fract() - 1.0,
            Waveform::Triangle => 4.0 * ((phase / TAU).fract() - 0.5).abs() - 1.0,
        }
    }

    pub fn pick(rng: &mut impl Rng) -> Waveform {
        match rng.random_range(0..4) {
            0 => Waveform::Sine,
            1 => Waveform::Square,
            2 => Waveform::Saw,
            _ => Waveform::Triangle,
        }
    }
}

/// Fixed-frequency tone.
pub fn tone(waveform: Waveform, freq: f32, duration: f32, sample_rate: u32) -> Vec<f32> {
    let n = (duration * sample_rate as f32) as usize;
    let omega = TAU * freq / sample_rate as f32;
    let mut phase = 0.0f32;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(waveform.sample(phase));
        phase = (phase + omega) % TAU;
    }
    out
}

/// Tone whose frequency is supplied per sample by `freq_at(t)` with
/// t in [0, 1]. Used for glides and vibrato.
pub fn tone_with_freq(
    waveform: Waveform,
    duration: f32,
    sample_rate: u32,
    mut freq_at: impl FnMut(f32) -> f32,
) -> Vec<f32> {
    let n = ((duration * sample_rate as f32) as usize).max(1);
    let mut phase = 0.0f32;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f32 / n as f32;
        out.push(waveform.sample(phase));
        phase = (phase + TAU * freq_at(t) / sample_rate as f32) % TAU;
    }
    out
}

/// White noise in -1.0 to 1.0.
pub fn white_noise(duration: f32, sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let n = (duration * sample_rate as f32) as usize;
    (0..n).map(|_| rng.random_range(-1.0f32..1.0)).collect()
}

/// First-difference high-pass: out[i] = in[i] - in[i-1]. Crude but exactly
/// the swish character the miss effect wants.
pub fn first_difference(samples: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(samples.len());
    let mut prev = 0.0f32;
    for &s in samples {
        out.push(s - prev);
        prev = s;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SR: u32 = 44_100;

    #[test]
    fn tones_stay_in_range() {
        for wf in [Waveform::Sine, Waveform::Square, Waveform::Saw, Waveform::Triangle] {
            let s = tone(wf, 440.0, 0.05, SR);
            assert!(!s.is_empty());
            assert!(s.iter().all(|&v| (-1.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn tone_sample_count_matches_duration() {
        let s = tone(Waveform::Sine, 440.0, 0.5, SR);
        assert_eq!(s.len(), (0.5 * SR as f32) as usize);
    }

    #[test]
    fn glide_matches_fixed_tone_when_frequency_is_constant() {
        let fixed = tone(Waveform::Sine, 330.0, 0.02, SR);
        let glide = tone_with_freq(Waveform::Sine, 0.02, SR, |_| 330.0);
        assert_eq!(fixed.len(), glide.len());
        for (a, b) in fixed.iter().zip(glide.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn white_noise_is_in_range_and_nonconstant() {
        let mut rng = Pcg32::seed_from_u64(9);
        let s = white_noise(0.05, SR, &mut rng);
        assert!(s.iter().all(|&v| (-1.0..=1.0).contains(&v)));
        assert!(s.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn first_difference_kills_dc() {
        let dc = vec![0.7f32; 512];
        let hp = first_difference(&dc);
        assert!((hp[0] - 0.7).abs() < 1e-6);
        assert!(hp[1..].iter().all(|&v| v.abs() < 1e-6));
    }
}
