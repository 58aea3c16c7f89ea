//! Stereo sample buffers

/// Stereo float PCM at a native sample rate. Samples are `[left, right]`
/// pairs in the -1.0 to 1.0 range.
#[derive(Debug, Clone)]
pub struct StereoBuffer {
    pub sample_rate: u32,
    pub samples: Vec<[f32; 2]>,
}

impl StereoBuffer {
    pub fn silent(sample_rate: u32, len: usize) -> StereoBuffer {
        StereoBuffer {
            sample_rate,
            samples: vec![[0.0; 2]; len],
        }
    }

    /// Lift a mono signal to centered stereo.
    pub fn from_mono(sample_rate: u32, mono: &[f32]) -> StereoBuffer {
        StereoBuffer {
            sample_rate,
            samples: mono.iter().map(|&s| [s, s]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Additively mix a mono part at an equal-power pan position.
    /// `pan` is -1 (left) to +1 (right). The buffer grows as needed.
    pub fn add_mono_panned(&mut self, offset: usize, mono: &[f32], gain: f32, pan: f32) {
        let theta = (pan.clamp(-1.0, 1.0) + 1.0) * std::f32::consts::FRAC_PI_4;
        let (l_gain, r_gain) = (theta.cos() * gain, theta.sin() * gain);
        let needed = offset + mono.len();
        if needed > self.samples.len() {
            self.samples.resize(needed, [0.0; 2]);
        }
        for (i, &s) in mono.iter().enumerate() {
            let out = &mut self.samples[offset + i];
            out[0] += s * l_gain;
            out[1] += s * r_gain;
        }
    }

    /// Scale so the peak amplitude across both channels hits `target`.
    /// Silent buffers are left untouched.
    pub fn normalize_to(&mut self, target: f32) {
        let peak = self
            .samples
            .iter()
            .flat_map(|s| s.iter())
            .fold(0.0f32, |a, &b| a.max(b.abs()));
        if peak > 0.0 {
            let scale = target / peak;
            for s in &mut self.samples {
                s[0] *= scale;
                s[1] *= scale;
            }
        }
    }

    /// Linear fade over `fade_secs` at both ends to avoid discontinuities.
    pub fn edge_fade(&mut self, fade_secs: f32) {
        let n = self.samples.len();
        if n < 2 {
            return;
        }
        let fade = ((fade_secs * self.sample_rate as f32) as usize).min(n / 2).max(1);
        for i in 0..fade {
            let g = i as f32 / fade as f32;
            self.samples[i][0] *= g;
            self.samples[i][1] *= g;
            self.samples[n - 1 - i][0] *= g;
            self.samples[n - 1 - i][1] *= g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_hits_the_target_peak() {
        let mut buf = StereoBuffer::from_mono(44_100, &[0.1, -0.5, 0.25]);
        buf.normalize_to(0.9);
        let peak = buf
            .samples
            .iter()
            .flat_map(|s| s.iter())
            .fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!((peak - 0.9).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_silence_alone() {
        let mut buf = StereoBuffer::silent(44_100, 64);
        buf.normalize_to(0.9);
        assert!(buf.samples.iter().all(|s| s[0] == 0.0 && s[1] == 0.0));
    }

    #[test]
    fn edge_fade_zeroes_the_first_sample() {
        let mut buf = StereoBuffer::from_mono(44_100, &vec![1.0; 1000]);
        buf.edge_fade(0.005);
        assert_eq!(buf.samples[0][0], 0.0);
        assert!(buf.samples[500][0] > 0.99);
    }

    #[test]
    fn panning_is_equal_power_at_center() {
        let mut buf = StereoBuffer::silent(44_100, 4);
        buf.add_mono_panned(0, &[1.0], 1.0, 0.0);
        let [l, r] = buf.samples[0];
        assert!((l - r).abs() < 1e-6);
        assert!((l - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn add_mono_grows_the_buffer() {
        let mut buf = StereoBuffer::silent(44_100, 2);
        buf.add_mono_panned(4, &[1.0, 1.0], 1.0, -1.0);
        assert_eq!(buf.len(), 6);
        // Hard left: right channel stays silent.
        assert!(buf.samples[4][1].abs() < 1e-6);
        assert!(buf.samples[4][0] > 0.9);
    }
}
