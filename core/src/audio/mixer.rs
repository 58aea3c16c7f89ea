//! Audio mixer
//!
//! Brings every synthesized buffer to one target rate, loops the bed across
//! the full job duration, places cue buffers at sample-accurate offsets,
//! and emits the finished interleaved PCM stream for external muxing.

use std::path::Path;

use tracing::{debug, info};

use crate::config::AudioConfig;
use crate::error::JobResult;

use super::buffer::StereoBuffer;
use super::cue::{CueKind, CueTimeline};

/// Resample to `target_rate` by linear interpolation between nearest
/// samples. Identity rates return an exact copy.
pub fn resample(buf: &StereoBuffer, target_rate: u32) -> StereoBuffer {
    if buf.sample_rate == target_rate || buf.is_empty() {
        let mut out = buf.clone();
        out.sample_rate = target_rate;
        return out;
    }
    let ratio = buf.sample_rate as f64 / target_rate as f64;
    let n_out = ((buf.len() as u64 * target_rate as u64) / buf.sample_rate as u64) as usize;
    let mut samples = Vec::with_capacity(n_out);
    for i in 0..n_out {
        let pos = i as f64 * ratio;
        let i0 = pos as usize;
        let i1 = (i0 + 1).min(buf.len() - 1);
        let frac = (pos - i0 as f64) as f32;
        let a = buf.samples[i0];
        let b = buf.samples[i1];
        samples.push([
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
        ]);
    }
    StereoBuffer {
        sample_rate: target_rate,
        samples,
    }
}

/// The four cue sounds, one per [`CueKind`].
pub struct CuePalette {
    pub reveal_a: StereoBuffer,
    pub reveal_b: StereoBuffer,
    pub hit: StereoBuffer,
    pub miss: StereoBuffer,
}

impl CuePalette {
    fn buffer(&self, kind: CueKind) -> &StereoBuffer {
        match kind {
            CueKind::RevealA => &self.reveal_a,
            CueKind::RevealB => &self.reveal_b,
            CueKind::Hit => &self.hit,
            CueKind::Miss => &self.miss,
        }
    }
}

fn kind_gain(cfg: &AudioConfig, kind: CueKind) -> f32 {
    match kind {
        CueKind::RevealA | CueKind::RevealB => cfg.reveal_gain,
        CueKind::Hit => cfg.hit_gain,
        CueKind::Miss => cfg.miss_gain,
    }
}

/// Additively mix `src` into `out` starting at `start`, clipping to
/// [-1, 1] after each addition. Samples past the end of `out` are dropped;
/// overlapping sources simply sum.
fn add_clipped(out: &mut [[f32; 2]], src: &StereoBuffer, start: usize, gain: f32) {
    for (i, s) in src.samples.iter().enumerate() {
        let Some(dst) = out.get_mut(start + i) else {
            break;
        };
        dst[0] = (dst[0] + s[0] * gain).clamp(-1.0, 1.0);
        dst[1] = (dst[1] + s[1] * gain).clamp(-1.0, 1.0);
    }
}

/// Mix the full soundtrack for a job of `duration_secs`.
///
/// The output always has exactly `ceil(duration_secs * target_rate)`
/// samples, independent of how many cues land in it.
pub fn mix(
    duration_secs: f64,
    bed: &StereoBuffer,
    palette: &CuePalette,
    cues: &CueTimeline,
    cfg: &AudioConfig,
) -> StereoBuffer {
    let rate = cfg.target_rate;
    let total = (duration_secs * rate as f64).ceil() as usize;
    let mut out = StereoBuffer::silent(rate, total);

    // Bed: resample once, then tile additively across the whole duration.
    let bed = resample(bed, rate);
    if !bed.is_empty() {
        let mut start = 0usize;
        while start < total {
            add_clipped(&mut out.samples, &bed, start, cfg.bed_gain);
            start += bed.len();
        }
    }

    // Cues, in timeline order, at sample-accurate offsets. Overlaps are
    // never dropped or merged.
    for cue in cues.iter() {
        let src = resample(palette.buffer(cue.kind), rate);
        let start = (cue.time_secs * rate as f64).floor() as usize;
        let gain = kind_gain(cfg, cue.kind) * cfg.fx_gain;
        debug!(kind = ?cue.kind, start, "placing cue");
        add_clipped(&mut out.samples, &src, start, gain);
    }

    out
}

/// Write the finished mix as interleaved 16-bit stereo WAV.
pub fn write_wav(buf: &StereoBuffer, path: &Path) -> JobResult<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: buf.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for s in &buf.samples {
        for ch in 0..2 {
            let v = (s[ch].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(v)?;
        }
    }
    writer.finalize()?;
    info!(path = %path.display(), secs = buf.duration_secs(), "mix written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rate: u32, n: usize) -> StereoBuffer {
        StereoBuffer {
            sample_rate: rate,
            samples: (0..n).map(|i| [i as f32 / n as f32, -(i as f32 / n as f32)]).collect(),
        }
    }

    fn quiet_palette(rate: u32) -> CuePalette {
        let one = |v: f32| StereoBuffer {
            sample_rate: rate,
            samples: vec![[v, v]; 100],
        };
        CuePalette {
            reveal_a: one(0.2),
            reveal_b: one(0.2),
            hit: one(0.5),
            miss: one(0.3),
        }
    }

    #[test]
    fn identity_resample_reproduces_input() {
        let buf = ramp(44_100, 1000);
        let out = resample(&buf, 44_100);
        assert_eq!(out.samples, buf.samples);
    }

    #[test]
    fn downsample_halves_the_length() {
        let buf = ramp(44_100, 1000);
        let out = resample(&buf, 22_050);
        assert_eq!(out.len(), 500);
        assert_eq!(out.sample_rate, 22_050);
        // A linear ramp survives linear resampling.
        let mid = out.samples[250][0];
        assert!((mid - 0.5).abs() < 0.01, "mid {mid}");
    }

    #[test]
    fn output_length_is_ceil_duration_times_rate() {
        let cfg = AudioConfig::default();
        let bed = ramp(cfg.bed_rate, 2048);
        let palette = quiet_palette(cfg.fx_rate);

        for (duration, cues) in [
            (1.0, vec![]),
            (1.0, vec![(CueKind::Hit, 0.1), (CueKind::Hit, 0.1), (CueKind::Miss, 0.9)]),
            (2.53, vec![(CueKind::RevealA, 0.0), (CueKind::RevealB, 2.5)]),
        ] {
            let mut tl = CueTimeline::new();
            for (kind, t) in cues {
                tl.push(kind, t);
            }
            let out = mix(duration, &bed, &palette, &tl, &cfg);
            let expected = (duration * cfg.target_rate as f64).ceil() as usize;
            assert_eq!(out.len(), expected);
        }
    }

    #[test]
    fn samples_stay_clipped() {
        let cfg = AudioConfig::default();
        let loud = StereoBuffer {
            sample_rate: cfg.target_rate,
            samples: vec![[1.0, 1.0]; 4410],
        };
        let palette = CuePalette {
            reveal_a: loud.clone(),
            reveal_b: loud.clone(),
            hit: loud.clone(),
            miss: loud.clone(),
        };
        let mut tl = CueTimeline::new();
        // Pile four overlapping cues on top of a loud bed.
        for _ in 0..4 {
            tl.push(CueKind::Hit, 0.0);
        }
        let out = mix(0.2, &loud, &palette, &tl, &cfg);
        assert!(out
            .samples
            .iter()
            .all(|s| s[0].abs() <= 1.0 && s[1].abs() <= 1.0));
        // The overlapping cues were actually summed, not dropped.
        assert!(out.samples[10][0] > 0.99);
    }

    #[test]
    fn cue_lands_at_floor_of_time_times_rate() {
        let cfg = AudioConfig::default();
        let silent_bed = StereoBuffer::silent(cfg.bed_rate, 64);
        let palette = quiet_palette(cfg.target_rate);
        let mut tl = CueTimeline::new();
        tl.push(CueKind::Hit, 0.5);
        let out = mix(1.0, &silent_bed, &palette, &tl, &cfg);
        let start = (0.5 * cfg.target_rate as f64).floor() as usize;
        assert_eq!(out.samples[start - 1], [0.0, 0.0]);
        assert!(out.samples[start][0] > 0.0);
    }

    #[test]
    fn cue_past_the_end_is_truncated_not_fatal() {
        let cfg = AudioConfig::default();
        let silent_bed = StereoBuffer::silent(cfg.bed_rate, 64);
        let palette = quiet_palette(cfg.target_rate);
        let mut tl = CueTimeline::new();
        tl.push(CueKind::Miss, 0.999);
        let out = mix(1.0, &silent_bed, &palette, &tl, &cfg);
        assert_eq!(out.len(), cfg.target_rate as usize);
    }

    #[test]
    fn wav_roundtrip_preserves_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mix.wav");
        let buf = ramp(44_100, 4410);
        write_wav(&buf, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(reader.len(), 4410 * 2);
    }
}
