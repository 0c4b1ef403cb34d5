use crate::SAMPLE_RATE;

/// Mix interleaved stereo down to mono by averaging the channel pair.
/// A trailing orphan sample is dropped.
pub fn stereo_to_mono(samples: &[f32]) -> Vec<f32> {
    samples
        .chunks_exact(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

/// Linear-interpolation resampler. Good enough for capture files; the
/// demodulators do not care about the slight spectral images it leaves
/// above the band of interest.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f32 / from_rate as f32;
    let out_len = (samples.len() as f32 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src = i as f32 / ratio;
        let lo = src.floor() as usize;
        let frac = src - lo as f32;

        let value = if lo + 1 < samples.len() {
            samples[lo] * (1.0 - frac) + samples[lo + 1] * frac
        } else {
            samples[samples.len() - 1]
        };
        out.push(value);
    }

    out
}

/// Bring an arbitrary capture to the pipeline's native 44.1 kHz.
pub fn to_native_rate(samples: &[f32], from_rate: u32) -> Vec<f32> {
    resample(samples, from_rate, SAMPLE_RATE as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_mixdown() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(stereo_to_mono(&stereo), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_identity_rate_is_passthrough() {
        let samples = [0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 44100, 44100), samples.to_vec());
    }

    #[test]
    fn test_upsample_length() {
        let samples = vec![0.0f32; 1000];
        let out = resample(&samples, 22050, 44100);
        assert_eq!(out.len(), 2000);
    }

    #[test]
    fn test_downsample_preserves_ramp() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let out = resample(&samples, 48000, 24000);
        // every output sample should sit on the original ramp
        for (i, &v) in out.iter().enumerate() {
            assert!((v - 2.0 * i as f32).abs() < 1.0, "sample {i}: {v}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(resample(&[], 48000, 44100).is_empty());
        assert!(stereo_to_mono(&[]).is_empty());
    }
}
