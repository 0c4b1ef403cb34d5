use crate::bits::SoftBit;
use crate::SAMPLE_RATE;
use std::f32::consts::PI;

/// Mark (bit 1) tone.
pub const FSK_MARK_HZ: f32 = 14_000.0;

/// Space (bit 0) tone.
pub const FSK_SPACE_HZ: f32 = 14_200.0;

/// 50 ms symbols at 44.1 kHz.
pub const FSK_SYMBOL_SAMPLES: usize = (SAMPLE_RATE * 50) / 1000;

/// Analysis window and stride: half a symbol, so the output stream is
/// 2x oversampled relative to the bit rate.
pub const FSK_HALF_SYMBOL: usize = FSK_SYMBOL_SAMPLES / 2;

/// One tone must carry this share of the local tonal power to decide a bit.
const DOMINANCE_RATIO: f32 = 0.6;

/// Goertzel recurrence constants for one bin, precomputed once.
struct GoertzelBin {
    coeff: f32,
    cos_w: f32,
    sin_w: f32,
}

impl GoertzelBin {
    fn new(freq_hz: f32, window_len: usize) -> Self {
        let k = (0.5 + window_len as f32 * freq_hz / SAMPLE_RATE as f32) as usize;
        let omega = 2.0 * PI * k as f32 / window_len as f32;
        Self {
            coeff: 2.0 * omega.cos(),
            cos_w: omega.cos(),
            sin_w: omega.sin(),
        }
    }

    /// Magnitude squared of the bin over one window.
    fn power(&self, window: &[f32]) -> f32 {
        let mut q1 = 0.0;
        let mut q2 = 0.0;
        for &sample in window {
            let q0 = self.coeff * q1 - q2 + sample;
            q2 = q1;
            q1 = q0;
        }
        let real = q1 - q2 * self.cos_w;
        let imag = q2 * self.sin_w;
        real * real + imag * imag
    }
}

/// 2-FSK demodulator ("screecher" waveform).
///
/// Slides a half-symbol window over the capture and compares Goertzel power
/// at the mark and space tones. A window where neither tone clearly
/// dominates emits [`SoftBit::Unknown`]; the sync tolerance downstream is
/// sized for the boundary windows this produces.
pub struct FskDemodulator {
    mark: GoertzelBin,
    space: GoertzelBin,
}

impl FskDemodulator {
    pub fn new() -> Self {
        Self {
            mark: GoertzelBin::new(FSK_MARK_HZ, FSK_HALF_SYMBOL),
            space: GoertzelBin::new(FSK_SPACE_HZ, FSK_HALF_SYMBOL),
        }
    }

    pub fn samples_per_symbol(&self) -> usize {
        FSK_SYMBOL_SAMPLES
    }

    /// Oversampling factor of the emitted stream relative to the bit rate.
    pub fn oversample(&self) -> usize {
        2
    }

    /// Hamming budget spent on the 2x oversampled stream, where symbol
    /// boundary windows routinely come out undecided.
    pub fn sync_tolerance(&self) -> u32 {
        4
    }

    pub fn search_depth(&self) -> usize {
        2000
    }

    pub fn demodulate(&self, window: &[f32]) -> Vec<SoftBit> {
        let mut bits = Vec::with_capacity(window.len() / FSK_HALF_SYMBOL);

        for chunk in window.chunks_exact(FSK_HALF_SYMBOL) {
            let mark_power = self.mark.power(chunk);
            let space_power = self.space.power(chunk);
            let total = mark_power + space_power;

            let bit = if total <= f32::EPSILON {
                SoftBit::Unknown
            } else if mark_power / total > DOMINANCE_RATIO {
                SoftBit::One
            } else if space_power / total > DOMINANCE_RATIO {
                SoftBit::Zero
            } else {
                SoftBit::Unknown
            };
            bits.push(bit);
        }

        bits
    }
}

impl Default for FskDemodulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, n: usize, phase_offset: usize) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = (i + phase_offset) as f32;
                0.5 * (2.0 * PI * freq * t / SAMPLE_RATE as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_mark_and_space_decisions() {
        let demod = FskDemodulator::new();

        let mark = tone(FSK_MARK_HZ, FSK_SYMBOL_SAMPLES, 0);
        let bits = demod.demodulate(&mark);
        assert_eq!(bits, vec![SoftBit::One, SoftBit::One]);

        let space = tone(FSK_SPACE_HZ, FSK_SYMBOL_SAMPLES, 0);
        let bits = demod.demodulate(&space);
        assert_eq!(bits, vec![SoftBit::Zero, SoftBit::Zero]);
    }

    #[test]
    fn test_silence_is_indeterminate() {
        let demod = FskDemodulator::new();
        let silence = vec![0.0; FSK_SYMBOL_SAMPLES];
        let bits = demod.demodulate(&silence);
        assert_eq!(bits, vec![SoftBit::Unknown, SoftBit::Unknown]);
    }

    #[test]
    fn test_stream_is_twice_oversampled() {
        let demod = FskDemodulator::new();
        let mut samples = tone(FSK_MARK_HZ, FSK_SYMBOL_SAMPLES, 0);
        samples.extend(tone(FSK_SPACE_HZ, FSK_SYMBOL_SAMPLES, samples.len()));
        samples.extend(tone(FSK_MARK_HZ, FSK_SYMBOL_SAMPLES, samples.len()));

        let bits = demod.demodulate(&samples);
        // two entries per transmitted bit, boundary drift aside
        assert_eq!(bits.len(), 6);
        assert_eq!(bits[0], SoftBit::One);
        assert_eq!(bits[1], SoftBit::One);
        assert_eq!(bits[2], SoftBit::Zero);
        assert_eq!(bits[4], SoftBit::One);
    }

    #[test]
    fn test_out_of_band_noise_stays_undecided() {
        let demod = FskDemodulator::new();
        // strong tone far below both bins still splits power roughly evenly
        let rumble = tone(300.0, FSK_SYMBOL_SAMPLES, 0);
        for bit in demod.demodulate(&rumble) {
            assert_eq!(bit, SoftBit::Unknown);
        }
    }
}
