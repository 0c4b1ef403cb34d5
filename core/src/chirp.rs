use crate::bits::SoftBit;
use crate::SAMPLE_RATE;
use std::f32::consts::PI;

/// Sweep band of the "dolphin" waveform. Bit 1 sweeps up, bit 0 down.
pub const CHIRP_LOW_HZ: f32 = 14_000.0;
pub const CHIRP_HIGH_HZ: f32 = 17_000.0;

/// 50 ms symbols at 44.1 kHz.
pub const CHIRP_SYMBOL_SAMPLES: usize = (SAMPLE_RATE * 50) / 1000;

/// Correlator stride in samples.
const CORRELATOR_STEP: usize = 20;

/// A correlation local maximum below this is noise. A clean full-scale
/// symbol correlates around 1100 against its template.
const PEAK_THRESHOLD: f32 = 50.0;

/// Symbol-spacing slack when matching the preamble and when re-acquiring
/// each payload symbol.
const SYMBOL_TOLERANCE: usize = 400;

/// Generate a linear sweep across [start, end] over `len` samples.
fn sweep(start_hz: f32, end_hz: f32, len: usize) -> Vec<f32> {
    let rate = SAMPLE_RATE as f32;
    let duration = len as f32 / rate;
    let slope = (end_hz - start_hz) / duration;
    (0..len)
        .map(|n| {
            let t = n as f32 / rate;
            (2.0 * PI * (start_hz * t + slope * t * t / 2.0)).sin()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeakKind {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct Peak {
    pos: usize,
    kind: PeakKind,
}

/// Linear-chirp demodulator.
///
/// Unlike the BPSK and FSK paths there is no flat bit stream to hand to a
/// word synchronizer: framing lives in the correlator domain. The preamble
/// is the peak sequence Up, Up, Down, Down at one-symbol spacing, and every
/// payload symbol is re-centered inside a ±[`SYMBOL_TOLERANCE`] window,
/// which rides out sender/receiver clock drift.
///
/// Up/down classification compares correlation magnitudes, so a capture
/// with inverted polarity decodes to the same bits.
pub struct ChirpDemodulator {
    up: Vec<f32>,
    down: Vec<f32>,
}

impl ChirpDemodulator {
    pub fn new() -> Self {
        Self {
            up: sweep(CHIRP_LOW_HZ, CHIRP_HIGH_HZ, CHIRP_SYMBOL_SAMPLES),
            down: sweep(CHIRP_HIGH_HZ, CHIRP_LOW_HZ, CHIRP_SYMBOL_SAMPLES),
        }
    }

    pub fn samples_per_symbol(&self) -> usize {
        CHIRP_SYMBOL_SAMPLES
    }

    fn correlate(&self, window: &[f32], pos: usize) -> Option<(f32, f32)> {
        let end = pos.checked_add(CHIRP_SYMBOL_SAMPLES)?;
        if end > window.len() {
            return None;
        }
        let slice = &window[pos..end];
        let up = slice.iter().zip(&self.up).map(|(s, t)| s * t).sum();
        let down = slice.iter().zip(&self.down).map(|(s, t)| s * t).sum();
        Some((up, down))
    }

    /// Scan the whole window for correlation peaks above the noise floor.
    fn find_peaks(&self, window: &[f32]) -> Vec<Peak> {
        let mut series = Vec::new();
        let mut pos = 0;
        while let Some((up, down)) = self.correlate(window, pos) {
            let (score, kind) = if up.abs() >= down.abs() {
                (up.abs(), PeakKind::Up)
            } else {
                (down.abs(), PeakKind::Down)
            };
            series.push((pos, score, kind));
            pos += CORRELATOR_STEP;
        }

        let mut peaks = Vec::new();
        for i in 1..series.len().saturating_sub(1) {
            let (pos, score, kind) = series[i];
            if score > PEAK_THRESHOLD && score > series[i - 1].1 && score >= series[i + 1].1 {
                peaks.push(Peak { pos, kind });
            }
        }
        peaks
    }

    /// Locate the Up, Up, Down, Down preamble. Returns the sample index of
    /// the symbol immediately following the fourth preamble peak.
    fn find_preamble(&self, peaks: &[Peak]) -> Option<usize> {
        const PATTERN: [PeakKind; 4] = [PeakKind::Up, PeakKind::Up, PeakKind::Down, PeakKind::Down];
        let min_gap = CHIRP_SYMBOL_SAMPLES - SYMBOL_TOLERANCE;
        let max_gap = CHIRP_SYMBOL_SAMPLES + SYMBOL_TOLERANCE;

        'candidates: for quad in peaks.windows(4) {
            for (peak, &expected) in quad.iter().zip(PATTERN.iter()) {
                if peak.kind != expected {
                    continue 'candidates;
                }
            }
            for pair in quad.windows(2) {
                let gap = pair[1].pos - pair[0].pos;
                if !(min_gap..=max_gap).contains(&gap) {
                    continue 'candidates;
                }
            }
            return Some(quad[3].pos + CHIRP_SYMBOL_SAMPLES);
        }
        None
    }

    /// Read one payload symbol near `cursor`: take the stronger of the two
    /// template correlations over a ±tolerance search, and report the peak
    /// position actually chosen so the caller can re-center.
    fn read_symbol(&self, window: &[f32], cursor: usize) -> Option<(SoftBit, usize)> {
        let from = cursor.saturating_sub(SYMBOL_TOLERANCE);
        let to = cursor + SYMBOL_TOLERANCE;

        let mut best: Option<(f32, SoftBit, usize)> = None;
        let mut pos = from;
        while pos <= to {
            if let Some((up, down)) = self.correlate(window, pos) {
                let (score, bit) = if up.abs() >= down.abs() {
                    (up.abs(), SoftBit::One)
                } else {
                    (down.abs(), SoftBit::Zero)
                };
                if best.map_or(true, |(s, _, _)| score > s) {
                    best = Some((score, bit, pos));
                }
            }
            pos += CORRELATOR_STEP;
        }

        best.map(|(_, bit, pos)| (bit, pos))
    }

    /// Synchronize against the preamble and read every payload symbol the
    /// window still holds. Returns the bit stream starting at the length
    /// field, or `None` when no preamble is present.
    pub fn recover_bits(&self, window: &[f32]) -> Option<Vec<SoftBit>> {
        let peaks = self.find_peaks(window);
        let start = self.find_preamble(&peaks)?;

        let mut bits = Vec::new();
        let mut cursor = start;
        while let Some((bit, peak_pos)) = self.read_symbol(window, cursor) {
            bits.push(bit);
            cursor = peak_pos + CHIRP_SYMBOL_SAMPLES;
        }
        Some(bits)
    }
}

impl Default for ChirpDemodulator {
    fn default() -> Self {
        Self::new()
    }
}
