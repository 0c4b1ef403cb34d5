use crate::bits::SoftBit;
use crate::filter::Biquad;
use crate::SAMPLE_RATE;
use std::f32::consts::PI;

/// 31-element spreading sequence shared by every DSSS profile.
///
/// Barker-like: strong autocorrelation peak, low sidelobes, which is what
/// lets the integrate-and-dump stage double as the low-pass filter.
pub const SPREAD_CHIPS: [i8; 31] = [
    1, 1, 1, 1, 1, -1, -1, 1, 1, -1, 1, -1, -1, 1, 1, 1, 1, 1, -1, -1, 1, 1, -1, 1, -1, 1, -1, -1,
    -1, -1, -1,
];

/// Samples per chip for the standard covert profile.
pub const CHIP_SAMPLES: usize = 4;

/// Samples per chip for the heavy-duty profile.
pub const CHIP_SAMPLES_HEAVY: usize = 20;

/// Symbol length of the unspread burst profile.
pub const BURST_SYMBOL_SAMPLES: usize = 8;

/// Fixed carrier of the heavy-duty profile.
pub const HEAVY_CARRIER_HZ: f32 = 14_500.0;

/// Band-pass width of the heavy-duty front end.
const HEAVY_BANDWIDTH_HZ: f32 = 2_000.0;

/// Spreading profile for the BPSK family of waveforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsssMode {
    /// Barker-31 spreading, 4 samples per chip, scannable carrier pool.
    Covert,
    /// No spreading; 8-sample symbols, sign of the integrated baseband.
    Burst,
    /// Barker-31 spreading, 20 samples per chip, fixed 14.5 kHz carrier
    /// behind a band-pass biquad.
    HeavyDuty,
}

/// DSSS/BPSK demodulator. Converts an audio window into a raw bit stream
/// and nothing else; it never fails, and a window with no signal in it just
/// yields bits the synchronizer will not match.
pub struct DsssDemodulator {
    mode: DsssMode,
    /// Chip sequence replicated to sample rate, dotted against each symbol
    /// slot. Empty for the burst profile.
    template: Vec<f32>,
}

impl DsssDemodulator {
    pub fn new(mode: DsssMode) -> Self {
        let template = match mode {
            DsssMode::Covert => spread_template(CHIP_SAMPLES),
            DsssMode::HeavyDuty => spread_template(CHIP_SAMPLES_HEAVY),
            DsssMode::Burst => Vec::new(),
        };
        Self { mode, template }
    }

    pub fn mode(&self) -> DsssMode {
        self.mode
    }

    pub fn samples_per_symbol(&self) -> usize {
        match self.mode {
            DsssMode::Covert => SPREAD_CHIPS.len() * CHIP_SAMPLES,
            DsssMode::Burst => BURST_SYMBOL_SAMPLES,
            DsssMode::HeavyDuty => SPREAD_CHIPS.len() * CHIP_SAMPLES_HEAVY,
        }
    }

    /// Hamming-distance budget for the sync search on this profile.
    pub fn sync_tolerance(&self) -> u32 {
        match self.mode {
            DsssMode::HeavyDuty => 2,
            _ => 0,
        }
    }

    /// Symbol cap on the sync search.
    pub fn search_depth(&self) -> usize {
        match self.mode {
            DsssMode::HeavyDuty => 5000,
            _ => 2000,
        }
    }

    /// Demodulate one window at the given carrier.
    ///
    /// Mixes with a real cosine and decides each symbol slot by the sign of
    /// its dot product with the spread template (or of its plain integral
    /// for the burst profile). The spreading correlation provides the
    /// low-pass behavior, so no explicit filter follows the mixer.
    pub fn demodulate(&self, window: &[f32], carrier_hz: f32) -> Vec<SoftBit> {
        let filtered;
        let input = match self.mode {
            DsssMode::HeavyDuty => {
                filtered = Biquad::filter(
                    HEAVY_CARRIER_HZ,
                    HEAVY_BANDWIDTH_HZ,
                    SAMPLE_RATE as f32,
                    window,
                );
                &filtered[..]
            }
            _ => window,
        };

        let w = 2.0 * PI * carrier_hz / SAMPLE_RATE as f32;
        let baseband: Vec<f32> = input
            .iter()
            .enumerate()
            .map(|(n, &s)| s * (w * n as f32).cos())
            .collect();

        let sps = self.samples_per_symbol();
        let mut bits = Vec::with_capacity(baseband.len() / sps);

        for slot in baseband.chunks_exact(sps) {
            let metric = if self.template.is_empty() {
                slot.iter().sum()
            } else {
                slot.iter()
                    .zip(self.template.iter())
                    .map(|(s, t)| s * t)
                    .sum::<f32>()
            };
            bits.push(SoftBit::from_sign(metric));
        }

        bits
    }
}

fn spread_template(chip_samples: usize) -> Vec<f32> {
    let mut template = Vec::with_capacity(SPREAD_CHIPS.len() * chip_samples);
    for &chip in SPREAD_CHIPS.iter() {
        for _ in 0..chip_samples {
            template.push(chip as f32);
        }
    }
    template
}
