use crate::bits::SoftBit;
use crate::chirp::ChirpDemodulator;
use crate::dsss::{DsssDemodulator, DsssMode, HEAVY_CARRIER_HZ};
use crate::error::{DecodeError, Result};
use crate::fsk::FskDemodulator;
use crate::sync::{find_sync, sync_pattern};
use crate::{CARRIER_POOL_HZ, DEFAULT_CARRIER_HZ, SYNC_WORD, SYNC_WORD_BITS, SYNC_WORD_SHORT, SYNC_WORD_SHORT_BITS};
use tracing::debug;

/// One of the interchangeable physical layers. All variants share a single
/// downstream contract: turn an audio window into the bit stream starting
/// at the link-layer length field, or report that no frame is present.
pub enum Waveform {
    Dsss {
        demod: DsssDemodulator,
        carrier_hz: f32,
        pattern: Vec<bool>,
    },
    Fsk {
        demod: FskDemodulator,
        pattern: Vec<bool>,
    },
    Chirp(ChirpDemodulator),
}

impl Waveform {
    /// Standard spread-spectrum profile ("covert").
    pub fn covert() -> Self {
        Self::dsss(DsssMode::Covert)
    }

    /// Unspread BPSK profile ("burst").
    pub fn burst() -> Self {
        Self::dsss(DsssMode::Burst)
    }

    /// Heavy-duty spread profile with the band-pass front end.
    pub fn heavy_duty() -> Self {
        Self::dsss(DsssMode::HeavyDuty)
    }

    /// 2-FSK profile ("screecher").
    pub fn screecher() -> Self {
        Waveform::Fsk {
            demod: FskDemodulator::new(),
            pattern: sync_pattern(SYNC_WORD_SHORT as u32, SYNC_WORD_SHORT_BITS),
        }
    }

    /// Linear-chirp profile ("dolphin").
    pub fn dolphin() -> Self {
        Waveform::Chirp(ChirpDemodulator::new())
    }

    fn dsss(mode: DsssMode) -> Self {
        let carrier_hz = match mode {
            DsssMode::HeavyDuty => HEAVY_CARRIER_HZ,
            _ => DEFAULT_CARRIER_HZ,
        };
        Waveform::Dsss {
            demod: DsssDemodulator::new(mode),
            carrier_hz,
            pattern: sync_pattern(SYNC_WORD, SYNC_WORD_BITS),
        }
    }

    /// Switch the BPSK family between spreading and burst symbols.
    /// No-op for the FSK and chirp profiles.
    pub fn set_dsss_mode(&mut self, mode: DsssMode) {
        if let Waveform::Dsss { demod, .. } = self {
            if demod.mode() != mode {
                *demod = DsssDemodulator::new(mode);
            }
        }
    }

    /// Override the DSSS carrier. No-op for the FSK and chirp profiles.
    pub fn set_carrier(&mut self, hz: f32) {
        if let Waveform::Dsss { carrier_hz, .. } = self {
            *carrier_hz = hz;
        }
    }

    /// Demodulate, synchronize and return the polarity-corrected bit stream
    /// starting at the length field.
    ///
    /// With `auto_scan`, the standard DSSS profiles try each carrier in the
    /// pool in order until one of them syncs; the heavy-duty profile always
    /// stays on its fixed carrier.
    pub fn recover_frame_bits(&self, window: &[f32], auto_scan: bool) -> Result<Vec<SoftBit>> {
        match self {
            Waveform::Dsss {
                demod,
                carrier_hz,
                pattern,
            } => {
                let scan_pool = auto_scan && demod.mode() != DsssMode::HeavyDuty;
                let carriers: &[f32] = if scan_pool {
                    &CARRIER_POOL_HZ
                } else {
                    std::slice::from_ref(carrier_hz)
                };

                for &carrier in carriers {
                    let bits = demod.demodulate(window, carrier);
                    let found = find_sync(
                        &bits,
                        pattern,
                        1,
                        demod.sync_tolerance(),
                        demod.search_depth(),
                    );
                    if let Some(m) = found {
                        debug!(carrier, offset = m.offset, inverted = m.inverted, "sync acquired");
                        return Ok(post_sync(&bits, m.offset + pattern.len(), 1, m.inverted));
                    }
                }
                Err(DecodeError::NoSignal)
            }

            Waveform::Fsk { demod, pattern } => {
                let bits = demod.demodulate(window);
                let os = demod.oversample();
                let m = find_sync(&bits, pattern, os, demod.sync_tolerance(), demod.search_depth())
                    .ok_or(DecodeError::NoSignal)?;
                debug!(offset = m.offset, inverted = m.inverted, "FSK sync acquired");
                Ok(post_sync(&bits, m.offset + pattern.len() * os, os, m.inverted))
            }

            Waveform::Chirp(demod) => {
                let bits = demod.recover_bits(window).ok_or(DecodeError::NoSignal)?;
                debug!(symbols = bits.len(), "chirp preamble acquired");
                Ok(bits)
            }
        }
    }
}

/// Slice off everything before `start`, undo oversampling and polarity.
fn post_sync(bits: &[SoftBit], start: usize, oversample: usize, inverted: bool) -> Vec<SoftBit> {
    bits[start..]
        .iter()
        .step_by(oversample)
        .map(|&b| if inverted { b.invert() } else { b })
        .collect()
}
