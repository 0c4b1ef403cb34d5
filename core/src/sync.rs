use crate::bits::SoftBit;

/// Where a sync word matched, and with which carrier polarity.
///
/// `offset` indexes the raw (possibly oversampled) bit stream at the first
/// bit of the sync word. `inverted` means the match was against the
/// bitwise-NOT pattern: the carrier phase is flipped and every subsequent
/// bit must be negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMatch {
    pub offset: usize,
    pub inverted: bool,
}

/// Expand a sync word into MSB-first pattern bits.
pub fn sync_pattern(word: u32, bits: usize) -> Vec<bool> {
    (0..bits).map(|i| word >> (bits - 1 - i) & 1 == 1).collect()
}

/// Scan a bit stream for the sync pattern, tolerating up to `tolerance`
/// mismatched stream positions and a fully inverted carrier.
///
/// `oversample` stretches the pattern across the stream: each pattern bit
/// is expected at `oversample` consecutive stream positions (the FSK
/// stream runs at twice the bit rate). The tolerance budget is spent on
/// the stream as scanned, oversampling included. `max_depth` caps the
/// search in symbols, so a long window of noise costs bounded work.
///
/// Absence of sync is an ordinary outcome, not an error.
pub fn find_sync(
    bits: &[SoftBit],
    pattern: &[bool],
    oversample: usize,
    tolerance: u32,
    max_depth: usize,
) -> Option<SyncMatch> {
    let span = pattern.len() * oversample;
    if bits.len() < span {
        return None;
    }

    let limit = (bits.len() - span).min(max_depth * oversample);
    for offset in 0..limit {
        let mut distance = 0u32;
        let mut distance_inv = 0u32;

        for (i, &expected) in pattern.iter().enumerate() {
            for k in 0..oversample {
                let bit = bits[offset + i * oversample + k];
                if !bit.matches(expected) {
                    distance += 1;
                }
                if !bit.matches(!expected) {
                    distance_inv += 1;
                }
            }
        }

        if distance <= tolerance {
            return Some(SyncMatch {
                offset,
                inverted: false,
            });
        }
        if distance_inv <= tolerance {
            return Some(SyncMatch {
                offset,
                inverted: true,
            });
        }
    }

    None
}
