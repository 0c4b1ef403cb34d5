use crate::bits::{majority, SoftBit};
use crate::error::{DecodeError, Result};
use crate::MAX_PAYLOAD_BYTES;

/// Extract the link-layer payload from a bit stream positioned at the
/// length field (sync word already consumed, polarity already corrected,
/// oversampling already removed).
///
/// Layout: 16-bit MSB-first byte count `L`, then three full copies of the
/// `8·L` payload bits. The copies are reduced bit-by-bit with a 2-of-3
/// majority vote, which rides out one bad copy at any position.
///
/// The length is validated against [`MAX_PAYLOAD_BYTES`] before anything
/// proportional to it is allocated.
pub fn extract_payload(bits: &[SoftBit]) -> Result<Vec<u8>> {
    if bits.len() < 16 {
        return Err(DecodeError::MalformedFrame);
    }

    let mut length = 0usize;
    for &bit in &bits[..16] {
        length = (length << 1) | bit.hard() as usize;
    }

    if length == 0 || length > MAX_PAYLOAD_BYTES {
        return Err(DecodeError::MalformedFrame);
    }

    let payload_bits = length * 8;
    if bits.len() < 16 + payload_bits * 3 {
        return Err(DecodeError::MalformedFrame);
    }

    let copy1 = &bits[16..16 + payload_bits];
    let copy2 = &bits[16 + payload_bits..16 + 2 * payload_bits];
    let copy3 = &bits[16 + 2 * payload_bits..16 + 3 * payload_bits];

    let mut bytes = Vec::with_capacity(length);
    for byte_idx in 0..length {
        let mut byte = 0u8;
        for bit_idx in 0..8 {
            let i = byte_idx * 8 + bit_idx;
            byte = (byte << 1) | majority(copy1[i], copy2[i], copy3[i]);
        }
        bytes.push(byte);
    }

    Ok(bytes)
}
