use reed_solomon_erasure::galois_8::Field;
use reed_solomon_erasure::ReedSolomon;
use tracing::debug;

/// Trailing Reed-Solomon parity bytes some senders append inside the
/// link-layer payload.
pub const PARITY_BYTES: usize = 32;

/// Strip the optional trailing RS parity from a sealed blob.
///
/// Whether the sender appended parity at all is configuration-dependent,
/// so the caller tries the blob as-is first and only falls back to the
/// stripped form (see the receiver's unseal path). When the blob is long
/// enough to carry parity, the parity is checked over 1-byte shards; a
/// mismatch is logged but the data bytes still pass through, since the
/// check cannot distinguish "corrupt parity" from "sender never appended
/// parity". Erasure codes cannot correct errors at unknown positions, so
/// no correction is attempted.
pub fn strip_parity(blob: &[u8]) -> Option<Vec<u8>> {
    if blob.len() <= PARITY_BYTES {
        return None;
    }

    let data_len = blob.len() - PARITY_BYTES;
    match ReedSolomon::<Field>::new(data_len, PARITY_BYTES) {
        Ok(rs) => {
            let shards: Vec<Vec<u8>> = blob.iter().map(|&b| vec![b]).collect();
            match rs.verify(&shards) {
                Ok(true) => debug!(data_len, "trailing RS parity verified"),
                Ok(false) => debug!(data_len, "trailing bytes are not RS parity, stripping anyway"),
                Err(e) => debug!(error = %e, "RS verify failed, stripping anyway"),
            }
        }
        Err(e) => debug!(error = %e, "RS geometry rejected, stripping anyway"),
    }

    Some(blob[..data_len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_blob_passes_through() {
        assert_eq!(strip_parity(&[0u8; 32]), None);
        assert_eq!(strip_parity(&[0u8; 5]), None);
    }

    #[test]
    fn test_strip_removes_exactly_32_bytes() {
        let blob: Vec<u8> = (0..100u8).collect();
        let stripped = strip_parity(&blob).unwrap();
        assert_eq!(stripped.len(), 68);
        assert_eq!(stripped, blob[..68]);
    }

    #[test]
    fn test_real_parity_verifies_and_strips() {
        let data = b"authenticated ciphertext bytes";
        let rs = ReedSolomon::<Field>::new(data.len(), PARITY_BYTES).unwrap();
        let mut shards: Vec<Vec<u8>> = data
            .iter()
            .map(|&b| vec![b])
            .chain(std::iter::repeat(vec![0u8]).take(PARITY_BYTES))
            .collect();
        rs.encode(&mut shards).unwrap();
        let blob: Vec<u8> = shards.into_iter().flatten().collect();

        let stripped = strip_parity(&blob).unwrap();
        assert_eq!(stripped, data);
    }

    #[test]
    fn test_zero_parity_still_strips() {
        // A sender that pads 32 zero bytes is handled the same way.
        let mut blob = b"nonce and ciphertext go here".to_vec();
        let data = blob.clone();
        blob.extend([0u8; PARITY_BYTES]);

        assert_eq!(strip_parity(&blob).unwrap(), data);
    }
}
