use crate::error::{DecodeError, Result};
use crate::fec;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use crypto_secretbox::XSalsa20Poly1305;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// ChaCha20-Poly1305 nonce length; both recognized envelopes consume this
/// many leading bytes.
pub const NONCE_LEN: usize = 12;

/// Poly1305 tag length.
pub const TAG_LEN: usize = 16;

/// Extended nonce length of the secretbox fallback.
const XNONCE_LEN: usize = 24;

/// Reference-compatible default key. Explicitly insecure; kept so that
/// transmissions from the reference sender decrypt out of the box until
/// the operator installs a real key.
pub const DEFAULT_KEY: &[u8; 32] = b"01234567890123456789012345678901";

/// Preshared 32-byte symmetric key, cleared from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PresharedKey([u8; 32]);

impl PresharedKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Default for PresharedKey {
    fn default() -> Self {
        Self(*DEFAULT_KEY)
    }
}

impl std::fmt::Debug for PresharedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PresharedKey(..)")
    }
}

/// Authenticated decryption of one sealed blob laid out as
/// `nonce(12) ‖ ciphertext ‖ tag(16)`.
///
/// ChaCha20-Poly1305 is the sender's canonical format; XSalsa20-Poly1305
/// secretbox is a legacy compatibility path tried second, with the same 12
/// nonce bytes left-padded with zeros to 24. A tag failure yields
/// [`DecodeError::AuthFailure`] and no plaintext bytes ever leave this
/// function on that path.
pub fn unseal(blob: &[u8], key: &PresharedKey) -> Result<Vec<u8>> {
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(DecodeError::CorruptData);
    }

    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);

    let primary = ChaCha20Poly1305::new(key.as_bytes().into());
    if let Ok(plaintext) = primary.decrypt(Nonce::from_slice(nonce), ciphertext) {
        return Ok(plaintext);
    }

    let mut xnonce = [0u8; XNONCE_LEN];
    xnonce[XNONCE_LEN - NONCE_LEN..].copy_from_slice(nonce);
    let fallback = XSalsa20Poly1305::new(key.as_bytes().into());
    if let Ok(plaintext) = fallback.decrypt(crypto_secretbox::Nonce::from_slice(&xnonce), ciphertext)
    {
        debug!("sealed blob opened via secretbox compatibility path");
        return Ok(plaintext);
    }

    Err(DecodeError::AuthFailure)
}

/// Open a link-layer payload that may carry trailing RS parity.
///
/// The sender's parity is configuration-dependent, so the blob is tried
/// as-is first; only when that fails and the blob is long enough is the
/// 32-byte tail stripped and the remainder retried. The error of the
/// untouched attempt wins when both fail.
pub fn open_payload(blob: &[u8], key: &PresharedKey) -> Result<Vec<u8>> {
    match unseal(blob, key) {
        Ok(plaintext) => Ok(plaintext),
        Err(first) => match fec::strip_parity(blob) {
            Some(stripped) => unseal(&stripped, key).map_err(|_| first),
            None => Err(first),
        },
    }
}
