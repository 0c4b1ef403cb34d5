//! Reference sender used by the integration tests: seals a packet, frames
//! it with the link-layer redundancy, and modulates it with each waveform.

// each test binary uses its own subset of the reference sender
#![allow(dead_code)]

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use echolock_core::chirp::{CHIRP_HIGH_HZ, CHIRP_LOW_HZ, CHIRP_SYMBOL_SAMPLES};
use echolock_core::dsss::{BURST_SYMBOL_SAMPLES, SPREAD_CHIPS};
use echolock_core::fsk::{FSK_MARK_HZ, FSK_SPACE_HZ, FSK_SYMBOL_SAMPLES};
use echolock_core::{SAMPLE_RATE, SYNC_WORD, SYNC_WORD_SHORT};
use std::f32::consts::PI;

pub const TEST_NONCE: [u8; 12] = [0x42; 12];

/// Build the plaintext packet `type ‖ signature(64) ‖ json` and seal it
/// with ChaCha20-Poly1305 under the given key.
pub fn seal_packet(type_byte: u8, json: &str, key: &[u8; 32]) -> Vec<u8> {
    let mut plaintext = vec![type_byte];
    plaintext.extend([0u8; 64]);
    plaintext.extend(json.as_bytes());

    let cipher = ChaCha20Poly1305::new(key.into());
    let mut blob = TEST_NONCE.to_vec();
    blob.extend(
        cipher
            .encrypt(Nonce::from_slice(&TEST_NONCE), plaintext.as_slice())
            .unwrap(),
    );
    blob
}

fn push_word(bits: &mut Vec<u8>, word: u32, width: usize) {
    for i in (0..width).rev() {
        bits.push((word >> i & 1) as u8);
    }
}

/// Length field plus three copies of the payload bits, MSB first.
pub fn body_bits(payload: &[u8]) -> Vec<u8> {
    let mut bits = Vec::new();
    push_word(&mut bits, payload.len() as u32, 16);
    for _ in 0..3 {
        for &byte in payload {
            push_word(&mut bits, byte as u32, 8);
        }
    }
    bits
}

/// Full link-layer frame for the DSSS waveforms: 32-bit sync then body.
pub fn frame_bits(payload: &[u8]) -> Vec<u8> {
    let mut bits = Vec::new();
    push_word(&mut bits, SYNC_WORD, 32);
    bits.extend(body_bits(payload));
    bits
}

/// Full link-layer frame for the FSK waveform: 16-bit sync then body.
pub fn frame_bits_short_sync(payload: &[u8]) -> Vec<u8> {
    let mut bits = Vec::new();
    push_word(&mut bits, SYNC_WORD_SHORT as u32, 16);
    bits.extend(body_bits(payload));
    bits
}

/// BPSK-modulate a bit stream with the spread template. The lead-in is a
/// whole number of symbols so the receiver's fixed symbol slots line up.
pub fn modulate_dsss(
    bits: &[u8],
    carrier_hz: f32,
    chip_samples: usize,
    lead_symbols: usize,
) -> Vec<f32> {
    let sps = SPREAD_CHIPS.len() * chip_samples;
    let w = 2.0 * PI * carrier_hz / SAMPLE_RATE as f32;

    let mut samples = vec![0.0f32; lead_symbols * sps];
    for &bit in bits {
        let sign = if bit == 1 { 1.0 } else { -1.0 };
        for &chip in SPREAD_CHIPS.iter() {
            for _ in 0..chip_samples {
                let n = samples.len() as f32;
                samples.push(0.5 * sign * chip as f32 * (w * n).cos());
            }
        }
    }
    samples.extend(vec![0.0f32; sps]);
    samples
}

/// Plain BPSK without spreading, 8-sample symbols.
pub fn modulate_burst(bits: &[u8], carrier_hz: f32, lead_symbols: usize) -> Vec<f32> {
    let w = 2.0 * PI * carrier_hz / SAMPLE_RATE as f32;

    let mut samples = vec![0.0f32; lead_symbols * BURST_SYMBOL_SAMPLES];
    for &bit in bits {
        let sign = if bit == 1 { 1.0 } else { -1.0 };
        for _ in 0..BURST_SYMBOL_SAMPLES {
            let n = samples.len() as f32;
            samples.push(0.5 * sign * (w * n).cos());
        }
    }
    samples.extend(vec![0.0f32; BURST_SYMBOL_SAMPLES]);
    samples
}

/// Two-tone FSK, one 50 ms tone per bit. The lead-in is a whole number of
/// half-symbol analysis windows.
pub fn modulate_fsk(bits: &[u8], lead_half_windows: usize) -> Vec<f32> {
    let half = FSK_SYMBOL_SAMPLES / 2;
    let mut samples = vec![0.0f32; lead_half_windows * half];

    for &bit in bits {
        let freq = if bit == 1 { FSK_MARK_HZ } else { FSK_SPACE_HZ };
        for _ in 0..FSK_SYMBOL_SAMPLES {
            let n = samples.len() as f32;
            samples.push(0.5 * (2.0 * PI * freq * n / SAMPLE_RATE as f32).sin());
        }
    }
    samples.extend(vec![0.0f32; FSK_SYMBOL_SAMPLES]);
    samples
}

fn chirp_symbol(bit: u8) -> Vec<f32> {
    let (start, end) = if bit == 1 {
        (CHIRP_LOW_HZ, CHIRP_HIGH_HZ)
    } else {
        (CHIRP_HIGH_HZ, CHIRP_LOW_HZ)
    };
    let rate = SAMPLE_RATE as f32;
    let duration = CHIRP_SYMBOL_SAMPLES as f32 / rate;
    let slope = (end - start) / duration;
    (0..CHIRP_SYMBOL_SAMPLES)
        .map(|n| {
            let t = n as f32 / rate;
            0.5 * (2.0 * PI * (start * t + slope * t * t / 2.0)).sin()
        })
        .collect()
}

/// Chirp transmission: Up, Up, Down, Down preamble, then one sweep per
/// body bit (no sync word; the preamble carries synchronization).
pub fn modulate_chirp(body: &[u8], lead_samples: usize) -> Vec<f32> {
    let mut samples = vec![0.0f32; lead_samples];
    for &bit in [1u8, 1, 0, 0].iter().chain(body.iter()) {
        samples.extend(chirp_symbol(bit));
    }
    samples.extend(vec![0.0f32; CHIRP_SYMBOL_SAMPLES]);
    samples
}

/// Deterministic white-ish noise from the classic LCG.
pub fn lcg_noise(len: usize, seed: u32, amplitude: f32) -> Vec<f32> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (((state >> 16) as f32 / 65536.0) - 0.5) * 2.0 * amplitude
        })
        .collect()
}
