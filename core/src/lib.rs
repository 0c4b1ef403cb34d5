//! Receive-only acoustic decoder for short encrypted messages.
//!
//! Captured audio goes through one of three interchangeable physical
//! layers (DSSS/BPSK, 2-FSK, linear chirp), a sync-word search that
//! tolerates carrier inversion, triple-redundancy payload extraction, and
//! authenticated decryption into a typed message record.

pub mod bits;
pub mod chirp;
pub mod dsss;
pub mod error;
pub mod fec;
pub mod filter;
pub mod frame;
pub mod fsk;
pub mod packet;
pub mod receiver;
pub mod resample;
pub mod seal;
pub mod sync;
pub mod waveform;

pub use error::{DecodeError, Result};
pub use packet::{MessageRecord, MessageType, Priority, Status};
pub use receiver::{Mode, Receiver};
pub use waveform::Waveform;

/// Capture sample rate in Hz. The pipeline assumes mono float samples in
/// [-1.0, 1.0] with no echo cancellation or gain control in front of it.
pub const SAMPLE_RATE: usize = 44_100;

/// Audio buffered per decode attempt: roughly two seconds.
pub const WINDOW_SAMPLES: usize = SAMPLE_RATE * 2;

/// Suggested capture chunk size for hosts that get to choose.
pub const RECOMMENDED_CHUNK: usize = 4096;

/// 32-bit sync word of the DSSS waveforms, transmitted MSB first.
pub const SYNC_WORD: u32 = 0x1ACF_FF1D;
pub const SYNC_WORD_BITS: usize = 32;

/// 16-bit sync word of the FSK waveform.
pub const SYNC_WORD_SHORT: u16 = 0xAACC;
pub const SYNC_WORD_SHORT_BITS: usize = 16;

/// Hard cap on the link-layer payload length, enforced before any
/// length-proportional allocation.
pub const MAX_PAYLOAD_BYTES: usize = 1024;

/// Carrier pool scanned by the standard DSSS profile when auto-scan is on.
pub const CARRIER_POOL_HZ: [f32; 11] = [
    8_000.0, 9_000.0, 10_000.0, 11_000.0, 12_000.0, 13_000.0, 14_000.0, 15_000.0, 16_000.0,
    17_000.0, 18_000.0,
];

/// Carrier used when auto-scan is off.
pub const DEFAULT_CARRIER_HZ: f32 = 12_000.0;
