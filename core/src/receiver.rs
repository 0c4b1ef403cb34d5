use crate::dsss::DsssMode;
use crate::error::DecodeError;
use crate::frame::extract_payload;
use crate::packet::{unwrap_packet, MessageRecord};
use crate::seal::{open_payload, PresharedKey};
use crate::waveform::Waveform;
use crate::WINDOW_SAMPLES;
use tracing::debug;

/// Spreading mode of the BPSK family, as exposed on the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// DSSS spreading (default).
    Covert,
    /// Plain BPSK, short symbols.
    Burst,
}

/// Where the receive loop currently is. Transitions are unconditional on
/// the outer schedule; a decode that finds nothing simply makes `Emitting`
/// a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Capturing,
}

type MessageCallback = Box<dyn FnMut(&MessageRecord) + Send>;

/// The receive pipeline: buffers capture chunks while listening, and every
/// time roughly two seconds have accumulated runs one decode attempt over
/// the buffered window.
///
/// Single-threaded by design. The capture side appends chunks, the decode
/// side takes the whole buffer by move, so no samples are ever shared
/// between an in-flight decode and new arrivals.
pub struct Receiver {
    waveform: Waveform,
    key: PresharedKey,
    verify_key: Option<[u8; 32]>,
    auto_scan: bool,
    phase: Phase,
    buffer: Vec<f32>,
    on_message: Option<MessageCallback>,
}

impl Receiver {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            key: PresharedKey::default(),
            verify_key: None,
            auto_scan: false,
            phase: Phase::Idle,
            buffer: Vec::new(),
            on_message: None,
        }
    }

    /// Begin buffering capture chunks. Idempotent.
    pub fn start_listening(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Capturing;
        }
    }

    /// Stop and drop any buffered samples immediately. Idempotent.
    pub fn stop_listening(&mut self) {
        self.phase = Phase::Idle;
        self.buffer.clear();
    }

    pub fn is_listening(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Select spreading vs. plain BPSK. Only meaningful on the DSSS
    /// waveforms; ignored by the FSK and chirp profiles.
    pub fn set_mode(&mut self, mode: Mode) {
        let dsss_mode = match mode {
            Mode::Covert => DsssMode::Covert,
            Mode::Burst => DsssMode::Burst,
        };
        self.waveform.set_dsss_mode(dsss_mode);
    }

    /// Scan the whole carrier pool instead of sitting on the default
    /// carrier.
    pub fn set_auto_scan(&mut self, enabled: bool) {
        self.auto_scan = enabled;
    }

    /// Override the default DSSS carrier.
    pub fn set_carrier(&mut self, hz: f32) {
        self.waveform.set_carrier(hz);
    }

    /// Install the preshared 32-byte key, replacing the reference default.
    pub fn set_key(&mut self, key: [u8; 32]) {
        self.key = PresharedKey::new(key);
    }

    /// Install a 32-byte verifying key for the packet signature slot.
    /// Verification only runs when the `ed25519-signatures` feature is
    /// compiled in; without it messages are delivered unverified.
    pub fn set_verify_key(&mut self, key: [u8; 32]) {
        self.verify_key = Some(key);
    }

    /// Consumer callback, invoked at most once per decode cycle.
    pub fn set_on_message<F>(&mut self, callback: F)
    where
        F: FnMut(&MessageRecord) + Send + 'static,
    {
        self.on_message = Some(Box::new(callback));
    }

    /// Append one capture chunk. When enough audio has accumulated, runs a
    /// decode attempt over the buffered window and returns its outcome.
    ///
    /// Chunks pushed while not listening are discarded.
    pub fn push_samples(&mut self, chunk: &[f32]) -> Option<MessageRecord> {
        if self.phase == Phase::Idle {
            return None;
        }

        self.buffer.extend_from_slice(chunk);
        if self.buffer.len() < WINDOW_SAMPLES {
            return None;
        }

        // Ownership transfer: the decode works on the taken buffer while
        // the capture side starts over empty.
        let window = std::mem::take(&mut self.buffer);
        let record = self.decode_window(&window);
        if let (Some(record), Some(callback)) = (record.as_ref(), self.on_message.as_mut()) {
            callback(record);
        }
        record
    }

    /// Decode the remainder of the buffer without waiting for a full
    /// window. Useful for file-based sources that end mid-window.
    pub fn flush(&mut self) -> Option<MessageRecord> {
        if self.buffer.is_empty() {
            return None;
        }
        let window = std::mem::take(&mut self.buffer);
        let record = self.decode_window(&window);
        if let (Some(record), Some(callback)) = (record.as_ref(), self.on_message.as_mut()) {
            callback(record);
        }
        record
    }

    /// One decode attempt over one audio window: demodulate, synchronize,
    /// extract, unseal, unwrap.
    ///
    /// `None` means nothing worth reporting was in the window (no sync, or
    /// a frame that fell apart before the crypto layer). Failures past
    /// that point surface as ERROR-status records; the listening loop
    /// never aborts on them.
    pub fn decode_window(&self, window: &[f32]) -> Option<MessageRecord> {
        let result = self
            .waveform
            .recover_frame_bits(window, self.auto_scan)
            .and_then(|bits| extract_payload(&bits))
            .and_then(|payload| open_payload(&payload, &self.key))
            .and_then(|plaintext| unwrap_packet(&plaintext, self.verify_key.as_ref()));

        match result {
            Ok(record) => Some(record),
            Err(DecodeError::NoSignal) | Err(DecodeError::MalformedFrame) => {
                debug!("window yielded no frame");
                None
            }
            Err(DecodeError::CorruptData) => Some(MessageRecord::error("Corrupt Data")),
            Err(DecodeError::AuthFailure) => Some(MessageRecord::error("Decryption failed")),
            Err(DecodeError::MalformedPlaintext(reason)) => Some(MessageRecord::error(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Status;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_listening_is_idempotent() {
        let mut receiver = Receiver::new(Waveform::covert());
        assert!(!receiver.is_listening());
        receiver.start_listening();
        receiver.start_listening();
        assert!(receiver.is_listening());
        receiver.stop_listening();
        receiver.stop_listening();
        assert!(!receiver.is_listening());
    }

    #[test]
    fn test_chunks_discarded_while_idle() {
        let mut receiver = Receiver::new(Waveform::covert());
        assert!(receiver.push_samples(&[0.0; 4096]).is_none());
        receiver.start_listening();
        receiver.push_samples(&[0.0; 4096]);
        receiver.stop_listening();
        // stop cleared the buffer; flushing finds nothing
        assert!(receiver.flush().is_none());
    }

    #[test]
    fn test_silence_emits_nothing() {
        let mut receiver = Receiver::new(Waveform::covert());
        receiver.start_listening();

        let emitted = Arc::new(AtomicUsize::new(0));
        let counter = emitted.clone();
        receiver.set_on_message(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // 3 seconds of silence crosses the window threshold once
        for _ in 0..33 {
            assert!(receiver.push_samples(&[0.0; 4096]).is_none());
        }
        assert_eq!(emitted.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_buffer_drains_after_decode() {
        let mut receiver = Receiver::new(Waveform::covert());
        receiver.start_listening();

        let chunk = vec![0.0f32; WINDOW_SAMPLES];
        receiver.push_samples(&chunk);
        // the window was consumed by the decode attempt
        assert!(receiver.flush().is_none());
    }

    #[test]
    fn test_error_record_shape() {
        let record = MessageRecord::error("Decryption failed");
        assert_eq!(record.status, Status::Error);
        assert_eq!(record.content, "Decryption failed");
        assert!(!record.verified);
    }
}
