//! Library entry for echolock-cli used by integration tests and embedding.

use base64::Engine;
use echolock_core::resample::{stereo_to_mono, to_native_rate};
use echolock_core::{MessageRecord, Mode, Receiver, Waveform};
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod server;

/// Physical-layer selection as spelled on the command line and in decode
/// requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformArg {
    /// DSSS/BPSK with Barker-31 spreading (default)
    Covert,
    /// Plain BPSK, short symbols
    Burst,
    /// 2-FSK at 14.0/14.2 kHz
    Screecher,
    /// Linear chirp sweeps, 14-17 kHz
    Dolphin,
    /// Heavy-duty DSSS behind a band-pass front end
    Heavy,
}

impl WaveformArg {
    pub fn build(self) -> Waveform {
        match self {
            WaveformArg::Covert => Waveform::covert(),
            WaveformArg::Burst => Waveform::burst(),
            WaveformArg::Screecher => Waveform::screecher(),
            WaveformArg::Dolphin => Waveform::dolphin(),
            WaveformArg::Heavy => Waveform::heavy_duty(),
        }
    }
}

/// Parse a 32-ASCII-character preshared key.
pub fn parse_key(key: &str) -> Result<[u8; 32], String> {
    let bytes = key.as_bytes();
    if bytes.len() != 32 {
        return Err(format!("key must be exactly 32 bytes, got {}", bytes.len()));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Assemble a configured receiver from the request surface.
pub fn build_receiver(
    waveform: WaveformArg,
    carrier: Option<f32>,
    auto_scan: bool,
    key: Option<&str>,
) -> Result<Receiver, String> {
    let mut receiver = Receiver::new(waveform.build());
    if let Some(hz) = carrier {
        receiver.set_carrier(hz);
    }
    receiver.set_auto_scan(auto_scan);
    if let Some(key) = key {
        receiver.set_key(parse_key(key)?);
    }
    // covert/burst are DSSS sub-modes of the same receiver
    if waveform == WaveformArg::Burst {
        receiver.set_mode(Mode::Burst);
    }
    Ok(receiver)
}

/// Read any WAV hound understands into mono f32 at the pipeline's native
/// rate. Stereo is mixed down; 16/24/32-bit integer and 32-bit float
/// formats are accepted.
pub fn read_wav<R: std::io::Read>(reader: R) -> Result<Vec<f32>, String> {
    let mut wav = hound::WavReader::new(reader).map_err(|e| e.to_string())?;
    let spec = wav.spec();
    info!(
        rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        "reading WAV capture"
    );

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => wav
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| e.to_string())?,
        (hound::SampleFormat::Int, 16) => wav
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<Result<_, _>>()
            .map_err(|e| e.to_string())?,
        (hound::SampleFormat::Int, bits) if bits <= 32 => {
            let scale = (1i64 << (bits - 1)) as f32;
            wav.samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| e.to_string())?
        }
        (format, bits) => return Err(format!("unsupported WAV format: {format:?} {bits}-bit")),
    };

    let mono = match spec.channels {
        1 => samples,
        2 => stereo_to_mono(&samples),
        n => return Err(format!("unsupported channel count: {n}")),
    };

    Ok(to_native_rate(&mono, spec.sample_rate))
}

/// One HTTP decode request: a base64 WAV plus receiver settings.
#[derive(Deserialize)]
pub struct DecodeRequest {
    pub wav_base64: String,
    #[serde(default = "default_waveform")]
    pub waveform: WaveformArg,
    #[serde(default)]
    pub carrier: Option<f32>,
    #[serde(default)]
    pub auto_scan: bool,
    #[serde(default)]
    pub key: Option<String>,
}

fn default_waveform() -> WaveformArg {
    WaveformArg::Covert
}

#[derive(Serialize)]
pub struct DecodeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<MessageRecord>,
}

/// Decode one request end to end. Shared by the HTTP handler and tests.
pub fn decode_request(req: &DecodeRequest) -> DecodeResponse {
    let failure = |message: String| DecodeResponse {
        success: false,
        message,
        record: None,
    };

    let wav_bytes = match base64::engine::general_purpose::STANDARD.decode(&req.wav_base64) {
        Ok(bytes) => bytes,
        Err(e) => return failure(format!("Invalid base64: {e}")),
    };

    let samples = match read_wav(std::io::Cursor::new(wav_bytes)) {
        Ok(samples) => samples,
        Err(e) => return failure(format!("Invalid WAV: {e}")),
    };

    let receiver = match build_receiver(req.waveform, req.carrier, req.auto_scan, req.key.as_deref())
    {
        Ok(receiver) => receiver,
        Err(e) => return failure(e),
    };

    match receiver.decode_window(&samples) {
        Some(record) => DecodeResponse {
            success: true,
            message: "Decoded".to_string(),
            record: Some(record),
        },
        None => DecodeResponse {
            success: false,
            message: "No message found".to_string(),
            record: None,
        },
    }
}
