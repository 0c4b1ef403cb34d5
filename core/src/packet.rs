use crate::error::{DecodeError, Result};
use serde::{Deserialize, Serialize};

/// Offset of the JSON body inside the plaintext packet:
/// `type(1) ‖ signature(64) ‖ utf8 json`.
const BODY_OFFSET: usize = 65;

/// Length of the reserved signature slot.
pub const SIGNATURE_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Text,
    Location,
    File,
    Image,
    Ack,
}

impl MessageType {
    /// Wire type byte to message type; anything unrecognized reads as text.
    fn from_byte(byte: u8) -> Self {
        match byte {
            0x02 => MessageType::Location,
            0x03 => MessageType::File,
            0x04 => MessageType::Image,
            0x05 => MessageType::Ack,
            _ => MessageType::Text,
        }
    }
}

/// Urgency tiers, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Routine,
    Priority,
    Immediate,
    Flash,
}

impl Priority {
    fn from_label(label: &str) -> Self {
        match label {
            "PRIORITY" => Priority::Priority,
            "IMMEDIATE" => Priority::Immediate,
            "FLASH" => Priority::Flash,
            _ => Priority::Routine,
        }
    }

    /// Presentation hint only; nothing in the decode path depends on it.
    pub fn color_hint(&self) -> &'static str {
        match self {
            Priority::Routine => "#a0a0b8",
            Priority::Priority => "#00d4ff",
            Priority::Immediate => "#ffb000",
            Priority::Flash => "#ff3355",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Error,
}

/// The decoded message as delivered to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    pub content: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub verified: bool,
    pub status: Status,
}

impl MessageRecord {
    /// An ERROR-status record carrying a short reason as its content.
    pub fn error(content: &str) -> Self {
        Self {
            content: content.to_string(),
            priority: Priority::Routine,
            msg_type: MessageType::Text,
            filename: None,
            verified: false,
            status: Status::Error,
        }
    }
}

/// Recognized keys of the JSON body. Unknown keys are ignored.
#[derive(Deserialize)]
struct PacketBody {
    /// Priority label.
    p: Option<String>,
    /// Text content.
    m: Option<String>,
    /// Filename for FILE/IMAGE messages.
    f: Option<String>,
    /// Base64 binary payload; decoding it is the inbox's job, not ours.
    #[allow(dead_code)]
    d: Option<String>,
}

/// Unwrap an authenticated plaintext packet into a message record.
///
/// `verify_key`, when configured (and the `ed25519-signatures` feature is
/// enabled), is used to check the 64-byte signature slot over the JSON
/// body. Without it a signed packet is still delivered, just with
/// `verified = false`.
pub fn unwrap_packet(plaintext: &[u8], verify_key: Option<&[u8; 32]>) -> Result<MessageRecord> {
    if plaintext.len() < BODY_OFFSET {
        return Err(DecodeError::MalformedPlaintext("Invalid packet"));
    }

    let msg_type = MessageType::from_byte(plaintext[0]);
    let signature = &plaintext[1..BODY_OFFSET];
    let body = &plaintext[BODY_OFFSET..];
    let signed = signature.iter().any(|&b| b != 0);

    if signed && verify_key.is_none() {
        tracing::debug!("packet carries a signature but no verifying key is configured");
    }

    #[allow(unused_mut)]
    let mut verified = false;
    #[cfg(feature = "ed25519-signatures")]
    if signed {
        if let Some(key_bytes) = verify_key {
            verified = verify_signature(key_bytes, signature, body);
        }
    }

    let parsed: PacketBody = serde_json::from_slice(body)
        .map_err(|_| DecodeError::MalformedPlaintext("JSON parse failed"))?;

    let priority = Priority::from_label(parsed.p.as_deref().unwrap_or(""));
    let (content, filename) = match msg_type {
        MessageType::File | MessageType::Image => {
            let name = parsed.f.clone();
            (
                format!("File: {}", name.as_deref().unwrap_or("unknown")),
                name,
            )
        }
        _ => (parsed.m.unwrap_or_default(), None),
    };

    Ok(MessageRecord {
        content,
        priority,
        msg_type,
        filename,
        verified,
        status: Status::Ok,
    })
}

#[cfg(feature = "ed25519-signatures")]
fn verify_signature(key_bytes: &[u8; 32], signature: &[u8], body: &[u8]) -> bool {
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    let Ok(key) = VerifyingKey::from_bytes(key_bytes) else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
        return false;
    };
    key.verify(body, &Signature::from_bytes(&sig_bytes)).is_ok()
}
