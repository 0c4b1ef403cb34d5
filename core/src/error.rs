use thiserror::Error;

/// Everything that can go wrong between an audio window and a message record.
///
/// `NoSignal` and `MalformedFrame` are routine outcomes of listening to air
/// and are swallowed by the receiver; the remaining variants surface to the
/// consumer as ERROR-status records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no sync word found within the search cap")]
    NoSignal,

    #[error("length field out of range or bit stream truncated")]
    MalformedFrame,

    #[error("sealed blob too short for nonce and tag")]
    CorruptData,

    #[error("authentication tag verification failed")]
    AuthFailure,

    #[error("{0}")]
    MalformedPlaintext(&'static str),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
