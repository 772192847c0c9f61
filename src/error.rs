// src/error.rs
use thiserror::Error;

/// Error kinds surfaced by the codec, the write path and the HCE handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NfcError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("tag not writable")]
    NotWritable,

    #[error("message too long; tag capacity is {max_size} bytes, message is {actual_size} bytes")]
    CapacityExceeded { max_size: usize, actual_size: usize },

    #[error("tag doesn't support NDEF")]
    NoNdefSupport,

    #[error("connection failed")]
    ConnectionFailed,

    #[error("unknown instruction: {0:#04x}")]
    UnknownCommand(u8),

    #[error("invalid select target")]
    InvalidSelectTarget,

    #[error("no emulated NDEF content set")]
    UnsetEmulationContent,
}

pub type Result<T> = std::result::Result<T, NfcError>;
