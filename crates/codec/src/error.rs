//! Error kinds the codec surfaces to callers. Every variant carries enough
//! context (offending value, position) to act on without re-parsing the
//! buffer; the codec never retries and never performs I/O of its own.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlobalPackError {
    #[error("I/O error while assembling the pack buffer: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("truncated string at offset {offset}: no NUL terminator before end of buffer")]
    TruncatedString { offset: usize },

    #[error("unmappable byte 0x{byte:02x} at offset {offset}")]
    UnmappableByte { byte: u8, offset: usize },

    #[error("character {ch:?} (U+{:04X}) in string {string:?} cannot be encoded", *ch as u32)]
    UnmappableCharacter { ch: char, string: String },

    #[error("duplicate hash 0x{hash:08x} for label {label:?}")]
    DuplicateHash { hash: u32, label: String },

    #[error("unknown label {0:?}")]
    UnknownLabel(String),
}

pub type Result<T> = std::result::Result<T, GlobalPackError>;
