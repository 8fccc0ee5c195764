use std::io;
use thiserror::Error;

/// The bytes are not a valid filter file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Fewer bytes than a full header.
    #[error("truncated header: {found} of {expected} bytes")]
    TruncatedHeader { expected: usize, found: usize },

    /// The leading bytes are not the filter magic.
    #[error("bad magic: {found:02x?}")]
    BadMagic { found: Vec<u8> },

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    /// A header field holds a value no filter can have.
    #[error("invalid header field {field}: {reason}")]
    InvalidHeader { field: &'static str, reason: String },

    #[error("truncated body: expected {expected} bytes, found {found}")]
    TruncatedBody { expected: u64, found: u64 },

    #[error("oversized body: expected {expected} bytes, found {found}")]
    OversizedBody { expected: u64, found: u64 },
}

/// Errors from encoding, decoding, saving or loading a filter.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// An underlying I/O error, passed through unchanged.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Returns the format error, if that is what this is.
    #[must_use]
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            CodecError::Format(e) => Some(e),
            CodecError::Io(_) => None,
        }
    }
}
