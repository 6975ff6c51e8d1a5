/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the codec layer.
//!
//! Every failure is a distinct, matchable variant carrying the offending
//! byte and its position where that is meaningful.

use thiserror::Error;

/// Errors raised while encoding or decoding field payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A byte above 0x7F where ASCII is required.
    #[error("non-ASCII byte 0x{byte:02X} at position {position}")]
    NonAsciiByte {
        /// The offending byte.
        byte: u8,
        /// Byte offset in the input.
        position: usize,
    },

    /// A source byte with no EBCDIC code page 037 mapping.
    #[error("byte 0x{byte:02X} at position {position} has no EBCDIC-037 mapping")]
    UnmappedByte {
        /// The offending byte.
        byte: u8,
        /// Byte offset in the input.
        position: usize,
    },

    /// A non-digit byte in a BCD encode input.
    #[error("invalid BCD digit 0x{byte:02X} at position {position}")]
    InvalidBcdDigit {
        /// The offending byte.
        byte: u8,
        /// Byte offset in the input.
        position: usize,
    },

    /// A nibble above 9 in a BCD decode input.
    #[error("invalid BCD nibble in byte 0x{byte:02X} at position {position}")]
    InvalidBcdNibble {
        /// The packed byte containing the bad nibble.
        byte: u8,
        /// Byte offset in the input.
        position: usize,
    },

    /// A hex decode input with an odd number of digits.
    #[error("odd-length hex input: {length} byte(s)")]
    OddHexLength {
        /// Input length in bytes.
        length: usize,
    },

    /// A byte that is not a hexadecimal digit.
    #[error("invalid hex digit 0x{byte:02X} at position {position}")]
    InvalidHexDigit {
        /// The offending byte.
        byte: u8,
        /// Byte offset in the input.
        position: usize,
    },

    /// A BER-TLV sequence that is truncated or uses an unsupported form.
    #[error("malformed TLV at offset {offset}: {reason}")]
    MalformedTlv {
        /// Byte offset of the offending triplet.
        offset: usize,
        /// What made the triplet unreadable.
        reason: &'static str,
    },
}
