/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the iron8583 engine.
//!
//! This module provides a unified error hierarchy using `thiserror` for
//! typed, domain-specific errors across all iron8583 operations. The core
//! never retries, never logs, and never panics on in-contract input: every
//! failure is returned to the caller with enough context (field number,
//! offset, expected vs. actual lengths) to diagnose without access to the
//! buffer.

use iron8583_codec::CodecError;
use iron8583_spec::FieldKind;
use thiserror::Error;

/// Result type alias using [`Iso8583Error`] as the error type.
pub type Result<T> = std::result::Result<T, Iso8583Error>;

/// Top-level error type for all iron8583 operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Iso8583Error {
    /// Error during message decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error during message encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error during message validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error in the payload codec layer.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Operation that requires a parsed message was called before a
    /// successful parse.
    #[error("message not parsed, call parse() first")]
    NotParsed,
}

/// Errors that occur while decoding an ISO 8583 message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer shorter than the 4-byte MTI.
    #[error("message too short for MTI: need 4 bytes, got {len}")]
    MessageTooShortForMti {
        /// Actual buffer length.
        len: usize,
    },

    /// MTI bytes that are not four ASCII digits.
    #[error("invalid MTI format: expected 4 numeric digits, got {mti:?}")]
    InvalidMtiFormat {
        /// The offending MTI bytes, lossily decoded.
        mti: String,
    },

    /// Buffer shorter than MTI plus primary bitmap.
    #[error("message too short for bitmap: need {needed} bytes, got {len}")]
    MessageTooShortForBitmap {
        /// Minimum required length.
        needed: usize,
        /// Actual buffer length.
        len: usize,
    },

    /// Bitmap block shorter than its declared extent.
    #[error("invalid bitmap: {available} byte(s) available")]
    InvalidBitmap {
        /// Bytes available for the bitmap.
        available: usize,
    },

    /// A field present in the bitmap but not defined in the spec.
    #[error("field {field} not defined in spec")]
    FieldNotDefined {
        /// The field number.
        field: usize,
    },

    /// A field whose data extends past the end of the buffer.
    #[error("field {field}: need {needed} byte(s) at offset {offset}, buffer has {len}")]
    OffsetExceedsBuffer {
        /// The field number.
        field: usize,
        /// Offset where the data was expected.
        offset: usize,
        /// Bytes required from the offset.
        needed: usize,
        /// Actual buffer length.
        len: usize,
    },

    /// A variable field without enough bytes for its length indicator.
    #[error("field {field}: need {digits} digit(s) for length indicator at offset {offset}, buffer has {len}")]
    InsufficientLengthIndicator {
        /// The field number.
        field: usize,
        /// Indicator digit count.
        digits: usize,
        /// Offset where the indicator was expected.
        offset: usize,
        /// Actual buffer length.
        len: usize,
    },

    /// A variable field declaring more data than its spec allows.
    #[error("field {field}: declared length {length} exceeds max {max}")]
    LengthExceedsMax {
        /// The field number.
        field: usize,
        /// Declared data length.
        length: usize,
        /// Maximum allowed by the spec.
        max: usize,
    },

    /// A non-digit byte inside a length indicator.
    #[error("field {field}: invalid digit 0x{byte:02X} in length indicator")]
    InvalidLengthDigit {
        /// The field number.
        field: usize,
        /// The offending byte.
        byte: u8,
    },

    /// A field kind the locator cannot service, such as a bitmap block
    /// declared at a width other than 8 or 16 bytes.
    #[error("field {field}: unsupported field kind {kind}")]
    UnsupportedFieldKind {
        /// The field number.
        field: usize,
        /// The declared kind.
        kind: FieldKind,
    },

    /// Typed access to a field that is not present.
    #[error("field not present")]
    FieldNotPresent,

    /// A field value that does not parse as the requested type.
    #[error("invalid field value: {reason}")]
    InvalidFieldValue {
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors that occur while building an ISO 8583 message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Terminal build call without an MTI.
    #[error("missing MTI")]
    MissingMti,

    /// An MTI that is not four ASCII digits.
    #[error("invalid MTI: expected 4 numeric digits, got {mti:?}")]
    InvalidMti {
        /// The offending MTI.
        mti: String,
    },

    /// A field set on the builder but absent from the spec.
    #[error("field {field} not defined in spec")]
    FieldNotDefined {
        /// The field number.
        field: usize,
    },

    /// A variable field value longer than its spec allows.
    #[error("field {field}: length {length} out of range, max {max}")]
    LengthOutOfRange {
        /// The field number.
        field: usize,
        /// Actual value length.
        length: usize,
        /// Maximum allowed by the spec.
        max: usize,
    },

    /// A fixed field value that cannot be padded to its exact width.
    #[error("field {field}: length {length} does not match fixed width {expected}")]
    FixedLengthMismatch {
        /// The field number.
        field: usize,
        /// Actual value length.
        length: usize,
        /// Required width.
        expected: usize,
    },

    /// A pad character that cannot be emitted as a single byte.
    #[error("field {field}: pad character {pad_char:?} is not ASCII")]
    InvalidPadChar {
        /// The field number.
        field: usize,
        /// The offending pad character.
        pad_char: char,
    },
}

/// Errors raised by the validation framework.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A mandatory field that is absent.
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// The field number.
        field: usize,
    },

    /// A field whose content violates its format.
    #[error("invalid field {field} format: {reason}")]
    InvalidFieldFormat {
        /// The field number.
        field: usize,
        /// Why the content was rejected.
        reason: String,
    },

    /// A PAN that fails its Luhn checksum.
    #[error("field {field}: Luhn checksum failed")]
    LuhnCheckFailed {
        /// The field number.
        field: usize,
    },

    /// A field whose length is outside its allowed range.
    #[error("field {field}: length must be between {min} and {max}, got {actual}")]
    InvalidFieldLength {
        /// The field number.
        field: usize,
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
        /// Actual length.
        actual: usize,
    },

    /// Structural re-validation failed to locate every present field.
    #[error("structural validation failed: {source}")]
    Structure {
        /// The underlying decode failure.
        #[source]
        source: DecodeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::LengthExceedsMax {
            field: 2,
            length: 20,
            max: 19,
        };
        assert_eq!(
            err.to_string(),
            "field 2: declared length 20 exceeds max 19"
        );
    }

    #[test]
    fn test_iso8583_error_from_decode() {
        let decode_err = DecodeError::FieldNotPresent;
        let err: Iso8583Error = decode_err.into();
        assert!(matches!(
            err,
            Iso8583Error::Decode(DecodeError::FieldNotPresent)
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidFieldLength {
            field: 2,
            min: 12,
            max: 19,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "field 2: length must be between 12 and 19, got 7"
        );
    }

    #[test]
    fn test_codec_error_wraps() {
        let codec_err = iron8583_codec::CodecError::OddHexLength { length: 5 };
        let err: Iso8583Error = codec_err.into();
        assert!(matches!(err, Iso8583Error::Codec(_)));
    }
}
