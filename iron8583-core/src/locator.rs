/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Stateless field location.
//!
//! The locator walks a message buffer field by field using a dialect
//! [`Spec`], producing [`Cursor`]s without touching the bytes it skips.
//! It holds no mutable state and is safe to use from any number of
//! threads over disjoint or identical buffers.
//!
//! Length indicators are read as ASCII decimal digits regardless of the
//! field's payload encoding; dialects with BCD-packed indicators must
//! expand them through the codec layer before locating.

use crate::bitmap::{PRIMARY_BITMAP_LENGTH, SECONDARY_BITMAP_LENGTH};
use crate::cursor::Cursor;
use crate::error::DecodeError;
use iron8583_spec::{FieldKind, FieldSpec, Spec};

/// Stateless field location calculator over a shared dialect spec.
#[derive(Debug, Clone, Copy)]
pub struct FieldLocator<'a> {
    spec: &'a Spec,
}

impl<'a> FieldLocator<'a> {
    /// Creates a locator for the given dialect.
    #[inline]
    #[must_use]
    pub const fn new(spec: &'a Spec) -> Self {
        Self { spec }
    }

    /// Returns the dialect spec this locator reads from.
    #[inline]
    #[must_use]
    pub const fn spec(&self) -> &'a Spec {
        self.spec
    }

    /// Computes the cursor of `field`'s data, starting at `offset` in
    /// `buf`.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] naming the field for every failure mode:
    /// undefined field, exhausted buffer, malformed or oversized length
    /// indicator.
    pub fn locate(&self, buf: &[u8], field: usize, offset: usize) -> Result<Cursor, DecodeError> {
        let field_spec = self
            .spec
            .field(field)
            .ok_or(DecodeError::FieldNotDefined { field })?;
        self.locate_spec(buf, field_spec, offset)
    }

    /// Computes the cursor for an explicit field spec; used for subfields
    /// of composite fields, which live outside the top-level field table.
    ///
    /// # Errors
    /// Same failure modes as [`FieldLocator::locate`].
    pub fn locate_spec(
        &self,
        buf: &[u8],
        field_spec: &FieldSpec,
        offset: usize,
    ) -> Result<Cursor, DecodeError> {
        if offset >= buf.len() {
            return Err(DecodeError::OffsetExceedsBuffer {
                field: field_spec.number,
                offset,
                needed: 1,
                len: buf.len(),
            });
        }

        match field_spec.kind {
            FieldKind::Fixed => self.locate_fixed(buf, field_spec, offset),
            FieldKind::Bitmap => {
                // A bitmap block only comes in primary or primary+secondary
                // widths; any other declared length is not locatable.
                if field_spec.length != PRIMARY_BITMAP_LENGTH
                    && field_spec.length != SECONDARY_BITMAP_LENGTH
                {
                    return Err(DecodeError::UnsupportedFieldKind {
                        field: field_spec.number,
                        kind: field_spec.kind,
                    });
                }
                self.locate_fixed(buf, field_spec, offset)
            }
            FieldKind::LVar | FieldKind::LlVar | FieldKind::LllVar => {
                self.locate_variable(buf, field_spec, offset)
            }
        }
    }

    fn locate_fixed(
        &self,
        buf: &[u8],
        field_spec: &FieldSpec,
        offset: usize,
    ) -> Result<Cursor, DecodeError> {
        let end = offset + field_spec.length;
        if end > buf.len() {
            return Err(DecodeError::OffsetExceedsBuffer {
                field: field_spec.number,
                offset,
                needed: field_spec.length,
                len: buf.len(),
            });
        }
        Ok(Cursor::new(offset, end))
    }

    fn locate_variable(
        &self,
        buf: &[u8],
        field_spec: &FieldSpec,
        offset: usize,
    ) -> Result<Cursor, DecodeError> {
        let digits = field_spec.kind.length_indicator_digits();
        if offset + digits > buf.len() {
            return Err(DecodeError::InsufficientLengthIndicator {
                field: field_spec.number,
                digits,
                offset,
                len: buf.len(),
            });
        }

        let length = parse_indicator(&buf[offset..offset + digits], field_spec.number)?;
        if length > field_spec.max_length {
            return Err(DecodeError::LengthExceedsMax {
                field: field_spec.number,
                length,
                max: field_spec.max_length,
            });
        }

        let data_start = offset + digits;
        let data_end = data_start + length;
        if data_end > buf.len() {
            return Err(DecodeError::OffsetExceedsBuffer {
                field: field_spec.number,
                offset: data_start,
                needed: length,
                len: buf.len(),
            });
        }

        Ok(Cursor::new(data_start, data_end))
    }
}

/// Parses an ASCII decimal length indicator.
fn parse_indicator(bytes: &[u8], field: usize) -> Result<usize, DecodeError> {
    let mut value = 0usize;
    for &byte in bytes {
        if !byte.is_ascii_digit() {
            return Err(DecodeError::InvalidLengthDigit { field, byte });
        }
        value = value * 10 + (byte - b'0') as usize;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iron8583_spec::{DataType, FieldSpec, Spec};

    fn test_spec() -> Spec {
        let mut spec = Spec::new("test", "1");
        spec.add_field(
            FieldSpec::new(2, "PAN", FieldKind::LlVar)
                .with_max_length(19)
                .with_data_type(DataType::Numeric),
        );
        spec.add_field(
            FieldSpec::new(4, "Amount", FieldKind::Fixed)
                .with_length(12)
                .with_data_type(DataType::Numeric),
        );
        spec.add_field(
            FieldSpec::new(54, "Additional Amounts", FieldKind::LllVar).with_max_length(120),
        );
        spec.add_field(
            FieldSpec::new(64, "Tertiary Bitmap", FieldKind::Bitmap).with_length(8),
        );
        spec.add_field(
            FieldSpec::new(65, "Bad Bitmap", FieldKind::Bitmap).with_length(12),
        );
        spec
    }

    #[test]
    fn test_locate_ll_variable() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);
        let buf = b"161234567890123456";

        let cursor = locator.locate(buf, 2, 0).unwrap();
        assert_eq!(cursor, Cursor::new(2, 18));
        assert_eq!(cursor.extract(buf), Some(&b"1234567890123456"[..]));
    }

    #[test]
    fn test_locate_fixed() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);
        let buf = b"000000001000XX";

        let cursor = locator.locate(buf, 4, 0).unwrap();
        assert_eq!(cursor, Cursor::new(0, 12));
        assert_eq!(cursor.next_offset(), 12);
    }

    #[test]
    fn test_locate_fixed_past_end() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);

        let err = locator.locate(b"0100", 4, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::OffsetExceedsBuffer {
                field: 4,
                offset: 0,
                needed: 12,
                len: 4,
            }
        );
    }

    #[test]
    fn test_locate_undefined_field() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);

        let err = locator.locate(b"161234", 3, 0).unwrap_err();
        assert_eq!(err, DecodeError::FieldNotDefined { field: 3 });
    }

    #[test]
    fn test_locate_offset_at_buffer_end() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);

        let err = locator.locate(b"0100", 4, 4).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OffsetExceedsBuffer { field: 4, offset: 4, .. }
        ));
    }

    #[test]
    fn test_locate_invalid_length_digit() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);

        let err = locator.locate(b"XX1234", 2, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidLengthDigit {
                field: 2,
                byte: b'X',
            }
        );
    }

    #[test]
    fn test_locate_length_exceeds_max() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);
        let buf = b"20123456789012345678901234";

        let err = locator.locate(buf, 2, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::LengthExceedsMax {
                field: 2,
                length: 20,
                max: 19,
            }
        );
    }

    #[test]
    fn test_locate_declared_length_past_end() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);

        let err = locator.locate(b"161234", 2, 0).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OffsetExceedsBuffer {
                field: 2,
                offset: 2,
                needed: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_locate_truncated_indicator() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);

        // LLL field with only two bytes left.
        let err = locator.locate(b"12", 54, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InsufficientLengthIndicator {
                field: 54,
                digits: 3,
                offset: 0,
                len: 2,
            }
        );
    }

    #[test]
    fn test_locate_bitmap_block() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);
        let buf = [0u8; 10];

        let cursor = locator.locate(&buf, 64, 0).unwrap();
        assert_eq!(cursor, Cursor::new(0, 8));
    }

    #[test]
    fn test_locate_bitmap_with_bad_width() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);
        let buf = [0u8; 32];

        let err = locator.locate(&buf, 65, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnsupportedFieldKind {
                field: 65,
                kind: FieldKind::Bitmap,
            }
        );
    }

    #[test]
    fn test_locate_is_deterministic() {
        let spec = test_spec();
        let locator = FieldLocator::new(&spec);
        let buf = b"161234567890123456";

        let first = locator.locate(buf, 2, 0);
        let second = locator.locate(buf, 2, 0);
        assert_eq!(first, second);
    }
}
