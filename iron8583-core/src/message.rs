/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message readers.
//!
//! This module provides:
//! - [`Message`]: a zero-copy view over a borrowed message buffer
//! - [`OwnedMessage`]: an owned message produced by the builder
//! - [`MessageRead`]: the read interface shared by both and consumed by
//!   the validator framework
//!
//! [`Message::parse`] is eager: it locates every present field once,
//! front to back, so every later read is a map lookup plus a slice.

use crate::bitmap::Bitmap;
use crate::cursor::Cursor;
use crate::error::{DecodeError, Iso8583Error};
use crate::field::Field;
use crate::locator::FieldLocator;
use crate::types::{Mti, MTI_LENGTH};
use crate::validator::Validator;
use bytes::Bytes;
use iron8583_spec::{Spec, MAX_FIELD_NUMBER};
use std::collections::BTreeMap;

/// Minimum parseable message: MTI plus primary bitmap.
pub const MIN_MESSAGE_LENGTH: usize = MTI_LENGTH + 8;

/// Read access to a parsed message, shared by borrowed and owned readers.
///
/// Object-safe so validators can run against either representation.
pub trait MessageRead {
    /// Returns the MTI as a field accessor.
    fn mti(&self) -> Field<'_>;

    /// Returns the accessor for a field number; absent when the field is
    /// not present or the number is out of range.
    fn field(&self, number: usize) -> Field<'_>;

    /// Returns true if the field is present (field 0, the MTI, always
    /// is).
    fn has_field(&self, number: usize) -> bool;

    /// Returns the present field numbers in ascending order, starting
    /// with 0 for the MTI.
    fn present_fields(&self) -> Vec<usize>;

    /// Returns the raw message bytes.
    fn bytes(&self) -> &[u8];
}

/// A zero-copy ISO 8583 message over a borrowed buffer.
///
/// Created unparsed; [`Message::parse`] populates the MTI, bitmap, and
/// field cursors. Reads before a successful parse degrade to absent
/// accessors rather than errors. Parsing is single-writer; once parsed,
/// concurrent reads are safe because nothing mutates.
#[derive(Debug, Clone)]
pub struct Message<'a> {
    buf: &'a [u8],
    spec: &'a Spec,
    mti: Option<Mti>,
    bitmap: Option<Bitmap>,
    cursors: BTreeMap<usize, Cursor>,
}

impl<'a> Message<'a> {
    /// Wraps a buffer without parsing it.
    #[must_use]
    pub fn new(buf: &'a [u8], spec: &'a Spec) -> Self {
        Self {
            buf,
            spec,
            mti: None,
            bitmap: None,
            cursors: BTreeMap::new(),
        }
    }

    /// Parses the MTI, bitmap, and every present field's cursor.
    /// Idempotent after success. Fields flagged in the bitmap but absent
    /// from the spec are skipped so unknown dialect extensions do not
    /// fail the whole message.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] naming the failure point: short buffer,
    /// malformed MTI or bitmap, or an unlocatable field.
    pub fn parse(&mut self) -> Result<(), DecodeError> {
        if self.is_parsed() {
            return Ok(());
        }

        if self.buf.len() < MTI_LENGTH {
            return Err(DecodeError::MessageTooShortForMti { len: self.buf.len() });
        }
        let mti = Mti::from_bytes(&self.buf[..MTI_LENGTH])?;

        if self.buf.len() < MIN_MESSAGE_LENGTH {
            return Err(DecodeError::MessageTooShortForBitmap {
                needed: MIN_MESSAGE_LENGTH,
                len: self.buf.len(),
            });
        }
        let (bitmap, consumed) = Bitmap::from_bytes(&self.buf[MTI_LENGTH..])?;

        let locator = FieldLocator::new(self.spec);
        let mut cursors = BTreeMap::new();
        let mut offset = MTI_LENGTH + consumed;

        for field in bitmap.present_fields() {
            if field == 1 {
                continue; // field 1 is the bitmap itself
            }
            if self.spec.field(field).is_none() {
                continue;
            }
            let cursor = locator.locate(self.buf, field, offset)?;
            offset = cursor.next_offset();
            cursors.insert(field, cursor);
        }

        self.mti = Some(mti);
        self.bitmap = Some(bitmap);
        self.cursors = cursors;
        Ok(())
    }

    /// Returns true once [`Message::parse`] has succeeded.
    #[inline]
    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        self.bitmap.is_some()
    }

    /// Returns the typed MTI, when parsed.
    #[inline]
    #[must_use]
    pub const fn message_type(&self) -> Option<Mti> {
        self.mti
    }

    /// Returns the parsed bitmap, when parsed.
    #[inline]
    #[must_use]
    pub const fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// Returns the MTI accessor; absent before a successful parse.
    #[must_use]
    pub fn mti(&self) -> Field<'a> {
        let buf = self.buf;
        if self.mti.is_some() {
            Field::new(&buf[..MTI_LENGTH], true)
        } else {
            Field::absent()
        }
    }

    /// Returns the accessor for a field number. Absent for numbers
    /// outside 0..=128, before parse, or when the bitmap does not flag
    /// the field; field 0 is the MTI.
    #[must_use]
    pub fn field(&self, number: usize) -> Field<'a> {
        if number == 0 {
            return self.mti();
        }
        field_in(
            self.buf,
            self.spec,
            self.bitmap.as_ref(),
            &self.cursors,
            number,
        )
    }

    /// Returns true if the field is present; field 0 always is.
    #[must_use]
    pub fn has_field(&self, number: usize) -> bool {
        if number == 0 {
            return true;
        }
        self.bitmap.map_or(false, |b| b.is_set(number))
    }

    /// Returns the present field numbers, ascending, starting with 0.
    #[must_use]
    pub fn present_fields(&self) -> Vec<usize> {
        let mut fields = vec![0];
        if let Some(bitmap) = &self.bitmap {
            fields.extend(bitmap.present_fields());
        }
        fields
    }

    /// Returns the borrowed message bytes.
    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.buf
    }

    /// Returns the dialect spec this message reads with.
    #[inline]
    #[must_use]
    pub const fn spec(&self) -> &'a Spec {
        self.spec
    }

    /// Returns the located field cursors.
    #[inline]
    #[must_use]
    pub(crate) const fn cursors(&self) -> &BTreeMap<usize, Cursor> {
        &self.cursors
    }

    /// Runs a validator over the parsed message; `None` skips
    /// validation.
    ///
    /// # Errors
    /// Returns [`Iso8583Error::NotParsed`] before a successful parse, or
    /// the validator's failure.
    pub fn validate(&self, validator: Option<&dyn Validator>) -> Result<(), Iso8583Error> {
        if !self.is_parsed() {
            return Err(Iso8583Error::NotParsed);
        }
        match validator {
            None => Ok(()),
            Some(v) => v.validate(self).map_err(Iso8583Error::from),
        }
    }
}

impl MessageRead for Message<'_> {
    // The inherent accessors return `Field<'a>`, which cannot shrink to
    // the `&self` lifetime (the subfield cache makes `Field` invariant),
    // so the trait surface rebuilds accessors at the borrow lifetime.
    fn mti(&self) -> Field<'_> {
        if self.mti.is_some() {
            Field::new(&self.buf[..MTI_LENGTH], true)
        } else {
            Field::absent()
        }
    }

    fn field(&self, number: usize) -> Field<'_> {
        if number == 0 {
            return MessageRead::mti(self);
        }
        field_in(
            self.buf,
            self.spec,
            self.bitmap.as_ref(),
            &self.cursors,
            number,
        )
    }

    fn has_field(&self, number: usize) -> bool {
        Message::has_field(self, number)
    }

    fn present_fields(&self) -> Vec<usize> {
        Message::present_fields(self)
    }

    fn bytes(&self) -> &[u8] {
        Message::bytes(self)
    }
}

/// An ISO 8583 message that owns its buffer, produced by the builder.
///
/// The buffer is freshly allocated at build time and never aliases any
/// input; cursors were computed by a full parse of the emitted bytes.
#[derive(Debug, Clone)]
pub struct OwnedMessage<'s> {
    buffer: Bytes,
    spec: &'s Spec,
    mti: Mti,
    bitmap: Bitmap,
    cursors: BTreeMap<usize, Cursor>,
}

impl<'s> OwnedMessage<'s> {
    pub(crate) fn from_parsed(
        buffer: Bytes,
        spec: &'s Spec,
        mti: Mti,
        bitmap: Bitmap,
        cursors: BTreeMap<usize, Cursor>,
    ) -> Self {
        Self {
            buffer,
            spec,
            mti,
            bitmap,
            cursors,
        }
    }

    /// Returns the typed MTI.
    #[inline]
    #[must_use]
    pub const fn message_type(&self) -> Mti {
        self.mti
    }

    /// Returns the bitmap.
    #[inline]
    #[must_use]
    pub const fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Returns the message bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the message and returns the underlying buffer.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.buffer
    }

    /// Returns a borrowed zero-copy reader over this message.
    #[must_use]
    pub fn reader(&self) -> Message<'_> {
        Message {
            buf: &self.buffer,
            spec: self.spec,
            mti: Some(self.mti),
            bitmap: Some(self.bitmap),
            cursors: self.cursors.clone(),
        }
    }

    /// Runs a validator over the message; `None` skips validation.
    ///
    /// # Errors
    /// Returns the validator's failure.
    pub fn validate(&self, validator: Option<&dyn Validator>) -> Result<(), Iso8583Error> {
        match validator {
            None => Ok(()),
            Some(v) => v.validate(self).map_err(Iso8583Error::from),
        }
    }
}

impl MessageRead for OwnedMessage<'_> {
    fn mti(&self) -> Field<'_> {
        Field::new(&self.buffer[..MTI_LENGTH], true)
    }

    fn field(&self, number: usize) -> Field<'_> {
        if number == 0 {
            return self.mti();
        }
        field_in(
            &self.buffer,
            self.spec,
            Some(&self.bitmap),
            &self.cursors,
            number,
        )
    }

    fn has_field(&self, number: usize) -> bool {
        number == 0 || self.bitmap.is_set(number)
    }

    fn present_fields(&self) -> Vec<usize> {
        let mut fields = vec![0];
        fields.extend(self.bitmap.present_fields());
        fields
    }

    fn bytes(&self) -> &[u8] {
        &self.buffer
    }
}

/// Builds the accessor for a data element from parsed message state.
fn field_in<'b>(
    buf: &'b [u8],
    spec: &'b Spec,
    bitmap: Option<&Bitmap>,
    cursors: &BTreeMap<usize, Cursor>,
    number: usize,
) -> Field<'b> {
    if number == 0 || number > MAX_FIELD_NUMBER {
        return Field::absent();
    }
    let Some(bitmap) = bitmap else {
        return Field::absent();
    };
    if !bitmap.is_set(number) {
        return Field::absent();
    }
    let Some(cursor) = cursors.get(&number) else {
        return Field::absent();
    };
    let Some(data) = cursor.extract(buf) else {
        return Field::absent();
    };

    Field::with_spec(
        data,
        true,
        spec.field(number),
        Some(FieldLocator::new(spec)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use iron8583_spec::{DataType, FieldKind, FieldSpec};

    fn test_spec() -> Spec {
        let mut spec = Spec::new("test", "1987");
        spec.add_field(
            FieldSpec::new(2, "PAN", FieldKind::LlVar)
                .with_max_length(19)
                .with_data_type(DataType::Numeric),
        );
        spec.add_field(
            FieldSpec::new(3, "Processing Code", FieldKind::Fixed)
                .with_length(6)
                .with_data_type(DataType::Numeric),
        );
        spec.add_field(
            FieldSpec::new(4, "Amount", FieldKind::Fixed)
                .with_length(12)
                .with_data_type(DataType::Numeric),
        );
        spec.add_field(
            FieldSpec::new(11, "STAN", FieldKind::Fixed)
                .with_length(6)
                .with_data_type(DataType::Numeric),
        );
        spec.add_field(
            FieldSpec::new(66, "Settlement Code", FieldKind::Fixed)
                .with_length(1)
                .with_data_type(DataType::Numeric),
        );
        spec
    }

    /// 0200 with fields 2 (LL "1234567890123456"), 3, 4, 11.
    fn financial_request() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"0200");
        buf.extend_from_slice(&[0x70, 0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        buf.extend_from_slice(b"161234567890123456");
        buf.extend_from_slice(b"000000");
        buf.extend_from_slice(b"000000001000");
        buf.extend_from_slice(b"000001");
        buf
    }

    #[test]
    fn test_parse_financial_request() {
        let spec = test_spec();
        let buf = financial_request();
        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();

        assert_eq!(msg.mti().as_str(), "0200");
        assert_eq!(msg.present_fields(), vec![0, 2, 3, 4, 11]);
        assert_eq!(msg.field(2).as_str(), "1234567890123456");
        assert_eq!(msg.field(3).as_str(), "000000");
        assert_eq!(msg.field(4).as_str(), "000000001000");
        assert_eq!(msg.field(4).as_i64(), 1000);
        assert_eq!(msg.field(11).as_str(), "000001");
        assert!(msg.has_field(11));
        assert!(!msg.has_field(5));
        assert_eq!(msg.bytes(), buf.as_slice());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let spec = test_spec();
        let buf = financial_request();
        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();
        msg.parse().unwrap();
        assert_eq!(msg.field(2).as_str(), "1234567890123456");
    }

    #[test]
    fn test_parse_hex_scenario_buffer() {
        // The same 0200 message, from its on-wire hex rendering.
        let hex = "303230307020000000000000313631323334353637383930313233343536\
                   303030303030303030303030303031303030303030303031";
        let buf: Vec<u8> = (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
            .collect();

        let spec = test_spec();
        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();

        assert_eq!(msg.mti().as_str(), "0200");
        assert_eq!(msg.present_fields(), vec![0, 2, 3, 4, 11]);
        assert_eq!(msg.field(2).as_str(), "1234567890123456");
        assert_eq!(msg.field(4).as_str(), "000000001000");
        assert_eq!(msg.field(11).as_str(), "000001");
    }

    #[test]
    fn test_field_bytes_partition_buffer() {
        // The located fields tile the buffer from the end of the bitmap
        // to the last cursor, in order, with no gaps.
        let spec = test_spec();
        let buf = financial_request();
        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();

        let mut offset = 12; // MTI + primary bitmap
        for number in [2usize, 3, 4, 11] {
            let field = msg.field(number);
            let start = field.bytes().as_ptr() as usize - buf.as_ptr() as usize;
            // Variable fields sit after their length indicator.
            let indicator = if number == 2 { 2 } else { 0 };
            assert_eq!(start, offset + indicator);
            offset = start + field.len();
        }
        assert_eq!(offset, buf.len());
    }

    #[test]
    fn test_parse_too_short_for_mti() {
        let spec = test_spec();
        for len in 0..4 {
            let buf = vec![b'0'; len];
            let err = Message::new(&buf, &spec).parse().unwrap_err();
            assert_eq!(err, DecodeError::MessageTooShortForMti { len });
        }
    }

    #[test]
    fn test_parse_invalid_mti() {
        let spec = test_spec();
        let mut buf = financial_request();
        buf[3] = b'A';
        let err = Message::new(&buf, &spec).parse().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidMtiFormat { .. }));

        buf[3] = b'-';
        let err = Message::new(&buf, &spec).parse().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidMtiFormat { .. }));
    }

    #[test]
    fn test_parse_too_short_for_bitmap() {
        let spec = test_spec();

        // A bare MTI fails past the MTI check, at the bitmap check.
        let err = Message::new(b"0200", &spec).parse().unwrap_err();
        assert_eq!(
            err,
            DecodeError::MessageTooShortForBitmap { needed: 12, len: 4 }
        );

        let err = Message::new(b"02001234567", &spec).parse().unwrap_err();
        assert_eq!(
            err,
            DecodeError::MessageTooShortForBitmap { needed: 12, len: 11 }
        );
    }

    #[test]
    fn test_parse_truncated_secondary_bitmap() {
        let spec = test_spec();
        let mut buf = Vec::new();
        buf.extend_from_slice(b"0800");
        buf.extend_from_slice(&[0x80, 0, 0, 0, 0, 0, 0, 0]); // bit 1, no secondary
        let err = Message::new(&buf, &spec).parse().unwrap_err();
        assert_eq!(err, DecodeError::InvalidBitmap { available: 8 });
    }

    #[test]
    fn test_parse_secondary_bitmap_field() {
        let spec = test_spec();
        let mut buf = Vec::new();
        buf.extend_from_slice(b"0200");
        buf.extend_from_slice(&[0x80, 0, 0, 0, 0, 0, 0, 0]);
        buf.extend_from_slice(&[0x40, 0, 0, 0, 0, 0, 0, 0]); // field 66
        buf.extend_from_slice(b"5");

        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();

        assert_eq!(msg.present_fields(), vec![0, 1, 66]);
        assert!(msg.bitmap().unwrap().is_extended());
        assert_eq!(msg.field(66).as_str(), "5");
        assert!(!msg.field(1).exists());
    }

    #[test]
    fn test_parse_skips_unknown_fields() {
        // Field 5 flagged but not in the spec: skipped, field walk
        // continues at the same offset.
        let spec = test_spec();
        let mut buf = Vec::new();
        buf.extend_from_slice(b"0200");
        buf.extend_from_slice(&[0x78, 0x20, 0, 0, 0, 0, 0, 0]); // 2,3,4,5,11
        buf.extend_from_slice(b"161234567890123456");
        buf.extend_from_slice(b"000000");
        buf.extend_from_slice(b"000000001000");
        buf.extend_from_slice(b"000001");

        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();

        assert!(msg.has_field(5));
        assert!(!msg.field(5).exists()); // flagged but never located
        assert_eq!(msg.field(11).as_str(), "000001");
    }

    #[test]
    fn test_parse_variable_field_bad_indicator() {
        let spec = test_spec();
        let mut buf = Vec::new();
        buf.extend_from_slice(b"0200");
        buf.extend_from_slice(&[0x40, 0, 0, 0, 0, 0, 0, 0]); // field 2
        buf.extend_from_slice(b"XX1234");

        let err = Message::new(&buf, &spec).parse().unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidLengthDigit {
                field: 2,
                byte: b'X',
            }
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let spec = test_spec();
        let mut buf = financial_request();
        buf.extend_from_slice(b"GARBAGE");

        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();
        assert_eq!(msg.field(11).as_str(), "000001");
    }

    #[test]
    fn test_reads_before_parse_are_absent() {
        let spec = test_spec();
        let buf = financial_request();
        let msg = Message::new(&buf, &spec);

        assert!(!msg.is_parsed());
        assert!(!msg.mti().exists());
        assert!(!msg.field(2).exists());
        assert!(!msg.has_field(2));
        assert!(msg.has_field(0));
        assert_eq!(msg.present_fields(), vec![0]);
    }

    #[test]
    fn test_field_out_of_range() {
        let spec = test_spec();
        let buf = financial_request();
        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();

        assert!(!msg.field(129).exists());
        assert!(!msg.field(usize::MAX).exists());
    }

    #[test]
    fn test_validate_before_parse_fails() {
        let spec = test_spec();
        let buf = financial_request();
        let msg = Message::new(&buf, &spec);
        assert_eq!(msg.validate(None).unwrap_err(), Iso8583Error::NotParsed);
    }

    #[test]
    fn test_validate_none_after_parse_ok() {
        let spec = test_spec();
        let buf = financial_request();
        let mut msg = Message::new(&buf, &spec);
        msg.parse().unwrap();
        assert!(msg.validate(None).is_ok());
    }
}
