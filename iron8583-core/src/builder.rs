/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Message construction.
//!
//! [`MessageBuilder`] is the write-side counterpart of [`Message`]: it
//! accumulates field values, defers all validation to the terminal call,
//! and emits a freshly owned buffer. MTI first, then the bitmap (bit 1
//! set exactly when any field above 64 is present), then every field in
//! ascending number order. Variable fields get a zero-padded length
//! indicator rendered through the field's codec; fixed fields are padded
//! per the spec and must land on their exact width.
//!
//! [`Message`]: crate::message::Message

use crate::bitmap::Bitmap;
use crate::error::{EncodeError, Iso8583Error};
use crate::message::{Message, OwnedMessage};
use crate::types::Mti;
use bytes::{BufMut, Bytes, BytesMut};
use iron8583_codec::codec_for;
use iron8583_spec::{Encoding, FieldSpec, Padding, Spec, MAX_FIELD_NUMBER};
use std::collections::BTreeMap;

/// Fluent builder for ISO 8583 messages.
#[derive(Debug, Clone)]
pub struct MessageBuilder<'s> {
    spec: &'s Spec,
    mti: Option<String>,
    fields: BTreeMap<usize, Vec<u8>>,
}

impl<'s> MessageBuilder<'s> {
    /// Creates a builder for the given dialect.
    #[must_use]
    pub fn new(spec: &'s Spec) -> Self {
        Self {
            spec,
            mti: None,
            fields: BTreeMap::new(),
        }
    }

    /// Sets the message type indicator; validated at build time.
    #[must_use]
    pub fn set_mti(mut self, mti: impl Into<String>) -> Self {
        self.mti = Some(mti.into());
        self
    }

    /// Sets a field value from raw bytes. Field numbers outside 2..=128
    /// are ignored, mirroring the bitmap's out-of-range policy.
    #[must_use]
    pub fn set_field(mut self, number: usize, value: impl AsRef<[u8]>) -> Self {
        if (2..=MAX_FIELD_NUMBER).contains(&number) {
            self.fields.insert(number, value.as_ref().to_vec());
        }
        self
    }

    /// Sets a field from a string value.
    #[must_use]
    pub fn set_string(self, number: usize, value: &str) -> Self {
        self.set_field(number, value.as_bytes())
    }

    /// Sets a field from an integer value, rendered as decimal digits.
    #[must_use]
    pub fn set_int(self, number: usize, value: i64) -> Self {
        let mut buf = itoa::Buffer::new();
        let s = buf.format(value);
        self.set_field(number, s.as_bytes())
    }

    /// Sets a field from raw bytes.
    #[must_use]
    pub fn set_bytes(self, number: usize, value: &[u8]) -> Self {
        self.set_field(number, value)
    }

    /// Removes a field.
    #[must_use]
    pub fn unset_field(mut self, number: usize) -> Self {
        self.fields.remove(&number);
        self
    }

    /// Finalizes the message and returns an owned reader over it.
    ///
    /// # Errors
    /// Returns the first build failure: missing or malformed MTI, a
    /// field the spec does not define, a value that does not fit its
    /// field, or a codec rejection.
    pub fn build(self) -> Result<OwnedMessage<'s>, Iso8583Error> {
        let spec = self.spec;
        let buffer = self.build_bytes()?;

        // The emitted bytes are re-parsed so the owned message carries
        // verified cursors; a failure here means the builder and locator
        // disagree and must surface, not be swallowed.
        let mut msg = Message::new(&buffer, spec);
        msg.parse()?;
        let mti = msg
            .message_type()
            .ok_or(Iso8583Error::NotParsed)?;
        let bitmap = *msg.bitmap().ok_or(Iso8583Error::NotParsed)?;
        let cursors = msg.cursors().clone();

        Ok(OwnedMessage::from_parsed(buffer, spec, mti, bitmap, cursors))
    }

    /// Finalizes the message and returns the serialized bytes.
    ///
    /// # Errors
    /// Same contract as [`MessageBuilder::build`].
    pub fn build_bytes(&self) -> Result<Bytes, Iso8583Error> {
        let mti_str = self.mti.as_deref().ok_or(EncodeError::MissingMti)?;
        let mti = Mti::from_bytes(mti_str.as_bytes()).map_err(|_| EncodeError::InvalidMti {
            mti: mti_str.to_string(),
        })?;

        let mut bitmap = Bitmap::new();
        for &number in self.fields.keys() {
            bitmap.set(number);
        }

        let mut out = BytesMut::with_capacity(self.estimate_capacity());
        out.put_slice(mti.as_str().as_bytes());
        out.put_slice(&bitmap.to_bytes());

        for (&number, value) in &self.fields {
            let field_spec = self
                .spec
                .field(number)
                .ok_or(EncodeError::FieldNotDefined { field: number })?;
            self.emit_field(&mut out, field_spec, value)?;
        }

        Ok(out.freeze())
    }

    fn emit_field(
        &self,
        out: &mut BytesMut,
        field_spec: &FieldSpec,
        value: &[u8],
    ) -> Result<(), Iso8583Error> {
        let codec = codec_for(field_spec.encoding);

        if field_spec.kind.is_variable() {
            let encoded = codec.encode(value)?;
            if encoded.len() > field_spec.max_length {
                return Err(EncodeError::LengthOutOfRange {
                    field: field_spec.number,
                    length: encoded.len(),
                    max: field_spec.max_length,
                }
                .into());
            }

            let digits = field_spec.kind.length_indicator_digits();
            let indicator = render_indicator(encoded.len(), digits);
            let indicator = codec.encode(&indicator)?;
            out.put_slice(&indicator);
            out.put_slice(&encoded);
            return Ok(());
        }

        // Fixed and bitmap fields: pad to the pre-encoding width, then
        // the encoded bytes must land exactly on the wire length.
        let raw_width = match field_spec.encoding {
            Encoding::Bcd => field_spec.length * 2,
            _ => field_spec.length,
        };
        let padded = pad_value(value, raw_width, field_spec)?;
        let encoded = codec.encode(&padded)?;
        if encoded.len() != field_spec.length {
            return Err(EncodeError::FixedLengthMismatch {
                field: field_spec.number,
                length: encoded.len(),
                expected: field_spec.length,
            }
            .into());
        }
        out.put_slice(&encoded);
        Ok(())
    }

    fn estimate_capacity(&self) -> usize {
        let fields: usize = self.fields.values().map(|v| v.len() + 3).sum();
        4 + 16 + fields
    }
}

/// Renders a length value as zero-padded ASCII digits.
fn render_indicator(length: usize, digits: usize) -> Vec<u8> {
    let mut buf = itoa::Buffer::new();
    let s = buf.format(length).as_bytes();
    let mut out = vec![b'0'; digits];
    let copy = s.len().min(digits);
    out[digits - copy..].copy_from_slice(&s[s.len() - copy..]);
    out
}

/// Pads a value to `width` bytes per the field's padding policy.
fn pad_value(value: &[u8], width: usize, field_spec: &FieldSpec) -> Result<Vec<u8>, Iso8583Error> {
    if value.len() > width {
        return Err(EncodeError::FixedLengthMismatch {
            field: field_spec.number,
            length: value.len(),
            expected: width,
        }
        .into());
    }
    if value.len() == width {
        return Ok(value.to_vec());
    }
    if field_spec.padding == Padding::None {
        return Err(EncodeError::FixedLengthMismatch {
            field: field_spec.number,
            length: value.len(),
            expected: width,
        }
        .into());
    }
    if !field_spec.pad_char.is_ascii() {
        return Err(EncodeError::InvalidPadChar {
            field: field_spec.number,
            pad_char: field_spec.pad_char,
        }
        .into());
    }

    let pad = field_spec.pad_char as u8;
    let missing = width - value.len();
    let mut out = Vec::with_capacity(width);
    match field_spec.padding {
        Padding::Left => {
            out.resize(missing, pad);
            out.extend_from_slice(value);
        }
        Padding::Right => {
            out.extend_from_slice(value);
            out.resize(width, pad);
        }
        Padding::Center => {
            out.resize(missing / 2, pad);
            out.extend_from_slice(value);
            out.resize(width, pad);
        }
        Padding::None => unreachable!("handled above"),
    }
    Ok(out)
}
