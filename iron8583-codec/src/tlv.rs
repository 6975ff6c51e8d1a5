/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Minimal BER-TLV codec for flat EMV-style sequences.
//!
//! The codec walks a sequence of tag-length-value triplets and re-emits
//! it byte-identically, so both directions are validating pass-throughs.
//! Tags are one byte, or two when the low five bits of the first byte are
//! all set. Lengths are short-form only (a single byte, 0..=127).
//! Constructed/nested templates and long-form lengths are documented
//! non-goals; sequences using them are rejected as malformed.

use crate::error::CodecError;
use crate::Codec;

/// Low-5-bit mask signalling a multi-byte tag.
const TAG_CONTINUES: u8 = 0x1F;

/// High bit of a length byte; set means long-form, which is unsupported.
const LONG_FORM: u8 = 0x80;

/// A borrowed view of one TLV triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triplet<'a> {
    /// Tag bytes (one or two).
    pub tag: &'a [u8],
    /// Value bytes.
    pub value: &'a [u8],
}

/// Minimal BER-TLV codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct BerTlv;

impl BerTlv {
    /// Validates a flat TLV sequence, returning its triplets.
    ///
    /// # Errors
    /// Returns [`CodecError::MalformedTlv`] for truncated triplets,
    /// tags wider than two bytes, or long-form length bytes.
    pub fn triplets<'a>(&self, data: &'a [u8]) -> Result<Vec<Triplet<'a>>, CodecError> {
        let mut out = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            let tag_len = if data[offset] & TAG_CONTINUES == TAG_CONTINUES {
                2
            } else {
                1
            };
            if offset + tag_len > data.len() {
                return Err(CodecError::MalformedTlv {
                    offset,
                    reason: "truncated tag",
                });
            }
            if tag_len == 2 && data[offset + 1] & 0x80 != 0 {
                return Err(CodecError::MalformedTlv {
                    offset,
                    reason: "tag wider than two bytes",
                });
            }

            let len_offset = offset + tag_len;
            if len_offset >= data.len() {
                return Err(CodecError::MalformedTlv {
                    offset,
                    reason: "missing length",
                });
            }
            let length = data[len_offset];
            if length & LONG_FORM != 0 {
                return Err(CodecError::MalformedTlv {
                    offset,
                    reason: "long-form length",
                });
            }

            let value_offset = len_offset + 1;
            let value_end = value_offset + length as usize;
            if value_end > data.len() {
                return Err(CodecError::MalformedTlv {
                    offset,
                    reason: "truncated value",
                });
            }

            out.push(Triplet {
                tag: &data[offset..len_offset],
                value: &data[value_offset..value_end],
            });
            offset = value_end;
        }

        Ok(out)
    }

    fn validate(&self, data: &[u8]) -> Result<(), CodecError> {
        self.triplets(data).map(|_| ())
    }
}

impl Codec for BerTlv {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.validate(data)?;
        Ok(data.to_vec())
    }

    fn decode(&self, data: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
        self.validate(data)?;
        Ok((data.to_vec(), data.len()))
    }

    fn name(&self) -> &'static str {
        "TLV"
    }
}
