/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # iron8583 Codec
//!
//! Byte-level codecs for ISO 8583 field payloads.
//!
//! This crate provides the [`Codec`] trait and the six bundled
//! implementations:
//! - [`Ascii`]: validating pass-through for 7-bit ASCII
//! - [`Binary`]: unconditional pass-through
//! - [`Hex`]: lowercase hexadecimal text
//! - [`Bcd`]: packed binary-coded decimal (payment profile)
//! - [`Ebcdic037`]: EBCDIC code page 037 translation
//! - [`BerTlv`]: validating pass-through for flat BER-TLV sequences
//!
//! All codecs are stateless unit values, safe to share across threads.
//! [`codec_for`] maps a dialect's [`Encoding`] to its codec for dynamic
//! dispatch at the spec boundary.

pub mod ascii;
pub mod bcd;
pub mod binary;
pub mod ebcdic;
pub mod error;
pub mod hex;
pub mod tlv;

pub use ascii::Ascii;
pub use bcd::Bcd;
pub use binary::Binary;
pub use ebcdic::Ebcdic037;
pub use error::CodecError;
pub use hex::Hex;
pub use tlv::BerTlv;

use iron8583_spec::Encoding;

/// A byte-level codec translating between field payloads and their wire
/// representation.
///
/// Codecs are stateless: `encode` and `decode` may be called from any
/// number of threads concurrently.
pub trait Codec: Send + Sync {
    /// Encodes a payload into its wire representation.
    ///
    /// # Errors
    /// Returns [`CodecError`] when the payload contains bytes the codec
    /// cannot represent.
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Decodes a wire representation back into a payload, returning the
    /// decoded bytes and the number of input bytes consumed.
    ///
    /// # Errors
    /// Returns [`CodecError`] when the input is not valid for this codec.
    fn decode(&self, data: &[u8]) -> Result<(Vec<u8>, usize), CodecError>;

    /// Returns the codec name.
    fn name(&self) -> &'static str;
}

/// Shared codec instances for dynamic dispatch.
pub static ASCII: Ascii = Ascii;
/// Shared codec instance, see [`Binary`].
pub static BINARY: Binary = Binary;
/// Shared codec instance, see [`Hex`].
pub static HEX: Hex = Hex;
/// Shared codec instance, see [`Bcd`].
pub static BCD: Bcd = Bcd;
/// Shared codec instance, see [`Ebcdic037`].
pub static EBCDIC_037: Ebcdic037 = Ebcdic037;
/// Shared codec instance, see [`BerTlv`].
pub static BER_TLV: BerTlv = BerTlv;

/// Returns the codec for a dialect encoding.
#[must_use]
pub fn codec_for(encoding: Encoding) -> &'static dyn Codec {
    match encoding {
        Encoding::Ascii => &ASCII,
        Encoding::Ebcdic => &EBCDIC_037,
        Encoding::Bcd => &BCD,
        Encoding::Binary => &BINARY,
    }
}
