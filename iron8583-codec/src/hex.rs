/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Hexadecimal text codec.
//!
//! `encode` renders two lowercase ASCII hex characters per input byte;
//! `decode` accepts either case and fails on odd length or non-hex digits.

use crate::error::CodecError;
use crate::Codec;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Lowercase hexadecimal codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hex;

#[inline]
fn hex_value(byte: u8, position: usize) -> Result<u8, CodecError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(CodecError::InvalidHexDigit { byte, position }),
    }
}

impl Codec for Hex {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(data.len() * 2);
        for &byte in data {
            out.push(HEX_DIGITS[(byte >> 4) as usize]);
            out.push(HEX_DIGITS[(byte & 0x0F) as usize]);
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
        if data.len() % 2 != 0 {
            return Err(CodecError::OddHexLength { length: data.len() });
        }

        let mut out = Vec::with_capacity(data.len() / 2);
        for (i, pair) in data.chunks_exact(2).enumerate() {
            let high = hex_value(pair[0], i * 2)?;
            let low = hex_value(pair[1], i * 2 + 1)?;
            out.push((high << 4) | low);
        }
        Ok((out, data.len()))
    }

    fn name(&self) -> &'static str {
        "Hex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encode_lowercase() {
        let encoded = Hex.encode(&[0x02, 0x00, 0xAB, 0xFF]).unwrap();
        assert_eq!(encoded, b"0200abff");
    }

    #[test]
    fn test_hex_decode_accepts_both_cases() {
        let (lower, _) = Hex.decode(b"abff").unwrap();
        let (upper, _) = Hex.decode(b"ABFF").unwrap();
        assert_eq!(lower, vec![0xAB, 0xFF]);
        assert_eq!(upper, vec![0xAB, 0xFF]);
    }

    #[test]
    fn test_hex_round_trip_all_bytes() {
        let input: Vec<u8> = (0..=255).collect();
        let encoded = Hex.encode(&input).unwrap();
        let (decoded, consumed) = Hex.decode(&encoded).unwrap();
        assert_eq!(decoded, input);
        assert_eq!(consumed, encoded.len());
        assert!(encoded.iter().all(|b| !b.is_ascii_uppercase()));
    }

    #[test]
    fn test_hex_rejects_odd_length() {
        assert_eq!(
            Hex.decode(b"abc").unwrap_err(),
            CodecError::OddHexLength { length: 3 }
        );
    }

    #[test]
    fn test_hex_rejects_non_hex_digit() {
        assert_eq!(
            Hex.decode(b"0g").unwrap_err(),
            CodecError::InvalidHexDigit {
                byte: b'g',
                position: 1,
            }
        );
    }

    #[test]
    fn test_hex_empty() {
        assert_eq!(Hex.encode(b"").unwrap(), Vec::<u8>::new());
        assert_eq!(Hex.decode(b"").unwrap(), (Vec::new(), 0));
    }
}
