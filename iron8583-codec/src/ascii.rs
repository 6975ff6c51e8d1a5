/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Validating pass-through codec for 7-bit ASCII.

use crate::error::CodecError;
use crate::Codec;

/// ASCII codec: both directions copy the input verbatim after checking
/// that every byte is at most 0x7F.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii;

impl Ascii {
    fn check(data: &[u8]) -> Result<(), CodecError> {
        for (position, &byte) in data.iter().enumerate() {
            if byte > 0x7F {
                return Err(CodecError::NonAsciiByte { byte, position });
            }
        }
        Ok(())
    }
}

impl Codec for Ascii {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Self::check(data)?;
        Ok(data.to_vec())
    }

    fn decode(&self, data: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
        Self::check(data)?;
        Ok((data.to_vec(), data.len()))
    }

    fn name(&self) -> &'static str {
        "ASCII"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_round_trip() {
        let input = b"0200 Hello, terminal!";
        let encoded = Ascii.encode(input).unwrap();
        assert_eq!(encoded, input);

        let (decoded, consumed) = Ascii.decode(&encoded).unwrap();
        assert_eq!(decoded, input);
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn test_ascii_empty() {
        assert_eq!(Ascii.encode(b"").unwrap(), Vec::<u8>::new());
        assert_eq!(Ascii.decode(b"").unwrap(), (Vec::new(), 0));
    }

    #[test]
    fn test_ascii_rejects_high_bytes() {
        let err = Ascii.encode(&[b'A', 0x80, b'B']).unwrap_err();
        assert_eq!(
            err,
            CodecError::NonAsciiByte {
                byte: 0x80,
                position: 1,
            }
        );

        assert!(Ascii.decode(&[0xFF]).is_err());
    }
}
