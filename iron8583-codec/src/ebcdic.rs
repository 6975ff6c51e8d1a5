/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! EBCDIC code page 037 codec.
//!
//! Translation runs through two fixed 256-entry tables. `encode` maps
//! 7-bit ASCII to EBCDIC and fails on source bytes above 0x7F; `decode`
//! is total, mapping EBCDIC bytes whose CP037 character has no ASCII
//! image to SUB (0x1A).

use crate::error::CodecError;
use crate::Codec;

/// ASCII SUB, emitted for EBCDIC bytes with no ASCII image.
const SUB: u8 = 0x1A;

/// ASCII (0x00..=0x7F) to EBCDIC code page 037.
#[rustfmt::skip]
const ASCII_TO_EBCDIC: [u8; 128] = [
    // 0x00..0x0F: NUL SOH STX ETX EOT ENQ ACK BEL BS HT LF VT FF CR SO SI
    0x00, 0x01, 0x02, 0x03, 0x37, 0x2D, 0x2E, 0x2F, 0x16, 0x05, 0x25, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    // 0x10..0x1F: DLE DC1 DC2 DC3 DC4 NAK SYN ETB CAN EM SUB ESC FS GS RS US
    0x10, 0x11, 0x12, 0x13, 0x3C, 0x3D, 0x32, 0x26, 0x18, 0x19, 0x3F, 0x27, 0x1C, 0x1D, 0x1E, 0x1F,
    // 0x20..0x2F: space ! " # $ % & ' ( ) * + , - . /
    0x40, 0x5A, 0x7F, 0x7B, 0x5B, 0x6C, 0x50, 0x7D, 0x4D, 0x5D, 0x5C, 0x4E, 0x6B, 0x60, 0x4B, 0x61,
    // 0x30..0x3F: 0-9 : ; < = > ?
    0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0x7A, 0x5E, 0x4C, 0x7E, 0x6E, 0x6F,
    // 0x40..0x4F: @ A-O
    0x7C, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6,
    // 0x50..0x5F: P-Z [ \ ] ^ _
    0xD7, 0xD8, 0xD9, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xBA, 0xE0, 0xBB, 0xB0, 0x6D,
    // 0x60..0x6F: ` a-o
    0x79, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x91, 0x92, 0x93, 0x94, 0x95, 0x96,
    // 0x70..0x7F: p-z { | } ~ DEL
    0x97, 0x98, 0x99, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xC0, 0x4F, 0xD0, 0xA1, 0x07,
];

/// EBCDIC code page 037 to ASCII, derived as the inverse of
/// [`ASCII_TO_EBCDIC`]; bytes outside the ASCII image decode to SUB.
const EBCDIC_TO_ASCII: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [SUB; 256];
    let mut ascii = 0usize;
    while ascii < 128 {
        table[ASCII_TO_EBCDIC[ascii] as usize] = ascii as u8;
        ascii += 1;
    }
    table
}

/// EBCDIC code page 037 codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ebcdic037;

impl Codec for Ebcdic037 {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(data.len());
        for (position, &byte) in data.iter().enumerate() {
            if byte > 0x7F {
                return Err(CodecError::UnmappedByte { byte, position });
            }
            out.push(ASCII_TO_EBCDIC[byte as usize]);
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
        let out = data
            .iter()
            .map(|&byte| EBCDIC_TO_ASCII[byte as usize])
            .collect();
        Ok((out, data.len()))
    }

    fn name(&self) -> &'static str {
        "EBCDIC-037"
    }
}
